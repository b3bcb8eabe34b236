use std::{
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::Path,
    http::{
        HeaderMap,
        StatusCode,
    },
    response::{
        Html,
        IntoResponse,
    },
    routing::{
        get,
        post,
    },
    Json,
    Router,
};
use embermail::{
    api::{
        account::{
            self,
            MailboxFlow,
            NOT_FOUND_TAG,
            PROFILE_SAVED_FLAG,
            VALID_CREDENTIALS_FLAG,
        },
        invoices::download_invoices,
        submit::{
            submit_login,
            submit_signup,
            SubmitOutcome,
        },
        templates,
    },
    search::SearchEvent,
    validation::forms::{
        add_email_form,
        app_password_form,
        change_password_form,
        login_form,
        profile_name_form,
        signup_form,
        template_form,
        thread_form,
    },
    ApiClient,
    ClientSettings,
    EmberError,
    LiveSearch,
    SearchTarget,
};
use serde_json::{
    json,
    Value,
};

const CSRF_TOKEN: &str = "test-token";

fn csrf_ok(headers: &HeaderMap) -> bool {
    headers.get("x-csrftoken").and_then(|v| v.to_str().ok()) == Some(CSRF_TOKEN)
        && headers.get("x-requested-with").and_then(|v| v.to_str().ok()) == Some("XMLHttpRequest")
}

async fn login(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    if !csrf_ok(&headers) {
        return Json(json!({ "error_message": "CSRF verification failed." }));
    }
    if body["password"] == "Correct!1" {
        Json(json!({ "logged_in": true, "redirect": "/campaigns/" }))
    } else {
        Json(json!({ "error_message": "Incorrect password.", "error_tag": "password" }))
    }
}

async fn email_check(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "exist": body["email"] == "known@embermail.io" }))
}

async fn signup(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "registered": true, "signup_flow": body["signup_flow"] }))
}

async fn add_template(Json(body): Json<Value>) -> Json<Value> {
    if body["template_name"] == "Intro" {
        return Json(json!({ "error_message": "Template name already exists." }));
    }
    Json(json!({ "redirect": format!("/templates/?selected_warmup={}", body["selected_email"]) }))
}

/// Redirects to a URL naming the template and mailbox the request carried.
async fn template_action(Json(body): Json<Value>) -> Json<Value> {
    let template_id = body["template_id"].as_str().unwrap_or_default();
    let mailbox = body["selected_email"].as_str().unwrap_or_default();
    Json(json!({ "redirect": format!("/templates/{template_id}/?mailbox={mailbox}") }))
}

async fn thread_action(Json(body): Json<Value>) -> Json<Value> {
    let template_id = body["template_id"].as_str().unwrap_or_default();
    match body["thread_id"].as_str() {
        Some(thread_id) => Json(json!({
            "redirect": format!("/templates/threads/list/{template_id}/#thread-{thread_id}")
        })),
        None => Json(json!({ "redirect": format!("/templates/threads/list/{template_id}/") })),
    }
}

async fn cancel_subscription(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "cancelled": body["warmup_email"] }))
}

async fn add_email(Json(body): Json<Value>) -> Json<Value> {
    match body["email_provider"].as_str() {
        Some(provider) => Json(json!({
            "redirect": format!("/campaigns/app-password/?email_provider={provider}")
        })),
        None => Json(json!({ "error_message": "Select an email provider first." })),
    }
}

async fn app_password(Json(body): Json<Value>) -> Json<Value> {
    if body["app_password"] == "abcd efgh ijkl mnop" && body["email"] == "warmup@embermail.io" {
        Json(json!({ "valid_credentials": true }))
    } else {
        Json(json!({ "valid_credentials": false, "error_message": "Invalid app password." }))
    }
}

async fn joining_app_password() -> Json<Value> {
    Json(json!({ "success": false, "error_message": "Invitation not found.", "error_tag": "404" }))
}

async fn user_profile(Json(body): Json<Value>) -> Json<Value> {
    if body.get("input_name").is_some() {
        return Json(json!({ "status": true }));
    }
    if body["current_password"] == "Old!pass1" {
        Json(json!({ "status": true }))
    } else {
        Json(json!({ "error_message": "Current password is incorrect." }))
    }
}

async fn campaign_search(Json(body): Json<Value>) -> Html<String> {
    let query = body["search_value"].as_str().unwrap_or_default().to_string();
    let latency = if query == "x" { 400 } else { 20 };
    tokio::time::sleep(Duration::from_millis(latency)).await;
    Html(format!("<tbody id=\"campaign_list_tbody\"><tr><td>{query}</td></tr></tbody>"))
}

async fn member_search() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn billing_search() -> Html<&'static str> {
    Html(
        r#"<table id="invoice_table">
  <tr><td><input type="checkbox" class="all_download_checkboxes"
                 value="/media/invoices/inv_1.pdf"></td></tr>
  <tr><td><input type="checkbox" class="all_download_checkboxes"
                 value="/media/invoices/missing.pdf"></td></tr>
  <tr><td><input type="checkbox" class="all_download_checkboxes"
                 value="/media/invoices/inv_2.pdf"></td></tr>
</table>"#,
    )
}

async fn invoice(Path(name): Path<String>) -> impl IntoResponse {
    if name == "missing.pdf" {
        return (StatusCode::NOT_FOUND, String::new());
    }
    (StatusCode::OK, format!("%PDF {name}"))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/onboarding/", post(email_check))
        .route("/onboarding/login/", post(login))
        .route("/onboarding/signup/", post(signup))
        .route("/templates/add/", post(add_template))
        .route("/templates/update/", post(template_action))
        .route("/templates/update/status/", post(template_action))
        .route("/templates/delete/", post(template_action))
        .route("/templates/add/default/", post(template_action))
        .route("/templates/threads/add/", post(thread_action))
        .route("/templates/threads/update/", post(thread_action))
        .route("/templates/threads/delete/", post(thread_action))
        .route("/campaigns/cancel/subscription/", post(cancel_subscription))
        .route("/campaigns/add-email/", post(add_email))
        .route("/campaigns/app-password/", post(app_password))
        .route("/campaigns/joining/flow/app-password/", post(joining_app_password))
        .route("/profiles/user-profile/", post(user_profile))
        .route("/campaigns/list/search/", post(campaign_search))
        .route("/profiles/member/list/search/", post(member_search))
        .route("/profiles/billing/section/search/", post(billing_search))
        .route("/media/invoices/{name}", get(invoice));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

async fn client(with_token: bool) -> ApiClient {
    let settings = ClientSettings {
        base_url: spawn_server().await,
        csrf_token: with_token.then(|| CSRF_TOKEN.to_string()),
        ..Default::default()
    };
    ApiClient::new(&settings).unwrap()
}

#[tokio::test]
async fn login_error_lands_in_tagged_slot() {
    let client = client(true).await;
    let mut form = login_form();
    form.change("email", "founder@embermail.io");
    form.change("password", "wrong");

    match submit_login(&client, &mut form).await.unwrap() {
        SubmitOutcome::ServerError(error) => {
            assert_eq!(error.slot(), "password_error");
            assert_eq!(error.message, "Incorrect password.");
        }
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn login_success_redirects() {
    let client = client(true).await;
    let mut form = login_form();
    form.change("email", "founder@embermail.io");
    form.change("password", "Correct!1");

    assert_eq!(
        submit_login(&client, &mut form).await.unwrap(),
        SubmitOutcome::Redirect("/campaigns/".to_string())
    );
}

#[tokio::test]
async fn missing_csrf_token_is_a_common_error() {
    let client = client(false).await;
    let mut form = login_form();
    form.change("email", "founder@embermail.io");
    form.change("password", "Correct!1");

    match submit_login(&client, &mut form).await.unwrap() {
        SubmitOutcome::ServerError(error) => assert_eq!(error.field, "common"),
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn email_check_reads_exist_flag() {
    let client = client(true).await;
    assert!(client.email_exists("known@embermail.io").await.unwrap());
    assert!(!client.email_exists("new@embermail.io").await.unwrap());
}

#[tokio::test]
async fn signup_for_known_address_is_not_sent() {
    let client = client(true).await;
    let mut form = signup_form();
    form.change("email", "known@embermail.io");
    form.change("password", "Str0ng!pass");

    assert_eq!(
        submit_signup(&client, &mut form, None).await.unwrap(),
        SubmitOutcome::ExistingAccount("known@embermail.io".to_string())
    );
}

#[tokio::test]
async fn signup_for_new_address_registers() {
    let client = client(true).await;
    let mut form = signup_form();
    form.change("email", "new@embermail.io");
    form.change("password", "Str0ng!pass");

    let outcome = submit_signup(&client, &mut form, Some("join_team")).await.unwrap();
    assert!(outcome.accepted_flag("registered"));
    match outcome {
        SubmitOutcome::Accepted(value) => assert_eq!(value["signup_flow"], "join_team"),
        other => panic!("Expected Accepted, got {:?}", other),
    }
}

#[tokio::test]
async fn template_edits_target_the_template_they_name() {
    let client = client(true).await;
    let mailbox = "warmup@embermail.io";

    for (template_id, name) in [("1", "First"), ("2", "Second")] {
        let mut form = template_form();
        form.change("name", name);
        form.change("subject", "Hello");
        assert_eq!(
            templates::update_template(&client, &mut form, template_id, mailbox).await.unwrap(),
            SubmitOutcome::Redirect(format!("/templates/{template_id}/?mailbox={mailbox}"))
        );
    }

    assert_eq!(
        templates::toggle_template_status(&client, "3", mailbox).await.unwrap(),
        SubmitOutcome::Redirect(format!("/templates/3/?mailbox={mailbox}"))
    );
    assert_eq!(
        templates::delete_template(&client, "4", mailbox).await.unwrap(),
        SubmitOutcome::Redirect(format!("/templates/4/?mailbox={mailbox}"))
    );
    assert_eq!(
        templates::add_default_template(&client, "5", mailbox).await.unwrap(),
        SubmitOutcome::Redirect(format!("/templates/5/?mailbox={mailbox}"))
    );
}

#[tokio::test]
async fn duplicate_template_error_lands_in_common_slot() {
    let client = client(true).await;
    let mut form = template_form();
    form.change("name", "Intro");
    form.change("subject", "Hello");

    match templates::add_template(&client, &mut form, "warmup@embermail.io").await.unwrap() {
        SubmitOutcome::ServerError(error) => {
            assert_eq!(error.field, "common");
            assert_eq!(error.message, "Template name already exists.");
        }
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn thread_edits_return_to_thread_list() {
    let client = client(true).await;

    let mut form = thread_form();
    form.change("body", "<p>Following up</p>");
    assert_eq!(
        templates::add_thread(&client, &mut form, "7").await.unwrap(),
        SubmitOutcome::Redirect("/templates/threads/list/7/".to_string())
    );

    let mut form = thread_form();
    form.change("body", "<p>Second nudge</p>");
    assert_eq!(
        templates::update_thread(&client, &mut form, "7", "3").await.unwrap(),
        SubmitOutcome::Redirect("/templates/threads/list/7/#thread-3".to_string())
    );

    assert_eq!(
        templates::delete_thread(&client, "7", "3").await.unwrap(),
        SubmitOutcome::Redirect("/templates/threads/list/7/#thread-3".to_string())
    );
}

#[tokio::test]
async fn mailbox_onboarding_flow() {
    let client = client(true).await;
    let flow = MailboxFlow { selected_flow: None, email_provider: Some("gmail".to_string()) };

    let mut form = add_email_form();
    form.change("email", "warmup@embermail.io");
    assert_eq!(
        account::add_email(&client, &mut form, &flow).await.unwrap(),
        SubmitOutcome::Redirect("/campaigns/app-password/?email_provider=gmail".to_string())
    );

    let mut form = add_email_form();
    form.change("email", "warmup@embermail.io");
    let outcome = account::add_email(&client, &mut form, &MailboxFlow::default()).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::ServerError(_)));

    let mut form = app_password_form();
    form.change("app_password", "abcd efgh ijkl mnop");
    let outcome = account::submit_app_password(&client, &mut form, &flow, "warmup@embermail.io")
        .await
        .unwrap();
    assert!(outcome.accepted_flag(VALID_CREDENTIALS_FLAG));

    let mut form = app_password_form();
    form.change("app_password", "wrong");
    match account::submit_app_password(&client, &mut form, &flow, "warmup@embermail.io")
        .await
        .unwrap()
    {
        SubmitOutcome::ServerError(error) => assert_eq!(error.message, "Invalid app password."),
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn joining_flow_reports_missing_invitation() {
    let client = client(true).await;
    let mut form = app_password_form();
    form.change("app_password", "abcd efgh ijkl mnop");

    match account::submit_joining_app_password(&client, &mut form).await.unwrap() {
        SubmitOutcome::ServerError(error) => assert_eq!(error.field, NOT_FOUND_TAG),
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn subscription_and_profile_updates() {
    let client = client(true).await;

    let outcome = account::cancel_subscription(&client, "warmup@embermail.io").await.unwrap();
    match outcome {
        SubmitOutcome::Accepted(value) => assert_eq!(value["cancelled"], "warmup@embermail.io"),
        other => panic!("Expected Accepted, got {:?}", other),
    }

    let mut form = profile_name_form();
    form.change("name", "Ada");
    assert!(account::rename_profile(&client, &mut form)
        .await
        .unwrap()
        .accepted_flag(PROFILE_SAVED_FLAG));

    let mut form = change_password_form();
    form.change("current_password", "Wrong!pass1");
    form.change("new_password", "N3w!password");
    match account::change_password(&client, &mut form).await.unwrap() {
        SubmitOutcome::ServerError(error) => {
            assert_eq!(error.slot(), "common_error");
            assert_eq!(error.message, "Current password is incorrect.");
        }
        other => panic!("Expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn overlapping_searches_show_latest_only() {
    let client = Arc::new(client(true).await);
    let mut live = LiveSearch::new(SearchTarget::Campaigns, client, Duration::from_millis(50))
        .unwrap();

    let slow = live.search_now("x");
    let fast = live.search_now("xy");

    assert_eq!(
        live.next_event().await,
        Some(SearchEvent::Replaced { seq: fast, query: "xy".to_string() })
    );
    assert_eq!(live.next_event().await, Some(SearchEvent::Discarded { seq: slow, latest: fast }));
    assert!(live.region().content().contains("<td>xy</td>"));
}

#[tokio::test]
async fn server_failure_keeps_previous_rows() {
    let client = Arc::new(client(true).await);
    let mut live = LiveSearch::new(SearchTarget::Members, client, Duration::from_millis(50))
        .unwrap()
        .with_initial_content("<tbody id=\"member_list_tbody\"></tbody>");

    live.input("anyone");
    match live.next_event().await {
        Some(SearchEvent::Failed { diagnostic, .. }) => assert!(diagnostic.contains("500")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert_eq!(live.region().content(), "<tbody id=\"member_list_tbody\"></tbody>");
}

#[tokio::test]
async fn download_all_invoices_when_nothing_selected() {
    let client = client(true).await;
    let backend = Arc::new(client.clone());
    let mut live = LiveSearch::new(SearchTarget::BillingHistory, backend, Duration::ZERO).unwrap();

    live.search_now("");
    assert!(matches!(live.next_event().await, Some(SearchEvent::Replaced { .. })));

    let available = live.available_invoices();
    assert_eq!(available.len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let selection = live.selection_mut().unwrap();
    let outcomes = download_invoices(&client, selection, &available, dir.path()).await.unwrap();

    let urls: Vec<&str> = outcomes.iter().map(|o| o.url.as_str()).collect();
    assert_eq!(urls, available.iter().map(String::as_str).collect::<Vec<_>>());

    let saved = std::fs::read_to_string(dir.path().join("inv_2.pdf")).unwrap();
    assert_eq!(saved, "%PDF inv_2.pdf");
    assert!(matches!(outcomes[1].result, Err(EmberError::Http { status: 404, .. })));
    assert!(live.selection().unwrap().is_all_selected());
}
