use std::{
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use embermail::{
    api::{
        account::{
            self,
            MailboxFlow,
        },
        invoices::download_invoices,
        submit::{
            submit_contact,
            submit_login,
            submit_password_reset,
            submit_password_reset_confirm,
            submit_payment,
            submit_signup,
            SubmitOutcome,
        },
        templates,
    },
    search::SearchEvent,
    validation::{
        forms,
        ExternalReport,
        GateRejection,
    },
    ApiClient,
    ClientSettings,
    EmberError,
    FormValidation,
    LiveSearch,
    SearchTarget,
};
use tokio::io::{
    AsyncBufReadExt,
    BufReader,
};
use tracing::{
    debug,
    error,
    warn,
};
use tracing_subscriber::{
    fmt,
    EnvFilter,
};

mod cli;

use cli::{
    parse_field,
    Cli,
    Commands,
    FormKind,
    MailboxAction,
    ProfileAction,
    TemplateAction,
    ThreadAction,
};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, EmberError> {
    let mut settings = ClientSettings::load()?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
        settings.validate()?;
    }

    match cli.command {
        Commands::Search { target, delay_ms } => {
            let delay = delay_ms.map(Duration::from_millis).unwrap_or(settings.search_delay());
            run_search(&settings, target.into(), delay).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { form, fields } => {
            let mut validation = fill_form(form, &fields);
            match validation.submit() {
                Ok(_) => {
                    println!("{}: ok", validation.name());
                    Ok(ExitCode::SUCCESS)
                }
                Err(rejection) => {
                    print_rejection(&rejection);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Submit { form, fields, token, payment_method, join_team } => {
            let client = ApiClient::new(&settings)?;
            let mut validation = fill_form(form, &fields);
            let outcome = match form {
                FormKind::Signup => {
                    let flow = join_team.then_some("join_team");
                    submit_signup(&client, &mut validation, flow).await?
                }
                FormKind::Login => submit_login(&client, &mut validation).await?,
                FormKind::PasswordReset => submit_password_reset(&client, &mut validation).await?,
                FormKind::PasswordResetConfirm => {
                    let token = token.ok_or_else(|| {
                        EmberError::Custom(
                            "--token is required to confirm a password reset".to_string(),
                        )
                    })?;
                    submit_password_reset_confirm(&client, &mut validation, &token).await?
                }
                FormKind::Contact => submit_contact(&client, &mut validation).await?,
                FormKind::Payment => {
                    let payment_method = payment_method.ok_or_else(|| {
                        EmberError::Custom("--payment-method is required for payment".to_string())
                    })?;
                    submit_payment(&client, &mut validation, &payment_method).await?
                }
            };
            Ok(print_outcome(&outcome))
        }
        Commands::Invoices { query, selected, dir } => {
            let dir = dir.unwrap_or_else(|| settings.download_dir());
            run_invoices(&settings, &query, &selected, &dir).await
        }
        Commands::Template { mailbox, action } => {
            let client = ApiClient::new(&settings)?;
            let outcome = run_template(&client, &mailbox, action).await?;
            Ok(print_outcome(&outcome))
        }
        Commands::Thread { template_id, action } => {
            let client = ApiClient::new(&settings)?;
            let outcome = run_thread(&client, &template_id, action).await?;
            Ok(print_outcome(&outcome))
        }
        Commands::Mailbox { action } => {
            let client = ApiClient::new(&settings)?;
            let outcome = run_mailbox(&client, action).await?;
            Ok(print_outcome(&outcome))
        }
        Commands::Profile { action } => {
            let client = ApiClient::new(&settings)?;
            let outcome = match action {
                ProfileAction::Rename { name } => {
                    let mut form = forms::profile_name_form();
                    form.change("name", &name);
                    account::rename_profile(&client, &mut form).await?
                }
                ProfileAction::ChangePassword { current_password, new_password } => {
                    let mut form = forms::change_password_form();
                    form.change("current_password", &current_password);
                    form.change("new_password", &new_password);
                    account::change_password(&client, &mut form).await?
                }
            };
            Ok(print_outcome(&outcome))
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            if save {
                settings.save()?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_search(
    settings: &ClientSettings,
    target: SearchTarget,
    delay: Duration,
) -> Result<(), EmberError> {
    let client = Arc::new(ApiClient::new(settings)?);
    let mut live = LiveSearch::new(target, client, delay)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut handled = 0;

    loop {
        if !input_open && !live.is_pending() && handled >= live.latest_issued() {
            return Ok(());
        }

        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(text) => live.input(text),
                None => input_open = false,
            },
            Some(event) = live.next_event() => {
                match &event {
                    SearchEvent::Replaced { seq, query } => {
                        handled = handled.max(*seq);
                        println!("--- results for {query:?}");
                        println!("{}", live.region().content());
                    }
                    SearchEvent::Failed { seq, diagnostic } => {
                        handled = handled.max(*seq);
                        eprintln!("search failed, keeping previous results: {diagnostic}");
                    }
                    SearchEvent::Discarded { seq, latest } => {
                        debug!(seq, latest, "stale response dropped");
                    }
                }
            }
        }
    }
}

async fn run_template(
    client: &ApiClient,
    mailbox: &str,
    action: TemplateAction,
) -> Result<SubmitOutcome, EmberError> {
    match action {
        TemplateAction::Add { name, subject } => {
            let mut form = forms::template_form();
            form.change("name", &name);
            form.change("subject", &subject);
            templates::add_template(client, &mut form, mailbox).await
        }
        TemplateAction::Update { id, name, subject } => {
            let mut form = forms::template_form();
            form.change("name", &name);
            form.change("subject", &subject);
            templates::update_template(client, &mut form, &id, mailbox).await
        }
        TemplateAction::ToggleStatus { id } => {
            templates::toggle_template_status(client, &id, mailbox).await
        }
        TemplateAction::Delete { id } => templates::delete_template(client, &id, mailbox).await,
        TemplateAction::AddDefault { id } => {
            templates::add_default_template(client, &id, mailbox).await
        }
    }
}

async fn run_thread(
    client: &ApiClient,
    template_id: &str,
    action: ThreadAction,
) -> Result<SubmitOutcome, EmberError> {
    match action {
        ThreadAction::Add { body } => {
            let mut form = forms::thread_form();
            form.change("body", &body);
            templates::add_thread(client, &mut form, template_id).await
        }
        ThreadAction::Update { id, body } => {
            let mut form = forms::thread_form();
            form.change("body", &body);
            templates::update_thread(client, &mut form, template_id, &id).await
        }
        ThreadAction::Delete { id } => templates::delete_thread(client, template_id, &id).await,
    }
}

async fn run_mailbox(
    client: &ApiClient,
    action: MailboxAction,
) -> Result<SubmitOutcome, EmberError> {
    match action {
        MailboxAction::AddEmail { email, flow } => {
            let mut form = forms::add_email_form();
            form.change("email", &email);
            account::add_email(client, &mut form, &MailboxFlow::from(flow)).await
        }
        MailboxAction::AppPassword { email, app_password, flow } => {
            let mut form = forms::app_password_form();
            form.change("app_password", &app_password);
            let flow = MailboxFlow::from(flow);
            account::submit_app_password(client, &mut form, &flow, &email).await
        }
        MailboxAction::JoinAppPassword { app_password } => {
            let mut form = forms::app_password_form();
            form.change("app_password", &app_password);
            account::submit_joining_app_password(client, &mut form).await
        }
        MailboxAction::CancelSubscription { warmup_email } => {
            account::cancel_subscription(client, &warmup_email).await
        }
    }
}

async fn run_invoices(
    settings: &ClientSettings,
    query: &str,
    selected: &[String],
    dir: &std::path::Path,
) -> Result<ExitCode, EmberError> {
    let client = ApiClient::new(settings)?;
    let backend = Arc::new(client.clone());
    let mut live = LiveSearch::new(SearchTarget::BillingHistory, backend, Duration::ZERO)?;

    live.search_now(query);
    if let Some(SearchEvent::Failed { diagnostic, .. }) = live.next_event().await {
        return Err(EmberError::Custom(format!("billing history unavailable: {diagnostic}")));
    }

    let available = live.available_invoices();
    let Some(selection) = live.selection_mut() else {
        return Ok(ExitCode::FAILURE);
    };
    for url in selected {
        selection.toggle(url, true);
    }

    let outcomes = download_invoices(&client, selection, &available, dir).await?;
    let mut failed = false;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => println!("{} -> {}", outcome.url, path.display()),
            Err(e) => {
                failed = true;
                eprintln!("{}: {}", outcome.url, e);
            }
        }
    }
    if outcomes.is_empty() {
        println!("no invoices found");
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn fill_form(kind: FormKind, fields: &[String]) -> FormValidation {
    let mut form = kind.build();
    for raw in fields {
        let (name, value) = parse_field(raw);
        if form.change(name, value).is_some() {
            continue;
        }
        let report = if value == "ok" {
            ExternalReport { complete: true, error: None }
        } else {
            ExternalReport { complete: false, error: Some(value.to_string()) }
        };
        if form.report_external(name, report).is_none() {
            warn!("{} form has no field named {name:?}", form.name());
        }
    }
    form
}

fn print_rejection(rejection: &GateRejection) {
    for error in rejection.errors.iter().chain(rejection.summary.iter()) {
        eprintln!("{}: {}", error.slot(), error.message);
    }
}

fn print_outcome(outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Rejected(rejection) => {
            print_rejection(rejection);
            ExitCode::FAILURE
        }
        SubmitOutcome::ServerError(error) => {
            eprintln!("{}: {}", error.slot(), error.message);
            ExitCode::FAILURE
        }
        SubmitOutcome::Redirect(url) => {
            println!("redirect: {url}");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Accepted(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Fragment(markup) => {
            println!("{markup}");
            ExitCode::SUCCESS
        }
        SubmitOutcome::ExistingAccount(email) => {
            eprintln!("{email} already has an account; log in or pick an onboarding flow");
            ExitCode::FAILURE
        }
    }
}
