use futures::future::BoxFuture;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{
    core::{
        config::ClientSettings,
        http::{
            ensure_success,
            http_client,
        },
        models::SearchRequest,
        EmberError,
        ServerResponse,
    },
    search::{
        SearchBackend,
        SearchTarget,
    },
};

pub mod account;
pub mod invoices;
pub mod submit;
pub mod templates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    EmailCheck,
    Signup,
    Login,
    PasswordReset,
    PasswordResetConfirm,
    Contact,
    CompletePayment,
    CampaignSearch,
    MemberSearch,
    BillingSearch,
    AddTemplate,
    UpdateTemplate,
    ToggleTemplateStatus,
    DeleteTemplate,
    AddDefaultTemplate,
    AddThread,
    UpdateThread,
    DeleteThread,
    CancelSubscription,
    AddEmail,
    AppPassword,
    JoiningAppPassword,
    UserProfile,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::EmailCheck => "/onboarding/",
            Endpoint::Signup => "/onboarding/signup/",
            Endpoint::Login => "/onboarding/login/",
            Endpoint::PasswordReset => "/password-reset/",
            Endpoint::PasswordResetConfirm => "/reset-password-confirm/",
            Endpoint::Contact => "/contact/",
            Endpoint::CompletePayment => "/payment/complete/",
            Endpoint::CampaignSearch => "/campaigns/list/search/",
            Endpoint::MemberSearch => "/profiles/member/list/search/",
            Endpoint::BillingSearch => "/profiles/billing/section/search/",
            Endpoint::AddTemplate => "/templates/add/",
            Endpoint::UpdateTemplate => "/templates/update/",
            Endpoint::ToggleTemplateStatus => "/templates/update/status/",
            Endpoint::DeleteTemplate => "/templates/delete/",
            Endpoint::AddDefaultTemplate => "/templates/add/default/",
            Endpoint::AddThread => "/templates/threads/add/",
            Endpoint::UpdateThread => "/templates/threads/update/",
            Endpoint::DeleteThread => "/templates/threads/delete/",
            Endpoint::CancelSubscription => "/campaigns/cancel/subscription/",
            Endpoint::AddEmail => "/campaigns/add-email/",
            Endpoint::AppPassword => "/campaigns/app-password/",
            Endpoint::JoiningAppPassword => "/campaigns/joining/flow/app-password/",
            Endpoint::UserProfile => "/profiles/user-profile/",
        }
    }
}

/// JSON-over-POST client for the server's AJAX endpoints.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, EmberError> {
        settings.validate()?;
        Ok(Self {
            client: http_client(settings.request_timeout())?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            csrf_token: settings.csrf_token.clone(),
        })
    }

    /// Absolute URLs pass through; paths are joined onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<ServerResponse, EmberError> {
        let url = self.url(endpoint.path());
        debug!(url = %url, "POST");

        let mut request = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(body);
        if let Some(token) = &self.csrf_token {
            request = request.header("X-CSRFToken", token);
        }

        let response = request.send().await?;
        ensure_success(&response)?;
        let text = response.text().await?;
        Ok(ServerResponse::from_body(&text))
    }

    pub async fn search(
        &self,
        target: SearchTarget,
        query: &str,
    ) -> Result<ServerResponse, EmberError> {
        self.post_json(target.endpoint(), &SearchRequest { search_value: query.to_string() }).await
    }

    /// Whether an account already exists for `email`.
    pub async fn email_exists(&self, email: &str) -> Result<bool, EmberError> {
        let response = self
            .post_json(Endpoint::EmailCheck, &serde_json::json!({ "email": email }))
            .await?;
        Ok(response.flag("exist"))
    }
}

impl SearchBackend for ApiClient {
    fn search(
        &self,
        target: SearchTarget,
        query: String,
    ) -> BoxFuture<'static, Result<ServerResponse, EmberError>> {
        let client = self.clone();
        Box::pin(async move { ApiClient::search(&client, target, &query).await })
    }
}
