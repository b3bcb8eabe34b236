//! Mailbox onboarding, subscription cancel and profile edits.

use super::{
    submit::{
        send,
        submit,
        SubmitOutcome,
    },
    ApiClient,
    Endpoint,
};
use crate::{
    core::{
        models::{
            AddEmailRequest,
            AppPasswordRequest,
            CancelSubscriptionRequest,
            ChangePasswordRequest,
            JoiningAppPasswordRequest,
            ProfileNameRequest,
        },
        EmberError,
    },
    validation::FormValidation,
};

/// Set on a successful app password check.
pub const VALID_CREDENTIALS_FLAG: &str = "valid_credentials";
/// Set when the team-joining flow accepted the app password.
pub const JOINED_FLAG: &str = "success";
/// Set when a profile edit was saved.
pub const PROFILE_SAVED_FLAG: &str = "status";
/// Error tag the joining flow uses when the invitation no longer exists.
pub const NOT_FOUND_TAG: &str = "404";

/// Onboarding context the mailbox pages carry from step to step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxFlow {
    pub selected_flow: Option<String>,
    pub email_provider: Option<String>,
}

/// `form` is an [`add_email_form`](crate::validation::forms::add_email_form).
pub async fn add_email(
    client: &ApiClient,
    form: &mut FormValidation,
    flow: &MailboxFlow,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::AddEmail, |values| AddEmailRequest {
        selected_flow: flow.selected_flow.clone(),
        email_provider: flow.email_provider.clone(),
        email: values.get("email").trim().to_string(),
    })
    .await
}

/// Accepted with [`VALID_CREDENTIALS_FLAG`] when the mailbox login worked.
pub async fn submit_app_password(
    client: &ApiClient,
    form: &mut FormValidation,
    flow: &MailboxFlow,
    email: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::AppPassword, |values| AppPasswordRequest {
        selected_flow: flow.selected_flow.clone(),
        email_provider: flow.email_provider.clone(),
        email: email.to_string(),
        app_password: values.get("app_password").to_string(),
    })
    .await
}

pub async fn submit_joining_app_password(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::JoiningAppPassword, |values| JoiningAppPasswordRequest {
        app_password: values.get("app_password").to_string(),
    })
    .await
}

pub async fn cancel_subscription(
    client: &ApiClient,
    warmup_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    let request = CancelSubscriptionRequest { warmup_email: warmup_email.to_string() };
    send(client, Endpoint::CancelSubscription, &request).await
}

pub async fn rename_profile(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::UserProfile, |values| ProfileNameRequest {
        input_name: values.get("name").trim().to_string(),
    })
    .await
}

pub async fn change_password(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::UserProfile, |values| ChangePasswordRequest {
        current_password: values.get("current_password").to_string(),
        new_password: values.get("new_password").to_string(),
    })
    .await
}
