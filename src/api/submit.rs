use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{
    ApiClient,
    Endpoint,
};
use crate::{
    core::{
        models::{
            CompletePaymentRequest,
            ContactRequest,
            LoginRequest,
            PasswordResetConfirmRequest,
            PasswordResetRequest,
            SignupRequest,
        },
        EmberError,
        ServerResponse,
    },
    validation::{
        FieldError,
        FormValidation,
        FormValues,
        GateRejection,
    },
};

/// Result of one submit click. Transport failures are the `Err` side of
/// [`submit`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blocked locally; nothing was sent.
    Rejected(GateRejection),
    /// Business error reported by the server, placed in its tagged slot.
    ServerError(FieldError),
    Redirect(String),
    Accepted(Value),
    Fragment(String),
    /// Signup stopped because the address already has an account.
    ExistingAccount(String),
}

impl SubmitOutcome {
    pub fn from_response(response: ServerResponse) -> Self {
        match response {
            ServerResponse::Error { message, tag } => {
                SubmitOutcome::ServerError(FieldError::new(tag, message))
            }
            ServerResponse::Redirect(url) => SubmitOutcome::Redirect(url),
            ServerResponse::Data(value) => SubmitOutcome::Accepted(value),
            ServerResponse::Fragment(markup) => SubmitOutcome::Fragment(markup),
        }
    }

    pub fn accepted_flag(&self, name: &str) -> bool {
        match self {
            SubmitOutcome::Accepted(value) => {
                value.get(name).and_then(Value::as_bool).unwrap_or(false)
            }
            _ => false,
        }
    }
}

/// Gate first; only a form that passes is sent.
pub async fn submit<B, F>(
    client: &ApiClient,
    form: &mut FormValidation,
    endpoint: Endpoint,
    build: F,
) -> Result<SubmitOutcome, EmberError>
where
    B: Serialize,
    F: FnOnce(&FormValues) -> B,
{
    let values = match form.submit() {
        Ok(values) => values,
        Err(rejection) => return Ok(SubmitOutcome::Rejected(rejection)),
    };

    let response = client.post_json(endpoint, &build(&values)).await?;
    let outcome = SubmitOutcome::from_response(response);
    info!(form = form.name(), endpoint = endpoint.path(), "form submitted");
    Ok(outcome)
}

/// Actions without a form, such as a confirmed delete.
pub async fn send<B: Serialize>(
    client: &ApiClient,
    endpoint: Endpoint,
    body: &B,
) -> Result<SubmitOutcome, EmberError> {
    let response = client.post_json(endpoint, body).await?;
    info!(endpoint = endpoint.path(), "action sent");
    Ok(SubmitOutcome::from_response(response))
}

pub async fn submit_login(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::Login, |values| LoginRequest {
        email: values.get("email").trim().to_string(),
        password: values.get("password").to_string(),
    })
    .await
}

/// `signup_flow` is `Some("join_team")` when signing up through an invitation.
///
/// A known address is not signed up again; the caller gets
/// [`SubmitOutcome::ExistingAccount`] and should offer onboarding instead.
pub async fn submit_signup(
    client: &ApiClient,
    form: &mut FormValidation,
    signup_flow: Option<&str>,
) -> Result<SubmitOutcome, EmberError> {
    let values = match form.submit() {
        Ok(values) => values,
        Err(rejection) => return Ok(SubmitOutcome::Rejected(rejection)),
    };

    let email = values.get("email").trim().to_string();
    if client.email_exists(&email).await? {
        info!(form = form.name(), "address already registered, signup not sent");
        return Ok(SubmitOutcome::ExistingAccount(email));
    }

    let request = SignupRequest {
        email,
        password: values.get("password").to_string(),
        signup_flow: signup_flow.map(str::to_string),
    };
    send(client, Endpoint::Signup, &request).await
}

pub async fn submit_password_reset(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::PasswordReset, |values| PasswordResetRequest {
        email: values.get("email").trim().to_string(),
    })
    .await
}

pub async fn submit_password_reset_confirm(
    client: &ApiClient,
    form: &mut FormValidation,
    encoded_token: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::PasswordResetConfirm, |values| PasswordResetConfirmRequest {
        password: values.get("password").to_string(),
        encoded_token: encoded_token.to_string(),
    })
    .await
}

pub async fn submit_contact(
    client: &ApiClient,
    form: &mut FormValidation,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::Contact, |values| ContactRequest {
        email: values.get("email").trim().to_string(),
        contact_message: values.get("message").to_string(),
    })
    .await
}

/// The payment method id comes from the card processor once the gate has passed.
pub async fn submit_payment(
    client: &ApiClient,
    form: &mut FormValidation,
    payment_method_id: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::CompletePayment, |_| CompletePaymentRequest {
        stripe_payment_method_id: payment_method_id.to_string(),
    })
    .await
}
