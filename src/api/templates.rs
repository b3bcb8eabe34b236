//! Template and thread editing for one warmup mailbox.
//!
//! Every call names the template (and thread) it acts on, so opening a second
//! editor never redirects a later save to an earlier item.

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
            AddTemplateRequest,
            AddThreadRequest,
            DeleteThreadRequest,
            TemplateActionRequest,
            UpdateTemplateRequest,
            UpdateThreadRequest,
        },
        EmberError,
    },
    validation::FormValidation,
};

/// `form` is a [`template_form`](crate::validation::forms::template_form).
pub async fn add_template(
    client: &ApiClient,
    form: &mut FormValidation,
    selected_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::AddTemplate, |values| AddTemplateRequest {
        template_name: values.get("name").to_string(),
        template_subject: values.get("subject").to_string(),
        selected_email: selected_email.to_string(),
    })
    .await
}

pub async fn update_template(
    client: &ApiClient,
    form: &mut FormValidation,
    template_id: &str,
    selected_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::UpdateTemplate, |values| UpdateTemplateRequest {
        template_id: template_id.to_string(),
        name: values.get("name").to_string(),
        subject: values.get("subject").to_string(),
        selected_email: selected_email.to_string(),
    })
    .await
}

/// Flips a template between active and inactive.
pub async fn toggle_template_status(
    client: &ApiClient,
    template_id: &str,
    selected_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    send(client, Endpoint::ToggleTemplateStatus, &action(template_id, selected_email)).await
}

pub async fn delete_template(
    client: &ApiClient,
    template_id: &str,
    selected_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    send(client, Endpoint::DeleteTemplate, &action(template_id, selected_email)).await
}

/// Copies one of the stock templates into the mailbox.
pub async fn add_default_template(
    client: &ApiClient,
    template_id: &str,
    selected_email: &str,
) -> Result<SubmitOutcome, EmberError> {
    send(client, Endpoint::AddDefaultTemplate, &action(template_id, selected_email)).await
}

/// `form` is a [`thread_form`](crate::validation::forms::thread_form).
pub async fn add_thread(
    client: &ApiClient,
    form: &mut FormValidation,
    template_id: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::AddThread, |values| AddThreadRequest {
        template_id: template_id.to_string(),
        body: values.get("body").to_string(),
    })
    .await
}

pub async fn update_thread(
    client: &ApiClient,
    form: &mut FormValidation,
    template_id: &str,
    thread_id: &str,
) -> Result<SubmitOutcome, EmberError> {
    submit(client, form, Endpoint::UpdateThread, |values| UpdateThreadRequest {
        template_id: template_id.to_string(),
        thread_id: thread_id.to_string(),
        body: values.get("body").to_string(),
    })
    .await
}

pub async fn delete_thread(
    client: &ApiClient,
    template_id: &str,
    thread_id: &str,
) -> Result<SubmitOutcome, EmberError> {
    let request = DeleteThreadRequest {
        thread_id: thread_id.to_string(),
        template_id: template_id.to_string(),
    };
    send(client, Endpoint::DeleteThread, &request).await
}

fn action(template_id: &str, selected_email: &str) -> TemplateActionRequest {
    TemplateActionRequest {
        template_id: template_id.to_string(),
        selected_email: selected_email.to_string(),
    }
}
