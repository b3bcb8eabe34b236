use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// Error tag used when the server reports a failure without naming a field.
pub const COMMON_TAG: &str = "common";

/// What the server sent back, reduced to the shapes the client acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerResponse {
    Redirect(String),
    Error { message: String, tag: String },
    Data(Value),
    Fragment(String),
}

impl ServerResponse {
    pub fn from_body(body: &str) -> Self {
        let value = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(_) => return ServerResponse::Fragment(body.to_string()),
        };

        let Some(object) = value.as_object() else {
            // A bare JSON string is still markup the server wants inserted
            return match value {
                Value::String(markup) => ServerResponse::Fragment(markup),
                other => ServerResponse::Data(other),
            };
        };

        if let Some(url) = object.get("redirect").and_then(Value::as_str) {
            return ServerResponse::Redirect(url.to_string());
        }

        if let Some(message) = object.get("error_message").and_then(Value::as_str) {
            // Payment failures carry the processor's own wording under error.message
            let message = object
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .filter(|nested| !nested.is_empty())
                .unwrap_or(message);
            let tag = object
                .get("error_tag")
                .and_then(Value::as_str)
                .filter(|tag| !tag.is_empty())
                .unwrap_or(COMMON_TAG);
            return ServerResponse::Error { message: message.to_string(), tag: tag.to_string() };
        }

        ServerResponse::Data(value)
    }

    pub fn flag(&self, name: &str) -> bool {
        match self {
            ServerResponse::Data(value) => {
                value.get(name).and_then(Value::as_bool).unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub search_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signup_flow: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirmRequest {
    pub password: String,
    pub encoded_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub email: String,
    pub contact_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletePaymentRequest {
    pub stripe_payment_method_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTemplateRequest {
    pub template_name: String,
    pub template_subject: String,
    pub selected_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTemplateRequest {
    pub template_id: String,
    pub name: String,
    pub subject: String,
    pub selected_email: String,
}

/// Status toggle, deletion and default copy only name the template and its mailbox.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateActionRequest {
    pub template_id: String,
    pub selected_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddThreadRequest {
    pub template_id: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateThreadRequest {
    pub template_id: String,
    pub thread_id: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteThreadRequest {
    pub thread_id: String,
    pub template_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelSubscriptionRequest {
    pub warmup_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddEmailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_provider: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppPasswordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_provider: Option<String>,
    pub email: String,
    pub app_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoiningAppPasswordRequest {
    pub app_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileNameRequest {
    pub input_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_classification() {
        assert_eq!(
            ServerResponse::from_body(r#"{"redirect": "/campaigns/"}"#),
            ServerResponse::Redirect("/campaigns/".to_string())
        );

        assert_eq!(
            ServerResponse::from_body(
                r#"{"error_message": "Wrong password", "error_tag": "password"}"#
            ),
            ServerResponse::Error {
                message: "Wrong password".to_string(),
                tag: "password".to_string()
            }
        );

        // Missing tag falls back to the common slot
        assert_eq!(
            ServerResponse::from_body(r#"{"error_message": "Try later"}"#),
            ServerResponse::Error { message: "Try later".to_string(), tag: COMMON_TAG.to_string() }
        );

        assert_eq!(
            ServerResponse::from_body(
                r#"{"error_message": "Payment failed",
                    "error": {"message": "Your card was declined."}}"#
            ),
            ServerResponse::Error {
                message: "Your card was declined.".to_string(),
                tag: COMMON_TAG.to_string()
            }
        );

        let markup = "<tbody id=\"member_list_tbody\"><tr><td>a@b.io</td></tr></tbody>";
        assert_eq!(ServerResponse::from_body(markup), ServerResponse::Fragment(markup.to_string()));
    }

    #[test]
    fn test_flags_only_read_from_data() {
        let accepted = ServerResponse::from_body(r#"{"logged_in": true, "registered": false}"#);
        assert!(accepted.flag("logged_in"));
        assert!(!accepted.flag("registered"));
        assert!(!accepted.flag("missing"));

        let redirect = ServerResponse::Redirect("/".to_string());
        assert!(!redirect.flag("logged_in"));
    }

    #[test]
    fn test_search_request_shape() {
        let body = serde_json::to_value(SearchRequest { search_value: "abc".to_string() }).unwrap();
        assert_eq!(body, serde_json::json!({ "search_value": "abc" }));
    }

    #[test]
    fn test_mailbox_request_omits_missing_flow() {
        let body = serde_json::to_value(AddEmailRequest {
            selected_flow: None,
            email_provider: Some("gmail".to_string()),
            email: "warmup@embermail.io".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "email_provider": "gmail", "email": "warmup@embermail.io" })
        );
    }
}
