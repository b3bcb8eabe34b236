//! Field sets of every form the client gates. Field names double as the error tags
//! the server uses, so server-side and client-side errors land in the same slot.

use super::{
    gate::FormValidation,
    validators::{
        email,
        password_policy,
        required,
        strong_password,
        INVALID_EMAIL_MESSAGE,
    },
};

pub const INCOMPLETE_FORM_MESSAGE: &str = "All fields must be completed.";
pub const TEMPLATE_FIELDS_MESSAGE: &str = "All Fields are Required.";
pub const PASSWORD_FIELDS_MESSAGE: &str = "Both Password Fields are Required.";
pub const WEAK_PASSWORD_MESSAGE: &str = "Password should contain at least one digit, lowercase, \
uppercase, special character and length should be between 8-32.";

pub fn signup_form() -> FormValidation {
    FormValidation::new("signup")
        .field("email", email("Please, Enter valid email."))
        .field("password", strong_password("Please, Enter password."))
}

pub fn login_form() -> FormValidation {
    FormValidation::new("login")
        .field("email", email("Please, Enter Valid Email."))
        .field("password", required("Please, Enter Password."))
}

pub fn password_reset_form() -> FormValidation {
    FormValidation::new("password_reset").field("email", email("Please, Enter email address."))
}

pub fn password_reset_confirm_form() -> FormValidation {
    FormValidation::new("password_reset_confirm")
        .field("password", strong_password("Please, Enter password."))
}

pub fn contact_form() -> FormValidation {
    FormValidation::new("contact")
        .field("email", email("Email Field is Required."))
        .field("message", required("Contact Message is Required."))
}

/// Billing details plus the three card elements, which report their own validity.
pub fn payment_form() -> FormValidation {
    FormValidation::new("payment")
        .field("full_name", required("Enter full name or Company."))
        .field("city", required("Enter city name."))
        .field("zip", required("Enter Zip."))
        .external("card_number", "Enter card number.", None)
        .external("card_expiry", "Enter card expiry date.", Some("Your card was expired."))
        .external("card_cvv", "Enter card CVC.", None)
        .with_summary(INCOMPLETE_FORM_MESSAGE)
}

/// Add and edit share the same two fields.
pub fn template_form() -> FormValidation {
    FormValidation::new("template")
        .field("name", required(TEMPLATE_FIELDS_MESSAGE))
        .field("subject", required(TEMPLATE_FIELDS_MESSAGE))
}

pub fn thread_form() -> FormValidation {
    FormValidation::new("thread").field("body", required("Thread Body field is required."))
}

pub fn add_email_form() -> FormValidation {
    FormValidation::new("add_email").field("email", email(INVALID_EMAIL_MESSAGE))
}

pub fn app_password_form() -> FormValidation {
    FormValidation::new("app_password")
        .field("app_password", required("Enter Valid App Password."))
}

pub fn profile_name_form() -> FormValidation {
    FormValidation::new("profile_name").field("name", required("Name Field is Required."))
}

pub fn change_password_form() -> FormValidation {
    FormValidation::new("change_password")
        .field("current_password", required(PASSWORD_FIELDS_MESSAGE))
        .field("new_password", password_policy(PASSWORD_FIELDS_MESSAGE, WEAK_PASSWORD_MESSAGE))
}
