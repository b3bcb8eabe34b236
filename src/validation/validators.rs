use std::{
    fmt,
    sync::OnceLock,
};

use regex::Regex;

pub const INVALID_EMAIL_MESSAGE: &str = "Please, Enter Valid Email.";
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*";
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 32;

/// Field check: `Ok` or the message to show next to the field.
pub type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*",
            r"@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$"
        ))
        .unwrap()
    });
    re.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length,
    AllowedCharacters,
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::Length => write!(
                f,
                "Password must be {PASSWORD_MIN_LEN} to {PASSWORD_MAX_LEN} characters long."
            ),
            PasswordRule::AllowedCharacters => write!(
                f,
                "Password may only contain letters, digits and {PASSWORD_SPECIALS}."
            ),
            PasswordRule::Lowercase => write!(f, "Password needs at least one lowercase letter."),
            PasswordRule::Uppercase => write!(f, "Password needs at least one uppercase letter."),
            PasswordRule::Digit => write!(f, "Password needs at least one digit."),
            PasswordRule::Special => {
                write!(f, "Password needs at least one special character ({PASSWORD_SPECIALS}).")
            }
        }
    }
}

/// Every rule `password` breaks, in a fixed order.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    let is_special = |c: char| PASSWORD_SPECIALS.contains(c);
    let mut violations = Vec::new();

    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        violations.push(PasswordRule::Length);
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric() || is_special(c)) {
        violations.push(PasswordRule::AllowedCharacters);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordRule::Digit);
    }
    if !password.chars().any(is_special) {
        violations.push(PasswordRule::Special);
    }

    violations
}

pub fn required(message: &str) -> Validator {
    let message = message.to_string();
    Box::new(move |value: &str| if value.trim().is_empty() { Err(message.clone()) } else { Ok(()) })
}

pub fn email(required_message: &str) -> Validator {
    let required_message = required_message.to_string();
    Box::new(move |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err(required_message.clone())
        } else if !is_valid_email(value) {
            Err(INVALID_EMAIL_MESSAGE.to_string())
        } else {
            Ok(())
        }
    })
}

pub fn strong_password(required_message: &str) -> Validator {
    let required_message = required_message.to_string();
    Box::new(move |value: &str| {
        if value.is_empty() {
            return Err(required_message.clone());
        }
        match password_violations(value).first() {
            Some(rule) => Err(rule.to_string()),
            None => Ok(()),
        }
    })
}

/// Same rules as [`strong_password`], reported as one fixed sentence.
pub fn password_policy(required_message: &str, weak_message: &str) -> Validator {
    let required_message = required_message.to_string();
    let weak_message = weak_message.to_string();
    Box::new(move |value: &str| {
        if value.is_empty() {
            Err(required_message.clone())
        } else if !password_violations(value).is_empty() {
            Err(weak_message.clone())
        } else {
            Ok(())
        }
    })
}
