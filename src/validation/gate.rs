use std::fmt;

use super::validators::Validator;
use crate::core::COMMON_TAG;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Unvalidated,
    Invalid(String),
    Valid,
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldState::Valid)
    }
}

/// A message bound to the error slot of one field (or the form-wide `common` slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    /// Element id the message is rendered into.
    pub fn slot(&self) -> String {
        format!("{}_error", self.field)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Why a submit click did not go through: every failing field, at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRejection {
    pub errors: Vec<FieldError>,
    pub summary: Option<FieldError>,
}

impl GateRejection {
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }
}

/// Change report from a component that validates its own input (card elements).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalReport {
    pub complete: bool,
    pub error: Option<String>,
}

enum FieldCheck {
    Local(Validator),
    External { required_message: String, error_message: Option<String> },
}

struct Field {
    name: String,
    check: FieldCheck,
    value: String,
    state: FieldState,
}

/// Values of a form that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues(Vec<(String, String)>);

impl FormValues {
    pub fn get(&self, field: &str) -> &str {
        self.0.iter().find(|(name, _)| name == field).map(|(_, value)| value.as_str()).unwrap_or("")
    }
}

/// Validity state of one form instance.
///
/// Change events update only their own field. `submit` reads the cached states and
/// validates, once, every field that never saw a change event, so an untouched
/// required field cannot slip through.
pub struct FormValidation {
    name: &'static str,
    fields: Vec<Field>,
    summary: Option<String>,
}

impl FormValidation {
    pub fn new(name: &'static str) -> Self {
        Self { name, fields: Vec::new(), summary: None }
    }

    pub fn field(mut self, name: &str, validator: Validator) -> Self {
        self.push(name, FieldCheck::Local(validator));
        self
    }

    /// A field validated elsewhere. `error_message` replaces whatever error text the
    /// component reports.
    pub fn external(
        mut self,
        name: &str,
        required_message: &str,
        error_message: Option<&str>,
    ) -> Self {
        self.push(
            name,
            FieldCheck::External {
                required_message: required_message.to_string(),
                error_message: error_message.map(str::to_string),
            },
        );
        self
    }

    /// Extra message for the `common` slot whenever the gate rejects.
    pub fn with_summary(mut self, message: &str) -> Self {
        self.summary = Some(message.to_string());
        self
    }

    fn push(&mut self, name: &str, check: FieldCheck) {
        self.fields.push(Field {
            name: name.to_string(),
            check,
            value: String::new(),
            state: FieldState::Unvalidated,
        });
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// A change event for a locally validated field. Returns `None` for unknown or
    /// external fields.
    pub fn change(&mut self, name: &str, value: &str) -> Option<&FieldState> {
        let field = self.find_mut(name)?;
        let FieldCheck::Local(validator) = &field.check else {
            return None;
        };

        field.state = match validator(value) {
            Ok(()) => FieldState::Valid,
            Err(message) => FieldState::Invalid(message),
        };
        field.value = value.to_string();
        Some(&field.state)
    }

    pub fn report_external(&mut self, name: &str, report: ExternalReport) -> Option<&FieldState> {
        let field = self.find_mut(name)?;
        let FieldCheck::External { required_message, error_message } = &field.check else {
            return None;
        };

        field.state = match (report.error, report.complete) {
            (Some(error), _) => FieldState::Invalid(error_message.clone().unwrap_or(error)),
            (None, true) => FieldState::Valid,
            (None, false) => FieldState::Invalid(required_message.clone()),
        };
        Some(&field.state)
    }

    pub fn state(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.name == name).map(|field| &field.state)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluated at the submit click.
    pub fn submit(&mut self) -> Result<FormValues, GateRejection> {
        let mut errors = Vec::new();

        for field in &mut self.fields {
            if field.state == FieldState::Unvalidated {
                if let FieldCheck::Local(validator) = &field.check {
                    field.state = match validator(&field.value) {
                        Ok(()) => FieldState::Valid,
                        Err(message) => FieldState::Invalid(message),
                    };
                }
            }

            match (&field.state, &field.check) {
                (FieldState::Valid, _) => {}
                (FieldState::Invalid(message), _) => {
                    errors.push(FieldError::new(&field.name, message));
                }
                (FieldState::Unvalidated, FieldCheck::External { required_message, .. }) => {
                    errors.push(FieldError::new(&field.name, required_message));
                }
                (FieldState::Unvalidated, FieldCheck::Local(_)) => {
                    unreachable!("local fields are validated above")
                }
            }
        }

        if errors.is_empty() {
            return Ok(FormValues(
                self.fields.iter().map(|field| (field.name.clone(), field.value.clone())).collect(),
            ));
        }

        tracing::debug!(form = self.name, failing = errors.len(), "submit blocked by validation");
        let summary = self.summary.as_ref().map(|message| FieldError::new(COMMON_TAG, message));
        Err(GateRejection { errors, summary })
    }
}
