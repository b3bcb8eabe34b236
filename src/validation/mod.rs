pub mod forms;
pub mod gate;
pub mod validators;

pub use gate::{
    ExternalReport,
    FieldError,
    FieldState,
    FormValidation,
    FormValues,
    GateRejection,
};
