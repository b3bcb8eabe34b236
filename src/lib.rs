//! Client-side behaviour for the Embermail campaign dashboard: debounced live
//! search over server-rendered fragments, per-form validation gates, and the thin
//! JSON API the forms submit to.

pub mod api;
pub mod core;
pub mod persistence;
pub mod search;
pub mod validation;

pub use api::ApiClient;
pub use crate::core::{
    ClientSettings,
    EmberError,
    ServerResponse,
};
pub use search::{
    LiveSearch,
    SearchTarget,
};
pub use validation::FormValidation;
