pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod tasks;

pub use config::ClientSettings;
pub use errors::EmberError;
pub use models::{
    ServerResponse,
    COMMON_TAG,
};
