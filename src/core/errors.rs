use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmberError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("EmberError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for EmberError {
    fn from(error: std::io::Error) -> Self {
        EmberError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for EmberError {
    fn from(error: reqwest::Error) -> Self {
        EmberError::Reqwest(Box::new(error))
    }
}
