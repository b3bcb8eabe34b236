use std::{
    env,
    fmt::Display,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use crate::{
    core::EmberError,
    persistence,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 500;

const ENV_BASE_URL: &str = "EMBERMAIL_BASE_URL";
const ENV_CSRF_TOKEN: &str = "EMBERMAIL_CSRF_TOKEN";
const ENV_SEARCH_DELAY: &str = "EMBERMAIL_SEARCH_DELAY_MS";
const ENV_TIMEOUT: &str = "EMBERMAIL_TIMEOUT_SECS";
const ENV_DOWNLOAD_DIR: &str = "EMBERMAIL_DOWNLOAD_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub search_delay_ms: u64,
    /// `None` keeps reqwest's own default.
    pub request_timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            csrf_token: None,
            search_delay_ms: DEFAULT_SEARCH_DELAY_MS,
            request_timeout_secs: None,
            download_dir: None,
        }
    }
}

impl ClientSettings {
    /// Settings file first, then environment overrides.
    pub fn load() -> Result<Self, EmberError> {
        let mut settings: ClientSettings = persistence::load_json_or_default(SETTINGS_FILE);
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), EmberError> {
        persistence::save_json(self, SETTINGS_FILE)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            info!("{ENV_BASE_URL} set, using {base_url}");
            self.base_url = base_url;
        }
        if let Some(token) = lookup(ENV_CSRF_TOKEN) {
            self.csrf_token = Some(token);
        }
        if let Some(delay) = parse_override::<u64>(ENV_SEARCH_DELAY, lookup(ENV_SEARCH_DELAY)) {
            self.search_delay_ms = delay;
        }
        if let Some(timeout) = parse_override::<u64>(ENV_TIMEOUT, lookup(ENV_TIMEOUT)) {
            self.request_timeout_secs = Some(timeout);
        }
        if let Some(dir) = lookup(ENV_DOWNLOAD_DIR) {
            self.download_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), EmberError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(EmberError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn parse_override<T: FromStr>(key: &str, raw: Option<String>) -> Option<T>
where
    T::Err: Display,
{
    let raw = raw?;
    raw.trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, keeping configured value");
        })
        .ok()
}
