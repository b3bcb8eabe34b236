use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::EmberError;

const APP_NAME: &str = "embermail";

/// Only computes the path; [`save_json_at`] creates directories when it writes.
pub fn get_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|data_dir| data_dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json_at<T: Serialize>(data: &T, file_path: &Path) -> Result<(), EmberError> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    debug!(path = %file_path.display(), "data saved");
    Ok(())
}

pub fn load_json_at<T: for<'de> Deserialize<'de> + Default>(
    file_path: &Path,
) -> Result<T, EmberError> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!(path = %file_path.display(), "data loaded");
    Ok(data)
}

pub fn load_json_or_default_at<T: for<'de> Deserialize<'de> + Default>(file_path: &Path) -> T {
    match load_json_at::<T>(file_path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", file_path.display(), e);
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), EmberError> {
    save_json_at(data, &get_data_file_path(filename))
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    load_json_or_default_at(&get_data_file_path(filename))
}
