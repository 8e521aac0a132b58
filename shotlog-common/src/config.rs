//! Storage-location resolution
//!
//! Priority order for where the database lives:
//! 1. Explicit directory from the embedding application
//! 2. `storage_dir` key in `shotlog.toml` under the platform config dir
//! 3. Platform-default data directory

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name inside the storage directory.
const DATABASE_FILE: &str = "shotlog.db";

/// Resolve the storage directory for the journal database and photo files.
pub fn resolve_storage_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    if let Ok(config_path) = config_file_path() {
        if let Some(dir) = storage_dir_from_config(&config_path) {
            return dir;
        }
    }

    default_storage_dir()
}

/// Full path of the journal database inside a storage directory.
pub fn database_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join(DATABASE_FILE)
}

/// Locate `shotlog.toml` in the platform config directory.
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("shotlog").join("shotlog.toml"))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("config file not found: {}", path.display())))
    }
}

fn storage_dir_from_config(config_path: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&contents).ok()?;
    config
        .get("storage_dir")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shotlog"))
        .unwrap_or_else(|| PathBuf::from("./shotlog_data"))
}
