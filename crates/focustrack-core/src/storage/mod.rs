mod config;
pub mod task_file;

pub use config::{Config, NotificationsConfig, StorageConfig, TimerConfig};
pub use task_file::{MemoryStore, TaskStore, TextFileStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/focustrack[-dev]/` based on FOCUSTRACK_ENV.
///
/// Set FOCUSTRACK_ENV=dev to use development data directory.
/// FOCUSTRACK_DATA_DIR, when set, is used as-is.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSTRACK_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSTRACK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("focustrack-dev")
            } else {
                base_dir.join("focustrack")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
