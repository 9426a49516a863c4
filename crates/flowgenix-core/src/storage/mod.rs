mod config;
mod store;

pub use config::{BlockerConfig, CameraConfig, Config, LogConfig, RemindersConfig};
pub use store::{Store, StoreKey};

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns `~/.config/flowgenix[-dev]/` based on FLOWGENIX_ENV.
///
/// Set FLOWGENIX_ENV=dev to use the development data directory.
/// FLOWGENIX_HOME, when set, wins over both.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("FLOWGENIX_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FLOWGENIX_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("flowgenix-dev")
            } else {
                base_dir.join("flowgenix")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
