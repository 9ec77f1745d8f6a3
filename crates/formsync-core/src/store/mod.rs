pub mod id_file;
pub mod jsonl;
mod record;

pub use jsonl::{JsonlReader, Mode};
pub use record::CampaignRecord;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/formsync[-dev]/` based on FORMSYNC_ENV.
///
/// Set FORMSYNC_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FORMSYNC_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("formsync-dev")
    } else {
        base_dir.join("formsync")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
