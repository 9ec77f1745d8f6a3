//! TOML-based application configuration.
//!
//! Stores:
//! - Google settings (target calendar, OAuth scopes)
//! - Generative-text settings (model name)
//! - Local paths (identifier-file directory, records file)
//!
//! Configuration is stored at `~/.config/formsync/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::data_dir;

/// Sentinel calendar id meaning "the authenticated user's primary calendar".
pub const PRIMARY_CALENDAR: &str = "primary";

/// Environment variable overriding the target calendar id.
pub const CALENDAR_ID_ENV: &str = "FORMSYNC_CALENDAR_ID";

/// Google API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Target calendar for event reconciliation. Unset means the primary
    /// calendar; the FORMSYNC_CALENDAR_ID environment variable wins over
    /// this value.
    #[serde(default)]
    pub calendar_id: Option<String>,
    /// OAuth scopes requested during authorization.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

/// Generative-text configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    #[serde(default = "default_model")]
    pub model: String,
}

/// Local state paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding identifier files. Defaults to `<data dir>/state`.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// JSONL records file. Defaults to `<data dir>/records.jsonl`.
    #[serde(default)]
    pub records_file: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/formsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/forms.body".to_string(),
        "https://www.googleapis.com/auth/calendar.events".to_string(),
    ]
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            calendar_id: None,
            scopes: default_scopes(),
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            records_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google: GoogleConfig::default(),
            genai: GenAiConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Resolve the target calendar id: environment variable, then config,
    /// then the primary-calendar sentinel.
    pub fn calendar_id(&self) -> String {
        if let Ok(id) = std::env::var(CALENDAR_ID_ENV) {
            if !id.trim().is_empty() {
                return id;
            }
        }
        self.google
            .calendar_id
            .clone()
            .unwrap_or_else(|| PRIMARY_CALENDAR.to_string())
    }

    /// Directory holding identifier files, created on demand.
    pub fn state_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.paths.state_dir {
            Some(dir) => dir.clone(),
            None => data_dir()?.join("state"),
        };
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
        Ok(dir)
    }

    /// Path of the JSONL records file.
    pub fn records_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.records_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("records.jsonl")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.genai.model, "gemini-2.5-flash");
        assert_eq!(parsed.google.scopes.len(), 2);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.google.calendar_id.is_none());
        assert!(cfg
            .google
            .scopes
            .iter()
            .any(|s| s.ends_with("forms.body")));
    }

    #[test]
    fn calendar_id_prefers_env_then_config_then_primary() {
        let mut cfg = Config::default();
        assert_eq!(cfg.calendar_id(), PRIMARY_CALENDAR);

        cfg.google.calendar_id = Some("team@group.calendar.google.com".to_string());
        assert_eq!(cfg.calendar_id(), "team@group.calendar.google.com");

        std::env::set_var(CALENDAR_ID_ENV, "env-cal-id");
        assert_eq!(cfg.calendar_id(), "env-cal-id");
        std::env::remove_var(CALENDAR_ID_ENV);
        assert_eq!(cfg.calendar_id(), "team@group.calendar.google.com");
    }

    #[test]
    fn explicit_paths_win_over_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[paths]
records_file = "/tmp/custom-records.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.records_file().unwrap(),
            PathBuf::from("/tmp/custom-records.jsonl")
        );
    }
}
