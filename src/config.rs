use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "doc-intel";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Upper bound on one model round trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "doc_intel=info,warn"
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Environment variable {key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Cannot read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

/// Connection settings for the model service.
#[derive(Clone, PartialEq)]
pub struct ExtractorConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ExtractorConfig {
    /// Settings with defaults for everything but the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `OPENAI_API_KEY` (required), `OPENAI_MODEL`, `OPENAI_BASE_URL`
    /// and `OPENAI_TIMEOUT_SECS`.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// variables already set in the process take precedence over it.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from an explicit dotenv file. Process environment
    /// variables override the file's values.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_env_file_with(path, |key| std::env::var(key).ok())
    }

    fn from_env_file_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(path)?;
        Self::from_lookup(|key| env(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Same as `from_env`, with variables supplied by `lookup`. Blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let mut config = Self::with_api_key(api_key);

        if let Some(model) = get("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(raw) = get("OPENAI_TIMEOUT_SECS") {
            config.timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "OPENAI_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            };
        }

        tracing::debug!(
            model = %config.model,
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Extractor configuration loaded"
        );

        Ok(config)
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    dotenvy::from_path_iter(path)
        .map_err(env_file_error)?
        .map(|item| item.map_err(env_file_error))
        .collect()
}
