//! Runtime settings resolved from the environment.
//!
//! `.env` is read first (if present), then:
//!
//! - `CREDIT_MODEL_PATH`: model artifact (default: the illustrative artifact built
//!   into the binary)
//! - `CREDIT_LOG_LEVEL`: tracing filter when `RUST_LOG` is unset (default `warn`)
//!
//! The CLI `--model` flag overrides the artifact path.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const MODEL_PATH_VAR: &str = "CREDIT_MODEL_PATH";
pub const LOG_LEVEL_VAR: &str = "CREDIT_LOG_LEVEL";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` selects the built-in illustrative artifact.
    pub model_path: Option<PathBuf>,
    pub log_level: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = match lookup(MODEL_PATH_VAR) {
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Empty { name: MODEL_PATH_VAR }),
            Some(v) => Some(PathBuf::from(v.trim())),
            None => None,
        };

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(v) if v.trim().is_empty() => return Err(ConfigError::Empty { name: LOG_LEVEL_VAR }),
            Some(v) => v.trim().to_string(),
            None => DEFAULT_LOG_LEVEL.to_string(),
        };

        Ok(Self { model_path, log_level })
    }

    pub fn with_model_override(mut self, model: Option<PathBuf>) -> Self {
        if let Some(path) = model {
            self.model_path = Some(path);
        }
        self
    }
}
