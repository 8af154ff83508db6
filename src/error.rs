//! Error types.
//!
//! The engine and its collaborators raise typed errors (`ModelLoadError`,
//! `EncodingError`, `ValidationError`, ...). At the binary edge every one of them
//! collapses into an `AppError`, which carries the process exit code:
//!
//! - `2` invalid input or configuration
//! - `3` model artifact could not be loaded
//! - `4` I/O failure while producing outputs

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Attribute;
use crate::features::FeatureKey;

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_MODEL: u8 = 3;
pub const EXIT_IO: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// The trained-parameter artifact is missing, unreadable, or structurally invalid.
///
/// Always fatal: no pipeline is built from a partially valid artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to open model artifact '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model artifact {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model artifact declares no features")]
    NoFeatures,
    #[error("feature '{0}' is declared more than once")]
    DuplicateFeature(FeatureKey),
    #[error("weight for feature '{0}' is not finite")]
    NonFiniteWeight(FeatureKey),
    #[error("intercept is not finite")]
    NonFiniteIntercept,
    #[error("scaling for '{feature}' needs finite min < max (got min={min}, max={max})")]
    InvalidScaling { feature: FeatureKey, min: f64, max: f64 },
    #[error("indicator feature '{0}' cannot carry scaling statistics")]
    ScaledIndicator(FeatureKey),
    #[error("{attribute} vocabulary is empty")]
    EmptyVocabulary { attribute: Attribute },
    #[error("{attribute} vocabulary lists '{category}' more than once")]
    DuplicateCategory { attribute: Attribute, category: String },
    #[error("{attribute} baseline '{baseline}' is not part of its vocabulary")]
    BaselineOutsideVocabulary { attribute: Attribute, baseline: String },
    #[error("{attribute} category '{category}' has no indicator feature")]
    MissingIndicator { attribute: Attribute, category: String },
    #[error("indicator feature '{0}' refers to a baseline or out-of-vocabulary category")]
    StrayIndicator(FeatureKey),
    #[error("score band table is empty")]
    EmptyBands,
    #[error("first score band starts at {lower}, expected {expected}")]
    BandsStartAbove { lower: u16, expected: u16 },
    #[error("score band lower bounds must be strictly ascending ({previous} then {next})")]
    BandsNotAscending { previous: u16, next: u16 },
    #[error("score band starting at {lower} lies above the scale maximum {max}")]
    BandAboveScale { lower: u16, max: u16 },
    #[error("score band labels must be distinct and ordered worst to best ({previous} then {next})")]
    BandLabelsOutOfOrder { previous: String, next: String },
}

/// A categorical input value the model cannot encode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unknown {attribute} '{value}'")]
    UnknownCategory { attribute: Attribute, value: String },
    #[error("{attribute} '{category}' is outside the model's trained vocabulary")]
    OutsideVocabulary { attribute: Attribute, category: String },
}

/// A numeric form field outside its business range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be {expected} (got {value})")]
    OutOfRange {
        field: &'static str,
        expected: String,
        value: String,
    },
}

/// Anything that stops a single batch row from being scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is set but empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl From<ModelLoadError> for AppError {
    fn from(value: ModelLoadError) -> Self {
        AppError::new(EXIT_MODEL, value.to_string())
    }
}

impl From<EncodingError> for AppError {
    fn from(value: EncodingError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        AppError::new(EXIT_INPUT, value.to_string())
    }
}
