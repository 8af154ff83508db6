//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level is used. Output
//! goes to stderr so command output on stdout stays pipeable.

use tracing_subscriber::EnvFilter;

use crate::error::TelemetryError;

pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
            value: log_level.to_string(),
            source,
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
