use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving application settings.
///
/// Rule loading and solver errors travel as `anyhow` errors with context.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration file not found: {0:?}")]
    MissingConfigFile(PathBuf),

    #[error("Invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}
