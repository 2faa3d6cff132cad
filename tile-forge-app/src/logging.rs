//! Logging setup for the application.

use crate::config::{GlobalLogLevel, ProgressLogLevel, Settings};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Module whose level is driven by `progress_log_level`.
pub const PROGRESS_MODULE: &str = "tile_forge_app::progress";

impl From<ProgressLogLevel> for LevelFilter {
    fn from(level: ProgressLogLevel) -> Self {
        match level {
            ProgressLogLevel::Trace => Self::Trace,
            ProgressLogLevel::Debug => Self::Debug,
            ProgressLogLevel::Info => Self::Info,
            ProgressLogLevel::Warn => Self::Warn,
        }
    }
}

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Trace => Self::Trace,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Error => Self::Error,
        }
    }
}

/// Builds the logger from the resolved settings.
///
/// Module directives from `RUST_LOG` are kept; the configured global level
/// replaces its bare default and the progress module gets its own level.
pub fn logger_builder(settings: &Settings) -> Builder {
    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(env);
    builder.filter_level(settings.global_log_level.into());
    builder.filter_module(PROGRESS_MODULE, settings.progress_log_level.into());
    builder
}

/// Initializes the global logger. Later calls are ignored.
pub fn init_logger(settings: &Settings) {
    if logger_builder(settings).try_init().is_ok() {
        log::debug!(
            "Logger initialized with global log level: {:?}, progress log level: {:?}",
            settings.global_log_level,
            settings.progress_log_level
        );
    }
}
