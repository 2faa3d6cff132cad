//! Command-line arguments and layered settings.
//!
//! Settings are resolved from, in increasing priority: built-in defaults, an
//! optional TOML file, `TILE_FORGE_*` environment variables and explicit
//! command-line flags.

use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use wfc_rules::EntropyHeuristic;

/// Prefix of environment variables that override settings.
pub const ENV_PREFIX: &str = "TILE_FORGE_";

/// Represents the different visualization modes available.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    #[default]
    None,
    /// Coloured tile grid printed after each pass.
    Terminal,
}

/// Log level for progress reports.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Log level for everything else.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Command-line arguments for the Tile Forge application.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the RON rule file defining the map, passes and tiles.
    #[arg(short, long, value_name = "FILE")]
    pub rule_file: PathBuf,

    /// Optional TOML file with default settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the random number generator. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the map width from the rule file.
    #[arg(long)]
    pub width: Option<usize>,

    /// Override the map height from the rule file.
    #[arg(long)]
    pub height: Option<usize>,

    /// Override the entropy heuristic of every pass.
    #[arg(long, value_enum)]
    pub entropy_heuristic: Option<EntropyHeuristic>,

    /// Path to save the generated layers.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Choose the visualization mode.
    #[arg(long, value_enum)]
    pub visualization_mode: Option<VisualizationMode>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    #[arg(long, value_enum)]
    pub global_log_level: Option<GlobalLogLevel>,

    #[arg(long, value_enum)]
    pub progress_log_level: Option<ProgressLogLevel>,
}

/// Fully resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_heuristic: Option<EntropyHeuristic>,
    pub output_path: PathBuf,
    pub visualization_mode: VisualizationMode,
    /// Human readable duration, e.g. `"250ms"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_progress_interval: Option<String>,
    pub global_log_level: GlobalLogLevel,
    pub progress_log_level: ProgressLogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            width: None,
            height: None,
            entropy_heuristic: None,
            output_path: PathBuf::from("output.txt"),
            visualization_mode: VisualizationMode::None,
            report_progress_interval: None,
            global_log_level: GlobalLogLevel::Info,
            progress_log_level: ProgressLogLevel::Info,
        }
    }
}

impl Settings {
    /// Parses the progress interval.
    pub fn progress_interval(&self) -> Result<Option<Duration>, AppError> {
        self.report_progress_interval
            .as_deref()
            .map(|raw| {
                humantime::parse_duration(raw).map_err(|source| AppError::InvalidDuration {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()
    }
}

/// Flags given explicitly on the command line; absent ones are not serialized.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entropy_heuristic: Option<EntropyHeuristic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visualization_mode: Option<VisualizationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_progress_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    global_log_level: Option<GlobalLogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress_log_level: Option<ProgressLogLevel>,
}

impl AppConfig {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            seed: self.seed,
            width: self.width,
            height: self.height,
            entropy_heuristic: self.entropy_heuristic,
            output_path: self.output_path.clone(),
            visualization_mode: self.visualization_mode,
            report_progress_interval: self
                .report_progress_interval
                .map(|d| humantime::format_duration(d).to_string()),
            global_log_level: self.global_log_level,
            progress_log_level: self.progress_log_level,
        }
    }

    /// The provider stack, lowest priority first.
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = &self.config {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(self.overrides()))
    }

    /// Resolves the final settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingConfigFile` if `--config` names a missing file,
    /// or `AppError::Config` if a layer holds invalid values.
    pub fn resolve(&self) -> Result<Settings, AppError> {
        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(AppError::MissingConfigFile(path.clone()));
            }
        }
        Ok(self.figment().extract()?)
    }
}
