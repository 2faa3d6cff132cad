//! Tile Forge Application Library
//!
//! This crate contains the configuration, logging, progress reporting,
//! output and visualization for the Tile Forge application.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod visualization;

// Include main.rs as a module
pub mod main;

pub use config::{AppConfig, Settings};
pub use error::AppError;

// Re-export the main function so it can be called from the root crate
pub use crate::main::main;
