//! Tile rule data model for the Wave Function Collapse generator.
//!
//! Holds everything the collapse engine consumes: tile definitions, their
//! expansion into oriented variants, predicate expressions, per-pass options
//! and the rule-file formats that produce them.

use thiserror::Error;

pub mod assets;
pub mod expr;
pub mod formats;
pub mod generator;
pub mod loader;
pub mod options;
pub mod types;
pub mod variant;

pub use assets::{AssetHandle, AssetRegistry};
pub use expr::{Bindings, Expr, ExprError, Value, Variable};
pub use generator::TileVariantFactory;
pub use options::{
    ConstraintKind, ConstraintConfig, EntropyHeuristic, GeneratorOptions, MapOptions,
    PassDefinition, RuleSet,
};
pub use types::{Adapter, Direction, Mirror, ProhibitedEmpty, RuleError, Symmetry, TileDefinition};
pub use variant::TileVariant;

/// Errors raised while loading a rule file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format (e.g., RON): {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Unsupported rule file extension: '{0}'")]
    UnsupportedFormat(String),
}

impl From<RuleError> for LoadError {
    fn from(error: RuleError) -> Self {
        Self::InvalidData(error.to_string())
    }
}
