//! Core library for the Wave Function Collapse tile generator.
//! Holds the cell grid, the constraint pipeline, the stepwise collapse solver
//! and the orchestration of masked multi-pass solves.

use thiserror::Error;
use wfc_rules::{ExprError, RuleError};

// Module declarations
/// Constraint pipeline consulted for every candidate variant.
pub mod constraints;
/// Entropy heuristics and lowest-entropy cell selection.
pub mod entropy;
/// The single-pass collapse solver.
pub mod generator;
/// Flat grid of cells with cardinal neighbour wiring.
pub mod grid;
/// Sequential execution of masked passes.
pub mod passes;

// Re-export core public items

pub use crate::constraints::{CheckContext, Constraint, ConstraintPipeline};
pub use crate::entropy::{EntropyCalculator, INITIALISE_PRIORITY_STEP};
pub use crate::generator::{CellSnapshot, Generator, GeneratorState, Statistics};
pub use crate::grid::{Grid, GridCell, Point, UNSET_ENTROPY};
pub use crate::passes::PassRunner;

/// Configuration errors raised while preparing a solve.
///
/// Running out of fallback attempts is not an error; it is reported as
/// [`NextStepResult::Failed`].
#[derive(Error, Debug)]
pub enum WfcError {
    /// A tile that can never be placed: zero limit and no permission to exceed it.
    #[error("Tile '{0}' has a limit of 0 and may not exceed it")]
    ZeroLimit(String),
    /// A mask names a pass that does not run before the masked one.
    #[error("Pass {pass} is masked by pass {source_pass}, which has not been executed")]
    MaskReferencesUnexecutedPass { pass: usize, source_pass: usize },
    /// A mask names a tile the referenced pass does not define.
    #[error("Pass {pass} is masked by unknown tile '{tile}' of pass {source_pass}")]
    UnknownMaskTile {
        pass: usize,
        source_pass: usize,
        tile: String,
    },
    /// The pass defines no tile variants at all.
    #[error("Pass '{0}' has no tile variants")]
    EmptyVariantPool(String),
    /// The fallback radius formula produced a negative value.
    #[error("Fallback radius evaluated to {0}, expected a non-negative value")]
    NegativeRadius(i64),
    /// A placement, initialisation or radius expression failed to evaluate.
    #[error("Expression error in {context}: {source}")]
    Expression {
        context: String,
        #[source]
        source: ExprError,
    },
    /// The tile definitions of a pass could not be expanded.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
    /// A step was requested before the solver was prepared.
    #[error("Generator has not been prepared")]
    NotPrepared,
}

/// Outcome of one solver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextStepResult {
    /// Work remains; call again.
    Continue,
    /// Every live cell holds a variant.
    Complete,
    /// Fallback attempts are exhausted.
    Failed,
}

impl NextStepResult {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Continue)
    }
}
