//! The constraint pipeline.
//!
//! Every built-in constraint is a variant of the closed [`Constraint`] enum
//! and shares one lifecycle: `initialise` at prepare time, `check` per
//! candidate, `after_choice` on commit and `revert` on rollback. A candidate is
//! admissible only when every enabled constraint accepts it.

mod adjacency;
mod limit;
mod placement;

pub use limit::LimitConstraint;
pub use placement::PlacementTable;

use crate::grid::Grid;
use crate::WfcError;
use log::trace;
use std::sync::Arc;
use wfc_rules::{ConstraintKind, ConstraintConfig, MapOptions, TileDefinition, TileVariant};

/// Read-only view the constraints check candidates against.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub grid: &'a Grid,
    pub variants: &'a [TileVariant],
}

impl<'a> CheckContext<'a> {
    pub const fn new(grid: &'a Grid, variants: &'a [TileVariant]) -> Self {
        Self { grid, variants }
    }

    /// The committed variant of `cell`, if it is collapsed.
    #[inline]
    pub fn placed(&self, cell: usize) -> Option<&'a TileVariant> {
        self.grid.cell(cell).variant.map(|v| &self.variants[v])
    }
}

/// One built-in constraint with its solve-wide state.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Each side must be the reversed pattern of the placed neighbour's facing side.
    Adapter,
    /// A tile with mandatory adapters needs a placed neighbour on one of them.
    MandatoryAdapter,
    /// Caps placements per definition, with an optional escape valve.
    Limit(LimitConstraint),
    /// Last-resort tiles pass only when nothing regular is live.
    OnlyAllowedIfNoValidTiles,
    /// Placed neighbours must carry a category the candidate accepts.
    Category,
    /// Rejects edges, unused or uncollapsed neighbours the tile prohibits.
    EmptyPlacement,
    /// Rejects a copy of the same definition on sides that forbid it.
    ConnectToSelf,
    /// Per-cell placement predicates, evaluated once at prepare time.
    PlacementRule(PlacementTable),
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        match kind {
            ConstraintKind::Adapter => Self::Adapter,
            ConstraintKind::MandatoryAdapter => Self::MandatoryAdapter,
            ConstraintKind::Limit => Self::Limit(LimitConstraint::default()),
            ConstraintKind::OnlyAllowedIfNoValidTiles => Self::OnlyAllowedIfNoValidTiles,
            ConstraintKind::Category => Self::Category,
            ConstraintKind::EmptyPlacement => Self::EmptyPlacement,
            ConstraintKind::ConnectToSelf => Self::ConnectToSelf,
            ConstraintKind::PlacementRule => Self::PlacementRule(PlacementTable::default()),
        }
    }

    pub const fn kind(&self) -> ConstraintKind {
        match self {
            Self::Adapter => ConstraintKind::Adapter,
            Self::MandatoryAdapter => ConstraintKind::MandatoryAdapter,
            Self::Limit(_) => ConstraintKind::Limit,
            Self::OnlyAllowedIfNoValidTiles => ConstraintKind::OnlyAllowedIfNoValidTiles,
            Self::Category => ConstraintKind::Category,
            Self::EmptyPlacement => ConstraintKind::EmptyPlacement,
            Self::ConnectToSelf => ConstraintKind::ConnectToSelf,
            Self::PlacementRule(_) => ConstraintKind::PlacementRule,
        }
    }

    /// Whether the verdict depends on which other candidates are still live.
    pub const fn needs_live_set(&self) -> bool {
        matches!(self, Self::Limit(_) | Self::OnlyAllowedIfNoValidTiles)
    }

    /// Clears any state left from a previous solve.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::Expression` if a placement rule cannot be evaluated.
    pub fn initialise(
        &mut self,
        definitions: &[Arc<TileDefinition>],
        map: MapOptions,
    ) -> Result<(), WfcError> {
        match self {
            Self::Limit(limit) => {
                limit.initialise(definitions);
                Ok(())
            }
            Self::PlacementRule(table) => table.initialise(definitions, map),
            _ => Ok(()),
        }
    }

    /// Whether `candidate` may be placed in `cell`.
    ///
    /// `live` is the set of candidates still admissible for the cell when this
    /// constraint runs; only set-dependent constraints look at it.
    pub fn check(&self, ctx: &CheckContext<'_>, cell: usize, candidate: usize, live: &[usize]) -> bool {
        let variant = &ctx.variants[candidate];
        match self {
            Self::Adapter => adjacency::adapters_fit(ctx, cell, variant),
            Self::MandatoryAdapter => adjacency::mandatory_adapter_met(ctx, cell, variant),
            Self::Limit(limit) => limit.check(ctx, candidate, live),
            Self::OnlyAllowedIfNoValidTiles => only_if_no_valid_tiles(ctx, candidate, live),
            Self::Category => adjacency::categories_connect(ctx, cell, variant),
            Self::EmptyPlacement => adjacency::empty_neighbours_allowed(ctx, cell, variant),
            Self::ConnectToSelf => adjacency::self_connection_allowed(ctx, cell, variant),
            Self::PlacementRule(table) => table.allows(variant.definition_index(), cell),
        }
    }

    pub fn after_choice(&mut self, variant: &TileVariant) {
        if let Self::Limit(limit) = self {
            limit.consume(variant.definition_index());
        }
    }

    pub fn revert(&mut self, variant: &TileVariant) {
        if let Self::Limit(limit) = self {
            limit.restore(variant.definition_index());
        }
    }
}

/// A tile flagged as last resort passes only when every other live candidate
/// is a last resort too.
fn only_if_no_valid_tiles(ctx: &CheckContext<'_>, candidate: usize, live: &[usize]) -> bool {
    if !ctx.variants[candidate].definition().only_allowed_if_no_valid_tiles {
        return true;
    }
    live.iter()
        .filter(|&&other| other != candidate)
        .all(|&other| ctx.variants[other].definition().only_allowed_if_no_valid_tiles)
}

#[derive(Debug, Clone)]
struct OrderedConstraint {
    order: i32,
    constraint: Constraint,
}

/// Enabled constraints sorted by ascending order, ties kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintPipeline {
    constraints: Vec<OrderedConstraint>,
}

impl ConstraintPipeline {
    pub fn from_configs(configs: &[ConstraintConfig]) -> Self {
        let mut constraints: Vec<OrderedConstraint> = configs
            .iter()
            .map(|config| OrderedConstraint {
                order: config.order(),
                constraint: Constraint::new(config.kind),
            })
            .collect();
        // `sort_by_key` is stable, so equal orders keep declaration order.
        constraints.sort_by_key(|entry| entry.order);
        Self { constraints }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraint kinds in evaluation order.
    pub fn kinds(&self) -> impl Iterator<Item = ConstraintKind> + '_ {
        self.constraints.iter().map(|entry| entry.constraint.kind())
    }

    /// The Limit constraint, if enabled.
    pub fn limit(&self) -> Option<&LimitConstraint> {
        self.constraints.iter().find_map(|entry| match &entry.constraint {
            Constraint::Limit(limit) => Some(limit),
            _ => None,
        })
    }

    /// # Errors
    ///
    /// Propagates the first constraint initialisation failure.
    pub fn initialise(
        &mut self,
        definitions: &[Arc<TileDefinition>],
        map: MapOptions,
    ) -> Result<(), WfcError> {
        for entry in &mut self.constraints {
            entry.constraint.initialise(definitions, map)?;
        }
        Ok(())
    }

    /// Filters `pool` down to the variants every constraint accepts for `cell`.
    ///
    /// Position-only constraints run first over the whole pool. The
    /// set-dependent ones then judge every survivor against one shared live
    /// set, which is refined until it no longer changes, so their relative
    /// order has no effect. Enumeration order of `pool` is preserved.
    pub fn admissible(&self, ctx: &CheckContext<'_>, cell: usize, pool: &[usize]) -> Vec<usize> {
        let survivors: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&candidate| {
                self.constraints
                    .iter()
                    .filter(|entry| !entry.constraint.needs_live_set())
                    .all(|entry| {
                        let accepted = entry.constraint.check(ctx, cell, candidate, pool);
                        if !accepted {
                            trace!(
                                "{:?} rejected '{}' at cell {}",
                                entry.constraint.kind(),
                                ctx.variants[candidate].name(),
                                cell
                            );
                        }
                        accepted
                    })
            })
            .collect();

        let set_dependent: Vec<&Constraint> = self
            .constraints
            .iter()
            .map(|entry| &entry.constraint)
            .filter(|constraint| constraint.needs_live_set())
            .collect();
        if set_dependent.is_empty() {
            return survivors;
        }

        let mut live = survivors.clone();
        // Each round shrinks or settles the set in practice; the bound only
        // guards against a cycle between two sets.
        for _ in 0..=survivors.len() + 1 {
            let next: Vec<usize> = survivors
                .iter()
                .copied()
                .filter(|&candidate| {
                    set_dependent
                        .iter()
                        .all(|constraint| constraint.check(ctx, cell, candidate, &live))
                })
                .collect();
            if next == live {
                return live;
            }
            live = next;
        }
        trace!("Live set of cell {} did not settle; using the last round", cell);
        live
    }

    pub fn after_choice(&mut self, variant: &TileVariant) {
        for entry in &mut self.constraints {
            entry.constraint.after_choice(variant);
        }
    }

    pub fn revert(&mut self, variant: &TileVariant) {
        for entry in &mut self.constraints {
            entry.constraint.revert(variant);
        }
    }
}
