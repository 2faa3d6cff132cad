//! The collapse solver for one pass.
//!
//! A [`Generator`] owns its grid, variant pool, constraint pipeline and
//! fallback state. It moves through `Idle`, `Prepared` and `Stepping` until a
//! step reports `Complete` or `Failed`:
//!
//! 1. pick the lowest-entropy uncollapsed cell, breaking ties at random;
//! 2. filter its candidate pool through every constraint;
//! 3. commit a weighted random choice, or roll back the surrounding cells when
//!    nothing is admissible.

use crate::constraints::{CheckContext, ConstraintPipeline};
use crate::entropy::{select_lowest_entropy_cell, EntropyCalculator, INITIALISE_PRIORITY_STEP};
use crate::grid::{Grid, Point};
use crate::{NextStepResult, WfcError};
use bitvec::prelude::{BitSlice, Lsb0};
use log::{debug, info, trace, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use wfc_rules::{
    AssetRegistry, Bindings, GeneratorOptions, MapOptions, PassDefinition, TileDefinition,
    TileVariant, TileVariantFactory,
};

/// Lifecycle of a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorState {
    /// Built, or last `prepare` failed. Stepping is an error.
    Idle,
    /// Grid, pools and constraints are reset; no step has run yet.
    Prepared,
    /// At least one step has run and cells are still uncollapsed.
    Stepping,
    /// Every live cell is collapsed.
    Complete,
    /// A cell had no admissible variant and no fallback attempts were left.
    Failed,
}

/// Counters describing the current solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Calls to `execute_next_step` that did work.
    pub steps: u64,
    /// Successful placements, including ones later undone.
    pub placements: u64,
    /// Radius rollbacks performed.
    pub rollbacks: u64,
    /// Cells cleared by all rollbacks together.
    pub reverted_cells: u64,
    /// Cells currently holding a variant.
    pub collapsed_cells: usize,
    /// Cells that take part in this pass.
    pub live_cells: usize,
}

/// Read-only copy of one cell, as handed to renderers and later passes.
#[derive(Debug, Clone)]
pub struct CellSnapshot {
    pub point: Point,
    /// The placed variant, `None` while uncollapsed.
    pub variant: Option<TileVariant>,
    pub entropy: i64,
    /// Masked out of this pass.
    pub unused: bool,
}

impl CellSnapshot {
    pub const fn is_collapsed(&self) -> bool {
        self.variant.is_some()
    }

    /// Name of the placed tile definition, if any.
    pub fn tile_name(&self) -> Option<&str> {
        self.variant.as_ref().map(TileVariant::name)
    }
}

/// Rollback budget and radius schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fallback {
    /// `None` is unlimited.
    remaining_attempts: Option<u32>,
    initial_radius: usize,
    radius: usize,
    /// Successful placements left before the radius shrinks.
    steps_until_reduce: u32,
}

/// Single-pass Wave Function Collapse solver.
#[derive(Debug, Clone)]
pub struct Generator {
    name: String,
    map: MapOptions,
    options: GeneratorOptions,
    definitions: Vec<Arc<TileDefinition>>,
    variants: Vec<TileVariant>,
    /// Every variant index, the pool of cells no initialisation rule matched.
    full_pool: Vec<usize>,
    /// Per-cell restricted pools from initialisation rules.
    pools: Vec<Option<Vec<usize>>>,
    pipeline: ConstraintPipeline,
    entropy: EntropyCalculator,
    grid: Grid,
    uncollapsed: BTreeSet<usize>,
    fallback: Fallback,
    state: GeneratorState,
    statistics: Statistics,
}

impl Generator {
    /// Expands the pass's tile definitions and builds an idle solver.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::Rule` if a definition cannot be expanded.
    pub fn new(
        map: MapOptions,
        pass: &PassDefinition,
        assets: &AssetRegistry,
    ) -> Result<Self, WfcError> {
        let (definitions, variants) = TileVariantFactory::new(assets).expand_all(&pass.tiles)?;
        let full_pool = (0..variants.len()).collect();
        Ok(Self {
            name: pass.name.clone(),
            map,
            pipeline: ConstraintPipeline::from_configs(&pass.options.constraints),
            entropy: EntropyCalculator::new(pass.options.entropy_heuristic),
            options: pass.options.clone(),
            definitions,
            variants,
            full_pool,
            pools: Vec::new(),
            grid: Grid::from_map(map),
            uncollapsed: BTreeSet::new(),
            fallback: Fallback::default(),
            state: GeneratorState::Idle,
            statistics: Statistics::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn variants(&self) -> &[TileVariant] {
        &self.variants
    }

    pub fn definitions(&self) -> &[Arc<TileDefinition>] {
        &self.definitions
    }

    pub const fn pipeline(&self) -> &ConstraintPipeline {
        &self.pipeline
    }

    pub const fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Current rollback radius.
    pub const fn fallback_radius(&self) -> usize {
        self.fallback.radius
    }

    pub const fn remaining_fallback_attempts(&self) -> Option<u32> {
        self.fallback.remaining_attempts
    }

    /// Resets all solve state and builds a fresh grid.
    ///
    /// `live` marks the cells that take part in this pass; every other cell
    /// becomes unused. `None` keeps the whole map live.
    ///
    /// # Errors
    ///
    /// Configuration errors: an unplaceable zero-limit tile, an empty variant
    /// pool, a failing rule expression or a negative fallback radius.
    pub fn prepare(&mut self, live: Option<&BitSlice<usize, Lsb0>>) -> Result<(), WfcError> {
        self.state = GeneratorState::Idle;
        if let Some(definition) = self.definitions.iter().find(|d| d.is_unplaceable()) {
            return Err(WfcError::ZeroLimit(definition.name.clone()));
        }
        if self.variants.is_empty() {
            return Err(WfcError::EmptyVariantPool(self.name.clone()));
        }

        self.pipeline.initialise(&self.definitions, self.map)?;
        let radius = self.evaluate_radius()?;
        self.fallback = Fallback {
            remaining_attempts: self.options.fallback_attempts,
            initial_radius: radius,
            radius,
            steps_until_reduce: self.options.steps_to_reduce_radius,
        };

        self.grid = Grid::from_map(self.map);
        self.pools = vec![None; self.grid.len()];
        self.uncollapsed.clear();
        for index in 0..self.grid.len() {
            let unused = live.is_some_and(|mask| !mask.get(index).map_or(false, |bit| *bit));
            let (baseline, pool) = self.initial_priority(index)?;
            let cell = self.grid.cell_mut(index);
            cell.unused = unused;
            cell.baseline_entropy = baseline;
            cell.entropy = baseline;
            self.pools[index] = pool;
            if !unused {
                self.uncollapsed.insert(index);
            }
        }

        self.statistics = Statistics {
            live_cells: self.uncollapsed.len(),
            ..Statistics::default()
        };
        self.state = GeneratorState::Prepared;
        info!(
            "Prepared pass '{}': {} variants, {} live cells, fallback radius {}",
            self.name,
            self.variants.len(),
            self.uncollapsed.len(),
            radius
        );
        Ok(())
    }

    fn evaluate_radius(&self) -> Result<usize, WfcError> {
        let bindings = Bindings::for_map(self.map.width, self.map.height);
        let radius = self
            .options
            .fallback_radius
            .eval_int(&bindings)
            .map_err(|source| WfcError::Expression {
                context: "fallback radius".to_owned(),
                source,
            })?;
        usize::try_from(radius).map_err(|_| WfcError::NegativeRadius(radius))
    }

    /// Baseline entropy and restricted pool of a cell from the initialisation rules.
    fn initial_priority(&self, index: usize) -> Result<(i64, Option<Vec<usize>>), WfcError> {
        let point = self.grid.cell(index).point;
        let bindings = Bindings::for_cell(point.x, point.y, self.map.width, self.map.height);
        let count = self.definitions.len();
        let mut baseline: i64 = 0;
        let mut matched = Vec::new();
        for (position, definition) in self.definitions.iter().enumerate() {
            let Some(rule) = definition.initialisation_rule.as_ref() else {
                continue;
            };
            let hit = rule
                .eval_bool(&bindings)
                .map_err(|source| WfcError::Expression {
                    context: format!("initialisation rule of '{}'", definition.name),
                    source,
                })?;
            if hit {
                let rank = i64::try_from(count - position).unwrap_or(i64::MAX);
                baseline = baseline.saturating_sub(rank.saturating_mul(INITIALISE_PRIORITY_STEP));
                matched.push(position);
            }
        }
        if matched.is_empty() {
            return Ok((baseline, None));
        }
        let pool = self
            .full_pool
            .iter()
            .copied()
            .filter(|&v| matched.contains(&self.variants[v].definition_index()))
            .collect();
        Ok((baseline, Some(pool)))
    }

    fn pool(&self, cell: usize) -> &[usize] {
        self.pools
            .get(cell)
            .and_then(Option::as_deref)
            .unwrap_or(&self.full_pool)
    }

    /// Variants every constraint currently accepts for `cell`, in pool order.
    pub fn admissible(&self, cell: usize) -> Vec<usize> {
        let ctx = CheckContext::new(&self.grid, &self.variants);
        self.pipeline.admissible(&ctx, cell, self.pool(cell))
    }

    fn recompute_entropy(&mut self, cell: usize) {
        let entropy = self.entropy.entropy(&self.grid, &self.variants, cell, || {
            self.admissible(cell).len()
        });
        self.grid.cell_mut(cell).entropy = entropy;
    }

    /// Runs one step of the solve.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::NotPrepared` if [`Self::prepare`] has not succeeded.
    pub fn execute_next_step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<NextStepResult, WfcError> {
        match self.state {
            GeneratorState::Idle => return Err(WfcError::NotPrepared),
            GeneratorState::Complete => return Ok(NextStepResult::Complete),
            GeneratorState::Failed => return Ok(NextStepResult::Failed),
            GeneratorState::Prepared | GeneratorState::Stepping => {}
        }

        let Some(cell) = select_lowest_entropy_cell(&self.grid, &self.uncollapsed, rng) else {
            return Ok(self.finish(NextStepResult::Complete));
        };
        self.state = GeneratorState::Stepping;
        self.statistics.steps += 1;

        let admissible = self.admissible(cell);
        if admissible.is_empty() {
            if self.fallback.remaining_attempts == Some(0) {
                warn!(
                    "Pass '{}' failed: no admissible tile at {:?} and no fallback attempts left",
                    self.name,
                    self.grid.cell(cell).point
                );
                return Ok(self.finish(NextStepResult::Failed));
            }
            self.revert_tiles_in_radius(cell);
            return Ok(NextStepResult::Continue);
        }

        self.advance_radius_schedule();
        let chosen = self.choose_variant(&admissible, rng);
        self.commit(cell, chosen);

        if self.uncollapsed.is_empty() {
            return Ok(self.finish(NextStepResult::Complete));
        }
        let neighbours: Vec<usize> = self
            .grid
            .cell(cell)
            .neighbours()
            .map(|(_, n)| n)
            .collect();
        for neighbour in neighbours {
            let target = self.grid.cell(neighbour);
            if !target.is_collapsed() && !target.unused {
                self.recompute_entropy(neighbour);
            }
        }
        Ok(NextStepResult::Continue)
    }

    /// Steps until the pass completes or fails.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::NotPrepared` if [`Self::prepare`] has not succeeded.
    pub fn execute<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<NextStepResult, WfcError> {
        loop {
            let result = self.execute_next_step(rng)?;
            if result.is_finished() {
                return Ok(result);
            }
        }
    }

    fn finish(&mut self, result: NextStepResult) -> NextStepResult {
        self.state = match result {
            NextStepResult::Failed => GeneratorState::Failed,
            _ => GeneratorState::Complete,
        };
        info!(
            "Pass '{}' finished with {:?}: {} of {} cells after {} steps and {} rollbacks",
            self.name,
            result,
            self.statistics.collapsed_cells,
            self.statistics.live_cells,
            self.statistics.steps,
            self.statistics.rollbacks
        );
        result
    }

    /// Counts one successful placement toward shrinking the radius.
    fn advance_radius_schedule(&mut self) {
        let threshold = self.options.steps_to_reduce_radius;
        if threshold == 0 {
            return;
        }
        self.fallback.steps_until_reduce = self.fallback.steps_until_reduce.saturating_sub(1);
        if self.fallback.steps_until_reduce == 0 {
            let increment = to_usize(self.options.fallback_radius_increment);
            self.fallback.radius = self
                .fallback
                .radius
                .saturating_sub(increment)
                .max(self.fallback.initial_radius);
            self.fallback.steps_until_reduce = threshold;
        }
    }

    /// Weight-proportional draw in admissible order; uniform if every weight is zero.
    fn choose_variant<R: Rng + ?Sized>(&self, admissible: &[usize], rng: &mut R) -> usize {
        // Summed as u64 so many heavy tiles cannot overflow the distribution.
        let weights = admissible.iter().map(|&v| u64::from(self.variants[v].weight()));
        match WeightedIndex::new(weights) {
            Ok(distribution) => admissible[distribution.sample(rng)],
            Err(error) => {
                trace!("Falling back to uniform choice: {error}");
                admissible.choose(rng).copied().unwrap_or(admissible[0])
            }
        }
    }

    fn commit(&mut self, cell: usize, variant: usize) {
        debug!(
            "Placed '{}' (rotation {}, {:?}) at {:?}",
            self.variants[variant].name(),
            self.variants[variant].rotation(),
            self.variants[variant].mirror(),
            self.grid.cell(cell).point
        );
        self.grid.cell_mut(cell).variant = Some(variant);
        self.pipeline.after_choice(&self.variants[variant]);
        self.uncollapsed.remove(&cell);
        self.statistics.placements += 1;
        self.statistics.collapsed_cells += 1;
    }

    /// Clears collapsed cells around `center` and widens the next rollback.
    fn revert_tiles_in_radius(&mut self, center: usize) {
        let radius = self.fallback.radius;
        let mut cleared = 0_u64;
        for cell in self.grid.cells_in_radius(center, radius) {
            let Some(variant) = self.grid.cell_mut(cell).variant.take() else {
                continue;
            };
            self.pipeline.revert(&self.variants[variant]);
            self.uncollapsed.insert(cell);
            self.statistics.collapsed_cells -= 1;
            cleared += 1;
        }

        for cell in self.grid.cells_in_radius(center, radius + 1) {
            let target = self.grid.cell(cell);
            if !target.is_collapsed() && !target.unused {
                self.recompute_entropy(cell);
            }
        }
        self.recompute_entropy(center);

        if let Some(remaining) = self.fallback.remaining_attempts.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.fallback.radius = radius
            .saturating_add(to_usize(self.options.fallback_radius_increment))
            .min(self.max_radius());
        self.fallback.steps_until_reduce = self.options.steps_to_reduce_radius;
        self.statistics.rollbacks += 1;
        self.statistics.reverted_cells += cleared;
        debug!(
            "Rolled back {} cells within radius {} of {:?}; next radius {}, attempts left {:?}",
            cleared,
            radius,
            self.grid.cell(center).point,
            self.fallback.radius,
            self.fallback.remaining_attempts
        );
    }

    /// Largest radius worth growing to: past `width + height` every ring lies
    /// off the map. A larger initial radius is kept as configured.
    fn max_radius(&self) -> usize {
        (self.map.width + self.map.height).max(self.fallback.initial_radius)
    }

    /// Copies every cell for rendering or masking.
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.grid
            .cells()
            .iter()
            .map(|cell| CellSnapshot {
                point: cell.point,
                variant: cell.variant.map(|v| self.variants[v].clone()),
                entropy: cell.entropy,
                unused: cell.unused,
            })
            .collect()
    }
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::bitvec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_rules::{Expr, Symmetry, Variable};

    fn pass(tiles: Vec<TileDefinition>, options: GeneratorOptions) -> PassDefinition {
        PassDefinition::new("test", options, tiles)
    }

    fn generator(width: usize, height: usize, pass: &PassDefinition) -> Generator {
        Generator::new(MapOptions::new(width, height), pass, &AssetRegistry::new()).unwrap()
    }

    #[test]
    fn test_step_before_prepare_is_an_error() {
        let pass = pass(
            vec![TileDefinition::new("A", Symmetry::Full, "A,A,A,A")],
            GeneratorOptions::default(),
        );
        let mut generator = generator(2, 2, &pass);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.execute_next_step(&mut rng),
            Err(WfcError::NotPrepared)
        ));
    }

    #[test]
    fn test_zero_limit_without_escape_is_rejected() {
        let pass = pass(
            vec![
                TileDefinition::new("Floor", Symmetry::Full, "A,A,A,A"),
                TileDefinition::new("Ghost", Symmetry::Full, "A,A,A,A").with_limit(0),
            ],
            GeneratorOptions::default(),
        );
        let mut generator = generator(2, 2, &pass);
        match generator.prepare(None) {
            Err(WfcError::ZeroLimit(name)) => assert_eq!(name, "Ghost"),
            other => panic!("expected ZeroLimit, got {other:?}"),
        }
        assert_eq!(generator.state(), GeneratorState::Idle);
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let options = GeneratorOptions::default().with_fallback_radius(
            Expr::binary(Expr::Sub, Expr::Int(1), Expr::var(Variable::MapWidth)),
            1,
        );
        let pass = pass(
            vec![TileDefinition::new("A", Symmetry::Full, "A,A,A,A")],
            options,
        );
        let mut generator = generator(4, 4, &pass);
        assert!(matches!(
            generator.prepare(None),
            Err(WfcError::NegativeRadius(-3))
        ));
    }

    #[test]
    fn test_initialisation_rule_sets_priority_and_pool() {
        let corner = Expr::And(vec![
            Expr::binary(Expr::Eq, Expr::var(Variable::X), Expr::Int(0)),
            Expr::binary(Expr::Eq, Expr::var(Variable::Y), Expr::Int(0)),
        ]);
        let pass = pass(
            vec![
                TileDefinition::new("Grass", Symmetry::Full, "A,A,A,A"),
                TileDefinition::new("Spawn", Symmetry::Full, "A,A,A,A")
                    .with_initialisation_rule(corner),
            ],
            GeneratorOptions::default(),
        );
        let mut generator = generator(3, 3, &pass);
        generator.prepare(None).unwrap();

        let origin = generator.grid().cell(0);
        assert_eq!(origin.baseline_entropy, -INITIALISE_PRIORITY_STEP);
        assert_eq!(origin.entropy, origin.baseline_entropy);
        assert_eq!(generator.grid().cell(4).baseline_entropy, 0);
        assert_eq!(generator.admissible(0), vec![1]);
        assert_eq!(generator.admissible(4), vec![0, 1]);

        // The prioritised cell is collapsed first, with the matching tile.
        let mut rng = StdRng::seed_from_u64(3);
        generator.execute_next_step(&mut rng).unwrap();
        let first = &generator.snapshot()[0];
        assert_eq!(first.tile_name(), Some("Spawn"));
    }

    #[test]
    fn test_mask_marks_cells_unused() {
        let pass = pass(
            vec![TileDefinition::new("A", Symmetry::Full, "A,A,A,A")],
            GeneratorOptions::default(),
        );
        let mut generator = generator(2, 2, &pass);
        let live = bitvec![usize, Lsb0; 1, 0, 0, 1];
        generator.prepare(Some(&live)).unwrap();
        assert_eq!(generator.statistics().live_cells, 2);

        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(generator.execute(&mut rng).unwrap(), NextStepResult::Complete);
        let snapshot = generator.snapshot();
        assert!(snapshot[0].is_collapsed() && snapshot[3].is_collapsed());
        assert!(snapshot[1].unused && !snapshot[1].is_collapsed());
        assert!(snapshot[2].unused && !snapshot[2].is_collapsed());
    }

    #[test]
    fn test_rollback_widens_radius_and_spends_attempts() {
        // Every tile needs the same pattern on both sides, but only opposite
        // patterns fit, so a neighbour pair is always a contradiction.
        let pass = pass(
            vec![TileDefinition::new("Odd", Symmetry::Full, "AB,AB,AB,AB")],
            GeneratorOptions::default().with_fallback_attempts(Some(3)),
        );
        let mut generator = generator(2, 1, &pass);
        generator.prepare(None).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(generator.fallback_radius(), 1);
        assert_eq!(generator.execute(&mut rng).unwrap(), NextStepResult::Failed);
        let stats = generator.statistics();
        assert_eq!(stats.rollbacks, 3);
        assert_eq!(generator.remaining_fallback_attempts(), Some(0));
        // 1 -> 2 -> 3, then capped at width + height.
        assert_eq!(generator.fallback_radius(), 3);
        assert_eq!(stats.collapsed_cells, 1);
        assert_eq!(generator.execute_next_step(&mut rng).unwrap(), NextStepResult::Failed);
    }

    #[test]
    fn test_large_increment_is_capped_by_map_size() {
        let pass = pass(
            vec![TileDefinition::new("Odd", Symmetry::Full, "AB,AB,AB,AB")],
            GeneratorOptions::default()
                .with_fallback_attempts(Some(3))
                .with_fallback_radius(Expr::Int(1), 20_000),
        );
        let mut generator = generator(2, 1, &pass);
        generator.prepare(None).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let started = std::time::Instant::now();
        assert_eq!(generator.execute(&mut rng).unwrap(), NextStepResult::Failed);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(generator.statistics().rollbacks, 3);
        assert_eq!(generator.fallback_radius(), 3);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let pass = pass(
            vec![
                TileDefinition::new("Heavy", Symmetry::Full, "A,A,A,A").with_weight(3_000_000_000),
                TileDefinition::new("Heavier", Symmetry::Full, "A,A,A,A").with_weight(u32::MAX),
            ],
            GeneratorOptions::default(),
        );
        let mut generator = generator(3, 3, &pass);
        generator.prepare(None).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        assert_eq!(generator.execute(&mut rng).unwrap(), NextStepResult::Complete);
        assert_eq!(generator.statistics().collapsed_cells, 9);
    }

    #[test]
    fn test_rollback_refreshes_entropy_one_ring_past_radius() {
        let pass = pass(
            vec![TileDefinition::new("A", Symmetry::Full, "A,A,A,A")],
            GeneratorOptions::default(),
        );
        let mut generator = generator(4, 1, &pass);
        generator.prepare(None).unwrap();
        assert_eq!(generator.fallback_radius(), 1);

        // Cell 1 sits on the edge of the radius-1 area around cell 0, so
        // cell 2 is one ring outside it.
        generator.commit(1, 0);
        generator.recompute_entropy(2);
        assert_eq!(generator.grid().cell(2).entropy, -1);

        generator.revert_tiles_in_radius(0);
        assert!(!generator.grid().cell(1).is_collapsed());
        assert_eq!(generator.grid().cell(2).entropy, 0);
        assert_eq!(generator.statistics().reverted_cells, 1);
        assert_eq!(generator.fallback_radius(), 2);
    }

    #[test]
    fn test_radius_shrinks_back_to_initial() {
        let pass = pass(
            vec![TileDefinition::new("A", Symmetry::Full, "A,A,A,A")],
            GeneratorOptions::default().with_steps_to_reduce_radius(2),
        );
        let mut generator = generator(3, 3, &pass);
        generator.prepare(None).unwrap();
        generator.fallback.radius = 3;
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..6 {
            generator.execute_next_step(&mut rng).unwrap();
        }
        assert_eq!(generator.fallback_radius(), 1);
    }
}
