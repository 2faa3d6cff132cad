use crate::generator::{CellSnapshot, Generator, Statistics};
use crate::{NextStepResult, WfcError};
use bitvec::prelude::{BitVec, Lsb0};
use log::{info, warn};
use rand::Rng;
use std::collections::BTreeMap;
use wfc_rules::{AssetRegistry, MapOptions, PassDefinition, RuleSet};

/// Runs the passes of a rule set one after another over the same map.
///
/// Each pass is solved to completion before the next one starts. A pass
/// with a mask only works on the cells where the referenced earlier passes
/// placed one of the named tiles.
#[derive(Debug)]
pub struct PassRunner<R: Rng> {
    map: MapOptions,
    generators: Vec<Generator>,
    masks: Vec<BTreeMap<usize, Vec<String>>>,
    layers: Vec<Vec<CellSnapshot>>,
    current: usize,
    finished: Option<NextStepResult>,
    rng: R,
}

impl<R: Rng> PassRunner<R> {
    /// Builds one generator per pass and checks every mask reference.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::Rule` for unexpandable tiles, or a mask error when a
    /// pass is masked by itself, a later pass, or an unknown tile.
    pub fn new(rules: &RuleSet, assets: &AssetRegistry, rng: R) -> Result<Self, WfcError> {
        for (index, pass) in rules.passes.iter().enumerate() {
            validate_mask(index, pass, &rules.passes)?;
        }
        let generators = rules
            .passes
            .iter()
            .map(|pass| Generator::new(rules.map, pass, assets))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            map: rules.map,
            generators,
            masks: rules.passes.iter().map(|pass| pass.mask.clone()).collect(),
            layers: Vec::new(),
            current: 0,
            finished: None,
            rng,
        })
    }

    /// Prepares every pass and queues them in declared order.
    ///
    /// # Errors
    ///
    /// Propagates the first configuration error raised by any pass.
    pub fn reset(&mut self) -> Result<(), WfcError> {
        self.layers.clear();
        self.current = 0;
        self.finished = None;
        for generator in &mut self.generators {
            generator.prepare(None)?;
        }
        if let Some(first) = self.generators.first() {
            info!(
                "Queued {} passes on a {}x{} map, starting with '{}'",
                self.generators.len(),
                self.map.width,
                self.map.height,
                first.name()
            );
        }
        Ok(())
    }

    /// Steps the current pass, moving on to the next one when it completes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error raised while preparing the next pass, or
    /// `WfcError::NotPrepared` if [`Self::reset`] has not been called.
    pub fn execute_next_step(&mut self) -> Result<NextStepResult, WfcError> {
        if let Some(result) = self.finished {
            return Ok(result);
        }
        let Some(generator) = self.generators.get_mut(self.current) else {
            return Ok(NextStepResult::Complete);
        };

        match generator.execute_next_step(&mut self.rng)? {
            NextStepResult::Continue => Ok(NextStepResult::Continue),
            NextStepResult::Failed => {
                warn!("Pass '{}' failed; stopping", generator.name());
                self.layers.push(generator.snapshot());
                self.finished = Some(NextStepResult::Failed);
                Ok(NextStepResult::Failed)
            }
            NextStepResult::Complete => {
                self.layers.push(generator.snapshot());
                self.current += 1;
                if self.current == self.generators.len() {
                    self.finished = Some(NextStepResult::Complete);
                    return Ok(NextStepResult::Complete);
                }
                let live = self.live_cells(self.current)?;
                let next = &mut self.generators[self.current];
                next.prepare(live.as_deref())?;
                info!("Starting pass '{}'", next.name());
                Ok(NextStepResult::Continue)
            }
        }
    }

    /// Steps until every pass completes or one fails.
    ///
    /// # Errors
    ///
    /// See [`Self::execute_next_step`].
    pub fn execute(&mut self) -> Result<NextStepResult, WfcError> {
        loop {
            let result = self.execute_next_step()?;
            if result.is_finished() {
                return Ok(result);
            }
        }
    }

    /// Cells the mask of `pass` keeps live, or `None` when it has no mask.
    fn live_cells(&self, pass: usize) -> Result<Option<BitVec<usize, Lsb0>>, WfcError> {
        let mask = &self.masks[pass];
        if mask.is_empty() {
            return Ok(None);
        }
        let mut live = BitVec::repeat(false, self.map.cell_count());
        for (&source_pass, tiles) in mask {
            let layer = self
                .layers
                .get(source_pass)
                .filter(|_| source_pass < pass)
                .ok_or(WfcError::MaskReferencesUnexecutedPass { pass, source_pass })?;
            for (index, cell) in layer.iter().enumerate() {
                if cell
                    .tile_name()
                    .is_some_and(|name| tiles.iter().any(|tile| tile == name))
                {
                    live.set(index, true);
                }
            }
        }
        Ok(Some(live))
    }

    /// Snapshots of every finished pass, in execution order.
    pub fn layers(&self) -> &[Vec<CellSnapshot>] {
        &self.layers
    }

    /// Index of the pass being solved; equals the pass count once all complete.
    pub const fn current_pass(&self) -> usize {
        self.current
    }

    pub fn pass_count(&self) -> usize {
        self.generators.len()
    }

    pub fn generator(&self, pass: usize) -> Option<&Generator> {
        self.generators.get(pass)
    }

    /// Statistics of the pass being solved, or of the last one once finished.
    pub fn statistics(&self) -> Statistics {
        self.generators
            .get(self.current)
            .or_else(|| self.generators.last())
            .map(Generator::statistics)
            .unwrap_or_default()
    }
}

fn validate_mask(
    index: usize,
    pass: &PassDefinition,
    passes: &[PassDefinition],
) -> Result<(), WfcError> {
    for (&source_pass, tiles) in &pass.mask {
        if source_pass >= index {
            return Err(WfcError::MaskReferencesUnexecutedPass {
                pass: index,
                source_pass,
            });
        }
        let source = &passes[source_pass];
        if let Some(unknown) = tiles
            .iter()
            .find(|tile| !source.tiles.iter().any(|t| &t.name == *tile))
        {
            return Err(WfcError::UnknownMaskTile {
                pass: index,
                source_pass,
                tile: unknown.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_rules::{GeneratorOptions, Symmetry, TileDefinition};

    fn single_tile_pass(name: &str) -> PassDefinition {
        PassDefinition::new(
            name,
            GeneratorOptions::default(),
            vec![TileDefinition::new(name, Symmetry::Full, "A,A,A,A")],
        )
    }

    #[test]
    fn test_mask_on_later_pass_is_rejected() {
        let rules = RuleSet {
            map: MapOptions::new(2, 2),
            passes: vec![
                single_tile_pass("Ground").masked_by(1, ["Decor"]),
                single_tile_pass("Decor"),
            ],
        };
        let result = PassRunner::new(&rules, &AssetRegistry::new(), StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(WfcError::MaskReferencesUnexecutedPass {
                pass: 0,
                source_pass: 1
            })
        ));
    }

    #[test]
    fn test_mask_with_unknown_tile_is_rejected() {
        let rules = RuleSet {
            map: MapOptions::new(2, 2),
            passes: vec![
                single_tile_pass("Ground"),
                single_tile_pass("Decor").masked_by(0, ["Lava"]),
            ],
        };
        let result = PassRunner::new(&rules, &AssetRegistry::new(), StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(WfcError::UnknownMaskTile { .. })));
    }

    #[test]
    fn test_step_before_reset_is_an_error() {
        let rules = RuleSet {
            map: MapOptions::new(1, 1),
            passes: vec![single_tile_pass("Ground")],
        };
        let mut runner =
            PassRunner::new(&rules, &AssetRegistry::new(), StdRng::seed_from_u64(0)).unwrap();
        assert!(matches!(
            runner.execute_next_step(),
            Err(WfcError::NotPrepared)
        ));
    }

    #[test]
    fn test_passes_run_in_order() {
        let rules = RuleSet {
            map: MapOptions::new(2, 1),
            passes: vec![single_tile_pass("Ground"), single_tile_pass("Roof")],
        };
        let mut runner =
            PassRunner::new(&rules, &AssetRegistry::new(), StdRng::seed_from_u64(4)).unwrap();
        runner.reset().unwrap();

        // Two placements, then the completion that advances to the next pass.
        assert_eq!(runner.execute_next_step().unwrap(), NextStepResult::Continue);
        assert_eq!(runner.execute_next_step().unwrap(), NextStepResult::Continue);
        assert_eq!(runner.current_pass(), 1);
        assert_eq!(runner.layers().len(), 1);

        assert_eq!(runner.execute().unwrap(), NextStepResult::Complete);
        assert_eq!(runner.current_pass(), 2);
        let names: Vec<Option<&str>> = runner.layers()[1]
            .iter()
            .map(CellSnapshot::tile_name)
            .collect();
        assert_eq!(names, vec![Some("Roof"), Some("Roof")]);
        assert_eq!(runner.statistics().collapsed_cells, 2);
    }
}
