use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use wfc_rules::{EntropyHeuristic, TileVariant};

/// Baseline bonus per initialisation rule.
///
/// The definition declared at index `i` of `n` lowers a matching cell's
/// baseline by `(n - i) * INITIALISE_PRIORITY_STEP`, so earlier rules win
/// ties. The step dwarfs any neighbour deduction.
pub const INITIALISE_PRIORITY_STEP: i64 = 1_000_000;

/// Recomputes cell entropy from committed neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntropyCalculator {
    heuristic: EntropyHeuristic,
}

impl EntropyCalculator {
    pub const fn new(heuristic: EntropyHeuristic) -> Self {
        Self { heuristic }
    }

    pub const fn heuristic(&self) -> EntropyHeuristic {
        self.heuristic
    }

    /// Entropy of `cell`: its baseline minus the configured deduction.
    ///
    /// A cell without committed neighbours stays at its baseline.
    /// `admissible_count` is only called for
    /// [`EntropyHeuristic::CountOfAllTilesMinusAdmissibleTiles`].
    pub fn entropy<F>(
        &self,
        grid: &Grid,
        variants: &[TileVariant],
        cell: usize,
        admissible_count: F,
    ) -> i64
    where
        F: FnOnce() -> usize,
    {
        let grid_cell = grid.cell(cell);
        let baseline = grid_cell.baseline_entropy;

        let mut count: i64 = 0;
        let mut weight_sum: i64 = 0;
        let mut weight_max: i64 = 0;
        for (direction, neighbour) in grid_cell.neighbours() {
            let Some(placed) = grid.cell(neighbour).variant else {
                continue;
            };
            let weight = i64::from(variants[placed].entropy_weight(direction.opposite()));
            count += 1;
            weight_sum += weight;
            weight_max = weight_max.max(weight);
        }
        if count == 0 {
            return baseline;
        }

        let deduction = match self.heuristic {
            EntropyHeuristic::CountOfNeighbours => count,
            EntropyHeuristic::WeightOfNeighbours => weight_sum,
            EntropyHeuristic::MaxWeightOfNeighbours => weight_max,
            EntropyHeuristic::CountAndWeightOfNeighbours => weight_sum + count,
            EntropyHeuristic::CountAndMaxWeightOfNeighbours => weight_max + count,
            EntropyHeuristic::CountOfAllTilesMinusAdmissibleTiles => {
                let excluded = variants.len().saturating_sub(admissible_count());
                i64::try_from(excluded).unwrap_or(i64::MAX)
            }
        };
        baseline.saturating_sub(deduction)
    }
}

/// Picks uniformly among the uncollapsed cells sharing the lowest entropy.
///
/// Ties are gathered in ascending cell index order before the draw, so a
/// seeded `rng` always yields the same cell.
pub fn select_lowest_entropy_cell<R: Rng + ?Sized>(
    grid: &Grid,
    uncollapsed: &BTreeSet<usize>,
    rng: &mut R,
) -> Option<usize> {
    let lowest = uncollapsed
        .iter()
        .map(|&cell| grid.cell(cell).entropy)
        .min()?;
    let tied: Vec<usize> = uncollapsed
        .iter()
        .copied()
        .filter(|&cell| grid.cell(cell).entropy == lowest)
        .collect();
    tied.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_rules::{AssetRegistry, Symmetry, TileDefinition, TileVariantFactory};

    fn setup() -> (Grid, Vec<TileVariant>) {
        let assets = AssetRegistry::new();
        let (_, variants) = TileVariantFactory::new(&assets)
            .expand_all(&[
                TileDefinition::new("Light", Symmetry::Full, "A,A,A,A").with_entropy_weights("1,2,3,4"),
                TileDefinition::new("Heavy", Symmetry::Full, "A,A,A,A").with_weight(5),
            ])
            .unwrap();
        // Center of a 3x3 grid, left neighbour Light, upper neighbour Heavy.
        let mut grid = Grid::new(3, 3);
        for cell in &mut grid.cells {
            cell.baseline_entropy = 0;
            cell.entropy = 0;
        }
        grid.cell_mut(3).variant = Some(0);
        grid.cell_mut(1).variant = Some(1);
        (grid, variants)
    }

    #[test]
    fn test_each_heuristic_deduction() {
        let (grid, variants) = setup();
        // Light faces the center with its Right weight (2); Heavy with its Down weight (5).
        let cases = [
            (EntropyHeuristic::CountOfNeighbours, -2),
            (EntropyHeuristic::WeightOfNeighbours, -7),
            (EntropyHeuristic::MaxWeightOfNeighbours, -5),
            (EntropyHeuristic::CountAndWeightOfNeighbours, -9),
            (EntropyHeuristic::CountAndMaxWeightOfNeighbours, -7),
            (EntropyHeuristic::CountOfAllTilesMinusAdmissibleTiles, -1),
        ];
        for (heuristic, expected) in cases {
            let calculator = EntropyCalculator::new(heuristic);
            assert_eq!(
                calculator.entropy(&grid, &variants, 4, || 1),
                expected,
                "{heuristic:?}"
            );
        }
    }

    #[test]
    fn test_isolated_cell_keeps_baseline() {
        let (mut grid, variants) = setup();
        grid.cell_mut(8).baseline_entropy = -3;
        let calculator = EntropyCalculator::new(EntropyHeuristic::CountOfAllTilesMinusAdmissibleTiles);
        let value = calculator.entropy(&grid, &variants, 8, || unreachable!());
        assert_eq!(value, -3);
    }

    #[test]
    fn test_selection_only_among_lowest() {
        let (mut grid, _) = setup();
        grid.cell_mut(5).entropy = -4;
        grid.cell_mut(7).entropy = -4;
        grid.cell_mut(8).entropy = -1;
        let uncollapsed: BTreeSet<usize> = [0, 2, 4, 5, 6, 7, 8].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let chosen = select_lowest_entropy_cell(&grid, &uncollapsed, &mut rng).unwrap();
            assert!(chosen == 5 || chosen == 7);
        }
        assert_eq!(
            select_lowest_entropy_cell(&grid, &BTreeSet::new(), &mut rng),
            None
        );
    }
}
