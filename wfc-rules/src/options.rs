use crate::expr::Expr;
use crate::types::TileDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dimensions shared by every pass of a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOptions {
    pub width: usize,
    pub height: usize,
}

impl MapOptions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// How a cell's entropy drops as its neighbours are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EntropyHeuristic {
    /// Subtract the number of collapsed neighbours.
    #[default]
    CountOfNeighbours,
    /// Subtract the sum of the neighbours' entropy weights facing this cell.
    WeightOfNeighbours,
    /// Subtract the largest neighbour entropy weight facing this cell.
    MaxWeightOfNeighbours,
    /// Subtract the weight sum plus the neighbour count.
    CountAndWeightOfNeighbours,
    /// Subtract the largest weight plus the neighbour count.
    CountAndMaxWeightOfNeighbours,
    /// Subtract how many variants the cell can no longer take.
    CountOfAllTilesMinusAdmissibleTiles,
}

/// Built-in constraint types that can be enabled for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Matching adapter patterns between neighbours.
    Adapter,
    /// Mandatory adapters must face a placed neighbour.
    MandatoryAdapter,
    /// Per-tile placement limits.
    Limit,
    /// Tiles usable only when no other tile fits.
    OnlyAllowedIfNoValidTiles,
    /// Category and connectable-category matching.
    Category,
    /// Prohibited empty neighbours.
    EmptyPlacement,
    /// Per-side permission to touch another copy of the same tile.
    ConnectToSelf,
    /// Placement predicates over position and map size.
    PlacementRule,
}

impl ConstraintKind {
    /// Every built-in, in default order.
    pub const ALL: [Self; 8] = [
        Self::Adapter,
        Self::MandatoryAdapter,
        Self::Limit,
        Self::OnlyAllowedIfNoValidTiles,
        Self::Category,
        Self::EmptyPlacement,
        Self::ConnectToSelf,
        Self::PlacementRule,
    ];

    /// Evaluation priority used when a rule set does not override it.
    pub const fn default_order(self) -> i32 {
        match self {
            Self::Adapter => 0,
            Self::MandatoryAdapter => 1,
            Self::Limit => 2,
            Self::OnlyAllowedIfNoValidTiles => 3,
            Self::Category => 4,
            Self::EmptyPlacement => 5,
            Self::ConnectToSelf => 6,
            Self::PlacementRule => 7,
        }
    }
}

/// One enabled constraint with an optional order override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    pub kind: ConstraintKind,
    #[serde(default)]
    pub order: Option<i32>,
}

impl ConstraintConfig {
    pub const fn new(kind: ConstraintKind) -> Self {
        Self { kind, order: None }
    }

    pub const fn order(&self) -> i32 {
        match self.order {
            Some(order) => order,
            None => self.kind.default_order(),
        }
    }
}

impl From<ConstraintKind> for ConstraintConfig {
    fn from(kind: ConstraintKind) -> Self {
        Self::new(kind)
    }
}

fn default_constraints() -> Vec<ConstraintConfig> {
    ConstraintKind::ALL.into_iter().map(ConstraintConfig::new).collect()
}

fn default_fallback_attempts() -> Option<u32> {
    Some(20)
}

fn default_one() -> u32 {
    1
}

fn default_steps_to_reduce_radius() -> u32 {
    10
}

/// Per-pass solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    #[serde(default)]
    pub entropy_heuristic: EntropyHeuristic,
    /// Rollbacks allowed before the pass fails; `None` is unlimited.
    #[serde(default = "default_fallback_attempts")]
    pub fallback_attempts: Option<u32>,
    /// Initial rollback radius, evaluated with `MapWidth` and `MapHeight`.
    #[serde(default)]
    pub fallback_radius: Expr,
    /// Radius growth per rollback, and shrink per reduction.
    #[serde(default = "default_one")]
    pub fallback_radius_increment: u32,
    /// Consecutive placements needed before the radius shrinks. Zero disables shrinking.
    #[serde(default = "default_steps_to_reduce_radius")]
    pub steps_to_reduce_radius: u32,
    #[serde(default = "default_constraints")]
    pub constraints: Vec<ConstraintConfig>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            entropy_heuristic: EntropyHeuristic::default(),
            fallback_attempts: default_fallback_attempts(),
            fallback_radius: Expr::default(),
            fallback_radius_increment: default_one(),
            steps_to_reduce_radius: default_steps_to_reduce_radius(),
            constraints: default_constraints(),
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub fn with_entropy_heuristic(mut self, heuristic: EntropyHeuristic) -> Self {
        self.entropy_heuristic = heuristic;
        self
    }

    #[must_use]
    pub fn with_fallback_attempts(mut self, attempts: Option<u32>) -> Self {
        self.fallback_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_fallback_radius(mut self, radius: Expr, increment: u32) -> Self {
        self.fallback_radius = radius;
        self.fallback_radius_increment = increment;
        self
    }

    #[must_use]
    pub fn with_steps_to_reduce_radius(mut self, steps: u32) -> Self {
        self.steps_to_reduce_radius = steps;
        self
    }

    #[must_use]
    pub fn with_constraints<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ConstraintConfig>,
    {
        self.constraints = constraints.into_iter().map(Into::into).collect();
        self
    }
}

/// One independently configured solve over the shared map footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: GeneratorOptions,
    pub tiles: Vec<TileDefinition>,
    /// Earlier pass index to the tile names whose cells stay live in this pass.
    #[serde(default)]
    pub mask: BTreeMap<usize, Vec<String>>,
}

impl PassDefinition {
    pub fn new(name: impl Into<String>, options: GeneratorOptions, tiles: Vec<TileDefinition>) -> Self {
        Self {
            name: name.into(),
            options,
            tiles,
            mask: BTreeMap::new(),
        }
    }

    /// Keeps only the cells where pass `pass` placed one of `tiles`.
    #[must_use]
    pub fn masked_by<I, S>(mut self, pass: usize, tiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mask
            .entry(pass)
            .or_default()
            .extend(tiles.into_iter().map(Into::into));
        self
    }
}

/// A parsed rule file: the map and its ordered passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub map: MapOptions,
    pub passes: Vec<PassDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constraints_are_all_builtins_in_order() {
        let options = GeneratorOptions::default();
        let orders: Vec<i32> = options.constraints.iter().map(ConstraintConfig::order).collect();
        assert_eq!(orders, (0..8).collect::<Vec<_>>());
        assert_eq!(options.fallback_attempts, Some(20));
        assert_eq!(options.fallback_radius, Expr::Int(1));
    }

    #[test]
    fn test_order_override() {
        let config = ConstraintConfig {
            kind: ConstraintKind::PlacementRule,
            order: Some(-5),
        };
        assert_eq!(config.order(), -5);
        assert_eq!(ConstraintConfig::new(ConstraintKind::Category).order(), 4);
    }

    #[test]
    fn test_mask_builder_merges_entries() {
        let pass = PassDefinition::new("decor", GeneratorOptions::default(), Vec::new())
            .masked_by(0, ["Floor"])
            .masked_by(0, ["Carpet"]);
        assert_eq!(pass.mask[&0], vec!["Floor".to_owned(), "Carpet".to_owned()]);
    }
}
