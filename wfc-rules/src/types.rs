use crate::expr::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning a `TileDefinition` into concrete variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The symmetry token was not one of `X`, `^`, `I` or `/`.
    #[error("Unknown symmetry class '{0}', expected one of X, ^, I, /")]
    UnknownSymmetry(String),
    /// A four-sided token list carried more than four entries.
    #[error("Tile '{tile}' declares {count} {field} tokens, at most 4 are allowed")]
    TooManyTokens {
        /// Tile definition name.
        tile: String,
        /// Which token list overflowed.
        field: &'static str,
        /// Number of tokens found.
        count: usize,
    },
    /// An entropy weight token could not be parsed as a non-negative integer.
    #[error("Tile '{tile}' has an invalid entropy weight '{token}'")]
    InvalidWeight {
        /// Tile definition name.
        tile: String,
        /// The offending token.
        token: String,
    },
    /// An empty-neighbour flag token was not recognised.
    #[error("Tile '{tile}' has an invalid empty-neighbour flag '{token}'")]
    InvalidEmptyFlag {
        /// Tile definition name.
        tile: String,
        /// The offending token.
        token: String,
    },
    /// A connect-to-self token was neither `true` nor `false`.
    #[error("Tile '{tile}' has an invalid connect-to-self flag '{token}'")]
    InvalidSelfFlag {
        /// Tile definition name.
        tile: String,
        /// The offending token.
        token: String,
    },
    /// Two tile definitions in one pass share a name.
    #[error("Duplicate tile name: {0}")]
    DuplicateTileName(String),
}

/// Cardinal direction on the grid, ordered clockwise starting from `Up`.
///
/// `Up` points towards `y - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards `y - 1`.
    Up,
    /// Towards `x + 1`.
    Right,
    /// Towards `y + 1`.
    Down,
    /// Towards `x - 1`.
    Left,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Direction::index`], wrapping modulo 4.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Grid offset `(dx, dy)` of the neighbour in this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Connection pattern on one edge of a tile variant.
///
/// Patterns are authored clockwise around each tile, so two touching edges fit
/// when one pattern is the character reversal of the other. The reversal is
/// computed once here and never at check time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Adapter {
    pattern: String,
    reversed: String,
}

impl Adapter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let reversed = pattern.chars().rev().collect();
        Self { pattern, reversed }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The pattern read anticlockwise.
    pub fn reversed(&self) -> &str {
        &self.reversed
    }

    /// Returns a new adapter whose pattern is this one reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            pattern: self.reversed.clone(),
            reversed: self.pattern.clone(),
        }
    }

    /// Whether this edge can touch `other`, where `other` is the facing edge
    /// of the neighbouring tile.
    #[inline]
    pub fn fits(&self, other: &Self) -> bool {
        self.pattern == other.reversed
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Rotational symmetry class of a tile definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symmetry {
    /// `X`: looks the same in every rotation, one variant.
    #[default]
    Full,
    /// `^`: no symmetry, four rotations.
    None,
    /// `I`: two rotations, 0° and 90°.
    Straight,
    /// `/`: two rotations, 0° and 180°.
    Diagonal,
}

impl Symmetry {
    /// Rotation offsets (quarter turns clockwise) producing the base variants.
    pub const fn rotation_offsets(self) -> &'static [usize] {
        match self {
            Self::Full => &[0],
            Self::None => &[0, 1, 2, 3],
            Self::Straight => &[0, 1],
            Self::Diagonal => &[0, 2],
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Full => 'X',
            Self::None => '^',
            Self::Straight => 'I',
            Self::Diagonal => '/',
        }
    }
}

impl FromStr for Symmetry {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" => Ok(Self::Full),
            "^" => Ok(Self::None),
            "I" => Ok(Self::Straight),
            "/" => Ok(Self::Diagonal),
            other => Err(RuleError::UnknownSymmetry(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Symmetry {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symmetry> for String {
    fn from(value: Symmetry) -> Self {
        value.as_char().to_string()
    }
}

/// Mirror transform applied on top of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mirror {
    #[default]
    None,
    /// Flipped across the vertical axis (left and right swap).
    Horizontal,
    /// Flipped across the horizontal axis (up and down swap).
    Vertical,
    /// Flipped across both axes.
    Both,
}

/// Kinds of "emptiness" a tile may refuse to have on one of its sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProhibitedEmpty {
    /// No neighbour at all: the side faces the edge of the map.
    pub edge: bool,
    /// The neighbour is masked out by an earlier pass.
    pub unused: bool,
    /// The neighbour exists but has not been collapsed yet.
    pub uncollapsed: bool,
}

impl ProhibitedEmpty {
    pub const NONE: Self = Self {
        edge: false,
        unused: false,
        uncollapsed: false,
    };

    pub const ALL: Self = Self {
        edge: true,
        unused: true,
        uncollapsed: true,
    };

    pub const fn any(self) -> bool {
        self.edge || self.unused || self.uncollapsed
    }

    /// Parses a `|`-separated flag list such as `edge|unused`.
    ///
    /// An empty token means `none`.
    pub fn parse(token: &str) -> Option<Self> {
        let mut flags = Self::NONE;
        for part in token.split('|').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "" | "none" => {}
                "all" => flags = Self::ALL,
                "edge" => flags.edge = true,
                "unused" => flags.unused = true,
                "uncollapsed" => flags.uncollapsed = true,
                _ => return None,
            }
        }
        Some(flags)
    }
}

fn default_weight() -> u32 {
    1
}

/// A tile as authored in a rule set, before orientation expansion.
///
/// String-valued fields hold raw tokens (four comma-separated entries,
/// clockwise from up); they are parsed once by
/// [`TileVariantFactory`](crate::TileVariantFactory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Unique name within its pass.
    pub name: String,
    #[serde(default)]
    pub symmetry: Symmetry,
    /// Relative probability of being chosen, also the default entropy weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Four adapter patterns, comma-separated, clockwise from up.
    #[serde(default)]
    pub adapters: String,
    /// Comma-separated adapter patterns that must face a placed neighbour.
    #[serde(default)]
    pub mandatory_adapters: Option<String>,
    /// Cells where this tile may be placed.
    #[serde(default)]
    pub placement_rule: Option<Expr>,
    /// Cells that should be collapsed first, and only with tiles whose rule matched.
    #[serde(default)]
    pub initialisation_rule: Option<Expr>,
    /// Per-direction entropy weights, defaulting to `weight`.
    #[serde(default)]
    pub entropy_weights: Option<String>,
    /// Maximum number of placements; `None` is unlimited.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub can_exceed_limit_if_only_valid_tile: bool,
    #[serde(default)]
    pub only_allowed_if_no_valid_tiles: bool,
    #[serde(default)]
    pub category: Option<String>,
    /// Neighbour categories this tile accepts. `None` accepts everything.
    #[serde(default)]
    pub connectable_categories: Option<Vec<String>>,
    /// Per-direction empty-neighbour prohibitions, e.g. `"edge|unused,none,all,none"`.
    #[serde(default)]
    pub prohibited_empty_neighbours: Option<String>,
    /// Per-direction `true`/`false` permission to touch another copy of itself.
    #[serde(default)]
    pub connect_to_self: Option<String>,
    #[serde(default)]
    pub mirror_horizontal: bool,
    #[serde(default)]
    pub mirror_vertical: bool,
    /// Logical asset name, defaulting to the tile name.
    #[serde(default)]
    pub asset: Option<String>,
}

impl TileDefinition {
    /// Creates a definition with default weight 1 and no optional rules.
    pub fn new(name: impl Into<String>, symmetry: Symmetry, adapters: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symmetry,
            weight: default_weight(),
            adapters: adapters.into(),
            mandatory_adapters: None,
            placement_rule: None,
            initialisation_rule: None,
            entropy_weights: None,
            limit: None,
            can_exceed_limit_if_only_valid_tile: false,
            only_allowed_if_no_valid_tiles: false,
            category: None,
            connectable_categories: None,
            prohibited_empty_neighbours: None,
            connect_to_self: None,
            mirror_horizontal: false,
            mirror_vertical: false,
            asset: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_exceedable_limit(mut self) -> Self {
        self.can_exceed_limit_if_only_valid_tile = true;
        self
    }

    #[must_use]
    pub fn only_if_no_valid_tiles(mut self) -> Self {
        self.only_allowed_if_no_valid_tiles = true;
        self
    }

    #[must_use]
    pub fn with_mandatory_adapters(mut self, adapters: impl Into<String>) -> Self {
        self.mandatory_adapters = Some(adapters.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_connectable_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connectable_categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_entropy_weights(mut self, weights: impl Into<String>) -> Self {
        self.entropy_weights = Some(weights.into());
        self
    }

    #[must_use]
    pub fn with_prohibited_empty_neighbours(mut self, flags: impl Into<String>) -> Self {
        self.prohibited_empty_neighbours = Some(flags.into());
        self
    }

    #[must_use]
    pub fn with_connect_to_self(mut self, flags: impl Into<String>) -> Self {
        self.connect_to_self = Some(flags.into());
        self
    }

    #[must_use]
    pub fn with_placement_rule(mut self, rule: Expr) -> Self {
        self.placement_rule = Some(rule);
        self
    }

    #[must_use]
    pub fn with_initialisation_rule(mut self, rule: Expr) -> Self {
        self.initialisation_rule = Some(rule);
        self
    }

    #[must_use]
    pub fn with_mirroring(mut self, horizontal: bool, vertical: bool) -> Self {
        self.mirror_horizontal = horizontal;
        self.mirror_vertical = vertical;
        self
    }

    #[must_use]
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Name used to look up the asset handle.
    pub fn asset_name(&self) -> &str {
        self.asset.as_deref().unwrap_or(&self.name)
    }

    /// A finite limit of zero with no escape valve can never be placed.
    pub fn is_unplaceable(&self) -> bool {
        self.limit == Some(0) && !self.can_exceed_limit_if_only_valid_tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposites() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_adapter_fits_reversal_only() {
        let abc = Adapter::new("ABC");
        assert!(abc.fits(&Adapter::new("CBA")));
        assert!(!abc.fits(&Adapter::new("ABC")));
        assert!(!abc.fits(&Adapter::new("BAC")));
        assert!(Adapter::new("").fits(&Adapter::new("")));
    }

    #[test]
    fn test_symmetry_parsing() {
        assert_eq!("X".parse::<Symmetry>(), Ok(Symmetry::Full));
        assert_eq!("^".parse::<Symmetry>(), Ok(Symmetry::None));
        assert_eq!("I".parse::<Symmetry>(), Ok(Symmetry::Straight));
        assert_eq!(" / ".parse::<Symmetry>(), Ok(Symmetry::Diagonal));
        assert!(matches!(
            "L".parse::<Symmetry>(),
            Err(RuleError::UnknownSymmetry(s)) if s == "L"
        ));
    }

    #[test]
    fn test_prohibited_empty_parsing() {
        assert_eq!(ProhibitedEmpty::parse("none"), Some(ProhibitedEmpty::NONE));
        assert_eq!(ProhibitedEmpty::parse(""), Some(ProhibitedEmpty::NONE));
        assert_eq!(ProhibitedEmpty::parse("All"), Some(ProhibitedEmpty::ALL));
        let flags = ProhibitedEmpty::parse("edge | unused").unwrap();
        assert!(flags.edge && flags.unused && !flags.uncollapsed);
        assert_eq!(ProhibitedEmpty::parse("sideways"), None);
    }

    #[test]
    fn test_unplaceable_definition() {
        let tile = TileDefinition::new("A", Symmetry::Full, "a,a,a,a").with_limit(0);
        assert!(tile.is_unplaceable());
        assert!(!tile.with_exceedable_limit().is_unplaceable());
    }
}
