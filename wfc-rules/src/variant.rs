use crate::assets::AssetHandle;
use crate::types::{Adapter, Direction, Mirror, ProhibitedEmpty, TileDefinition};
use std::sync::Arc;

/// One concrete, placeable orientation of a [`TileDefinition`].
///
/// Variants are built once per pass by the
/// [`TileVariantFactory`](crate::TileVariantFactory) and shared by index;
/// nothing mutates them afterwards.
#[derive(Debug, Clone)]
pub struct TileVariant {
    definition: Arc<TileDefinition>,
    definition_index: usize,
    adapters: [Adapter; 4],
    entropy_weights: [u32; 4],
    prohibited_empty: [ProhibitedEmpty; 4],
    connect_to_self: [bool; 4],
    rotation: i32,
    mirror: Mirror,
    mandatory_adapters: Arc<[String]>,
    asset: Option<AssetHandle>,
}

/// Per-side data of a variant, indexed by [`Direction::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sides {
    pub adapters: [Adapter; 4],
    pub entropy_weights: [u32; 4],
    pub prohibited_empty: [ProhibitedEmpty; 4],
    pub connect_to_self: [bool; 4],
}

impl TileVariant {
    pub(crate) fn from_sides(
        definition: Arc<TileDefinition>,
        definition_index: usize,
        sides: Sides,
        rotation: i32,
        mirror: Mirror,
        mandatory_adapters: Arc<[String]>,
        asset: Option<AssetHandle>,
    ) -> Self {
        Self {
            definition,
            definition_index,
            adapters: sides.adapters,
            entropy_weights: sides.entropy_weights,
            prohibited_empty: sides.prohibited_empty,
            connect_to_self: sides.connect_to_self,
            rotation,
            mirror,
            mandatory_adapters,
            asset,
        }
    }

    pub fn definition(&self) -> &TileDefinition {
        &self.definition
    }

    /// Position of the owning definition in its pass.
    pub fn definition_index(&self) -> usize {
        self.definition_index
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn weight(&self) -> u32 {
        self.definition.weight
    }

    pub fn adapter(&self, direction: Direction) -> &Adapter {
        &self.adapters[direction.index()]
    }

    pub fn entropy_weight(&self, direction: Direction) -> u32 {
        self.entropy_weights[direction.index()]
    }

    pub fn prohibited_empty(&self, direction: Direction) -> ProhibitedEmpty {
        self.prohibited_empty[direction.index()]
    }

    pub fn can_connect_to_self(&self, direction: Direction) -> bool {
        self.connect_to_self[direction.index()]
    }

    /// Rotation in degrees: 0, 90, 180 or -90.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn mirror(&self) -> Mirror {
        self.mirror
    }

    pub fn mandatory_adapters(&self) -> &[String] {
        &self.mandatory_adapters
    }

    pub fn asset(&self) -> Option<&AssetHandle> {
        self.asset.as_ref()
    }

    /// Whether this variant may sit next to `neighbour`, which lies in `direction`.
    ///
    /// The edges fit only when the facing pattern is the exact character
    /// reversal of ours.
    #[inline]
    pub fn can_adapt_to(&self, direction: Direction, neighbour: &Self) -> bool {
        self.adapter(direction)
            .fits(neighbour.adapter(direction.opposite()))
    }

    /// Whether our adapter facing `direction` is one of the mandatory ones.
    pub fn is_adapter_mandatory(&self, direction: Direction) -> bool {
        let pattern = self.adapter(direction).pattern();
        self.mandatory_adapters.iter().any(|m| m == pattern)
    }
}
