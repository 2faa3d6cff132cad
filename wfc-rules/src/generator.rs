use crate::assets::AssetRegistry;
use crate::types::{Adapter, Mirror, ProhibitedEmpty, RuleError, TileDefinition};
use crate::variant::{Sides, TileVariant};
use log::{debug, trace};
use std::collections::HashSet;
use std::sync::Arc;

/// Expands tile definitions into their concrete oriented variants.
///
/// Each symmetry class yields its base rotations; every base rotation may then
/// add a horizontally mirrored, a vertically mirrored and a both-axes variant,
/// so one definition produces at most four times its base count.
#[derive(Debug, Clone, Copy)]
pub struct TileVariantFactory<'a> {
    assets: &'a AssetRegistry,
}

impl<'a> TileVariantFactory<'a> {
    pub fn new(assets: &'a AssetRegistry) -> Self {
        Self { assets }
    }

    /// Expands every definition of a pass, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateTileName` if two definitions share a name,
    /// or any token error raised by [`Self::expand`].
    pub fn expand_all(
        &self,
        definitions: &[TileDefinition],
    ) -> Result<(Vec<Arc<TileDefinition>>, Vec<TileVariant>), RuleError> {
        let mut seen = HashSet::new();
        let mut shared = Vec::with_capacity(definitions.len());
        let mut variants = Vec::new();
        for (index, definition) in definitions.iter().enumerate() {
            if !seen.insert(definition.name.as_str()) {
                return Err(RuleError::DuplicateTileName(definition.name.clone()));
            }
            let definition = Arc::new(definition.clone());
            variants.extend(self.expand(&definition, index)?);
            shared.push(definition);
        }
        debug!(
            "Expanded {} tile definitions into {} variants",
            shared.len(),
            variants.len()
        );
        Ok((shared, variants))
    }

    /// Expands one definition.
    pub fn expand(
        &self,
        definition: &Arc<TileDefinition>,
        definition_index: usize,
    ) -> Result<Vec<TileVariant>, RuleError> {
        let base = parse_sides(definition)?;
        let mandatory: Arc<[String]> = definition
            .mandatory_adapters
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into();
        let asset = self.assets.get(definition.asset_name()).cloned();
        if asset.is_none() && !self.assets.is_empty() {
            debug!(
                "No asset registered as '{}' for tile '{}'",
                definition.asset_name(),
                definition.name
            );
        }

        let mut variants = Vec::new();
        let mut push = |sides: Sides, rotation: i32, mirror: Mirror| {
            variants.push(TileVariant::from_sides(
                Arc::clone(definition),
                definition_index,
                sides,
                rotation,
                mirror,
                Arc::clone(&mandatory),
                asset.clone(),
            ));
        };

        for &offset in definition.symmetry.rotation_offsets() {
            let rotated = base.rotated(offset);
            let rotation = rotation_angle(offset);
            push(rotated.clone(), rotation, Mirror::None);
            if definition.mirror_horizontal && definition.mirror_vertical {
                push(rotated.mirrored_both(), rotation, Mirror::Both);
            }
            if definition.mirror_horizontal {
                push(rotated.mirrored_horizontal(), rotation, Mirror::Horizontal);
            }
            if definition.mirror_vertical {
                push(rotated.mirrored_vertical(), rotation, Mirror::Vertical);
            }
        }
        trace!(
            "Tile '{}' ({}) produced {} variants",
            definition.name,
            definition.symmetry.as_char(),
            variants.len()
        );
        Ok(variants)
    }
}

/// Quarter turns clockwise to degrees, with 270 reported as -90.
const fn rotation_angle(offset: usize) -> i32 {
    match offset % 4 {
        0 => 0,
        1 => 90,
        2 => 180,
        _ => -90,
    }
}

/// Splits a comma list into exactly four trimmed tokens, padding with `""`.
fn four_tokens<'t>(
    tile: &str,
    field: &'static str,
    raw: Option<&'t str>,
) -> Result<[&'t str; 4], RuleError> {
    let mut tokens = [""; 4];
    let Some(raw) = raw else {
        return Ok(tokens);
    };
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() > 4 {
        return Err(RuleError::TooManyTokens {
            tile: tile.to_owned(),
            field,
            count: parts.len(),
        });
    }
    tokens[..parts.len()].copy_from_slice(&parts);
    Ok(tokens)
}

fn parse_sides(definition: &TileDefinition) -> Result<Sides, RuleError> {
    let name = definition.name.as_str();
    let adapter_tokens = four_tokens(name, "adapter", Some(definition.adapters.as_str()))?;
    let weight_tokens = four_tokens(name, "entropy weight", definition.entropy_weights.as_deref())?;
    let empty_tokens = four_tokens(
        name,
        "empty-neighbour",
        definition.prohibited_empty_neighbours.as_deref(),
    )?;
    let self_tokens = four_tokens(name, "connect-to-self", definition.connect_to_self.as_deref())?;

    let mut entropy_weights = [definition.weight; 4];
    let mut prohibited_empty = [ProhibitedEmpty::NONE; 4];
    let mut connect_to_self = [true; 4];
    for i in 0..4 {
        if !weight_tokens[i].is_empty() {
            entropy_weights[i] =
                weight_tokens[i]
                    .parse()
                    .map_err(|_| RuleError::InvalidWeight {
                        tile: name.to_owned(),
                        token: weight_tokens[i].to_owned(),
                    })?;
        }
        prohibited_empty[i] =
            ProhibitedEmpty::parse(empty_tokens[i]).ok_or_else(|| RuleError::InvalidEmptyFlag {
                tile: name.to_owned(),
                token: empty_tokens[i].to_owned(),
            })?;
        connect_to_self[i] = match self_tokens[i].to_ascii_lowercase().as_str() {
            "" | "true" => true,
            "false" => false,
            _ => {
                return Err(RuleError::InvalidSelfFlag {
                    tile: name.to_owned(),
                    token: self_tokens[i].to_owned(),
                })
            }
        };
    }

    Ok(Sides {
        adapters: adapter_tokens.map(Adapter::new),
        entropy_weights,
        prohibited_empty,
        connect_to_self,
    })
}

const UP: usize = 0;
const RIGHT: usize = 1;
const DOWN: usize = 2;
const LEFT: usize = 3;

fn swap_pair<T: Clone>(values: &[T; 4], a: usize, b: usize) -> [T; 4] {
    let mut out = values.clone();
    out.swap(a, b);
    out
}

fn swap_opposites<T: Clone>(values: &[T; 4]) -> [T; 4] {
    swap_pair(&swap_pair(values, UP, DOWN), LEFT, RIGHT)
}

impl Sides {
    /// Side `target` takes what side `(target - offset) mod 4` had.
    fn rotated(&self, offset: usize) -> Self {
        let source = |target: usize| (target + 4 - offset % 4) % 4;
        Self {
            adapters: std::array::from_fn(|t| self.adapters[source(t)].clone()),
            entropy_weights: std::array::from_fn(|t| self.entropy_weights[source(t)]),
            prohibited_empty: std::array::from_fn(|t| self.prohibited_empty[source(t)]),
            connect_to_self: std::array::from_fn(|t| self.connect_to_self[source(t)]),
        }
    }

    /// 180 degrees across both axes: opposite sides swap, patterns unchanged.
    fn mirrored_both(&self) -> Self {
        Self {
            adapters: swap_opposites(&self.adapters),
            entropy_weights: swap_opposites(&self.entropy_weights),
            prohibited_empty: swap_opposites(&self.prohibited_empty),
            connect_to_self: swap_opposites(&self.connect_to_self),
        }
    }

    /// Left and right trade places; every pattern reads backwards.
    fn mirrored_horizontal(&self) -> Self {
        let a = &self.adapters;
        Self {
            adapters: [
                a[UP].flipped(),
                a[LEFT].flipped(),
                a[DOWN].flipped(),
                a[RIGHT].flipped(),
            ],
            entropy_weights: swap_pair(&self.entropy_weights, LEFT, RIGHT),
            prohibited_empty: swap_pair(&self.prohibited_empty, LEFT, RIGHT),
            connect_to_self: swap_pair(&self.connect_to_self, LEFT, RIGHT),
        }
    }

    /// Up and down trade places; every pattern reads backwards.
    fn mirrored_vertical(&self) -> Self {
        let a = &self.adapters;
        Self {
            adapters: [
                a[DOWN].flipped(),
                a[RIGHT].flipped(),
                a[UP].flipped(),
                a[LEFT].flipped(),
            ],
            entropy_weights: swap_pair(&self.entropy_weights, UP, DOWN),
            prohibited_empty: swap_pair(&self.prohibited_empty, UP, DOWN),
            connect_to_self: swap_pair(&self.connect_to_self, UP, DOWN),
        }
    }
}
