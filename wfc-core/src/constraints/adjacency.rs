//! Constraints that only look at the candidate and the cell's four neighbours.

use super::CheckContext;
use wfc_rules::{Direction, TileVariant};

/// Committed neighbours of `cell` with the direction leading to each.
fn placed_neighbours<'a>(
    ctx: &'a CheckContext<'a>,
    cell: usize,
) -> impl Iterator<Item = (Direction, &'a TileVariant)> + 'a {
    ctx.grid
        .cell(cell)
        .neighbours()
        .filter_map(move |(direction, neighbour)| {
            ctx.placed(neighbour).map(|variant| (direction, variant))
        })
}

pub(super) fn adapters_fit(ctx: &CheckContext<'_>, cell: usize, candidate: &TileVariant) -> bool {
    placed_neighbours(ctx, cell)
        .all(|(direction, neighbour)| candidate.can_adapt_to(direction, neighbour))
}

/// Passes when the candidate has no mandatory adapters, or one of them faces
/// a committed neighbour.
pub(super) fn mandatory_adapter_met(
    ctx: &CheckContext<'_>,
    cell: usize,
    candidate: &TileVariant,
) -> bool {
    if candidate.mandatory_adapters().is_empty() {
        return true;
    }
    placed_neighbours(ctx, cell).any(|(direction, _)| candidate.is_adapter_mandatory(direction))
}

/// Only the candidate's accepted categories are consulted, never the
/// neighbour's.
pub(super) fn categories_connect(
    ctx: &CheckContext<'_>,
    cell: usize,
    candidate: &TileVariant,
) -> bool {
    let Some(accepted) = candidate.definition().connectable_categories.as_ref() else {
        return true;
    };
    placed_neighbours(ctx, cell).all(|(_, neighbour)| {
        neighbour
            .definition()
            .category
            .as_ref()
            .map_or(true, |category| accepted.contains(category))
    })
}

pub(super) fn empty_neighbours_allowed(
    ctx: &CheckContext<'_>,
    cell: usize,
    candidate: &TileVariant,
) -> bool {
    let grid_cell = ctx.grid.cell(cell);
    Direction::ALL.into_iter().all(|direction| {
        let prohibited = candidate.prohibited_empty(direction);
        if !prohibited.any() {
            return true;
        }
        match grid_cell.neighbour(direction).map(|n| ctx.grid.cell(n)) {
            None => !prohibited.edge,
            Some(neighbour) if neighbour.unused => !prohibited.unused,
            Some(neighbour) if !neighbour.is_collapsed() => !prohibited.uncollapsed,
            Some(_) => true,
        }
    })
}

pub(super) fn self_connection_allowed(
    ctx: &CheckContext<'_>,
    cell: usize,
    candidate: &TileVariant,
) -> bool {
    placed_neighbours(ctx, cell).all(|(direction, neighbour)| {
        neighbour.name() != candidate.name() || candidate.can_connect_to_self(direction)
    })
}
