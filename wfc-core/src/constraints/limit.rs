use super::CheckContext;
use std::sync::Arc;
use wfc_rules::TileDefinition;

/// Remaining placements per tile definition.
///
/// Only definitions with a finite limit are tracked; the rest are `None`.
/// A counter never drops below zero and never rises above its original
/// limit. Placements beyond the limit are counted separately, so a rollback
/// undoes those first and commit and rollback stay exact inverses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitConstraint {
    limits: Vec<Option<u32>>,
    remaining: Vec<Option<u32>>,
    exceeded: Vec<u32>,
    can_exceed: Vec<bool>,
}

impl LimitConstraint {
    pub(super) fn initialise(&mut self, definitions: &[Arc<TileDefinition>]) {
        self.limits = definitions.iter().map(|d| d.limit).collect();
        self.remaining = self.limits.clone();
        self.exceeded = vec![0; definitions.len()];
        self.can_exceed = definitions
            .iter()
            .map(|d| d.can_exceed_limit_if_only_valid_tile)
            .collect();
    }

    /// Placements left for the definition at `definition_index`; `None` when unlimited.
    pub fn remaining(&self, definition_index: usize) -> Option<u32> {
        self.remaining.get(definition_index).copied().flatten()
    }

    pub fn is_exhausted(&self, definition_index: usize) -> bool {
        self.remaining(definition_index) == Some(0)
    }

    pub(super) fn check(&self, ctx: &CheckContext<'_>, candidate: usize, live: &[usize]) -> bool {
        let definition_index = ctx.variants[candidate].definition_index();
        if !self.is_exhausted(definition_index) {
            return true;
        }
        if !self.can_exceed[definition_index] {
            return false;
        }
        // Exceeding is allowed only if nothing else is a real option.
        live.iter().filter(|&&other| other != candidate).all(|&other| {
            let variant = &ctx.variants[other];
            self.is_exhausted(variant.definition_index())
                || variant.definition().only_allowed_if_no_valid_tiles
        })
    }

    pub(super) fn consume(&mut self, definition_index: usize) {
        if let Some(Some(remaining)) = self.remaining.get_mut(definition_index) {
            if *remaining == 0 {
                self.exceeded[definition_index] += 1;
            } else {
                *remaining -= 1;
            }
        }
    }

    pub(super) fn restore(&mut self, definition_index: usize) {
        let limit = self.limits.get(definition_index).copied().flatten();
        if let (Some(Some(remaining)), Some(limit)) =
            (self.remaining.get_mut(definition_index), limit)
        {
            if self.exceeded[definition_index] > 0 {
                self.exceeded[definition_index] -= 1;
            } else {
                *remaining = (*remaining + 1).min(limit);
            }
        }
    }
}
