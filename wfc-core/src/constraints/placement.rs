use crate::WfcError;
use bitvec::prelude::{bitvec, BitVec, Lsb0};
use std::sync::Arc;
use wfc_rules::{Bindings, MapOptions, TileDefinition};

/// Per-definition bitmaps of the cells its placement rule accepts.
///
/// Rules only see the cell position and the map size, so they are evaluated
/// once at initialise time instead of per check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementTable {
    allowed: Vec<Option<BitVec<usize, Lsb0>>>,
}

impl PlacementTable {
    pub(super) fn initialise(
        &mut self,
        definitions: &[Arc<TileDefinition>],
        map: MapOptions,
    ) -> Result<(), WfcError> {
        self.allowed = definitions
            .iter()
            .map(|definition| {
                definition
                    .placement_rule
                    .as_ref()
                    .map(|rule| -> Result<BitVec<usize, Lsb0>, WfcError> {
                        let mut cells = bitvec![usize, Lsb0; 0; map.cell_count()];
                        for y in 0..map.height {
                            for x in 0..map.width {
                                let bindings = Bindings::for_cell(x, y, map.width, map.height);
                                let accepted = rule.eval_bool(&bindings).map_err(|source| {
                                    WfcError::Expression {
                                        context: format!("placement rule of '{}'", definition.name),
                                        source,
                                    }
                                })?;
                                cells.set(y * map.width + x, accepted);
                            }
                        }
                        Ok(cells)
                    })
                    .transpose()
            })
            .collect::<Result<_, WfcError>>()?;
        Ok(())
    }

    /// Definitions without a rule may go anywhere.
    pub fn allows(&self, definition_index: usize, cell: usize) -> bool {
        match self.allowed.get(definition_index) {
            Some(Some(cells)) => cells.get(cell).map_or(false, |bit| *bit),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_rules::{Expr, Symmetry, Variable};

    #[test]
    fn test_rule_evaluated_per_cell() {
        let on_border = Expr::Or(vec![
            Expr::binary(Expr::Eq, Expr::var(Variable::X), Expr::Int(0)),
            Expr::binary(Expr::Eq, Expr::var(Variable::X), Expr::var(Variable::MaxX)),
        ]);
        let definitions = vec![
            Arc::new(
                TileDefinition::new("Fence", Symmetry::Full, "A,A,A,A").with_placement_rule(on_border),
            ),
            Arc::new(TileDefinition::new("Grass", Symmetry::Full, "A,A,A,A")),
        ];
        let mut table = PlacementTable::default();
        table.initialise(&definitions, MapOptions::new(3, 2)).unwrap();

        let fence: Vec<bool> = (0..6).map(|cell| table.allows(0, cell)).collect();
        assert_eq!(fence, vec![true, false, true, true, false, true]);
        assert!((0..6).all(|cell| table.allows(1, cell)));
    }

    #[test]
    fn test_non_boolean_rule_is_a_configuration_error() {
        let definitions = vec![Arc::new(
            TileDefinition::new("Odd", Symmetry::Full, "A,A,A,A")
                .with_placement_rule(Expr::var(Variable::X)),
        )];
        let mut table = PlacementTable::default();
        let result = table.initialise(&definitions, MapOptions::new(2, 2));
        assert!(matches!(result, Err(WfcError::Expression { .. })));
    }
}
