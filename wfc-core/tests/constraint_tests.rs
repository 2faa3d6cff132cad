use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use wfc_core::{Constraint, Generator, NextStepResult};
use wfc_rules::{
    AssetRegistry, ConstraintKind, GeneratorOptions, MapOptions, PassDefinition, Symmetry,
    TileDefinition, TileVariantFactory,
};

fn limited_tiles(limits: &[Option<u32>]) -> Vec<TileDefinition> {
    limits
        .iter()
        .enumerate()
        .map(|(i, limit)| {
            let tile = TileDefinition::new(format!("T{i}"), Symmetry::Full, "A,A,A,A");
            match limit {
                Some(limit) => tile.with_limit(*limit),
                None => tile,
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_limit_commit_then_revert_restores_counters(
        limits in prop::collection::vec(prop::option::of(0u32..5), 1..6),
        commits in prop::collection::vec(0usize..6, 0..12),
    ) {
        let definitions = limited_tiles(&limits);
        let assets = AssetRegistry::new();
        let (shared, variants) = TileVariantFactory::new(&assets).expand_all(&definitions).unwrap();
        let mut constraint = Constraint::new(ConstraintKind::Limit);
        constraint.initialise(&shared, MapOptions::new(4, 4)).unwrap();

        let Constraint::Limit(initial) = constraint.clone() else { unreachable!() };
        let chosen: Vec<usize> = commits.iter().map(|c| c % variants.len()).collect();
        for &variant in &chosen {
            let Constraint::Limit(before) = constraint.clone() else { unreachable!() };
            constraint.after_choice(&variants[variant]);
            constraint.revert(&variants[variant]);
            let Constraint::Limit(after) = &constraint else { unreachable!() };
            prop_assert_eq!(&before, after);
            constraint.after_choice(&variants[variant]);
        }
        for &variant in chosen.iter().rev() {
            constraint.revert(&variants[variant]);
        }
        let Constraint::Limit(restored) = &constraint else { unreachable!() };
        prop_assert_eq!(restored, &initial);
    }

    #[test]
    fn prop_completed_maps_respect_adapters(seed in any::<u64>(), width in 1usize..6, height in 1usize..6) {
        let tiles = vec![
            TileDefinition::new("Field", Symmetry::Full, "A,A,A,A").with_weight(4),
            TileDefinition::new("Cross", Symmetry::Full, "B,B,B,B"),
            TileDefinition::new("End", Symmetry::None, "A,A,A,B"),
            TileDefinition::new("Bend", Symmetry::None, "A,A,B,B"),
            TileDefinition::new("Road", Symmetry::Straight, "A,B,A,B").with_weight(2),
            TileDefinition::new("Tee", Symmetry::None, "A,B,B,B"),
        ];
        let pass = PassDefinition::new(
            "roads",
            GeneratorOptions::default().with_fallback_attempts(Some(0)),
            tiles,
        );
        let mut generator = Generator::new(MapOptions::new(width, height), &pass, &AssetRegistry::new()).unwrap();
        generator.prepare(None).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        // Every combination of road and field sides has a tile, so nothing rolls back.
        prop_assert_eq!(generator.execute(&mut rng).unwrap(), NextStepResult::Complete);
        prop_assert_eq!(generator.statistics().rollbacks, 0);

        let grid = generator.grid();
        let variants = generator.variants();
        for cell in grid.cells() {
            let placed = &variants[cell.variant.unwrap()];
            for (direction, neighbour) in cell.neighbours() {
                let other = &variants[grid.cell(neighbour).variant.unwrap()];
                prop_assert!(placed.can_adapt_to(direction, other));
            }
        }
    }
}

#[test]
fn test_shared_definitions_are_reference_counted() {
    let assets = AssetRegistry::new();
    let (shared, variants) = TileVariantFactory::new(&assets)
        .expand_all(&limited_tiles(&[Some(1)]))
        .unwrap();
    let mut constraint = Constraint::new(ConstraintKind::Limit);
    constraint.initialise(&shared, MapOptions::new(1, 1)).unwrap();
    constraint.after_choice(&variants[0]);
    let Constraint::Limit(limit) = &constraint else {
        unreachable!()
    };
    assert!(limit.is_exhausted(0));
    assert!(Arc::strong_count(&shared[0]) > 1);
}
