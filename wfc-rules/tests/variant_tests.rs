use proptest::prelude::*;
use std::sync::Arc;
use wfc_rules::{
    Adapter, AssetHandle, AssetRegistry, Direction, Symmetry, TileDefinition, TileVariantFactory,
};

fn expand(definition: TileDefinition) -> Vec<wfc_rules::TileVariant> {
    let assets = AssetRegistry::new();
    TileVariantFactory::new(&assets)
        .expand(&Arc::new(definition), 0)
        .expect("definition should expand")
}

fn symmetry_strategy() -> impl Strategy<Value = Symmetry> {
    prop_oneof![
        Just(Symmetry::Full),
        Just(Symmetry::None),
        Just(Symmetry::Straight),
        Just(Symmetry::Diagonal),
    ]
}

proptest! {
    #[test]
    fn variant_count_follows_symmetry_and_mirrors(
        symmetry in symmetry_strategy(),
        horizontal in any::<bool>(),
        vertical in any::<bool>(),
    ) {
        let base = match symmetry {
            Symmetry::Full => 1,
            Symmetry::Straight | Symmetry::Diagonal => 2,
            Symmetry::None => 4,
        };
        let factor = match (horizontal, vertical) {
            (false, false) => 1,
            (true, true) => 4,
            _ => 2,
        };
        let variants = expand(
            TileDefinition::new("T", symmetry, "ab,cd,ef,gh").with_mirroring(horizontal, vertical),
        );
        prop_assert_eq!(variants.len(), base * factor);
    }

    #[test]
    fn adapters_fit_exactly_their_reversal(pattern in "[A-D]{1,5}") {
        let reversed: String = pattern.chars().rev().collect();
        prop_assert!(Adapter::new(pattern.clone()).fits(&Adapter::new(reversed.clone())));
        if pattern != reversed {
            prop_assert!(!Adapter::new(pattern.clone()).fits(&Adapter::new(pattern)));
        }
    }
}

#[test]
fn test_can_adapt_to_uses_facing_sides() {
    let variants = expand(TileDefinition::new("T", Symmetry::Full, "ABC,CCC,CBA,CCC"));
    let tile = &variants[0];
    // Our down edge "CBA" faces the neighbour's up edge "ABC".
    assert!(tile.can_adapt_to(Direction::Down, tile));
    assert!(tile.can_adapt_to(Direction::Up, tile));
    assert!(tile.can_adapt_to(Direction::Right, tile));

    let broken = expand(TileDefinition::new("B", Symmetry::Full, "ABC,CCC,ABC,CCC"));
    assert!(!broken[0].can_adapt_to(Direction::Down, &broken[0]));
    assert!(broken[0].can_adapt_to(Direction::Left, &broken[0]));
}

#[test]
fn test_mandatory_adapters_follow_rotation() {
    let variants = expand(
        TileDefinition::new("Door", Symmetry::None, "door,w,w,w").with_mandatory_adapters("door"),
    );
    assert!(variants[0].is_adapter_mandatory(Direction::Up));
    assert!(!variants[0].is_adapter_mandatory(Direction::Right));
    assert!(variants[1].is_adapter_mandatory(Direction::Right));
    assert_eq!(variants[1].mandatory_adapters(), ["door".to_owned()]);
}

#[test]
fn test_asset_handles_are_shared_between_variants() {
    let mut assets = AssetRegistry::new();
    assets.insert("road_texture", AssetHandle::new(7_u32));
    let definition =
        Arc::new(TileDefinition::new("Road", Symmetry::Straight, "r,g,r,g").with_asset("road_texture"));
    let variants = TileVariantFactory::new(&assets)
        .expand(&definition, 3)
        .expect("road expands");
    assert_eq!(variants.len(), 2);
    let first = variants[0].asset().expect("asset attached");
    let second = variants[1].asset().expect("asset attached");
    assert!(first.ptr_eq(second));
    assert_eq!(first.downcast_ref::<u32>(), Some(&7));
    assert_eq!(variants[1].definition_index(), 3);
    assert_eq!(variants[1].rotation(), 90);
}
