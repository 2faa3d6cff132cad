use crate::assets::AssetRegistry;
use crate::generator::TileVariantFactory;
use crate::{LoadError, RuleSet};
use std::collections::HashSet;

/// Trait defining the interface for format-specific rule parsers.
///
/// Implementors turn the text of a rule file into a validated [`RuleSet`].
pub trait FormatParser {
    /// Parses rule content into a `RuleSet`.
    ///
    /// # Arguments
    ///
    /// * `content` - A string slice containing the rule content
    fn parse(&self, content: &str) -> Result<RuleSet, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// This can be used for debugging, logging, or user-facing error messages.
    fn format_name(&self) -> &'static str;
}

/// Checks the structural rules every format must uphold.
///
/// Map dimensions must be non-zero, every pass needs at least one tile, tile
/// tokens must parse, and masks may only name tiles of strictly earlier passes.
pub fn validate_rule_set(rules: &RuleSet) -> Result<(), LoadError> {
    if rules.map.width == 0 || rules.map.height == 0 {
        return Err(LoadError::InvalidData(format!(
            "Map dimensions must be non-zero, got {}x{}",
            rules.map.width, rules.map.height
        )));
    }
    if rules.passes.is_empty() {
        return Err(LoadError::InvalidData("No passes defined.".to_owned()));
    }

    // Token errors surface here instead of at generator construction.
    let no_assets = AssetRegistry::new();
    let factory = TileVariantFactory::new(&no_assets);
    for (index, pass) in rules.passes.iter().enumerate() {
        if pass.tiles.is_empty() {
            return Err(LoadError::InvalidData(format!(
                "Pass {index} ('{}') defines no tiles.",
                pass.name
            )));
        }
        factory.expand_all(&pass.tiles)?;

        for (&source, names) in &pass.mask {
            if source >= index {
                return Err(LoadError::InvalidData(format!(
                    "Pass {index} ('{}') is masked by pass {source}, which does not run before it.",
                    pass.name
                )));
            }
            let known: HashSet<&str> = rules.passes[source]
                .tiles
                .iter()
                .map(|tile| tile.name.as_str())
                .collect();
            if let Some(unknown) = names.iter().find(|name| !known.contains(name.as_str())) {
                return Err(LoadError::InvalidData(format!(
                    "Pass {index} ('{}') masks on unknown tile '{unknown}' of pass {source}.",
                    pass.name
                )));
            }
        }
    }
    Ok(())
}
