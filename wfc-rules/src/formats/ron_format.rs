use crate::formats::{validate_rule_set, FormatParser};
use crate::{LoadError, RuleSet};
use log::debug;

/// A parser implementation for RON (Rusty Object Notation) format rules.
///
/// The document mirrors [`RuleSet`] directly:
///
/// ```ron
/// (
///     map: (width: 8, height: 8),
///     passes: [
///         (
///             name: "terrain",
///             tiles: [
///                 (name: "Grass", symmetry: "X", adapters: "g,g,g,g"),
///             ],
///         ),
///     ],
/// )
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RonFormatParser;

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse(&self, ron_content: &str) -> Result<RuleSet, LoadError> {
        let rules: RuleSet = ron::from_str(ron_content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        validate_rule_set(&rules)?;
        debug!(
            "Parsed RON rule set: {}x{} map, {} passes",
            rules.map.width,
            rules.map.height,
            rules.passes.len()
        );
        Ok(rules)
    }
}

/// Parses a rule set defined in a RON string.
pub fn parse_ron_rules(ron_content: &str) -> Result<RuleSet, LoadError> {
    RonFormatParser::new().parse(ron_content)
}
