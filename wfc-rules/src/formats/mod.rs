//! Module defining parsers for different rule file formats.

pub mod parser;
pub use parser::{validate_rule_set, FormatParser};

pub mod ron_format;
pub use ron_format::{parse_ron_rules, RonFormatParser};
