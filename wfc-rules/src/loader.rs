use crate::formats::{FormatParser, RonFormatParser};
use crate::{LoadError, RuleSet};
use log::info;
use std::path::Path;

/// Loads a rule set from a file.
///
/// The format is chosen from the extension; only `.ron` is supported.
///
/// # Arguments
///
/// * `path` - The path to the rule definition file.
pub fn load_from_file(path: &Path) -> Result<RuleSet, LoadError> {
    let parser: Box<dyn FormatParser> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => Box::new(RonFormatParser::new()),
        other => {
            return Err(LoadError::UnsupportedFormat(
                other.unwrap_or_default().to_owned(),
            ))
        }
    };
    let content = std::fs::read_to_string(path)?;
    info!("Loading {} rules from {:?}", parser.format_name(), path);
    parser.parse(&content)
}
