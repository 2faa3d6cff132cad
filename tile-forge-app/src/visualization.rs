use colored::{Color, ColoredString, Colorize};
use wfc_core::CellSnapshot;
use wfc_rules::{AssetHandle, AssetRegistry, RuleSet};

/// Terminal stand-in for a tile texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph(pub char);

/// Registers one [`Glyph`] per asset name used by the rule set: the first
/// letter of the asset name.
pub fn glyph_assets(rules: &RuleSet) -> AssetRegistry {
    let mut assets = AssetRegistry::new();
    for tile in rules.passes.iter().flat_map(|pass| &pass.tiles) {
        let name = tile.asset_name();
        if assets.get(name).is_none() {
            let glyph = Glyph(name.chars().next().unwrap_or('?'));
            assets.insert(name, AssetHandle::new(glyph));
        }
    }
    assets
}

/// Trait for types that can present a solved or partially solved layer.
pub trait Visualizer {
    /// Displays one layer of `width` columns.
    fn display_layer(&mut self, title: &str, layer: &[CellSnapshot], width: usize);
}

const PALETTE: [Color; 8] = [
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
    Color::BrightGreen,
    Color::BrightBlue,
];

/// Prints each layer as coloured glyphs, one per cell.
///
/// A placed cell shows its [`Glyph`] asset, or the first letter of its tile
/// when it has none, coloured by tile definition. Uncollapsed cells show a
/// dimmed `.`; unused cells stay blank.
#[derive(Debug, Default)]
pub struct TerminalVisualizer {
    frames: usize,
}

impl TerminalVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layers displayed so far.
    pub const fn frames(&self) -> usize {
        self.frames
    }

    pub fn glyph(cell: &CellSnapshot) -> ColoredString {
        if cell.unused {
            return " ".normal();
        }
        match cell.variant.as_ref() {
            None => ".".dimmed(),
            Some(variant) => {
                let letter = variant
                    .asset()
                    .and_then(|asset| asset.downcast_ref::<Glyph>())
                    .map_or_else(|| variant.name().chars().next().unwrap_or('?'), |g| g.0);
                letter
                    .to_string()
                    .color(PALETTE[variant.definition_index() % PALETTE.len()])
                    .bold()
            }
        }
    }

    /// Renders a layer without printing it.
    pub fn render(layer: &[CellSnapshot], width: usize) -> String {
        layer
            .chunks(width.max(1))
            .map(|row| row.iter().map(|cell| Self::glyph(cell).to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Visualizer for TerminalVisualizer {
    fn display_layer(&mut self, title: &str, layer: &[CellSnapshot], width: usize) {
        self.frames += 1;
        println!("{}", format!("--- {title} ---").bold());
        println!("{}", Self::render(layer, width));
    }
}
