use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use wfc_core::CellSnapshot;
use wfc_rules::Mirror;

/// Text for one cell: `name:rotation` plus a mirror suffix, `.` when
/// uncollapsed and a blank when unused.
pub fn cell_token(cell: &CellSnapshot) -> String {
    if cell.unused {
        return " ".to_owned();
    }
    let Some(variant) = cell.variant.as_ref() else {
        return ".".to_owned();
    };
    let mirror = match variant.mirror() {
        Mirror::None => "",
        Mirror::Horizontal => "h",
        Mirror::Vertical => "v",
        Mirror::Both => "hv",
    };
    format!("{}:{}{}", variant.name(), variant.rotation(), mirror)
}

/// Renders a layer as rows of column-aligned cell tokens.
pub fn format_layer(layer: &[CellSnapshot], width: usize) -> String {
    let tokens: Vec<String> = layer.iter().map(cell_token).collect();
    let column = tokens.iter().map(String::len).max().unwrap_or(1);
    let mut text = String::new();
    for row in tokens.chunks(width.max(1)) {
        let line = row
            .iter()
            .map(|token| format!("{token:<column$}"))
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

/// Writes every layer under a `# Pass` header, separated by blank lines.
pub fn write_layers<W: Write>(
    writer: &mut W,
    layers: &[Vec<CellSnapshot>],
    names: &[&str],
    width: usize,
) -> io::Result<()> {
    for (index, layer) in layers.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        let name = names.get(index).copied().unwrap_or("");
        writeln!(writer, "# Pass {index}: {name}")?;
        write!(writer, "{}", format_layer(layer, width))?;
    }
    Ok(())
}

/// Saves the layers to `output_path` in the text format of [`write_layers`].
pub fn save_layers_to_file(
    layers: &[Vec<CellSnapshot>],
    names: &[&str],
    width: usize,
    output_path: &Path,
) -> Result<()> {
    log::info!("Attempting to save {} layers to {:?}...", layers.len(), output_path);

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);
    write_layers(&mut writer, layers, names, width)
        .with_context(|| format!("Failed to write layers to {:?}", output_path))?;
    writer
        .flush()
        .context("Failed to flush writer for output file")?;

    log::info!("Successfully saved layers to {:?}", output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_core::Generator;
    use wfc_rules::{
        AssetRegistry, GeneratorOptions, MapOptions, PassDefinition, Symmetry, TileDefinition,
    };

    fn solved_layer() -> Vec<CellSnapshot> {
        let pass = PassDefinition::new(
            "floor",
            GeneratorOptions::default(),
            vec![TileDefinition::new("Floor", Symmetry::Full, "A,A,A,A")],
        );
        let mut generator =
            Generator::new(MapOptions::new(3, 2), &pass, &AssetRegistry::new()).unwrap();
        generator.prepare(None).unwrap();
        generator.execute(&mut StdRng::seed_from_u64(1)).unwrap();
        generator.snapshot()
    }

    #[test]
    fn test_format_layer_rows() {
        let mut layer = solved_layer();
        layer[1].variant = None;
        layer[5].variant = None;
        layer[5].unused = true;
        let text = format_layer(&layer, 3);
        assert_eq!(text, "Floor:0 .       Floor:0\nFloor:0 Floor:0\n");
    }

    #[test]
    fn test_write_layers_headers() {
        let layer = solved_layer();
        let mut buffer = Vec::new();
        write_layers(&mut buffer, &[layer.clone(), layer], &["a", "b"], 3).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Pass 0: a\n"));
        assert!(text.contains("\n\n# Pass 1: b\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("Floor")).count(), 4);
    }
}
