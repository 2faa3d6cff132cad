// tile-forge-app/src/main.rs

use crate::config::{AppConfig, Settings, VisualizationMode};
use crate::logging::init_logger;
use crate::output::save_layers_to_file;
use crate::progress::{ConsoleProgressReporter, ProgressInfo, ProgressReporter};
use crate::visualization::{glyph_assets, TerminalVisualizer, Visualizer};
use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wfc_core::{NextStepResult, PassRunner};
use wfc_rules::loader::load_from_file;
use wfc_rules::RuleSet;

/// Parses the command line and runs the generator.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    let settings = config.resolve().context("Failed to resolve settings")?;
    init_logger(&settings);

    log::info!("Tile Forge App Starting");
    log::debug!("Arguments: {:?}", config);
    log::debug!("Settings: {:?}", settings);
    run(&config, &settings)
}

/// Applies command-line and settings overrides to the loaded rules.
pub fn apply_overrides(rules: &mut RuleSet, settings: &Settings) -> Result<()> {
    if let Some(width) = settings.width {
        rules.map.width = width;
    }
    if let Some(height) = settings.height {
        rules.map.height = height;
    }
    if rules.map.width == 0 || rules.map.height == 0 {
        bail!(
            "Map dimensions must be non-zero, got {}x{}",
            rules.map.width,
            rules.map.height
        );
    }
    if let Some(heuristic) = settings.entropy_heuristic {
        for pass in &mut rules.passes {
            pass.options.entropy_heuristic = heuristic;
        }
    }
    Ok(())
}

fn progress_info<R: rand::Rng>(runner: &PassRunner<R>) -> ProgressInfo {
    let pass = runner.current_pass().min(runner.pass_count().saturating_sub(1));
    ProgressInfo {
        pass,
        pass_count: runner.pass_count(),
        pass_name: runner
            .generator(pass)
            .map(|g| g.name().to_owned())
            .unwrap_or_default(),
        statistics: runner.statistics(),
    }
}

/// Loads the rules, solves every pass and writes the layers.
pub fn run(config: &AppConfig, settings: &Settings) -> Result<()> {
    log::info!("Loading rules from: {:?}", config.rule_file);
    let mut rules = load_from_file(&config.rule_file)
        .with_context(|| format!("Failed to load rules from {:?}", config.rule_file))?;
    apply_overrides(&mut rules, settings)?;
    log::info!(
        "Rules loaded: {} passes on a {}x{} map",
        rules.passes.len(),
        rules.map.width,
        rules.map.height
    );

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {}", seed);

    let assets = glyph_assets(&rules);
    let mut runner = PassRunner::new(&rules, &assets, StdRng::seed_from_u64(seed))
        .context("Invalid rule configuration")?;
    runner.reset().context("Invalid rule configuration")?;

    let mut reporter = settings
        .progress_interval()?
        .map(|interval| ConsoleProgressReporter::new(interval, settings.progress_log_level));
    let mut visualizer = (settings.visualization_mode == VisualizationMode::Terminal)
        .then(TerminalVisualizer::new);

    let width = rules.map.width;
    let names: Vec<&str> = rules.passes.iter().map(|p| p.name.as_str()).collect();
    let mut shown = 0;
    let outcome = loop {
        let result = runner.execute_next_step()?;
        if let Some(reporter) = reporter.as_mut() {
            reporter.report(&progress_info(&runner));
        }
        if let Some(visualizer) = visualizer.as_mut() {
            for (index, layer) in runner.layers().iter().enumerate().skip(shown) {
                let title = format!("Pass {index}: {}", names.get(index).copied().unwrap_or(""));
                visualizer.display_layer(&title, layer, width);
            }
        }
        shown = runner.layers().len();
        if result.is_finished() {
            break result;
        }
    };

    save_layers_to_file(runner.layers(), &names, width, &settings.output_path)?;

    let info = progress_info(&runner);
    if outcome == NextStepResult::Failed {
        if let Some(reporter) = reporter.as_mut() {
            reporter.fail(&info);
        }
        bail!(
            "Pass '{}' ran out of fallback attempts (seed {})",
            info.pass_name,
            seed
        );
    }
    if let Some(reporter) = reporter.as_mut() {
        reporter.finish(&info);
    }
    log::info!("Tile Forge App Finished.");
    Ok(())
}
