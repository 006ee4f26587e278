//! # BridgeKit
//!
//! A post-processor for slicer G-code that treats bridges (overhangs printed
//! over open air) specially:
//! - Pause, and optionally beep, before every bridge move
//! - Override or scale the bridge feed rate
//! - Override or scale the bridge extrusion
//! - Retract once at the start of every bridge
//!
//! ## Architecture
//!
//! 1. **bridgekit-core** - Error types and the layer-block job model
//! 2. **bridgekit-settings** - Typed settings, validation, persistence, schema
//! 3. **bridgekit-postprocessor** - Line classifier and the bridge rewriter
//! 4. **bridgekit** - Command-line binary tying the crates together

use std::io::Write;
use std::path::Path;

use anyhow::Context;

pub use bridgekit_core::{join_layers, split_layers, Error, GcodeError, PrintJob, Result};
pub use bridgekit_postprocessor::{
    rewrite, AdvancedBridges, LayerRewriter, PostProcessor, RewriteReport, RewriteStats,
};
pub use bridgekit_settings::{settings_schema_json, BridgeSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for rewritten G-code
/// - RUST_LOG environment variable support
/// - `verbose` lowers the default level from INFO to DEBUG
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Resolve the settings for a run
///
/// An explicit path must load. Without one, the per-user settings file is
/// used when it exists, and defaults otherwise.
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<BridgeSettings> {
    if let Some(path) = config {
        return BridgeSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()));
    }

    match BridgeSettings::default_path() {
        Ok(path) if path.is_file() => {
            tracing::info!("Using settings from {}", path.display());
            BridgeSettings::load_from_file(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
        _ => Ok(BridgeSettings::default()),
    }
}

/// Rewrite a complete G-code program
pub fn process_gcode(text: &str, settings: &BridgeSettings) -> (String, RewriteReport) {
    let job = PrintJob::from_gcode(text);
    let report = AdvancedBridges::new(settings.clone()).run(job.layers());
    let output = join_layers(&report.layers);
    (output, report)
}

/// Rewrite a G-code file, writing to `output` or stdout
pub fn process_file(
    input: &Path,
    output: Option<&Path>,
    settings: &BridgeSettings,
) -> anyhow::Result<RewriteStats> {
    let job = PrintJob::load(input)
        .with_context(|| format!("Failed to read G-code from {}", input.display()))?;
    tracing::info!(
        "Processing {} ({} layer blocks)",
        input.display(),
        job.layer_count()
    );

    let report = AdvancedBridges::new(settings.clone()).run(job.layers());
    for diagnostic in &report.diagnostics {
        tracing::warn!("{}", diagnostic);
    }

    let rewritten = PrintJob::new(report.layers);
    match output {
        Some(path) => rewritten
            .save(path)
            .with_context(|| format!("Failed to write G-code to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rewritten.to_gcode().as_bytes())
                .context("Failed to write G-code to stdout")?;
            stdout.flush()?;
        }
    }

    let stats = report.stats;
    tracing::info!(
        "Done: {} bridges, {} moves rewritten, {} full and {} small retractions, {} dropped",
        stats.bridges,
        stats.qualifying_moves,
        stats.full_retractions,
        stats.small_retractions,
        stats.dropped_moves
    );
    Ok(stats)
}
