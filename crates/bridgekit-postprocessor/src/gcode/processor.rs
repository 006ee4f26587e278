//! Post-processor contract and the bridge post-processor

use std::sync::Arc;

use bridgekit_core::{GcodeError, Result};
use bridgekit_settings::{settings_schema_json, BridgeSettings, PROCESSOR_NAME};

use super::rewriter::{LayerRewriter, RewriteStats};

/// Trait for slicer output post-processors
///
/// A post-processor receives the ordered layer blocks of one print job and
/// returns the same number of blocks, rewritten.
pub trait PostProcessor: Send + Sync {
    /// Get the name/identifier of this post-processor
    fn name(&self) -> &str;

    /// Get a description of what this post-processor does
    fn description(&self) -> &str;

    /// Host-facing description of the accepted settings, as JSON text
    fn settings_schema(&self) -> Result<String>;

    /// Rewrite a whole job
    fn execute(&self, layers: Vec<String>) -> Result<Vec<String>>;
}

/// Arc-wrapped post-processor for thread-safe sharing
pub type PostProcessorHandle = Arc<dyn PostProcessor>;

/// Output of a bridge rewrite
#[derive(Debug, Clone)]
pub struct RewriteReport {
    pub layers: Vec<String>,
    pub stats: RewriteStats,
    pub diagnostics: Vec<GcodeError>,
}

/// Pauses before bridges and retunes bridge speed, flow and retraction
#[derive(Debug, Clone, Default)]
pub struct AdvancedBridges {
    settings: BridgeSettings,
}

impl AdvancedBridges {
    pub fn new(settings: BridgeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Rewrite a job and keep the counters and diagnostics
    pub fn run<S: AsRef<str>>(&self, layers: &[S]) -> RewriteReport {
        let mut rewriter = LayerRewriter::new(&self.settings);
        let layers = rewriter.rewrite_layers(layers);

        RewriteReport {
            layers,
            stats: *rewriter.stats(),
            diagnostics: rewriter.diagnostics().to_vec(),
        }
    }
}

impl PostProcessor for AdvancedBridges {
    fn name(&self) -> &str {
        PROCESSOR_NAME
    }

    fn description(&self) -> &str {
        "Pauses before each bridge and overrides bridge speed, flow and retraction"
    }

    fn settings_schema(&self) -> Result<String> {
        Ok(settings_schema_json()?)
    }

    fn execute(&self, layers: Vec<String>) -> Result<Vec<String>> {
        let report = self.run(&layers);
        let stats = &report.stats;

        tracing::info!(
            "{}: {} layers, {} bridges, {} moves rewritten, {} retractions",
            self.name(),
            stats.layers,
            stats.bridges,
            stats.qualifying_moves,
            stats.full_retractions
        );
        if stats.dropped_moves > 0 {
            tracing::warn!(
                "{}: {} bridge moves dropped for missing parameters",
                self.name(),
                stats.dropped_moves
            );
        }

        Ok(report.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_identity() {
        let processor = AdvancedBridges::default();
        assert_eq!(processor.name(), "AdvancedBridges");
        assert!(!processor.description().is_empty());
        assert!(processor.settings().do_pauses);
    }

    #[test]
    fn test_settings_schema_lists_options() {
        let schema = AdvancedBridges::default().settings_schema().unwrap();
        assert!(schema.contains("\"small_retract_value\""));
        assert!(schema.contains("\"AdvancedBridges\""));
    }

    #[test]
    fn test_execute_through_handle() {
        let handle: PostProcessorHandle = Arc::new(AdvancedBridges::default());
        let layers = vec![
            ";FLAVOR:Marlin".to_string(),
            ";LAYER:0\n;BRIDGE\nG1 F1200 X1 Y1 E1".to_string(),
        ];
        let out = handle.execute(layers).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ";FLAVOR:Marlin");
        assert!(out[1].contains("; FLOW CHANGED"));
    }

    #[test]
    fn test_run_report() {
        let report = AdvancedBridges::default().run(&[";BRIDGE\nG1 F1200 X1 Y1 E1\nG1 F1200 X2 Y2 E2"]);
        assert_eq!(report.stats.qualifying_moves, 2);
        assert_eq!(report.stats.full_retractions, 1);
        assert_eq!(report.stats.small_retractions, 2);
        assert!(report.diagnostics.is_empty());
    }
}
