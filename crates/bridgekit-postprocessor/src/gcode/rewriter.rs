//! Bridge rewrite state machine
//!
//! Scans each layer line by line, tracking whether a bridge region is open,
//! the current feature type and whether the bridge already got its full
//! retraction. Qualifying moves (extrusion inside a bridge while the feature
//! type is the outer wall or still unset) are replaced by a block of
//! instructions. The last absolute extruder position is the only state
//! carried from one layer to the next.

use serde::Serialize;

use bridgekit_core::GcodeError;
use bridgekit_settings::BridgeSettings;

use super::classifier::{
    extract_type_label, is_extrusion_move, is_region_marker_begin, is_region_marker_end,
    is_target_type, INITIAL_TYPE, NONE_TYPE_LABEL,
};
use super::instructions::{
    pause_block, Instruction, END_BRIDGE_ANNOTATION, FLOW_CHANGED_SUFFIX,
    START_BRIDGE_ANNOTATION,
};
use super::policy::RewritePolicy;
use super::tokens::LineTokens;

/// Counters collected while rewriting a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Layer blocks processed
    pub layers: usize,
    /// Bridge regions opened
    pub bridges: usize,
    /// Moves replaced by an instruction block
    pub qualifying_moves: usize,
    /// Full retractions inserted
    pub full_retractions: usize,
    /// Small retractions inserted
    pub small_retractions: usize,
    /// Qualifying moves dropped because F or E could not be read
    pub dropped_moves: usize,
}

/// State reset at the start of every layer
#[derive(Debug)]
struct LayerState {
    in_bridge: bool,
    current_type: String,
    retract_used: bool,
}

impl LayerState {
    fn new() -> Self {
        Self {
            in_bridge: false,
            current_type: INITIAL_TYPE.to_string(),
            retract_used: false,
        }
    }
}

/// Rewrites layers in order, threading the extruder position between them
#[derive(Debug)]
pub struct LayerRewriter {
    settings: BridgeSettings,
    policy: RewritePolicy,
    previous_e: f64,
    layer_index: usize,
    stats: RewriteStats,
    diagnostics: Vec<GcodeError>,
}

impl LayerRewriter {
    /// Create a rewriter starting at extruder position 0
    pub fn new(settings: &BridgeSettings) -> Self {
        Self {
            settings: settings.clone(),
            policy: RewritePolicy::from_settings(settings),
            previous_e: 0.0,
            layer_index: 0,
            stats: RewriteStats::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Start from a known extruder position instead of 0
    pub fn with_previous_e(mut self, previous_e: f64) -> Self {
        self.previous_e = previous_e;
        self
    }

    /// Last absolute extruder position seen on an extrusion move
    pub fn previous_e(&self) -> f64 {
        self.previous_e
    }

    pub fn policy(&self) -> &RewritePolicy {
        &self.policy
    }

    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Moves that qualified but could not be rewritten
    pub fn diagnostics(&self) -> &[GcodeError] {
        &self.diagnostics
    }

    /// Rewrite every layer in order
    pub fn rewrite_layers<S: AsRef<str>>(&mut self, layers: &[S]) -> Vec<String> {
        layers
            .iter()
            .map(|layer| self.rewrite_layer(layer.as_ref()))
            .collect()
    }

    /// Rewrite one layer block
    pub fn rewrite_layer(&mut self, layer: &str) -> String {
        let mut state = LayerState::new();
        let mut output: Vec<String> = Vec::new();

        for (line_index, line) in layer.split('\n').enumerate() {
            let mut emitted = vec![line.to_string()];

            if is_region_marker_begin(line) {
                if !state.in_bridge {
                    emitted.push(START_BRIDGE_ANNOTATION.to_string());
                    self.stats.bridges += 1;
                    tracing::debug!(
                        "Bridge opened at layer {}, line {}",
                        self.layer_index,
                        line_index + 1
                    );
                }
                state.in_bridge = true;
            }

            if is_region_marker_end(line) {
                if state.in_bridge {
                    emitted.push(END_BRIDGE_ANNOTATION.to_string());
                    tracing::debug!(
                        "Bridge closed at layer {}, line {}",
                        self.layer_index,
                        line_index + 1
                    );
                }
                state.in_bridge = false;
                state.retract_used = false;
            }

            if let Some(label) = extract_type_label(line).filter(|l| *l != NONE_TYPE_LABEL) {
                state.current_type = label.to_string();
            }

            let extrusion = is_extrusion_move(line);
            if state.in_bridge && is_target_type(&state.current_type) && extrusion {
                emitted = self
                    .rewrite_move(line, line_index, &mut state)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if emitted.is_empty() {
                    emitted.push(String::new());
                }
            }

            // Always from the original text, never the rewritten one.
            if extrusion {
                if let Some(e) = LineTokens::parse(line).value('E') {
                    self.previous_e = e;
                }
            }

            output.extend(emitted);
        }

        self.layer_index += 1;
        self.stats.layers += 1;
        output.join("\n")
    }

    /// Instruction block replacing one qualifying move
    fn rewrite_move(
        &mut self,
        line: &str,
        line_index: usize,
        state: &mut LayerState,
    ) -> Vec<Instruction> {
        let mut block = pause_block(&self.settings);

        // F and E are read from the same words that get replaced.
        let mut tokens = LineTokens::parse(line);
        let Some(old_feed) = tokens.value('F') else {
            return self.drop_move(block, line, line_index, 'F');
        };
        let (Some(old_e), Some(e_number)) = (tokens.value('E'), tokens.find('E')) else {
            return self.drop_move(block, line, line_index, 'E');
        };
        let e_number = e_number.to_string();

        if let Some(feed) = self.policy.feed_text(old_feed) {
            if !tokens.replace('F', &feed) {
                return self.drop_move(block, line, line_index, 'F');
            }
        }
        if !tokens.replace('E', &self.policy.extrusion_text(old_e, self.previous_e)) {
            return self.drop_move(block, line, line_index, 'E');
        }

        self.stats.qualifying_moves += 1;
        block.push(Instruction::RelativeExtruder);

        if self.settings.do_pauses {
            block.push(Instruction::SmallRetract {
                length: self.settings.small_retract_value,
            });
            self.stats.small_retractions += 1;
        }

        if self.settings.use_retract && !state.retract_used {
            block.push(Instruction::Retract {
                length: self.settings.retract_value,
            });
            state.retract_used = true;
            self.stats.full_retractions += 1;
        }

        block.push(Instruction::Move(format!("{}{}", tokens, FLOW_CHANGED_SUFFIX)));
        block.push(Instruction::AbsoluteExtruder);
        block.push(Instruction::RestorePosition { e_number });

        tracing::trace!(
            "Rewrote bridge move at layer {}, line {}",
            self.layer_index,
            line_index + 1
        );
        block
    }

    /// Record a move that could not be rewritten; only the pause survives
    fn drop_move(
        &mut self,
        block: Vec<Instruction>,
        line: &str,
        line_index: usize,
        param: char,
    ) -> Vec<Instruction> {
        let err = GcodeError::MissingParameter {
            layer: self.layer_index,
            line_number: line_index + 1,
            param,
        };
        tracing::warn!("{}; move dropped: {}", err, line);
        self.diagnostics.push(err);
        self.stats.dropped_moves += 1;
        block
    }
}

/// Rewrite a whole job with fresh state
///
/// Returns exactly one output block per input block.
pub fn rewrite<S: AsRef<str>>(layers: &[S], settings: &BridgeSettings) -> Vec<String> {
    LayerRewriter::new(settings).rewrite_layers(layers)
}
