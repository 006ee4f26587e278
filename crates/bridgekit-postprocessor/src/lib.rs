//! # BridgeKit Post-processor
//!
//! Detects bridge regions in slicer G-code and rewrites their outer-wall
//! moves: pause and beep before each move, override or scale feed rate and
//! flow, and retract around the first move of every bridge.

pub mod gcode;

pub use gcode::{
    extract_param, extract_type_label, is_extrusion_move, is_region_marker_begin,
    is_region_marker_end, rewrite, AdvancedBridges, FlowRule, Instruction, LayerRewriter,
    LineTokens, PostProcessor, PostProcessorHandle, RewritePolicy, RewriteReport, RewriteStats,
    SpeedRule,
};
