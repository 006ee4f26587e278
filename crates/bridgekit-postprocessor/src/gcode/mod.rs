//! Bridge post-processing for slicer G-code
//!
//! This module provides:
//! - Line classification (markers, feature types, extrusion moves)
//! - Word-level line tokenization
//! - Speed and flow rewrite rules
//! - Emitted instruction rendering
//! - The layer rewriter state machine
//! - The post-processor contract

pub mod classifier;
pub mod instructions;
pub mod policy;
pub mod processor;
pub mod rewriter;
pub mod tokens;

pub use classifier::*;
pub use instructions::*;
pub use policy::*;
pub use processor::*;
pub use rewriter::*;
pub use tokens::*;
