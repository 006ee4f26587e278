//! # BridgeKit Core
//!
//! Core types shared by the BridgeKit crates: the unified error type and the
//! print job model that splits slicer output into per-layer blocks.

pub mod error;
pub mod layers;

pub use error::{Error, GcodeError, Result};
pub use layers::{join_layers, split_layers, PrintJob, LAYER_MARKER};
