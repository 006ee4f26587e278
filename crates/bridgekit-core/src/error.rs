//! Error handling for BridgeKit
//!
//! Provides error types shared by every crate in the workspace:
//! - G-Code errors (unreadable jobs, moves that could not be rewritten)
//! - Settings errors surfaced through the unified [`Error`]
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents problems found while reading or post-processing a print job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A bridge move lacked a parameter needed for the rewrite
    #[error("Missing parameter '{param}' on bridge move at layer {layer}, line {line_number}")]
    MissingParameter {
        /// Index of the layer block holding the move.
        layer: usize,
        /// 1-based line number within the layer block.
        line_number: usize,
        /// The parameter letter that could not be read.
        param: char,
    },

    /// File parsing error
    #[error("File error: {reason}")]
    FileError {
        /// The reason for the file error.
        reason: String,
    },
}

/// Main error type for BridgeKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// A configuration value was rejected
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// The setting key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is a settings error
    pub fn is_setting_error(&self) -> bool {
        matches!(self, Error::InvalidSetting { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
