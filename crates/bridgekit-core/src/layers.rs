//! Print job layer model
//!
//! A slicer hands post-processors the job as an ordered list of text blocks:
//! the start block (everything before the first layer marker) followed by one
//! block per layer, each beginning with its `;LAYER:` line. Splitting and
//! joining are exact inverses so untouched text survives byte for byte.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// Prefix of the line that opens a new layer block
pub const LAYER_MARKER: &str = ";LAYER:";

/// Split a complete G-code program into layer blocks
///
/// Block 0 holds the lines preceding the first layer marker (possibly empty);
/// every later block starts with a `;LAYER:` line.
pub fn split_layers(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 && line.starts_with(LAYER_MARKER) {
            blocks.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    blocks.push(current.join("\n"));

    blocks
}

/// Join layer blocks back into a single program
pub fn join_layers<S: AsRef<str>>(blocks: &[S]) -> String {
    blocks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// An ordered set of layer blocks for one print job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintJob {
    layers: Vec<String>,
}

impl PrintJob {
    /// Create a job from already split layer blocks
    pub fn new(layers: Vec<String>) -> Self {
        Self { layers }
    }

    /// Build a job from a complete G-code program
    pub fn from_gcode(text: &str) -> Self {
        Self::new(split_layers(text))
    }

    /// Read a G-code file from disk
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a
    /// [`GcodeError::FileError`] if it is not valid UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| GcodeError::FileError {
            reason: format!("{} is not valid UTF-8: {}", path.display(), e),
        })?;

        let job = Self::from_gcode(&text);
        tracing::debug!(
            "Loaded {} with {} layer blocks",
            path.display(),
            job.layer_count()
        );
        Ok(job)
    }

    /// Write the joined program to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_gcode())?;
        Ok(())
    }

    /// Render the job back into one program
    pub fn to_gcode(&self) -> String {
        join_layers(&self.layers)
    }

    /// Number of layer blocks, including the start block
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Borrow the layer blocks
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Take ownership of the layer blocks
    pub fn into_layers(self) -> Vec<String> {
        self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_start_block_and_layers() {
        let text = "M82\nG28\n;LAYER:0\nG1 X1 Y1 E1\n;LAYER:1\nG1 X2 Y2 E2\n";
        let blocks = split_layers(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], "M82\nG28");
        assert_eq!(blocks[1], ";LAYER:0\nG1 X1 Y1 E1");
        assert_eq!(blocks[2], ";LAYER:1\nG1 X2 Y2 E2\n");
    }

    #[test]
    fn test_split_leading_layer_marker() {
        let blocks = split_layers(";LAYER:0\nG1 X1 Y1 E1");
        assert_eq!(blocks, vec![";LAYER:0\nG1 X1 Y1 E1".to_string()]);
    }

    #[test]
    fn test_join_restores_text() {
        let text = ";FLAVOR:Marlin\n;LAYER:0\nG1 X1 Y1 E1\n;LAYER:1\n\nG1 X2 Y2 E2\n";
        assert_eq!(join_layers(&split_layers(text)), text);
    }

    #[test]
    fn test_empty_program() {
        let blocks = split_layers("");
        assert_eq!(blocks, vec![String::new()]);
        assert_eq!(join_layers(&blocks), "");
    }

    #[test]
    fn test_print_job_accessors() {
        let job = PrintJob::from_gcode("G28\n;LAYER:0\nG1 X1 Y1 E1");
        assert_eq!(job.layer_count(), 2);
        assert_eq!(job.layers()[1], ";LAYER:0\nG1 X1 Y1 E1");
        assert_eq!(job.to_gcode(), "G28\n;LAYER:0\nG1 X1 Y1 E1");
    }
}
