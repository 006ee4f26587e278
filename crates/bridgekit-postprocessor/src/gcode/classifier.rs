//! Line classification for slicer output
//!
//! Pure predicates over a single line. Matching is loose:
//! prefix checks for markers and substring checks for moves, so a `G10`
//! line still counts as containing `G1`.

use regex::Regex;
use std::sync::OnceLock;

/// Comment that opens a bridge region
pub const BRIDGE_BEGIN_MARKER: &str = ";BRIDGE";

/// Comments that close any open region
pub const REGION_END_MARKERS: [&str; 3] = [";MESH", ";TIME", ";LAYER"];

/// Comment carrying the feature type of the following moves
pub const TYPE_MARKER: &str = ";TYPE";

/// Characters of the `;TYPE:` header skipped before the label
pub const TYPE_LABEL_OFFSET: usize = 6;

/// Linear move command
pub const LINEAR_MOVE: &str = "G1";

/// Feature type whose bridge moves are rewritten
pub const OUTER_WALL_TYPE: &str = "WALL-OUTER";

/// Feature type assumed before any type marker in a layer
pub const INITIAL_TYPE: &str = "initial";

/// Type label that leaves the current feature type unchanged
pub const NONE_TYPE_LABEL: &str = "none";

/// True iff the line opens a bridge region
pub fn is_region_marker_begin(line: &str) -> bool {
    line.starts_with(BRIDGE_BEGIN_MARKER)
}

/// True iff the line is a mesh, time or layer boundary
pub fn is_region_marker_end(line: &str) -> bool {
    REGION_END_MARKERS
        .iter()
        .any(|marker| line.starts_with(marker))
}

/// True iff the line mentions a linear move with X, Y and E
pub fn is_extrusion_move(line: &str) -> bool {
    line.contains(LINEAR_MOVE) && line.contains('X') && line.contains('Y') && line.contains('E')
}

/// Feature label of a `;TYPE:` line, `None` for every other line
///
/// The label is whatever follows the six character header, so `;TYPE:FILL`
/// yields `FILL` and a bare `;TYPE` yields an empty label.
pub fn extract_type_label(line: &str) -> Option<&str> {
    if !line.starts_with(TYPE_MARKER) {
        return None;
    }
    Some(
        line.char_indices()
            .nth(TYPE_LABEL_OFFSET)
            .map_or("", |(index, _)| &line[index..]),
    )
}

/// True for the feature types whose bridge moves qualify for rewriting
pub fn is_target_type(current_type: &str) -> bool {
    current_type == OUTER_WALL_TYPE || current_type == INITIAL_TYPE
}

fn param_pattern(letter: char) -> Option<&'static Regex> {
    static PATTERNS: OnceLock<Vec<(char, Regex)>> = OnceLock::new();

    PATTERNS
        .get_or_init(|| {
            ('A'..='Z')
                .filter_map(|l| {
                    Regex::new(&format!(r"{l}(\d*\.?\d*)"))
                        .ok()
                        .map(|re| (l, re))
                })
                .collect()
        })
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, re)| re)
}

/// Numeric text following the first occurrence of `letter`
///
/// Only the first occurrence is considered, and signs are not captured:
/// `E-1.5 E2` yields `None`.
pub fn extract_param_text(line: &str, letter: char) -> Option<&str> {
    param_pattern(letter)?
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|text| text.bytes().any(|b| b.is_ascii_digit()))
}

/// Value of the first `letter` parameter on the line
pub fn extract_param(line: &str, letter: char) -> Option<f64> {
    extract_param_text(line, letter)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_markers() {
        assert!(is_region_marker_begin(";BRIDGE"));
        assert!(is_region_marker_begin(";BRIDGE:1"));
        assert!(!is_region_marker_begin(" ;BRIDGE"));
        assert!(!is_region_marker_begin("G1 X1 ;BRIDGE"));

        assert!(is_region_marker_end(";MESH:inner"));
        assert!(is_region_marker_end(";TIME_ELAPSED:12.5"));
        assert!(is_region_marker_end(";LAYER:3"));
        assert!(!is_region_marker_end(";TYPE:WALL-OUTER"));
        assert!(!is_region_marker_end(";BRIDGE"));
    }

    #[test]
    fn test_extrusion_move() {
        assert!(is_extrusion_move("G1 F1200 X10 Y10 E2.0"));
        assert!(is_extrusion_move("G10 X1 Y1 E1"));
        assert!(!is_extrusion_move("G1 X10 Y10"));
        assert!(!is_extrusion_move("G0 F6000 X10 Y10"));
        assert!(!is_extrusion_move(";TYPE:WALL-OUTER"));
    }

    #[test]
    fn test_type_label() {
        assert_eq!(extract_type_label(";TYPE:WALL-OUTER"), Some("WALL-OUTER"));
        assert_eq!(extract_type_label(";TYPE:FILL"), Some("FILL"));
        assert_eq!(extract_type_label(";TYPE"), Some(""));
        assert_eq!(extract_type_label(";LAYER:1"), None);
        assert_eq!(extract_type_label("G1 X1"), None);
    }

    #[test]
    fn test_target_type() {
        assert!(is_target_type("WALL-OUTER"));
        assert!(is_target_type("initial"));
        assert!(!is_target_type("WALL-INNER"));
        assert!(!is_target_type("SKIN"));
    }

    #[test]
    fn test_extract_param() {
        let line = "G1 F1200 X10.5 Y.25 E2.03125";
        assert_eq!(extract_param(line, 'F'), Some(1200.0));
        assert_eq!(extract_param(line, 'X'), Some(10.5));
        assert_eq!(extract_param(line, 'Y'), Some(0.25));
        assert_eq!(extract_param(line, 'E'), Some(2.03125));
        assert_eq!(extract_param_text(line, 'E'), Some("2.03125"));
        assert_eq!(extract_param(line, 'Z'), None);
    }

    #[test]
    fn test_extract_param_first_match_without_sign() {
        assert_eq!(extract_param("G1 X1 Y1 E-0.8", 'E'), None);
        assert_eq!(extract_param("G1 X1 Y1 E-0.8 E3", 'E'), None);
        assert_eq!(extract_param("G1 X1 Y1 E E3", 'E'), None);
        assert_eq!(extract_param_text("G1 X1 Y1 E.", 'E'), None);
        assert_eq!(extract_param("G1 X1 Y1 E5.", 'E'), Some(5.0));
        assert_eq!(extract_param("G1 F300 F600", 'F'), Some(300.0));
        assert_eq!(extract_param("G1 X1", 'x'), None);
    }
}
