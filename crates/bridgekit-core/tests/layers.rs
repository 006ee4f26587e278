use bridgekit_core::{join_layers, split_layers, GcodeError, PrintJob};
use proptest::prelude::*;
use tempfile::TempDir;

#[test]
fn test_load_and_save_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.gcode");
    let output = dir.path().join("output.gcode");
    let text = ";FLAVOR:Marlin\nG28\n;LAYER:0\nG1 X1 Y1 E1\n;LAYER:1\nG1 X2 Y2 E2\n";
    std::fs::write(&input, text).unwrap();

    let job = PrintJob::load(&input).unwrap();
    assert_eq!(job.layer_count(), 3);
    job.save(&output).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), text);
}

#[test]
fn test_load_rejects_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("binary.gcode");
    std::fs::write(&input, [0x47, 0x31, 0xFF, 0xFE]).unwrap();

    let err = PrintJob::load(&input).unwrap_err();
    assert!(matches!(
        err,
        bridgekit_core::Error::Gcode(GcodeError::FileError { .. })
    ));
}

#[test]
fn test_load_missing_file() {
    let result = PrintJob::load(std::path::Path::new("/nonexistent/job.gcode"));
    assert!(matches!(result, Err(bridgekit_core::Error::Io(_))));
}

proptest! {
    #[test]
    fn prop_split_join_is_identity(lines in prop::collection::vec(
        prop_oneof![
            Just(";LAYER:1".to_string()),
            Just(";TYPE:WALL-OUTER".to_string()),
            Just(String::new()),
            "[A-Z0-9 .;:-]{0,24}",
        ],
        0..40,
    )) {
        let text = lines.join("\n");
        prop_assert_eq!(join_layers(&split_layers(&text)), text);
    }

    #[test]
    fn prop_every_later_block_starts_with_marker(lines in prop::collection::vec(
        prop_oneof![Just(";LAYER:7".to_string()), "[GXYE0-9 ]{0,16}"],
        1..30,
    )) {
        let text = lines.join("\n");
        for block in split_layers(&text).iter().skip(1) {
            prop_assert!(block.starts_with(";LAYER:"));
        }
    }
}
