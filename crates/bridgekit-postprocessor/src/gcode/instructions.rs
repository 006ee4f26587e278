//! Commands emitted around a rewritten bridge move

use std::fmt;

use bridgekit_settings::BridgeSettings;

/// Feed rate of the inserted retraction moves, in mm/min
pub const RETRACT_FEED_RATE: u32 = 2400;

/// Line appended after the marker that opens a bridge
pub const START_BRIDGE_ANNOTATION: &str = ";START_BRIDGE";

/// Line appended after the marker that closes a bridge
pub const END_BRIDGE_ANNOTATION: &str = ";END_BRIDGE";

/// Comment appended to every rewritten move
pub const FLOW_CHANGED_SUFFIX: &str = " ; FLOW CHANGED";

/// One emitted output line
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `M300` beep
    Tone { duration_ms: u32, frequency_hz: u32 },
    /// `G4` dwell
    Delay { duration_ms: u32 },
    /// `M83`
    RelativeExtruder,
    /// `M82`
    AbsoluteExtruder,
    /// Retraction issued before every paused move
    SmallRetract { length: f64 },
    /// Retraction issued once per bridge
    Retract { length: f64 },
    /// The rewritten move, already rendered
    Move(String),
    /// `G92` restoring the absolute extruder position
    RestorePosition { e_number: String },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tone {
                duration_ms,
                frequency_hz,
            } => write!(f, "M300 P{} S{} ; play tone", duration_ms, frequency_hz),
            Self::Delay { duration_ms } => write!(f, "G4 P{} ; delay", duration_ms),
            Self::RelativeExtruder => write!(f, "M83 ; set extruder to relative"),
            Self::AbsoluteExtruder => write!(f, "M82 ; set extruder to absolute"),
            Self::SmallRetract { length } => {
                write!(f, "G1 F{} E-{:.5} ; small retract", RETRACT_FEED_RATE, length)
            }
            Self::Retract { length } => {
                write!(f, "G1 F{} E-{:.5} ; retract", RETRACT_FEED_RATE, length)
            }
            Self::Move(text) => f.write_str(text),
            Self::RestorePosition { e_number } => {
                write!(f, "G92 E{} ; set extruder position", e_number)
            }
        }
    }
}

/// Tone and dwell emitted before each qualifying move
pub fn pause_block(settings: &BridgeSettings) -> Vec<Instruction> {
    let mut block = Vec::new();
    if settings.do_pauses {
        if settings.play_tone {
            block.push(Instruction::Tone {
                duration_ms: settings.tone_time,
                frequency_hz: settings.tone_freq,
            });
        }
        block.push(Instruction::Delay {
            duration_ms: settings.delay_time,
        });
    }
    block
}
