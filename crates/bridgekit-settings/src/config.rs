//! Bridge post-processing settings
//!
//! A flat, strongly typed record holding every user-tunable option. It is
//! populated once (defaults, then an optional JSON or TOML file) and stays
//! read-only while a job is rewritten.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};
use crate::schema;

/// Settings file name inside the user configuration directory
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// All options controlling the bridge rewrite
///
/// Percentages (`mul_speed_k`, `mul_flow_k`) are stored as the user enters
/// them, e.g. `50.0` for half speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Insert a pause before every bridge move
    pub do_pauses: bool,
    /// Pause duration in milliseconds
    pub delay_time: u32,
    /// Beep before the pause
    pub play_tone: bool,
    /// Beep duration in milliseconds
    pub tone_time: u32,
    /// Beep frequency in Hz
    pub tone_freq: u32,
    /// Replace the feed rate with `new_speed`
    pub set_speed: bool,
    /// Literal bridge feed rate
    pub new_speed: u32,
    /// Scale the feed rate by `mul_speed_k` percent (wins over `set_speed`)
    pub mul_speed: bool,
    pub mul_speed_k: f64,
    /// Replace the extrusion amount with `new_flow`
    pub set_flow: bool,
    pub new_flow: f64,
    /// Scale the extrusion delta by `mul_flow_k` percent
    pub mul_flow: bool,
    pub mul_flow_k: f64,
    /// Retract once at the first move of every bridge
    pub use_retract: bool,
    /// Full retraction length in mm
    pub retract_value: f64,
    /// Retraction before every paused move, in mm
    pub small_retract_value: f64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            do_pauses: true,
            delay_time: 300,
            play_tone: true,
            tone_time: 100,
            tone_freq: 1318,
            set_speed: true,
            new_speed: 100,
            mul_speed: false,
            mul_speed_k: 50.0,
            set_flow: false,
            new_flow: 0.01,
            mul_flow: true,
            mul_flow_k: 50.0,
            use_retract: true,
            retract_value: 4.0,
            small_retract_value: 0.5,
        }
    }
}

impl BridgeSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location (`<config dir>/bridgekit/settings.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("bridgekit").join(SETTINGS_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
            })
    }

    /// Load settings from file (JSON or TOML)
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let settings: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        settings.validate()?;
        tracing::debug!("Loaded bridge settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => self.to_toml()?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Render as TOML text
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Numeric options paired with their schema keys
    fn numeric_values(&self) -> [(&'static str, f64); 9] {
        [
            ("delay_time", f64::from(self.delay_time)),
            ("tone_time", f64::from(self.tone_time)),
            ("tone_freq", f64::from(self.tone_freq)),
            ("new_speed", f64::from(self.new_speed)),
            ("mul_speed_k", self.mul_speed_k),
            ("new_flow", self.new_flow),
            ("mul_flow_k", self.mul_flow_k),
            ("retract_value", self.retract_value),
            ("small_retract_value", self.small_retract_value),
        ]
    }

    /// Validate every numeric option against the schema ranges
    ///
    /// Values above a soft warning threshold are accepted but logged.
    pub fn validate(&self) -> SettingsResult<()> {
        let definitions = schema::setting_definitions();

        for (key, value) in self.numeric_values() {
            let Some(def) = definitions.iter().find(|d| d.key == key) else {
                continue;
            };
            def.check_range(value)?;
            if def.exceeds_warning(value) {
                tracing::warn!("Setting '{}' = {} is unusually high", key, value);
            }
        }

        Ok(())
    }

    /// Speed scale as a fraction
    pub fn mul_speed_fraction(&self) -> f64 {
        self.mul_speed_k / 100.0
    }

    /// Flow scale as a fraction
    pub fn mul_flow_fraction(&self) -> f64 {
        self.mul_flow_k / 100.0
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
