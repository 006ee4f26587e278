//! Settings schema description
//!
//! Describes every bridge option the way slicer hosts expect a post-processing
//! script to declare them: label, description, value type, unit, default and
//! the accepted range. [`BridgeSettings::validate`](crate::BridgeSettings::validate)
//! checks values against the ranges declared here.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{SettingsError, SettingsResult};

/// Host-facing name of the post-processor
pub const PROCESSOR_NAME: &str = "AdvancedBridges";

/// Schema format version understood by the host
pub const SCHEMA_VERSION: u32 = 2;

/// Value type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Bool,
    Int,
    Float,
}

/// Declaration of one configurable option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: SettingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub default_value: Value,
    #[serde(rename = "minimum_value", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(rename = "maximum_value", skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(
        rename = "maximum_value_warning",
        skip_serializing_if = "Option::is_none"
    )]
    pub maximum_warning: Option<f64>,
}

impl SettingDefinition {
    fn flag(key: &'static str, label: &'static str, description: &'static str, default: bool) -> Self {
        Self {
            key,
            label,
            description,
            kind: SettingKind::Bool,
            unit: None,
            default_value: Value::Bool(default),
            minimum: None,
            maximum: None,
            maximum_warning: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn number(
        key: &'static str,
        label: &'static str,
        description: &'static str,
        kind: SettingKind,
        unit: &'static str,
        default: Value,
        range: (f64, f64),
        warning: f64,
    ) -> Self {
        Self {
            key,
            label,
            description,
            kind,
            unit: Some(unit),
            default_value: default,
            minimum: Some(range.0),
            maximum: Some(range.1),
            maximum_warning: Some(warning),
        }
    }

    /// Reject a value outside the declared range
    pub fn check_range(&self, value: f64) -> SettingsResult<()> {
        let below = self.minimum.is_some_and(|min| value < min);
        let above = self.maximum.is_some_and(|max| value > max);
        if below || above || !value.is_finite() {
            return Err(SettingsError::InvalidSetting {
                key: self.key.to_string(),
                reason: format!(
                    "{} is outside {}..={}",
                    value,
                    self.minimum.unwrap_or(f64::NEG_INFINITY),
                    self.maximum.unwrap_or(f64::INFINITY)
                ),
            });
        }
        Ok(())
    }

    /// Whether the value is above the soft warning threshold
    pub fn exceeds_warning(&self, value: f64) -> bool {
        self.maximum_warning.is_some_and(|warn| value > warn)
    }
}

/// All option declarations, in the order a host should display them
pub fn setting_definitions() -> Vec<SettingDefinition> {
    use SettingKind::{Float, Int};

    vec![
        SettingDefinition::flag(
            "do_pauses",
            "Pause before bridges",
            "Insert a dwell before every bridge move",
            true,
        ),
        SettingDefinition::number(
            "delay_time",
            "Pause duration",
            "Dwell time before every bridge move in milliseconds",
            Int,
            "ms",
            json!(300),
            (10.0, 10000.0),
            5000.0,
        ),
        SettingDefinition::flag(
            "play_tone",
            "Play tone",
            "Beep before every bridge move",
            true,
        ),
        SettingDefinition::number(
            "tone_time",
            "Tone duration",
            "Beep duration in milliseconds",
            Int,
            "ms",
            json!(100),
            (10.0, 10000.0),
            1000.0,
        ),
        SettingDefinition::number(
            "tone_freq",
            "Tone frequency",
            "Beep frequency",
            Int,
            "Hz",
            json!(1318),
            (10.0, 20000.0),
            16000.0,
        ),
        SettingDefinition::flag(
            "set_speed",
            "Set speed",
            "Override the G1 F[] parameter of bridge moves",
            true,
        ),
        SettingDefinition::number(
            "new_speed",
            "New speed",
            "Feed rate used for bridge moves",
            Int,
            "F",
            json!(100),
            (1.0, 10000.0),
            2000.0,
        ),
        SettingDefinition::flag(
            "mul_speed",
            "Multiply speed",
            "Scale the G1 F[] parameter of bridge moves",
            false,
        ),
        SettingDefinition::number(
            "mul_speed_k",
            "Speed factor",
            "Bridge feed rate is scaled by this percentage",
            Float,
            "%",
            json!(50.0),
            (1.0, 100.0),
            101.0,
        ),
        SettingDefinition::flag(
            "set_flow",
            "Set flow",
            "Override the G1 E[] parameter of bridge moves",
            false,
        ),
        SettingDefinition::number(
            "new_flow",
            "New flow",
            "Extrusion amount used for every bridge move",
            Float,
            "E",
            json!(0.01),
            (0.0, 10.0),
            2.0,
        ),
        SettingDefinition::flag(
            "mul_flow",
            "Multiply flow",
            "Scale the extrusion of bridge moves",
            true,
        ),
        SettingDefinition::number(
            "mul_flow_k",
            "Flow factor",
            "Bridge extrusion is scaled by this percentage",
            Float,
            "%",
            json!(50.0),
            (1.0, 100.0),
            101.0,
        ),
        SettingDefinition::flag(
            "use_retract",
            "Retract before bridge",
            "Retract filament once before each bridge",
            true,
        ),
        SettingDefinition::number(
            "retract_value",
            "Retraction distance",
            "Length of filament pulled back before a bridge",
            Float,
            "mm",
            json!(4.0),
            (0.0, 20.0),
            10.0,
        ),
        SettingDefinition::number(
            "small_retract_value",
            "Pause retraction distance",
            "Length of filament pulled back before every paused bridge move",
            Float,
            "mm",
            json!(0.5),
            (0.0, 5.0),
            2.0,
        ),
    ]
}

/// Look up the declaration for a key
pub fn definition(key: &str) -> Option<SettingDefinition> {
    setting_definitions().into_iter().find(|d| d.key == key)
}

/// Render the host schema document
pub fn settings_schema() -> Value {
    let mut settings = Map::new();
    for def in setting_definitions() {
        let mut entry = match serde_json::to_value(&def) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        entry.remove("key");
        settings.insert(def.key.to_string(), Value::Object(entry));
    }

    json!({
        "name": PROCESSOR_NAME,
        "key": PROCESSOR_NAME,
        "metadata": {},
        "version": SCHEMA_VERSION,
        "settings": settings,
    })
}

/// Render the host schema document as pretty JSON text
pub fn settings_schema_json() -> SettingsResult<String> {
    Ok(serde_json::to_string_pretty(&settings_schema())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_is_unique() {
        let defs = setting_definitions();
        let mut keys: Vec<_> = defs.iter().map(|d| d.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), defs.len());
        assert_eq!(defs.len(), 16);
    }

    #[test]
    fn test_check_range() {
        let def = definition("delay_time").unwrap();
        assert!(def.check_range(300.0).is_ok());
        assert!(def.check_range(10.0).is_ok());
        assert!(def.check_range(9.0).is_err());
        assert!(def.check_range(10001.0).is_err());
        assert!(def.check_range(f64::NAN).is_err());
    }

    #[test]
    fn test_warning_threshold() {
        let def = definition("delay_time").unwrap();
        assert!(!def.exceeds_warning(5000.0));
        assert!(def.exceeds_warning(5001.0));
        assert!(!definition("do_pauses").unwrap().exceeds_warning(1.0));
    }

    #[test]
    fn test_schema_keeps_display_order() {
        let schema = settings_schema();
        let schema_keys: Vec<&str> = schema["settings"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let definition_keys: Vec<&str> = setting_definitions().iter().map(|d| d.key).collect();
        assert_eq!(schema_keys, definition_keys);

        let text = settings_schema_json().unwrap();
        let do_pauses = text.find("\"do_pauses\"").unwrap();
        let delay_time = text.find("\"delay_time\"").unwrap();
        assert!(do_pauses < delay_time);
    }

    #[test]
    fn test_schema_document() {
        let schema = settings_schema();
        assert_eq!(schema["name"], "AdvancedBridges");
        assert_eq!(schema["version"], 2);
        assert_eq!(schema["settings"]["tone_freq"]["type"], "int");
        assert_eq!(schema["settings"]["tone_freq"]["unit"], "Hz");
        assert_eq!(schema["settings"]["tone_freq"]["default_value"], 1318);
        assert_eq!(schema["settings"]["do_pauses"]["type"], "bool");
        assert!(schema["settings"]["do_pauses"].get("minimum_value").is_none());
        assert!(schema["settings"]["retract_value"].get("key").is_none());
    }
}
