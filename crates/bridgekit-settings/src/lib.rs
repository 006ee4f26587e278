//! BridgeKit Settings Crate
//!
//! Handles the bridge post-processing configuration: typed settings record,
//! file persistence, range validation and the host-facing schema.

pub mod config;
pub mod error;
pub mod schema;

pub use config::{BridgeSettings, SETTINGS_FILE_NAME};
pub use error::{SettingsError, SettingsResult};
pub use schema::{
    definition, setting_definitions, settings_schema, settings_schema_json, SettingDefinition,
    SettingKind, PROCESSOR_NAME, SCHEMA_VERSION,
};
