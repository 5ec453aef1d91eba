//! Module settings: schema types and resolution

pub mod resolver;
pub mod types;

pub use resolver::{GlobalSettings, ResolvedSetting};
pub use types::{SettingDefinition, SettingType, SettingValue, SettingViolation};
