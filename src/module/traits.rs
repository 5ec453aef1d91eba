//! Module system traits and interfaces
//!
//! Defines the error taxonomy, the effective module state, and the seams through
//! which the persistence collaborator supplies snapshots and accepts writes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::module::id::{ModuleCategory, ModuleId};
use crate::module::registry::dependencies::RequirementGroup;
use crate::module::settings::types::{SettingValue, SettingViolation};
use crate::storage::StateSnapshot;

/// Effective state of a module after applying its flag and its requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "group", rename_all = "snake_case")]
pub enum ModuleState {
    /// Flag on and every requirement group satisfied
    Active,
    /// Own flag (or declared default) is off
    Disabled,
    /// Flag on, but this requirement group has no active member
    Unsatisfied(RequirementGroup),
}

impl ModuleState {
    pub fn is_active(&self) -> bool {
        matches!(self, ModuleState::Active)
    }
}

/// Persistence collaborator: supplies a point-in-time snapshot for one resolution pass
pub trait SnapshotSource {
    fn snapshot(&self) -> Result<StateSnapshot, ModuleError>;
}

/// Persistence collaborator: accepts administrative writes
///
/// Writes are validated by the registry before they reach the writer.
pub trait StateWriter {
    fn write_flag(&mut self, module: &ModuleId, enabled: bool) -> Result<(), ModuleError>;

    fn write_setting(
        &mut self,
        module: &ModuleId,
        key: &str,
        value: SettingValue,
    ) -> Result<(), ModuleError>;

    fn clear_setting(&mut self, module: &ModuleId, key: &str) -> Result<(), ModuleError>;
}

/// Module system errors
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown setting '{key}' for module {module}")]
    UnknownSetting { module: String, key: String },

    #[error("Module {module} already declared by category {existing} (incoming: {incoming})")]
    DuplicateModule {
        module: String,
        existing: ModuleCategory,
        incoming: ModuleCategory,
    },

    #[error("Invalid dependency declaration for module {module}: {reason}")]
    InvalidDependencyDeclaration { module: String, reason: String },

    #[error("Invalid setting declaration for module {module}: {reason}")]
    InvalidSettingDeclaration { module: String, reason: String },

    #[error("Invalid module manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid value for setting '{key}' of module {module}: {violation}")]
    Validation {
        module: String,
        key: String,
        violation: SettingViolation,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ModuleError {
    fn from(e: serde_json::Error) -> Self {
        ModuleError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for ModuleError {
    fn from(e: toml::de::Error) -> Self {
        ModuleError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for ModuleError {
    fn from(e: std::io::Error) -> Self {
        ModuleError::Storage(e.to_string())
    }
}
