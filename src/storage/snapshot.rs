//! Point-in-time snapshots of persisted module state
//!
//! A resolution pass reads exactly one snapshot. Maps are ordered so snapshots
//! serialize deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::module::id::ModuleId;
use crate::module::registry::Module;
use crate::module::settings::types::SettingValue;

/// Persisted on/off flag per module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSnapshot(BTreeMap<ModuleId, bool>);

impl FlagSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, module: impl Into<ModuleId>, enabled: bool) -> Self {
        self.0.insert(module.into(), enabled);
        self
    }

    pub fn get(&self, module: &str) -> Option<bool> {
        self.0.get(module).copied()
    }

    /// Persisted flag, or the module's declared default on a snapshot miss
    pub fn flag_or_default(&self, module: &Module) -> bool {
        self.get(module.id().as_str())
            .unwrap_or_else(|| module.is_enabled_by_default())
    }

    pub(crate) fn insert(&mut self, module: ModuleId, enabled: bool) {
        self.0.insert(module, enabled);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, bool)> {
        self.0.iter().map(|(id, enabled)| (id, *enabled))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<ModuleId>> FromIterator<(K, bool)> for FlagSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Persisted setting values per module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsSnapshot(BTreeMap<ModuleId, BTreeMap<String, SettingValue>>);

impl SettingsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(
        mut self,
        module: impl Into<ModuleId>,
        key: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Self {
        self.insert(module.into(), key.into(), value.into());
        self
    }

    pub fn get(&self, module: &str, key: &str) -> Option<&SettingValue> {
        self.0.get(module).and_then(|values| values.get(key))
    }

    pub(crate) fn insert(&mut self, module: ModuleId, key: String, value: SettingValue) {
        self.0.entry(module).or_default().insert(key, value);
    }

    pub(crate) fn remove(&mut self, module: &str, key: &str) -> Option<SettingValue> {
        let values = self.0.get_mut(module)?;
        let removed = values.remove(key);
        if values.is_empty() {
            self.0.remove(module);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a resolution pass needs from the persistence collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub flags: FlagSnapshot,
    #[serde(default)]
    pub settings: SettingsSnapshot,
}

impl StateSnapshot {
    pub fn new(flags: FlagSnapshot, settings: SettingsSnapshot) -> Self {
        Self { flags, settings }
    }
}
