//! In-memory persistence collaborator

use tracing::debug;

use crate::module::id::ModuleId;
use crate::module::settings::types::SettingValue;
use crate::module::traits::{ModuleError, SnapshotSource, StateWriter};
use crate::storage::snapshot::StateSnapshot;

/// Keeps the persisted state in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: StateSnapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(state: StateSnapshot) -> Self {
        Self { state }
    }

    /// Borrow the current state without cloning it
    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }
}

impl SnapshotSource for MemoryStore {
    fn snapshot(&self) -> Result<StateSnapshot, ModuleError> {
        Ok(self.state.clone())
    }
}

impl StateWriter for MemoryStore {
    fn write_flag(&mut self, module: &ModuleId, enabled: bool) -> Result<(), ModuleError> {
        debug!("Setting flag of {} to {}", module, enabled);
        self.state.flags.insert(module.clone(), enabled);
        Ok(())
    }

    fn write_setting(
        &mut self,
        module: &ModuleId,
        key: &str,
        value: SettingValue,
    ) -> Result<(), ModuleError> {
        debug!("Setting {}.{} to {}", module, key, value);
        self.state
            .settings
            .insert(module.clone(), key.to_string(), value);
        Ok(())
    }

    fn clear_setting(&mut self, module: &ModuleId, key: &str) -> Result<(), ModuleError> {
        self.state.settings.remove(module.as_str(), key);
        Ok(())
    }
}
