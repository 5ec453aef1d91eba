//! JSON file persistence collaborator
//!
//! The whole state lives in one JSON document. A missing file reads as an empty
//! snapshot; every write rewrites the document.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::module::id::ModuleId;
use crate::module::settings::types::SettingValue;
use crate::module::traits::{ModuleError, SnapshotSource, StateWriter};
use crate::storage::snapshot::StateSnapshot;

/// Persisted state backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateSnapshot, ModuleError> {
        if !self.path.exists() {
            debug!("State file {:?} does not exist, using empty snapshot", self.path);
            return Ok(StateSnapshot::default());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            ModuleError::Storage(format!("Failed to read state file {:?}: {}", self.path, e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, state: &StateSnapshot) -> Result<(), ModuleError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating state directory: {:?}", parent);
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, contents).map_err(|e| {
            ModuleError::Storage(format!("Failed to write state file {:?}: {}", self.path, e))
        })
    }

    fn update<F>(&self, f: F) -> Result<(), ModuleError>
    where
        F: FnOnce(&mut StateSnapshot),
    {
        let mut state = self.load()?;
        f(&mut state);
        self.save(&state)
    }
}

impl SnapshotSource for JsonFileStore {
    fn snapshot(&self) -> Result<StateSnapshot, ModuleError> {
        self.load()
    }
}

impl StateWriter for JsonFileStore {
    fn write_flag(&mut self, module: &ModuleId, enabled: bool) -> Result<(), ModuleError> {
        self.update(|state| state.flags.insert(module.clone(), enabled))
    }

    fn write_setting(
        &mut self,
        module: &ModuleId,
        key: &str,
        value: SettingValue,
    ) -> Result<(), ModuleError> {
        self.update(|state| {
            state
                .settings
                .insert(module.clone(), key.to_string(), value)
        })
    }

    fn clear_setting(&mut self, module: &ModuleId, key: &str) -> Result<(), ModuleError> {
        self.update(|state| {
            state.settings.remove(module.as_str(), key);
        })
    }
}
