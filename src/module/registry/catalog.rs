//! Per-category module catalogs
//!
//! A catalog is the ordered list of modules one functional area declares. It can
//! be authored in code or loaded from a TOML file:
//!
//! ```toml
//! category = "operational"
//!
//! [[modules]]
//! id = "acme/operational/batching"
//! name = "Batching"
//! enabled_by_default = false
//! requires = [["graphql-api/endpoint/single-endpoint", "graphql-api/endpoint/custom-endpoints"]]
//!
//! [[modules.settings]]
//! key = "max-batch"
//! type = "int"
//! default = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::module::id::ModuleCategory;
use crate::module::registry::manifest::ModuleManifest;
use crate::module::traits::ModuleError;

/// Ordered module declarations of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    category: ModuleCategory,
    #[serde(default)]
    modules: Vec<ModuleManifest>,
}

impl Catalog {
    pub fn new(category: ModuleCategory) -> Self {
        Self {
            category,
            modules: Vec::new(),
        }
    }

    /// Append a module declaration
    pub fn module(mut self, manifest: impl Into<ModuleManifest>) -> Self {
        self.modules.push(manifest.into());
        self
    }

    pub fn category(&self) -> ModuleCategory {
        self.category
    }

    pub fn modules(&self) -> &[ModuleManifest] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<ModuleManifest> {
        self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ModuleError> {
        toml::from_str(contents).map_err(|e| {
            ModuleError::InvalidManifest(format!("Failed to parse catalog TOML: {}", e))
        })
    }

    /// Load a catalog from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::InvalidManifest(format!(
                "Failed to read catalog file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }
}
