//! Module declarations
//!
//! A [`ModuleManifest`] is the immutable declaration of one module. Once
//! registered it is wrapped in a [`Module`], which adds the category it was
//! registered under and its position in declaration order.

use serde::{Deserialize, Serialize};

use crate::module::id::{ModuleCategory, ModuleId};
use crate::module::registry::dependencies::{DependencyExpression, RequirementGroup};
use crate::module::settings::types::SettingDefinition;

/// Module declaration (also the `[[modules]]` entry of a TOML catalog)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Namespaced identifier
    pub id: ModuleId,
    /// Display name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Flag used when the snapshot holds no flag for this module
    #[serde(default = "default_true")]
    pub enabled_by_default: bool,
    /// Excluded from listings, still resolvable
    #[serde(default)]
    pub hidden: bool,
    /// AND of OR-groups
    #[serde(default)]
    pub requires: DependencyExpression,
    /// Settings schema, in declaration order
    #[serde(default)]
    pub settings: Vec<SettingDefinition>,
}

fn default_true() -> bool {
    true
}

impl ModuleManifest {
    pub fn builder(id: impl Into<ModuleId>, name: impl Into<String>) -> ModuleManifestBuilder {
        ModuleManifestBuilder::new(id, name)
    }

    pub fn setting(&self, key: &str) -> Option<&SettingDefinition> {
        self.settings.iter().find(|s| s.key == key)
    }
}

/// Fluent construction of a [`ModuleManifest`] for code-authored catalogs
#[derive(Debug, Clone)]
pub struct ModuleManifestBuilder {
    manifest: ModuleManifest,
}

impl ModuleManifestBuilder {
    pub fn new(id: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            manifest: ModuleManifest {
                id: id.into(),
                name: name.into(),
                description: String::new(),
                enabled_by_default: true,
                hidden: false,
                requires: DependencyExpression::default(),
                settings: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.manifest.description = description.into();
        self
    }

    pub fn disabled_by_default(mut self) -> Self {
        self.manifest.enabled_by_default = false;
        self
    }

    pub fn enabled_by_default(mut self, enabled: bool) -> Self {
        self.manifest.enabled_by_default = enabled;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.manifest.hidden = true;
        self
    }

    /// Add a requirement group satisfied by any one of `alternatives`
    pub fn requires_any<I, T>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ModuleId>,
    {
        self.manifest.requires.push(RequirementGroup::new(alternatives));
        self
    }

    pub fn setting(mut self, definition: SettingDefinition) -> Self {
        self.manifest.settings.push(definition);
        self
    }

    pub fn build(self) -> ModuleManifest {
        self.manifest
    }
}

impl From<ModuleManifestBuilder> for ModuleManifest {
    fn from(builder: ModuleManifestBuilder) -> Self {
        builder.build()
    }
}

/// A registered module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    manifest: ModuleManifest,
    category: ModuleCategory,
    index: usize,
}

impl Module {
    pub(crate) fn new(manifest: ModuleManifest, category: ModuleCategory, index: usize) -> Self {
        Self {
            manifest,
            category,
            index,
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.manifest.id
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    pub fn category(&self) -> ModuleCategory {
        self.category
    }

    pub fn is_enabled_by_default(&self) -> bool {
        self.manifest.enabled_by_default
    }

    pub fn is_hidden(&self) -> bool {
        self.manifest.hidden
    }

    pub fn requires(&self) -> &DependencyExpression {
        &self.manifest.requires
    }

    pub fn settings(&self) -> &[SettingDefinition] {
        &self.manifest.settings
    }

    pub fn has_settings(&self) -> bool {
        !self.manifest.settings.is_empty()
    }

    pub fn setting(&self, key: &str) -> Option<&SettingDefinition> {
        self.manifest.setting(key)
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    /// Position in global declaration order
    pub fn index(&self) -> usize {
        self.index
    }
}
