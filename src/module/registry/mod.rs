//! Module registry
//!
//! Merges every category catalog into one namespace and answers the queries the
//! host asks: is a module active, and what is the value of one of its settings.
//! The registry is built once at startup and is read-only afterwards.

pub mod catalog;
pub mod dependencies;
pub mod manifest;

pub use catalog::Catalog;
pub use dependencies::{
    DependencyAnalysis, DependencyExpression, ModuleDependencies, RequirementGroup,
};
pub use manifest::{Module, ModuleManifest, ModuleManifestBuilder};

use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::module::enablement::{CyclicDependencyWarning, EnablementReport, ResolutionPass};
use crate::module::id::{ModuleCategory, ModuleId};
use crate::module::settings::resolver::{self, ResolvedSetting};
use crate::module::settings::types::SettingValue;
use crate::module::traits::{ModuleError, ModuleState, StateWriter};
use crate::module::validation::ManifestValidator;
use crate::storage::{FlagSnapshot, SettingsSnapshot};

/// All registered modules, addressable by identifier
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    /// Modules in declaration order
    modules: Vec<Module>,
    /// Identifier -> position in `modules`
    index: HashMap<ModuleId, usize>,
    /// Category -> positions, in declaration order
    by_category: HashMap<ModuleCategory, Vec<usize>>,
    /// Categories in first-registration order
    categories: Vec<ModuleCategory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a category's catalog into the namespace
    ///
    /// Re-registering an identical declaration under the same category is a
    /// no-op. The merge is all-or-nothing: on error nothing is registered.
    /// Returns the number of newly registered modules.
    pub fn register(&mut self, catalog: Catalog) -> Result<usize, ModuleError> {
        let category = catalog.category();
        let validator = ManifestValidator::new();
        let mut incoming: HashSet<&str> = HashSet::new();
        let mut fresh = Vec::new();

        for manifest in catalog.modules() {
            if !incoming.insert(manifest.id.as_str()) {
                return Err(ModuleError::DuplicateModule {
                    module: manifest.id.to_string(),
                    existing: category,
                    incoming: category,
                });
            }

            match self.find(manifest.id.as_str()) {
                Some(existing)
                    if existing.category() == category && existing.manifest() == manifest =>
                {
                    debug!("Module {} already registered, skipping", manifest.id);
                }
                Some(existing) => {
                    return Err(ModuleError::DuplicateModule {
                        module: manifest.id.to_string(),
                        existing: existing.category(),
                        incoming: category,
                    });
                }
                None => fresh.push(manifest.id.clone()),
            }

            validator
                .validate(manifest, category)
                .into_result(manifest)?;
        }

        let fresh: HashSet<ModuleId> = fresh.into_iter().collect();
        let mut added = 0;
        for manifest in catalog.into_modules() {
            if !fresh.contains(&manifest.id) {
                continue;
            }
            let position = self.modules.len();
            debug!("Registering module {} ({})", manifest.id, category);
            self.index.insert(manifest.id.clone(), position);
            self.by_category.entry(category).or_default().push(position);
            self.modules.push(Module::new(manifest, category, position));
            added += 1;
        }

        if added > 0 && !self.categories.contains(&category) {
            self.categories.push(category);
        }

        debug!("Registered {} modules for category {}", added, category);
        Ok(added)
    }

    /// Check cross-catalog references once every catalog is registered
    ///
    /// Requirements naming an unregistered module are authoring errors. Static
    /// cycles are only logged: an OR-group can make them harmless, and the
    /// enablement resolver breaks them safely.
    pub fn verify(&self) -> Result<DependencyAnalysis, ModuleError> {
        let analysis = ModuleDependencies::analyze(self);

        if let Some((module, missing)) = analysis.dangling.first() {
            return Err(ModuleError::InvalidDependencyDeclaration {
                module: module.to_string(),
                reason: format!("requires unregistered module {}", missing),
            });
        }

        if !analysis.is_acyclic() {
            warn!(
                "Dependency graph contains cycles through: {:?}",
                analysis
                    .cyclic
                    .iter()
                    .map(ModuleId::as_str)
                    .collect::<Vec<_>>()
            );
        }

        info!(
            "Module registry verified: {} modules in {} categories",
            self.modules.len(),
            self.categories.len()
        );
        Ok(analysis)
    }

    /// Look up a module
    pub fn get(&self, id: &str) -> Result<&Module, ModuleError> {
        self.find(id)
            .ok_or_else(|| ModuleError::UnknownModule(id.to_string()))
    }

    pub fn find(&self, id: &str) -> Option<&Module> {
        self.index.get(id).map(|&position| &self.modules[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Modules of a category in declaration order, hidden ones included
    pub fn list_by_category(&self, category: ModuleCategory) -> Vec<&Module> {
        self.by_category
            .get(&category)
            .map(|positions| positions.iter().map(|&p| &self.modules[p]).collect())
            .unwrap_or_default()
    }

    /// Modules of a category that should appear in listings
    pub fn list_visible_by_category(&self, category: ModuleCategory) -> Vec<&Module> {
        self.list_by_category(category)
            .into_iter()
            .filter(|m| !m.is_hidden())
            .collect()
    }

    /// Categories in first-registration order
    pub fn categories(&self) -> &[ModuleCategory] {
        &self.categories
    }

    /// All modules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules with a requirement group that mentions `id`
    pub fn dependents_of(&self, id: &str) -> Result<Vec<&Module>, ModuleError> {
        self.get(id)?;
        Ok(self
            .modules
            .iter()
            .filter(|m| m.requires().references(id))
            .collect())
    }

    /// Start a resolution pass over one flag snapshot
    pub fn resolution_pass<'a>(&'a self, flags: &'a FlagSnapshot) -> ResolutionPass<'a> {
        ResolutionPass::new(self, flags)
    }

    /// Effective active state of one module
    ///
    /// Cycles met on the way are only logged; use
    /// [`is_active_with_warnings`](Self::is_active_with_warnings),
    /// [`resolve_all`](Self::resolve_all) or a [`ResolutionPass`] to observe them.
    pub fn is_active(&self, id: &str, flags: &FlagSnapshot) -> Result<bool, ModuleError> {
        self.resolution_pass(flags).is_active(id)
    }

    /// Effective active state of one module and the cycles met resolving it
    pub fn is_active_with_warnings(
        &self,
        id: &str,
        flags: &FlagSnapshot,
    ) -> Result<(bool, Vec<CyclicDependencyWarning>), ModuleError> {
        let mut pass = self.resolution_pass(flags);
        let active = pass.is_active(id)?;
        Ok((active, pass.into_warnings()))
    }

    /// Effective state of one module, with the reason when inactive
    pub fn state(&self, id: &str, flags: &FlagSnapshot) -> Result<ModuleState, ModuleError> {
        self.resolution_pass(flags).state(id)
    }

    /// Effective state of every module in one pass
    pub fn resolve_all(&self, flags: &FlagSnapshot) -> Result<EnablementReport, ModuleError> {
        let mut pass = self.resolution_pass(flags);
        for module in &self.modules {
            pass.state(module.id().as_str())?;
        }
        Ok(pass.into_report())
    }

    /// Effective value of one setting
    pub fn resolve_setting(
        &self,
        id: &str,
        key: &str,
        settings: &SettingsSnapshot,
        is_module_active: bool,
    ) -> Result<ResolvedSetting, ModuleError> {
        let module = self.get(id)?;
        resolver::resolve_setting(module, key, settings, is_module_active)
    }

    /// Effective value of every setting of a module, in schema order
    pub fn resolve_settings(
        &self,
        id: &str,
        settings: &SettingsSnapshot,
        is_module_active: bool,
    ) -> Result<Vec<(String, ResolvedSetting)>, ModuleError> {
        let module = self.get(id)?;
        resolver::resolve_module_settings(module, settings, is_module_active)
    }

    /// Persist a module's on/off flag
    pub fn set_enabled<W: StateWriter + ?Sized>(
        &self,
        writer: &mut W,
        id: &str,
        enabled: bool,
    ) -> Result<(), ModuleError> {
        let module = self.get(id)?;
        info!("{} module {}", if enabled { "Enabling" } else { "Disabling" }, id);
        writer.write_flag(module.id(), enabled)
    }

    /// Persist a setting value after checking it against the schema
    pub fn set_setting<W: StateWriter + ?Sized>(
        &self,
        writer: &mut W,
        id: &str,
        key: &str,
        value: SettingValue,
    ) -> Result<(), ModuleError> {
        let module = self.get(id)?;
        let definition = resolver::definition(module, key)?;
        definition
            .check(&value)
            .map_err(|violation| ModuleError::Validation {
                module: id.to_string(),
                key: key.to_string(),
                violation,
            })?;
        writer.write_setting(module.id(), key, value)
    }

    /// Remove a persisted setting value so the default applies again
    pub fn reset_setting<W: StateWriter + ?Sized>(
        &self,
        writer: &mut W,
        id: &str,
        key: &str,
    ) -> Result<(), ModuleError> {
        let module = self.get(id)?;
        resolver::definition(module, key)?;
        writer.clear_setting(module.id(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_catalog() -> Catalog {
        Catalog::new(ModuleCategory::Endpoint)
            .module(ModuleManifest::builder("t/endpoint/single", "Single"))
            .module(ModuleManifest::builder("t/endpoint/custom", "Custom").hidden())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ModuleRegistry::new();
        assert_eq!(registry.register(endpoint_catalog()).unwrap(), 2);
        assert_eq!(registry.get("t/endpoint/single").unwrap().name(), "Single");
        assert!(matches!(
            registry.get("t/endpoint/none"),
            Err(ModuleError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ModuleRegistry::new();
        registry.register(endpoint_catalog()).unwrap();
        assert_eq!(registry.register(endpoint_catalog()).unwrap(), 0);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.categories(), &[ModuleCategory::Endpoint]);
    }

    #[test]
    fn test_changed_redeclaration_is_duplicate() {
        let mut registry = ModuleRegistry::new();
        registry.register(endpoint_catalog()).unwrap();
        let changed = Catalog::new(ModuleCategory::Endpoint)
            .module(ModuleManifest::builder("t/endpoint/single", "Single").disabled_by_default());
        assert!(matches!(
            registry.register(changed),
            Err(ModuleError::DuplicateModule { .. })
        ));
    }

    #[test]
    fn test_failed_register_leaves_registry_untouched() {
        let mut registry = ModuleRegistry::new();
        let catalog = Catalog::new(ModuleCategory::Endpoint)
            .module(ModuleManifest::builder("t/endpoint/good", "Good"))
            .module(ModuleManifest::builder("t/endpoint/bad", "Bad").requires_any(Vec::<String>::new()));
        assert!(registry.register(catalog).is_err());
        assert!(registry.is_empty());
        assert!(registry.categories().is_empty());
    }

    #[test]
    fn test_hidden_modules_are_listed_but_not_visible() {
        let mut registry = ModuleRegistry::new();
        registry.register(endpoint_catalog()).unwrap();
        assert_eq!(registry.list_by_category(ModuleCategory::Endpoint).len(), 2);
        assert_eq!(registry.list_visible_by_category(ModuleCategory::Endpoint).len(), 1);
        assert!(registry.list_by_category(ModuleCategory::Client).is_empty());
    }

    #[test]
    fn test_verify_rejects_dangling_requirement() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(
                Catalog::new(ModuleCategory::Operational).module(
                    ModuleManifest::builder("t/operational/x", "X").requires_any(["t/endpoint/single"]),
                ),
            )
            .unwrap();
        assert!(matches!(
            registry.verify(),
            Err(ModuleError::InvalidDependencyDeclaration { .. })
        ));

        // Registering the missing catalog afterwards fixes it
        registry.register(endpoint_catalog()).unwrap();
        assert!(registry.verify().is_ok());
    }
}
