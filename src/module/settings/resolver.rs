//! Settings resolution
//!
//! Precedence for an active module: persisted value, then the declared default,
//! then the process-wide fallback (signalled, not applied). Inactive modules
//! never expose settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::module::registry::Module;
use crate::module::settings::types::{SettingDefinition, SettingValue};
use crate::module::traits::ModuleError;
use crate::storage::SettingsSnapshot;

/// Effective value of one setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum ResolvedSetting {
    /// Persisted value that passed schema validation
    Persisted(SettingValue),
    /// Declared default of the schema
    Default(SettingValue),
    /// Owning module is inactive; callers must not apply the setting
    Inactive,
    /// No persisted value and no declared default: consult the global fallback
    UseGlobalDefault,
}

impl ResolvedSetting {
    /// Concrete value, if this resolution produced one
    pub fn value(&self) -> Option<&SettingValue> {
        match self {
            ResolvedSetting::Persisted(v) | ResolvedSetting::Default(v) => Some(v),
            ResolvedSetting::Inactive | ResolvedSetting::UseGlobalDefault => None,
        }
    }

    /// Materialise `UseGlobalDefault` from the process-wide fallback table
    ///
    /// `option` is the flat option name, see [`crate::ModuleId::setting_option_name`].
    pub fn or_global(self, globals: &GlobalSettings, option: &str) -> Option<SettingValue> {
        match self {
            ResolvedSetting::Persisted(v) | ResolvedSetting::Default(v) => Some(v),
            ResolvedSetting::UseGlobalDefault => globals.get(option).cloned(),
            ResolvedSetting::Inactive => None,
        }
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self, ResolvedSetting::Inactive)
    }
}

/// Process-wide fallback values, keyed by flat option name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalSettings(BTreeMap<String, SettingValue>);

impl GlobalSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.0.insert(option.into(), value.into());
        self
    }

    pub fn get(&self, option: &str) -> Option<&SettingValue> {
        self.0.get(option)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Schema entry for `key`
pub fn definition<'m>(module: &'m Module, key: &str) -> Result<&'m SettingDefinition, ModuleError> {
    module
        .setting(key)
        .ok_or_else(|| ModuleError::UnknownSetting {
            module: module.id().to_string(),
            key: key.to_string(),
        })
}

pub fn resolve_setting(
    module: &Module,
    key: &str,
    settings: &SettingsSnapshot,
    is_module_active: bool,
) -> Result<ResolvedSetting, ModuleError> {
    let definition = definition(module, key)?;
    resolve_definition(module, definition, settings, is_module_active)
}

/// Every setting of `module`, in schema order
pub fn resolve_module_settings(
    module: &Module,
    settings: &SettingsSnapshot,
    is_module_active: bool,
) -> Result<Vec<(String, ResolvedSetting)>, ModuleError> {
    module
        .settings()
        .iter()
        .map(|definition| {
            resolve_definition(module, definition, settings, is_module_active)
                .map(|resolved| (definition.key.clone(), resolved))
        })
        .collect()
}

fn resolve_definition(
    module: &Module,
    definition: &SettingDefinition,
    settings: &SettingsSnapshot,
    is_module_active: bool,
) -> Result<ResolvedSetting, ModuleError> {
    if !is_module_active {
        return Ok(ResolvedSetting::Inactive);
    }

    if let Some(value) = settings.get(module.id().as_str(), &definition.key) {
        definition
            .check(value)
            .map_err(|violation| ModuleError::Validation {
                module: module.id().to_string(),
                key: definition.key.clone(),
                violation,
            })?;
        return Ok(ResolvedSetting::Persisted(value.clone()));
    }

    Ok(match &definition.default {
        Some(default) => ResolvedSetting::Default(default.clone()),
        None => ResolvedSetting::UseGlobalDefault,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::id::ModuleCategory;
    use crate::module::registry::ModuleManifest;

    const ID: &str = "t/cache-control/cache";

    fn module() -> Module {
        let manifest = ModuleManifest::builder(ID, "Cache")
            .setting(crate::SettingDefinition::int("max-age").default(60_i64))
            .setting(crate::SettingDefinition::string("vary"))
            .build();
        Module::new(manifest, ModuleCategory::CacheControl, 0)
    }

    #[test]
    fn test_precedence() {
        let module = module();
        let empty = SettingsSnapshot::new();
        assert_eq!(
            resolve_setting(&module, "max-age", &empty, true).unwrap(),
            ResolvedSetting::Default(SettingValue::Int(60))
        );
        assert_eq!(
            resolve_setting(&module, "vary", &empty, true).unwrap(),
            ResolvedSetting::UseGlobalDefault
        );

        let persisted = SettingsSnapshot::new().with(ID, "max-age", 5_i64);
        assert_eq!(
            resolve_setting(&module, "max-age", &persisted, true).unwrap(),
            ResolvedSetting::Persisted(SettingValue::Int(5))
        );
        assert_eq!(
            resolve_setting(&module, "max-age", &persisted, false).unwrap(),
            ResolvedSetting::Inactive
        );
    }

    #[test]
    fn test_invalid_persisted_value_is_not_coerced() {
        let module = module();
        let snapshot = SettingsSnapshot::new().with(ID, "max-age", "60");
        assert!(matches!(
            resolve_setting(&module, "max-age", &snapshot, true),
            Err(ModuleError::Validation { .. })
        ));
        // Inactive wins over validation
        assert_eq!(
            resolve_setting(&module, "max-age", &snapshot, false).unwrap(),
            ResolvedSetting::Inactive
        );
    }

    #[test]
    fn test_unknown_key_even_when_inactive() {
        let module = module();
        assert!(matches!(
            resolve_setting(&module, "nope", &SettingsSnapshot::new(), false),
            Err(ModuleError::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_or_global() {
        let globals = GlobalSettings::new().with("cache_vary", "Accept");
        assert_eq!(
            ResolvedSetting::UseGlobalDefault.or_global(&globals, "cache_vary"),
            Some(SettingValue::from("Accept"))
        );
        assert_eq!(ResolvedSetting::Inactive.or_global(&globals, "cache_vary"), None);
        assert_eq!(
            ResolvedSetting::Default(SettingValue::Int(1)).or_global(&globals, "x"),
            Some(SettingValue::Int(1))
        );
    }

    #[test]
    fn test_module_settings_in_schema_order() {
        let module = module();
        let resolved = resolve_module_settings(&module, &SettingsSnapshot::new(), true).unwrap();
        let keys: Vec<&str> = resolved.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["max-age", "vary"]);
    }
}
