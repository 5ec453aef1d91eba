//! Configuration management for the module engine
//!
//! Handles configuration loading (JSON or TOML), validation, and assembling the
//! module registry the configuration describes.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalogs;
use crate::module::registry::{Catalog, ModuleRegistry};
use crate::module::settings::GlobalSettings;
use crate::storage::JsonFileStore;

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "graphql_api_modules=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,

    /// JSON file holding persisted flags and settings
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Register the built-in catalogs
    #[serde(default = "default_true")]
    pub builtin_catalogs: bool,

    /// Additional TOML catalogs
    #[serde(default)]
    pub catalog_files: Vec<PathBuf>,

    /// Process-wide fallback values for settings that declare no default
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

fn default_true() -> bool {
    true
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/module-state.json")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logging: None,
            state_file: default_state_file(),
            builtin_catalogs: true,
            catalog_files: Vec::new(),
            global_settings: GlobalSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: EngineConfig =
            toml::from_str(&content).with_context(|| format!("Invalid TOML config {:?}", path))?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path)?,
            Some("json") => Self::from_json_file(path)?,
            other => anyhow::bail!(
                "Unsupported config format {:?} for {:?} (expected .toml or .json)",
                other,
                path
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.state_file.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("state_file must not be empty"));
        }

        if let Some(name) = self.global_settings.iter().map(|(k, _)| k).find(|k| k.trim().is_empty()) {
            return Err(anyhow::anyhow!(
                "global_settings contains an empty option name ({:?})",
                name
            ));
        }

        if !self.builtin_catalogs && self.catalog_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No catalogs configured: enable builtin_catalogs or list catalog_files"
            ));
        }

        Ok(())
    }

    /// Build and verify the registry described by this configuration
    pub fn build_registry(&self) -> anyhow::Result<ModuleRegistry> {
        let mut registry = ModuleRegistry::new();

        if self.builtin_catalogs {
            catalogs::register_builtin(&mut registry)
                .context("Failed to register built-in catalogs")?;
        }

        for path in &self.catalog_files {
            let catalog = Catalog::from_file(path)
                .with_context(|| format!("Failed to load catalog {:?}", path))?;
            registry
                .register(catalog)
                .with_context(|| format!("Failed to register catalog {:?}", path))?;
        }

        registry.verify().context("Module registry failed verification")?;
        info!("Loaded {} modules", registry.len());
        Ok(registry)
    }

    /// Persistence collaborator for the configured state file
    pub fn state_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.state_file)
    }
}
