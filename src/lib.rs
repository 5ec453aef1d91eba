//! GraphQL API Modules - dependency and enablement resolution for optional API capabilities
//!
//! The GraphQL API plugin exposes optional capabilities ("modules") that an
//! administrator switches on and off: endpoints, access control, cache control,
//! client tooling, operational features. This crate decides which of them are
//! effectively active for a persisted configuration and what their settings
//! resolve to. HTTP routing, UI and persistence mechanics stay with the host.
//!
//! ## Design Principles
//!
//! 1. **Static catalogs**: modules are declared once per process and never mutated
//! 2. **Data-driven dependencies**: an AND of OR-groups per module
//! 3. **Pure resolution**: every query is a function of one immutable snapshot
//! 4. **Fail closed**: dependency cycles resolve to inactive, never loop
//!
//! ## Example
//! ```rust
//! use graphql_api_modules::catalogs::{self, operational};
//! use graphql_api_modules::storage::FlagSnapshot;
//!
//! let registry = catalogs::builtin_registry()?;
//! let flags = FlagSnapshot::new();
//! assert!(!registry.is_active(operational::MULTIPLE_QUERY_EXECUTION, &flags)?);
//!
//! let flags = flags.with(operational::MULTIPLE_QUERY_EXECUTION, true);
//! assert!(registry.is_active(operational::MULTIPLE_QUERY_EXECUTION, &flags)?);
//! # Ok::<(), graphql_api_modules::ModuleError>(())
//! ```

pub mod catalogs;
pub mod config;
pub mod module;
pub mod storage;
pub mod utils;

pub use config::{EngineConfig, LoggingConfig};
pub use module::{
    Catalog, CyclicDependencyWarning, EnablementReport, GlobalSettings, Module, ModuleCategory,
    ModuleError, ModuleId, ModuleManifest, ModuleRegistry, ModuleState, RequirementGroup,
    ResolvedSetting, SettingDefinition, SettingType, SettingValue, SnapshotSource, StateWriter,
};
pub use storage::{FlagSnapshot, JsonFileStore, MemoryStore, SettingsSnapshot, StateSnapshot};
