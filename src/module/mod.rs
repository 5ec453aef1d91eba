//! Module system for the GraphQL API plugin
//!
//! Optional capabilities of the API (endpoints, access control, cache control,
//! clients, operational features) are declared as modules. This module decides
//! which of them are switched on and what their configured values are.
//!
//! ## Architecture
//!
//! - **Catalogs**: one static list of module declarations per category
//! - **Registry**: merges catalogs into one namespace; the only query point
//! - **Enablement**: own flag AND every requirement group satisfied, cycles fail closed
//! - **Settings**: persisted value, declared default, or a global fallback signal
//! - **Snapshots**: every resolution reads one immutable snapshot, nothing is cached across them

pub mod enablement;
pub mod id;
pub mod registry;
pub mod settings;
pub mod traits;
pub mod validation;

pub use enablement::{CyclicDependencyWarning, EnablementReport, ResolutionPass};
pub use id::{ModuleCategory, ModuleId, PLUGIN_NAMESPACE};
pub use registry::{
    Catalog, DependencyExpression, Module, ModuleManifest, ModuleManifestBuilder,
    ModuleRegistry, RequirementGroup,
};
pub use settings::{
    GlobalSettings, ResolvedSetting, SettingDefinition, SettingType, SettingValue,
    SettingViolation,
};
pub use traits::{ModuleError, ModuleState, SnapshotSource, StateWriter};
