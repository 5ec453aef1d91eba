//! Built-in module catalogs, one per category
//!
//! Catalogs may reference modules of other categories; registration order does
//! not matter as long as every catalog is registered before the first query.

pub mod access_control;
pub mod cache_control;
pub mod client;
pub mod endpoint;
pub mod operational;
pub mod schema_configuration;

use tracing::debug;

use crate::module::registry::{Catalog, ModuleRegistry};
use crate::module::traits::ModuleError;

/// Every built-in catalog, in listing order
pub fn all() -> Vec<Catalog> {
    vec![
        endpoint::catalog(),
        schema_configuration::catalog(),
        access_control::catalog(),
        cache_control::catalog(),
        client::catalog(),
        operational::catalog(),
    ]
}

/// Register the built-in catalogs into an existing registry
pub fn register_builtin(registry: &mut ModuleRegistry) -> Result<usize, ModuleError> {
    let mut added = 0;
    for catalog in all() {
        added += registry.register(catalog)?;
    }
    debug!("Registered {} built-in modules", added);
    Ok(added)
}

/// Registry holding only the built-in catalogs, verified
pub fn builtin_registry() -> Result<ModuleRegistry, ModuleError> {
    let mut registry = ModuleRegistry::new();
    register_builtin(&mut registry)?;
    registry.verify()?;
    Ok(registry)
}
