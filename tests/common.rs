//! Shared helpers for integration tests
#![allow(dead_code)]

use graphql_api_modules::{Catalog, ModuleCategory, ModuleManifest, ModuleRegistry};

pub const SINGLE_ENDPOINT: &str = "test/endpoint/single-endpoint";
pub const CUSTOM_ENDPOINTS: &str = "test/endpoint/custom-endpoints";
pub const CACHE_CONTROL: &str = "test/cache-control/cache-control";
pub const MULTI_QUERY_EXECUTION: &str = "test/operational/multi-query-execution";

/// Identifier of a module in the "test/operational" namespace
pub fn op(name: &str) -> String {
    format!("test/operational/{}", name)
}

/// Declaration of an operational test module: (name, enabled by default, groups)
pub type Decl<'a> = (&'a str, bool, Vec<Vec<&'a str>>);

pub fn operational_catalog(decls: &[Decl<'_>]) -> Catalog {
    let mut catalog = Catalog::new(ModuleCategory::Operational);
    for (name, on, groups) in decls {
        let mut builder = ModuleManifest::builder(op(name), *name).enabled_by_default(*on);
        for group in groups {
            builder = builder.requires_any(group.iter().map(|member| op(member)));
        }
        catalog = catalog.module(builder);
    }
    catalog
}

/// Registry holding only operational test modules
pub fn operational_registry(decls: &[Decl<'_>]) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry
        .register(operational_catalog(decls))
        .expect("test catalog registers");
    registry
}

pub fn endpoint_catalog() -> Catalog {
    Catalog::new(ModuleCategory::Endpoint)
        .module(ModuleManifest::builder(SINGLE_ENDPOINT, "Single Endpoint"))
        .module(ModuleManifest::builder(CUSTOM_ENDPOINTS, "Custom Endpoints"))
}

pub fn cache_control_catalog() -> Catalog {
    Catalog::new(ModuleCategory::CacheControl).module(
        ModuleManifest::builder(CACHE_CONTROL, "Cache Control").setting(
            graphql_api_modules::SettingDefinition::int("max-age").default(3600_i64),
        ),
    )
}

pub fn multi_query_catalog() -> Catalog {
    Catalog::new(ModuleCategory::Operational).module(
        ModuleManifest::builder(MULTI_QUERY_EXECUTION, "Multiple Query Execution")
            .disabled_by_default()
            .requires_any([SINGLE_ENDPOINT, CUSTOM_ENDPOINTS]),
    )
}

/// The cache-control / multi-query-execution scenario, fully registered and verified
pub fn scenario_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    for catalog in [endpoint_catalog(), cache_control_catalog(), multi_query_catalog()] {
        registry.register(catalog).expect("scenario catalog registers");
    }
    registry.verify().expect("scenario registry verifies");
    registry
}

/// `root` needs one of {a0, b0}; every `ai` and `bi` needs one of
/// {a(i+1), b(i+1)}; the last layer needs `root`. One strongly connected
/// component of `2 * layers + 1` modules with a branching factor of two.
pub fn layered_cycle_registry(layers: usize) -> ModuleRegistry {
    let mut catalog = Catalog::new(ModuleCategory::Operational)
        .module(ModuleManifest::builder(op("root"), "root").requires_any([op("a0"), op("b0")]));
    for layer in 0..layers {
        let next = if layer + 1 == layers {
            vec![op("root")]
        } else {
            vec![op(&format!("a{}", layer + 1)), op(&format!("b{}", layer + 1))]
        };
        for side in ["a", "b"] {
            let name = format!("{}{}", side, layer);
            catalog = catalog
                .module(ModuleManifest::builder(op(&name), name.as_str()).requires_any(next.clone()));
        }
    }
    let mut registry = ModuleRegistry::new();
    registry.register(catalog).expect("layered catalog registers");
    registry
}
