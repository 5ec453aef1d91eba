//! Endpoint exposure modules

use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};
use crate::module::settings::SettingDefinition;

pub const SINGLE_ENDPOINT: &str = "graphql-api/endpoint/single-endpoint";
pub const PERSISTED_QUERIES: &str = "graphql-api/endpoint/persisted-queries";
pub const CUSTOM_ENDPOINTS: &str = "graphql-api/endpoint/custom-endpoints";
pub const API_HIERARCHY: &str = "graphql-api/endpoint/api-hierarchy";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::Endpoint)
        .module(
            ModuleManifest::builder(SINGLE_ENDPOINT, "Single Endpoint")
                .description("Expose a single GraphQL endpoint with unrestricted access to the schema")
                .setting(
                    SettingDefinition::string("path")
                        .describe("URL path under which the endpoint is exposed")
                        .default("/graphql/"),
                ),
        )
        .module(
            ModuleManifest::builder(PERSISTED_QUERIES, "Persisted Queries")
                .description("Expose predefined responses through a custom URL, akin to REST endpoints"),
        )
        .module(
            ModuleManifest::builder(CUSTOM_ENDPOINTS, "Custom Endpoints")
                .description("Expose different subsets of the schema for different targets")
                .setting(
                    SettingDefinition::string("base-slug")
                        .describe("URL base slug shared by all custom endpoints")
                        .default("graphql"),
                ),
        )
        .module(
            ModuleManifest::builder(API_HIERARCHY, "API Hierarchy")
                .description("Create a hierarchy of API endpoints that inherit their configuration")
                .requires_any([PERSISTED_QUERIES, CUSTOM_ENDPOINTS]),
        )
}
