//! HTTP cache control modules

use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};
use crate::module::settings::SettingDefinition;

pub const CACHE_CONTROL: &str = "graphql-api/cache-control/cache-control";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::CacheControl).module(
        ModuleManifest::builder(CACHE_CONTROL, "Cache Control")
            .description("Provide HTTP caching for GraphQL queries, setting the max-age header")
            .setting(
                SettingDefinition::int("default-max-age")
                    .describe("Max-age (in seconds) for fields without an explicit cache control list")
                    .default(86400_i64),
            ),
    )
}
