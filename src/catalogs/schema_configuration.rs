//! Schema configuration modules

use crate::catalogs::access_control::ACCESS_CONTROL;
use crate::catalogs::endpoint::{CUSTOM_ENDPOINTS, PERSISTED_QUERIES};
use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};
use crate::module::settings::SettingDefinition;

pub const SCHEMA_CONFIGURATION: &str = "graphql-api/schema-configuration/schema-configuration";
pub const SCHEMA_NAMESPACING: &str = "graphql-api/schema-configuration/schema-namespacing";
pub const PUBLIC_PRIVATE_SCHEMA: &str = "graphql-api/schema-configuration/public-private-schema";
pub const FIELD_DEPRECATION: &str = "graphql-api/schema-configuration/field-deprecation";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::SchemaConfiguration)
        .module(
            ModuleManifest::builder(SCHEMA_CONFIGURATION, "Schema Configuration")
                .description("Customize the schema accessible to custom endpoints and persisted queries")
                .requires_any([PERSISTED_QUERIES, CUSTOM_ENDPOINTS])
                // No declared default: the host's global configuration decides
                .setting(
                    SettingDefinition::int("default-schema-configuration")
                        .describe("Schema configuration applied when an endpoint selects none"),
                ),
        )
        .module(
            ModuleManifest::builder(SCHEMA_NAMESPACING, "Schema Namespacing")
                .description("Automatically namespace types and interfaces to avoid naming conflicts")
                .requires_any([SCHEMA_CONFIGURATION])
                .setting(
                    SettingDefinition::bool("use-namespacing")
                        .describe("Namespace the schema unless a schema configuration says otherwise")
                        .default(false),
                ),
        )
        .module(
            ModuleManifest::builder(PUBLIC_PRIVATE_SCHEMA, "Public/Private Schema")
                .description("Either show or hide fields guarded by access control from the schema")
                .requires_any([ACCESS_CONTROL])
                .setting(
                    SettingDefinition::enumeration("mode", ["public", "private"])
                        .describe("Visibility of fields the user cannot access")
                        .default("public"),
                )
                .setting(
                    SettingDefinition::bool("enable-granular")
                        .describe("Allow individual access control lists to override the mode")
                        .default(true),
                ),
        )
        .module(
            ModuleManifest::builder(FIELD_DEPRECATION, "Field Deprecation")
                .description("Deprecate fields through the schema configuration")
                .requires_any([SCHEMA_CONFIGURATION]),
        )
}
