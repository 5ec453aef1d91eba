//! Client tooling modules

use crate::catalogs::endpoint::{CUSTOM_ENDPOINTS, SINGLE_ENDPOINT};
use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};
use crate::module::settings::SettingDefinition;

pub const GRAPHIQL_FOR_SINGLE_ENDPOINT: &str = "graphql-api/client/graphiql-for-single-endpoint";
pub const INTERACTIVE_SCHEMA_FOR_SINGLE_ENDPOINT: &str =
    "graphql-api/client/interactive-schema-for-single-endpoint";
pub const GRAPHIQL_FOR_CUSTOM_ENDPOINTS: &str = "graphql-api/client/graphiql-for-custom-endpoints";
pub const INTERACTIVE_SCHEMA_FOR_CUSTOM_ENDPOINTS: &str =
    "graphql-api/client/interactive-schema-for-custom-endpoints";
pub const GRAPHIQL_EXPLORER: &str = "graphql-api/client/graphiql-explorer";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::Client)
        .module(
            ModuleManifest::builder(GRAPHIQL_FOR_SINGLE_ENDPOINT, "GraphiQL for Single Endpoint")
                .description("Make a public GraphiQL client available under the single endpoint")
                .requires_any([SINGLE_ENDPOINT])
                .setting(
                    SettingDefinition::string("path")
                        .describe("URL path of the client")
                        .default("/graphiql/"),
                ),
        )
        .module(
            ModuleManifest::builder(
                INTERACTIVE_SCHEMA_FOR_SINGLE_ENDPOINT,
                "Interactive Schema for Single Endpoint",
            )
            .description("Make a public Interactive Schema client available under the single endpoint")
            .requires_any([SINGLE_ENDPOINT])
            .setting(
                SettingDefinition::string("path")
                    .describe("URL path of the client")
                    .default("/schema/"),
            ),
        )
        .module(
            ModuleManifest::builder(GRAPHIQL_FOR_CUSTOM_ENDPOINTS, "GraphiQL for Custom Endpoints")
                .description("Enable a GraphiQL client for each custom endpoint")
                .requires_any([CUSTOM_ENDPOINTS]),
        )
        .module(
            ModuleManifest::builder(
                INTERACTIVE_SCHEMA_FOR_CUSTOM_ENDPOINTS,
                "Interactive Schema for Custom Endpoints",
            )
            .description("Enable an Interactive Schema client for each custom endpoint")
            .requires_any([CUSTOM_ENDPOINTS]),
        )
        .module(
            ModuleManifest::builder(GRAPHIQL_EXPLORER, "GraphiQL Explorer")
                .description("Add the Explorer widget to the GraphiQL clients, to compose queries by clicking fields")
                .requires_any([GRAPHIQL_FOR_SINGLE_ENDPOINT, GRAPHIQL_FOR_CUSTOM_ENDPOINTS])
                .setting(
                    SettingDefinition::bool("use-in-admin-client")
                        .describe("Also use the Explorer in the administrator's GraphiQL client")
                        .default(true),
                )
                .setting(
                    SettingDefinition::bool("use-in-public-client")
                        .describe("Also use the Explorer in the public GraphiQL clients")
                        .default(true),
                ),
        )
}
