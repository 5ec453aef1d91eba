//! Operational features of query execution

use crate::catalogs::endpoint::{CUSTOM_ENDPOINTS, PERSISTED_QUERIES, SINGLE_ENDPOINT};
use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};

pub const MULTIPLE_QUERY_EXECUTION: &str = "graphql-api/operational/multiple-query-execution";
pub const REMOVE_IF_NULL_DIRECTIVE: &str = "graphql-api/operational/remove-if-null-directive";
pub const PROACTIVE_FEEDBACK: &str = "graphql-api/operational/proactive-feedback";
pub const EMBEDDABLE_FIELDS: &str = "graphql-api/operational/embeddable-fields";
pub const MUTATIONS: &str = "graphql-api/operational/mutations";
pub const NESTED_MUTATIONS: &str = "graphql-api/operational/nested-mutations";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::Operational)
        .module(
            ModuleManifest::builder(MULTIPLE_QUERY_EXECUTION, "Multiple Query Execution")
                .description("Execute multiple GraphQL queries in a single operation")
                .disabled_by_default()
                .requires_any([PERSISTED_QUERIES, SINGLE_ENDPOINT, CUSTOM_ENDPOINTS]),
        )
        .module(
            ModuleManifest::builder(REMOVE_IF_NULL_DIRECTIVE, "Remove if Null")
                .description("Add the @removeIfNull directive, to remove an output from the response if it is null")
                .disabled_by_default(),
        )
        .module(
            ModuleManifest::builder(PROACTIVE_FEEDBACK, "Proactive Feedback")
                .description("Send deprecations, warnings, logs, notices and traces under the top-level extensions entry"),
        )
        .module(
            ModuleManifest::builder(EMBEDDABLE_FIELDS, "Embeddable Fields")
                .description("Embed the value of a field into the argument of another field, via notation {{ field }}")
                .disabled_by_default(),
        )
        .module(
            ModuleManifest::builder(MUTATIONS, "Mutations")
                .description("Modify data by executing mutations"),
        )
        .module(
            ModuleManifest::builder(NESTED_MUTATIONS, "Nested Mutations")
                .description("Execute mutations from any type in the schema, not only from the root")
                .disabled_by_default()
                .requires_any([MUTATIONS]),
        )
}
