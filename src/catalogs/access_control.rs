//! Access control modules

use crate::catalogs::schema_configuration::SCHEMA_CONFIGURATION;
use crate::module::id::ModuleCategory;
use crate::module::registry::{Catalog, ModuleManifest};

pub const ACCESS_CONTROL: &str = "graphql-api/access-control/access-control";
pub const RULE_DISABLE_ACCESS: &str = "graphql-api/access-control/access-control-rule-disable-access";
pub const RULE_USER_STATE: &str = "graphql-api/access-control/access-control-rule-user-state";
pub const RULE_USER_ROLES: &str = "graphql-api/access-control/access-control-rule-user-roles";
pub const RULE_USER_CAPABILITIES: &str =
    "graphql-api/access-control/access-control-rule-user-capabilities";

pub fn catalog() -> Catalog {
    Catalog::new(ModuleCategory::AccessControl)
        .module(
            ModuleManifest::builder(ACCESS_CONTROL, "Access Control")
                .description("Set-up rules to define who can access the different fields and directives")
                .requires_any([SCHEMA_CONFIGURATION]),
        )
        .module(
            ModuleManifest::builder(RULE_DISABLE_ACCESS, "Access Control Rule: Disable Access")
                .description("Remove access to the fields and directives")
                .requires_any([ACCESS_CONTROL]),
        )
        .module(
            ModuleManifest::builder(RULE_USER_STATE, "Access Control Rule: User State")
                .description("Allow or reject access depending on the user being logged-in or not")
                .requires_any([ACCESS_CONTROL]),
        )
        .module(
            ModuleManifest::builder(RULE_USER_ROLES, "Access Control Rule: User Roles")
                .description("Allow or reject access depending on the user having a certain role")
                .requires_any([ACCESS_CONTROL]),
        )
        .module(
            ModuleManifest::builder(RULE_USER_CAPABILITIES, "Access Control Rule: User Capabilities")
                .description("Allow or reject access depending on the user having a certain capability")
                .requires_any([ACCESS_CONTROL]),
        )
}
