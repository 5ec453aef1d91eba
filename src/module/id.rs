//! Module identifiers and categories
//!
//! Identifiers are namespaced as `<plugin>/<category>/<name>`. The helpers here
//! derive the short slug, the HTML-safe id and the flat option names used when
//! settings are stored.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Plugin segment used by every built-in module
pub const PLUGIN_NAMESPACE: &str = "graphql-api";

/// Separator between identifier segments
pub const SEGMENT_SEPARATOR: char = '/';

const MAX_SEGMENT_LEN: usize = 64;

/// Functional area a module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleCategory {
    AccessControl,
    CacheControl,
    Endpoint,
    SchemaConfiguration,
    Client,
    Operational,
}

impl ModuleCategory {
    /// All categories, in listing order
    pub const ALL: [ModuleCategory; 6] = [
        ModuleCategory::Endpoint,
        ModuleCategory::SchemaConfiguration,
        ModuleCategory::AccessControl,
        ModuleCategory::CacheControl,
        ModuleCategory::Client,
        ModuleCategory::Operational,
    ];

    /// Kebab-case tag, also used as the identifier's category segment
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleCategory::AccessControl => "access-control",
            ModuleCategory::CacheControl => "cache-control",
            ModuleCategory::Endpoint => "endpoint",
            ModuleCategory::SchemaConfiguration => "schema-configuration",
            ModuleCategory::Client => "client",
            ModuleCategory::Operational => "operational",
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown module category: {}", s))
    }
}

/// Globally unique module identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Build an identifier for a built-in module
    pub fn builtin(category: ModuleCategory, name: &str) -> Self {
        Self(format!(
            "{}{sep}{}{sep}{}",
            PLUGIN_NAMESPACE,
            category.as_str(),
            name,
            sep = SEGMENT_SEPARATOR
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The module's name without the plugin and category prefix
    pub fn slug(&self) -> &str {
        match self.0.rfind(SEGMENT_SEPARATOR) {
            Some(pos) => &self.0[pos + SEGMENT_SEPARATOR.len_utf8()..],
            None => &self.0,
        }
    }

    /// Identifier usable as an HTML id or form field name
    pub fn html_id(&self) -> String {
        self.0.to_lowercase().replace(SEGMENT_SEPARATOR, "_")
    }

    /// Flat name under which a setting of this module is stored
    pub fn setting_option_name(&self, key: &str) -> String {
        format!("{}_{}", self.slug(), key)
    }

    pub fn plugin_segment(&self) -> Option<&str> {
        self.segments().next()
    }

    pub fn category_segment(&self) -> Option<&str> {
        self.segments().nth(1)
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }

    /// Check the `<plugin>/<category>/<name>` shape
    pub fn is_well_formed(&self) -> bool {
        let segments: Vec<&str> = self.segments().collect();
        segments.len() == 3 && segments.iter().all(|s| is_valid_segment(s))
    }
}

#[inline]
fn is_valid_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.len() > MAX_SEGMENT_LEN {
        return false;
    }

    if !segment.chars().next().map_or(false, |c| c.is_ascii_alphanumeric()) {
        return false;
    }

    segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&ModuleId> for ModuleId {
    fn from(id: &ModuleId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifier_shape() {
        let id = ModuleId::builtin(ModuleCategory::Operational, "multiple-query-execution");
        assert_eq!(id.as_str(), "graphql-api/operational/multiple-query-execution");
        assert_eq!(id.plugin_segment(), Some("graphql-api"));
        assert_eq!(id.category_segment(), Some("operational"));
        assert!(id.is_well_formed());
    }

    #[test]
    fn test_slug_and_option_name() {
        let id = ModuleId::builtin(ModuleCategory::Endpoint, "single-endpoint");
        assert_eq!(id.slug(), "single-endpoint");
        assert_eq!(id.setting_option_name("path"), "single-endpoint_path");

        // No separator: the whole identifier is the slug
        let bare = ModuleId::from("standalone");
        assert_eq!(bare.slug(), "standalone");
    }

    #[test]
    fn test_html_id() {
        let id = ModuleId::from("GraphQL-API/Client/GraphiQL");
        assert_eq!(id.html_id(), "graphql-api_client_graphiql");
    }

    #[test]
    fn test_malformed_identifiers() {
        assert!(!ModuleId::from("graphql-api/operational").is_well_formed());
        assert!(!ModuleId::from("graphql-api//mutations").is_well_formed());
        assert!(!ModuleId::from("graphql-api/operational/-mutations").is_well_formed());
        assert!(!ModuleId::from("graphql-api/operational/mut ations").is_well_formed());
        assert!(!ModuleId::from("a/b/c/d").is_well_formed());
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in ModuleCategory::ALL {
            assert_eq!(category.as_str().parse::<ModuleCategory>(), Ok(category));
        }
        assert!("graphql".parse::<ModuleCategory>().is_err());
    }

    #[test]
    fn test_identifier_serializes_as_plain_string() {
        let id = ModuleId::builtin(ModuleCategory::CacheControl, "cache-control");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"graphql-api/cache-control/cache-control\"");
    }
}
