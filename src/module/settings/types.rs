//! Setting schema types
//!
//! A module declares an ordered list of [`SettingDefinition`]s. Persisted values
//! arrive already deserialized as [`SettingValue`]s and are checked against the
//! definition; nothing here coerces a value into another type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Setting value types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type comes from the SettingDefinition
pub enum SettingValue {
    Bool(bool), // Must be before Int to avoid bool -> int coercion
    Int(i64),
    String(String),
}

impl SettingValue {
    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Int(i)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::String(s)
    }
}

/// Declared primitive type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Bool,
    Int,
    /// String restricted to the definition's `options`
    Enum,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Bool => "bool",
            SettingType::Int => "int",
            SettingType::Enum => "enum",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value does not fit a setting definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingViolation {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: SettingType,
        found: &'static str,
    },

    #[error("'{value}' is not one of {allowed:?}")]
    NotAllowed { value: String, allowed: Vec<String> },

    #[error("cannot parse '{input}' as {expected}")]
    Unparseable { input: String, expected: SettingType },
}

/// Setting definition - one entry of a module's settings schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDefinition {
    /// Key, unique within the owning module
    pub key: String,

    /// Declared type
    #[serde(rename = "type")]
    pub kind: SettingType,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Declared default; `None` defers to the process-wide fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SettingValue>,

    /// Legal values of an enum setting
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl SettingDefinition {
    fn new(key: impl Into<String>, kind: SettingType) -> Self {
        Self {
            key: key.into(),
            kind,
            description: String::new(),
            default: None,
            options: Vec::new(),
        }
    }

    pub fn string(key: impl Into<String>) -> Self {
        Self::new(key, SettingType::String)
    }

    pub fn bool(key: impl Into<String>) -> Self {
        Self::new(key, SettingType::Bool)
    }

    pub fn int(key: impl Into<String>) -> Self {
        Self::new(key, SettingType::Int)
    }

    pub fn enumeration<I, S>(key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut def = Self::new(key, SettingType::Enum);
        def.options = options.into_iter().map(Into::into).collect();
        def
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Check a value against the declared type and enum constraints
    pub fn check(&self, value: &SettingValue) -> Result<(), SettingViolation> {
        let type_ok = matches!(
            (self.kind, value),
            (SettingType::String, SettingValue::String(_))
                | (SettingType::Enum, SettingValue::String(_))
                | (SettingType::Bool, SettingValue::Bool(_))
                | (SettingType::Int, SettingValue::Int(_))
        );
        if !type_ok {
            return Err(SettingViolation::TypeMismatch {
                expected: self.kind,
                found: value.type_name(),
            });
        }

        if let (SettingType::Enum, SettingValue::String(s)) = (self.kind, value) {
            if !self.options.iter().any(|o| o == s) {
                return Err(SettingViolation::NotAllowed {
                    value: s.clone(),
                    allowed: self.options.clone(),
                });
            }
        }

        Ok(())
    }

    /// Parse administrator input into a typed value and check it
    pub fn parse_input(&self, input: &str) -> Result<SettingValue, SettingViolation> {
        let unparseable = || SettingViolation::Unparseable {
            input: input.to_string(),
            expected: self.kind,
        };
        let value = match self.kind {
            SettingType::String | SettingType::Enum => SettingValue::String(input.to_string()),
            SettingType::Bool => match input.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => SettingValue::Bool(true),
                "false" | "0" | "no" | "off" => SettingValue::Bool(false),
                _ => return Err(unparseable()),
            },
            SettingType::Int => SettingValue::Int(input.trim().parse().map_err(|_| unparseable())?),
        };
        self.check(&value)?;
        Ok(value)
    }
}
