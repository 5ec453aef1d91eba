//! Module validation framework
//!
//! Registration-time checks of module declarations: identity, requirement
//! groups, and settings schemas.

pub mod manifest_validator;

pub use manifest_validator::{ManifestIssue, ManifestValidator, ValidationResult};
