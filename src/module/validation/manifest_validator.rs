//! Manifest validation framework
//!
//! Validates module declarations at registration time. Problems here are catalog
//! authoring errors, so every issue of a manifest is collected and reported at once.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::module::id::ModuleCategory;
use crate::module::registry::manifest::ModuleManifest;
use crate::module::settings::types::{SettingDefinition, SettingType};
use crate::module::traits::ModuleError;

/// A single problem found in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    /// Identity or metadata problem
    Manifest(String),
    /// Requirement group problem
    Dependency(String),
    /// Settings schema problem
    Setting(String),
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Manifest is valid
    Valid,
    /// Manifest is invalid with specific issues
    Invalid(Vec<ManifestIssue>),
}

impl ValidationResult {
    /// Collapse into the most specific registration error
    ///
    /// Dependency issues win over setting issues, which win over metadata issues.
    pub fn into_result(self, manifest: &ModuleManifest) -> Result<(), ModuleError> {
        let issues = match self {
            ValidationResult::Valid => return Ok(()),
            ValidationResult::Invalid(issues) => issues,
        };

        let mut dependency = Vec::new();
        let mut setting = Vec::new();
        let mut metadata = Vec::new();
        for issue in issues {
            match issue {
                ManifestIssue::Dependency(m) => dependency.push(m),
                ManifestIssue::Setting(m) => setting.push(m),
                ManifestIssue::Manifest(m) => metadata.push(m),
            }
        }

        let module = manifest.id.to_string();
        if !dependency.is_empty() {
            Err(ModuleError::InvalidDependencyDeclaration {
                module,
                reason: dependency.join("; "),
            })
        } else if !setting.is_empty() {
            Err(ModuleError::InvalidSettingDeclaration {
                module,
                reason: setting.join("; "),
            })
        } else {
            Err(ModuleError::InvalidManifest(format!(
                "{}: {}",
                module,
                metadata.join("; ")
            )))
        }
    }
}

/// Manifest validator
pub struct ManifestValidator {
    /// Maximum display name length
    max_name_len: usize,
}

impl ManifestValidator {
    /// Create a new manifest validator
    pub fn new() -> Self {
        Self { max_name_len: 128 }
    }

    /// Validate a module manifest declared under `category`
    pub fn validate(&self, manifest: &ModuleManifest, category: ModuleCategory) -> ValidationResult {
        let mut issues = Vec::new();

        self.validate_identity(manifest, category, &mut issues);
        self.validate_dependencies(manifest, &mut issues);
        self.validate_settings(&manifest.settings, &mut issues);

        if issues.is_empty() {
            debug!("Manifest validation passed for module: {}", manifest.id);
            ValidationResult::Valid
        } else {
            warn!(
                "Manifest validation failed for module {}: {:?}",
                manifest.id, issues
            );
            ValidationResult::Invalid(issues)
        }
    }

    fn validate_identity(
        &self,
        manifest: &ModuleManifest,
        category: ModuleCategory,
        issues: &mut Vec<ManifestIssue>,
    ) {
        if !manifest.id.is_well_formed() {
            issues.push(ManifestIssue::Manifest(format!(
                "Invalid module identifier: {} (expected <plugin>/<category>/<name>)",
                manifest.id
            )));
        } else if manifest.id.category_segment() != Some(category.as_str()) {
            issues.push(ManifestIssue::Manifest(format!(
                "Identifier {} does not belong to category {}",
                manifest.id, category
            )));
        }

        if manifest.name.trim().is_empty() {
            issues.push(ManifestIssue::Manifest("Module name cannot be empty".to_string()));
        } else if manifest.name.len() > self.max_name_len {
            issues.push(ManifestIssue::Manifest(format!(
                "Module name longer than {} characters",
                self.max_name_len
            )));
        }
    }

    fn validate_dependencies(&self, manifest: &ModuleManifest, issues: &mut Vec<ManifestIssue>) {
        for (index, group) in manifest.requires.groups().iter().enumerate() {
            if group.is_empty() {
                issues.push(ManifestIssue::Dependency(format!(
                    "Requirement group #{} is empty and can never be satisfied",
                    index
                )));
                continue;
            }

            if group.contains(manifest.id.as_str()) {
                issues.push(ManifestIssue::Dependency(format!(
                    "Requirement group #{} lists the module itself",
                    index
                )));
            }

            let mut seen = HashSet::new();
            for member in group.members() {
                if !seen.insert(member.as_str()) {
                    issues.push(ManifestIssue::Dependency(format!(
                        "Requirement group #{} lists {} more than once",
                        index, member
                    )));
                }
                if !member.is_well_formed() {
                    issues.push(ManifestIssue::Dependency(format!(
                        "Requirement group #{} references malformed identifier {}",
                        index, member
                    )));
                }
            }
        }
    }

    fn validate_settings(&self, settings: &[SettingDefinition], issues: &mut Vec<ManifestIssue>) {
        let mut keys = HashSet::new();

        for setting in settings {
            if setting.key.trim().is_empty() {
                issues.push(ManifestIssue::Setting("Setting key cannot be empty".to_string()));
                continue;
            }
            if !keys.insert(setting.key.as_str()) {
                issues.push(ManifestIssue::Setting(format!(
                    "Setting '{}' declared more than once",
                    setting.key
                )));
            }

            match setting.kind {
                SettingType::Enum if setting.options.is_empty() => {
                    issues.push(ManifestIssue::Setting(format!(
                        "Enum setting '{}' declares no options",
                        setting.key
                    )));
                }
                SettingType::Enum => {}
                _ if !setting.options.is_empty() => {
                    issues.push(ManifestIssue::Setting(format!(
                        "Setting '{}' of type {} cannot declare options",
                        setting.key, setting.kind
                    )));
                }
                _ => {}
            }

            if let Some(default) = &setting.default {
                if let Err(violation) = setting.check(default) {
                    issues.push(ManifestIssue::Setting(format!(
                        "Default of setting '{}' is invalid: {}",
                        setting.key, violation
                    )));
                }
            }
        }
    }
}

impl Default for ManifestValidator {
    fn default() -> Self {
        Self::new()
    }
}
