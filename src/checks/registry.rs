//! Static check-name → origin-set lookup.
//!
//! # Design Decisions
//! - Built once from validated config, never mutated afterwards
//! - Lookup is exact-match on the check name
//! - Origin order is preserved; combined responses follow it

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ChecksConfig;

/// An immutable registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDefinition {
    name: String,
    origins: Arc<[String]>,
}

impl CheckDefinition {
    pub fn new<I, S>(name: impl Into<String>, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Origins in declared order.
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// True when the check fans out to more than one origin.
    pub fn is_combined(&self) -> bool {
        self.origins.len() > 1
    }
}

/// Returned when a check name is not registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown check '{0}'")]
pub struct CheckNotFound(pub String);

/// Maps check names to their definitions.
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    checks: HashMap<String, CheckDefinition>,
}

impl CheckRegistry {
    /// Build from configuration. Later duplicates replace earlier ones;
    /// validation rejects duplicates before this point.
    pub fn from_config(config: &ChecksConfig) -> Self {
        let checks = config
            .0
            .iter()
            .map(|check| {
                (
                    check.name.clone(),
                    CheckDefinition::new(check.name.clone(), check.origins.iter().cloned()),
                )
            })
            .collect();
        Self { checks }
    }

    pub fn lookup(&self, name: &str) -> Result<&CheckDefinition, CheckNotFound> {
        self.checks
            .get(name)
            .ok_or_else(|| CheckNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Registered check names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
