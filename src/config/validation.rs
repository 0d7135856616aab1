//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check names are unique, every check probes at least one origin
//! - Origins are absolute http(s) URLs
//! - Value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("probe.timeout_secs ({probe}) must be less than timeouts.request_secs ({request})")]
    ProbeOutlivesRequest { probe: u64, request: u64 },

    #[error("no checks configured")]
    NoChecks,

    #[error("invalid check name '{0}' (empty or contains '/')")]
    CheckName(String),

    #[error("duplicate check name '{0}'")]
    DuplicateCheck(String),

    #[error("check '{0}' has no origins")]
    NoOrigins(String),

    #[error("check '{check}' has invalid origin '{origin}'")]
    InvalidOrigin { check: String, origin: String },

    #[error("no API versions configured")]
    NoVersions,

    #[error("invalid API version '{0}'")]
    InvalidVersion(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("probe.timeout_secs"));
    }
    if config.probe.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("probe.connect_timeout_secs"));
    }

    // A probe must resolve before the inbound request is cut off.
    if config.probe.timeout_secs > 0 && config.probe.timeout_secs >= config.timeouts.request_secs {
        errors.push(ValidationError::ProbeOutlivesRequest {
            probe: config.probe.timeout_secs,
            request: config.timeouts.request_secs,
        });
    }

    if config.dispatch.versions.is_empty() {
        errors.push(ValidationError::NoVersions);
    }
    for version in &config.dispatch.versions {
        if version.split('/').any(str::is_empty) {
            errors.push(ValidationError::InvalidVersion(version.clone()));
        }
    }

    if config.checks.0.is_empty() {
        errors.push(ValidationError::NoChecks);
    }

    let mut seen = HashSet::new();
    for check in &config.checks.0 {
        if check.name.is_empty() || check.name.contains('/') {
            errors.push(ValidationError::CheckName(check.name.clone()));
        }
        if !seen.insert(check.name.as_str()) {
            errors.push(ValidationError::DuplicateCheck(check.name.clone()));
        }
        if check.origins.is_empty() {
            errors.push(ValidationError::NoOrigins(check.name.clone()));
        }
        for origin in &check.origins {
            if !is_probeable(origin) {
                errors.push(ValidationError::InvalidOrigin {
                    check: check.name.clone(),
                    origin: origin.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_probeable(origin: &str) -> bool {
    Url::parse(origin)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
