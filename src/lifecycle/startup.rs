//! Startup configuration resolution.
//!
//! # Responsibilities
//! - Load config from file when one is given, defaults otherwise
//! - Apply command-line overrides
//! - Re-validate after overrides
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds only after config is final

use std::net::SocketAddr;
use std::path::Path;

use crate::config::{load_config, validate_config, ConfigError, ServiceConfig};

/// Build the effective configuration from an optional file and port override.
pub fn resolve_config(path: Option<&Path>, port: Option<u16>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(port) = port {
        config.listener.bind_address = override_port(&config.listener.bind_address, port);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn override_port(bind_address: &str, port: u16) -> String {
    match bind_address.parse::<SocketAddr>() {
        Ok(mut addr) => {
            addr.set_port(port);
            addr.to_string()
        }
        Err(_) => format!("0.0.0.0:{}", port),
    }
}
