//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the origin status service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Outbound probe settings.
    pub probe: ProbeConfig,

    /// Path dispatch settings.
    pub dispatch: DispatchConfig,

    /// Named checks and the origins each one probes.
    pub checks: ChecksConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to produce a response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Outbound probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Upper bound on a single probe, from send to end of body, in seconds.
    pub timeout_secs: u64,

    /// TCP + TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent to origins.
    pub user_agent: String,

    /// Honor HTTP(S)_PROXY environment variables for outbound probes.
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: concat!("origin-status/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
        }
    }
}

/// Path dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Version prefixes served (e.g., "v1", "v2/americas").
    pub versions: Vec<String>,

    /// Base used to build the `url` field of unknown-check responses.
    pub public_base_url: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            versions: vec!["v1".to_string()],
            public_base_url: "http://localhost".to_string(),
        }
    }
}

/// A named check.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CheckConfig {
    /// Check name as it appears in the request path (e.g., "google-status").
    pub name: String,

    /// Origins probed by this check, in response order.
    pub origins: Vec<String>,
}

impl CheckConfig {
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
}

/// The set of configured checks.
///
/// Serialized as a bare array so a config file reads `[[checks]]`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChecksConfig(pub Vec<CheckConfig>);

const AMAZON: &str = "https://www.amazon.com";
const GOOGLE: &str = "https://www.google.com";

impl Default for ChecksConfig {
    fn default() -> Self {
        Self(vec![
            CheckConfig::new("amazon-status", [AMAZON]),
            CheckConfig::new("google-status", [GOOGLE]),
            CheckConfig::new("all-status", [GOOGLE, AMAZON]),
        ])
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
