//! Metrics collection and exposition.
//!
//! # Metrics
//! - `origin_probes_total` (counter): probes by origin, status
//! - `origin_probe_duration_seconds` (histogram): probe time to end of body
//! - `origin_checks_total` (counter): inbound checks by name, outcome. Only
//!   registered check names become label values; everything else is `-`
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::checks::CheckDefinition;

/// Label used when the request did not name a registered check.
pub const UNREGISTERED_CHECK: &str = "-";

/// How an inbound check request ended.
#[derive(Debug, Clone, Copy)]
pub enum CheckOutcome<'a> {
    Completed(&'a CheckDefinition),
    NotFound,
    Malformed,
}

impl CheckOutcome<'_> {
    /// `(check, outcome)` label values.
    pub fn labels(&self) -> (&str, &'static str) {
        match self {
            CheckOutcome::Completed(check) => (check.name(), "ok"),
            CheckOutcome::NotFound => (UNREGISTERED_CHECK, "not_found"),
            CheckOutcome::Malformed => (UNREGISTERED_CHECK, "malformed"),
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(origin: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        "origin_probes_total",
        "origin" => origin.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("origin_probe_duration_seconds", "origin" => origin.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_check(outcome: CheckOutcome<'_>) {
    let (check, outcome) = outcome.labels();
    metrics::counter!(
        "origin_checks_total",
        "check" => check.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
