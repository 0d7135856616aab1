//! Request path → check dispatch.
//!
//! # Responsibilities
//! - Split `/<version...>/<check-name>` into its parts
//! - Reject malformed paths and unserved versions with a 400 body
//! - Answer unknown check names with a 404 body without probing
//! - Hand known checks to the join coordinator
//!
//! # Design Decisions
//! - Versions and checks form a closed set resolved at startup
//! - Every outcome is a ProbeResult-shaped body; nothing here fails the request

use std::collections::HashSet;

use axum::http::Uri;
use thiserror::Error;

use crate::checks::CheckRegistry;
use crate::config::{DispatchConfig, ServiceConfig};
use crate::observability::metrics::{self, CheckOutcome};
use crate::probe::result::{
    CombinedResponse, ProbeResult, MALFORMED_REQUEST_STATUS, UNKNOWN_CHECK_STATUS,
};
use crate::probe::{JoinCoordinator, Prober};

/// A parsed `/<version>/<check>` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPath<'a> {
    /// One or more segments, e.g. `v1` or `v2/americas/unit-5`.
    pub version: &'a str,
    pub check: &'a str,
}

/// Why a path could not be dispatched to a check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("malformed request path")]
    Malformed,

    #[error("unknown API version '{0}'")]
    UnknownVersion(String),
}

/// Split a request path into version prefix and check name.
pub fn parse_check_path(path: &str) -> Result<CheckPath<'_>, DispatchError> {
    let rest = path.strip_prefix('/').ok_or(DispatchError::Malformed)?;
    let (version, check) = rest.rsplit_once('/').ok_or(DispatchError::Malformed)?;

    if check.is_empty() || version.split('/').any(str::is_empty) {
        return Err(DispatchError::Malformed);
    }

    Ok(CheckPath { version, check })
}

/// Resolves inbound paths to checks and runs them.
pub struct Dispatcher<P> {
    registry: CheckRegistry,
    coordinator: JoinCoordinator<P>,
    versions: HashSet<String>,
    public_base_url: String,
}

impl<P: Prober> Dispatcher<P> {
    pub fn new(registry: CheckRegistry, coordinator: JoinCoordinator<P>, config: &DispatchConfig) -> Self {
        Self {
            registry,
            coordinator,
            versions: config.versions.iter().cloned().collect(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig, prober: P) -> Self {
        Self::new(
            CheckRegistry::from_config(&config.checks),
            JoinCoordinator::new(prober),
            &config.dispatch,
        )
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &JoinCoordinator<P> {
        &self.coordinator
    }

    /// Produce the response body for one inbound request.
    pub async fn dispatch(&self, request_id: &str, uri: &Uri) -> CombinedResponse {
        let path = match self.resolve(uri.path()) {
            Ok(path) => path,
            Err(e) => {
                let raw = uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or_else(|| uri.path());
                tracing::warn!(request_id = %request_id, path = %raw, error = %e, "Rejecting request");
                metrics::record_check(CheckOutcome::Malformed);
                return ProbeResult::synthetic(raw, MALFORMED_REQUEST_STATUS).into();
            }
        };

        let check = match self.registry.lookup(path.check) {
            Ok(check) => check,
            Err(e) => {
                tracing::info!(request_id = %request_id, error = %e, "Unknown check");
                metrics::record_check(CheckOutcome::NotFound);
                let url = format!("{}/{}/{}", self.public_base_url, path.version, path.check);
                return ProbeResult::synthetic(&url, UNKNOWN_CHECK_STATUS).into();
            }
        };

        tracing::debug!(
            request_id = %request_id,
            check = check.name(),
            origins = check.origins().len(),
            "Dispatching check"
        );
        let response = self.coordinator.execute(request_id, check).await;
        metrics::record_check(CheckOutcome::Completed(check));
        response
    }

    fn resolve<'a>(&self, path: &'a str) -> Result<CheckPath<'a>, DispatchError> {
        let parsed = parse_check_path(path)?;
        if !self.versions.contains(parsed.version) {
            return Err(DispatchError::UnknownVersion(parsed.version.to_string()));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::result::INVALID_URL;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProber {
        calls: AtomicUsize,
    }

    impl Prober for CountingProber {
        async fn probe(&self, origin: &str) -> ProbeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ProbeResult::completed(origin, 200, std::time::Duration::from_millis(1))
        }
    }

    fn dispatcher() -> Dispatcher<CountingProber> {
        Dispatcher::from_config(&ServiceConfig::default(), CountingProber::default())
    }

    fn calls(dispatcher: &Dispatcher<CountingProber>) -> usize {
        dispatcher.coordinator().prober().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_parse_check_path() {
        assert_eq!(
            parse_check_path("/v1/google-status"),
            Ok(CheckPath { version: "v1", check: "google-status" })
        );
        assert_eq!(
            parse_check_path("/v2/americas/business-unit-5/verizon-status"),
            Ok(CheckPath { version: "v2/americas/business-unit-5", check: "verizon-status" })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for path in ["", "/", "/v1", "/v1/", "//google-status", "/v1//google-status", "google-status"] {
            assert_eq!(parse_check_path(path), Err(DispatchError::Malformed), "path {:?}", path);
        }
    }

    #[tokio::test]
    async fn test_single_check() {
        let dispatcher = dispatcher();
        let uri = Uri::from_static("/v1/google-status");
        match dispatcher.dispatch("req", &uri).await {
            CombinedResponse::Single(result) => {
                assert_eq!(result.target_url, "https://www.google.com");
                assert_eq!(result.status_code, 200);
            }
            other => panic!("expected single result, got {:?}", other),
        }
        assert_eq!(calls(&dispatcher), 1);
    }

    #[tokio::test]
    async fn test_combined_check() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch("req", &Uri::from_static("/v1/all-status")).await;
        let urls: Vec<&str> = response.results().iter().map(|r| r.target_url.as_str()).collect();
        assert_eq!(urls, ["https://www.google.com", "https://www.amazon.com"]);
        assert_eq!(calls(&dispatcher), 2);
    }

    #[tokio::test]
    async fn test_unknown_check_never_probes() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch("req", &Uri::from_static("/v1/foo-status")).await;
        let result = &response.results()[0];
        assert_eq!(result.status_code, 404);
        assert_eq!(result.target_url, "http://localhost/v1/foo-status");
        assert_eq!(result.duration_millis, 0);
        assert_eq!(calls(&dispatcher), 0);
    }

    #[tokio::test]
    async fn test_malformed_path_is_400() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch("req", &Uri::from_static("/v1/?x=1")).await;
        let result = &response.results()[0];
        assert_eq!(result.status_code, 400);
        assert_eq!(result.target_url, "/v1/?x=1");
        assert_eq!(result.duration_millis, 0);
        assert_eq!(calls(&dispatcher), 0);
    }

    #[tokio::test]
    async fn test_unserved_version_is_400() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch("req", &Uri::from_static("/v9/google-status")).await;
        assert_eq!(response.results()[0].status_code, 400);
        assert_eq!(response.results()[0].target_url, "/v9/google-status");
        assert_eq!(calls(&dispatcher), 0);
    }

    #[tokio::test]
    async fn test_root_path_falls_back_to_path() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch("req", &Uri::from_static("/")).await;
        let result = &response.results()[0];
        assert_eq!(result.status_code, 400);
        assert_eq!(result.target_url, "/");
        assert_ne!(result.target_url, INVALID_URL);
    }

    #[tokio::test]
    async fn test_nested_version_and_base_url() {
        let mut config = ServiceConfig::default();
        config.dispatch.versions = vec!["v2/americas".into()];
        config.dispatch.public_base_url = "https://status.example/".into();
        let dispatcher = Dispatcher::from_config(&config, CountingProber::default());

        let response = dispatcher
            .dispatch("req", &Uri::from_static("/v2/americas/verizon-status"))
            .await;
        assert_eq!(
            response.results()[0].target_url,
            "https://status.example/v2/americas/verizon-status"
        );

        let response = dispatcher.dispatch("req", &Uri::from_static("/v1/google-status")).await;
        assert_eq!(response.results()[0].status_code, 400);
    }
}
