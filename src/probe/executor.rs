//! Single outbound probe.
//!
//! # Responsibilities
//! - Issue one GET to an origin and drain the body
//! - Time the call from just before send to end of body (or failure)
//! - Turn every outcome into exactly one [`ProbeResult`]
//!
//! # Design Decisions
//! - Any received status line counts as a completed probe, 3xx/4xx/5xx included
//! - Redirects are reported, never followed: one GET per probe
//! - DNS, connect, TLS, body and timeout errors all map to the sentinel status
//! - The whole exchange is bounded by a Tokio timeout
//! - Only the connection pool inside `reqwest::Client` is shared between calls

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::time;

use crate::config::ProbeConfig;
use crate::observability::metrics;
use crate::probe::result::ProbeResult;

/// Something that can probe an origin.
///
/// Implementations must resolve to exactly one result per call and must not
/// share mutable state between concurrent calls.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, origin: &str) -> impl Future<Output = ProbeResult> + Send;
}

/// Why a probe failed to complete an HTTP exchange.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connect failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("body transfer failed: {0}")]
    Body(#[source] reqwest::Error),
}

impl ProbeError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ProbeError::Connect(err)
        } else {
            ProbeError::Request(err)
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Client(_) => "client",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Connect(_) => "connect",
            ProbeError::Request(_) => "request",
            ProbeError::Body(_) => "body",
        }
    }
}

/// Probes origins over HTTP(S) with the platform's default trust roots.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(ProbeError::Client)?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, origin: &str) -> Result<u16, ProbeError> {
        let mut response = self
            .client
            .get(origin)
            .send()
            .await
            .map_err(ProbeError::from_send)?;
        let status = response.status().as_u16();

        // Duration covers the full transfer, so read to the end.
        while response.chunk().await.map_err(ProbeError::Body)?.is_some() {}

        Ok(status)
    }
}

impl Prober for HttpProber {
    async fn probe(&self, origin: &str) -> ProbeResult {
        let start = Instant::now();

        let outcome = match time::timeout(self.timeout, self.fetch(origin)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };
        let elapsed = start.elapsed();

        let result = match outcome {
            Ok(status) => {
                tracing::debug!(
                    origin = %origin,
                    status,
                    duration_ms = elapsed.as_millis() as u64,
                    "Probe completed"
                );
                ProbeResult::completed(origin, status, elapsed)
            }
            Err(e) => {
                tracing::warn!(
                    origin = %origin,
                    kind = e.kind(),
                    error = %e,
                    duration_ms = elapsed.as_millis() as u64,
                    "Probe failed"
                );
                ProbeResult::transport_failure(origin, elapsed)
            }
        };

        metrics::record_probe(&result.target_url, result.status_code, elapsed);
        result
    }
}
