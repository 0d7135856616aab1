//! Normalized probe outcomes and their wire shape.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Status code reported when the transport failed (DNS, connect, TLS, timeout).
pub const TRANSPORT_FAILURE_STATUS: u16 = 400;

/// Status code reported for a check name that is not registered.
pub const UNKNOWN_CHECK_STATUS: u16 = 404;

/// Status code reported for a request path that cannot be parsed.
pub const MALFORMED_REQUEST_STATUS: u16 = 400;

/// Marker used when a target cannot be represented.
pub const INVALID_URL: &str = "INVALID URL";

/// One outcome of a single outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "url")]
    pub target_url: String,

    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Milliseconds from probe start to end of body (or failure).
    #[serde(rename = "duration")]
    pub duration_millis: u64,

    /// Completion time, seconds since the Unix epoch.
    #[serde(rename = "date")]
    pub observed_at: u64,
}

impl ProbeResult {
    /// A completed HTTP exchange, whatever its status.
    pub fn completed(target: &str, status_code: u16, elapsed: Duration) -> Self {
        Self::observed(target, status_code, elapsed)
    }

    /// A probe that never received a status line.
    pub fn transport_failure(target: &str, elapsed: Duration) -> Self {
        Self::observed(target, TRANSPORT_FAILURE_STATUS, elapsed)
    }

    /// A synthetic result for a request that issued no probe.
    pub fn synthetic(target: &str, status_code: u16) -> Self {
        Self::observed(target, status_code, Duration::ZERO)
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == TRANSPORT_FAILURE_STATUS
    }

    fn observed(target: &str, status_code: u16, elapsed: Duration) -> Self {
        Self {
            target_url: display_target(target),
            status_code,
            duration_millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            observed_at: epoch_seconds(),
        }
    }
}

/// The body returned for one inbound request.
///
/// A single-origin check serializes as a bare object, a combined check as an
/// array in declared origin order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CombinedResponse {
    Single(ProbeResult),
    Many(Vec<ProbeResult>),
}

impl CombinedResponse {
    pub fn results(&self) -> &[ProbeResult] {
        match self {
            CombinedResponse::Single(result) => std::slice::from_ref(result),
            CombinedResponse::Many(results) => results,
        }
    }
}

impl From<ProbeResult> for CombinedResponse {
    fn from(result: ProbeResult) -> Self {
        CombinedResponse::Single(result)
    }
}

/// Text placed in the `url` field for a target.
///
/// Empty targets and targets carrying control characters cannot be echoed
/// back safely and are replaced with [`INVALID_URL`].
pub fn display_target(target: &str) -> String {
    let trimmed = target.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        INVALID_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Seconds since the Unix epoch.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
