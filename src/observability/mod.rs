//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (x-request-id assigned by tower-http)
//!     → logging.rs (tracing events, request_id on every check span)
//!     → metrics.rs (probe counters and latency histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows from the HTTP layer into the join coordinator
//! - Metrics are cheap (atomic increments behind the facade)

pub mod logging;
pub mod metrics;
