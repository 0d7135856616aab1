//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! CheckDefinition (1..n origins)
//!     → coordinator.rs (one task per origin, per-request slots)
//!     → executor.rs (GET, drain body, time it)
//!     → result.rs (ProbeResult, sentinel on transport failure)
//!     → CombinedResponse (single object or ordered array)
//! ```

pub mod coordinator;
pub mod executor;
pub mod result;

pub use coordinator::JoinCoordinator;
pub use executor::{HttpProber, ProbeError, Prober};
pub use result::{CombinedResponse, ProbeResult, INVALID_URL, TRANSPORT_FAILURE_STATUS};
