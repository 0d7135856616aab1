//! Named checks.
//!
//! A check maps a name taken from the request path to the ordered set of
//! origins it probes. One origin yields a single result; several yield a
//! combined, ordered result list.

pub mod registry;

pub use registry::{CheckDefinition, CheckNotFound, CheckRegistry};
