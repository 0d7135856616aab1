//! Fan-out / fan-in of probes for one inbound request.
//!
//! # State Machine (per request)
//! ```text
//! PENDING(n) → PENDING(n-1) → ... → PENDING(0) → COMPLETE
//! ```
//! Outcomes arrive in completion order and are written into the slot of the
//! origin they belong to, so the emitted list follows declared origin order.
//!
//! # Design Decisions
//! - All join state lives in `execute`'s stack frame; nothing is shared
//!   between concurrent inbound requests
//! - Every origin gets its own Tokio task, single-origin checks included; a
//!   failed or panicked probe still fills its slot with the sentinel result
//! - Dropping the future (request timeout, client gone) aborts the probes

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::Instrument;

use crate::checks::CheckDefinition;
use crate::probe::executor::Prober;
use crate::probe::result::{CombinedResponse, ProbeResult};

/// Runs the probes of a check and joins their outcomes.
pub struct JoinCoordinator<P> {
    prober: Arc<P>,
}

impl<P> Clone for JoinCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            prober: Arc::clone(&self.prober),
        }
    }
}

impl<P: Prober> JoinCoordinator<P> {
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
        }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Probe every origin of `check` and return once all have resolved.
    pub async fn execute(&self, request_id: &str, check: &CheckDefinition) -> CombinedResponse {
        let span = tracing::debug_span!("check", request_id = %request_id, check = check.name());

        let results = self.fan_out(check.origins()).instrument(span).await;
        match <[ProbeResult; 1]>::try_from(results) {
            Ok([only]) => CombinedResponse::Single(only),
            Err(results) => CombinedResponse::Many(results),
        }
    }

    async fn fan_out(&self, origins: &[String]) -> Vec<ProbeResult> {
        let start = Instant::now();
        let mut pending = PendingJoin::new(origins.len());
        let mut tasks = JoinSet::new();
        let mut slot_of = HashMap::with_capacity(origins.len());

        for (index, origin) in origins.iter().enumerate() {
            let prober = Arc::clone(&self.prober);
            let origin = origin.clone();
            let handle = tasks.spawn(
                async move { (index, prober.probe(&origin).await) }.in_current_span(),
            );
            slot_of.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    let Some(&index) = slot_of.get(&e.id()) else {
                        continue;
                    };
                    tracing::error!(origin = %origins[index], error = %e, "Probe task failed");
                    (index, ProbeResult::transport_failure(&origins[index], start.elapsed()))
                }
            };

            if !pending.record(index, result) {
                tracing::warn!(index, "Duplicate probe outcome ignored");
            }
            tracing::trace!(remaining = pending.remaining(), "Probe outcome recorded");
        }

        if !pending.is_complete() {
            tracing::warn!(remaining = pending.remaining(), "Join closed with unfilled slots");
        }
        pending.finish(origins, start.elapsed())
    }
}

/// Per-request accumulator: one slot per origin plus a countdown.
#[derive(Debug)]
struct PendingJoin {
    slots: Vec<Option<ProbeResult>>,
    remaining: usize,
}

impl PendingJoin {
    fn new(expected: usize) -> Self {
        Self {
            slots: vec![None; expected],
            remaining: expected,
        }
    }

    /// Place an outcome. Returns false if the slot is unknown or already filled.
    fn record(&mut self, index: usize, result: ProbeResult) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(result);
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn remaining(&self) -> usize {
        self.remaining
    }

    fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Emit results in origin order. Unfilled slots become transport failures.
    fn finish(self, origins: &[String], elapsed: Duration) -> Vec<ProbeResult> {
        self.slots
            .into_iter()
            .zip(origins)
            .map(|(slot, origin)| {
                slot.unwrap_or_else(|| ProbeResult::transport_failure(origin, elapsed))
            })
            .collect()
    }
}
