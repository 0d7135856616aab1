//! Shutdown coordination for the service.
//!
//! A `Shutdown` handle turns either an explicit `trigger` or an OS signal
//! into a single future the server can hand to graceful shutdown.

use std::future::Future;

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Stops a running server from inside the process or from the OS.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future that resolves on `trigger` or on SIGINT/SIGTERM.
    ///
    /// The subscription is taken here, so a trigger sent after this call and
    /// before the first poll is not lost.
    pub fn requested(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            tokio::select! {
                _ = rx.recv() => tracing::info!("Shutdown requested"),
                _ = signals::wait_for_signal() => {}
            }
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
