//! Shutdown coordination.
//!
//! The relay has exactly two long-running parties: the signal listener that
//! decides when to stop, and the HTTP server that must drain in-flight calls
//! before exiting. A broadcast channel decouples them so neither holds a
//! direct handle on the other.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    ///
    /// Subscriptions taken before `trigger` receive the signal; the server
    /// subscribes at startup, before the signal listener is spawned.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    ///
    /// Safe to call with no subscribers (e.g. the server already exited on
    /// its own); the send result is deliberately ignored.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
