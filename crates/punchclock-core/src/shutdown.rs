//! Process-wide shutdown signal.
//!
//! One `ShutdownCoordinator` is created at startup and cloned into every
//! component that sets or observes it: the control plane's `/shutdown`
//! handler, the OS signal handler, the scheduler loop, and the server's
//! graceful-shutdown future. Once set it stays set.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal. Returns `true` only for the call that actually set it.
    pub fn request(&self, source: &str) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        self.token.cancel();
        if first {
            info!(%source, "shutdown requested");
        }
        first
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal has been set (immediately if it already was).
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn request_is_idempotent() {
        let shutdown = ShutdownCoordinator::new();
        assert!(!shutdown.is_requested());
        assert!(shutdown.request("test"));
        assert!(!shutdown.request("test"));
        assert!(shutdown.is_requested());
    }

    #[test]
    fn clones_share_the_signal() {
        let shutdown = ShutdownCoordinator::new();
        let observer = shutdown.clone();
        shutdown.request("test");
        assert!(observer.is_requested());
    }

    #[tokio::test]
    async fn wakes_waiting_tasks() {
        let shutdown = ShutdownCoordinator::new();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.cancelled().await })
        };
        shutdown.request("test");
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn concurrent_requests_set_exactly_once() {
        let shutdown = ShutdownCoordinator::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shutdown = shutdown.clone();
                tokio::spawn(async move { shutdown.request("race") })
            })
            .collect();
        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
