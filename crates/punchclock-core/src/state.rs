use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::shutdown::ShutdownCoordinator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Starting,
    Running,
    ShuttingDown,
}

/// Read-only view served by `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub status: ServiceStatus,
    /// Whole seconds since the service started.
    pub uptime: u64,
    /// RFC 3339, local time.
    pub start_time: String,
    pub shutdown_requested: bool,
}

/// Process-wide service state.
///
/// Only start, stop, and shutdown mutate it; everything else reads a
/// snapshot. All fields are atomics so handlers never contend on a lock.
#[derive(Debug)]
pub struct ServiceState {
    start_time: DateTime<Local>,
    started: Instant,
    running: AtomicBool,
    scheduler_claimed: AtomicBool,
    shutdown: ShutdownCoordinator,
}

impl ServiceState {
    pub fn new(shutdown: ShutdownCoordinator) -> Self {
        Self {
            start_time: Local::now(),
            started: Instant::now(),
            running: AtomicBool::new(false),
            scheduler_claimed: AtomicBool::new(false),
            shutdown,
        }
    }

    pub fn mark_running(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn mark_stopped(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Reserve the single scheduler slot for this service lifetime.
    ///
    /// Returns `false` if a scheduler loop was already started.
    pub fn claim_scheduler(&self) -> bool {
        !self.scheduler_claimed.swap(true, Ordering::SeqCst)
    }

    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let shutdown_requested = self.shutdown.is_requested();
        let status = if shutdown_requested {
            ServiceStatus::ShuttingDown
        } else if self.is_running() {
            ServiceStatus::Running
        } else {
            ServiceStatus::Starting
        };
        StatusSnapshot {
            status,
            uptime: self.started.elapsed().as_secs(),
            start_time: self.start_time.to_rfc3339(),
            shutdown_requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_follows_lifecycle() {
        let shutdown = ShutdownCoordinator::new();
        let state = ServiceState::new(shutdown.clone());
        assert_eq!(state.snapshot().status, ServiceStatus::Starting);

        state.mark_running();
        let snap = state.snapshot();
        assert_eq!(snap.status, ServiceStatus::Running);
        assert!(!snap.shutdown_requested);

        shutdown.request("test");
        let snap = state.snapshot();
        assert_eq!(snap.status, ServiceStatus::ShuttingDown);
        assert!(snap.shutdown_requested);
    }

    #[test]
    fn scheduler_can_only_be_claimed_once() {
        let state = ServiceState::new(ShutdownCoordinator::new());
        assert!(state.claim_scheduler());
        assert!(!state.claim_scheduler());
    }

    #[test]
    fn status_serializes_snake_case() {
        let state = ServiceState::new(ShutdownCoordinator::new());
        state.shutdown().request("test");
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["status"], "shutting_down");
        assert_eq!(json["shutdown_requested"], true);
    }
}
