use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Tally of one dispatch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Records returned by the registry.
    pub devices: usize,
    /// Actuator processes started.
    pub launched: usize,
    /// Records rejected by validation.
    pub skipped: usize,
    /// Valid records whose launch failed.
    pub failed: usize,
}

/// Something the scheduler can fire at a checkpoint.
///
/// An `Err` means the whole cycle was aborted (registry unreachable,
/// actuator missing); per-device problems are folded into the report.
#[async_trait]
pub trait SyncCycle: Send + Sync {
    async fn run_cycle(&self) -> Result<CycleReport>;
}
