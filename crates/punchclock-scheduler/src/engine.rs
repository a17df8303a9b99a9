use std::sync::Arc;

use punchclock_core::{ShutdownCoordinator, SyncCycle};
use tokio::sync::watch;
use tracing::{error, info};

use crate::{
    clock::Clock,
    schedule::{next_checkpoint, wait_duration},
    types::{Checkpoint, LoopState},
};

/// Background loop driving scheduled sync cycles.
///
/// Strictly sequential: a cycle finishes its device iteration before the
/// next wait is computed. Only one instance should run per service.
pub struct SchedulerLoop {
    cycle: Arc<dyn SyncCycle>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownCoordinator,
    state_tx: watch::Sender<LoopState>,
}

impl SchedulerLoop {
    pub fn new(
        cycle: Arc<dyn SyncCycle>,
        clock: Arc<dyn Clock>,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let (state_tx, _) = watch::channel(LoopState::Idle);
        Self {
            cycle,
            clock,
            shutdown,
            state_tx,
        }
    }

    /// Observe state transitions. Take this before calling [`run`](Self::run).
    pub fn subscribe(&self) -> watch::Receiver<LoopState> {
        self.state_tx.subscribe()
    }

    /// Checkpoint the loop will wait for next, as of `clock.now()`.
    pub fn upcoming(&self) -> Checkpoint {
        next_checkpoint(self.clock.now())
    }

    /// Main loop. Returns once the shutdown signal is observed.
    pub async fn run(self) {
        info!("scheduler loop started (checkpoints 12:00:00 and 00:00:00)");

        // Instant of the last checkpoint fired. A collapsed 5 s wait can wake
        // before the checkpoint itself; computing from here keeps the same
        // checkpoint from firing twice.
        let mut fired_until = None;

        while !self.shutdown.is_requested() {
            let now = self.clock.now();
            let from = fired_until.map_or(now, |fired| now.max(fired));
            let checkpoint = next_checkpoint(from);
            let wait = wait_duration(now, checkpoint.at);

            self.set_state(LoopState::Waiting);
            info!(%checkpoint, wait_secs = wait.as_secs(), "next sync scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = self.shutdown.cancelled() => {}
            }
            if self.shutdown.is_requested() {
                break;
            }

            self.set_state(LoopState::Triggering);
            fired_until = Some(checkpoint.at);
            info!(%checkpoint, "starting scheduled sync cycle");

            // Cycle failures are logged here, once, and never end the loop.
            match self.cycle.run_cycle().await {
                Ok(report) => info!(
                    launched = report.launched,
                    skipped = report.skipped,
                    failed = report.failed,
                    "scheduled sync cycle done"
                ),
                Err(e) => error!(code = e.code(), error = %e, "scheduled sync cycle aborted"),
            }
        }

        self.set_state(LoopState::ShuttingDown);
        info!("scheduler loop stopped");
    }

    fn set_state(&self, state: LoopState) {
        self.state_tx.send_replace(state);
    }
}
