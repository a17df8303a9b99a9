//! `punchclock-scheduler` — fires a sync cycle at two fixed daily checkpoints.
//!
//! # Overview
//!
//! The [`engine::SchedulerLoop`] computes the next checkpoint from the local
//! wall clock, sleeps until then (or until shutdown), runs one cycle, and
//! repeats. There is no job table and nothing is persisted: a missed
//! checkpoint is simply skipped and the next one is waited for.
//!
//! | Checkpoint | Local time |
//! |------------|------------|
//! | `Noon`     | 12:00:00   |
//! | `Midnight` | 00:00:00   |

pub mod clock;
pub mod engine;
pub mod schedule;
pub mod types;

pub use clock::{Clock, LocalClock};
pub use engine::SchedulerLoop;
pub use schedule::{next_checkpoint, wait_duration};
pub use types::{Checkpoint, CheckpointSlot, LoopState};
