use chrono::NaiveDateTime;
use std::fmt;

/// The two daily sync slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointSlot {
    Noon,
    Midnight,
}

impl fmt::Display for CheckpointSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointSlot::Noon => write!(f, "noon"),
            CheckpointSlot::Midnight => write!(f, "midnight"),
        }
    }
}

/// A concrete upcoming checkpoint instant (local wall time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub slot: CheckpointSlot,
    pub at: NaiveDateTime,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.slot, self.at.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Scheduler loop lifecycle.
///
/// `Idle -> Waiting -> Triggering -> Waiting -> ... -> ShuttingDown`.
/// `ShuttingDown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Waiting,
    Triggering,
    ShuttingDown,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::Idle => "idle",
            LoopState::Waiting => "waiting",
            LoopState::Triggering => "triggering",
            LoopState::ShuttingDown => "shutting_down",
        };
        write!(f, "{s}")
    }
}
