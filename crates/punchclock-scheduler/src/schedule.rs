use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use crate::types::{Checkpoint, CheckpointSlot};

/// Gaps shorter than this are treated as "the checkpoint is now".
pub const MIN_WAIT_GAP: Duration = Duration::from_secs(60);

/// Wait used instead of a gap shorter than [`MIN_WAIT_GAP`].
pub const RACE_WAIT: Duration = Duration::from_secs(5);

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Next checkpoint strictly after `now`.
///
/// Before 12:00:00 that is today's noon; from noon onwards it is 00:00:00 of
/// the following calendar day, so month and year rollovers come from the
/// calendar rather than from adding 24 hours.
pub fn next_checkpoint(now: NaiveDateTime) -> Checkpoint {
    let today = now.date();
    let noon = today.and_time(noon());
    if now < noon {
        return Checkpoint {
            slot: CheckpointSlot::Noon,
            at: noon,
        };
    }

    // NaiveDate::MAX has no successor; nothing real runs that late.
    let tomorrow = today.succ_opt().unwrap_or(today);
    Checkpoint {
        slot: CheckpointSlot::Midnight,
        at: tomorrow.and_time(NaiveTime::MIN),
    }
}

/// How long to sleep from `now` until `at`.
///
/// Anything under [`MIN_WAIT_GAP`], including a checkpoint already in the
/// past, becomes exactly [`RACE_WAIT`].
pub fn wait_duration(now: NaiveDateTime, at: NaiveDateTime) -> Duration {
    match (at - now).to_std() {
        Ok(gap) if gap >= MIN_WAIT_GAP => gap,
        _ => RACE_WAIT,
    }
}
