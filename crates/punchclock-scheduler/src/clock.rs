use chrono::{Local, NaiveDateTime};

/// Wall-clock source for checkpoint arithmetic.
pub trait Clock: Send + Sync {
    /// Current local wall time, without a zone.
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
