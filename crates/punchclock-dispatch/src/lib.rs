//! `punchclock-dispatch` — turns a device list into actuator launches.
//!
//! [`SyncDispatcher::run_cycle`] fetches the registry, resolves the actuator
//! once, and launches it per device. One bad record or one failed spawn never
//! stops the rest of the batch.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{ManualLaunch, SyncDispatcher};
pub use registry::{DeviceRegistry, HttpRegistry};
