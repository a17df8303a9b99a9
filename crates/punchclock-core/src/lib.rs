//! `punchclock-core` — shared types for the attendance sync service.
//!
//! Everything the scheduler, dispatcher, and control plane need to agree on
//! lives here: configuration, the error taxonomy, the device record shape,
//! the shutdown signal, and the process-wide service state.

pub mod config;
pub mod cycle;
pub mod error;
pub mod shutdown;
pub mod state;
pub mod types;

pub use cycle::{CycleReport, SyncCycle};
pub use error::{ErrorKind, PunchclockError, Result};
pub use shutdown::ShutdownCoordinator;
pub use state::{ServiceState, ServiceStatus, StatusSnapshot};
pub use types::{Device, DeviceInfo, InvocationMode, SyncJob};
