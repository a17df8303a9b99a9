//! punchclock-launcher — starts the external sync actuator and walks away.
//!
//! The actuator is an opaque executable. This crate knows how to find it,
//! how to lay out its command line, and how to start it detached. It never
//! reads the child's output and never waits for it to exit.
//!
//! ```rust,no_run
//! use punchclock_launcher::{DetachedLauncher, ProcessLauncher};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let result = DetachedLauncher.invoke(Path::new("/opt/sync/zkteco-sync"), &[]);
//!     println!("launched: {}", result.is_launched());
//! }
//! ```

pub mod args;
pub mod error;
pub mod launcher;
pub mod resolve;

pub use args::actuator_args;
pub use error::LaunchError;
pub use launcher::{DetachedLauncher, ProcessLauncher, SpawnResult};
pub use resolve::ActuatorLocator;
