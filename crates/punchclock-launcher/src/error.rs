//! Error types for the punchclock-launcher crate.

use std::path::PathBuf;

use thiserror::Error;

/// Why an actuator could not be started.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Nothing executable exists at the given path.
    #[error("executable not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The OS refused to create the process.
    #[error("spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}
