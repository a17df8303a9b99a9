//! Fire-and-forget process launch.
//!
//! `DetachedLauncher` uses `tokio::process::Command` so that a dropped child
//! handle is reaped by the runtime in the background instead of lingering as
//! a zombie. The caller only learns whether the OS accepted the spawn.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::error::LaunchError;

/// Hides the console window the actuator would otherwise get on Windows.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Outcome of one launch attempt. Says nothing about how the child exits.
#[derive(Debug)]
pub enum SpawnResult {
    Launched { pid: Option<u32> },
    Failed(LaunchError),
}

impl SpawnResult {
    pub fn is_launched(&self) -> bool {
        matches!(self, SpawnResult::Launched { .. })
    }

    pub fn into_result(self) -> Result<Option<u32>, LaunchError> {
        match self {
            SpawnResult::Launched { pid } => Ok(pid),
            SpawnResult::Failed(e) => Err(e),
        }
    }
}

/// Seam between the dispatcher and the operating system.
pub trait ProcessLauncher: Send + Sync {
    /// Start `executable` with `args` and return without waiting on it.
    ///
    /// Must never panic; every failure comes back as `SpawnResult::Failed`.
    fn invoke(&self, executable: &Path, args: &[String]) -> SpawnResult;
}

/// Launches the child with all stdio detached and forgets about it.
///
/// Must be called from inside a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLauncher;

impl ProcessLauncher for DetachedLauncher {
    fn invoke(&self, executable: &Path, args: &[String]) -> SpawnResult {
        if !executable.is_file() {
            return SpawnResult::Failed(LaunchError::NotFound(executable.to_path_buf()));
        }

        let mut command = AsyncCommand::new(executable);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        match command.spawn() {
            Ok(child) => {
                let pid = child.id();
                debug!(executable = %executable.display(), ?pid, "actuator spawned");
                // Dropping the handle detaches the child; the runtime reaps it.
                drop(child);
                SpawnResult::Launched { pid }
            }
            Err(e) => SpawnResult::Failed(LaunchError::Spawn(e)),
        }
    }
}
