//! Locating the actuator executable.
//!
//! Search order: explicit path, configured directories, the directory of the
//! running binary, then `PATH`. The first existing file wins.

use std::path::{Path, PathBuf};

use punchclock_core::config::ActuatorConfig;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ActuatorLocator {
    explicit: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    file_name: String,
    path_lookup: bool,
}

impl ActuatorLocator {
    /// Locator that only consults `PATH` for `file_name`.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            explicit: None,
            search_dirs: Vec::new(),
            file_name: file_name.into(),
            path_lookup: true,
        }
    }

    pub fn from_config(config: &ActuatorConfig) -> Self {
        let mut locator = Self::new(config.file_name.clone());
        locator.explicit = config.path.as_ref().map(PathBuf::from);
        locator.search_dirs = config.search_dirs.iter().map(PathBuf::from).collect();
        if let Some(dir) = current_exe_dir() {
            locator.search_dirs.push(dir);
        }
        locator
    }

    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn without_path_lookup(mut self) -> Self {
        self.path_lookup = false;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// First existing candidate, or `None` when the actuator is not installed.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.explicit {
            if path.is_file() {
                return Some(path.clone());
            }
            debug!(path = %path.display(), "configured actuator path does not exist");
        }

        let found = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(&self.file_name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }

        if self.path_lookup {
            return which::which(&self.file_name).ok();
        }
        None
    }
}

fn current_exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
