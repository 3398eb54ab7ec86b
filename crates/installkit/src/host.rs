//! Host probing.
//!
//! The [`Host`] trait covers every read-only question an installer asks
//! about the machine: what platform it is, whether a desktop is reachable,
//! whether a command is on PATH or a file exists. [`SystemHost`] answers
//! them for the real machine; [`crate::MockSystem`] answers them in tests.

use crate::error::Result;
use crate::platform;
use crate::types::Platform;
use std::path::{Path, PathBuf};

/// Read-only view of the host machine.
pub trait Host: Send + Sync {
    /// Detect the platform.
    fn detect(&self) -> Result<Platform>;

    /// Whether a graphical desktop is reachable.
    fn is_desktop_available(&self) -> bool;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Read an environment variable.
    fn env_var(&self, key: &str) -> Option<String>;

    /// Whether an executable is on PATH.
    fn command_exists(&self, name: &str) -> bool;

    /// Whether a filesystem path exists.
    fn path_exists(&self, path: &Path) -> bool;

    /// Whether the process already runs with administrative privileges.
    fn is_root(&self) -> bool;
}

/// [`Host`] backed by the real machine.
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    desktop_override: Option<bool>,
}

impl SystemHost {
    /// Create a host probe for the current machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force desktop availability instead of probing the environment.
    #[must_use]
    pub fn assume_desktop(mut self, available: Option<bool>) -> Self {
        self.desktop_override = available;
        self
    }
}

impl Host for SystemHost {
    fn detect(&self) -> Result<Platform> {
        platform::detect()
    }

    fn is_desktop_available(&self) -> bool {
        if let Some(forced) = self.desktop_override {
            return forced;
        }
        match platform::detect() {
            Ok(p) => platform::desktop_available(p.kind, |k| std::env::var(k).ok()),
            Err(_) => false,
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn command_exists(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_root(&self) -> bool {
        #[cfg(unix)]
        {
            // SAFETY: geteuid has no preconditions and cannot fail
            unsafe { libc::geteuid() == 0 }
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}
