//! Detection probes.
//!
//! A [`Probe`] is one side-effect-free signal that a tool is present.
//! Specs register probes per platform in priority order; [`any_positive`]
//! evaluates them in that order and stops at the first hit.

use crate::backend::{Manager, Shell};
use crate::types::Platform;
use std::fmt;
use std::path::PathBuf;

/// One read-only detection signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Executable on PATH.
    Command(&'static str),
    /// Read-only command that exits 0 when the tool is present
    /// (e.g. `xcode-select -p`).
    CommandSucceeds(&'static str),
    /// Filesystem path; `~` and `$VAR` are expanded.
    Path(&'static str),
    /// macOS application bundle name, without `.app`, looked up in
    /// `/Applications` and `~/Applications`.
    AppBundle(&'static str),
    /// Package registered with a package manager.
    Package(Manager, &'static str),
}

impl Probe {
    /// Evaluate this probe. Never mutates the host.
    #[must_use]
    pub fn check(&self, shell: &Shell<'_>, platform: &Platform) -> bool {
        match self {
            Self::Command(name) => shell.host.command_exists(name),
            Self::CommandSucceeds(command) => {
                shell.query(command).is_some_and(|o| o.success())
            }
            Self::Path(path) => expand(shell, path).is_some_and(|p| shell.host.path_exists(&p)),
            Self::AppBundle(name) => {
                let bundle = format!("{name}.app");
                let system = PathBuf::from("/Applications").join(&bundle);
                let user = shell
                    .host
                    .home_dir()
                    .map(|h| h.join("Applications").join(&bundle));
                shell.host.path_exists(&system) || user.is_some_and(|p| shell.host.path_exists(&p))
            }
            Self::Package(manager, package) => {
                let adapter = manager.adapter(*shell, platform);
                adapter.is_available() && adapter.is_installed(package).unwrap_or(false)
            }
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(name) => write!(f, "`{name}` on PATH"),
            Self::CommandSucceeds(command) => write!(f, "`{command}` succeeds"),
            Self::Path(path) => write!(f, "{path} exists"),
            Self::AppBundle(name) => write!(f, "{name}.app present"),
            Self::Package(manager, package) => write!(f, "{manager} package {package}"),
        }
    }
}

/// Evaluate probes in order, stopping at the first positive signal.
#[must_use]
pub fn any_positive(probes: &[Probe], shell: &Shell<'_>, platform: &Platform) -> bool {
    probes.iter().any(|probe| {
        let hit = probe.check(shell, platform);
        log::trace!("probe {}: {}", probe, hit);
        hit
    })
}

/// Expand `~` and `$VAR` against the host (not the process environment)
/// so mocks control the result.
fn expand(shell: &Shell<'_>, path: &str) -> Option<PathBuf> {
    let home = || shell.host.home_dir().map(|h| h.to_string_lossy().into_owned());
    let env = |key: &str| -> Result<Option<String>, std::env::VarError> {
        Ok(shell.host.env_var(key))
    };
    match shellexpand::full_with_context(path, home, env) {
        Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
        Err(e) => {
            log::debug!("cannot expand {}: {}", path, e);
            None
        }
    }
}
