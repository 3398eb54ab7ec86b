//! winpty: console shim that lets Git Bash drive native Windows console programs.

use super::WINDOWS;
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};

/// Installer for `winpty`. Only meaningful on Windows.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("winpty", "winpty")
        .on(WINDOWS, Strategy::package(Manager::Choco, "winpty"))
        .detect(Probe::Command("winpty"))
        .detect(Probe::Package(Manager::Choco, "winpty"))
        .version_command("winpty --version")
}
