//! tmux: terminal multiplexer.

use super::{APT, RPM, WINDOWS};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};
use crate::types::PlatformKind;

/// Installer for `tmux`.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("tmux", "tmux")
        .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "tmux"))
        .on(APT, Strategy::package(Manager::Apt, "tmux"))
        .on(RPM, Strategy::package(Manager::Rpm, "tmux"))
        .unavailable_on(WINDOWS, "tmux has no native Windows build; install it inside WSL")
        .detect(Probe::Command("tmux"))
        .version_command("tmux -V")
}
