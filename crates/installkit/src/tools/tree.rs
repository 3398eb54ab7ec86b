//! tree: directory listing.

use super::{APT, RPM, WINDOWS};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};
use crate::types::PlatformKind;

/// Installer for `tree`.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("tree", "tree")
        .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "tree"))
        .on(APT, Strategy::package(Manager::Apt, "tree"))
        .on(RPM, Strategy::package(Manager::Rpm, "tree"))
        .unavailable_on(WINDOWS, "Windows already ships tree.com (`tree /f`)")
        .detect(Probe::Command("tree"))
        .version_command("tree --version")
}
