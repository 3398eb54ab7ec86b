//! Yarn (classic) package manager for Node.js.

use super::LINUX;
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Prerequisite, Strategy};
use crate::types::PlatformKind;

const NPM: Prerequisite = Prerequisite::Command {
    name: "npm",
    hint: "Install Node.js first (e.g. `dev install nvm`, then `nvm install --lts`)",
};

/// `npm install -g yarn`, without `sudo` so nvm-managed prefixes work.
fn npm_global() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[NPM], |ctx| {
            ctx.run("npm install -g yarn")?;
            Ok(())
        })
    })
}

/// Installer for Yarn.
#[must_use]
pub fn spec() -> InstallerSpec {
    let npm = npm_global();
    InstallerSpec::new("yarn", "Yarn")
        .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "yarn"))
        .on(LINUX, npm.clone())
        .on(&[PlatformKind::Gitbash], npm)
        .on(&[PlatformKind::Windows], Strategy::package(Manager::Choco, "yarn"))
        .detect(Probe::Command("yarn"))
        .version_command("yarn --version")
}
