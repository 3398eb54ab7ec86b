//! NVM: Node Version Manager (nvm-sh on Unix, nvm-windows on Windows).

use super::{CURL, LINUX, with_download};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};
use crate::types::PlatformKind;

/// Pinned release of the upstream install script.
pub const INSTALL_SCRIPT: &str = "https://raw.githubusercontent.com/nvm-sh/nvm/v0.40.1/install.sh";

fn install_script() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[CURL], |ctx| {
            with_download(ctx, INSTALL_SCRIPT, "nvm-install.sh", |script| {
                ctx.run(&format!("bash \"{script}\""))?;
                Ok(())
            })
        })
    })
}

/// Installer for NVM.
///
/// nvm-sh is a shell function, not an executable, so Unix detection looks
/// for `nvm.sh` in the locations the install script uses.
#[must_use]
pub fn spec() -> InstallerSpec {
    let script = install_script();
    InstallerSpec::new("nvm", "NVM")
        .on(&[PlatformKind::Macos], script.clone())
        .on(LINUX, script)
        .on(&[PlatformKind::Windows], Strategy::package(Manager::Choco, "nvm"))
        .unavailable_on(
            &[PlatformKind::Gitbash],
            "nvm-windows must be installed from an elevated PowerShell or cmd session",
        )
        .detect(Probe::Path("$NVM_DIR/nvm.sh"))
        .detect(Probe::Path("~/.nvm/nvm.sh"))
        .detect(Probe::Path("$XDG_CONFIG_HOME/nvm/nvm.sh"))
        .detect_on(&[PlatformKind::Windows], Probe::Command("nvm"))
        .detect_on(&[PlatformKind::Windows], Probe::Package(Manager::Choco, "nvm"))
        .version_command("bash -c '. \"${NVM_DIR:-$HOME/.nvm}/nvm.sh\" && nvm --version'")
        .version_command_on(&[PlatformKind::Windows], "nvm version")
}
