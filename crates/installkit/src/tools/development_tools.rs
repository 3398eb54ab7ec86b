//! Compiler toolchain: Xcode Command Line Tools, `build-essential`, or the
//! "Development Tools" group.

use super::{APT, RPM};
use crate::backend::Manager;
use crate::backend::dnf::Dnf;
use crate::context::InstallContext;
use crate::error::{Error, Result};
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Prerequisite, Strategy};
use crate::types::PlatformKind;

/// While this file exists, `softwareupdate -l` lists the Command Line Tools.
pub const CLT_PLACEHOLDER: &str = "/tmp/.com.apple.dt.CommandLineTools.installondemand.in-progress";

const RPM_GROUP: &str = "Development Tools";

fn xcode_clt() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[], |ctx| {
            ctx.run(&format!("touch {CLT_PLACEHOLDER}"))?;
            let result = install_clt(ctx);
            if let Err(e) = ctx.run(&format!("rm -f {CLT_PLACEHOLDER}")) {
                log::warn!("Could not remove {}: {}", CLT_PLACEHOLDER, e);
            }
            result
        })
    })
}

fn install_clt(ctx: &InstallContext<'_>) -> Result<()> {
    let listing = ctx.run("softwareupdate -l")?;
    let label = clt_label(&listing.stdout).ok_or_else(|| {
        Error::Other(
            "softwareupdate did not offer the Command Line Tools; run `xcode-select --install`"
                .to_string(),
        )
    })?;
    log::info!("Installing {}", label);
    ctx.run_elevated(&format!("softwareupdate -i \"{label}\" --verbose"))?;
    Ok(())
}

/// The last (newest) Command Line Tools label in `softwareupdate -l` output.
///
/// Newer macOS prints `* Label: Command Line Tools for Xcode-16.0`; older
/// releases print `* Command Line Tools (macOS ...) for Xcode-10.3`.
fn clt_label(listing: &str) -> Option<String> {
    listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix('*'))
        .map(|rest| {
            let rest = rest.trim();
            rest.strip_prefix("Label:").unwrap_or(rest).trim()
        })
        .filter(|label| label.contains("Command Line Tools"))
        .last()
        .map(ToString::to_string)
}

fn rpm_group() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[Prerequisite::Manager(Manager::Rpm)], |ctx| {
            Dnf::new(ctx.shell(), ctx.platform().rpm_binary())
                .group_install(RPM_GROUP)?
                .into_result()?;
            Ok(())
        })
    })
}

/// Installer for the platform's C/C++ toolchain.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("development-tools", "Development Tools")
        .on(&[PlatformKind::Macos], xcode_clt())
        .on(APT, Strategy::package(Manager::Apt, "build-essential"))
        .on(RPM, rpm_group())
        .detect_on(&[PlatformKind::Macos], Probe::CommandSucceeds("xcode-select -p"))
        .detect_on(APT, Probe::Package(Manager::Apt, "build-essential"))
        .detect_on(RPM, Probe::CommandSucceeds("rpm -q gcc make"))
        .version_command("gcc --version")
        .version_command_on(
            &[PlatformKind::Macos],
            "pkgutil --pkg-info=com.apple.pkg.CLTools_Executables",
        )
}
