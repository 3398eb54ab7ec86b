//! DBeaver Community Edition.

use super::{CURL, DEBIAN_LIKE, RPM, WINDOWS, with_download};
use crate::backend::Manager;
use crate::backend::apt::Apt;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Prerequisite, Strategy};
use crate::types::PlatformKind;

const KEY_URL: &str = "https://dbeaver.io/debs/dbeaver.gpg.key";
const REPO_URL: &str = "https://dbeaver.io/debs/dbeaver-ce";
const RPM_URL: &str = "https://dbeaver.io/files/dbeaver-ce-latest-stable.x86_64.rpm";
const KEY_FILE: &str = "dbeaver.gpg.key";
const KEYRING: &str = "/usr/share/keyrings/dbeaver.gpg";
const SOURCES: &str = "/etc/apt/sources.list.d/dbeaver.list";

const GPG: Prerequisite = Prerequisite::Command {
    name: "gpg",
    hint: "Install gnupg with `sudo apt-get install -y gnupg`",
};

/// Register the vendor APT repository, then install `dbeaver-ce` from it.
fn apt_repository() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[Prerequisite::Manager(Manager::Apt), CURL, GPG], |ctx| {
            let shell = ctx.shell();
            with_download(ctx, KEY_URL, KEY_FILE, |key| {
                ctx.run_elevated(&format!("gpg --dearmor --yes -o {KEYRING} \"{key}\""))?;
                Ok(())
            })?;
            ctx.run(&format!(
                "echo \"deb [signed-by={KEYRING}] {REPO_URL} /\" | {} > /dev/null",
                shell.elevated(&format!("tee {SOURCES}"))
            ))?;
            Apt::new(shell).update()?;
            ctx.manager(Manager::Apt).install("dbeaver-ce")?.into_result()?;
            Ok(())
        })
    })
}

/// Installer for DBeaver.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("dbeaver", "DBeaver")
        .requires_desktop()
        .on(
            &[PlatformKind::Macos],
            Strategy::package(Manager::BrewCask, "dbeaver-community"),
        )
        .on(DEBIAN_LIKE, apt_repository())
        .on(RPM, Strategy::package(Manager::Rpm, RPM_URL))
        .on(WINDOWS, Strategy::package(Manager::Choco, "dbeaver"))
        .detect_on(&[PlatformKind::Macos], Probe::AppBundle("DBeaver"))
        .detect_on(
            &[PlatformKind::Macos],
            Probe::Package(Manager::BrewCask, "dbeaver-community"),
        )
        .detect_on(DEBIAN_LIKE, Probe::Package(Manager::Apt, "dbeaver-ce"))
        .detect_on(RPM, Probe::Package(Manager::Rpm, "dbeaver-ce"))
        .detect_on(WINDOWS, Probe::Package(Manager::Choco, "dbeaver"))
        .version_command_on(
            &[PlatformKind::Macos],
            "defaults read /Applications/DBeaver.app/Contents/Info CFBundleShortVersionString",
        )
        .version_command_on(DEBIAN_LIKE, "dpkg-query -W -f='${Version}' dbeaver-ce")
        .version_command_on(RPM, "rpm -q --qf '%{VERSION}' dbeaver-ce")
        .version_command_on(WINDOWS, "choco list --exact dbeaver --limit-output")
}
