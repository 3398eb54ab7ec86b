//! Beyond Compare (Scooter Software).

use super::{CURL, DEBIAN_LIKE, RPM, WINDOWS, with_download};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Prerequisite, Strategy};
use crate::types::PlatformKind;

/// Vendor package for Debian-family amd64.
pub const DEB_URL: &str = "https://www.scootersoftware.com/files/bcompare-5.0.4.30422_amd64.deb";
/// Vendor package for Red Hat family x86_64.
pub const RPM_URL: &str = "https://www.scootersoftware.com/files/bcompare-5.0.4.30422.x86_64.rpm";

/// Download the vendor `.deb` and let APT resolve its dependencies.
fn vendor_deb() -> Strategy {
    Strategy::new(|ctx| {
        ctx.guarded_install(&[Prerequisite::Manager(Manager::Apt), CURL], |ctx| {
            with_download(ctx, DEB_URL, "bcompare.deb", |path| {
                ctx.manager(Manager::Apt).install(path)?.into_result()?;
                Ok(())
            })
        })
    })
}

/// Installer for Beyond Compare.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("beyond-compare", "Beyond Compare")
        .requires_desktop()
        .on(
            &[PlatformKind::Macos],
            Strategy::package(Manager::BrewCask, "beyond-compare"),
        )
        .on(DEBIAN_LIKE, vendor_deb())
        .on(RPM, Strategy::package(Manager::Rpm, RPM_URL))
        .on(WINDOWS, Strategy::package(Manager::Choco, "beyondcompare"))
        .detect_on(&[PlatformKind::Macos], Probe::AppBundle("Beyond Compare"))
        .detect_on(
            &[PlatformKind::Macos],
            Probe::Package(Manager::BrewCask, "beyond-compare"),
        )
        .detect_on(DEBIAN_LIKE, Probe::Command("bcompare"))
        .detect_on(DEBIAN_LIKE, Probe::Package(Manager::Apt, "bcompare"))
        .detect_on(RPM, Probe::Command("bcompare"))
        .detect_on(RPM, Probe::Package(Manager::Rpm, "bcompare"))
        .detect_on(WINDOWS, Probe::Package(Manager::Choco, "beyondcompare"))
        .detect_on(WINDOWS, Probe::Path("$ProgramFiles/Beyond Compare 5/BCompare.exe"))
        .version_command_on(
            &[PlatformKind::Macos],
            "defaults read \"/Applications/Beyond Compare.app/Contents/Info\" CFBundleShortVersionString",
        )
        .version_command_on(DEBIAN_LIKE, "dpkg-query -W -f='${Version}' bcompare")
        .version_command_on(RPM, "rpm -q --qf '%{VERSION}' bcompare")
        .version_command_on(WINDOWS, "choco list --exact beyondcompare --limit-output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSystem;
    use crate::types::{CommandOutput, InstallResult};

    #[test]
    fn test_macos_already_installed_by_bundle() {
        let sys = MockSystem::new(PlatformKind::Macos)
            .with_command("brew")
            .with_path("/Applications/Beyond Compare.app")
            .on("CFBundleShortVersionString", CommandOutput::ok("5.0.4\n"));
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert_eq!(
            result,
            InstallResult::AlreadyInstalled {
                version: Some("5.0.4".to_string())
            }
        );
        assert_eq!(sys.count("brew"), 0);
    }

    #[test]
    fn test_deb_download_then_apt() {
        let sys = MockSystem::new(PlatformKind::Wsl)
            .with_command("apt-get")
            .with_command("curl")
            .on("curl -fsSL -o", CommandOutput::ok(""))
            .on("apt-get install -y", CommandOutput::ok(""))
            .installs_command("apt-get install -y", "bcompare")
            .on("dpkg-query -W -f='${Version}' bcompare", CommandOutput::ok("5.0.4.30422"));
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert_eq!(
            result,
            InstallResult::Installed {
                version: Some("5.0.4.30422".to_string())
            }
        );

        let calls = sys.calls();
        let download = calls.iter().find(|c| c.starts_with("curl")).unwrap();
        assert!(download.ends_with(DEB_URL));
        let install = calls.iter().find(|c| c.contains("apt-get install")).unwrap();
        assert!(install.starts_with("sudo apt-get install -y "));
        assert!(install.contains("devstrap-beyond-compare-"));
        assert!(install.ends_with("-bcompare.deb"));
    }

    #[test]
    fn test_raspbian_has_no_strategy() {
        let sys = MockSystem::new(PlatformKind::Raspbian);
        assert_eq!(
            sys.dispatcher().install(&spec(), sys.platform()),
            InstallResult::Unsupported {
                platform: PlatformKind::Raspbian
            }
        );
    }

    #[test]
    fn test_rhel_vendor_rpm() {
        let sys = MockSystem::new(PlatformKind::Rhel)
            .with_command("dnf")
            .on("dnf install -y https://www.scootersoftware.com", CommandOutput::ok(""))
            .installs_output(
                "dnf install -y",
                "rpm -q bcompare",
                CommandOutput::ok("bcompare-5.0.4.30422-1.x86_64"),
            )
            .on("rpm -q --qf", CommandOutput::ok("5.0.4.30422"));
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert_eq!(
            result,
            InstallResult::Installed {
                version: Some("5.0.4.30422".to_string())
            }
        );
        assert_eq!(sys.count(&format!("sudo dnf install -y {RPM_URL}")), 1);
    }

    #[test]
    fn test_windows_choco_checksum_retry() {
        let sys = MockSystem::new(PlatformKind::Windows)
            .with_env("ProgramFiles", "C:/Program Files")
            .with_command("choco")
            .on("--ignore-checksums", CommandOutput::ok(""))
            .installs_path("--ignore-checksums", "C:/Program Files/Beyond Compare 5/BCompare.exe")
            .on(
                "choco install beyondcompare",
                CommandOutput {
                    code: 1,
                    stdout: "Error - hashes do not match. Checksum for 'BCompare-5.0.4.30422.exe' did not meet 'ab12' for checksum type 'sha256'".to_string(),
                    stderr: String::new(),
                },
            );
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert!(matches!(result, InstallResult::Installed { .. }));
        assert_eq!(sys.count("choco install beyondcompare"), 2);
    }

    #[test]
    fn test_headless_linux_is_unsupported() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .without_desktop()
            .with_command("apt-get")
            .with_command("curl");
        assert!(matches!(
            sys.dispatcher().install(&spec(), sys.platform()),
            InstallResult::Unsupported { .. }
        ));
        assert!(sys.calls().is_empty());
    }
}
