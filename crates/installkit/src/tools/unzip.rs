//! unzip: Info-ZIP extractor.

use super::{APT, RPM, WINDOWS};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};
use crate::types::PlatformKind;

/// Installer for `unzip`.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("unzip", "unzip")
        .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "unzip"))
        .on(APT, Strategy::package(Manager::Apt, "unzip"))
        .on(RPM, Strategy::package(Manager::Rpm, "unzip"))
        .on(WINDOWS, Strategy::package(Manager::Choco, "unzip"))
        .detect(Probe::Command("unzip"))
        .detect_on(WINDOWS, Probe::Command("unzip"))
        .detect_on(WINDOWS, Probe::Package(Manager::Choco, "unzip"))
        .version_command("unzip -v")
        .version_command_on(WINDOWS, "choco list --exact unzip --limit-output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSystem;
    use crate::types::{CommandOutput, InstallResult};

    #[test]
    fn test_already_installed_with_version() {
        let sys = MockSystem::new(PlatformKind::Fedora).with_command("unzip").on(
            "unzip -v",
            CommandOutput::ok("UnZip 6.00 of 20 April 2009, by Info-ZIP.  Maintained by C. Spieler."),
        );
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert_eq!(
            result,
            InstallResult::AlreadyInstalled {
                version: Some("6.00".to_string())
            }
        );
        assert_eq!(sys.calls(), vec!["unzip -v"]);
    }

    #[test]
    fn test_windows_checksum_retry() {
        let sys = MockSystem::new(PlatformKind::Windows)
            .with_command("choco")
            .on("--ignore-checksums", CommandOutput::ok(""))
            .on(
                "choco install unzip",
                CommandOutput::failed(1, "ERROR: Checksum for 'unzip.exe' did not meet '1a2b' for checksum type 'sha256'"),
            )
            .installs_command("--ignore-checksums", "unzip");
        let result = sys.dispatcher().install(&spec(), sys.platform());
        assert!(matches!(result, InstallResult::Installed { .. }));
        assert_eq!(sys.count("choco install unzip"), 2);
        assert_eq!(sys.count("--ignore-checksums"), 1);
    }

    #[test]
    fn test_windows_other_failure_not_retried() {
        let sys = MockSystem::new(PlatformKind::Windows)
            .with_command("choco")
            .on("choco install unzip", CommandOutput::failed(1, "Access to the path is denied."));
        match sys.dispatcher().install(&spec(), sys.platform()) {
            InstallResult::Failed { reason, .. } => {
                assert!(reason.contains("Access to the path is denied."));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
        assert_eq!(sys.count("choco install unzip"), 1);
    }
}
