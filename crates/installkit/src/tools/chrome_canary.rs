//! Google Chrome Canary.

use super::{LINUX, WINDOWS};
use crate::backend::Manager;
use crate::probe::Probe;
use crate::registry::{InstallerSpec, Strategy};
use crate::types::PlatformKind;

const CASK: &str = "google-chrome@canary";
const WINGET_ID: &str = "Google.Chrome.Canary";

/// Installer for Chrome Canary. Canary builds exist for macOS and Windows only.
#[must_use]
pub fn spec() -> InstallerSpec {
    InstallerSpec::new("chrome-canary", "Google Chrome Canary")
        .requires_desktop()
        .on(&[PlatformKind::Macos], Strategy::package(Manager::BrewCask, CASK))
        .on(WINDOWS, Strategy::package(Manager::Winget, WINGET_ID))
        .unavailable_on(
            LINUX,
            "Google does not publish Chrome Canary for Linux; google-chrome-unstable is the closest channel",
        )
        .detect_on(&[PlatformKind::Macos], Probe::AppBundle("Google Chrome Canary"))
        .detect_on(&[PlatformKind::Macos], Probe::Package(Manager::BrewCask, CASK))
        .detect_on(
            WINDOWS,
            Probe::Path("$LOCALAPPDATA/Google/Chrome SxS/Application/chrome.exe"),
        )
        .detect_on(WINDOWS, Probe::Package(Manager::Winget, WINGET_ID))
        .version_command_on(
            &[PlatformKind::Macos],
            "defaults read \"/Applications/Google Chrome Canary.app/Contents/Info\" CFBundleShortVersionString",
        )
        .version_command_on(
            WINDOWS,
            "winget list --id Google.Chrome.Canary --exact --accept-source-agreements",
        )
}
