//! Platform detection.
//!
//! This module classifies the running host into a [`PlatformKind`] and
//! picks the RPM front-end on Red Hat family systems. The classification
//! itself is pure ([`classify`]) so it can be tested against captured
//! `/etc/os-release` contents.
//!
//! # Example
//!
//! ```no_run
//! use installkit::platform;
//!
//! let platform = platform::detect().expect("unknown platform");
//! println!("Running on: {}", platform);
//! ```

use crate::error::{Error, Result};
use crate::types::{PackageManagerHint, Platform, PlatformKind};
use std::collections::HashMap;
use std::fs;

/// Facts about the host that decide its platform tag.
#[derive(Debug, Clone, Default)]
pub struct HostFacts<'a> {
    /// `std::env::consts::OS`.
    pub os: &'a str,
    /// Contents of `/etc/os-release`, if readable.
    pub os_release: Option<&'a str>,
    /// Contents of `/proc/version`, if readable.
    pub proc_version: Option<&'a str>,
    /// `MSYSTEM` environment variable (set by Git Bash).
    pub msystem: Option<&'a str>,
}

/// Detect the current platform.
///
/// # Supported Platforms
///
/// | Host                               | Tag            |
/// |------------------------------------|----------------|
/// | macOS                              | `macos`        |
/// | Windows, cmd / PowerShell          | `windows`      |
/// | Windows, Git Bash (`MSYSTEM` set)  | `gitbash`      |
/// | Linux kernel reporting "microsoft" | `wsl`          |
/// | `/etc/os-release` `ID=ubuntu`      | `ubuntu`       |
/// | `ID=debian`                        | `debian`       |
/// | `ID=raspbian`                      | `raspbian`     |
/// | `ID=amzn`                          | `amazon_linux` |
/// | `ID=rhel`, rocky, almalinux, centos| `rhel`         |
/// | `ID=fedora`                        | `fedora`       |
///
/// # Errors
///
/// Returns `Error::Detection` if the host matches none of the above.
pub fn detect() -> Result<Platform> {
    let os_release = fs::read_to_string("/etc/os-release").ok();
    let proc_version = fs::read_to_string("/proc/version").ok();
    let msystem = std::env::var("MSYSTEM").ok();

    let facts = HostFacts {
        os: std::env::consts::OS,
        os_release: os_release.as_deref(),
        proc_version: proc_version.as_deref(),
        msystem: msystem.as_deref(),
    };

    let kind = classify(&facts)?;
    let mut platform = Platform::new(kind);
    if uses_rpm(kind) {
        platform = platform.with_package_manager(rpm_hint(|bin| which::which(bin).is_ok()));
    }

    log::debug!("Detected platform: {}", platform);
    Ok(platform)
}

/// Classify a host from its raw facts.
///
/// # Errors
///
/// Returns `Error::Detection` for unknown operating systems or Linux
/// distributions outside the supported families.
pub fn classify(facts: &HostFacts<'_>) -> Result<PlatformKind> {
    match facts.os {
        "macos" => Ok(PlatformKind::Macos),
        "windows" => {
            if facts.msystem.is_some_and(|m| !m.is_empty()) {
                Ok(PlatformKind::Gitbash)
            } else {
                Ok(PlatformKind::Windows)
            }
        }
        "linux" => {
            // WSL first: a WSL Ubuntu still reports ID=ubuntu
            if facts
                .proc_version
                .is_some_and(|v| v.to_lowercase().contains("microsoft"))
            {
                return Ok(PlatformKind::Wsl);
            }

            let release = facts
                .os_release
                .map(parse_os_release)
                .ok_or_else(|| Error::Detection("/etc/os-release not readable".to_string()))?;

            let id = release.get("ID").map(String::as_str).unwrap_or_default();
            if let Some(kind) = distro_from_id(id) {
                return Ok(kind);
            }

            // Derivatives (Pop!_OS, Linux Mint, CentOS Stream...) via ID_LIKE
            let like = release.get("ID_LIKE").map(String::as_str).unwrap_or_default();
            like.split_whitespace()
                .find_map(distro_from_id)
                .ok_or_else(|| Error::Detection(format!("unsupported Linux distribution: {id}")))
        }
        other => Err(Error::Detection(format!("unsupported operating system: {other}"))),
    }
}

fn distro_from_id(id: &str) -> Option<PlatformKind> {
    match id {
        "ubuntu" => Some(PlatformKind::Ubuntu),
        "debian" => Some(PlatformKind::Debian),
        "raspbian" => Some(PlatformKind::Raspbian),
        "amzn" => Some(PlatformKind::AmazonLinux),
        "rhel" | "centos" | "rocky" | "almalinux" => Some(PlatformKind::Rhel),
        "fedora" => Some(PlatformKind::Fedora),
        _ => None,
    }
}

/// Parse `/etc/os-release` style `KEY=value` lines.
///
/// Quotes around values are stripped; comments and blank lines are skipped.
#[must_use]
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| {
            let v = v.trim().trim_matches('"').trim_matches('\'');
            (k.trim().to_string(), v.to_string())
        })
        .collect()
}

/// Whether a platform uses an RPM front-end.
#[must_use]
pub fn uses_rpm(kind: PlatformKind) -> bool {
    matches!(
        kind,
        PlatformKind::AmazonLinux | PlatformKind::Rhel | PlatformKind::Fedora
    )
}

/// Choose between `dnf` and `yum` given a PATH lookup.
///
/// Prefers `dnf`; falls back to `yum` only when `dnf` is absent and `yum`
/// is present.
pub fn rpm_hint(has_binary: impl Fn(&str) -> bool) -> PackageManagerHint {
    if !has_binary("dnf") && has_binary("yum") {
        PackageManagerHint::Yum
    } else {
        PackageManagerHint::Dnf
    }
}

/// Decide whether a graphical desktop is reachable.
///
/// macOS and Windows hosts always have one. Linux (including WSLg) needs
/// `DISPLAY` or `WAYLAND_DISPLAY`.
pub fn desktop_available(kind: PlatformKind, env: impl Fn(&str) -> Option<String>) -> bool {
    if kind == PlatformKind::Macos || kind.is_windows() {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| env(key).is_some_and(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBUNTU: &str = r#"PRETTY_NAME="Ubuntu 24.04.1 LTS"
NAME="Ubuntu"
VERSION_ID="24.04"
ID=ubuntu
ID_LIKE=debian
"#;

    const AMAZON: &str = r#"NAME="Amazon Linux"
VERSION="2023"
ID="amzn"
ID_LIKE="fedora"
"#;

    const MINT: &str = "ID=linuxmint\nID_LIKE=\"ubuntu debian\"\n";

    fn linux(os_release: &'static str) -> HostFacts<'static> {
        HostFacts {
            os: "linux",
            os_release: Some(os_release),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_os_release() {
        let parsed = parse_os_release(UBUNTU);
        assert_eq!(parsed.get("ID").map(String::as_str), Some("ubuntu"));
        assert_eq!(parsed.get("VERSION_ID").map(String::as_str), Some("24.04"));
        assert_eq!(
            parsed.get("PRETTY_NAME").map(String::as_str),
            Some("Ubuntu 24.04.1 LTS")
        );
    }

    #[test]
    fn test_parse_os_release_skips_comments() {
        let parsed = parse_os_release("# comment\n\nID=debian\n");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_classify_macos() {
        let facts = HostFacts {
            os: "macos",
            ..Default::default()
        };
        assert_eq!(classify(&facts).unwrap(), PlatformKind::Macos);
    }

    #[test]
    fn test_classify_windows_and_gitbash() {
        let windows = HostFacts {
            os: "windows",
            ..Default::default()
        };
        assert_eq!(classify(&windows).unwrap(), PlatformKind::Windows);

        let gitbash = HostFacts {
            os: "windows",
            msystem: Some("MINGW64"),
            ..Default::default()
        };
        assert_eq!(classify(&gitbash).unwrap(), PlatformKind::Gitbash);
    }

    #[test]
    fn test_classify_ubuntu() {
        assert_eq!(classify(&linux(UBUNTU)).unwrap(), PlatformKind::Ubuntu);
    }

    #[test]
    fn test_classify_wsl_wins_over_os_release() {
        let facts = HostFacts {
            os: "linux",
            os_release: Some(UBUNTU),
            proc_version: Some("Linux version 5.15.153.1-microsoft-standard-WSL2"),
            msystem: None,
        };
        assert_eq!(classify(&facts).unwrap(), PlatformKind::Wsl);
    }

    #[test]
    fn test_classify_amazon_linux() {
        assert_eq!(classify(&linux(AMAZON)).unwrap(), PlatformKind::AmazonLinux);
    }

    #[test]
    fn test_classify_rhel_rebuilds() {
        assert_eq!(classify(&linux("ID=rocky\n")).unwrap(), PlatformKind::Rhel);
        assert_eq!(classify(&linux("ID=almalinux\n")).unwrap(), PlatformKind::Rhel);
        assert_eq!(classify(&linux("ID=fedora\n")).unwrap(), PlatformKind::Fedora);
        assert_eq!(classify(&linux("ID=raspbian\n")).unwrap(), PlatformKind::Raspbian);
    }

    #[test]
    fn test_classify_derivative_via_id_like() {
        assert_eq!(classify(&linux(MINT)).unwrap(), PlatformKind::Ubuntu);
    }

    #[test]
    fn test_classify_unknown_distro() {
        let err = classify(&linux("ID=arch\n")).unwrap_err();
        assert!(err.to_string().contains("arch"));
    }

    #[test]
    fn test_classify_unknown_os() {
        let facts = HostFacts {
            os: "freebsd",
            ..Default::default()
        };
        assert!(classify(&facts).is_err());
    }

    #[test]
    fn test_rpm_hint() {
        assert_eq!(rpm_hint(|b| b == "dnf"), PackageManagerHint::Dnf);
        assert_eq!(rpm_hint(|b| b == "yum"), PackageManagerHint::Yum);
        assert_eq!(rpm_hint(|_| true), PackageManagerHint::Dnf);
        assert_eq!(rpm_hint(|_| false), PackageManagerHint::Dnf);
    }

    #[test]
    fn test_uses_rpm() {
        assert!(uses_rpm(PlatformKind::Fedora));
        assert!(uses_rpm(PlatformKind::AmazonLinux));
        assert!(!uses_rpm(PlatformKind::Debian));
    }

    #[test]
    fn test_desktop_available() {
        assert!(desktop_available(PlatformKind::Macos, |_| None));
        assert!(desktop_available(PlatformKind::Gitbash, |_| None));
        assert!(!desktop_available(PlatformKind::Ubuntu, |_| None));
        assert!(desktop_available(PlatformKind::Ubuntu, |k| {
            (k == "WAYLAND_DISPLAY").then(|| "wayland-0".to_string())
        }));
        assert!(!desktop_available(PlatformKind::Wsl, |_| Some(String::new())));
    }
}
