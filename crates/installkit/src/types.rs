//! Core types for installer dispatch.
//!
//! This module contains the fundamental data structures used throughout
//! the crate: the platform model, command output, execution options, and
//! the uniform install result.

use crate::error::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Platform tags an installer can be registered under.
///
/// Tags are matched exactly; `ubuntu` never falls back to `debian`.
///
/// # Example
///
/// ```
/// use installkit::PlatformKind;
///
/// assert_eq!(PlatformKind::AmazonLinux.as_str(), "amazon_linux");
/// assert!(PlatformKind::Wsl.is_linux());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    /// Apple macOS.
    Macos,
    /// Ubuntu Linux.
    Ubuntu,
    /// Debian Linux.
    Debian,
    /// Windows Subsystem for Linux.
    Wsl,
    /// Raspberry Pi OS.
    Raspbian,
    /// Amazon Linux.
    AmazonLinux,
    /// Red Hat Enterprise Linux and rebuilds (Rocky, Alma, CentOS).
    Rhel,
    /// Fedora.
    Fedora,
    /// Native Windows shell (cmd / PowerShell).
    Windows,
    /// Git Bash (MSYS2) on Windows.
    Gitbash,
}

impl PlatformKind {
    /// Get the lowercase tag for this platform.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Wsl => "wsl",
            Self::Raspbian => "raspbian",
            Self::AmazonLinux => "amazon_linux",
            Self::Rhel => "rhel",
            Self::Fedora => "fedora",
            Self::Windows => "windows",
            Self::Gitbash => "gitbash",
        }
    }

    /// Get every platform tag.
    #[must_use]
    pub fn all() -> &'static [PlatformKind] {
        &[
            Self::Macos,
            Self::Ubuntu,
            Self::Debian,
            Self::Wsl,
            Self::Raspbian,
            Self::AmazonLinux,
            Self::Rhel,
            Self::Fedora,
            Self::Windows,
            Self::Gitbash,
        ]
    }

    /// Parse a platform tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == tag)
    }

    /// Check if this platform is a Linux userland (including WSL).
    #[must_use]
    pub fn is_linux(&self) -> bool {
        matches!(
            self,
            Self::Ubuntu
                | Self::Debian
                | Self::Wsl
                | Self::Raspbian
                | Self::AmazonLinux
                | Self::Rhel
                | Self::Fedora
        )
    }

    /// Check if this platform runs on a Windows host without WSL.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows | Self::Gitbash)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which RPM front-end a Red Hat family host provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerHint {
    /// `dnf` (Fedora, RHEL 8+, Amazon Linux 2023).
    Dnf,
    /// `yum` (RHEL 7, Amazon Linux 2).
    Yum,
}

impl PackageManagerHint {
    /// Get the binary name.
    #[must_use]
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }
}

impl fmt::Display for PackageManagerHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// The detected host platform.
///
/// Resolved once per process and passed around read-only.
///
/// # Example
///
/// ```
/// use installkit::{Platform, PlatformKind, PackageManagerHint};
///
/// let platform = Platform::new(PlatformKind::Fedora).with_package_manager(PackageManagerHint::Dnf);
/// assert_eq!(platform.kind, PlatformKind::Fedora);
/// assert_eq!(platform.rpm_binary(), "dnf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Platform tag.
    pub kind: PlatformKind,
    /// RPM front-end, set on Red Hat family hosts.
    pub package_manager: Option<PackageManagerHint>,
}

impl Platform {
    /// Create a platform without a package-manager hint.
    #[must_use]
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            kind,
            package_manager: None,
        }
    }

    /// Attach a package-manager hint.
    #[must_use]
    pub fn with_package_manager(mut self, hint: PackageManagerHint) -> Self {
        self.package_manager = Some(hint);
        self
    }

    /// Get the RPM front-end to use, defaulting to `dnf`.
    #[must_use]
    pub fn rpm_binary(&self) -> &'static str {
        self.package_manager
            .unwrap_or(PackageManagerHint::Dnf)
            .binary()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.package_manager {
            Some(hint) => write!(f, "{} ({})", self.kind, hint),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (`-1` when the process was killed by a signal).
    pub code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Options passed to the command runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Kill the command after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    /// Create options with no timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of one install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallResult {
    /// The tool was already present; nothing was run.
    AlreadyInstalled {
        /// Detected version, when the tool reports one.
        version: Option<String>,
    },
    /// The tool was installed and verified.
    Installed {
        /// Detected version, when the tool reports one.
        version: Option<String>,
    },
    /// No strategy applies to this platform.
    Unsupported {
        /// The platform that was asked for.
        platform: PlatformKind,
    },
    /// The install did not complete.
    Failed {
        /// What kind of failure occurred.
        category: ErrorCategory,
        /// Human-readable reason, including captured command output.
        reason: String,
    },
}

impl InstallResult {
    /// Whether the CLI should exit 0 for this result.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Short lowercase label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyInstalled { .. } => "already installed",
            Self::Installed { .. } => "installed",
            Self::Unsupported { .. } => "unsupported",
            Self::Failed { .. } => "failed",
        }
    }

    /// Get the reported version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::AlreadyInstalled { version } | Self::Installed { version } => {
                version.as_deref()
            }
            _ => None,
        }
    }
}

impl fmt::Display for InstallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled { version: Some(v) } => write!(f, "already installed ({v})"),
            Self::Installed { version: Some(v) } => write!(f, "installed ({v})"),
            Self::Unsupported { platform } => write!(f, "not supported on {platform}"),
            Self::Failed { reason, .. } => write!(f, "failed: {reason}"),
            other => write!(f, "{}", other.label()),
        }
    }
}
