//! Error types for installer operations.
//!
//! This module provides error types and categories for all installer operations.
//! Errors are categorized so the dispatcher can normalize them into a
//! [`crate::InstallResult::Failed`] and the CLI can print useful advice.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of installer errors.
///
/// Categories decide how a failure is reported and whether the single
/// checksum retry applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required package manager or tool is missing.
    Prerequisite,
    /// An external command exited non-zero.
    Command,
    /// Commands succeeded but the tool is still not detected.
    Verification,
    /// An external command ran past its deadline.
    Timeout,
    /// The platform could not be determined.
    Platform,
    /// Permission denied while touching the filesystem.
    Permission,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether a user action (installing a prerequisite) fixes this error.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(self, Self::Prerequisite | Self::Permission)
    }

    /// Whether the install may have been partially applied.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Verification | Self::Timeout)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Prerequisite => "Missing prerequisite",
            Self::Command => "Command failed",
            Self::Verification => "Verification failed",
            Self::Timeout => "Command timed out",
            Self::Platform => "Unknown platform",
            Self::Permission => "Permission denied",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Prerequisite => "Install the missing prerequisite and run the command again",
            Self::Command => "Check the command output above for details",
            Self::Verification => {
                "The installer reported success but the tool was not found; open a new shell or check PATH"
            }
            Self::Timeout => "Raise the timeout with --timeout or in config.toml",
            Self::Platform => "Run `dev platform` to see what was detected",
            Self::Permission => "Check directory permissions or run with appropriate access",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while detecting or installing a tool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A package manager or tool the strategy depends on is not available.
    #[error("{prerequisite} is required but was not found. {hint}")]
    PrerequisiteMissing {
        /// Name of the missing prerequisite.
        prerequisite: String,
        /// How to obtain it.
        hint: String,
    },

    /// An external command exited with a non-zero code.
    #[error("`{command}` exited with code {code}: {output}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit code reported by the command.
        code: i32,
        /// Captured stderr, or stdout when stderr was empty.
        output: String,
    },

    /// The install commands succeeded but detection still reports absent.
    #[error("{tool}: verification failed, install commands succeeded but the tool was not detected")]
    VerificationFailed {
        /// Tool name.
        tool: String,
    },

    /// An external command exceeded its timeout and was killed.
    #[error("`{command}` timed out after {}", format_limit(.timeout))]
    Timeout {
        /// The command line that was run.
        command: String,
        /// The limit that elapsed.
        timeout: Duration,
    },

    /// The host platform could not be classified.
    #[error("could not detect platform: {0}")]
    Detection(String),

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing-prerequisite error.
    pub fn prerequisite(prerequisite: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::PrerequisiteMissing {
            prerequisite: prerequisite.into(),
            hint: hint.into(),
        }
    }

    /// Create a command failure from captured output.
    ///
    /// Stderr is preferred; installers that report errors on stdout
    /// (Chocolatey, winget) fall back to stdout.
    pub fn command_failed(
        command: impl Into<String>,
        code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        let output = if stderr.trim().is_empty() {
            stdout.trim_end()
        } else {
            stderr.trim_end()
        };
        Self::CommandFailed {
            command: command.into(),
            code,
            output: output.to_string(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::PrerequisiteMissing { .. } => ErrorCategory::Prerequisite,
            Error::CommandFailed { .. } => ErrorCategory::Command,
            Error::VerificationFailed { .. } => ErrorCategory::Verification,
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::Detection(_) => ErrorCategory::Platform,
            Error::Io { source, .. } => {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ErrorCategory::Permission
                } else {
                    ErrorCategory::Other
                }
            }
            Error::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this failure looks like a package checksum mismatch.
    ///
    /// Chocolatey packages regularly lag behind vendor re-uploads, which
    /// surfaces as a checksum error on an otherwise valid download.
    #[must_use]
    pub fn is_checksum_mismatch(&self) -> bool {
        match self {
            Error::CommandFailed { output, .. } => mentions_checksum_mismatch(output),
            _ => false,
        }
    }
}

/// Whether installer output reports a checksum mismatch.
pub(crate) fn mentions_checksum_mismatch(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("checksum")
        && ["mismatch", "not match", "did not meet", "failed"]
            .iter()
            .any(|needle| lower.contains(needle))
}

/// `250ms`, `30s`, `1.5s`.
fn format_limit(limit: &Duration) -> String {
    if *limit < Duration::from_secs(1) {
        format!("{}ms", limit.as_millis())
    } else if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{:.1}s", limit.as_secs_f64())
    }
}
