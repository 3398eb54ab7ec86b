//! Package-manager adapters.
//!
//! The [`PackageManager`] trait is the common surface over Homebrew, APT,
//! DNF/YUM, Chocolatey, and winget. Each adapter only builds command lines
//! and interprets their output; execution goes through a [`Shell`] so the
//! same adapters run against [`crate::MockSystem`] in tests.

pub mod apt;
pub mod brew;
pub mod choco;
pub mod dnf;
pub mod winget;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::runner::CommandRunner;
use crate::types::{CommandOutput, ExecOptions, Platform};
use std::fmt;

/// Host probes plus a command runner, bundled for adapters and strategies.
#[derive(Clone, Copy)]
pub struct Shell<'a> {
    /// Read-only host probes.
    pub host: &'a dyn Host,
    /// Command execution.
    pub runner: &'a dyn CommandRunner,
    /// Options applied to every command.
    pub options: ExecOptions,
}

impl<'a> Shell<'a> {
    /// Bundle a host and runner.
    #[must_use]
    pub fn new(host: &'a dyn Host, runner: &'a dyn CommandRunner, options: ExecOptions) -> Self {
        Self {
            host,
            runner,
            options,
        }
    }

    /// Run a command, returning its output whatever the exit code.
    pub fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.runner.exec(command, &self.options)
    }

    /// Run a command and turn a non-zero exit into [`Error::CommandFailed`].
    pub fn run(&self, command: &str) -> Result<CommandOutput> {
        let output = self.exec(command)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::command_failed(
                command,
                output.code,
                &output.stdout,
                &output.stderr,
            ))
        }
    }

    /// Run a read-only query; any failure to run counts as "no".
    #[must_use]
    pub fn query(&self, command: &str) -> Option<CommandOutput> {
        match self.exec(command) {
            Ok(output) => Some(output),
            Err(e) => {
                log::debug!("query `{}` failed: {}", command, e);
                None
            }
        }
    }

    /// Prefix a system-mutating command with `sudo` unless already root.
    #[must_use]
    pub fn elevated(&self, command: &str) -> String {
        if self.host.is_root() {
            command.to_string()
        } else {
            format!("sudo {command}")
        }
    }
}

impl fmt::Debug for Shell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Output of a package install, paired with the command that produced it.
#[derive(Debug, Clone)]
pub struct InstallOutput {
    /// The command line that ran (last attempt when retried).
    pub command: String,
    /// Captured output.
    pub output: CommandOutput,
}

impl InstallOutput {
    /// Whether the install command exited 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.output.success()
    }

    /// Convert a failed install into [`Error::CommandFailed`].
    pub fn into_result(self) -> Result<CommandOutput> {
        if self.output.success() {
            Ok(self.output)
        } else {
            Err(Error::command_failed(
                self.command,
                self.output.code,
                &self.output.stdout,
                &self.output.stderr,
            ))
        }
    }
}

/// Common surface over native package managers.
pub trait PackageManager {
    /// Display name of the package manager.
    fn name(&self) -> &'static str;

    /// Whether the package manager itself is installed.
    fn is_available(&self) -> bool;

    /// How to obtain the package manager when it is missing.
    fn install_hint(&self) -> &'static str;

    /// Whether `package` is registered as installed. Read-only.
    fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install `package`.
    fn install(&self, package: &str) -> Result<InstallOutput>;

    /// Installed version of `package`, if any. Read-only.
    fn get_version(&self, package: &str) -> Result<Option<String>>;

    /// Fail with [`Error::PrerequisiteMissing`] when unavailable.
    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::prerequisite(self.name(), self.install_hint()))
        }
    }
}

/// Identifies a package-manager adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manager {
    /// Homebrew formula.
    Brew,
    /// Homebrew cask.
    BrewCask,
    /// APT (Debian family).
    Apt,
    /// DNF or YUM, per the platform hint.
    Rpm,
    /// Chocolatey.
    Choco,
    /// winget.
    Winget,
}

impl Manager {
    /// Build the adapter for this manager.
    #[must_use]
    pub fn adapter<'a>(self, shell: Shell<'a>, platform: &Platform) -> Box<dyn PackageManager + 'a> {
        match self {
            Self::Brew => Box::new(brew::Brew::formula(shell)),
            Self::BrewCask => Box::new(brew::Brew::cask(shell)),
            Self::Apt => Box::new(apt::Apt::new(shell)),
            Self::Rpm => Box::new(dnf::Dnf::new(shell, platform.rpm_binary())),
            Self::Choco => Box::new(choco::Choco::new(shell)),
            Self::Winget => Box::new(winget::Winget::new(shell)),
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::BrewCask => "brew cask",
            Self::Apt => "apt",
            Self::Rpm => "dnf/yum",
            Self::Choco => "choco",
            Self::Winget => "winget",
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSystem;
    use crate::types::{PackageManagerHint, PlatformKind};

    #[test]
    fn test_shell_run_maps_failure() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .on("false-command", CommandOutput::failed(2, "nope"));
        let err = sys.shell().run("false-command").unwrap_err();
        match err {
            Error::CommandFailed { code, output, .. } => {
                assert_eq!(code, 2);
                assert_eq!(output, "nope");
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_shell_elevated() {
        let user = MockSystem::new(PlatformKind::Ubuntu);
        assert_eq!(user.shell().elevated("apt-get update"), "sudo apt-get update");

        let root = MockSystem::new(PlatformKind::Ubuntu).as_root();
        assert_eq!(root.shell().elevated("apt-get update"), "apt-get update");
    }

    #[test]
    fn test_manager_adapter_names() {
        let sys = MockSystem::new(PlatformKind::Rhel);
        let yum = Platform::new(PlatformKind::Rhel).with_package_manager(PackageManagerHint::Yum);
        assert_eq!(Manager::Rpm.adapter(sys.shell(), &yum).name(), "yum");
        assert_eq!(Manager::Apt.adapter(sys.shell(), &yum).name(), "apt-get");
        assert_eq!(Manager::BrewCask.adapter(sys.shell(), &yum).name(), "brew");
    }

    #[test]
    fn test_ensure_available() {
        let sys = MockSystem::new(PlatformKind::Macos);
        let platform = Platform::new(PlatformKind::Macos);
        let err = Manager::Brew
            .adapter(sys.shell(), &platform)
            .ensure_available()
            .unwrap_err();
        assert!(err.to_string().contains("https://brew.sh"));

        let sys = sys.with_command("brew");
        assert!(
            Manager::Brew
                .adapter(sys.shell(), &platform)
                .ensure_available()
                .is_ok()
        );
    }
}
