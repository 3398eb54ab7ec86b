//! Per-install context handed to strategies.

use crate::backend::{Manager, PackageManager, Shell};
use crate::error::{Error, Result};
use crate::host::Host;
use crate::probe;
use crate::registry::{InstallerSpec, Prerequisite};
use crate::types::{CommandOutput, InstallResult, Platform};
use crate::version::extract_version;
use std::path::PathBuf;

/// Everything a strategy may touch while installing one tool.
#[derive(Debug, Clone, Copy)]
pub struct InstallContext<'a> {
    spec: &'a InstallerSpec,
    platform: Platform,
    shell: Shell<'a>,
}

impl<'a> InstallContext<'a> {
    /// Build a context for `spec` on `platform`.
    #[must_use]
    pub fn new(spec: &'a InstallerSpec, platform: Platform, shell: Shell<'a>) -> Self {
        Self {
            spec,
            platform,
            shell,
        }
    }

    /// The tool being installed.
    #[must_use]
    pub fn spec(&self) -> &'a InstallerSpec {
        self.spec
    }

    /// The detected platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The shell commands run through.
    #[must_use]
    pub fn shell(&self) -> Shell<'a> {
        self.shell
    }

    /// Read-only host probes.
    #[must_use]
    pub fn host(&self) -> &'a dyn Host {
        self.shell.host
    }

    /// Whether any registered probe for this platform is positive.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        probe::any_positive(
            self.spec.probes(self.platform.kind),
            &self.shell,
            &self.platform,
        )
    }

    /// Version reported by the tool's version command.
    #[must_use]
    pub fn installed_version(&self) -> Option<String> {
        let command = self.spec.version_cmd(self.platform.kind)?;
        let output = self.shell.query(command).filter(CommandOutput::success)?;
        extract_version(&output.stdout).or_else(|| extract_version(&output.stderr))
    }

    /// Run a command; non-zero exit is an error carrying its stderr.
    pub fn run(&self, command: &str) -> Result<CommandOutput> {
        log::debug!("{}: {}", self.spec.name(), command);
        self.shell.run(command)
    }

    /// Run a system-mutating command, with `sudo` when not root.
    pub fn run_elevated(&self, command: &str) -> Result<CommandOutput> {
        self.run(&self.shell.elevated(command))
    }

    /// Adapter for a package manager on this platform.
    #[must_use]
    pub fn manager(&self, manager: Manager) -> Box<dyn PackageManager + 'a> {
        manager.adapter(self.shell, &self.platform)
    }

    /// Fail unless `name` is on PATH.
    pub fn require_command(&self, name: &'static str, hint: &'static str) -> Result<()> {
        Prerequisite::Command { name, hint }.check(self)
    }

    /// Scratch path for downloads, namespaced by tool and process.
    #[must_use]
    pub fn temp_path(&self, file_name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "devstrap-{}-{}-{file_name}",
            self.spec.name(),
            std::process::id()
        ))
    }

    /// Run `install` under the strategy contract.
    ///
    /// 1. A positive probe returns [`InstallResult::AlreadyInstalled`]
    ///    without running anything else.
    /// 2. Every prerequisite is checked; the first missing one aborts.
    /// 3. `install` runs; its first error aborts.
    /// 4. Probes run again. A negative result is
    ///    [`Error::VerificationFailed`] even though every command succeeded.
    pub fn guarded_install<F>(&self, prerequisites: &[Prerequisite], install: F) -> Result<InstallResult>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        if self.is_installed() {
            log::info!("{} is already installed", self.spec.display_name());
            return Ok(InstallResult::AlreadyInstalled {
                version: self.installed_version(),
            });
        }

        for prerequisite in prerequisites {
            prerequisite.check(self)?;
        }

        log::info!(
            "Installing {} on {}",
            self.spec.display_name(),
            self.platform
        );
        install(self)?;

        if !self.is_installed() {
            return Err(Error::VerificationFailed {
                tool: self.spec.display_name().to_string(),
            });
        }

        Ok(InstallResult::Installed {
            version: self.installed_version(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSystem;
    use crate::probe::Probe;
    use crate::registry::Strategy;
    use crate::types::PlatformKind;

    fn spec() -> InstallerSpec {
        InstallerSpec::new("tree", "tree")
            .on(&[PlatformKind::Ubuntu], Strategy::package(Manager::Apt, "tree"))
            .detect(Probe::Command("tree"))
            .version_command("tree --version")
    }

    #[test]
    fn test_already_installed_skips_prerequisites() {
        // apt-get is absent, but the tool is present: no prerequisite error
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("tree")
            .on("tree --version", CommandOutput::ok("tree v2.1.1 (c) 1996 - 2023"));
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        let result = ctx
            .guarded_install(&[Prerequisite::Manager(Manager::Apt)], |_| {
                panic!("install must not run")
            })
            .unwrap();
        assert_eq!(
            result,
            InstallResult::AlreadyInstalled {
                version: Some("2.1.1".to_string())
            }
        );
        assert_eq!(sys.calls(), vec!["tree --version"]);
    }

    #[test]
    fn test_missing_prerequisite_runs_nothing() {
        let sys = MockSystem::new(PlatformKind::Ubuntu);
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        let err = ctx
            .guarded_install(
                &[Prerequisite::Command {
                    name: "npm",
                    hint: "install Node.js first",
                }],
                |ctx| ctx.run("npm install -g yarn").map(|_| ()),
            )
            .unwrap_err();
        assert!(matches!(err, Error::PrerequisiteMissing { .. }));
        assert!(err.to_string().contains("npm"));
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_verification_failure() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("apt-get")
            .on("apt-get install -y tree", CommandOutput::ok(""));
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        let err = ctx
            .guarded_install(&[], |ctx| ctx.run_elevated("apt-get install -y tree").map(|_| ()))
            .unwrap_err();
        assert!(err.to_string().contains("verification failed"));
    }

    #[test]
    fn test_installed_after_verification() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .as_root()
            .on("apt-get install -y tree", CommandOutput::ok(""))
            .installs_command("apt-get install -y tree", "tree");
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        let result = ctx
            .guarded_install(&[], |ctx| ctx.run_elevated("apt-get install -y tree").map(|_| ()))
            .unwrap();
        assert_eq!(result, InstallResult::Installed { version: None });
        assert_eq!(sys.calls()[0], "apt-get install -y tree");
    }

    #[test]
    fn test_version_falls_back_to_stderr() {
        let sys = MockSystem::new(PlatformKind::Ubuntu).on(
            "tree --version",
            CommandOutput {
                code: 0,
                stdout: String::new(),
                stderr: "tree v2.0.2".to_string(),
            },
        );
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        assert_eq!(ctx.installed_version(), Some("2.0.2".to_string()));
    }

    #[test]
    fn test_temp_path_is_namespaced() {
        let sys = MockSystem::new(PlatformKind::Ubuntu);
        let spec = spec();
        let ctx = InstallContext::new(&spec, sys.platform(), sys.shell());
        let path = ctx.temp_path("bcompare.deb");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("devstrap-tree-"));
        assert!(name.ends_with("-bcompare.deb"));
        assert!(name.contains(&std::process::id().to_string()));
    }
}
