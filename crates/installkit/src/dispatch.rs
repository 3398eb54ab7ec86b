//! Platform dispatch.
//!
//! The [`Dispatcher`] looks up the strategy registered for the exact
//! platform tag, applies desktop gating, runs the strategy, and turns any
//! error into [`InstallResult::Failed`]. It never panics and never returns
//! an error to the caller.

use crate::backend::Shell;
use crate::context::InstallContext;
use crate::host::Host;
use crate::registry::{Entry, InstallerSpec};
use crate::runner::CommandRunner;
use crate::types::{ExecOptions, InstallResult, Platform};

/// Runs installer specs against a host.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    shell: Shell<'a>,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher with default execution options.
    #[must_use]
    pub fn new(host: &'a dyn Host, runner: &'a dyn CommandRunner) -> Self {
        Self {
            shell: Shell::new(host, runner, ExecOptions::new()),
        }
    }

    /// Apply `options` (e.g. a timeout) to every command.
    #[must_use]
    pub fn with_options(mut self, options: ExecOptions) -> Self {
        self.shell.options = options;
        self
    }

    /// Context for running `spec` on `platform` directly.
    #[must_use]
    pub fn context<'s>(&self, spec: &'s InstallerSpec, platform: Platform) -> InstallContext<'s>
    where
        'a: 's,
    {
        InstallContext::new(spec, platform, self.shell)
    }

    /// Install `spec` on `platform`.
    pub fn install(&self, spec: &InstallerSpec, platform: Platform) -> InstallResult {
        let unsupported = InstallResult::Unsupported {
            platform: platform.kind,
        };

        let strategy = match spec.entry(platform.kind) {
            Some(Entry::Strategy(strategy)) => strategy,
            Some(Entry::Unavailable(note)) => {
                log::info!("{} is not available on {}: {}", spec.display_name(), platform, note);
                return unsupported;
            }
            None => {
                log::info!("{} has no installer for {}", spec.display_name(), platform);
                return unsupported;
            }
        };

        if spec.needs_desktop() && !self.shell.host.is_desktop_available() {
            log::info!(
                "{} needs a graphical desktop; none detected",
                spec.display_name()
            );
            return unsupported;
        }

        match strategy.run(&self.context(spec, platform)) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("{} failed: {:?}", spec.name(), e);
                InstallResult::Failed {
                    category: e.category(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Whether `spec` is present on `platform`. Read-only.
    #[must_use]
    pub fn is_installed(&self, spec: &InstallerSpec, platform: Platform) -> bool {
        self.context(spec, platform).is_installed()
    }

    /// Installed version, when the tool is present and reports one.
    #[must_use]
    pub fn installed_version(&self, spec: &InstallerSpec, platform: Platform) -> Option<String> {
        let ctx = self.context(spec, platform);
        if ctx.is_installed() {
            ctx.installed_version()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Manager;
    use crate::error::{Error, ErrorCategory};
    use crate::mock::MockSystem;
    use crate::probe::Probe;
    use crate::registry::{Prerequisite, Strategy};
    use crate::types::{CommandOutput, PlatformKind};

    fn tree() -> InstallerSpec {
        InstallerSpec::new("tree", "tree")
            .on(
                &[PlatformKind::Ubuntu, PlatformKind::Debian],
                Strategy::package(Manager::Apt, "tree"),
            )
            .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "tree"))
            .unavailable_on(&[PlatformKind::Windows], "Windows ships tree.com")
            .detect(Probe::Command("tree"))
            .version_command("tree --version")
    }

    fn gui() -> InstallerSpec {
        InstallerSpec::new("viewer", "Viewer")
            .requires_desktop()
            .on(&[PlatformKind::Ubuntu], Strategy::package(Manager::Apt, "viewer"))
            .detect(Probe::Command("viewer"))
    }

    #[test]
    fn test_unsupported_platform_runs_nothing() {
        let sys = MockSystem::new(PlatformKind::Fedora);
        let result = sys.dispatcher().install(&tree(), sys.platform());
        assert_eq!(
            result,
            InstallResult::Unsupported {
                platform: PlatformKind::Fedora
            }
        );
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_unavailable_entry_is_unsupported() {
        let sys = MockSystem::new(PlatformKind::Windows);
        let result = sys.dispatcher().install(&tree(), sys.platform());
        assert!(matches!(result, InstallResult::Unsupported { .. }));
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_no_fallback_to_related_tag() {
        // wsl is Debian-like but has its own tag
        let sys = MockSystem::new(PlatformKind::Wsl).with_command("apt-get");
        let result = sys.dispatcher().install(&tree(), sys.platform());
        assert!(matches!(result, InstallResult::Unsupported { .. }));
    }

    #[test]
    fn test_install_then_idempotent() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("apt-get")
            .on("apt-get install -y tree", CommandOutput::ok(""))
            .on("tree --version", CommandOutput::ok("tree v2.1.1"))
            .installs_command("apt-get install -y tree", "tree");
        let dispatcher = sys.dispatcher();
        let spec = tree();

        let first = dispatcher.install(&spec, sys.platform());
        assert_eq!(
            first,
            InstallResult::Installed {
                version: Some("2.1.1".to_string())
            }
        );
        assert_eq!(sys.count("apt-get install"), 1);

        let second = dispatcher.install(&spec, sys.platform());
        assert!(matches!(second, InstallResult::AlreadyInstalled { .. }));
        assert_eq!(sys.count("apt-get install"), 1);
    }

    #[test]
    fn test_desktop_gating() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .without_desktop()
            .with_command("apt-get");
        let result = sys.dispatcher().install(&gui(), sys.platform());
        assert!(matches!(result, InstallResult::Unsupported { .. }));
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_desktop_gating_does_not_affect_cli_tools() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .without_desktop()
            .with_command("tree");
        let result = sys.dispatcher().install(&tree(), sys.platform());
        assert!(matches!(result, InstallResult::AlreadyInstalled { .. }));
    }

    #[test]
    fn test_command_failure_carries_stderr() {
        let stderr = "E: Unable to locate package tree";
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("apt-get")
            .on("apt-get install", CommandOutput::failed(100, stderr));
        let result = sys.dispatcher().install(&tree(), sys.platform());
        match result {
            InstallResult::Failed { category, reason } => {
                assert_eq!(category, ErrorCategory::Command);
                assert!(reason.contains(stderr), "reason was {reason}");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_verification_failure_is_failed() {
        let sys = MockSystem::new(PlatformKind::Macos)
            .with_command("brew")
            .on("brew install --formula tree", CommandOutput::ok(""));
        let result = sys.dispatcher().install(&tree(), sys.platform());
        match result {
            InstallResult::Failed { category, reason } => {
                assert_eq!(category, ErrorCategory::Verification);
                assert!(reason.contains("verification failed"));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_manager_is_prerequisite_failure() {
        let sys = MockSystem::new(PlatformKind::Macos);
        let result = sys.dispatcher().install(&tree(), sys.platform());
        assert!(matches!(
            result,
            InstallResult::Failed {
                category: ErrorCategory::Prerequisite,
                ..
            }
        ));
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_strategy_error_is_normalized() {
        let spec = InstallerSpec::new("broken", "Broken")
            .on(
                &[PlatformKind::Ubuntu],
                Strategy::new(|_| Err(Error::Other("boom".to_string()))),
            )
            .detect(Probe::Command("broken"));
        let sys = MockSystem::new(PlatformKind::Ubuntu);
        let result = sys.dispatcher().install(&spec, sys.platform());
        assert_eq!(
            result,
            InstallResult::Failed {
                category: ErrorCategory::Other,
                reason: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_custom_strategy_with_prerequisite() {
        let spec = InstallerSpec::new("yarn", "Yarn")
            .on(
                &[PlatformKind::Ubuntu],
                Strategy::new(|ctx| {
                    ctx.guarded_install(
                        &[Prerequisite::Command {
                            name: "npm",
                            hint: "install Node.js",
                        }],
                        |ctx| ctx.run_elevated("npm install -g yarn").map(|_| ()),
                    )
                }),
            )
            .detect(Probe::Command("yarn"));
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("npm")
            .on("npm install -g yarn", CommandOutput::ok(""))
            .installs_command("npm install -g yarn", "yarn");
        let result = sys.dispatcher().install(&spec, sys.platform());
        assert_eq!(result, InstallResult::Installed { version: None });
        assert_eq!(sys.calls(), vec!["sudo npm install -g yarn"]);
    }

    #[test]
    fn test_is_installed_and_version_are_read_only() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("tree")
            .on("tree --version", CommandOutput::ok("tree v2.1.1"));
        let dispatcher = sys.dispatcher();
        let spec = tree();
        assert!(dispatcher.is_installed(&spec, sys.platform()));
        assert_eq!(
            dispatcher.installed_version(&spec, sys.platform()),
            Some("2.1.1".to_string())
        );
        assert!(sys.calls().iter().all(|c| c == "tree --version"));
    }

    #[test]
    fn test_version_none_when_absent() {
        let sys = MockSystem::new(PlatformKind::Ubuntu);
        assert_eq!(
            sys.dispatcher().installed_version(&tree(), sys.platform()),
            None
        );
        assert!(sys.calls().is_empty());
    }
}
