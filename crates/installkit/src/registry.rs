//! Installer registry.
//!
//! An [`InstallerSpec`] is the static description of how to install one
//! tool: which [`Strategy`] runs on which platform tag, how to detect the
//! tool, and whether it needs a desktop. Platforms are matched exactly;
//! platforms that share a procedure register the same [`Strategy`] (one
//! `Arc`) under each tag.
//!
//! # Example
//!
//! ```
//! use installkit::{InstallerSpec, Manager, PlatformKind, Probe, Strategy};
//!
//! let spec = InstallerSpec::new("tree", "tree")
//!     .on(&[PlatformKind::Macos], Strategy::package(Manager::Brew, "tree"))
//!     .on(
//!         &[PlatformKind::Ubuntu, PlatformKind::Debian],
//!         Strategy::package(Manager::Apt, "tree"),
//!     )
//!     .detect(Probe::Command("tree"));
//!
//! assert!(spec.strategy(PlatformKind::Ubuntu).is_some());
//! assert!(spec.strategy(PlatformKind::Windows).is_none());
//! ```

use crate::backend::Manager;
use crate::context::InstallContext;
use crate::error::{Error, Result};
use crate::probe::Probe;
use crate::types::{InstallResult, PlatformKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type StrategyFn = dyn Fn(&InstallContext<'_>) -> Result<InstallResult> + Send + Sync;

/// The platform-specific procedure that installs one tool.
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct Strategy(Arc<StrategyFn>);

impl Strategy {
    /// Wrap a closure as a strategy.
    ///
    /// The closure is expected to honour the strategy contract; the easiest
    /// way is to delegate to [`InstallContext::guarded_install`].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&InstallContext<'_>) -> Result<InstallResult> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Install one package through a package manager.
    ///
    /// The manager is the only prerequisite.
    pub fn package(manager: Manager, package: &'static str) -> Self {
        Self::new(move |ctx| {
            ctx.guarded_install(&[Prerequisite::Manager(manager)], |ctx| {
                ctx.manager(manager).install(package)?.into_result()?;
                Ok(())
            })
        })
    }

    /// Run the strategy.
    pub fn run(&self, ctx: &InstallContext<'_>) -> Result<InstallResult> {
        (self.0)(ctx)
    }

    /// Whether two strategies are the same registered reference.
    #[must_use]
    pub fn same_as(&self, other: &Strategy) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Strategy(..)")
    }
}

/// What a platform tag maps to.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A strategy to run.
    Strategy(Strategy),
    /// Known not to be available; the note explains why.
    Unavailable(&'static str),
}

/// Something a strategy needs before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    /// A package manager must be installed.
    Manager(Manager),
    /// An executable must be on PATH.
    Command {
        /// Executable name.
        name: &'static str,
        /// How to obtain it.
        hint: &'static str,
    },
}

impl Prerequisite {
    /// Fail with [`Error::PrerequisiteMissing`] when absent.
    pub fn check(&self, ctx: &InstallContext<'_>) -> Result<()> {
        match self {
            Self::Manager(manager) => ctx.manager(*manager).ensure_available(),
            Self::Command { name, hint } => {
                if ctx.host().command_exists(name) {
                    Ok(())
                } else {
                    Err(Error::prerequisite(*name, *hint))
                }
            }
        }
    }
}

/// Static description of how to install one tool.
#[derive(Debug, Clone)]
pub struct InstallerSpec {
    name: &'static str,
    display_name: &'static str,
    requires_desktop: bool,
    entries: HashMap<PlatformKind, Entry>,
    probes: HashMap<PlatformKind, Vec<Probe>>,
    default_probes: Vec<Probe>,
    versions: HashMap<PlatformKind, &'static str>,
    default_version: Option<&'static str>,
}

impl InstallerSpec {
    /// Start a spec for the tool `name` (CLI identifier).
    #[must_use]
    pub fn new(name: &'static str, display_name: &'static str) -> Self {
        Self {
            name,
            display_name,
            requires_desktop: false,
            entries: HashMap::new(),
            probes: HashMap::new(),
            default_probes: Vec::new(),
            versions: HashMap::new(),
            default_version: None,
        }
    }

    /// Mark the tool as a GUI application.
    #[must_use]
    pub fn requires_desktop(mut self) -> Self {
        self.requires_desktop = true;
        self
    }

    /// Register `strategy` under every tag in `platforms`.
    #[must_use]
    pub fn on(mut self, platforms: &[PlatformKind], strategy: Strategy) -> Self {
        for platform in platforms {
            self.entries
                .insert(*platform, Entry::Strategy(strategy.clone()));
        }
        self
    }

    /// Record that the tool is known not to be available on `platforms`.
    #[must_use]
    pub fn unavailable_on(mut self, platforms: &[PlatformKind], note: &'static str) -> Self {
        for platform in platforms {
            self.entries.insert(*platform, Entry::Unavailable(note));
        }
        self
    }

    /// Add a detection probe used on platforms without their own list.
    #[must_use]
    pub fn detect(mut self, probe: Probe) -> Self {
        self.default_probes.push(probe);
        self
    }

    /// Add a detection probe for specific platforms.
    ///
    /// Once a platform has its own probes, the default list is not used
    /// for it.
    #[must_use]
    pub fn detect_on(mut self, platforms: &[PlatformKind], probe: Probe) -> Self {
        for platform in platforms {
            self.probes
                .entry(*platform)
                .or_default()
                .push(probe.clone());
        }
        self
    }

    /// Read-only command whose output carries the version.
    #[must_use]
    pub fn version_command(mut self, command: &'static str) -> Self {
        self.default_version = Some(command);
        self
    }

    /// Version command for specific platforms, overriding the default.
    #[must_use]
    pub fn version_command_on(mut self, platforms: &[PlatformKind], command: &'static str) -> Self {
        for platform in platforms {
            self.versions.insert(*platform, command);
        }
        self
    }

    /// CLI identifier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Whether the tool needs a graphical desktop.
    #[must_use]
    pub fn needs_desktop(&self) -> bool {
        self.requires_desktop
    }

    /// The entry for a platform, if any.
    #[must_use]
    pub fn entry(&self, platform: PlatformKind) -> Option<&Entry> {
        self.entries.get(&platform)
    }

    /// The strategy for a platform, if one is registered.
    #[must_use]
    pub fn strategy(&self, platform: PlatformKind) -> Option<&Strategy> {
        match self.entries.get(&platform) {
            Some(Entry::Strategy(s)) => Some(s),
            _ => None,
        }
    }

    /// The "not available" note for a platform, if one is registered.
    #[must_use]
    pub fn unavailable_note(&self, platform: PlatformKind) -> Option<&'static str> {
        match self.entries.get(&platform) {
            Some(Entry::Unavailable(note)) => Some(note),
            _ => None,
        }
    }

    /// Probes for a platform, in priority order.
    #[must_use]
    pub fn probes(&self, platform: PlatformKind) -> &[Probe] {
        self.probes
            .get(&platform)
            .map_or(self.default_probes.as_slice(), Vec::as_slice)
    }

    /// The version command for a platform, if any.
    #[must_use]
    pub fn version_cmd(&self, platform: PlatformKind) -> Option<&'static str> {
        self.versions.get(&platform).copied().or(self.default_version)
    }

    /// Platforms with a registered strategy, in tag order.
    #[must_use]
    pub fn supported_platforms(&self) -> Vec<PlatformKind> {
        PlatformKind::all()
            .iter()
            .copied()
            .filter(|p| self.strategy(*p).is_some())
            .collect()
    }

    /// Check the spec is usable: at least one strategy, and probes for
    /// every platform with a strategy.
    pub fn validate(&self) -> Result<()> {
        let supported = self.supported_platforms();
        if supported.is_empty() {
            return Err(Error::Other(format!(
                "{} has no installer for any platform",
                self.name
            )));
        }
        if let Some(p) = supported.iter().find(|p| self.probes(**p).is_empty()) {
            return Err(Error::Other(format!(
                "{} has no detection probe for {}",
                self.name, p
            )));
        }
        Ok(())
    }
}
