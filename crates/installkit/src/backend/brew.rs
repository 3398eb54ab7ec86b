//! Homebrew adapter for formulae and casks.

use crate::backend::{InstallOutput, PackageManager, Shell};
use crate::error::Result;

/// Whether a package is a formula or a cask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Formula,
    Cask,
}

impl Kind {
    fn flag(self) -> &'static str {
        match self {
            Self::Formula => "--formula",
            Self::Cask => "--cask",
        }
    }
}

/// Homebrew adapter.
#[derive(Debug, Clone, Copy)]
pub struct Brew<'a> {
    shell: Shell<'a>,
    kind: Kind,
}

impl<'a> Brew<'a> {
    /// Adapter for formulae (`brew install --formula`).
    #[must_use]
    pub fn formula(shell: Shell<'a>) -> Self {
        Self {
            shell,
            kind: Kind::Formula,
        }
    }

    /// Adapter for casks (`brew install --cask`).
    #[must_use]
    pub fn cask(shell: Shell<'a>) -> Self {
        Self {
            shell,
            kind: Kind::Cask,
        }
    }

    /// Query `brew info --json=v2` for one package.
    fn info(&self, package: &str) -> Result<Option<serde_json::Value>> {
        let command = format!("brew info --json=v2 {} {}", self.kind.flag(), package);
        match self.shell.query(&command) {
            Some(output) if output.success() => {
                Ok(serde_json::from_str(&output.stdout).ok())
            }
            _ => Ok(None),
        }
    }
}

impl PackageManager for Brew<'_> {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn is_available(&self) -> bool {
        self.shell.host.command_exists("brew")
    }

    fn install_hint(&self) -> &'static str {
        "Install Homebrew from https://brew.sh"
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self
            .info(package)?
            .is_some_and(|json| installed_version(&json, self.kind).is_some()))
    }

    fn install(&self, package: &str) -> Result<InstallOutput> {
        let command = format!("brew install {} {}", self.kind.flag(), package);
        let output = self.shell.exec(&command)?;
        Ok(InstallOutput { command, output })
    }

    fn get_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self
            .info(package)?
            .and_then(|json| installed_version(&json, self.kind)))
    }
}

/// Extract the installed version from `brew info --json=v2` output.
///
/// Formulae list installs under `formulae[0].installed[].version`; casks
/// carry a single `casks[0].installed` string.
fn installed_version(json: &serde_json::Value, kind: Kind) -> Option<String> {
    match kind {
        Kind::Cask => json["casks"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["installed"].as_str())
            .map(ToString::to_string),
        Kind::Formula => json["formulae"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|f| f["installed"].as_array())
            .and_then(|arr| arr.first())
            .and_then(|i| i["version"].as_str())
            .map(ToString::to_string),
    }
}
