//! Chocolatey adapter.

use crate::backend::{InstallOutput, PackageManager, Shell};
use crate::error::{Result, mentions_checksum_mismatch};
use crate::retry::with_relaxed_retry;
use crate::types::CommandOutput;

/// Chocolatey adapter.
///
/// A package whose checksum no longer matches the vendor download is
/// retried exactly once with `--ignore-checksums`.
#[derive(Debug, Clone, Copy)]
pub struct Choco<'a> {
    shell: Shell<'a>,
}

impl<'a> Choco<'a> {
    /// Create a Chocolatey adapter.
    #[must_use]
    pub fn new(shell: Shell<'a>) -> Self {
        Self { shell }
    }

    /// `choco list` limited to one exact package, machine-readable.
    fn list(&self, package: &str) -> Option<String> {
        let command = format!("choco list --exact {package} --limit-output");
        self.shell
            .query(&command)
            .filter(CommandOutput::success)
            .and_then(|o| parse_list(&o.stdout, package))
    }
}

impl PackageManager for Choco<'_> {
    fn name(&self) -> &'static str {
        "choco"
    }

    fn is_available(&self) -> bool {
        self.shell.host.command_exists("choco")
    }

    fn install_hint(&self) -> &'static str {
        "Install Chocolatey from https://chocolatey.org/install (run from an elevated shell)"
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self.list(package).is_some())
    }

    fn install(&self, package: &str) -> Result<InstallOutput> {
        with_relaxed_retry(
            |attempt| {
                let mut command = format!("choco install {package} -y --no-progress");
                if attempt.is_relaxed() {
                    command.push_str(" --ignore-checksums");
                }
                let output = self.shell.exec(&command)?;
                Ok(InstallOutput { command, output })
            },
            |out| {
                !out.success()
                    && (mentions_checksum_mismatch(&out.output.stdout)
                        || mentions_checksum_mismatch(&out.output.stderr))
            },
        )
    }

    fn get_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self.list(package))
    }
}

/// Find `package|version` in `--limit-output` listing.
fn parse_list(stdout: &str, package: &str) -> Option<String> {
    stdout
        .lines()
        .filter_map(|l| l.trim().split_once('|'))
        .find(|(name, _)| name.eq_ignore_ascii_case(package))
        .map(|(_, version)| version.trim().to_string())
}
