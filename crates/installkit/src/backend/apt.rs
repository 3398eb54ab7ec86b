//! APT adapter for Debian-family systems.

use crate::backend::{InstallOutput, PackageManager, Shell};
use crate::error::Result;

/// APT adapter.
///
/// Installs go through `apt-get` with `sudo` (unless root); queries go
/// through `dpkg-query` and never need privileges.
#[derive(Debug, Clone, Copy)]
pub struct Apt<'a> {
    shell: Shell<'a>,
}

impl<'a> Apt<'a> {
    /// Create an APT adapter.
    #[must_use]
    pub fn new(shell: Shell<'a>) -> Self {
        Self { shell }
    }

    /// Refresh package lists (`apt-get update`).
    pub fn update(&self) -> Result<()> {
        self.shell.run(&self.shell.elevated("apt-get update"))?;
        Ok(())
    }
}

impl PackageManager for Apt<'_> {
    fn name(&self) -> &'static str {
        "apt-get"
    }

    fn is_available(&self) -> bool {
        self.shell.host.command_exists("apt-get")
    }

    fn install_hint(&self) -> &'static str {
        "APT ships with Debian-based systems; check that /usr/bin is on PATH"
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        let command = format!("dpkg-query -W -f='${{Status}}' {package}");
        Ok(self
            .shell
            .query(&command)
            .is_some_and(|o| o.success() && o.stdout.contains("install ok installed")))
    }

    fn install(&self, package: &str) -> Result<InstallOutput> {
        let command = self
            .shell
            .elevated(&format!("apt-get install -y {package}"));
        let output = self.shell.exec(&command)?;
        Ok(InstallOutput { command, output })
    }

    fn get_version(&self, package: &str) -> Result<Option<String>> {
        if !self.is_installed(package)? {
            return Ok(None);
        }
        let command = format!("dpkg-query -W -f='${{Version}}' {package}");
        Ok(self
            .shell
            .query(&command)
            .filter(|o| o.success())
            .map(|o| o.stdout.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
