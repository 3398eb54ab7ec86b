//! DNF/YUM adapter for Red Hat family systems.

use crate::backend::{InstallOutput, PackageManager, Shell};
use crate::error::Result;

/// DNF/YUM adapter. The binary comes from the platform hint.
#[derive(Debug, Clone, Copy)]
pub struct Dnf<'a> {
    shell: Shell<'a>,
    binary: &'static str,
}

impl<'a> Dnf<'a> {
    /// Create an adapter driving `binary` (`dnf` or `yum`).
    #[must_use]
    pub fn new(shell: Shell<'a>, binary: &'static str) -> Self {
        Self { shell, binary }
    }

    /// Install a package group (`dnf groupinstall -y "<group>"`).
    pub fn group_install(&self, group: &str) -> Result<InstallOutput> {
        let command = self
            .shell
            .elevated(&format!("{} groupinstall -y \"{group}\"", self.binary));
        let output = self.shell.exec(&command)?;
        Ok(InstallOutput { command, output })
    }
}

impl PackageManager for Dnf<'_> {
    fn name(&self) -> &'static str {
        self.binary
    }

    fn is_available(&self) -> bool {
        self.shell.host.command_exists(self.binary)
    }

    fn install_hint(&self) -> &'static str {
        "dnf or yum ships with Red Hat family systems; check that /usr/bin is on PATH"
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self
            .shell
            .query(&format!("rpm -q {package}"))
            .is_some_and(|o| o.success()))
    }

    /// `package` may be a name or a URL to an `.rpm`.
    fn install(&self, package: &str) -> Result<InstallOutput> {
        let command = self
            .shell
            .elevated(&format!("{} install -y {package}", self.binary));
        let output = self.shell.exec(&command)?;
        Ok(InstallOutput { command, output })
    }

    fn get_version(&self, package: &str) -> Result<Option<String>> {
        Ok(self
            .shell
            .query(&format!("rpm -q --qf '%{{VERSION}}' {package}"))
            .filter(|o| o.success())
            .map(|o| o.stdout.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
