//! winget adapter. Packages are addressed by their exact winget id.

use crate::backend::{InstallOutput, PackageManager, Shell};
use crate::error::Result;
use crate::version::extract_version;

/// winget adapter.
#[derive(Debug, Clone, Copy)]
pub struct Winget<'a> {
    shell: Shell<'a>,
}

impl<'a> Winget<'a> {
    /// Create a winget adapter.
    #[must_use]
    pub fn new(shell: Shell<'a>) -> Self {
        Self { shell }
    }

    /// The `winget list` row for `id`, if installed.
    fn row(&self, id: &str) -> Option<String> {
        let command = format!("winget list --id {id} --exact --accept-source-agreements");
        let output = self.shell.query(&command).filter(|o| o.success())?;
        output
            .stdout
            .lines()
            .find(|l| l.to_lowercase().contains(&id.to_lowercase()))
            .map(ToString::to_string)
    }
}

impl PackageManager for Winget<'_> {
    fn name(&self) -> &'static str {
        "winget"
    }

    fn is_available(&self) -> bool {
        self.shell.host.command_exists("winget")
    }

    fn install_hint(&self) -> &'static str {
        "Install App Installer from the Microsoft Store to get winget"
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self.row(package).is_some())
    }

    fn install(&self, package: &str) -> Result<InstallOutput> {
        let command = format!(
            "winget install --id {package} --exact --silent --accept-package-agreements --accept-source-agreements"
        );
        let output = self.shell.exec(&command)?;
        Ok(InstallOutput { command, output })
    }

    fn get_version(&self, package: &str) -> Result<Option<String>> {
        // Row layout: Name  Id  Version  [Available]  Source
        Ok(self.row(package).and_then(|row| {
            let after_id = row
                .to_lowercase()
                .find(&package.to_lowercase())
                .map(|i| row[i + package.len()..].to_string())?;
            extract_version(&after_id)
        }))
    }
}
