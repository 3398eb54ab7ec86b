//! The catalog of installable tools.
//!
//! Each submodule exposes a `spec()` describing one tool. [`all`] builds the
//! catalog once; [`find`] resolves the name given on the command line.
//!
//! | Tool                | Desktop | Sources                                        |
//! |---------------------|---------|------------------------------------------------|
//! | `beyond-compare`    | yes     | brew cask, vendor .deb/.rpm, choco             |
//! | `chrome-canary`     | yes     | brew cask, winget                              |
//! | `dbeaver`           | yes     | brew cask, vendor APT repo, vendor .rpm, choco |
//! | `development-tools` | no      | Xcode CLT, build-essential, dnf group          |
//! | `nvm`               | no      | vendor install script, choco (nvm-windows)     |
//! | `tmux`              | no      | brew, apt, dnf/yum                             |
//! | `tree`              | no      | brew, apt, dnf/yum                             |
//! | `unzip`             | no      | brew, apt, dnf/yum, choco                      |
//! | `winpty`            | no      | choco                                          |
//! | `yarn`              | no      | brew, npm, choco                               |

pub mod beyond_compare;
pub mod chrome_canary;
pub mod dbeaver;
pub mod development_tools;
pub mod nvm;
pub mod tmux;
pub mod tree;
pub mod unzip;
pub mod winpty;
pub mod yarn;

use crate::context::InstallContext;
use crate::error::{Error, Result};
use crate::registry::{InstallerSpec, Prerequisite};
use crate::types::PlatformKind;
use std::path::Path;
use std::sync::LazyLock;

/// Debian-family tags with desktop packages (amd64).
pub(crate) const DEBIAN_LIKE: &[PlatformKind] =
    &[PlatformKind::Ubuntu, PlatformKind::Debian, PlatformKind::Wsl];

/// Every tag that installs through APT.
pub(crate) const APT: &[PlatformKind] = &[
    PlatformKind::Ubuntu,
    PlatformKind::Debian,
    PlatformKind::Wsl,
    PlatformKind::Raspbian,
];

/// Every tag that installs through DNF/YUM.
pub(crate) const RPM: &[PlatformKind] = &[
    PlatformKind::AmazonLinux,
    PlatformKind::Rhel,
    PlatformKind::Fedora,
];

/// Every Linux tag.
pub(crate) const LINUX: &[PlatformKind] = &[
    PlatformKind::Ubuntu,
    PlatformKind::Debian,
    PlatformKind::Wsl,
    PlatformKind::Raspbian,
    PlatformKind::AmazonLinux,
    PlatformKind::Rhel,
    PlatformKind::Fedora,
];

/// Native Windows and Git Bash.
pub(crate) const WINDOWS: &[PlatformKind] = &[PlatformKind::Windows, PlatformKind::Gitbash];

pub(crate) const CURL: Prerequisite = Prerequisite::Command {
    name: "curl",
    hint: "Install curl with your system package manager",
};

static CATALOG: LazyLock<Vec<InstallerSpec>> = LazyLock::new(|| {
    vec![
        beyond_compare::spec(),
        chrome_canary::spec(),
        dbeaver::spec(),
        development_tools::spec(),
        nvm::spec(),
        tmux::spec(),
        tree::spec(),
        unzip::spec(),
        winpty::spec(),
        yarn::spec(),
    ]
});

/// Every tool, sorted by name.
#[must_use]
pub fn all() -> &'static [InstallerSpec] {
    &CATALOG
}

/// Look up a tool by CLI name. Case and `_`/`-` are ignored.
#[must_use]
pub fn find(name: &str) -> Option<&'static InstallerSpec> {
    let wanted = normalize(name);
    CATALOG.iter().find(|spec| normalize(spec.name()) == wanted)
}

/// CLI names of every tool.
#[must_use]
pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(InstallerSpec::name).collect()
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// Download `url` to a per-process scratch file, hand its path to
/// `install`, and remove the file afterwards whatever the outcome.
pub(crate) fn with_download<F>(ctx: &InstallContext<'_>, url: &str, file_name: &str, install: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<()>,
{
    let path = ctx.temp_path(file_name);
    let path_str = path.to_string_lossy().into_owned();
    let result = ctx
        .run(&format!("curl -fsSL -o \"{path_str}\" {url}"))
        .and_then(|_| install(&path_str));
    remove_download(&path);
    result
}

fn remove_download(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("{}", Error::io(path, e)),
    }
}
