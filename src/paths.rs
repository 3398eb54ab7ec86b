//! Path resolution for devstrap
//!
//! # Environment Variables
//!
//! - `DEVSTRAP_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/devstrap`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `DEVSTRAP_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/devstrap` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\devstrap`
//!    - macOS/Linux: `~/.config/devstrap`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "DEVSTRAP_CONFIG_DIR";

const APP_DIR: &str = "devstrap";

/// Get the devstrap config directory path
pub fn config_dir() -> Result<PathBuf> {
    resolve_config_dir(|key| std::env::var(key).ok(), dirs::home_dir())
}

/// Get the path of the main config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn resolve_config_dir(
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    // 1. Explicit override
    if let Some(dir) = env(ENV_CONFIG_DIR).filter(|d| !d.is_empty()) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    // 2. XDG_CONFIG_HOME
    if let Some(xdg_config) = env("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. Platform default
    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join(APP_DIR);
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = home.context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables leave the input unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
