//! User configuration (`config.toml`).
//!
//! ```toml
//! timeout_secs = 900
//! assume_desktop = false
//!
//! [tools.dbeaver]
//! timeout_secs = 1800
//! ```

use crate::paths;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 600;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-command timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Force desktop availability instead of probing the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_desktop: Option<bool>,

    /// Per-tool overrides, keyed by CLI name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, ToolConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            assume_desktop: None,
            tools: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load config.toml from the config directory, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        for (name, tool) in &self.tools {
            if installkit::tools::find(name).is_none() {
                bail!(
                    "Unknown tool in [tools.{}]. Known tools: {}",
                    name,
                    installkit::tools::names().join(", ")
                );
            }
            if tool.timeout_secs == Some(0) {
                bail!("tools.{}.timeout_secs must be greater than zero", name);
            }
        }
        Ok(())
    }

    /// Command timeout for `tool`, falling back to the global value
    pub fn timeout_for(&self, tool: &str) -> Duration {
        // keys may be spelled `beyond_compare` or `Beyond-Compare`
        let secs = self
            .tools
            .iter()
            .find(|(name, _)| {
                installkit::tools::find(name).map(installkit::InstallerSpec::name) == Some(tool)
            })
            .and_then(|(_, t)| t.timeout_secs)
            .unwrap_or(self.timeout_secs);
        Duration::from_secs(secs)
    }
}
