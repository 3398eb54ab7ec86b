pub mod check;
pub mod install;
pub mod list;
pub mod platform;

use crate::config::Config;
use anyhow::{Result, bail};
use installkit::{InstallerSpec, SystemHost, tools};

/// The real host, with desktop detection overridden by the flag, else by config.
pub fn host(assume_desktop: Option<bool>, config: &Config) -> SystemHost {
    SystemHost::new().assume_desktop(assume_desktop.or(config.assume_desktop))
}

/// Resolve tool names from the command line, in order, without duplicates.
///
/// Any unknown name fails the whole invocation before anything runs.
pub fn resolve_tools(names: &[String]) -> Result<Vec<&'static InstallerSpec>> {
    let mut specs: Vec<&'static InstallerSpec> = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();

    for name in names {
        match tools::find(name) {
            Some(spec) if specs.iter().any(|s| s.name() == spec.name()) => {
                log::debug!("Ignoring duplicate tool: {}", name);
            }
            Some(spec) => specs.push(spec),
            None => unknown.push(name.as_str()),
        }
    }

    if !unknown.is_empty() {
        bail!(
            "Unknown tool(s): {}. Run 'dev list' to see available tools ({})",
            unknown.join(", "),
            tools::names().join(", ")
        );
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_resolve_keeps_order_and_dedups() {
        let specs = resolve_tools(&args(&["tmux", "tree", "TMUX"])).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["tmux", "tree"]);
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        let err = resolve_tools(&args(&["tree", "emacs", "vim"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("emacs, vim"));
        assert!(msg.contains("beyond-compare"));
    }

    #[test]
    fn test_host_uses_config_desktop_setting() {
        use installkit::Host;

        let config = Config {
            assume_desktop: Some(false),
            ..Config::default()
        };
        assert!(!host(None, &config).is_desktop_available());
        assert!(host(Some(true), &config).is_desktop_available());

        let config = Config {
            assume_desktop: Some(true),
            ..Config::default()
        };
        assert!(host(None, &config).is_desktop_available());
    }
}
