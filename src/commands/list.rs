//! `dev list`

use crate::Context;
use crate::cli::OutputFormat;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use installkit::{Host, InstallerSpec, PlatformKind, SystemHost, tools};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ToolRow {
    name: &'static str,
    display_name: &'static str,
    requires_desktop: bool,
    /// `None` when the platform could not be detected
    available: Option<bool>,
    platforms: Vec<PlatformKind>,
}

fn rows(specs: &[InstallerSpec], platform: Option<PlatformKind>) -> Vec<ToolRow> {
    specs
        .iter()
        .map(|spec| ToolRow {
            name: spec.name(),
            display_name: spec.display_name(),
            requires_desktop: spec.needs_desktop(),
            available: platform.map(|kind| spec.strategy(kind).is_some()),
            platforms: spec.supported_platforms(),
        })
        .collect()
}

pub fn run(ctx: &Context, format: OutputFormat) -> Result<()> {
    let platform = match SystemHost::new().detect() {
        Ok(p) => Some(p.kind),
        Err(e) => {
            log::warn!("Platform detection failed: {}", e);
            None
        }
    };
    let rows = rows(tools::all(), platform);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if !ctx.quiet {
        match platform {
            Some(kind) => ui::header(&format!("Tools ({kind})")),
            None => ui::header("Tools"),
        }
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in &rows {
        let marker = match row.available {
            Some(true) => "✓".green(),
            Some(false) => "⊘".dimmed(),
            None => "?".yellow(),
        };
        let desktop = if row.requires_desktop { " [desktop]" } else { "" };
        println!(
            "  {} {:<width$}  {}{}",
            marker,
            row.name,
            row.display_name,
            desktop.dimmed()
        );
        if ctx.verbose > 0 {
            let tags: Vec<_> = row.platforms.iter().map(PlatformKind::as_str).collect();
            ui::dim(&format!("    {}", tags.join(", ")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_for_macos() {
        let rows = rows(tools::all(), Some(PlatformKind::Macos));
        assert_eq!(rows.len(), 10);
        let winpty = rows.iter().find(|r| r.name == "winpty").unwrap();
        assert_eq!(winpty.available, Some(false));
        let canary = rows.iter().find(|r| r.name == "chrome-canary").unwrap();
        assert_eq!(canary.available, Some(true));
        assert!(canary.requires_desktop);
    }

    #[test]
    fn test_rows_without_platform() {
        let rows = rows(tools::all(), None);
        assert!(rows.iter().all(|r| r.available.is_none()));
    }

    #[test]
    fn test_rows_serialize() {
        let rows = rows(&[tools::tree::spec()], Some(PlatformKind::Windows));
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["name"], "tree");
        assert_eq!(json[0]["available"], false);
        assert_eq!(json[0]["platforms"][0], "macos");
    }
}
