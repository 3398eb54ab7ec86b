//! `dev platform`

use crate::Context;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::ui;
use anyhow::{Context as _, Result};
use installkit::{Host, PackageManagerHint, PlatformKind};
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Serialize)]
struct PlatformReport {
    platform: PlatformKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_manager: Option<PackageManagerHint>,
    desktop: bool,
    root: bool,
}

fn report(host: &dyn Host) -> Result<PlatformReport> {
    let platform = host.detect().context("Could not detect the platform")?;
    Ok(PlatformReport {
        platform: platform.kind,
        package_manager: platform.package_manager,
        desktop: host.is_desktop_available(),
        root: host.is_root(),
    })
}

pub fn run(ctx: &Context, format: OutputFormat) -> Result<()> {
    let report = report(&super::host(None, &Config::load()?))?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if ctx.quiet {
        println!("{}", report.platform);
        return Ok(());
    }

    ui::header("Platform");
    ui::kv("Tag", report.platform.as_str());
    if let Some(hint) = report.package_manager {
        ui::kv("Package manager", hint.binary());
    }
    ui::kv("Desktop", if report.desktop { "yes" } else { "no" });
    ui::kv("Elevated", if report.root { "yes" } else { "no" });
    Ok(())
}
