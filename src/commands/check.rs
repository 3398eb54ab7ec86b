//! `dev check <tool>`: read-only detection.

use crate::Context;
use crate::config::Config;
use crate::ui;
use anyhow::{Context as _, Result, bail};
use installkit::{CommandRunner, Dispatcher, Host, InstallerSpec, Platform, SystemRunner};

pub fn run(ctx: &Context, name: &str) -> Result<()> {
    let spec = super::resolve_tools(&[name.to_string()])?
        .into_iter()
        .next()
        .context("No tool given")?;

    let config = Config::load()?;
    let host = super::host(None, &config);
    let runner = SystemRunner::new();
    let platform = host.detect().context("Could not detect the platform")?;

    let status = inspect(&host, &runner, platform, spec);

    if !ctx.quiet {
        ui::header(spec.display_name());
        ui::kv("Platform", &platform.to_string());
        ui::kv(
            "Installer",
            if status.supported {
                "available"
            } else {
                "not available on this platform"
            },
        );
        if let Some(note) = spec.unavailable_note(platform.kind) {
            ui::kv("Note", note);
        }
        if spec.needs_desktop() {
            ui::kv("Requires desktop", "yes");
            ui::kv(
                "Desktop session",
                if status.desktop { "available" } else { "not detected" },
            );
        }
        if ctx.verbose > 0 {
            for probe in spec.probes(platform.kind) {
                ui::kv("Detected by", &probe.to_string());
            }
        }
        println!();
    }

    if status.installed {
        ui::success(&format!(
            "{} is installed{}",
            spec.display_name(),
            status
                .version
                .as_deref()
                .map(|v| format!(" ({v})"))
                .unwrap_or_default()
        ));
        Ok(())
    } else {
        bail!("{} is not installed", spec.display_name());
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Status {
    supported: bool,
    desktop: bool,
    installed: bool,
    version: Option<String>,
}

fn inspect(
    host: &dyn Host,
    runner: &dyn CommandRunner,
    platform: Platform,
    spec: &InstallerSpec,
) -> Status {
    let dispatcher = Dispatcher::new(host, runner);
    let installed = dispatcher.is_installed(spec, platform);
    Status {
        supported: spec.strategy(platform.kind).is_some(),
        desktop: host.is_desktop_available(),
        installed,
        version: if installed {
            dispatcher.installed_version(spec, platform)
        } else {
            None
        },
    }
}
