//! `dev install <tool>...`

use crate::Context;
use crate::cli::InstallArgs;
use crate::config::Config;
use crate::{progress, ui};
use anyhow::{Context as _, Result, bail};
use installkit::{
    CommandRunner, Dispatcher, ErrorCategory, ExecOptions, Host, InstallResult, InstallerSpec,
    Platform, SystemRunner,
};
use std::time::Duration;

pub fn run(ctx: &Context, args: &InstallArgs) -> Result<()> {
    let specs = super::resolve_tools(&args.tools)?;
    let config = Config::load()?;

    let host = super::host(args.assume_desktop, &config);
    let platform = host.detect().context("Could not detect the platform")?;
    let runner = SystemRunner::new();

    if !ctx.quiet {
        ui::header(&format!("Installing on {platform}"));
        println!();
    }

    let summary = install_all(ctx, &host, &runner, platform, &specs, |spec| {
        args.timeout
            .map_or_else(|| config.timeout_for(spec.name()), Duration::from_secs)
    });

    if !ctx.quiet {
        summary.print();
    }

    if summary.failed > 0 {
        bail!("{} tool(s) failed to install", summary.failed);
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    installed: usize,
    already_installed: usize,
    unsupported: usize,
    failed: usize,
}

impl Summary {
    fn record(&mut self, result: &InstallResult) {
        match result {
            InstallResult::Installed { .. } => self.installed += 1,
            InstallResult::AlreadyInstalled { .. } => self.already_installed += 1,
            InstallResult::Unsupported { .. } => self.unsupported += 1,
            InstallResult::Failed { .. } => self.failed += 1,
        }
    }

    fn print(&self) {
        println!();
        ui::header("Summary");
        ui::kv("Installed", &self.installed.to_string());
        ui::kv("Already installed", &self.already_installed.to_string());
        if self.unsupported > 0 {
            ui::kv("Unsupported", &self.unsupported.to_string());
        }
        if self.failed > 0 {
            ui::kv("Failed", &self.failed.to_string());
        }
    }
}

/// Install each tool in turn. Never stops early: a failure is reported and
/// the next tool still runs.
fn install_all(
    ctx: &Context,
    host: &dyn Host,
    runner: &dyn CommandRunner,
    platform: Platform,
    specs: &[&InstallerSpec],
    timeout: impl Fn(&InstallerSpec) -> Duration,
) -> Summary {
    let mut summary = Summary::default();

    for spec in specs {
        let limit = timeout(spec);
        log::debug!("{}: command timeout {}s", spec.name(), limit.as_secs());
        let dispatcher =
            Dispatcher::new(host, runner).with_options(ExecOptions::new().timeout(limit));

        let pb = progress::spinner(&format!("Installing {}", spec.display_name()), ctx.quiet);
        let result = dispatcher.install(spec, platform);
        pb.finish_and_clear();

        report(ctx, host, spec, platform, &result);
        summary.record(&result);
    }

    summary
}

fn report(
    ctx: &Context,
    host: &dyn Host,
    spec: &InstallerSpec,
    platform: Platform,
    result: &InstallResult,
) {
    match result {
        InstallResult::Failed { category, reason } => {
            ui::report(spec.display_name(), result);
            for line in reason.lines().skip_while(|l| l.trim().is_empty()).skip(1) {
                eprintln!("    {line}");
            }
            if !ctx.quiet {
                let (advice, rest) = failure_hints(spec, *category);
                if category.is_user_fixable() {
                    ui::warn(&advice);
                } else {
                    ui::dim(&advice);
                }
                for hint in rest {
                    ui::dim(&hint);
                }
            }
        }
        InstallResult::Unsupported { .. } if !ctx.quiet => {
            ui::report(spec.display_name(), result);
            if let Some(note) = spec.unavailable_note(platform.kind) {
                ui::dim(note);
            } else if spec.strategy(platform.kind).is_some()
                && spec.needs_desktop()
                && !host.is_desktop_available()
            {
                ui::dim("Needs a graphical desktop session (override with --assume-desktop true)");
            }
        }
        _ if !ctx.quiet => ui::report(spec.display_name(), result),
        _ => {}
    }
}

/// Advice for a failed install, plus any follow-up notes.
fn failure_hints(spec: &InstallerSpec, category: ErrorCategory) -> (String, Vec<String>) {
    let mut rest = Vec::new();
    if category.is_partial() {
        rest.push(format!(
            "Changes may be partially applied; run `dev install {}` again once resolved",
            spec.name()
        ));
    }
    (category.advice().to_string(), rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use installkit::{CommandOutput, MockSystem, PlatformKind, tools};

    const QUIET: Context = Context {
        verbose: 0,
        quiet: true,
    };

    fn specs(names: &[&str]) -> Vec<&'static InstallerSpec> {
        names.iter().map(|n| tools::find(n).unwrap()).collect()
    }

    #[test]
    fn test_install_all_continues_after_unsupported() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .with_command("apt-get")
            .on("apt-get install -y tree", CommandOutput::ok(""))
            .installs_command("apt-get install -y tree", "tree");

        let summary = install_all(
            &QUIET,
            &sys,
            &sys,
            sys.platform(),
            &specs(&["winpty", "tree"]),
            |_| Duration::from_secs(5),
        );

        assert_eq!(
            summary,
            Summary {
                installed: 1,
                unsupported: 1,
                ..Summary::default()
            }
        );
        assert_eq!(sys.count("apt-get install"), 1);
    }

    #[test]
    fn test_install_all_counts_failures() {
        let sys = MockSystem::new(PlatformKind::Ubuntu)
            .as_root()
            .with_command("apt-get")
            .with_command("tmux")
            .on("apt-get install", CommandOutput::failed(100, "E: Unable to locate package tree"));

        let summary = install_all(
            &QUIET,
            &sys,
            &sys,
            sys.platform(),
            &specs(&["tree", "tmux"]),
            |_| Duration::from_secs(5),
        );

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.already_installed, 1);
    }

    #[test]
    fn test_headless_desktop_tool_is_unsupported() {
        let sys = MockSystem::new(PlatformKind::Macos)
            .without_desktop()
            .with_command("brew");

        let summary = install_all(
            &QUIET,
            &sys,
            &sys,
            sys.platform(),
            &specs(&["chrome-canary", "dbeaver"]),
            |_| Duration::from_secs(5),
        );

        assert_eq!(summary.unsupported, 2);
        assert!(sys.calls().is_empty());
    }

    #[test]
    fn test_timeout_hint_mentions_rerun() {
        let spec = tools::find("dbeaver").unwrap();
        let (advice, rest) = failure_hints(spec, ErrorCategory::Timeout);
        assert!(advice.contains("--timeout"));
        assert_eq!(rest.len(), 1);
        assert!(rest[0].contains("dev install dbeaver"));
    }

    #[test]
    fn test_prerequisite_hint_has_no_rerun_note() {
        let spec = tools::find("yarn").unwrap();
        let (advice, rest) = failure_hints(spec, ErrorCategory::Prerequisite);
        assert!(advice.contains("prerequisite"));
        assert!(rest.is_empty());
        assert!(ErrorCategory::Prerequisite.is_user_fixable());
    }
}
