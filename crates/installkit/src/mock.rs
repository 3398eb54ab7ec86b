//! In-memory host and command runner for tests.
//!
//! [`MockSystem`] implements both [`Host`] and [`CommandRunner`], so a whole
//! install can run without touching the machine:
//!
//! ```
//! use installkit::{CommandOutput, MockSystem, PlatformKind};
//!
//! let sys = MockSystem::new(PlatformKind::Ubuntu)
//!     .with_command("apt-get")
//!     .on("apt-get install -y tree", CommandOutput::ok(""))
//!     .installs_command("apt-get install -y tree", "tree");
//!
//! let out = sys.shell().exec("sudo apt-get install -y tree").unwrap();
//! assert!(out.success());
//! assert!(installkit::Host::command_exists(&sys, "tree"));
//! assert_eq!(sys.count("apt-get install"), 1);
//! ```
//!
//! Rules match by substring; the first registered rule wins. Commands with
//! no rule exit 127.

use crate::backend::Shell;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::host::Host;
use crate::runner::CommandRunner;
use crate::types::{CommandOutput, ExecOptions, PackageManagerHint, Platform, PlatformKind};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Effect {
    Command(String),
    Path(PathBuf),
    Output(Rule),
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    output: CommandOutput,
}

/// Scripted host for tests.
#[derive(Debug)]
pub struct MockSystem {
    platform: Platform,
    desktop: bool,
    root: bool,
    home: Option<PathBuf>,
    env: HashMap<String, String>,
    rules: Mutex<Vec<Rule>>,
    effects: Vec<(String, Effect)>,
    commands: Mutex<HashSet<String>>,
    paths: Mutex<HashSet<PathBuf>>,
    calls: Mutex<Vec<String>>,
}

impl MockSystem {
    /// A bare machine of the given kind with a desktop and a home directory.
    #[must_use]
    pub fn new(kind: PlatformKind) -> Self {
        let home = if kind == PlatformKind::Macos {
            "/Users/dev"
        } else {
            "/home/dev"
        };
        let mut env = HashMap::new();
        env.insert("HOME".to_string(), home.to_string());
        Self {
            platform: Platform::new(kind),
            desktop: true,
            root: false,
            home: Some(PathBuf::from(home)),
            env,
            rules: Mutex::new(Vec::new()),
            effects: Vec::new(),
            commands: Mutex::new(HashSet::new()),
            paths: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the RPM package manager hint.
    #[must_use]
    pub fn with_package_manager(mut self, hint: PackageManagerHint) -> Self {
        self.platform = self.platform.with_package_manager(hint);
        self
    }

    /// Headless machine.
    #[must_use]
    pub fn without_desktop(mut self) -> Self {
        self.desktop = false;
        self
    }

    /// Running as root / administrator.
    #[must_use]
    pub fn as_root(mut self) -> Self {
        self.root = true;
        self
    }

    /// Override the home directory (and `$HOME`).
    #[must_use]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        self.env
            .insert("HOME".to_string(), home.to_string_lossy().into_owned());
        self.home = Some(home);
        self
    }

    /// Set an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Put an executable on PATH.
    #[must_use]
    pub fn with_command(self, name: &str) -> Self {
        self.commands.lock().unwrap().insert(name.to_string());
        self
    }

    /// Create a filesystem path.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        self.paths.lock().unwrap().insert(path.into());
        self
    }

    /// Script the output of commands containing `pattern`.
    #[must_use]
    pub fn on(self, pattern: &str, output: CommandOutput) -> Self {
        self.rules.lock().unwrap().push(Rule {
            pattern: pattern.to_string(),
            output,
        });
        self
    }

    /// When a command containing `pattern` succeeds, put `name` on PATH.
    #[must_use]
    pub fn installs_command(mut self, pattern: &str, name: &str) -> Self {
        self.effects
            .push((pattern.to_string(), Effect::Command(name.to_string())));
        self
    }

    /// When a command containing `pattern` succeeds, create `path`.
    #[must_use]
    pub fn installs_path(mut self, pattern: &str, path: impl Into<PathBuf>) -> Self {
        self.effects
            .push((pattern.to_string(), Effect::Path(path.into())));
        self
    }

    /// When a command containing `trigger` succeeds, commands containing
    /// `pattern` answer `output` from then on, ahead of earlier rules.
    #[must_use]
    pub fn installs_output(mut self, trigger: &str, pattern: &str, output: CommandOutput) -> Self {
        self.effects.push((
            trigger.to_string(),
            Effect::Output(Rule {
                pattern: pattern.to_string(),
                output,
            }),
        ));
        self
    }

    /// The scripted platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// A shell over this mock with default options.
    #[must_use]
    pub fn shell(&self) -> Shell<'_> {
        Shell::new(self, self, ExecOptions::new())
    }

    /// A dispatcher over this mock.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self, self)
    }

    /// Every command executed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of executed commands containing `pattern`.
    #[must_use]
    pub fn count(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }
}

impl Host for MockSystem {
    fn detect(&self) -> Result<Platform> {
        Ok(self.platform)
    }

    fn is_desktop_available(&self) -> bool {
        self.desktop
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }

    fn command_exists(&self, name: &str) -> bool {
        self.commands.lock().unwrap().contains(name)
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.paths.lock().unwrap().contains(path)
    }

    fn is_root(&self) -> bool {
        self.root
    }
}

impl CommandRunner for MockSystem {
    fn exec(&self, command: &str, _options: &ExecOptions) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());

        let output = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| command.contains(&r.pattern))
            .map_or_else(
                || CommandOutput::failed(127, format!("{command}: command not found")),
                |r| r.output.clone(),
            );

        if output.success() {
            for (pattern, effect) in &self.effects {
                if !command.contains(pattern.as_str()) {
                    continue;
                }
                match effect {
                    Effect::Command(name) => {
                        self.commands.lock().unwrap().insert(name.clone());
                    }
                    Effect::Path(path) => {
                        self.paths.lock().unwrap().insert(path.clone());
                    }
                    Effect::Output(rule) => {
                        self.rules.lock().unwrap().insert(0, rule.clone());
                    }
                }
            }
        }

        Ok(output)
    }
}
