//! # installkit
//!
//! Platform-dispatched installers for developer tools.
//!
//! This crate provides:
//! - Platform detection (`macos`, `ubuntu`, `wsl`, `rhel`, `windows`, ...)
//! - Adapters over Homebrew, APT, DNF/YUM, Chocolatey and winget
//! - A registry mapping platform tags to install strategies
//! - A dispatcher that runs one strategy and normalizes its outcome
//! - The catalog of supported tools
//!
//! ## Example
//!
//! ```no_run
//! use installkit::{Dispatcher, Host, SystemHost, SystemRunner, tools};
//!
//! let host = SystemHost::new();
//! let runner = SystemRunner::new();
//! let platform = host.detect().expect("unsupported platform");
//!
//! let spec = tools::find("tree").expect("unknown tool");
//! let result = Dispatcher::new(&host, &runner).install(spec, platform);
//! println!("{}: {}", spec.display_name(), result);
//! ```
//!
//! ## Testing
//!
//! [`MockSystem`] stands in for both the host and the command runner and
//! records every command, so strategies can be exercised end to end:
//!
//! ```
//! use installkit::{CommandOutput, InstallResult, MockSystem, PlatformKind, tools};
//!
//! let sys = MockSystem::new(PlatformKind::Macos);
//! let result = sys
//!     .dispatcher()
//!     .install(tools::find("winpty").unwrap(), sys.platform());
//!
//! assert_eq!(result, InstallResult::Unsupported { platform: PlatformKind::Macos });
//! assert!(sys.calls().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod mock;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod tools;
pub mod types;
pub mod version;

pub use backend::{InstallOutput, Manager, PackageManager, Shell};
pub use context::InstallContext;
pub use dispatch::Dispatcher;
pub use error::{Error, ErrorCategory, Result};
pub use host::{Host, SystemHost};
pub use mock::MockSystem;
pub use probe::Probe;
pub use registry::{Entry, InstallerSpec, Prerequisite, Strategy};
pub use runner::{CommandRunner, SystemRunner};
pub use types::{
    CommandOutput, ExecOptions, InstallResult, PackageManagerHint, Platform, PlatformKind,
};
