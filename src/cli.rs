use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "dev")]
#[command(version)]
#[command(about = "Install developer tools the same way on macOS, Linux and Windows", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install one or more tools
    Install(InstallArgs),

    /// Report whether a tool is installed, and its version
    Check {
        /// Tool name (see `dev list`)
        tool: String,
    },

    /// List installable tools and where they are supported
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the detected platform
    Platform {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
pub struct InstallArgs {
    /// Tools to install, in order (see `dev list`)
    #[arg(required = true, value_name = "TOOL")]
    pub tools: Vec<String>,

    /// Kill any single command after this many seconds
    #[arg(long, value_name = "SECS", env = "DEVSTRAP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Treat the session as having (or lacking) a graphical desktop
    #[arg(long, value_name = "BOOL")]
    pub assume_desktop: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
