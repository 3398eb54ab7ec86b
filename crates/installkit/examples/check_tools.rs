//! Example: report which catalog tools are present
//!
//! Run with: cargo run -p installkit --example check_tools

use installkit::{Dispatcher, Host, SystemHost, SystemRunner, tools};

fn main() {
    let host = SystemHost::new();
    let runner = SystemRunner::new();

    let platform = match host.detect() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error detecting platform: {}", e);
            std::process::exit(1);
        }
    };

    println!("Platform: {}", platform);
    println!("Desktop:  {}\n", host.is_desktop_available());

    let dispatcher = Dispatcher::new(&host, &runner);
    for spec in tools::all() {
        let status = if spec.strategy(platform.kind).is_none() {
            "n/a".to_string()
        } else if dispatcher.is_installed(spec, platform) {
            dispatcher
                .installed_version(spec, platform)
                .unwrap_or_else(|| "installed".to_string())
        } else {
            "-".to_string()
        };
        println!("  {:<20} {}", spec.display_name(), status);
    }
}
