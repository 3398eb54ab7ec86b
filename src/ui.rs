use colored::Colorize;
use installkit::InstallResult;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// One-line description of an install outcome, without the tool name.
pub fn outcome(result: &InstallResult) -> String {
    match result {
        InstallResult::Installed { version } => {
            with_version("installed", version.as_deref())
        }
        InstallResult::AlreadyInstalled { version } => {
            with_version("already installed", version.as_deref())
        }
        InstallResult::Unsupported { platform } => format!("not supported on {platform}"),
        InstallResult::Failed { reason, .. } => first_line(reason).to_string(),
    }
}

/// Print an install outcome with the marker matching its kind.
pub fn report(display_name: &str, result: &InstallResult) {
    let line = format!("{}: {}", display_name, outcome(result));
    match result {
        InstallResult::Installed { .. } => success(&line),
        InstallResult::AlreadyInstalled { .. } => dim(&line),
        InstallResult::Unsupported { .. } => warn(&line),
        InstallResult::Failed { .. } => error(&line),
    }
}

fn with_version(label: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!("{label} ({v})"),
        None => label.to_string(),
    }
}

/// First non-empty line of a multi-line message.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use installkit::{ErrorCategory, PlatformKind};

    #[test]
    fn test_outcome_with_version() {
        let result = InstallResult::Installed {
            version: Some("3.4".to_string()),
        };
        assert_eq!(outcome(&result), "installed (3.4)");
    }

    #[test]
    fn test_outcome_without_version() {
        let result = InstallResult::AlreadyInstalled { version: None };
        assert_eq!(outcome(&result), "already installed");
    }

    #[test]
    fn test_outcome_unsupported() {
        let result = InstallResult::Unsupported {
            platform: PlatformKind::Gitbash,
        };
        assert_eq!(outcome(&result), "not supported on gitbash");
    }

    #[test]
    fn test_outcome_failed_uses_first_line() {
        let result = InstallResult::Failed {
            category: ErrorCategory::Command,
            reason: "\ncommand failed (exit 100)\nE: Unable to locate package".to_string(),
        };
        assert_eq!(outcome(&result), "command failed (exit 100)");
    }

    #[test]
    fn test_first_line_empty() {
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("  \n  "), "");
    }
}
