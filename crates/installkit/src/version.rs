//! Version string extraction.

use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)+(?:[-+~][0-9A-Za-z.]+)?").expect("version regex is valid")
});

/// Pull the first dotted version number out of free-form tool output.
///
/// ```
/// use installkit::version::extract_version;
///
/// assert_eq!(extract_version("tree v2.1.1 (c) 1996 - 2023"), Some("2.1.1".to_string()));
/// assert_eq!(extract_version("tmux 3.4"), Some("3.4".to_string()));
/// assert_eq!(extract_version("no digits here"), None);
/// ```
#[must_use]
pub fn extract_version(text: &str) -> Option<String> {
    VERSION_RE.find(text).map(|m| m.as_str().to_string())
}
