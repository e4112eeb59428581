//! URL combination helpers for server-relative paths.

use std::path::Path;

/// Join a base URL and a relative part with exactly one slash.
pub fn combine(base: &str, relative: &str) -> String {
    if base.is_empty() {
        return relative.to_string();
    }
    if relative.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches(['/', '\\']),
        relative.trim_start_matches(['/', '\\'])
    )
}

/// Strip scheme and host from an absolute URL, leaving the server-relative
/// path. Already-relative URLs pass through unchanged.
pub fn make_relative(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}

/// Final path component of a local file path.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
