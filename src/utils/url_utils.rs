//! URL utilities.
//!
//! Helpers for comparing crawl URLs and deriving output file names from them.

use url::Url;

use super::constants::MAX_FILENAME_CHARS;
use super::string_utils::safe_truncate_chars;

/// Check if a URL is a crawlable http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Compare two URLs after parsing.
///
/// `https://example.com` and `https://example.com/` are equivalent; so are
/// URLs that differ only in host case or default port. Unparseable input
/// falls back to a trimmed string comparison.
#[must_use]
pub fn urls_equivalent(a: &str, b: &str) -> bool {
    match (Url::parse(a.trim()), Url::parse(b.trim())) {
        (Ok(left), Ok(right)) => left == right,
        _ => a.trim() == b.trim(),
    }
}

/// Convert a URL into a file stem safe for any filesystem.
///
/// The host (with port) has `.` and `:` replaced by `_`, the path has `/`
/// replaced by `_`, and an empty path becomes `index`. The result is
/// capped at [`MAX_FILENAME_CHARS`] characters.
///
/// ```
/// # use crawldoc::utils::url_to_filename;
/// assert_eq!(url_to_filename("https://docs.example.com/guide/intro/"), "docs_example_com_guide_intro");
/// assert_eq!(url_to_filename("http://localhost:8080/"), "localhost_8080_index");
/// ```
#[must_use]
pub fn url_to_filename(url: &str) -> String {
    let stem = match Url::parse(url) {
        Ok(parsed) => {
            let mut host = parsed.host_str().unwrap_or_default().to_string();
            if let Some(port) = parsed.port() {
                host.push(':');
                host.push_str(&port.to_string());
            }
            let host = host.replace([':', '.'], "_");

            let path = parsed.path().trim_matches('/').replace('/', "_");
            let path = if path.is_empty() { "index".to_string() } else { path };

            format!("{host}_{path}")
        }
        Err(_) => url
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
    };

    safe_truncate_chars(&stem, MAX_FILENAME_CHARS).to_string()
}
