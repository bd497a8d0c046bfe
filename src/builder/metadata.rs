//! Metadata normalization
//!
//! Renderers report the same facts under different keys. Normalization
//! copies the source metadata and writes the canonical keys on top.

use serde_json::Value;

use super::failure::metadata_status_code;
use crate::document::{JsonMap, RawCrawlOutcome};
use crate::utils::urls_equivalent;

/// Title keys in lookup order
const TITLE_KEYS: &[&str] = &["title", "og:title", "og_title", "twitter:title", "page_title"];

/// Metadata keys that may carry the requested URL
const REQUEST_URL_KEYS: &[&str] = &["requested_url", "request_url", "source_url"];

/// Metadata keys that may carry the resolved URL
const RESOLVED_URL_KEYS: &[&str] = &["resolved_url", "final_url", "redirected_url"];

fn string_value<'a>(metadata: &'a JsonMap, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn first_string<'a>(metadata: &'a JsonMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| string_value(metadata, key))
}

/// Requested URL: explicit argument, then the outcome's own fields, then
/// metadata, then the resolved URL as a last resort.
pub(crate) fn resolve_request_url(raw: &RawCrawlOutcome, explicit: Option<&str>) -> Option<String> {
    let non_blank = |s: &str| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    explicit
        .and_then(non_blank)
        .or_else(|| raw.url.as_deref().and_then(non_blank))
        .or_else(|| first_string(&raw.metadata, REQUEST_URL_KEYS).map(str::to_string))
        .or_else(|| raw.redirected_url.as_deref().and_then(non_blank))
        .or_else(|| first_string(&raw.metadata, RESOLVED_URL_KEYS).map(str::to_string))
}

/// Resolved URL: the outcome's redirect target, then metadata, then the
/// requested URL.
pub(crate) fn resolve_final_url(raw: &RawCrawlOutcome, request_url: &str) -> String {
    raw.redirected_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| first_string(&raw.metadata, RESOLVED_URL_KEYS))
        .unwrap_or(request_url)
        .to_string()
}

/// Title through the fallback chain
pub(crate) fn resolve_title(metadata: &JsonMap) -> Option<String> {
    first_string(metadata, TITLE_KEYS).map(str::to_string)
}

/// Collapse internal whitespace runs to single spaces
fn clean_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Copy source metadata and write the canonical URL, status, and title keys.
///
/// Existing values are kept for `status_code`, `title`, `title_original`,
/// `title_clean`, and `resolved_source_url`; the URL keys are always
/// overwritten.
pub(crate) fn normalize_metadata(
    raw: &RawCrawlOutcome,
    request_url: &str,
    final_url: &str,
) -> JsonMap {
    let mut metadata = raw.metadata.clone();

    if metadata_status_code(&metadata).is_none() {
        if let Some(code) = raw.status_code {
            metadata.insert("status_code".into(), Value::from(code));
        }
    }

    metadata.insert("requested_url".into(), Value::from(request_url));
    metadata.insert("resolved_url".into(), Value::from(final_url));
    metadata.insert("source_url".into(), Value::from(request_url));
    if !urls_equivalent(request_url, final_url) {
        metadata
            .entry("resolved_source_url")
            .or_insert_with(|| Value::from(final_url));
    }

    if let Some(title) = resolve_title(&metadata) {
        let missing = |metadata: &JsonMap, key: &str| string_value(metadata, key).is_none();
        if missing(&metadata, "title") {
            metadata.insert("title".into(), Value::from(title.as_str()));
        }
        if missing(&metadata, "title_original") {
            metadata.insert("title_original".into(), Value::from(title.as_str()));
        }
        if missing(&metadata, "title_clean") {
            metadata.insert("title_clean".into(), Value::from(clean_title(&title)));
        }
    }

    metadata
}
