//! Human-readable failure reasons for unsuccessful crawls

use reqwest::StatusCode;
use serde_json::Value;

use crate::document::{JsonMap, RawCrawlOutcome, types::non_blank};

/// Read a status code stored either as a number or a numeric string.
pub(crate) fn metadata_status_code(metadata: &JsonMap) -> Option<u16> {
    match metadata.get("status_code")? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `HTTP 404 Not Found`, or `HTTP 599` for codes without a canonical reason
pub(crate) fn describe_status(code: u16) -> String {
    match StatusCode::from_u16(code).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("HTTP {code} {reason}"),
        None => format!("HTTP {code}"),
    }
}

/// Derive the failure reason, first match wins:
///
/// 1. the renderer's explicit error message
/// 2. an HTTP error status (4xx/5xx)
/// 3. `crawl_last_error` / `crawl_error` from metadata
/// 4. a generic "no content" message naming the URL
pub(crate) fn derive_failure_reason(raw: &RawCrawlOutcome, request_url: &str) -> String {
    if let Some(message) = non_blank(raw.error_message.as_deref()) {
        return message.trim().to_string();
    }

    let status = raw.status_code.or_else(|| metadata_status_code(&raw.metadata));
    if let Some(code) = status.filter(|code| *code >= 400) {
        return describe_status(code);
    }

    for key in ["crawl_last_error", "crawl_error"] {
        match raw.metadata.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Null | Value::String(_)) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    if request_url.trim().is_empty() {
        "Crawler returned no content".to_string()
    } else {
        format!("Crawler returned no content for {request_url}")
    }
}
