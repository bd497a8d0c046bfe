//! Reference extraction
//!
//! References come from one of two places:
//!
//! 1. A pre-rendered reference block, as emitted next to citation-style
//!    markdown:
//!
//!    ```text
//!    ## References
//!
//!    ⟨1⟩ https://example.com/docs: Documentation
//!    ⟨2⟩ https://example.com/api: API reference
//!    ```
//!
//!    Plain ordered-list lines (`1. https://example.com/docs: Documentation`)
//!    are accepted too.
//! 2. The page's link metadata, when no block exists.
//!
//! Either way the result is numbered `1..=N` without gaps.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::document::{LinkBuckets, Reference};

/// `⟨N⟩ tail` or `N. tail`
static REFERENCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:⟨(\d{1,6})⟩|(\d{1,6})\.)\s+(\S.*?)\s*$")
        .expect("REFERENCE_LINE: hardcoded regex is valid")
});

/// Tail must open with a scheme-qualified token (`https://…`, `mailto:…`)
static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]{0,31}:\S").expect("SCHEME_PREFIX: hardcoded regex is valid")
});

/// `href: label`, where `href` is the shortest scheme-qualified token
/// followed by a colon and whitespace
static HREF_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]{0,31}:\S*?):\s+(.*)$")
        .expect("HREF_LABEL: hardcoded regex is valid")
});

/// Build references from `text`, falling back to `links`.
///
/// The last block of consecutive reference lines in `text` wins. Blank
/// lines inside a block are tolerated; any other line ends it.
#[must_use]
pub fn extract_references(text: &str, links: &LinkBuckets) -> Vec<Reference> {
    let parsed = parse_reference_block(text);
    if !parsed.is_empty() {
        return parsed;
    }
    references_from_links(links)
}

/// Parse the last reference block in `text`; empty when there is none.
#[must_use]
pub fn parse_reference_block(text: &str) -> Vec<Reference> {
    let mut last_block: Vec<(String, String)> = Vec::new();
    let mut current: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_reference_line(line) {
            Some(entry) => current.push(entry),
            None => {
                if !current.is_empty() {
                    last_block = std::mem::take(&mut current);
                }
            }
        }
    }
    if !current.is_empty() {
        last_block = current;
    }

    number(last_block)
}

/// Parse one `⟨N⟩ href: label` / `N. href: label` line into `(href, label)`.
fn parse_reference_line(line: &str) -> Option<(String, String)> {
    let captures = REFERENCE_LINE.captures(line)?;
    let tail = captures.get(3)?.as_str();
    if !SCHEME_PREFIX.is_match(tail) {
        return None;
    }

    let (href, label) = split_reference_tail(tail);
    if href.is_empty() {
        return None;
    }
    let label = if label.is_empty() { href.clone() } else { label };
    Some((href, label))
}

/// Split a reference tail into `(href, label)`.
///
/// Prefers the first `:` + whitespace after the URL token; falls back to
/// splitting at the first whitespace.
fn split_reference_tail(tail: &str) -> (String, String) {
    if let Some(captures) = HREF_LABEL.captures(tail) {
        let href = captures.get(1).map_or("", |m| m.as_str());
        let label = captures.get(2).map_or("", |m| m.as_str());
        return (href.trim().to_string(), label.trim().to_string());
    }

    match tail.split_once(char::is_whitespace) {
        Some((href, label)) => (href.trim().to_string(), label.trim().to_string()),
        None => (tail.trim().to_string(), String::new()),
    }
}

/// Internal links then external links, deduplicated by href in first-seen order.
#[must_use]
pub fn references_from_links(links: &LinkBuckets) -> Vec<Reference> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for link in links.internal.iter().chain(&links.external) {
        let href = link.href.trim();
        if href.is_empty() || !seen.insert(href) {
            continue;
        }
        let label = link
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(href);
        merged.push((href.to_string(), label.to_string()));
    }

    number(merged)
}

fn number(entries: Vec<(String, String)>) -> Vec<Reference> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (href, label))| Reference {
            index: i + 1,
            href,
            label,
        })
        .collect()
}
