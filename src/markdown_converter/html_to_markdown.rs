//! HTML to Markdown conversion with htmd

use anyhow::Result;
use htmd::HtmlToMarkdown;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Elements whose content never belongs in markdown
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template", "svg"];

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Bounded quantifiers prevent catastrophic backtracking
    Regex::new(r"(!?)\[([^\]]{0,500})\]\(([^)\s]{1,2000})((?:\s+[^)]*)?)\)")
        .expect("LINK_RE: hardcoded regex is valid")
});

/// Runs of two or more blank lines
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:[ \t]*\n){2,}").expect("BLANK_RUN_RE: hardcoded regex is valid")
});

/// Create the htmd converter used for regeneration
pub fn create_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build()
}

/// Convert an HTML document or fragment to markdown.
///
/// Blank-line runs collapse to a single blank line and the result is
/// trimmed.
///
/// # Errors
///
/// Returns an error if htmd fails to convert the input.
pub fn convert_html(converter: &HtmlToMarkdown, html: &str) -> Result<String> {
    let markdown = converter.convert(html)?;
    let markdown = markdown.replace("\r\n", "\n");
    Ok(BLANK_RUN_RE.replace_all(&markdown, "\n\n").trim().to_string())
}

/// Resolve relative link and image targets against `base_url`.
///
/// Fragment-only targets, scheme-qualified targets, and targets that fail
/// to resolve are left as they are. An unparseable `base_url` leaves the
/// markdown unchanged.
#[must_use]
pub fn resolve_relative_links(markdown: &str, base_url: &str) -> String {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Invalid base URL '{base_url}': {e}, skipping link resolution");
            return markdown.to_string();
        }
    };

    LINK_RE
        .replace_all(markdown, |caps: &regex::Captures| {
            let target = &caps[3];
            if target.starts_with('#') || Url::parse(target).is_ok() {
                return caps[0].to_string();
            }
            match base.join(target) {
                Ok(resolved) => format!("{}[{}]({}{})", &caps[1], &caps[2], resolved, &caps[4]),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}
