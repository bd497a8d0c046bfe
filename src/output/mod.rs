//! Output formatting for canonical documents
//!
//! JSON projection, optional link stripping, and file writing for the
//! command-line surface.

pub mod writer;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::LazyLock;

use crate::document::CanonicalDocument;

pub use writer::write_output;

/// `[text](target)`
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]{1,500})\]\([^)]{1,2000}\)").expect("LINK_RE: hardcoded regex is valid")
});

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("BARE_URL_RE: hardcoded regex is valid"));

static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("SPACE_RUN_RE: hardcoded regex is valid"));

/// How documents are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The document's markdown only
    #[default]
    Markdown,
    /// The JSON projection from [`document_to_json`]
    Json,
}

/// Remove markdown links, keeping their text, and drop bare http(s) URLs.
///
/// ```
/// # use crawldoc::output::strip_markdown_links;
/// assert_eq!(
///     strip_markdown_links("See [the docs](https://example.com/docs) or https://example.com now"),
///     "See the docs or now"
/// );
/// ```
#[must_use]
pub fn strip_markdown_links(text: &str) -> String {
    let text = LINK_RE.replace_all(text, "$1");
    let text = BARE_URL_RE.replace_all(&text, "");
    SPACE_RUN_RE.replace_all(&text, " ").into_owned()
}

/// Caller-facing JSON projection of a document.
///
/// `error_message` is always present (`null` unless the crawl failed).
#[must_use]
pub fn document_to_json(doc: &CanonicalDocument, strip_links: bool) -> Value {
    let markdown = if strip_links && !doc.markdown.is_empty() {
        strip_markdown_links(&doc.markdown)
    } else {
        doc.markdown.clone()
    };

    json!({
        "request_url": doc.request_url,
        "final_url": doc.final_url,
        "status": doc.status,
        "markdown": markdown,
        "error_message": doc.error_message,
        "metadata": doc.metadata,
        "references": doc.references,
    })
}

/// Render one document in `format`
#[must_use]
pub fn render_document(doc: &CanonicalDocument, format: OutputFormat, strip_links: bool) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&document_to_json(doc, strip_links))
            .unwrap_or_else(|e| {
                tracing::warn!("JSON rendering failed: {}", e);
                String::from("{}")
            }),
        OutputFormat::Markdown if strip_links => strip_markdown_links(&doc.markdown),
        OutputFormat::Markdown => doc.markdown.clone(),
    }
}
