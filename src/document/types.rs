//! Raw crawl outcome (input) and canonical document (output) types
//!
//! `RawCrawlOutcome` is deserialized from whatever the rendering engine
//! emitted. Field names have drifted across renderer versions, so the same
//! value may arrive under several keys, sometimes more than one at once.
//! Each key is read into its own wire slot and resolved in a fixed order,
//! so nothing downstream has to look for key names.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// JSON object used for headers and metadata
pub type JsonMap = Map<String, Value>;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_success() -> bool {
    true
}

/// Accept either the structured variant object or a bare markdown string.
///
/// Older renderers emitted `"markdown": "<text>"`; newer ones emit an
/// object with `raw_markdown`, `fit_markdown`, ... A bare string is the
/// unfiltered rendering, so it becomes the `raw` variant.
fn variants_from_any_shape<'de, D>(deserializer: D) -> Result<ContentVariants, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Plain(String),
        Structured(ContentVariants),
    }

    Ok(match Option::<Shape>::deserialize(deserializer)? {
        None => ContentVariants::default(),
        Some(Shape::Plain(raw)) => ContentVariants {
            raw: Some(raw),
            ..ContentVariants::default()
        },
        Some(Shape::Structured(variants)) => variants,
    })
}

/// One crawl attempt as reported by the rendering engine.
///
/// Lives only for the duration of a single build call.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "WireOutcome")]
pub struct RawCrawlOutcome {
    /// Whether the renderer considers the crawl successful (default: true)
    pub success: bool,

    /// URL the crawl was started with
    pub url: Option<String>,

    /// URL the browser ended up on after redirects
    pub redirected_url: Option<String>,

    /// Explicit renderer error (e.g. `net::ERR_TIMED_OUT`)
    pub error_message: Option<String>,

    /// HTTP status of the main document response
    pub status_code: Option<u16>,

    /// Candidate markdown renderings of the page
    pub variants: ContentVariants,

    /// Rendered page markup
    pub html: Option<String>,

    /// Sanitized markup, used when `html` is absent
    pub cleaned_html: Option<String>,

    /// Response headers of the main document
    pub response_headers: JsonMap,

    /// Free-form page metadata (title, status code, og tags, ...)
    pub metadata: JsonMap,

    /// Links discovered on the page
    pub links: LinkBuckets,
}

/// Outcome exactly as it arrives on the wire.
///
/// Renderers sometimes send a current key next to its historical name, so
/// every name gets its own slot and the `From` impl below picks one.
#[derive(Deserialize)]
struct WireOutcome {
    #[serde(default)]
    success: Option<bool>,

    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    requested_url: Option<String>,
    #[serde(default)]
    request_url: Option<String>,

    #[serde(default)]
    redirected_url: Option<String>,
    #[serde(default)]
    final_url: Option<String>,
    #[serde(default)]
    resolved_url: Option<String>,

    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    status_code: Option<u16>,

    #[serde(default, deserialize_with = "variants_from_any_shape")]
    markdown: ContentVariants,
    #[serde(default, deserialize_with = "variants_from_any_shape")]
    content: ContentVariants,
    #[serde(default, deserialize_with = "variants_from_any_shape")]
    variants: ContentVariants,

    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    cleaned_html: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    response_headers: JsonMap,
    #[serde(default, deserialize_with = "null_as_default")]
    headers: JsonMap,

    #[serde(default, deserialize_with = "null_as_default")]
    metadata: JsonMap,

    #[serde(default, deserialize_with = "null_as_default")]
    links: LinkBuckets,
}

/// First non-blank value in priority order.
fn first_present(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

impl From<WireOutcome> for RawCrawlOutcome {
    fn from(wire: WireOutcome) -> Self {
        let response_headers = if wire.response_headers.is_empty() {
            wire.headers
        } else {
            wire.response_headers
        };

        Self {
            success: wire.success.unwrap_or_else(default_success),
            url: first_present([wire.url, wire.requested_url, wire.request_url]),
            redirected_url: first_present([wire.redirected_url, wire.final_url, wire.resolved_url]),
            error_message: first_present([wire.error_message, wire.error]),
            status_code: wire.status_code,
            variants: wire.markdown.or(wire.content).or(wire.variants),
            html: wire.html,
            cleaned_html: wire.cleaned_html,
            response_headers,
            metadata: wire.metadata,
            links: wire.links,
        }
    }
}

impl Default for RawCrawlOutcome {
    fn default() -> Self {
        Self {
            success: default_success(),
            url: None,
            redirected_url: None,
            error_message: None,
            status_code: None,
            variants: ContentVariants::default(),
            html: None,
            cleaned_html: None,
            response_headers: JsonMap::new(),
            metadata: JsonMap::new(),
            links: LinkBuckets::default(),
        }
    }
}

impl RawCrawlOutcome {
    /// Raw markup, preferring `html` over `cleaned_html`; blank markup counts as absent.
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        non_blank(self.html.as_deref()).or_else(|| non_blank(self.cleaned_html.as_deref()))
    }

    /// Whether any content variant or markup is available at all.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.variants.select().is_some() || self.markup().is_some()
    }
}

/// Candidate renderings of a page's content.
///
/// The renderer may produce any subset of these. Selection order is fixed:
/// `filtered` > `with_citations` > `raw` (see [`ContentVariants::select`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireVariants")]
pub struct ContentVariants {
    /// Unfiltered markdown rendering of the whole page
    pub raw: Option<String>,

    /// Content-filtered (pruned) rendering
    pub filtered: Option<String>,

    /// Rendering with numbered reference markers in place of inline links
    pub with_citations: Option<String>,

    /// Pre-rendered reference block that accompanies `with_citations`
    pub references_markdown: Option<String>,
}

/// Variant object as sent by the renderer; renderer names win over short names.
#[derive(Deserialize)]
struct WireVariants {
    #[serde(default)]
    raw_markdown: Option<String>,
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    fit_markdown: Option<String>,
    #[serde(default)]
    filtered: Option<String>,
    #[serde(default)]
    markdown_with_citations: Option<String>,
    #[serde(default)]
    with_citations: Option<String>,
    #[serde(default)]
    references_markdown: Option<String>,
}

impl From<WireVariants> for ContentVariants {
    fn from(wire: WireVariants) -> Self {
        Self {
            raw: first_present([wire.raw_markdown, wire.raw]),
            filtered: first_present([wire.fit_markdown, wire.filtered]),
            with_citations: first_present([
                wire.markdown_with_citations,
                wire.with_citations,
            ]),
            references_markdown: wire.references_markdown,
        }
    }
}

impl ContentVariants {
    /// Pick the best available variant.
    ///
    /// Whitespace-only variants are treated as absent.
    #[must_use]
    pub fn select(&self) -> Option<(ContentVariant, &str)> {
        [
            (ContentVariant::Filtered, &self.filtered),
            (ContentVariant::WithCitations, &self.with_citations),
            (ContentVariant::Raw, &self.raw),
        ]
        .into_iter()
        .find_map(|(variant, text)| non_blank(text.as_deref()).map(|text| (variant, text)))
    }

    /// Fill every blank slot from `other`, keeping what `self` already has.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let pick = |mine: Option<String>, theirs: Option<String>| {
            if non_blank(mine.as_deref()).is_some() {
                mine
            } else {
                theirs.or(mine)
            }
        };
        Self {
            raw: pick(self.raw, other.raw),
            filtered: pick(self.filtered, other.filtered),
            with_citations: pick(self.with_citations, other.with_citations),
            references_markdown: pick(self.references_markdown, other.references_markdown),
        }
    }

    /// Filtered variant, if present and non-blank
    #[must_use]
    pub fn filtered(&self) -> Option<&str> {
        non_blank(self.filtered.as_deref())
    }

    /// Reference block, if present and non-blank
    #[must_use]
    pub fn references_markdown(&self) -> Option<&str> {
        non_blank(self.references_markdown.as_deref())
    }
}

/// Which rendering a document's markdown was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentVariant {
    Filtered,
    WithCitations,
    Raw,
}

impl ContentVariant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentVariant::Filtered => "filtered",
            ContentVariant::WithCitations => "with_citations",
            ContentVariant::Raw => "raw",
        }
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal and external links found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkBuckets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal: Vec<Link>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external: Vec<Link>,
}

/// A single discovered link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "null_as_default")]
    pub href: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            href: href.into(),
            text: text.map(str::to_string),
        }
    }
}

/// Outcome of building a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Content was retrieved at the requested URL
    Success,
    /// No usable content; see `error_message`
    Failed,
    /// Content was retrieved, but from a different URL than requested
    Redirected,
}

impl DocumentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Success => "success",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Redirected => "redirected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing link reference attached to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// 1-based position; indices in a document are always `1..=N`
    pub index: usize,
    pub href: String,
    /// Link text, or the href itself when no text exists
    pub label: String,
}

/// Stable, caller-facing representation of one crawl outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    pub request_url: String,
    pub final_url: String,
    pub status: DocumentStatus,

    /// Processed (deduplicated) markdown; empty on failure
    pub markdown: String,

    /// Selected variant before dedup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_markdown: Option<String>,

    #[serde(default)]
    pub html: Option<String>,

    #[serde(default)]
    pub headers: JsonMap,

    #[serde(default)]
    pub references: Vec<Reference>,

    /// Source metadata plus normalization, dedup and guardrail keys
    #[serde(default)]
    pub metadata: JsonMap,

    /// Human-readable failure reason; only set when `status` is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CanonicalDocument {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == DocumentStatus::Failed
    }

    /// Page title resolved during metadata normalization
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_priority() {
        let variants = ContentVariants {
            raw: Some("raw".into()),
            filtered: Some("fit".into()),
            with_citations: Some("cited".into()),
            references_markdown: None,
        };
        assert_eq!(variants.select(), Some((ContentVariant::Filtered, "fit")));
    }

    #[test]
    fn test_blank_variants_are_skipped() {
        let variants = ContentVariants {
            raw: Some("raw".into()),
            filtered: Some("  \n ".into()),
            with_citations: Some(String::new()),
            references_markdown: None,
        };
        assert_eq!(variants.select(), Some((ContentVariant::Raw, "raw")));
    }

    #[test]
    fn test_no_variants() {
        assert_eq!(ContentVariants::default().select(), None);
    }

    #[test]
    fn test_historical_field_names() {
        let raw: RawCrawlOutcome = serde_json::from_value(json!({
            "request_url": "https://example.com/a",
            "final_url": "https://example.com/b",
            "error": null,
            "headers": {"content-type": "text/html"},
            "markdown": {
                "raw_markdown": "# Raw",
                "fit_markdown": "# Fit",
                "markdown_with_citations": "# Cited ⟨1⟩",
                "references_markdown": "⟨1⟩ https://example.com: Example"
            },
            "links": {"internal": [{"href": "/a", "text": "A"}], "external": null}
        }))
        .unwrap();

        assert!(raw.success);
        assert_eq!(raw.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(raw.redirected_url.as_deref(), Some("https://example.com/b"));
        assert_eq!(raw.variants.filtered.as_deref(), Some("# Fit"));
        assert_eq!(raw.links.internal.len(), 1);
        assert!(raw.links.external.is_empty());
        assert_eq!(raw.response_headers["content-type"], "text/html");
    }

    #[test]
    fn test_plain_string_markdown_becomes_raw_variant() {
        let raw: RawCrawlOutcome = serde_json::from_value(json!({
            "url": "https://example.com",
            "markdown": "Hello"
        }))
        .unwrap();
        assert_eq!(raw.variants.select(), Some((ContentVariant::Raw, "Hello")));
    }

    #[test]
    fn test_current_and_historical_keys_together() {
        let raw: RawCrawlOutcome = serde_json::from_value(json!({
            "success": null,
            "url": "https://example.com/a",
            "requested_url": "https://example.com/old",
            "redirected_url": "  ",
            "final_url": "https://example.com/b",
            "error_message": null,
            "error": "net::ERR_TIMED_OUT",
            "markdown": {"raw_markdown": "Raw", "raw": "short-name raw"},
            "content": {"fit_markdown": "Fit", "raw_markdown": "ignored"},
            "response_headers": {},
            "headers": {"server": "nginx"}
        }))
        .unwrap();

        assert!(raw.success);
        assert_eq!(raw.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(raw.redirected_url.as_deref(), Some("https://example.com/b"));
        assert_eq!(raw.error_message.as_deref(), Some("net::ERR_TIMED_OUT"));
        assert_eq!(raw.variants.raw.as_deref(), Some("Raw"));
        assert_eq!(raw.variants.filtered.as_deref(), Some("Fit"));
        assert_eq!(raw.response_headers["server"], "nginx");
    }

    #[test]
    fn test_success_false_survives() {
        let raw: RawCrawlOutcome =
            serde_json::from_value(json!({"success": false, "url": "https://example.com"}))
                .unwrap();
        assert!(!raw.success);
        assert!(!raw.has_content());
    }

    #[test]
    fn test_variants_or_fills_blank_slots() {
        let primary = ContentVariants {
            raw: Some(" ".into()),
            filtered: Some("fit".into()),
            ..ContentVariants::default()
        };
        let fallback = ContentVariants {
            raw: Some("raw".into()),
            filtered: Some("other fit".into()),
            ..ContentVariants::default()
        };
        let merged = primary.or(fallback);
        assert_eq!(merged.raw.as_deref(), Some("raw"));
        assert_eq!(merged.filtered.as_deref(), Some("fit"));
        assert_eq!(merged.with_citations, None);
    }

    #[test]
    fn test_markup_prefers_html() {
        let raw = RawCrawlOutcome {
            html: Some("   ".into()),
            cleaned_html: Some("<p>clean</p>".into()),
            ..RawCrawlOutcome::default()
        };
        assert_eq!(raw.markup(), Some("<p>clean</p>"));
        assert!(raw.has_content());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(json!(DocumentStatus::Redirected), json!("redirected"));
        assert_eq!(DocumentStatus::Failed.to_string(), "failed");
    }
}
