//! Document builder
//!
//! Turns one [`RawCrawlOutcome`] into a [`CanonicalDocument`]:
//!
//! 1. Short-circuit failed or empty crawls into a `failed` document
//! 2. Select the best content variant, regenerating from markup if needed
//! 3. Normalize metadata
//! 4. Dedup the selected markdown with the caller's mode
//! 5. Evaluate the dedup guardrail
//! 6. Extract references
//! 7. Decide between `success` and `redirected`

pub mod errors;
mod failure;
mod metadata;

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::BuildOptions;
use crate::dedup::{DedupMode, dedup};
use crate::document::{
    CanonicalDocument, ContentVariant, ContentVariants, DocumentStatus, JsonMap, RawCrawlOutcome,
};
use crate::guardrail;
use crate::markdown_converter::{HtmlRegenerator, MarkdownRegenerator};
use crate::references::{extract_references, parse_reference_block};
use crate::utils::{char_len, urls_equivalent};

pub use errors::BuildError;

use failure::derive_failure_reason;
use metadata::{normalize_metadata, resolve_final_url, resolve_request_url};

/// Content chosen for a successful build
struct SelectedContent {
    variant: ContentVariant,
    markdown: String,
    regenerated: bool,
    filtered_len: Option<usize>,
    references_markdown: Option<String>,
}

impl SelectedContent {
    fn from_variants(variants: &ContentVariants, regenerated: bool) -> Option<Self> {
        let (variant, text) = variants.select()?;
        Some(Self {
            variant,
            markdown: text.to_string(),
            regenerated,
            filtered_len: variants.filtered().map(char_len),
            references_markdown: variants.references_markdown().map(str::to_string),
        })
    }
}

/// Builds canonical documents from raw crawl outcomes.
///
/// Stateless between calls and safe to share across threads.
#[derive(Clone)]
pub struct DocumentBuilder {
    options: BuildOptions,
    regenerator: Arc<dyn MarkdownRegenerator>,
}

impl std::fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::with_regenerator(BuildOptions::default(), Arc::new(HtmlRegenerator::new()))
    }
}

impl DocumentBuilder {
    /// Create a builder using the default [`HtmlRegenerator`].
    ///
    /// # Errors
    ///
    /// Returns an error if `options` carries an invalid content selector.
    pub fn new(options: BuildOptions) -> Result<Self> {
        let mut regenerator = HtmlRegenerator::new();
        if let Some(selector) = options.content_selector() {
            regenerator = regenerator.with_content_selector(selector)?;
        }
        Ok(Self::with_regenerator(options, Arc::new(regenerator)))
    }

    /// Create a builder with a caller-supplied regenerator
    #[must_use]
    pub fn with_regenerator(options: BuildOptions, regenerator: Arc<dyn MarkdownRegenerator>) -> Self {
        Self {
            options,
            regenerator,
        }
    }

    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build a canonical document.
    ///
    /// `requested_url` overrides any URL found in `raw`. `dedup_mode` is
    /// applied to the selected markdown.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingUrl`] when no URL is available. A crawl
    /// that failed or produced no content is not an error; it yields a
    /// document with status `failed`.
    pub fn build(
        &self,
        raw: RawCrawlOutcome,
        requested_url: Option<&str>,
        dedup_mode: DedupMode,
    ) -> Result<CanonicalDocument, BuildError> {
        let request_url = resolve_request_url(&raw, requested_url).ok_or(BuildError::MissingUrl)?;
        let final_url = resolve_final_url(&raw, &request_url);

        if !raw.success {
            let reason = derive_failure_reason(&raw, &request_url);
            return Ok(failed_document(raw, request_url, final_url, reason));
        }

        if !raw.has_content() {
            debug!(url = %request_url, "Crawl reported success without markdown or markup");
            let reason = derive_failure_reason(&raw, &request_url);
            return Ok(failed_document(raw, request_url, final_url, reason));
        }

        let selected = match SelectedContent::from_variants(&raw.variants, false) {
            Some(selected) => selected,
            None => match self.regenerate(&raw, &final_url) {
                Ok(Some(selected)) => selected,
                Ok(None) => {
                    let reason = derive_failure_reason(&raw, &request_url);
                    return Ok(failed_document(raw, request_url, final_url, reason));
                }
                Err(e) => {
                    warn!(url = %request_url, error = %e, "Markdown regeneration failed");
                    let reason = raw
                        .error_message
                        .as_deref()
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map_or_else(|| format!("Markdown regeneration failed: {e}"), str::to_string);
                    return Ok(failed_document(raw, request_url, final_url, reason));
                }
            },
        };

        debug!(
            url = %request_url,
            variant = %selected.variant,
            regenerated = selected.regenerated,
            "Selected content variant"
        );

        let mut metadata = normalize_metadata(&raw, &request_url, &final_url);
        metadata.insert("content_variant".into(), Value::from(selected.variant.as_str()));
        metadata.insert("content_regenerated".into(), Value::from(selected.regenerated));
        metadata
            .entry("raw_markdown_length")
            .or_insert_with(|| Value::from(char_len(&selected.markdown)));
        if let Some(len) = selected.filtered_len {
            metadata
                .entry("fit_markdown_length")
                .or_insert_with(|| Value::from(len));
        }

        let (markdown, metrics) = dedup(&selected.markdown, dedup_mode);
        metrics.write_metadata(&mut metadata);
        metadata.insert("markdown_length".into(), Value::from(char_len(&markdown)));

        let guardrail = guardrail::evaluate(&metrics, self.options.guardrail_threshold());
        if guardrail.triggered {
            warn!(
                url = %request_url,
                removed = metrics.sections_removed,
                total = metrics.sections_total,
                rate = guardrail.removal_rate,
                threshold = guardrail.rate_threshold,
                "Dedup removed an unusually large share of sections"
            );
        }
        guardrail.write_metadata(&mut metadata);

        let references = match selected
            .references_markdown
            .as_deref()
            .map(parse_reference_block)
            .filter(|refs| !refs.is_empty())
        {
            Some(refs) => refs,
            None => extract_references(&markdown, &raw.links),
        };

        let status = if urls_equivalent(&request_url, &final_url) {
            DocumentStatus::Success
        } else {
            DocumentStatus::Redirected
        };

        debug!(
            url = %request_url,
            status = %status,
            references = references.len(),
            "Built document"
        );

        Ok(CanonicalDocument {
            request_url,
            final_url,
            status,
            markdown,
            raw_markdown: Some(selected.markdown),
            html: raw.markup().map(str::to_string),
            headers: raw.response_headers,
            references,
            metadata,
            error_message: None,
        })
    }

    /// Regenerate variants from markup, when allowed and available.
    fn regenerate(&self, raw: &RawCrawlOutcome, final_url: &str) -> Result<Option<SelectedContent>> {
        let Some(markup) = raw.markup() else {
            return Ok(None);
        };
        if !self.options.regenerate_from_html() {
            debug!(url = %final_url, "No markdown variant and regeneration disabled");
            return Ok(None);
        }

        let base_url = self.options.resolve_relative_links().then_some(final_url);
        let variants = self.regenerator.regenerate(markup, base_url)?;
        Ok(SelectedContent::from_variants(&variants, true))
    }
}

fn failed_document(
    raw: RawCrawlOutcome,
    request_url: String,
    final_url: String,
    reason: String,
) -> CanonicalDocument {
    warn!(url = %request_url, reason = %reason, "Crawl produced no usable content");

    let metadata: JsonMap = normalize_metadata(&raw, &request_url, &final_url);
    CanonicalDocument {
        html: raw.markup().map(str::to_string),
        request_url,
        final_url,
        status: DocumentStatus::Failed,
        markdown: String::new(),
        raw_markdown: None,
        headers: raw.response_headers,
        references: Vec::new(),
        metadata,
        error_message: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    fn outcome(value: Value) -> RawCrawlOutcome {
        serde_json::from_value(value).unwrap()
    }

    struct FailingRegenerator;

    impl MarkdownRegenerator for FailingRegenerator {
        fn regenerate(&self, _html: &str, _base_url: Option<&str>) -> Result<ContentVariants> {
            Err(anyhow!("renderer unavailable"))
        }
    }

    #[test]
    fn test_empty_success_skips_regenerator() {
        let builder =
            DocumentBuilder::with_regenerator(BuildOptions::default(), Arc::new(FailingRegenerator));
        let doc = builder
            .build(
                outcome(json!({"url": "https://a.example", "markdown": " ", "html": ""})),
                None,
                DedupMode::Exact,
            )
            .unwrap();
        assert!(doc.is_failed());
        assert_eq!(
            doc.error_message.as_deref(),
            Some("Crawler returned no content for https://a.example")
        );
    }

    #[test]
    fn test_missing_url() {
        let err = DocumentBuilder::default()
            .build(outcome(json!({"markdown": "text"})), None, DedupMode::Exact)
            .unwrap_err();
        assert_eq!(err, BuildError::MissingUrl);
    }

    #[test]
    fn test_failure_carries_html_and_headers() {
        let doc = DocumentBuilder::default()
            .build(
                outcome(json!({
                    "url": "https://a.example",
                    "success": false,
                    "status_code": 404,
                    "html": "<p>Not here</p>",
                    "headers": {"server": "x"}
                })),
                None,
                DedupMode::Exact,
            )
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Failed);
        assert_eq!(doc.error_message.as_deref(), Some("HTTP 404 Not Found"));
        assert_eq!(doc.markdown, "");
        assert_eq!(doc.html.as_deref(), Some("<p>Not here</p>"));
        assert_eq!(doc.headers["server"], "x");
        assert!(!doc.metadata.contains_key("dedup_mode"));
        assert_eq!(doc.metadata["requested_url"], "https://a.example");
    }

    #[test]
    fn test_regeneration_failure_is_failed_document() {
        let builder =
            DocumentBuilder::with_regenerator(BuildOptions::default(), Arc::new(FailingRegenerator));
        let doc = builder
            .build(
                outcome(json!({"url": "https://a.example", "html": "<p>x</p>"})),
                None,
                DedupMode::Exact,
            )
            .unwrap();
        assert!(doc.is_failed());
        assert_eq!(
            doc.error_message.as_deref(),
            Some("Markdown regeneration failed: renderer unavailable")
        );
    }

    #[test]
    fn test_regeneration_disabled() {
        let options = BuildOptions::builder().regenerate_from_html(false).build().unwrap();
        let doc = DocumentBuilder::new(options)
            .unwrap()
            .build(
                outcome(json!({"url": "https://a.example", "html": "<main><p>x</p></main>"})),
                None,
                DedupMode::Exact,
            )
            .unwrap();
        assert!(doc.is_failed());
        assert_eq!(
            doc.error_message.as_deref(),
            Some("Crawler returned no content for https://a.example")
        );
    }

    #[test]
    fn test_reference_block_preferred_over_body() {
        let doc = DocumentBuilder::default()
            .build(
                outcome(json!({
                    "url": "https://a.example",
                    "markdown": {
                        "markdown_with_citations": "Body ⟨1⟩\n\n1. https://body.example: Body link",
                        "references_markdown": "## References\n\n⟨1⟩ https://cited.example: Cited"
                    }
                })),
                None,
                DedupMode::Exact,
            )
            .unwrap();
        assert_eq!(doc.references.len(), 1);
        assert_eq!(doc.references[0].href, "https://cited.example");
        assert_eq!(doc.metadata["content_variant"], "with_citations");
    }

    #[test]
    fn test_trailing_slash_is_not_a_redirect() {
        let doc = DocumentBuilder::default()
            .build(
                outcome(json!({
                    "url": "https://a.example",
                    "redirected_url": "https://a.example/",
                    "markdown": "Hello"
                })),
                None,
                DedupMode::Off,
            )
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Success);
    }
}
