//! Markdown regeneration from raw page markup
//!
//! Used when the renderer returned markup but no markdown rendering. The
//! conversion pipeline:
//! 1. Convert the whole document (`raw` variant)
//! 2. Extract the main content container and convert it (`filtered` variant)
//! 3. Resolve relative links against the page URL
//!
//! Callers that have a better source of markdown (for example the
//! rendering engine itself) implement [`MarkdownRegenerator`] and hand it
//! to the document builder instead.

pub mod html_to_markdown;
pub mod main_content_extraction;

use anyhow::{Result, anyhow};
use scraper::Selector;

use crate::document::ContentVariants;
use crate::utils::MAX_REGENERATION_HTML_BYTES;

pub use html_to_markdown::{convert_html, create_converter, resolve_relative_links};
pub use main_content_extraction::extract_main_content;

/// Turns raw markup into markdown content variants
pub trait MarkdownRegenerator: Send + Sync {
    /// Regenerate content variants from `html`.
    ///
    /// `base_url`, when given, is used to resolve relative links.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the markup cannot be converted.
    fn regenerate(&self, html: &str, base_url: Option<&str>) -> Result<ContentVariants>;
}

/// Default regenerator built on `scraper` and `htmd`
#[derive(Debug, Clone, Default)]
pub struct HtmlRegenerator {
    content_selector: Option<Selector>,
}

impl HtmlRegenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `selector` before the built-in main-content containers.
    ///
    /// # Errors
    ///
    /// Returns an error if `selector` is not valid CSS.
    pub fn with_content_selector(mut self, selector: &str) -> Result<Self> {
        let parsed = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid content selector '{selector}': {e}"))?;
        self.content_selector = Some(parsed);
        Ok(self)
    }

    fn convert_with_links(&self, html: &str, base_url: Option<&str>) -> Result<String> {
        let markdown = convert_html(&create_converter(), html)?;
        Ok(match base_url {
            Some(base) => resolve_relative_links(&markdown, base),
            None => markdown,
        })
    }
}

impl MarkdownRegenerator for HtmlRegenerator {
    fn regenerate(&self, html: &str, base_url: Option<&str>) -> Result<ContentVariants> {
        if html.len() > MAX_REGENERATION_HTML_BYTES {
            return Err(anyhow!(
                "HTML input too large: {} bytes (limit {})",
                html.len(),
                MAX_REGENERATION_HTML_BYTES
            ));
        }

        let raw = self.convert_with_links(html, base_url)?;

        // A failed extraction still leaves the raw variant usable
        let filtered = match extract_main_content(html, self.content_selector.as_ref()) {
            Ok(Some(fragment)) => match self.convert_with_links(&fragment, base_url) {
                Ok(markdown) => Some(markdown),
                Err(e) => {
                    tracing::warn!("Main content conversion failed: {}, using full page", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Main content extraction failed: {}, using full page", e);
                None
            }
        };

        tracing::debug!(
            raw_len = raw.len(),
            filtered = filtered.is_some(),
            "Regenerated markdown from markup"
        );

        Ok(ContentVariants {
            raw: Some(raw),
            filtered,
            with_citations: None,
            references_markdown: None,
        })
    }
}
