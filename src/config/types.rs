//! Core configuration type for document building

use serde::{Deserialize, Serialize};

use crate::utils::DEFAULT_GUARDRAIL_RATE_THRESHOLD;

/// Options shared by every build performed with one `DocumentBuilder`
///
/// Deserialization goes through [`BuildOptionsBuilder`](super::BuildOptionsBuilder),
/// so options read from JSON are validated the same way as built ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "super::BuildOptionsBuilder")]
pub struct BuildOptions {
    /// Section removal rate above which the dedup guardrail triggers.
    ///
    /// **INVARIANT:** within `0.0..=1.0` (validated by the builder).
    ///
    /// Default: 0.6
    pub(crate) guardrail_threshold: f64,

    /// Regenerate markdown from raw markup when the renderer produced no
    /// content variant.
    ///
    /// When disabled, a crawl with markup but no markdown is reported as
    /// failed.
    ///
    /// Default: true
    pub(crate) regenerate_from_html: bool,

    /// Resolve relative links in regenerated markdown against the page URL
    ///
    /// Default: true
    pub(crate) resolve_relative_links: bool,

    /// CSS selector for the main content element during regeneration.
    ///
    /// Tried before the built-in selector list. Validated at build time.
    pub(crate) content_selector: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            guardrail_threshold: DEFAULT_GUARDRAIL_RATE_THRESHOLD,
            regenerate_from_html: true,
            resolve_relative_links: true,
            content_selector: None,
        }
    }
}
