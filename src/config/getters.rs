//! Getter methods for `BuildOptions`

use super::types::BuildOptions;

impl BuildOptions {
    #[must_use]
    pub fn guardrail_threshold(&self) -> f64 {
        self.guardrail_threshold
    }

    #[must_use]
    pub fn regenerate_from_html(&self) -> bool {
        self.regenerate_from_html
    }

    #[must_use]
    pub fn resolve_relative_links(&self) -> bool {
        self.resolve_relative_links
    }

    #[must_use]
    pub fn content_selector(&self) -> Option<&str> {
        self.content_selector.as_deref()
    }
}
