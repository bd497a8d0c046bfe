//! Fluent builder for `BuildOptions`

use anyhow::{Result, anyhow};
use scraper::Selector;
use serde::Deserialize;

use super::types::BuildOptions;

/// Unvalidated options; missing fields take their defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildOptionsBuilder {
    guardrail_threshold: f64,
    regenerate_from_html: bool,
    resolve_relative_links: bool,
    content_selector: Option<String>,
}

impl Default for BuildOptionsBuilder {
    fn default() -> Self {
        let defaults = BuildOptions::default();
        Self {
            guardrail_threshold: defaults.guardrail_threshold,
            regenerate_from_html: defaults.regenerate_from_html,
            resolve_relative_links: defaults.resolve_relative_links,
            content_selector: defaults.content_selector,
        }
    }
}

impl BuildOptions {
    /// Create a builder for configuring `BuildOptions` with a fluent interface
    #[must_use]
    pub fn builder() -> BuildOptionsBuilder {
        BuildOptionsBuilder::default()
    }
}

impl TryFrom<BuildOptionsBuilder> for BuildOptions {
    type Error = anyhow::Error;

    fn try_from(builder: BuildOptionsBuilder) -> Result<Self> {
        builder.build()
    }
}

impl BuildOptionsBuilder {
    #[must_use]
    pub fn guardrail_threshold(mut self, threshold: f64) -> Self {
        self.guardrail_threshold = threshold;
        self
    }

    #[must_use]
    pub fn regenerate_from_html(mut self, enabled: bool) -> Self {
        self.regenerate_from_html = enabled;
        self
    }

    #[must_use]
    pub fn resolve_relative_links(mut self, enabled: bool) -> Self {
        self.resolve_relative_links = enabled;
        self
    }

    #[must_use]
    pub fn content_selector(mut self, selector: impl Into<String>) -> Self {
        self.content_selector = Some(selector.into());
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns an error if the guardrail threshold is outside `0.0..=1.0`
    /// (or NaN), or if the content selector is not valid CSS.
    pub fn build(self) -> Result<BuildOptions> {
        if !(0.0..=1.0).contains(&self.guardrail_threshold) {
            return Err(anyhow!(
                "Guardrail threshold must be within 0.0..=1.0, got {}",
                self.guardrail_threshold
            ));
        }

        let content_selector = match self.content_selector {
            Some(selector) if selector.trim().is_empty() => None,
            Some(selector) => {
                Selector::parse(&selector)
                    .map_err(|e| anyhow!("Invalid content selector '{selector}': {e}"))?;
                Some(selector)
            }
            None => None,
        };

        Ok(BuildOptions {
            guardrail_threshold: self.guardrail_threshold,
            regenerate_from_html: self.regenerate_from_html,
            resolve_relative_links: self.resolve_relative_links,
            content_selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuildOptions::builder().build().unwrap();
        assert_eq!(options, BuildOptions::default());
        assert!((options.guardrail_threshold() - 0.6).abs() < f64::EPSILON);
        assert!(options.regenerate_from_html());
        assert!(options.resolve_relative_links());
        assert_eq!(options.content_selector(), None);
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(BuildOptions::builder().guardrail_threshold(1.5).build().is_err());
        assert!(BuildOptions::builder().guardrail_threshold(-0.1).build().is_err());
        assert!(BuildOptions::builder().guardrail_threshold(f64::NAN).build().is_err());
        assert!(BuildOptions::builder().guardrail_threshold(1.0).build().is_ok());
    }

    #[test]
    fn test_content_selector_validation() {
        let options = BuildOptions::builder()
            .content_selector("div.docs > section")
            .build()
            .unwrap();
        assert_eq!(options.content_selector(), Some("div.docs > section"));

        assert!(BuildOptions::builder().content_selector("div[").build().is_err());
        let blank = BuildOptions::builder().content_selector("  ").build().unwrap();
        assert_eq!(blank.content_selector(), None);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: BuildOptions =
            serde_json::from_str(r#"{"guardrail_threshold": 0.75}"#).unwrap();
        assert!((options.guardrail_threshold() - 0.75).abs() < f64::EPSILON);
        assert!(options.regenerate_from_html());
    }

    #[test]
    fn test_options_deserialize_validates() {
        let err = serde_json::from_str::<BuildOptions>(r#"{"guardrail_threshold": 5.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Guardrail threshold"));
        assert!(serde_json::from_str::<BuildOptions>(r#"{"content_selector": "div["}"#).is_err());

        let blank: BuildOptions = serde_json::from_str(r#"{"content_selector": " "}"#).unwrap();
        assert_eq!(blank.content_selector(), None);
    }

    #[test]
    fn test_options_serde_round_trip() {
        let options = BuildOptions::builder()
            .guardrail_threshold(0.4)
            .content_selector("article")
            .build()
            .unwrap();
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(serde_json::from_str::<BuildOptions>(&json).unwrap(), options);
    }
}
