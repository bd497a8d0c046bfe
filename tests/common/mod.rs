//! Shared fixtures for the crawldoc test suite

use crawldoc::{CanonicalDocument, DedupMode, DocumentBuilder, RawCrawlOutcome};
use serde_json::Value;

/// Deserialize a crawl outcome fixture
#[allow(dead_code)]
pub fn outcome(value: Value) -> RawCrawlOutcome {
    serde_json::from_value(value).expect("fixture is a valid crawl outcome")
}

/// Build with default options
#[allow(dead_code)]
pub fn build(value: Value, mode: DedupMode) -> CanonicalDocument {
    DocumentBuilder::default()
        .build(outcome(value), None, mode)
        .expect("fixture has a URL")
}

/// Markdown with repeated `## Installation` blocks separated by unrelated content
#[allow(dead_code)]
pub fn installation_markdown() -> &'static str {
    "# Project\n\nA small library.\n\n## Installation\n\nRun `cargo add project`.\n\n\
     ## Usage\n\nCall `project::run()`.\n\n## Installation\n\nRun `cargo add project`.\n\n\
     ## License\n\nMIT."
}
