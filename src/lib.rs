//! Crawl outcome normalization
//!
//! Turns raw, renderer-specific crawl outcomes into canonical documents:
//! best content variant selected, repeated sections removed, a guardrail
//! annotation describing the removal, and an ordered reference list.
//!
//! ```
//! use crawldoc::{DedupMode, DocumentBuilder, RawCrawlOutcome};
//!
//! let raw: RawCrawlOutcome = serde_json::from_str(
//!     r#"{"url": "https://example.com", "markdown": "Intro\n\nIntro\n\nBody"}"#,
//! )?;
//! let doc = DocumentBuilder::default().build(raw, None, DedupMode::Exact)?;
//! assert_eq!(doc.markdown, "Intro\n\nBody");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod dedup;
pub mod document;
pub mod guardrail;
pub mod input;
pub mod markdown_converter;
pub mod output;
pub mod references;
pub mod utils;

pub use builder::{BuildError, DocumentBuilder};
pub use config::{BuildOptions, BuildOptionsBuilder};
pub use dedup::{DedupError, DedupMetrics, DedupMode, dedup};
pub use document::{
    CanonicalDocument, ContentVariant, ContentVariants, DocumentStatus, JsonMap, Link, LinkBuckets,
    RawCrawlOutcome, Reference,
};
pub use guardrail::{GuardrailResult, evaluate as evaluate_guardrail};
pub use input::parse_outcomes;
pub use markdown_converter::{HtmlRegenerator, MarkdownRegenerator};
pub use output::{OutputFormat, document_to_json, strip_markdown_links, write_output};
pub use references::extract_references;
