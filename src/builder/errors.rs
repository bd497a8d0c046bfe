//! Error types for document building

use thiserror::Error;

/// Errors returned by [`DocumentBuilder::build`](super::DocumentBuilder::build).
///
/// Crawl failures are not errors: they produce a document with status
/// `failed`. Only unusable input is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No URL was passed and none could be found in the crawl outcome
    #[error("Crawl outcome has no URL and none was provided")]
    MissingUrl,
}
