//! Error types for the dedup pass
//!
//! None of these reach the caller of [`super::dedup`]: they are caught there,
//! logged, and turned into an unmodified pass-through with a diagnostic note.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DedupError {
    /// Input exceeds the size the dedup pass is willing to process
    #[error("markdown too large for dedup: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    /// Reassembled output broke the no-op guarantee
    #[error("dedup reconstruction mismatch: expected {expected} bytes, produced {actual}")]
    Reconstruction { expected: usize, actual: usize },
}

/// Returned when a dedup mode string is neither `exact` nor `off`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid dedup mode '{0}' (expected 'exact' or 'off')")]
pub struct ParseDedupModeError(pub String);
