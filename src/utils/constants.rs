//! Shared configuration constants for crawldoc
//!
//! This module contains default values and limits used throughout the
//! pipeline to ensure consistency and avoid magic numbers.

/// Default guardrail threshold for the section removal rate: 60%
///
/// A dedup pass that drops more than this share of a page's sections is
/// flagged in metadata. The value was picked from real documentation
/// crawls where tabbed/duplicated navigation blocks routinely account for
/// 30-50% of sections; anything well above that usually means the page
/// itself is a repetition (mirror pages, infinite-scroll artifacts).
///
/// The guardrail never changes content, so tuning this only affects the
/// `dedup_guardrail_*` metadata keys. Override via
/// `BuildOptions::builder().guardrail_threshold(..)`.
pub const DEFAULT_GUARDRAIL_RATE_THRESHOLD: f64 = 0.6;

/// Maximum markdown size the dedup pass will process (10 MB)
///
/// Larger inputs are passed through unmodified with `dedup_applied = false`.
pub const MAX_DEDUP_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Maximum HTML size accepted by the markdown regenerator (10 MB)
///
/// Matches the dedup limit so a regenerated variant can always be deduped.
pub const MAX_REGENERATION_HTML_BYTES: usize = 10 * 1024 * 1024;

/// Maximum length of a file stem derived from a URL
pub const MAX_FILENAME_CHARS: usize = 100;

/// File name used when writing several documents as one JSON array
pub const COMBINED_JSON_FILENAME: &str = "crawl_results.json";
