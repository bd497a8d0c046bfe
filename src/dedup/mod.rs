//! Exact-match markdown section dedup
//!
//! Rendered pages often repeat whole blocks: tabbed content rendered once
//! per tab, "On this page" summaries that duplicate the body, responsive
//! layouts that emit the same section twice. This module removes those
//! repetitions within a single document.
//!
//! # Algorithm (`exact` mode)
//!
//! 1. Split the text into sections at blank lines and before heading lines
//!    (see [`sections`]).
//! 2. Fingerprint each section's normalized form (see [`fingerprint`]).
//! 3. Keep a section the first time its fingerprint is seen; drop later
//!    repeats.
//! 4. Reassemble the kept sections verbatim, each with the separator that
//!    originally preceded it.
//!
//! Kept sections are never normalized in the output, so a document with no
//! repeats comes back byte-identical, and running the pass on its own
//! output changes nothing.

pub mod errors;
pub(crate) mod fingerprint;
pub(crate) mod sections;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::document::JsonMap;
use crate::utils::{MAX_DEDUP_INPUT_BYTES, char_len};

pub use errors::{DedupError, ParseDedupModeError};

use fingerprint::fingerprint;
use sections::split_sections;

/// Dedup strategy selected by the caller for each build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Drop sections whose normalized text repeats an earlier section
    #[default]
    Exact,
    /// Leave content untouched
    Off,
}

impl DedupMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DedupMode::Exact => "exact",
            DedupMode::Off => "off",
        }
    }
}

impl fmt::Display for DedupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupMode {
    type Err = ParseDedupModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(DedupMode::Exact),
            "off" => Ok(DedupMode::Off),
            _ => Err(ParseDedupModeError(s.to_string())),
        }
    }
}

/// What the dedup pass did to one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupMetrics {
    pub mode: DedupMode,
    /// Sections found by the splitter
    pub sections_total: usize,
    /// Sections dropped as repeats
    pub sections_removed: usize,
    /// Characters (not bytes) in the dropped sections
    pub chars_removed: usize,
    /// `false` when dedup was off or degraded to a pass-through
    pub applied: bool,
    /// Why dedup degraded, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DedupMetrics {
    /// Metrics for a pass that did nothing
    #[must_use]
    pub fn inert(mode: DedupMode) -> Self {
        Self {
            mode,
            sections_total: 0,
            sections_removed: 0,
            chars_removed: 0,
            applied: false,
            note: None,
        }
    }

    /// Write the `dedup_*` keys into document metadata.
    pub fn write_metadata(&self, metadata: &mut JsonMap) {
        metadata.insert("dedup_mode".into(), Value::from(self.mode.as_str()));
        metadata.insert("dedup_sections_total".into(), Value::from(self.sections_total));
        metadata.insert("dedup_sections_removed".into(), Value::from(self.sections_removed));
        metadata.insert("dedup_chars_removed".into(), Value::from(self.chars_removed));
        metadata.insert("dedup_applied".into(), Value::from(self.applied));
        if let Some(note) = &self.note {
            metadata.insert("dedup_note".into(), Value::from(note.as_str()));
        }
    }
}

/// Apply `mode` to `text`.
///
/// Never fails: if exact dedup hits an internal error the original text is
/// returned unchanged with `applied: false` and the error in `note`.
#[must_use]
pub fn dedup(text: &str, mode: DedupMode) -> (String, DedupMetrics) {
    match mode {
        DedupMode::Off => (text.to_string(), DedupMetrics::inert(DedupMode::Off)),
        DedupMode::Exact => match dedup_exact(text) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Markdown dedup failed, passing content through unmodified");
                let mut metrics = DedupMetrics::inert(DedupMode::Exact);
                metrics.note = Some(e.to_string());
                (text.to_string(), metrics)
            }
        },
    }
}

/// Remove repeated sections, first occurrence wins.
///
/// # Errors
///
/// Returns [`DedupError`] when the input is larger than
/// [`MAX_DEDUP_INPUT_BYTES`] or when reassembly violates the no-op
/// guarantee. Callers normally go through [`dedup`], which degrades
/// instead of failing.
pub fn dedup_exact(text: &str) -> Result<(String, DedupMetrics), DedupError> {
    if text.len() > MAX_DEDUP_INPUT_BYTES {
        return Err(DedupError::InputTooLarge {
            size: text.len(),
            limit: MAX_DEDUP_INPUT_BYTES,
        });
    }

    let split = split_sections(text);
    let mut seen = HashSet::with_capacity(split.sections.len());
    let mut output = String::with_capacity(text.len());
    let mut sections_removed = 0;
    let mut chars_removed = 0;

    // The first section is always kept, so its separator (the leading
    // blank prefix) always reaches the output.
    for section in &split.sections {
        if seen.insert(fingerprint(section.text)) {
            output.push_str(section.separator);
            output.push_str(section.text);
        } else {
            sections_removed += 1;
            chars_removed += char_len(section.text);
        }
    }
    output.push_str(split.trailing);

    if sections_removed == 0 && output != text {
        return Err(DedupError::Reconstruction {
            expected: text.len(),
            actual: output.len(),
        });
    }

    debug!(
        sections_total = split.sections.len(),
        sections_removed,
        chars_removed,
        "Exact dedup complete"
    );

    let metrics = DedupMetrics {
        mode: DedupMode::Exact,
        sections_total: split.sections.len(),
        sections_removed,
        chars_removed,
        applied: true,
        note: None,
    };
    Ok((output, metrics))
}
