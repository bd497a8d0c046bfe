//! Dedup guardrail
//!
//! Flags documents where the dedup pass removed a suspiciously large share
//! of sections. The guardrail only annotates metadata; it never touches
//! content, and a triggered guardrail does not undo the dedup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dedup::{DedupMetrics, DedupMode};
use crate::document::JsonMap;

/// Guardrail evaluated and the removal rate exceeded the threshold
pub const REASON_HIGH_REMOVAL_RATE: &str = "high-removal-rate";
/// Guardrail evaluated and the removal rate was acceptable
pub const REASON_WITHIN_THRESHOLD: &str = "within-threshold";
/// Guardrail skipped (dedup off, or nothing to measure)
pub const REASON_NOT_CHECKED: &str = "not-checked";

/// Outcome of a guardrail evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub checked: bool,
    pub triggered: bool,
    pub reason: String,
    /// `sections_removed / sections_total`, 0.0 when not checked
    pub removal_rate: f64,
    pub rate_threshold: f64,
}

impl GuardrailResult {
    /// Write the `dedup_guardrail_*` keys into document metadata.
    pub fn write_metadata(&self, metadata: &mut JsonMap) {
        metadata.insert("dedup_guardrail_checked".into(), Value::from(self.checked));
        metadata.insert("dedup_guardrail_triggered".into(), Value::from(self.triggered));
        metadata.insert("dedup_guardrail_reason".into(), Value::from(self.reason.as_str()));
        metadata.insert(
            "dedup_guardrail_section_removal_rate".into(),
            Value::from(self.removal_rate),
        );
        metadata.insert(
            "dedup_guardrail_section_rate_threshold".into(),
            Value::from(self.rate_threshold),
        );
    }
}

/// Evaluate the section removal rate against `threshold`.
///
/// Only exact-mode metrics with at least one section are evaluated; the
/// guardrail triggers when the rate is strictly greater than `threshold`.
#[must_use]
pub fn evaluate(metrics: &DedupMetrics, threshold: f64) -> GuardrailResult {
    if metrics.mode != DedupMode::Exact || metrics.sections_total == 0 {
        return GuardrailResult {
            checked: false,
            triggered: false,
            reason: REASON_NOT_CHECKED.to_string(),
            removal_rate: 0.0,
            rate_threshold: threshold,
        };
    }

    let removal_rate = metrics.sections_removed as f64 / metrics.sections_total as f64;
    let triggered = removal_rate > threshold;

    GuardrailResult {
        checked: true,
        triggered,
        reason: if triggered {
            REASON_HIGH_REMOVAL_RATE
        } else {
            REASON_WITHIN_THRESHOLD
        }
        .to_string(),
        removal_rate,
        rate_threshold: threshold,
    }
}
