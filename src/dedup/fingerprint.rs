//! Section fingerprints
//!
//! The normalized form exists only to compare sections; it is never
//! written to output.

use xxhash_rust::xxh3::xxh3_128;

/// 128-bit fingerprint of a section's normalized text
pub(crate) type Fingerprint = u128;

/// Normalize a section for comparison.
///
/// - `\r\n` and lone `\r` become `\n`
/// - trailing whitespace is trimmed from every line
/// - trailing blank lines are dropped
pub(crate) fn normalize_section(section: &str) -> String {
    let unified = section.replace("\r\n", "\n").replace('\r', "\n");

    let mut normalized = String::with_capacity(unified.len());
    for (i, line) in unified.split('\n').enumerate() {
        if i > 0 {
            normalized.push('\n');
        }
        normalized.push_str(line.trim_end());
    }

    let kept = normalized.trim_end_matches('\n').len();
    normalized.truncate(kept);
    normalized
}

pub(crate) fn fingerprint(section: &str) -> Fingerprint {
    xxh3_128(normalize_section(section).as_bytes())
}
