//! Section splitting for exact-match dedup
//!
//! A section is a run of non-blank lines. Boundaries occur at blank lines
//! (empty or whitespace-only) and immediately before an ATX heading line,
//! even without a blank line in front of it. Without the heading rule a
//! trailing paragraph and the repeated `## Heading` block that follows it
//! would fuse into one section and the repetition would go undetected.
//!
//! Splitting is lossless: every byte of the input belongs to exactly one
//! section's `separator`, one section's `text`, or the trailing suffix, so
//! concatenating them reproduces the input byte for byte.

/// One section plus the text that preceded it in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Section<'a> {
    /// Line terminators and blank lines between the previous section and
    /// this one. For the first section this is the document's leading
    /// blank prefix.
    pub separator: &'a str,
    /// Original section text, without its final line terminator
    pub text: &'a str,
}

/// A document split into sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SplitDocument<'a> {
    pub sections: Vec<Section<'a>>,
    /// Everything after the last section (final terminator, trailing blank lines)
    pub trailing: &'a str,
}

/// Byte span of one line's content, excluding its terminator
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    start: usize,
    content_end: usize,
}

/// Scan line spans, treating `\n`, `\r\n` and a lone `\r` as terminators.
fn scan_lines(text: &str) -> Vec<LineSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                spans.push(LineSpan { start, content_end: i });
                i += 1;
                start = i;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 2 } else { i + 1 };
                spans.push(LineSpan { start, content_end: i });
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        spans.push(LineSpan {
            start,
            content_end: bytes.len(),
        });
    }

    spans
}

/// ATX heading: up to three spaces of indentation, 1-6 `#`, whitespace,
/// then at least one non-whitespace character.
pub(crate) fn is_heading_line(line: &str) -> bool {
    let unindented = line.trim_start_matches(' ');
    if line.len() - unindented.len() > 3 {
        return false;
    }

    let after_hashes = unindented.trim_start_matches('#');
    let hashes = unindented.len() - after_hashes.len();
    if !(1..=6).contains(&hashes) {
        return false;
    }

    after_hashes.starts_with([' ', '\t']) && !after_hashes.trim().is_empty()
}

/// Split `text` into sections, keeping the original separators.
pub(crate) fn split_sections(text: &str) -> SplitDocument<'_> {
    let mut sections = Vec::new();
    // Byte range of the section being accumulated
    let mut current: Option<(usize, usize)> = None;
    // Start of the separator preceding the next section
    let mut separator_start = 0;

    for line in scan_lines(text) {
        let content = &text[line.start..line.content_end];

        if content.trim().is_empty() {
            if let Some((start, end)) = current.take() {
                sections.push(Section {
                    separator: &text[separator_start..start],
                    text: &text[start..end],
                });
                separator_start = end;
            }
            continue;
        }

        current = match current {
            Some((start, end)) if is_heading_line(content) => {
                sections.push(Section {
                    separator: &text[separator_start..start],
                    text: &text[start..end],
                });
                separator_start = end;
                Some((line.start, line.content_end))
            }
            Some((start, _)) => Some((start, line.content_end)),
            None => Some((line.start, line.content_end)),
        };
    }

    if let Some((start, end)) = current {
        sections.push(Section {
            separator: &text[separator_start..start],
            text: &text[start..end],
        });
        separator_start = end;
    }

    SplitDocument {
        sections,
        trailing: &text[separator_start..],
    }
}
