//! UTF-8-safe string truncation utilities

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics on multi-byte
/// characters.
///
/// # Examples
/// ```
/// # use crawldoc::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Count characters (Unicode scalar values), not bytes.
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(safe_truncate_chars("┌──┐", 2), "┌─");
        assert_eq!(safe_truncate_chars("", 3), "");
    }

    #[test]
    fn char_len_counts_scalars() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("⟨1⟩"), 3);
    }
}
