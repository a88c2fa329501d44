//! Whitespace normalization and source position helpers.

/// Collapse all runs of whitespace (including newlines) into single spaces
/// and trim both ends.
///
/// This is the equivalence used when comparing a rendered changelog with its
/// source: two documents are the same modulo whitespace when their normalized
/// forms are equal.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::text::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("*   Add beam\n    search"), "* Add beam search");
/// assert_eq!(normalize_whitespace("\n\n"), "");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a byte offset into `source` to a 1-based line number.
///
/// Offsets past the end clamp to the last line.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::text::line_at;
///
/// let source = "# Version: 0.3.0\n## Note\n*   Build Date: 20230201\n";
/// assert_eq!(line_at(source, 0), 1);
/// assert_eq!(line_at(source, 18), 2);
/// ```
pub fn line_at(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Split `Key: Value` text at the first colon.
///
/// Returns `None` when there is no colon or the key is empty.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::text::split_field;
///
/// assert_eq!(split_field("Build Date: 20221114"), Some(("Build Date", "20221114")));
/// assert_eq!(split_field("no field here"), None);
/// ```
pub fn split_field(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // normalize_whitespace tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_normalize_whitespace_mixed() {
        assert_eq!(normalize_whitespace("  a\tb\n\n   c  "), "a b c");
    }

    #[test]
    fn test_normalize_whitespace_unicode() {
        assert_eq!(normalize_whitespace("音楽\n理論"), "音楽 理論");
    }

    // ------------------------------------------------------------------------
    // line_at tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_line_at_clamps() {
        assert_eq!(line_at("a\nb", 100), 2);
    }

    #[test]
    fn test_line_at_empty() {
        assert_eq!(line_at("", 0), 1);
    }

    // ------------------------------------------------------------------------
    // split_field tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_field_keeps_later_colons() {
        assert_eq!(
            split_field("Note: see https://example.com"),
            Some(("Note", "see https://example.com"))
        );
    }

    #[test]
    fn test_split_field_empty_key() {
        assert_eq!(split_field(": value"), None);
    }

    #[test]
    fn test_split_field_empty_value() {
        assert_eq!(split_field("Commit:"), Some(("Commit", "")));
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn test_normalize_whitespace_idempotent(s in "\\PC*") {
            let once = normalize_whitespace(&s);
            prop_assert_eq!(normalize_whitespace(&once), once.clone());
        }

        #[test]
        fn test_normalize_whitespace_has_no_double_spaces(s in "[a-z \\t\\n]*") {
            let normalized = normalize_whitespace(&s);
            prop_assert!(!normalized.contains("  "));
            prop_assert!(!normalized.contains('\n'));
        }
    }
}
