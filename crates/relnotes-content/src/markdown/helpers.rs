//! Source-slice helpers for headings and list items.
//!
//! The parser works on byte ranges reported by `pulldown-cmark` and takes
//! heading and item text from the source itself, so inline Markdown
//! (backticks, links, emphasis) survives a parse/render cycle.

/// Extract the text of a heading from its source slice.
///
/// Handles ATX headings (`## Title ##`) and setext headings (`Title\n===`).
///
/// # Example
///
/// ```rust
/// use relnotes_content::markdown::helpers::heading_title;
///
/// assert_eq!(heading_title("# Version: 0.2.0\n"), "Version: 0.2.0");
/// assert_eq!(heading_title("## Note ##"), "Note");
/// assert_eq!(heading_title("Release Notes\n============="), "Release Notes");
/// ```
pub fn heading_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('#') {
        let title = trimmed.trim_start_matches('#').trim();
        // Optional closing sequence must be preceded by a space.
        let without_closing = title.trim_end_matches('#');
        if without_closing.len() < title.len()
            && (without_closing.is_empty() || without_closing.ends_with(char::is_whitespace))
        {
            return without_closing.trim_end().to_string();
        }
        return title.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() > 1 {
        lines.pop();
    }
    collapse(&lines.join(" "))
}

/// Return the list marker at the start of `raw` and the remaining text.
///
/// Recognises bullet markers (`*`, `-`, `+`) and ordered markers (`1.`,
/// `2)`). Leading indentation is ignored. Returns `None` if `raw` does not
/// start with a marker followed by whitespace or end of input.
///
/// # Example
///
/// ```rust
/// use relnotes_content::markdown::helpers::split_marker;
///
/// assert_eq!(split_marker("*   Add HeroLion"), Some(("*", "   Add HeroLion")));
/// assert_eq!(split_marker("  12. twelfth"), Some(("12.", " twelfth")));
/// assert_eq!(split_marker("plain text"), None);
/// ```
pub fn split_marker(raw: &str) -> Option<(&str, &str)> {
    let body = raw.trim_start_matches([' ', '\t']);
    let bytes = body.as_bytes();
    let marker_len = match bytes.first()? {
        b'*' | b'-' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            match bytes.get(digits) {
                Some(b'.') | Some(b')') if digits <= 9 => digits + 1,
                _ => return None,
            }
        }
        _ => return None,
    };

    let rest = &body[marker_len..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some((&body[..marker_len], rest))
    } else {
        None
    }
}

/// Backslash-escape text that would open a new block (a list marker, an ATX
/// heading, a block quote, a code fence or a thematic break) when written
/// as the text of a list item.
///
/// Inline Markdown is left alone, so `*emphasis*` keeps its meaning.
///
/// # Example
///
/// ```rust
/// use relnotes_content::markdown::helpers::escape_block_start;
///
/// assert_eq!(escape_block_start("- leading dash"), "\\- leading dash");
/// assert_eq!(escape_block_start("1. numbered"), "1\\. numbered");
/// assert_eq!(escape_block_start("*Fiddle* configs"), "*Fiddle* configs");
/// ```
pub fn escape_block_start(text: &str) -> String {
    if let Some((marker, _)) = split_marker(text) {
        let at = marker.len() - 1;
        return format!("{}\\{}", &text[..at], &text[at..]);
    }

    let hashes = text.bytes().take_while(|b| *b == b'#').count();
    let heading = (1..=6).contains(&hashes)
        && text[hashes..].chars().next().is_none_or(char::is_whitespace);
    let fence = text.starts_with("```") || text.starts_with("~~~");
    if heading || fence || text.starts_with('>') || is_thematic_break(text) {
        return format!("\\{text}");
    }
    text.to_string()
}

fn is_thematic_break(text: &str) -> bool {
    let marks: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_')
        && marks.iter().all(|c| *c == marks[0])
}

/// Find the marker of the list item whose source range starts at `start`.
///
/// Looks at the range itself first, then at the text between the start of
/// the line and `start`.
pub fn item_marker(source: &str, start: usize) -> (String, usize) {
    if let Some((marker, _)) = split_marker(&source[start..]) {
        let offset = source[start..].find(marker).unwrap_or(0);
        return (marker.to_string(), start + offset + marker.len());
    }

    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    match split_marker(&source[line_start..start]) {
        Some((marker, _)) => (marker.to_string(), start),
        None => ("*".to_string(), start),
    }
}

/// Column at which an item's content starts, given the offset just past its
/// marker.
pub fn content_column(source: &str, body_start: usize) -> usize {
    let line_start = source[..body_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &source[body_start..];
    let spaces = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    body_start - line_start + spaces
}

/// Take the source of a block nested in a list item and strip up to
/// `indent` columns of leading whitespace from each line.
///
/// The range is widened to the start of its first line when only
/// indentation precedes it, so every line is dedented the same way.
///
/// # Example
///
/// ```rust
/// use relnotes_content::markdown::helpers::dedent_block;
///
/// let source = "*   Optimizers\n\n    ```\n    pip install\n    ```\n";
/// let start = source.find("```").unwrap();
/// let end = source.len() - 1;
/// assert_eq!(dedent_block(source, start..end, 4), "```\npip install\n```");
/// ```
pub fn dedent_block(source: &str, range: std::ops::Range<usize>, indent: usize) -> String {
    let end = range.end.min(source.len());
    let mut start = range.start.min(end);
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        start = line_start;
    }

    source[start..end]
        .lines()
        .map(|line| {
            let strip = line
                .bytes()
                .take(indent)
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            line[strip..].trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Collapse whitespace runs into single spaces.
pub fn collapse(text: &str) -> String {
    relnotes_core::normalize_whitespace(text)
}

// ============================================================================
// Tests
// ============================================================================
