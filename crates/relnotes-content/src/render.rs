//! Markdown rendering of release notes.
//!
//! Output uses ATX headings at the stored levels, bullets padded to a
//! four-column content offset (`*   text`), and a blank line between blocks
//! and before every heading except the first line.
//!
//! Rendering a parsed document gives back the source modulo whitespace; see
//! [`is_round_trip_stable`].

use relnotes_core::Result;
use relnotes_core::util::text::normalize_whitespace;

use crate::markdown::parser::parse_with;
use crate::model::{Block, Item, ReleaseNote, Section};
use crate::options::ParseOptions;

/// Column at which item text starts, relative to the marker.
const CONTENT_OFFSET: usize = 4;

/// Incremental Markdown writer that tracks block separation.
#[derive(Debug, Default)]
pub struct MarkdownWriter {
    out: String,
    after_heading: bool,
}

impl MarkdownWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an ATX heading.
    pub fn heading(&mut self, level: u8, title: &str) {
        self.separate();
        self.out.push_str(&"#".repeat(usize::from(level.max(1))));
        if !title.is_empty() {
            self.out.push(' ');
            self.out.push_str(title);
        }
        self.out.push('\n');
        self.after_heading = true;
    }

    /// Write a block. Consecutive blocks are separated by a blank line; a
    /// block directly after a heading is not.
    pub fn block(&mut self, block: &Block) {
        if !self.out.is_empty() && !self.after_heading {
            self.out.push('\n');
        }
        match block {
            Block::List(items) => self.items(items, 0),
            Block::Raw(text) => {
                self.out.push_str(text.trim_end());
                self.out.push('\n');
            }
        }
        self.after_heading = false;
    }

    /// Write a section heading (if titled) and its blocks.
    pub fn section(&mut self, section: &Section) {
        if let Some(title) = &section.title {
            self.heading(section.level, title);
        }
        for block in &section.blocks {
            self.block(block);
        }
    }

    /// Write a full release entry.
    pub fn release(&mut self, release: &ReleaseNote) {
        let heading = release.heading();
        self.heading(heading.level, &heading.title);
        for section in release.sections() {
            self.section(section);
        }
    }

    /// Finish and return the text.
    pub fn finish(self) -> String {
        self.out
    }

    fn items(&mut self, items: &[Item], indent: usize) {
        for item in items {
            let pad = CONTENT_OFFSET.saturating_sub(item.marker.len()).max(1);
            self.out.push_str(&" ".repeat(indent));
            self.out.push_str(&item.marker);
            if item.text.is_empty() {
                self.out.push('\n');
            } else {
                self.out.push_str(&" ".repeat(pad));
                self.out.push_str(&item.text);
                self.out.push('\n');
            }
            let content = indent + item.marker.len() + pad;
            self.items(&item.children, content);
            for block in &item.trailing {
                self.out.push('\n');
                match block {
                    Block::List(items) => self.items(items, content),
                    Block::Raw(text) => self.indented(text, content),
                }
            }
        }
    }

    fn indented(&mut self, text: &str, indent: usize) {
        for line in text.trim_end().lines() {
            if !line.is_empty() {
                self.out.push_str(&" ".repeat(indent));
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn separate(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }
}

/// Render a single release entry.
pub fn render_release(release: &ReleaseNote) -> String {
    let mut writer = MarkdownWriter::new();
    writer.release(release);
    writer.finish()
}

/// Render preamble blocks followed by releases.
pub fn render_document(preamble: &[Block], releases: &[ReleaseNote]) -> String {
    let mut writer = MarkdownWriter::new();
    for block in preamble {
        match block {
            // Preamble headings are kept raw; give them the same spacing as
            // written headings.
            Block::Raw(text) if text.starts_with('#') => {
                writer.separate();
                writer.out.push_str(text.trim_end());
                writer.out.push('\n');
                writer.after_heading = true;
            }
            other => writer.block(other),
        }
    }
    for release in releases {
        writer.release(release);
    }
    writer.finish()
}

/// Check that `rendered` carries every word of `source`, in order.
///
/// Markup (markers, heading underlines, escapes) is ignored, so a
/// reformatted document passes while one that lost text does not.
pub fn preserves_content(source: &str, rendered: &str) -> bool {
    fn words(text: &str) -> impl Iterator<Item = &str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
    }
    words(source).eq(words(rendered))
}

/// Check that rendering the parsed `content` reproduces it modulo
/// whitespace.
pub fn is_round_trip_stable(content: &str, options: &ParseOptions) -> Result<bool> {
    let rendered = parse_with(content, options)?.render();
    Ok(normalize_whitespace(&rendered) == normalize_whitespace(content))
}

// ============================================================================
// Tests
// ============================================================================
