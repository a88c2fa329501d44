//! Changelog parsing on top of `pulldown-cmark`.
//!
//! The document is walked as a flat sequence of top-level blocks:
//!
//! - a heading at the release level that matches the release pattern opens a
//!   new [`ReleaseNote`]
//! - a heading at the section level opens a [`Section`] of the current release
//! - lists become [`Block::List`] with nested [`Item`]s
//! - everything else is kept verbatim as [`Block::Raw`]
//!
//! Content before the first release is the changelog preamble.
//!
//! # Example
//!
//! ```rust
//! use relnotes_content::markdown::parser::parse;
//!
//! let content = "# Version: 0.2.1\n## Note\n*   Build Date: 20221121\n";
//! let changelog = parse(content).unwrap();
//!
//! let release = changelog.latest().unwrap();
//! assert_eq!(release.version().to_string(), "0.2.1");
//! assert_eq!(release.build_date().unwrap().as_str(), "20221121");
//! ```

use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;
use relnotes_core::util::text::line_at;
use relnotes_core::{Error, Result};
use semver::Version;

use crate::changelog::Changelog;
use crate::markdown::helpers::{
    collapse, content_column, dedent_block, heading_title, item_marker,
};
use crate::model::{Block, Heading, Item, ReleaseNote, Section, SectionKind};
use crate::options::ParseOptions;

/// Parse a changelog with default options.
pub fn parse(content: &str) -> Result<Changelog> {
    parse_with(content, &ParseOptions::default())
}

/// Parse a changelog.
///
/// # Errors
///
/// - [`Error::Config`] if the options are inconsistent
/// - [`Error::Parse`] if a release heading carries an invalid version, or a
///   heading at the release level that names no version follows the first
///   release
pub fn parse_with(content: &str, options: &ParseOptions) -> Result<Changelog> {
    let pattern = options.release_pattern()?;
    let mut doc = DocumentBuilder::new(content, options, &pattern);
    let mut events = Parser::new(content).into_offset_iter();

    while let Some((event, range)) = events.next() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                skip_block(&mut events);
                doc.heading(level as u8, range)?;
            }
            Event::Start(Tag::List(_)) => {
                let items = collect_list(content, &mut events);
                doc.block(Block::List(items));
            }
            Event::Start(_) => {
                skip_block(&mut events);
                doc.raw(range);
            }
            Event::Rule | Event::Html(_) => doc.raw(range),
            _ => {}
        }
    }

    let changelog = doc.finish();
    log::debug!("Parsed {} release(s)", changelog.len());
    Ok(changelog)
}

/// Consume events up to the end of the block whose start was just read.
fn skip_block<'a, I>(events: &mut I)
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    let mut depth = 1usize;
    for (event, _) in events.by_ref() {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Collect the items of a list whose `Start(List)` was just read.
fn collect_list<'a, I>(source: &str, events: &mut I) -> Vec<Item>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    let mut items = Vec::new();
    while let Some((event, range)) = events.next() {
        match event {
            Event::Start(Tag::Item) => items.push(collect_item(source, events, range)),
            Event::End(TagEnd::List(_)) => break,
            Event::Start(_) => skip_block(events),
            _ => {}
        }
    }
    items
}

/// Collect one item whose `Start(Item)` was just read.
///
/// The item's own text is its first paragraph. Lists directly after it are
/// its children; any later block (another paragraph, a code block, a list
/// after those) is kept in order as a trailing block.
fn collect_item<'a, I>(source: &str, events: &mut I, range: Range<usize>) -> Item
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    let (marker, body_start) = item_marker(source, range.start);
    let indent = content_column(source, body_start);
    let mut own_end = body_start;
    let mut has_text = false;
    let mut children = Vec::new();
    let mut trailing = Vec::new();

    while let Some((event, inner)) = events.next() {
        let in_text = children.is_empty() && trailing.is_empty();
        match event {
            Event::End(TagEnd::Item) => break,
            Event::Start(Tag::List(_)) => {
                let items = collect_list(source, events);
                if trailing.is_empty() {
                    children.extend(items);
                } else {
                    trailing.push(Block::List(items));
                }
            }
            Event::Start(Tag::Paragraph) if in_text && !has_text => {
                skip_block(events);
                own_end = inner.end;
                has_text = true;
            }
            Event::Start(tag) if in_text && is_inline(&tag) => {
                skip_block(events);
                own_end = inner.end;
                has_text = true;
            }
            Event::Start(_) => {
                skip_block(events);
                push_raw(&mut trailing, dedent_block(source, inner, indent));
            }
            Event::End(_) => {}
            _ if in_text => {
                own_end = own_end.max(inner.end);
                has_text = true;
            }
            _ => push_raw(&mut trailing, dedent_block(source, inner, indent)),
        }
    }

    let body_end = own_end.max(body_start).min(source.len());
    let text = collapse(&source[body_start.min(body_end)..body_end]);
    Item {
        marker,
        text,
        children,
        trailing,
    }
}

fn push_raw(blocks: &mut Vec<Block>, text: String) {
    if !text.trim().is_empty() {
        blocks.push(Block::Raw(text));
    }
}

/// Tags that only occur inside a paragraph.
fn is_inline(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Link { .. }
            | Tag::Image { .. }
            | Tag::Superscript
            | Tag::Subscript
    )
}

// ============================================================================
// DocumentBuilder
// ============================================================================

struct PendingRelease {
    version: Version,
    heading: Heading,
    line: usize,
    sections: Vec<Section>,
}

struct DocumentBuilder<'s> {
    source: &'s str,
    options: &'s ParseOptions,
    pattern: &'s Regex,
    preamble: Vec<Block>,
    releases: Vec<ReleaseNote>,
    current: Option<PendingRelease>,
}

impl<'s> DocumentBuilder<'s> {
    fn new(source: &'s str, options: &'s ParseOptions, pattern: &'s Regex) -> Self {
        Self {
            source,
            options,
            pattern,
            preamble: Vec::new(),
            releases: Vec::new(),
            current: None,
        }
    }

    fn heading(&mut self, level: u8, range: Range<usize>) -> Result<()> {
        let raw = &self.source[range.clone()];
        let title = heading_title(raw);
        let line = line_at(self.source, range.start);

        if level == self.options.release_heading_level {
            if let Some(caps) = self.pattern.captures(&title) {
                let text = caps.name("version").map(|m| m.as_str()).unwrap_or("");
                let version = Version::parse(text).map_err(|e| {
                    Error::parse(line, format!("invalid version '{text}' in release heading: {e}"))
                })?;
                self.flush();
                log::debug!("Release {version} at line {line}");
                self.current = Some(PendingRelease {
                    version,
                    heading: Heading { level, title },
                    line,
                    sections: Vec::new(),
                });
                return Ok(());
            }
            if self.current.is_some() {
                return Err(Error::parse(
                    line,
                    format!("heading '{title}' at release level does not name a version"),
                ));
            }
            self.raw(range);
            return Ok(());
        }

        match self.current.as_mut() {
            Some(release) if level == self.options.section_heading_level => {
                let kind = SectionKind::classify(Some(&title), self.options);
                release
                    .sections
                    .push(Section::new(Some(title), level, kind));
            }
            _ => self.raw(range),
        }
        Ok(())
    }

    fn raw(&mut self, range: Range<usize>) {
        let text = self.source[range].trim_end().to_string();
        if !text.is_empty() {
            self.block(Block::Raw(text));
        }
    }

    fn block(&mut self, block: Block) {
        let Some(release) = self.current.as_mut() else {
            self.preamble.push(block);
            return;
        };
        if release.sections.is_empty() {
            release.sections.push(Section::new(
                None,
                self.options.section_heading_level,
                SectionKind::Other,
            ));
        }
        if let Some(section) = release.sections.last_mut() {
            section.blocks.push(block);
        }
    }

    fn flush(&mut self) {
        if let Some(pending) = self.current.take() {
            self.releases.push(ReleaseNote::from_parts(
                pending.version,
                pending.heading,
                pending.sections,
                self.options,
                pending.line,
            ));
        }
    }

    fn finish(mut self) -> Changelog {
        self.flush();
        Changelog::from_parts(self.preamble, self.releases)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ENTRY: &str = "\
# Version: 0.2.0
## Major Features and Improvements
*   Preparatory work for Fiddle integration
*   Optimizer additions and improvements:
    -   HeroLion
    -   ShardedAdagrad
*   Add `ExtendNSteps` decoding
    for sequence models
## Deprecations
*   Remove legacy `BaseHParams` helpers
## Note
*   Version: 0.2.0
*   Build Date: 20221114
*   Praxis commit: 413da1ad8148f27faebca119f8c5deedca66228b
";

    // ------------------------------------------------------------------------
    // Release structure
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_single_release() {
        let changelog = parse(ENTRY).unwrap();
        assert_eq!(changelog.len(), 1);

        let release = &changelog.releases()[0];
        assert_eq!(release.version(), &Version::new(0, 2, 0));
        assert_eq!(release.heading().title, "Version: 0.2.0");
        assert_eq!(release.build_date().unwrap().as_str(), "20221114");
        assert_eq!(
            release.source_commit(),
            Some("413da1ad8148f27faebca119f8c5deedca66228b")
        );
        assert_eq!(release.line(), 1);
    }

    #[test]
    fn test_parse_sections() {
        let changelog = parse(ENTRY).unwrap();
        let sections = changelog.releases()[0].sections();
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Features,
                SectionKind::Deprecations,
                SectionKind::Note
            ]
        );
    }

    #[test]
    fn test_parse_features_and_nested_items() {
        let changelog = parse(ENTRY).unwrap();
        let release = &changelog.releases()[0];
        assert_eq!(
            release.features(),
            vec![
                "Preparatory work for Fiddle integration",
                "Optimizer additions and improvements:",
                "Add `ExtendNSteps` decoding for sequence models",
            ]
        );

        let optimizers = release.sections()[0].items().nth(1).unwrap();
        let children: Vec<&str> = optimizers.children.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(children, vec!["HeroLion", "ShardedAdagrad"]);
        assert_eq!(optimizers.children[0].marker, "-");
        assert_eq!(optimizers.marker, "*");
    }

    #[test]
    fn test_parse_item_content_after_nested_list() {
        let content = "\
# Version: 0.2.0
## Major Features and Improvements
*   Optimizers:
    -   HeroLion

    Tuned for bfloat16
    stability.

    -   Shampoo
";
        let changelog = parse(content).unwrap();
        let item = changelog.releases()[0].sections()[0].items().next().unwrap();
        assert_eq!(item.text, "Optimizers:");
        assert_eq!(item.children, vec![Item::new("-", "HeroLion")]);
        assert_eq!(
            item.trailing,
            vec![
                Block::Raw("Tuned for bfloat16\nstability.".to_string()),
                Block::List(vec![Item::new("-", "Shampoo")]),
            ]
        );
    }

    #[test]
    fn test_parse_second_paragraph_is_not_item_text() {
        let content = "# Version: 0.2.0\n## Deprecations\n*   Drop `BaseHParams`\n\n    Use Fiddle configs instead.\n";
        let changelog = parse(content).unwrap();
        let release = &changelog.releases()[0];
        assert_eq!(release.deprecations(), vec!["Drop `BaseHParams`"]);
        let item = release.sections()[0].items().next().unwrap();
        assert_eq!(
            item.trailing,
            vec![Block::Raw("Use Fiddle configs instead.".to_string())]
        );
    }

    #[test]
    fn test_parse_deprecations() {
        let changelog = parse(ENTRY).unwrap();
        assert_eq!(
            changelog.releases()[0].deprecations(),
            vec!["Remove legacy `BaseHParams` helpers"]
        );
    }

    #[test]
    fn test_parse_multiple_releases() {
        let content = "\
# Version: 0.2.1
## Note
*   Version: 0.2.1
*   Build Date: 20221121
# Version: 0.2.0
## Note
*   Build Date: 20221114
";
        let changelog = parse(content).unwrap();
        let versions: Vec<String> = changelog
            .releases()
            .iter()
            .map(|r| r.version().to_string())
            .collect();
        assert_eq!(versions, vec!["0.2.1", "0.2.0"]);
        assert_eq!(changelog.releases()[1].line(), 5);
    }

    // ------------------------------------------------------------------------
    // Preamble and raw blocks
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_preamble() {
        let content = "# Praxis Release Notes\n\nSee below.\n\n# Version: 0.1.0\n## Note\n*   Build Date: 20220702\n";
        let changelog = parse(content).unwrap();
        assert_eq!(
            changelog.preamble(),
            &[
                Block::Raw("# Praxis Release Notes".to_string()),
                Block::Raw("See below.".to_string()),
            ]
        );
        assert_eq!(changelog.len(), 1);
    }

    #[test]
    fn test_parse_untitled_lead_in() {
        let content = "# Version: 0.3.0\nFirst release with Jax Array support.\n## Note\n*   Build Date: 20230201\n";
        let changelog = parse(content).unwrap();
        let first = &changelog.releases()[0].sections()[0];
        assert!(first.title.is_none());
        assert_eq!(first.kind, SectionKind::Other);
        assert_eq!(
            first.blocks,
            vec![Block::Raw("First release with Jax Array support.".to_string())]
        );
    }

    #[test]
    fn test_parse_deeper_heading_is_raw() {
        let content = "# Version: 0.3.0\n## Major Features and Improvements\n### Optimizers\n*   Shampoo\n";
        let changelog = parse(content).unwrap();
        let section = &changelog.releases()[0].sections()[0];
        assert_eq!(section.blocks[0], Block::Raw("### Optimizers".to_string()));
        assert_eq!(changelog.releases()[0].features(), vec!["Shampoo"]);
    }

    #[test]
    fn test_parse_code_block_is_raw() {
        let content = "# Version: 0.3.0\n## Note\n```\npip install praxis==0.3.0\n```\n";
        let changelog = parse(content).unwrap();
        let section = &changelog.releases()[0].sections()[0];
        assert_eq!(
            section.blocks,
            vec![Block::Raw("```\npip install praxis==0.3.0\n```".to_string())]
        );
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_invalid_version() {
        let content = "# Version: 0.2.0\n## Note\n*   Build Date: 20221114\n# Version: 0.x\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("invalid version '0.x'"));
    }

    #[test]
    fn test_parse_unversioned_release_heading_after_first() {
        let content = "# Version: 0.2.0\n## Note\n# Appendix\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("does not name a version"));
    }

    #[test]
    fn test_parse_bad_options() {
        let options = ParseOptions {
            release_heading_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            parse_with(ENTRY, &options),
            Err(Error::Config { .. })
        ));
    }

    // ------------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_custom_levels_and_pattern() {
        let content = "# Changelog\n## [1.2.0]\n### Features\n- Add things\n### Note\n- Build Date: 2023-03-01\n";
        let options = ParseOptions {
            release_heading_level: 2,
            section_heading_level: 3,
            release_heading_pattern: r"^\[(?P<version>[^\]]+)\]$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        let changelog = parse_with(content, &options).unwrap();
        let release = changelog.latest().unwrap();
        assert_eq!(release.version(), &Version::new(1, 2, 0));
        assert_eq!(release.features(), vec!["Add things"]);
        assert!(release.build_date().unwrap().is_valid());
        assert_eq!(changelog.preamble(), &[Block::Raw("# Changelog".to_string())]);
    }

    #[test]
    fn test_parse_empty() {
        let changelog = parse("").unwrap();
        assert!(changelog.is_empty());
        assert!(changelog.preamble().is_empty());
    }
}
