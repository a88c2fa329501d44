//! Release note data model.
//!
//! A [`ReleaseNote`] keeps both the typed attributes callers query
//! (version, build date, upstream commit, features, deprecations) and the
//! section/block/item structure needed to write the entry back out.
//!
//! Release notes are immutable once constructed: every field is private and
//! only readable through accessors.

use std::fmt;

use chrono::NaiveDate;
use relnotes_core::util::keys::key_matches;
use relnotes_core::util::text::split_field;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::options::ParseOptions;

// ============================================================================
// Items, blocks, sections
// ============================================================================

/// One bullet, with any nested bullets under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// List marker as written (`*`, `-`, `+`, `1.`).
    pub marker: String,
    /// Item text with the marker removed and whitespace collapsed.
    /// Inline Markdown is kept verbatim.
    pub text: String,
    /// Nested items directly under the text.
    pub children: Vec<Item>,
    /// Further blocks inside the item after its text and nested items
    /// (continuation paragraphs, code blocks, later lists), dedented.
    pub trailing: Vec<Block>,
}

impl Item {
    /// A leaf item with the given marker.
    pub fn new(marker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            text: text.into(),
            children: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Attach nested items.
    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    /// Attach blocks that follow the text and nested items.
    pub fn with_trailing(mut self, trailing: Vec<Block>) -> Self {
        self.trailing = trailing;
        self
    }

    /// This item followed by all of its descendants, depth first.
    ///
    /// Items of lists among the trailing blocks count as descendants.
    pub fn walk(&self) -> Vec<&Item> {
        let mut out = vec![self];
        let nested = self
            .children
            .iter()
            .chain(self.trailing.iter().flat_map(Block::items));
        for child in nested {
            out.extend(child.walk());
        }
        out
    }

    /// Parse the text as a `Key: Value` note field.
    pub fn as_field(&self) -> Option<NoteField> {
        split_field(&self.text).map(|(key, value)| NoteField {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// A top-level Markdown block inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A bullet or numbered list.
    List(Vec<Item>),
    /// Any other block (paragraph, code block, deeper heading), verbatim.
    Raw(String),
}

impl Block {
    /// Items of a list block; empty for raw blocks.
    pub fn items(&self) -> &[Item] {
        match self {
            Block::List(items) => items,
            Block::Raw(_) => &[],
        }
    }
}

/// What a section holds, decided from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Feature bullets.
    Features,
    /// Deprecation bullets.
    Deprecations,
    /// Build metadata (`Key: Value` bullets).
    Note,
    /// Anything else, including the untitled lead-in of a release.
    Other,
}

impl SectionKind {
    /// Classify a section title.
    pub fn classify(title: Option<&str>, options: &ParseOptions) -> Self {
        match title {
            Some(t) if key_matches(t, &options.note_titles) => SectionKind::Note,
            Some(t) if key_matches(t, &options.feature_titles) => SectionKind::Features,
            Some(t) if key_matches(t, &options.deprecation_titles) => SectionKind::Deprecations,
            _ => SectionKind::Other,
        }
    }
}

/// A titled part of a release entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text; `None` for content directly under the release heading.
    pub title: Option<String>,
    /// Heading level the section was written at.
    pub level: u8,
    /// Classification of the title.
    pub kind: SectionKind,
    /// Blocks in document order.
    pub blocks: Vec<Block>,
}

impl Section {
    /// An empty section.
    pub fn new(title: Option<String>, level: u8, kind: SectionKind) -> Self {
        Self {
            title,
            level,
            kind,
            blocks: Vec::new(),
        }
    }

    /// Top-level items of every list in the section.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.blocks.iter().flat_map(Block::items)
    }

    /// Title for display; untitled sections show as an empty string.
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// A `Key: Value` bullet from the Note section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteField {
    /// Key as written.
    pub key: String,
    /// Value, trimmed.
    pub value: String,
}

// ============================================================================
// BuildDate
// ============================================================================

/// A build date stamp.
///
/// The raw text is kept so the entry renders back unchanged; the calendar
/// date is present only when the text matches the configured format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDate {
    raw: String,
    date: Option<NaiveDate>,
}

impl BuildDate {
    /// Interpret `raw` with a `chrono` format string.
    pub fn parse(raw: &str, format: &str) -> Self {
        let raw = raw.trim();
        Self {
            raw: raw.to_string(),
            date: NaiveDate::parse_from_str(raw, format).ok(),
        }
    }

    /// Text as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Calendar date, when the text is well formed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Whether the text matched the date format.
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
    }
}

impl fmt::Display for BuildDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// ReleaseNote
// ============================================================================

/// Release heading as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level.
    pub level: u8,
    /// Heading text without `#` markers.
    pub title: String,
}

/// One versioned entry of the changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNote {
    version: Version,
    heading: Heading,
    sections: Vec<Section>,
    build_date: Option<BuildDate>,
    source_commit: Option<String>,
    upstream_version: Option<String>,
    note_version: Option<String>,
    line: usize,
}

impl ReleaseNote {
    /// Assemble a release note and derive its typed attributes from the
    /// Note section.
    ///
    /// `line` is the 1-based source line of the heading, or 0 for notes that
    /// were built rather than parsed.
    pub fn from_parts(
        version: Version,
        heading: Heading,
        sections: Vec<Section>,
        options: &ParseOptions,
        line: usize,
    ) -> Self {
        let fields: Vec<NoteField> = sections
            .iter()
            .filter(|s| s.kind == SectionKind::Note)
            .flat_map(|s| s.items())
            .filter_map(Item::as_field)
            .collect();

        let lookup = |keys: &[String]| -> Option<String> {
            // Key lists are in priority order.
            keys.iter().find_map(|key| {
                fields
                    .iter()
                    .find(|field| key_matches(&field.key, std::slice::from_ref(key)))
                    .map(|field| field.value.clone())
            })
        };

        let build_date = lookup(&options.build_date_keys)
            .map(|raw| BuildDate::parse(&raw, &options.date_format));
        let source_commit = lookup(&options.source_commit_keys);
        let upstream_version = lookup(&options.upstream_version_keys);
        let note_version = lookup(&options.version_keys);

        Self {
            version,
            heading,
            sections,
            build_date,
            source_commit,
            upstream_version,
            note_version,
            line,
        }
    }

    /// Release version from the heading.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Release heading as written.
    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Build date from the Note section.
    pub fn build_date(&self) -> Option<&BuildDate> {
        self.build_date.as_ref()
    }

    /// Pinned upstream commit from the Note section.
    pub fn source_commit(&self) -> Option<&str> {
        self.source_commit.as_deref()
    }

    /// Pinned upstream version from the Note section.
    pub fn upstream_version(&self) -> Option<&str> {
        self.upstream_version.as_deref()
    }

    /// `Version` field of the Note section, which should repeat the heading.
    pub fn note_version(&self) -> Option<&str> {
        self.note_version.as_deref()
    }

    /// 1-based line of the heading in the parsed source; 0 when built.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The Note section, if present.
    pub fn note(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == SectionKind::Note)
    }

    /// Every `Key: Value` bullet of the Note section.
    pub fn note_fields(&self) -> Vec<NoteField> {
        self.note()
            .map(|s| s.items().filter_map(Item::as_field).collect())
            .unwrap_or_default()
    }

    /// Top-level feature bullets.
    pub fn features(&self) -> Vec<&str> {
        self.texts_of(SectionKind::Features)
    }

    /// Top-level deprecation bullets; empty when the release has none.
    pub fn deprecations(&self) -> Vec<&str> {
        self.texts_of(SectionKind::Deprecations)
    }

    fn texts_of(&self, kind: SectionKind) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.kind == kind)
            .flat_map(|s| s.items())
            .map(|item| item.text.as_str())
            .collect()
    }

    /// Flat serializable view.
    pub fn to_record(&self) -> ReleaseRecord {
        ReleaseRecord {
            version: self.version.to_string(),
            build_date: self.build_date.as_ref().map(|d| d.as_str().to_string()),
            source_commit: self.source_commit.clone(),
            features: self.features().into_iter().map(String::from).collect(),
            deprecations: self.deprecations().into_iter().map(String::from).collect(),
        }
    }
}

// ============================================================================
// ReleaseRecord
// ============================================================================

/// The attributes of a release note, flattened for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Semantic version.
    pub version: String,
    /// Build date stamp as written.
    pub build_date: Option<String>,
    /// Pinned upstream commit.
    pub source_commit: Option<String>,
    /// Feature bullets.
    pub features: Vec<String>,
    /// Deprecation bullets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecations: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
