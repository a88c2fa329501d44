//! The changelog: an append-only, newest-first list of release notes.
//!
//! Existing entries are never handed out mutably. The only way to change a
//! [`Changelog`] is [`Changelog::prepend`], which accepts a release only if
//! it is strictly newer than the current latest entry.
//!
//! # Example
//!
//! ```rust
//! use relnotes_content::{parse, ReleaseNoteBuilder};
//! use relnotes_content::options::{ParseOptions, RenderOptions};
//!
//! let mut changelog = parse("# Version: 0.2.1\n## Note\n*   Build Date: 20221121\n").unwrap();
//!
//! let next = ReleaseNoteBuilder::new("0.3.0")
//!     .unwrap()
//!     .build_date("20230201")
//!     .feature("Add HeroLion optimizer")
//!     .build(&ParseOptions::default(), &RenderOptions::default())
//!     .unwrap();
//! changelog.prepend(next).unwrap();
//!
//! assert_eq!(changelog.latest().unwrap().version().to_string(), "0.3.0");
//! ```

use relnotes_core::{Error, Result};
use semver::Version;

use crate::markdown::helpers::escape_block_start;
use crate::model::{Block, Heading, Item, ReleaseNote, ReleaseRecord, Section, SectionKind};
use crate::options::{
    DEPRECATIONS_TITLE, FEATURES_TITLE, NOTE_TITLE, ParseOptions, RenderOptions,
    ValidationOptions,
};
use crate::render::{render_document, render_release};
use crate::validate::{ValidationReport, validate};

// ============================================================================
// Changelog
// ============================================================================

/// A parsed changelog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    preamble: Vec<Block>,
    releases: Vec<ReleaseNote>,
}

/// A bullet matched by [`Changelog::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// Release the bullet belongs to.
    pub version: &'a Version,
    /// Title of the section holding the bullet.
    pub section: &'a str,
    /// Bullet text.
    pub text: &'a str,
}

impl Changelog {
    /// Assemble a changelog from already-ordered parts.
    pub fn from_parts(preamble: Vec<Block>, releases: Vec<ReleaseNote>) -> Self {
        Self { preamble, releases }
    }

    /// Content before the first release.
    pub fn preamble(&self) -> &[Block] {
        &self.preamble
    }

    /// Releases in document order (newest first when valid).
    pub fn releases(&self) -> &[ReleaseNote] {
        &self.releases
    }

    /// Number of releases.
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Whether there are no releases.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// The top entry.
    pub fn latest(&self) -> Option<&ReleaseNote> {
        self.releases.first()
    }

    /// Look up a release by exact version.
    pub fn get(&self, version: &Version) -> Option<&ReleaseNote> {
        self.releases.iter().find(|r| r.version() == version)
    }

    /// Look up a release by version string.
    pub fn find(&self, version: &str) -> Result<&ReleaseNote> {
        let parsed = parse_version(version)?;
        self.get(&parsed).ok_or_else(|| Error::not_found(version))
    }

    /// Releases strictly newer than `version`, in document order.
    pub fn since(&self, version: &Version) -> Vec<&ReleaseNote> {
        self.releases
            .iter()
            .filter(|r| r.version() > version)
            .collect()
    }

    /// Releases with `from < version <= to`, in document order.
    pub fn between(&self, from: &Version, to: &Version) -> Vec<&ReleaseNote> {
        self.releases
            .iter()
            .filter(|r| r.version() > from && r.version() <= to)
            .collect()
    }

    /// Case-insensitive substring search over feature and deprecation
    /// bullets, nested bullets included.
    pub fn search(&self, term: &str) -> Vec<SearchHit<'_>> {
        let needle = term.to_lowercase();
        let mut hits = Vec::new();
        for release in &self.releases {
            for section in release.sections().iter().filter(|s| {
                matches!(s.kind, SectionKind::Features | SectionKind::Deprecations)
            }) {
                for item in section.items().flat_map(Item::walk) {
                    if item.text.to_lowercase().contains(&needle) {
                        hits.push(SearchHit {
                            version: release.version(),
                            section: section.title_str(),
                            text: &item.text,
                        });
                    }
                }
            }
        }
        hits
    }

    /// Flat records for serialization.
    pub fn records(&self) -> Vec<ReleaseRecord> {
        self.releases.iter().map(ReleaseNote::to_record).collect()
    }

    /// Check ordering and completeness.
    pub fn validate(&self, options: &ValidationOptions) -> ValidationReport {
        validate(self, options)
    }

    /// Render the whole document.
    pub fn render(&self) -> String {
        render_document(&self.preamble, &self.releases)
    }

    /// Add a new release at the top.
    ///
    /// # Errors
    ///
    /// [`Error::Ordering`] if the release is not strictly newer than the
    /// latest entry, or if its build date is earlier than the latest entry's.
    pub fn prepend(&mut self, release: ReleaseNote) -> Result<()> {
        if let Some(latest) = self.latest() {
            if release.version() <= latest.version() {
                return Err(Error::ordering(format!(
                    "{} is not newer than the latest release {}",
                    release.version(),
                    latest.version()
                )));
            }
            let dates = (
                release.build_date().and_then(|d| d.date()),
                latest.build_date().and_then(|d| d.date()),
            );
            if let (Some(new_date), Some(latest_date)) = dates {
                if new_date < latest_date {
                    return Err(Error::ordering(format!(
                        "build date {} of {} is earlier than {} of {}",
                        new_date,
                        release.version(),
                        latest_date,
                        latest.version()
                    )));
                }
            }
        }
        log::info!("Adding release {}", release.version());
        self.releases.insert(0, release);
        Ok(())
    }
}

impl ReleaseNote {
    /// Render this entry as Markdown.
    pub fn render(&self) -> String {
        render_release(self)
    }
}

/// Parse a version string, accepting a leading `v`.
pub fn parse_version(text: &str) -> Result<Version> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|e| Error::invalid_version(text, e))
}

// ============================================================================
// ReleaseNoteBuilder
// ============================================================================

/// Builds a new release entry in the Praxis layout: features, then
/// deprecations (only when there are any), then the Note section.
#[derive(Debug, Clone)]
pub struct ReleaseNoteBuilder {
    version: Version,
    build_date: Option<String>,
    source_commit: Option<String>,
    upstream_version: Option<String>,
    features: Vec<String>,
    deprecations: Vec<String>,
}

impl ReleaseNoteBuilder {
    /// Start a release for a version string (`0.3.0` or `v0.3.0`).
    pub fn new(version: &str) -> Result<Self> {
        Ok(Self::with_version(parse_version(version)?))
    }

    /// Start a release for a parsed version.
    pub fn with_version(version: Version) -> Self {
        Self {
            version,
            build_date: None,
            source_commit: None,
            upstream_version: None,
            features: Vec::new(),
            deprecations: Vec::new(),
        }
    }

    /// Set the build date stamp.
    pub fn build_date(mut self, date: impl Into<String>) -> Self {
        self.build_date = Some(date.into());
        self
    }

    /// Set the pinned upstream commit.
    pub fn source_commit(mut self, commit: impl Into<String>) -> Self {
        self.source_commit = Some(commit.into());
        self
    }

    /// Set the pinned upstream version.
    pub fn upstream_version(mut self, version: impl Into<String>) -> Self {
        self.upstream_version = Some(version.into());
        self
    }

    /// Add a feature bullet.
    pub fn feature(mut self, text: impl Into<String>) -> Self {
        self.features.push(text.into());
        self
    }

    /// Add a deprecation bullet.
    pub fn deprecation(mut self, text: impl Into<String>) -> Self {
        self.deprecations.push(text.into());
        self
    }

    /// Build the release.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the build date does not match
    ///   `parse.date_format` or a bullet is empty
    /// - [`Error::Config`] if the configured heading format would not be
    ///   recognised as a release heading when parsed back
    pub fn build(self, parse: &ParseOptions, render: &RenderOptions) -> Result<ReleaseNote> {
        let heading_title = render.release_heading(&self.version);
        let pattern = parse.release_pattern()?;
        let recognised = pattern
            .captures(&heading_title)
            .and_then(|caps| caps.name("version").map(|m| m.as_str().to_string()));
        if recognised.as_deref() != Some(self.version.to_string().as_str()) {
            return Err(Error::config(format!(
                "release heading '{heading_title}' is not recognised by release_heading_pattern"
            )));
        }

        if let Some(date) = &self.build_date {
            if chrono::NaiveDate::parse_from_str(date.trim(), &parse.date_format).is_err() {
                return Err(Error::validation_field(
                    "build_date",
                    format!("'{date}' does not match format '{}'", parse.date_format),
                ));
            }
        }
        for (field, texts) in [("feature", &self.features), ("deprecation", &self.deprecations)] {
            if texts.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::validation_field(field, "bullet text must not be empty"));
            }
        }

        let bullet = |text: &str| {
            let text = relnotes_core::normalize_whitespace(text);
            Item::new(render.bullet.clone(), escape_block_start(&text))
        };
        let level = parse.section_heading_level;
        let mut sections = Vec::new();

        if !self.features.is_empty() {
            let title = parse
                .feature_titles
                .first()
                .cloned()
                .unwrap_or_else(|| FEATURES_TITLE.to_string());
            let mut section = Section::new(Some(title), level, SectionKind::Features);
            section
                .blocks
                .push(Block::List(self.features.iter().map(|t| bullet(t)).collect()));
            sections.push(section);
        }

        if !self.deprecations.is_empty() {
            let title = parse
                .deprecation_titles
                .first()
                .cloned()
                .unwrap_or_else(|| DEPRECATIONS_TITLE.to_string());
            let mut section = Section::new(Some(title), level, SectionKind::Deprecations);
            section
                .blocks
                .push(Block::List(self.deprecations.iter().map(|t| bullet(t)).collect()));
            sections.push(section);
        }

        let version_key = parse.version_keys.first().map(String::as_str).unwrap_or("Version");
        let date_key = parse
            .build_date_keys
            .first()
            .map(String::as_str)
            .unwrap_or("Build Date");
        let mut fields = vec![bullet(&format!("{version_key}: {}", self.version))];
        if let Some(date) = &self.build_date {
            fields.push(bullet(&format!("{date_key}: {}", date.trim())));
        }
        if let Some(upstream) = &self.upstream_version {
            fields.push(bullet(&format!(
                "{}: {}",
                render.upstream_version_label, upstream
            )));
        }
        if let Some(commit) = &self.source_commit {
            fields.push(bullet(&format!("{}: {}", render.commit_label, commit.trim())));
        }
        let note_title = parse
            .note_titles
            .first()
            .cloned()
            .unwrap_or_else(|| NOTE_TITLE.to_string());
        let mut note = Section::new(Some(note_title), level, SectionKind::Note);
        note.blocks.push(Block::List(fields));
        sections.push(note);

        let heading = Heading {
            level: parse.release_heading_level,
            title: heading_title,
        };
        Ok(ReleaseNote::from_parts(self.version, heading, sections, parse, 0))
    }
}

// ============================================================================
// Tests
// ============================================================================
