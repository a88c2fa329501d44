//! Parser, renderer, and validator options.
//!
//! Each options struct deserializes with defaults for every field, so the CLI
//! embeds them directly as `[parse]`, `[render]`, and `[validate]` tables of
//! its TOML configuration.

use regex::Regex;
use relnotes_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default release heading: `Version: 0.2.0`, `Version 0.2.0`, `Version: v0.2.0`.
pub const DEFAULT_RELEASE_PATTERN: &str = r"(?i)^version(?::\s*|\s+)v?(?P<version>\S+)$";

/// Default `chrono` format for build dates (`20221114`).
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";

/// Title of the features section in the Praxis layout.
pub const FEATURES_TITLE: &str = "Major Features and Improvements";

/// Title of the deprecations section.
pub const DEPRECATIONS_TITLE: &str = "Deprecations";

/// Title of the build metadata section.
pub const NOTE_TITLE: &str = "Note";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// ParseOptions
// ============================================================================

/// How a Markdown document maps onto release notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Heading level that starts a release (1 = `#`).
    pub release_heading_level: u8,
    /// Heading level that starts a section inside a release.
    pub section_heading_level: u8,
    /// Regex matched against release heading text; must capture `version`.
    pub release_heading_pattern: String,
    /// `chrono` format of the build date field.
    pub date_format: String,
    /// Note keys holding the release version.
    pub version_keys: Vec<String>,
    /// Note keys holding the build date.
    pub build_date_keys: Vec<String>,
    /// Note keys holding the pinned upstream commit, in priority order.
    pub source_commit_keys: Vec<String>,
    /// Note keys holding the pinned upstream version.
    pub upstream_version_keys: Vec<String>,
    /// Section titles listing features.
    pub feature_titles: Vec<String>,
    /// Section titles listing deprecations.
    pub deprecation_titles: Vec<String>,
    /// Section titles holding build metadata.
    pub note_titles: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            release_heading_level: 1,
            section_heading_level: 2,
            release_heading_pattern: DEFAULT_RELEASE_PATTERN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            version_keys: strings(&["Version"]),
            build_date_keys: strings(&["Build Date"]),
            source_commit_keys: strings(&["Praxis commit", "Commit"]),
            upstream_version_keys: strings(&["Praxis version"]),
            feature_titles: strings(&[FEATURES_TITLE, "Features", "New Features"]),
            deprecation_titles: strings(&[DEPRECATIONS_TITLE, "Deprecated"]),
            note_titles: strings(&[NOTE_TITLE, "Notes"]),
        }
    }
}

impl ParseOptions {
    /// Check heading levels and compile the release heading pattern.
    pub fn release_pattern(&self) -> Result<Regex> {
        if !(1..=6).contains(&self.release_heading_level) {
            return Err(Error::config(format!(
                "release_heading_level must be 1-6, got {}",
                self.release_heading_level
            )));
        }
        if self.section_heading_level <= self.release_heading_level
            || self.section_heading_level > 6
        {
            return Err(Error::config(format!(
                "section_heading_level must be deeper than release_heading_level ({}) and at most 6, got {}",
                self.release_heading_level, self.section_heading_level
            )));
        }

        let pattern = Regex::new(&self.release_heading_pattern).map_err(|e| {
            Error::config(format!(
                "Invalid release_heading_pattern '{}': {e}",
                self.release_heading_pattern
            ))
        })?;
        if !pattern.capture_names().any(|name| name == Some("version")) {
            return Err(Error::config(
                "release_heading_pattern must contain a named group `version`",
            ));
        }
        Ok(pattern)
    }
}

// ============================================================================
// RenderOptions
// ============================================================================

/// How newly built releases are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Release heading text; `{version}` is replaced with the version.
    pub release_heading_format: String,
    /// Note key written for the pinned upstream commit.
    pub commit_label: String,
    /// Note key written for the pinned upstream version.
    pub upstream_version_label: String,
    /// Bullet marker for new items.
    pub bullet: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            release_heading_format: "Version: {version}".to_string(),
            commit_label: "Praxis commit".to_string(),
            upstream_version_label: "Praxis version".to_string(),
            bullet: "*".to_string(),
        }
    }
}

impl RenderOptions {
    /// Heading text for a version.
    pub fn release_heading(&self, version: &semver::Version) -> String {
        self.release_heading_format
            .replace("{version}", &version.to_string())
    }
}

// ============================================================================
// ValidationOptions
// ============================================================================

/// Validator switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Treat warnings as errors.
    pub strict: bool,
    /// Report a missing upstream commit as an error rather than a warning.
    pub require_source_commit: bool,
}
