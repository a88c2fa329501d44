//! Ordering and completeness checks for a changelog.
//!
//! Validation never fails; it collects [`Issue`]s into a
//! [`ValidationReport`]. A report is ok when it holds no errors.

use std::fmt;

use semver::Version;
use serde::Serialize;

use crate::changelog::Changelog;
use crate::model::ReleaseNote;
use crate::options::ValidationOptions;

/// Which check produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Versions must strictly decrease down the list.
    VersionOrder,
    /// The same version appears twice in a row.
    DuplicateVersion,
    /// Build dates must not increase down the list.
    DateOrder,
    /// Entry has no Note section.
    MissingNote,
    /// Entry has no build date.
    MissingBuildDate,
    /// Build date does not match the date format.
    MalformedBuildDate,
    /// Entry has no upstream commit.
    MissingSourceCommit,
    /// Upstream commit is not an abbreviated or full hex hash.
    MalformedSourceCommit,
    /// Note `Version` field disagrees with the heading.
    NoteVersionMismatch,
    /// The changelog has no releases.
    EmptyChangelog,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::VersionOrder => "version-order",
            Rule::DuplicateVersion => "duplicate-version",
            Rule::DateOrder => "date-order",
            Rule::MissingNote => "missing-note",
            Rule::MissingBuildDate => "missing-build-date",
            Rule::MalformedBuildDate => "malformed-build-date",
            Rule::MissingSourceCommit => "missing-source-commit",
            Rule::MalformedSourceCommit => "malformed-source-commit",
            Rule::NoteVersionMismatch => "note-version-mismatch",
            Rule::EmptyChangelog => "empty-changelog",
        };
        f.write_str(name)
    }
}

/// Severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, but the changelog is still acceptable.
    Warning,
    /// The changelog breaks an invariant.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Release the issue is about; `None` for changelog-wide issues.
    pub version: Option<Version>,
    /// Source line of the release heading, 0 when unknown.
    pub line: usize,
    /// Check that produced the issue.
    pub rule: Rule,
    /// Severity after applying strict mode.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.rule)?;
        if let Some(version) = &self.version {
            write!(f, " {version}")?;
        }
        if self.line > 0 {
            write!(f, " (line {})", self.line)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Outcome of validating a changelog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Per-entry findings in document order, then ordering findings.
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// True when no issue is an error.
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Error-level issues.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Warning-level issues.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Issues raised by one rule.
    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.rule == rule)
    }
}

// ============================================================================
// Checks
// ============================================================================

struct Collector<'o> {
    options: &'o ValidationOptions,
    issues: Vec<Issue>,
}

impl Collector<'_> {
    fn push(
        &mut self,
        release: Option<&ReleaseNote>,
        rule: Rule,
        severity: Severity,
        message: String,
    ) {
        let severity = if self.options.strict {
            Severity::Error
        } else {
            severity
        };
        self.issues.push(Issue {
            version: release.map(|r| r.version().clone()),
            line: release.map(ReleaseNote::line).unwrap_or(0),
            rule,
            severity,
            message,
        });
    }
}

/// Validate a changelog.
pub fn validate(changelog: &Changelog, options: &ValidationOptions) -> ValidationReport {
    let mut out = Collector {
        options,
        issues: Vec::new(),
    };

    if changelog.is_empty() {
        out.push(
            None,
            Rule::EmptyChangelog,
            Severity::Warning,
            "changelog has no releases".to_string(),
        );
    }

    for release in changelog.releases() {
        check_entry(&mut out, release);
    }
    for pair in changelog.releases().windows(2) {
        check_order(&mut out, &pair[0], &pair[1]);
    }

    let report = ValidationReport { issues: out.issues };
    log::debug!(
        "Validated {} release(s): {} error(s), {} warning(s)",
        changelog.len(),
        report.errors().count(),
        report.warnings().count()
    );
    report
}

fn check_entry(out: &mut Collector<'_>, release: &ReleaseNote) {
    let version = release.version();

    if release.note().is_none() {
        out.push(
            Some(release),
            Rule::MissingNote,
            Severity::Error,
            format!("{version} has no Note section"),
        );
    }

    match release.build_date() {
        None => out.push(
            Some(release),
            Rule::MissingBuildDate,
            Severity::Error,
            format!("{version} has no build date"),
        ),
        Some(date) if !date.is_valid() => out.push(
            Some(release),
            Rule::MalformedBuildDate,
            Severity::Error,
            format!("{version} has malformed build date '{date}'"),
        ),
        Some(_) => {}
    }

    match release.source_commit() {
        None => {
            let severity = if out.options.require_source_commit {
                Severity::Error
            } else {
                Severity::Warning
            };
            out.push(
                Some(release),
                Rule::MissingSourceCommit,
                severity,
                format!("{version} does not pin an upstream commit"),
            );
        }
        Some(commit) if !is_commit_hash(commit) => out.push(
            Some(release),
            Rule::MalformedSourceCommit,
            Severity::Warning,
            format!("{version} has commit '{commit}', expected 7 to 40 hex digits"),
        ),
        Some(_) => {}
    }

    if let Some(stated) = release.note_version() {
        let trimmed = stated.trim();
        let parsed = Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).ok();
        if parsed.as_ref() != Some(version) {
            out.push(
                Some(release),
                Rule::NoteVersionMismatch,
                Severity::Error,
                format!("Note says version '{stated}' but the heading says {version}"),
            );
        }
    }
}

fn check_order(out: &mut Collector<'_>, newer: &ReleaseNote, older: &ReleaseNote) {
    if older.version() == newer.version() {
        out.push(
            Some(older),
            Rule::DuplicateVersion,
            Severity::Error,
            format!("{} is listed more than once", older.version()),
        );
    } else if older.version() > newer.version() {
        out.push(
            Some(older),
            Rule::VersionOrder,
            Severity::Error,
            format!(
                "{} is listed below {} but is newer",
                older.version(),
                newer.version()
            ),
        );
    }

    let dates = (
        newer.build_date().and_then(|d| d.date()),
        older.build_date().and_then(|d| d.date()),
    );
    if let (Some(newer_date), Some(older_date)) = dates {
        if older_date > newer_date {
            out.push(
                Some(older),
                Rule::DateOrder,
                Severity::Error,
                format!(
                    "{} was built {} after {} ({})",
                    older.version(),
                    older_date,
                    newer.version(),
                    newer_date
                ),
            );
        }
    }
}

fn is_commit_hash(commit: &str) -> bool {
    (7..=40).contains(&commit.len()) && commit.chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Tests
// ============================================================================
