//! Shared fixtures for relnotes-content integration tests.

use std::path::PathBuf;

use relnotes_content::{Changelog, parse};

/// The Praxis-style changelog used across the suite.
pub const PRAXIS_CHANGELOG: &str = include_str!("../fixtures/RELEASE.md");

/// Path to the fixture on disk.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/RELEASE.md")
}

/// The fixture, parsed with default options.
pub fn praxis() -> Changelog {
    parse(PRAXIS_CHANGELOG).unwrap()
}

/// A one-release changelog entry in Praxis layout.
pub fn entry(version: &str, date: &str) -> String {
    format!(
        "# Version: {version}\n## Note\n*   Version: {version}\n*   Build Date: {date}\n*   Praxis commit: 413da1a\n"
    )
}
