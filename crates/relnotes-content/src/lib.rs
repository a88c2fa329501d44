//! Release-note changelog model, Markdown parser, renderer, and validator.
//!
//! A changelog is an append-only, newest-first list of release entries, each
//! with a version heading, feature and deprecation bullets, and a Note
//! section pinning the build date and upstream commit.
//!
//! # Modules
//!
//! - [`model`]: [`ReleaseNote`] and its sections, items, and build date
//! - [`markdown`]: parsing from Markdown
//! - [`render`]: writing back to Markdown
//! - [`validate`]: ordering and completeness checks
//! - [`changelog`]: queries, [`Changelog::prepend`], and [`ReleaseNoteBuilder`]
//! - [`io`]: async file loading and writing
//! - [`options`]: parse, render, and validation settings
//!
//! # Example
//!
//! ```rust
//! use relnotes_content::{parse, options::ValidationOptions};
//!
//! let content = "\
//! # Version: 0.2.0
//! ## Major Features and Improvements
//! *   Preparatory work for Fiddle integration
//! ## Note
//! *   Version: 0.2.0
//! *   Build Date: 20221114
//! *   Praxis commit: 413da1ad8148f27faebca119f8c5deedca66228b
//! ";
//!
//! let changelog = parse(content).unwrap();
//! let release = changelog.latest().unwrap();
//! assert_eq!(release.features()[0], "Preparatory work for Fiddle integration");
//! assert!(changelog.validate(&ValidationOptions::default()).is_ok());
//! ```

pub mod changelog;
pub mod io;
pub mod markdown;
pub mod model;
pub mod options;
pub mod render;
pub mod validate;

pub use changelog::{Changelog, ReleaseNoteBuilder, SearchHit, parse_version};
pub use io::{load_changelog, write_changelog};
pub use markdown::{parse, parse_with};
pub use model::{
    Block, BuildDate, Heading, Item, NoteField, ReleaseNote, ReleaseRecord, Section, SectionKind,
};
pub use options::{ParseOptions, RenderOptions, ValidationOptions};
pub use render::{is_round_trip_stable, preserves_content};
pub use validate::{Issue, Rule, Severity, ValidationReport};

// Re-export the shared error type
pub use relnotes_core::{Error, Result};
