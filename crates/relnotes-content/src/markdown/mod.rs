//! Markdown parsing of release-note changelogs.
//!
//! - [`parser`]: walks `pulldown-cmark` events into a [`Changelog`](crate::Changelog)
//! - [`helpers`]: heading and list-marker extraction from source slices

pub mod helpers;
pub mod parser;

pub use helpers::{heading_title, split_marker};
pub use parser::{parse, parse_with};
