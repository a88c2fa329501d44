//! Relnotes Core: shared errors, traits, and text utilities.
//!
//! This crate provides the foundational types used across all relnotes crates.
//! It has no internal relnotes dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: The [`ConfigManager`] trait
//! - [`util`]: Key normalization and text helpers

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigManager;

// Convenience re-exports from util
pub use util::keys::{key_matches, normalize_key};
pub use util::text::normalize_whitespace;
