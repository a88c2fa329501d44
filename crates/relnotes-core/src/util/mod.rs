//! Utility modules for text normalization and source positions.
//!
//! # Modules
//!
//! - [`keys`]: Key normalization for matching note fields and section titles
//! - [`text`]: Whitespace normalization and byte-offset to line mapping

pub mod keys;
pub mod text;
