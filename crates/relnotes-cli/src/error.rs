//! Error types for relnotes-cli

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for relnotes-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in relnotes-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from relnotes-core or relnotes-content
    #[error(transparent)]
    Core(#[from] relnotes_core::Error),

    /// Writing command output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `fmt --check` found a file that does not render back unchanged
    #[error("{} is not in canonical form; run `relnotes fmt` to rewrite it", .0.display())]
    NotFormatted(PathBuf),

    /// Rewriting the file would lose text the parser could not place
    #[error("refusing to rewrite {}: rendering would drop content from it", .0.display())]
    WouldDropContent(PathBuf),
}
