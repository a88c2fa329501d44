//! Error types for relnotes-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for relnotes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, checking, or extending a changelog.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O failure tied to a specific file.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed into release notes.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source document
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A version string is not valid semver.
    #[error("Invalid version '{input}': {source}")]
    InvalidVersion {
        /// The rejected text
        input: String,
        /// Underlying semver error
        #[source]
        source: semver::Error,
    },

    /// Adding a release would break the changelog ordering.
    #[error("Ordering violation: {message}")]
    Ordering {
        /// Which ordering rule was broken
        message: String,
    },

    /// A value supplied for a new release is malformed.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A requested release is not in the changelog.
    #[error("Release not found: {version}")]
    NotFound {
        /// The version that was looked up
        version: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Serialization failure (TOML, JSON).
    #[error("Serialization error: {message}")]
    Serialization {
        /// What failed to serialize
        message: String,
    },
}

impl Error {
    /// Creates a new parse error at a 1-based line.
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new ordering error.
    pub fn ordering<S: Into<String>>(message: S) -> Self {
        Error::Ordering {
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found<S: Into<String>>(version: S) -> Self {
        Error::NotFound {
            version: version.into(),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Error::Serialization {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an invalid-version error from the rejected input.
    pub fn invalid_version<S: Into<String>>(input: S, source: semver::Error) -> Self {
        Error::InvalidVersion {
            input: input.into(),
            source,
        }
    }

    /// Returns the source line for errors that carry one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
