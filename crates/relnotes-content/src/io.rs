//! Async changelog file access.

use std::path::Path;

use relnotes_core::{Error, Result};

use crate::changelog::Changelog;
use crate::markdown::parser::parse_with;
use crate::options::ParseOptions;

/// Read and parse a changelog file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, or any error from
/// [`parse_with`].
pub async fn load_changelog(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Changelog> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    log::debug!("Read {} bytes from {:?}", content.len(), path);
    parse_with(&content, options)
}

/// Render a changelog and write it to `path`, creating parent directories.
pub async fn write_changelog(path: impl AsRef<Path>, changelog: &Changelog) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(e, parent))?;
    }
    tokio::fs::write(path, changelog.render())
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    log::info!("Wrote {} release(s) to {:?}", changelog.len(), path);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
