//! Parser for npm package.json files.
//!
//! This module reads manifests from disk or from editor buffers and finds
//! the manifest that governs a given source file.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Manifest, MANIFEST_FILE_NAME};

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ManifestError>;

/// Parses a package.json file from a file path.
///
/// The file is read on every call; callers that need to observe
/// concurrent edits must not cache the result.
pub fn parse_file(path: &Path) -> ParseResult<Manifest> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use modcheck::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "devDependencies": {"jest": "^29.0.0"}}"#;
/// let manifest = parse_str(json).unwrap();
/// assert!(manifest.has_dev_dependency("jest"));
/// ```
pub fn parse_str(content: &str) -> ParseResult<Manifest> {
    let manifest: Manifest = serde_json::from_str(content)?;
    Ok(manifest)
}

/// Returns true if `path` names a manifest file.
pub fn is_manifest_path(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == MANIFEST_FILE_NAME)
}

/// Finds the nearest package.json governing `file`.
///
/// Walks parent directories starting at the directory containing `file`
/// and stops at the first directory holding a manifest. Returns `None`
/// when the filesystem root is reached without finding one. Relative
/// paths are resolved against the working directory first.
pub fn find_nearest_manifest(file: &Path) -> Option<PathBuf> {
    let base = if file.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().ok()?
    };
    nearest_from(&base, file)
}

fn nearest_from(base: &Path, file: &Path) -> Option<PathBuf> {
    let file = base.join(file);
    file.parent()?
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
