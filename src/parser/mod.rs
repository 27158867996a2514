//! Parser module for modcheck.
//!
//! This module reads npm manifests (`package.json`) and locates the manifest
//! that governs a given source file.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use modcheck::parser::{find_nearest_manifest, parse_file};
//!
//! let manifest_path = find_nearest_manifest(Path::new("src/index.js")).unwrap();
//! let manifest = parse_file(&manifest_path).unwrap();
//!
//! println!("Declared: {:?}", manifest.dependency_names());
//! ```

pub mod package_json;
pub mod types;

// Re-export commonly used types for convenience
pub use package_json::{
    find_nearest_manifest, is_manifest_path, parse_file, parse_str, ManifestError, ParseResult,
};

pub use types::{Manifest, MANIFEST_FILE_NAME};
