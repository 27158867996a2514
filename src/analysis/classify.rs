//! Reference classification.
//!
//! Decides what a located specifier points at and whether that target is
//! available: a file on disk, or a package declared in the nearest
//! manifest, declared as a dev dependency, or installed globally.
//!
//! Nothing is cached between calls. The filesystem and the manifest are
//! consulted fresh for every reference so edits show up on the next scan.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use super::locator::{package_name, ModuleReference};
use crate::parser::{find_nearest_manifest, parse_file};

/// What a module reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A relative or absolute path.
    File {
        /// The path that was tested. For a directory missing its index
        /// file this is the expected index file.
        resolved_path: PathBuf,
        exists: bool,
        is_directory_missing_index: bool,
    },
    /// An npm package.
    Package {
        /// Package root name (`@scope/pkg`, `lodash`).
        name: String,
        in_project_deps: bool,
        in_dev_deps: bool,
        installed_globally: bool,
    },
}

impl Classification {
    /// Returns true if this classification should be reported.
    pub fn is_problem(&self) -> bool {
        match self {
            Classification::File {
                exists,
                is_directory_missing_index,
                ..
            } => !exists || *is_directory_missing_index,
            Classification::Package {
                in_project_deps, ..
            } => !in_project_deps,
        }
    }
}

/// Directory holding globally installed packages (`npm root -g`).
#[derive(Debug, Clone, Default)]
pub struct GlobalRoot {
    path: Option<PathBuf>,
}

impl GlobalRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A root that reports every package as not installed.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns true if `package` is installed under this root.
    pub fn contains(&self, package: &str) -> bool {
        self.path
            .as_ref()
            .is_some_and(|root| root.join(package).exists())
    }
}

/// Classifies module references against the filesystem and manifests.
#[derive(Debug, Clone)]
pub struct Classifier<'g> {
    global_root: &'g GlobalRoot,
}

impl<'g> Classifier<'g> {
    pub fn new(global_root: &'g GlobalRoot) -> Self {
        Self { global_root }
    }

    /// Classifies one reference.
    ///
    /// Returns `None` for a package reference with no governing manifest
    /// (or an unreadable one): without a manifest there is nothing to
    /// judge against.
    pub fn classify(&self, reference: &ModuleReference<'_>) -> Option<Classification> {
        if reference.is_file_reference() {
            Some(classify_file(reference.specifier, reference.containing_file))
        } else {
            self.classify_package(reference.specifier, reference.containing_file)
        }
    }

    fn classify_package(&self, specifier: &str, containing_file: &Path) -> Option<Classification> {
        let name = package_name(specifier)?;
        let manifest_path = find_nearest_manifest(containing_file)?;
        let manifest = match parse_file(&manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::debug!("Skipping '{}': {}: {}", name, manifest_path.display(), e);
                return None;
            }
        };

        let in_project_deps = manifest.has_dependency(name);
        let (in_dev_deps, installed_globally) = if in_project_deps {
            (false, false)
        } else {
            (
                manifest.has_dev_dependency(name),
                self.global_root.contains(name),
            )
        };

        Some(Classification::Package {
            name: name.to_string(),
            in_project_deps,
            in_dev_deps,
            installed_globally,
        })
    }
}

/// Extension of `file` with its leading dot, or an empty string.
pub fn dotted_extension(file: &Path) -> String {
    file.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn classify_file(specifier: &str, containing_file: &Path) -> Classification {
    let base = containing_file.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize(&base.join(specifier));
    let extension = dotted_extension(containing_file);

    if resolved.is_dir() {
        let index = resolved.join(format!("index{}", extension));
        let has_index = index.exists();
        return Classification::File {
            resolved_path: if has_index { resolved } else { index },
            exists: true,
            is_directory_missing_index: !has_index,
        };
    }

    let candidate = if resolved.extension().is_none() {
        let mut appended = OsString::from(resolved.as_os_str());
        appended.push(&extension);
        PathBuf::from(appended)
    } else {
        resolved
    };

    Classification::File {
        exists: candidate.exists(),
        resolved_path: candidate,
        is_directory_missing_index: false,
    }
}

/// Lexically resolves `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
