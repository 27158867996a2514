//! Whole-tree scanning.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use walkdir::{DirEntry, WalkDir};

use super::document::{Document, Scanner};
use crate::analysis::is_source_file;
use crate::config::Config;
use crate::diagnostic::Finding;

/// Installed-package directories, never descended into.
const DEPENDENCY_DIR: &str = "node_modules";

/// Which findings a folder report keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindingFilter {
    /// Missing and misplaced packages.
    Packages,
    /// Missing files and index files.
    Files,
    #[default]
    All,
}

impl FindingFilter {
    pub fn matches(&self, finding: &Finding) -> bool {
        match self {
            FindingFilter::Packages => finding.kind.is_package_issue(),
            FindingFilter::Files => finding.kind.is_file_issue(),
            FindingFilter::All => true,
        }
    }
}

impl FromStr for FindingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "packages" | "package" => Ok(FindingFilter::Packages),
            "files" | "file" => Ok(FindingFilter::Files),
            "all" => Ok(FindingFilter::All),
            _ => Err(format!(
                "Unknown filter: '{}'. Valid options: packages, files, all",
                s
            )),
        }
    }
}

impl fmt::Display for FindingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingFilter::Packages => write!(f, "packages"),
            FindingFilter::Files => write!(f, "files"),
            FindingFilter::All => write!(f, "all"),
        }
    }
}

/// Findings for every scanned source file under a root.
///
/// Files are keyed by path and iterate in path order. Files that were
/// scanned and came out clean are present with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderScan {
    pub root: PathBuf,
    pub files: BTreeMap<PathBuf, Vec<Finding>>,
}

impl FolderScan {
    /// Keeps only the findings `filter` matches.
    pub fn filtered(mut self, filter: FindingFilter) -> Self {
        for findings in self.files.values_mut() {
            findings.retain(|f| filter.matches(f));
        }
        self
    }

    /// Files with at least one finding, in path order.
    pub fn files_with_findings(&self) -> impl Iterator<Item = (&Path, &[Finding])> {
        self.files
            .iter()
            .filter(|(_, findings)| !findings.is_empty())
            .map(|(path, findings)| (path.as_path(), findings.as_slice()))
    }

    pub fn finding_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.finding_count() == 0
    }

    /// Every finding, in file then source order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.values().flatten()
    }
}

fn is_dependency_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == DEPENDENCY_DIR
}

/// Scans every source file under `root`.
///
/// A file path scans its containing directory. `node_modules` directories
/// are skipped. Files that cannot be read are logged and left out; the
/// scan continues.
pub fn scan_folder(scanner: &Scanner, root: &Path, config: &Config) -> FolderScan {
    let root = if root.is_file() {
        root.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        root
    };
    tracing::info!("Scanning {}", root.display());

    let mut files = BTreeMap::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_dependency_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_source_file(path) {
            continue;
        }

        let doc = match Document::from_path(path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        let findings = scanner.scan_document(&doc, config).into_findings();
        files.insert(path.to_path_buf(), findings);
    }

    tracing::info!(
        "Scanned {} files, {} findings",
        files.len(),
        files.values().map(Vec::len).sum::<usize>()
    );
    FolderScan {
        root: root.to_path_buf(),
        files,
    }
}
