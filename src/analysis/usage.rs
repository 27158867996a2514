//! Unused dependency detection.
//!
//! Walks a whole project tree and counts, per declared dependency, how many
//! source files import it. Unlike per-document scanning no directory or
//! ignore pattern is skipped: a dependency only counts as unused if
//! nothing anywhere in the tree references it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use super::locator::{import_pattern, package_name};

/// File extensions treated as JavaScript/TypeScript sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs", "cjs", "vue"];

/// Returns true if `path` has a recognized source extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Number of files referencing each dependency.
///
/// Dependencies that were never referenced are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    counts: BTreeMap<String, usize>,
}

impl UsageReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one referencing file for `name`.
    pub fn record(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Number of files referencing `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// The entries of `declared` that were never referenced, in the order given.
    pub fn unused<'a>(&self, declared: &'a [String]) -> Vec<&'a str> {
        declared
            .iter()
            .filter(|name| !self.is_used(name))
            .map(String::as_str)
            .collect()
    }

    /// `(name, count)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Builds a matcher that only recognizes imports of `dependencies`
/// (including their subpaths).
fn dependency_regex(dependencies: &[String]) -> Result<Regex, regex::Error> {
    let names = dependencies
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&import_pattern(&format!(r#"(?:{names})(?:/[^"'`]*)?"#)))
}

/// Packages from `dependencies` imported by `source`.
fn dependencies_in<'d>(
    source: &str,
    matcher: &Regex,
    dependencies: &'d [String],
) -> BTreeSet<&'d str> {
    let mut found = BTreeSet::new();
    for caps in matcher.captures_iter(source) {
        let Some(specifier) = caps.iter().skip(1).flatten().next() else {
            continue;
        };
        let Some(name) = package_name(specifier.as_str()) else {
            continue;
        };
        if let Some(dep) = dependencies.iter().find(|d| d.as_str() == name) {
            found.insert(dep.as_str());
        }
    }
    found
}

/// Counts the source files under `root` that import each of `dependencies`.
///
/// A file importing the same package several times counts once.
pub fn scan_dependencies_used(dependencies: &[String], root: &Path) -> UsageReport {
    let mut report = UsageReport::new();
    if dependencies.is_empty() {
        return report;
    }

    let matcher = match dependency_regex(dependencies) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!("Cannot build dependency matcher: {}", e);
            return report;
        }
    };

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_source_file(path) {
            continue;
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };

        for name in dependencies_in(&source, &matcher, dependencies) {
            report.record(name);
        }
    }

    tracing::debug!(
        "Scanned {} for {} dependencies, {} used",
        root.display(),
        dependencies.len(),
        report.counts.len()
    );
    report
}
