//! Export functionality for scan results.
//!
//! This module renders folder scan results with their remediation
//! commands in several formats: plain text, JSON, and Markdown.

pub mod json;
pub mod markdown;
pub mod text;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::diagnostic::{Finding, Severity};
use crate::remedy::RemediationPlan;
use crate::scan::FolderScan;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - per-file blocks for the terminal
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the findings of a scan, keyed by file, and the remediation plan
/// derived from them.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Scanned root
    pub root: PathBuf,
    /// Findings per file, in path order
    pub files: BTreeMap<PathBuf, Vec<Finding>>,
    /// Commands that would fix the findings
    pub plan: RemediationPlan,
}

impl ExportData {
    pub fn new(root: &Path, files: BTreeMap<PathBuf, Vec<Finding>>) -> Self {
        let plan = RemediationPlan::new(root, files.values().flatten());
        Self {
            root: root.to_path_buf(),
            files,
            plan,
        }
    }

    /// Create export data from a folder scan.
    pub fn from_scan(scan: FolderScan) -> Self {
        Self::new(&scan.root, scan.files)
    }

    /// Files with at least one finding
    pub fn files_with_findings(&self) -> impl Iterator<Item = (&PathBuf, &Vec<Finding>)> {
        self.files.iter().filter(|(_, findings)| !findings.is_empty())
    }

    /// Total number of findings
    pub fn finding_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Number of findings with the given severity
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// `path` relative to the root when it lies under it.
    pub fn display_path<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::diagnostic::{Availability, FindingKind, SourceSpan};

    pub fn finding(line: usize, kind: FindingKind, severity: Severity, target: &str, message: &str) -> Finding {
        Finding {
            span: SourceSpan::new(line, 7, 7 + target.len() + 2),
            message: message.to_string(),
            kind,
            severity,
            target: target.to_string(),
        }
    }

    pub fn sample() -> ExportData {
        let mut files = BTreeMap::new();
        files.insert(
            PathBuf::from("/app/src/index.js"),
            vec![
                finding(
                    0,
                    FindingKind::MissingPackageEverywhere,
                    Severity::Error,
                    "axios",
                    "Package \"axios\" is not installed in this project's dependencies, devDependencies and globally.",
                ),
                finding(
                    2,
                    FindingKind::MissingFile,
                    Severity::Error,
                    "/app/src/util.js",
                    "Cannot find module '/app/src/util.js'",
                ),
            ],
        );
        files.insert(PathBuf::from("/app/src/clean.js"), vec![]);
        files.insert(
            PathBuf::from("/app/src/test.js"),
            vec![finding(
                1,
                FindingKind::PackageAvailableElsewhere(Availability::DevDependency),
                Severity::Warning,
                "jest",
                "Package \"jest\" is not found in this project's dependencies, but is installed as a dev dependency.",
            )],
        );
        ExportData::new(Path::new("/app"), files)
    }
}
