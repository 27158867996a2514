//! Unused-dependency findings for package.json documents.

use std::path::Path;

use crate::analysis::locator::LineIndex;
use crate::analysis::scan_dependencies_used;
use crate::diagnostic::{unused_package_finding, Finding, SeverityTable, SourceSpan};
use crate::parser::parse_str;

const DEPENDENCIES_KEY: &str = "\"dependencies\"";

/// Reports every `dependencies` entry that no source file under
/// `project_dir` imports.
///
/// Each finding spans the quoted package name as it appears after the
/// `"dependencies"` key. Text that does not parse as a manifest yields no
/// findings.
pub fn unused_package_findings(
    text: &str,
    project_dir: &Path,
    severities: &SeverityTable,
) -> Vec<Finding> {
    let manifest = match parse_str(text) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::debug!("Not checking unused packages: {}", e);
            return Vec::new();
        }
    };

    let declared = manifest.dependency_names();
    if declared.is_empty() {
        return Vec::new();
    }

    let usage = scan_dependencies_used(&declared, project_dir);
    let lines = LineIndex::new(text);
    let section = text.find(DEPENDENCIES_KEY).unwrap_or(0);

    let mut findings: Vec<Finding> = usage
        .unused(&declared)
        .into_iter()
        .map(|name| {
            let span = name_span(text, section, name, &lines);
            unused_package_finding(name, span, severities)
        })
        .collect();
    findings.sort_by_key(|f| f.span);
    findings
}

/// Span of `"name"` searched from `from`, falling back to the section key.
fn name_span(text: &str, from: usize, name: &str, lines: &LineIndex) -> SourceSpan {
    let quoted = format!("\"{}\"", name);
    let (start, len) = match text[from..].find(&quoted) {
        Some(offset) => (from + offset, quoted.len()),
        None => (from, DEPENDENCIES_KEY.len()),
    };
    let line = lines.line_of(start);
    let column = start - lines.line_start(line);
    SourceSpan::new(line, column, column + len)
}
