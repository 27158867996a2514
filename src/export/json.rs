//! JSON export implementation.
//!
//! Exports findings and the remediation plan in JSON format for
//! machine-readable output.

use super::{ExportData, Exporter};
use crate::diagnostic::{Finding, Severity};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Findings of one file for JSON output.
#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    findings: Vec<JsonFinding<'a>>,
}

/// Serializable finding with its quick-fix code.
#[derive(Serialize)]
struct JsonFinding<'a> {
    #[serde(flatten)]
    finding: &'a Finding,
    code: &'static str,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    files_scanned: usize,
    files_with_findings: usize,
    findings: usize,
    errors: usize,
    warnings: usize,
    info: usize,
}

/// Remediation commands for JSON output.
#[derive(Serialize)]
struct JsonRemediation<'a> {
    missing_packages: &'a [String],
    missing_files: Vec<String>,
    unused_packages: &'a [String],
    commands: Vec<String>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    root: String,
    summary: JsonSummary,
    files: Vec<JsonFile<'a>>,
    remediation: JsonRemediation<'a>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let files: Vec<JsonFile> = data
            .files_with_findings()
            .map(|(path, findings)| JsonFile {
                path: path.display().to_string(),
                findings: findings
                    .iter()
                    .map(|finding| JsonFinding {
                        finding,
                        code: finding.code(),
                    })
                    .collect(),
            })
            .collect();

        let export = JsonExport {
            root: data.root.display().to_string(),
            summary: JsonSummary {
                files_scanned: data.files.len(),
                files_with_findings: files.len(),
                findings: data.finding_count(),
                errors: data.count_severity(Severity::Error),
                warnings: data.count_severity(Severity::Warning),
                info: data.count_severity(Severity::Info),
            },
            files,
            remediation: JsonRemediation {
                missing_packages: &data.plan.missing_packages,
                missing_files: data
                    .plan
                    .missing_files
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
                unused_packages: &data.plan.unused_packages,
                commands: data.plan.commands(),
            },
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::sample;

    fn render() -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(&sample(), &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_summary() {
        let parsed = render();

        assert_eq!(parsed["root"], "/app");
        assert_eq!(parsed["summary"]["files_scanned"], 3);
        assert_eq!(parsed["summary"]["files_with_findings"], 2);
        assert_eq!(parsed["summary"]["findings"], 3);
        assert_eq!(parsed["summary"]["errors"], 2);
        assert_eq!(parsed["summary"]["warnings"], 1);
    }

    #[test]
    fn test_json_export_findings() {
        let parsed = render();
        let files = parsed["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["path"], "/app/src/index.js");

        let first = &files[0]["findings"][0];
        assert_eq!(first["kind"], "missingPackageEverywhere");
        assert_eq!(first["code"], "install-package-global");
        assert_eq!(first["target"], "axios");
        assert_eq!(first["span"]["line"], 0);
        assert_eq!(first["severity"], "Error");

        let dev = &files[1]["findings"][0];
        assert_eq!(dev["availability"], "devDependency");
        assert_eq!(dev["code"], "install-package-this-project");
    }

    #[test]
    fn test_json_export_remediation() {
        let parsed = render();
        let remediation = &parsed["remediation"];
        assert_eq!(remediation["missing_packages"][1], "jest");
        assert_eq!(remediation["missing_files"][0], "/app/src/util.js");
        assert_eq!(
            remediation["commands"][0],
            "npm install axios jest --prefix /app"
        );
    }
}
