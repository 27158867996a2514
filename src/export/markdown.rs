//! Markdown export implementation.
//!
//! Exports scan results in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use crate::diagnostic::Severity;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

/// Escapes characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Module Check Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Root:** `{}`", data.root.display())?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Files Scanned | {} |", data.files.len())?;
        writeln!(
            writer,
            "| Files With Issues | {} |",
            data.files_with_findings().count()
        )?;
        writeln!(writer, "| Errors | {} |", data.count_severity(Severity::Error))?;
        writeln!(
            writer,
            "| Warnings | {} |",
            data.count_severity(Severity::Warning)
        )?;
        writeln!(writer, "| Info | {} |", data.count_severity(Severity::Info))?;
        writeln!(writer)?;

        // Per-file findings
        if data.finding_count() > 0 {
            writeln!(writer, "## Issues")?;
            writeln!(writer)?;
        }

        for (path, findings) in data.files_with_findings() {
            writeln!(
                writer,
                "### `{}` ({})",
                data.display_path(path).display(),
                findings.len()
            )?;
            writeln!(writer)?;
            writeln!(writer, "| Line | Column | Severity | Message | Fix |")?;
            writeln!(writer, "|------|--------|----------|---------|-----|")?;
            for finding in findings {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} | `{}` |",
                    finding.span.line + 1,
                    finding.span.start_column + 1,
                    finding.severity,
                    cell(&finding.message),
                    finding.code()
                )?;
            }
            writeln!(writer)?;
        }

        // Remediation commands
        let commands = data.plan.commands();
        if !commands.is_empty() {
            writeln!(writer, "## Remediation")?;
            writeln!(writer)?;
            writeln!(writer, "```sh")?;
            for command in &commands {
                writeln!(writer, "{}", command)?;
            }
            writeln!(writer, "```")?;
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by modcheck*")?;

        Ok(())
    }
}
