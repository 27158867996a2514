//! Plain text export implementation.
//!
//! One block per file with findings, followed by the commands that would
//! fix them:
//!
//! ```text
//! 	/app/src/index.js (2 issues)
//!     1:8  [ error ]  Package "axios" is not installed ...
//!     3:8  [ error ]  Cannot find module '/app/src/util.js'
//!
//! To fix the issues, run the following commands:
//! npm install axios --prefix /app
//! cd /app && touch "src/util.js"
//! ```

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        if data.finding_count() == 0 {
            return writeln!(writer, "No issues found in {}", data.root.display());
        }

        let mut first = true;
        for (path, findings) in data.files_with_findings() {
            if !first {
                writeln!(writer)?;
            }
            first = false;

            writeln!(writer, "\t{} ({} issues)", path.display(), findings.len())?;
            for finding in findings {
                writeln!(writer, "    {}", finding)?;
            }
        }

        let commands = data.plan.commands();
        if !commands.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "To fix the issues, run the following commands:")?;
            for command in commands {
                writeln!(writer, "{}", command)?;
            }
        }

        Ok(())
    }
}
