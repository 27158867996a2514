//! Finding data model.
//!
//! A [`Finding`] is one reported problem: where it is, how bad it is, and
//! what would fix it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open column range on a zero-indexed line.
///
/// Columns are byte offsets into the line's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceSpan {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            line,
            start_column,
            end_column,
        }
    }
}

/// How prominently a finding is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    #[serde(alias = "Information")]
    Info,
}

impl Severity {
    /// Fixed-width tag used in text reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => " error ",
            Severity::Warning => "warning",
            Severity::Info => " info  ",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// Where a package that is missing from `dependencies` was found instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    /// Present in the global install root.
    Global,
    /// Declared under `devDependencies`.
    DevDependency,
}

/// The category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "availability", rename_all = "camelCase")]
pub enum FindingKind {
    /// A relative or absolute import that points at no file.
    MissingFile,
    /// A directory import whose directory lacks an index file.
    MissingFileIndex,
    /// A package that is not declared, not a dev dependency and not global.
    MissingPackageEverywhere,
    /// A package missing from `dependencies` but available some other way.
    PackageAvailableElsewhere(Availability),
    /// A declared dependency that no source file imports.
    UnusedPackage,
}

impl FindingKind {
    /// Quick-fix identifier for this kind of finding.
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::MissingFile | FindingKind::MissingFileIndex => "create-file",
            FindingKind::MissingPackageEverywhere => "install-package-global",
            FindingKind::PackageAvailableElsewhere(_) => "install-package-this-project",
            FindingKind::UnusedPackage => "uninstall-package",
        }
    }

    /// Returns true for findings fixed by creating a file.
    pub fn is_file_issue(&self) -> bool {
        matches!(self, FindingKind::MissingFile | FindingKind::MissingFileIndex)
    }

    /// Returns true for findings fixed by installing a package.
    pub fn is_package_issue(&self) -> bool {
        matches!(
            self,
            FindingKind::MissingPackageEverywhere | FindingKind::PackageAvailableElsewhere(_)
        )
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Where the marker applies (the quoted specifier).
    pub span: SourceSpan,
    /// Human-readable description.
    pub message: String,
    /// What went wrong.
    #[serde(flatten)]
    pub kind: FindingKind,
    /// How prominently to display it.
    pub severity: Severity,
    /// Package name or file path the remediation acts on.
    pub target: String,
}

impl Finding {
    /// Quick-fix identifier, see [`FindingKind::code`].
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}  [{}]  {}",
            self.span.line + 1,
            self.span.start_column + 1,
            self.severity.tag(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(FindingKind::MissingFile.code(), "create-file");
        assert_eq!(FindingKind::MissingFileIndex.code(), "create-file");
        assert_eq!(
            FindingKind::MissingPackageEverywhere.code(),
            "install-package-global"
        );
        assert_eq!(
            FindingKind::PackageAvailableElsewhere(Availability::Global).code(),
            "install-package-this-project"
        );
        assert_eq!(FindingKind::UnusedPackage.code(), "uninstall-package");
    }

    #[test]
    fn test_kind_groups() {
        assert!(FindingKind::MissingFileIndex.is_file_issue());
        assert!(!FindingKind::MissingFileIndex.is_package_issue());
        assert!(FindingKind::PackageAvailableElsewhere(Availability::DevDependency).is_package_issue());
        assert!(!FindingKind::UnusedPackage.is_package_issue());
        assert!(!FindingKind::UnusedPackage.is_file_issue());
    }

    #[test]
    fn test_severity_from_config_names() {
        let sev: Severity = serde_json::from_str("\"Information\"").unwrap();
        assert_eq!(sev, Severity::Info);
        let sev: Severity = serde_json::from_str("\"Warning\"").unwrap();
        assert_eq!(sev, Severity::Warning);
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding {
            span: SourceSpan::new(2, 14, 21),
            message: "Cannot find module '/app/x.js'".to_string(),
            kind: FindingKind::MissingFile,
            severity: Severity::Error,
            target: "/app/x.js".to_string(),
        };
        assert_eq!(
            finding.to_string(),
            "3:15  [ error ]  Cannot find module '/app/x.js'"
        );
    }

    #[test]
    fn test_finding_serializes_kind_inline() {
        let finding = Finding {
            span: SourceSpan::new(0, 0, 7),
            message: "m".to_string(),
            kind: FindingKind::PackageAvailableElsewhere(Availability::DevDependency),
            severity: Severity::Warning,
            target: "jest".to_string(),
        };
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["kind"], "packageAvailableElsewhere");
        assert_eq!(value["availability"], "devDependency");
        assert_eq!(value["severity"], "Warning");
    }
}
