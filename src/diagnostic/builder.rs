//! Turns classifications into findings.

use std::path::Path;

use super::types::{Availability, Finding, FindingKind, Severity, SourceSpan};
use crate::analysis::Classification;

/// Severity per finding kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityTable {
    pub missing_file: Severity,
    pub missing_file_index: Severity,
    pub missing_package: Severity,
    pub available_globally: Severity,
    pub available_as_dev_dependency: Severity,
    pub unused_package: Severity,
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self {
            missing_file: Severity::Error,
            missing_file_index: Severity::Error,
            missing_package: Severity::Error,
            available_globally: Severity::Warning,
            available_as_dev_dependency: Severity::Warning,
            unused_package: Severity::Warning,
        }
    }
}

impl SeverityTable {
    pub fn severity_of(&self, kind: FindingKind) -> Severity {
        match kind {
            FindingKind::MissingFile => self.missing_file,
            FindingKind::MissingFileIndex => self.missing_file_index,
            FindingKind::MissingPackageEverywhere => self.missing_package,
            FindingKind::PackageAvailableElsewhere(Availability::Global) => self.available_globally,
            FindingKind::PackageAvailableElsewhere(Availability::DevDependency) => {
                self.available_as_dev_dependency
            }
            FindingKind::UnusedPackage => self.unused_package,
        }
    }
}

/// Builds the finding for a classified reference.
///
/// Returns `None` when the classification is not a problem (the file
/// exists, or the package is declared).
pub fn build_finding(
    classification: &Classification,
    span: SourceSpan,
    severities: &SeverityTable,
) -> Option<Finding> {
    let (kind, message, target) = match classification {
        Classification::File {
            resolved_path,
            is_directory_missing_index: true,
            ..
        } => {
            let directory = resolved_path.parent().unwrap_or(Path::new(""));
            let index = resolved_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            (
                FindingKind::MissingFileIndex,
                format!(
                    "Cannot find module '{}' from '{}'",
                    index,
                    directory.display()
                ),
                resolved_path.display().to_string(),
            )
        }
        Classification::File {
            resolved_path,
            exists: false,
            ..
        } => (
            FindingKind::MissingFile,
            format!("Cannot find module '{}'", resolved_path.display()),
            resolved_path.display().to_string(),
        ),
        Classification::File { .. } => return None,
        Classification::Package {
            in_project_deps: true,
            ..
        } => return None,
        Classification::Package {
            name,
            in_dev_deps,
            installed_globally,
            ..
        } => {
            let availability = if *installed_globally {
                Some(Availability::Global)
            } else if *in_dev_deps {
                Some(Availability::DevDependency)
            } else {
                None
            };
            match availability {
                Some(availability) => {
                    let place = match availability {
                        Availability::Global => "globally",
                        Availability::DevDependency => "as a dev dependency",
                    };
                    (
                        FindingKind::PackageAvailableElsewhere(availability),
                        format!(
                            "Package \"{}\" is not found in this project's dependencies, but is installed {}.",
                            name, place
                        ),
                        name.clone(),
                    )
                }
                None => (
                    FindingKind::MissingPackageEverywhere,
                    format!(
                        "Package \"{}\" is not installed in this project's dependencies, devDependencies and globally.",
                        name
                    ),
                    name.clone(),
                ),
            }
        }
    };

    Some(Finding {
        span,
        message,
        kind,
        severity: severities.severity_of(kind),
        target,
    })
}

/// Builds the finding for a declared dependency nothing imports.
pub fn unused_package_finding(name: &str, span: SourceSpan, severities: &SeverityTable) -> Finding {
    let kind = FindingKind::UnusedPackage;
    Finding {
        span,
        message: format!("The package \"{}\" is not used in the project", name),
        kind,
        severity: severities.severity_of(kind),
        target: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn span() -> SourceSpan {
        SourceSpan::new(3, 10, 18)
    }

    fn package(in_project: bool, in_dev: bool, global: bool) -> Classification {
        Classification::Package {
            name: "lodash".to_string(),
            in_project_deps: in_project,
            in_dev_deps: in_dev,
            installed_globally: global,
        }
    }

    #[test]
    fn test_default_severities() {
        let table = SeverityTable::default();
        assert_eq!(table.severity_of(FindingKind::MissingFile), Severity::Error);
        assert_eq!(table.severity_of(FindingKind::MissingFileIndex), Severity::Error);
        assert_eq!(
            table.severity_of(FindingKind::MissingPackageEverywhere),
            Severity::Error
        );
        assert_eq!(
            table.severity_of(FindingKind::PackageAvailableElsewhere(Availability::Global)),
            Severity::Warning
        );
        assert_eq!(table.severity_of(FindingKind::UnusedPackage), Severity::Warning);
    }

    #[test]
    fn test_existing_file_has_no_finding() {
        let classification = Classification::File {
            resolved_path: PathBuf::from("/app/src/a.js"),
            exists: true,
            is_directory_missing_index: false,
        };
        assert!(build_finding(&classification, span(), &SeverityTable::default()).is_none());
    }

    #[test]
    fn test_missing_file() {
        let classification = Classification::File {
            resolved_path: PathBuf::from("/app/src/a.js"),
            exists: false,
            is_directory_missing_index: false,
        };
        let finding = build_finding(&classification, span(), &SeverityTable::default()).unwrap();

        assert_eq!(finding.kind, FindingKind::MissingFile);
        assert_eq!(finding.message, "Cannot find module '/app/src/a.js'");
        assert_eq!(finding.target, "/app/src/a.js");
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.span, span());
    }

    #[test]
    fn test_missing_index() {
        let classification = Classification::File {
            resolved_path: PathBuf::from("/app/src/components/index.ts"),
            exists: true,
            is_directory_missing_index: true,
        };
        let finding = build_finding(&classification, span(), &SeverityTable::default()).unwrap();

        assert_eq!(finding.kind, FindingKind::MissingFileIndex);
        assert_eq!(
            finding.message,
            "Cannot find module 'index.ts' from '/app/src/components'"
        );
        assert_eq!(finding.target, "/app/src/components/index.ts");
        assert_eq!(finding.code(), "create-file");
    }

    #[test]
    fn test_declared_package_has_no_finding() {
        assert!(build_finding(&package(true, false, false), span(), &SeverityTable::default()).is_none());
    }

    #[test]
    fn test_package_available_elsewhere() {
        let table = SeverityTable::default();

        let dev = build_finding(&package(false, true, false), span(), &table).unwrap();
        assert_eq!(
            dev.kind,
            FindingKind::PackageAvailableElsewhere(Availability::DevDependency)
        );
        assert!(dev.message.ends_with("but is installed as a dev dependency."));

        // Global wins when both hold
        let both = build_finding(&package(false, true, true), span(), &table).unwrap();
        assert_eq!(both.kind, FindingKind::PackageAvailableElsewhere(Availability::Global));
        assert!(both.message.ends_with("but is installed globally."));
    }

    #[test]
    fn test_missing_package_everywhere() {
        let finding = build_finding(&package(false, false, false), span(), &SeverityTable::default()).unwrap();
        assert_eq!(finding.kind, FindingKind::MissingPackageEverywhere);
        assert_eq!(
            finding.message,
            "Package \"lodash\" is not installed in this project's dependencies, devDependencies and globally."
        );
        assert_eq!(finding.target, "lodash");
        assert_eq!(finding.code(), "install-package-global");
    }

    #[test]
    fn test_severity_overrides_apply() {
        let table = SeverityTable {
            available_as_dev_dependency: Severity::Info,
            ..SeverityTable::default()
        };
        let finding = build_finding(&package(false, true, false), span(), &table).unwrap();
        assert_eq!(finding.severity, Severity::Info);
    }

    #[test]
    fn test_unused_package_finding() {
        let finding = unused_package_finding("moment", span(), &SeverityTable::default());
        assert_eq!(finding.message, "The package \"moment\" is not used in the project");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.code(), "uninstall-package");
    }
}
