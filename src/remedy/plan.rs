//! Remediation commands derived from findings.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostic::{Finding, FindingKind};

/// Distinct remediation targets collected from a set of findings.
///
/// Targets are deduplicated by exact string equality and kept in first-seen
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemediationPlan {
    pub root: PathBuf,
    /// Packages to install into the project.
    pub missing_packages: Vec<String>,
    /// Files to create.
    pub missing_files: Vec<PathBuf>,
    /// Declared dependencies nothing imports.
    pub unused_packages: Vec<String>,
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

impl RemediationPlan {
    pub fn new<'a>(root: &Path, findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut plan = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        for finding in findings {
            match finding.kind {
                FindingKind::MissingFile | FindingKind::MissingFileIndex => {
                    push_unique(&mut plan.missing_files, PathBuf::from(&finding.target))
                }
                FindingKind::MissingPackageEverywhere | FindingKind::PackageAvailableElsewhere(_) => {
                    push_unique(&mut plan.missing_packages, finding.target.clone())
                }
                FindingKind::UnusedPackage => {
                    push_unique(&mut plan.unused_packages, finding.target.clone())
                }
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.missing_packages.is_empty()
            && self.missing_files.is_empty()
            && self.unused_packages.is_empty()
    }

    /// `npm install a b --prefix <root>`, or `None` when nothing is missing.
    pub fn install_command(&self) -> Option<String> {
        if self.missing_packages.is_empty() {
            return None;
        }
        Some(format!(
            "npm install {} --prefix {}",
            self.missing_packages.join(" "),
            self.root.display()
        ))
    }

    /// `cd <root> && touch "a.js" "lib/b.js"`, or `None` when no file is
    /// missing. Paths are relative to the root when they lie under it.
    pub fn touch_command(&self) -> Option<String> {
        if self.missing_files.is_empty() {
            return None;
        }
        let files: Vec<String> = self
            .missing_files
            .iter()
            .map(|path| format!("\"{}\"", self.relative(path).display()))
            .collect();
        Some(format!(
            "cd {} && touch {}",
            self.root.display(),
            files.join(" ")
        ))
    }

    /// `npm uninstall a b --prefix <root>`, or `None` when nothing is unused.
    pub fn uninstall_command(&self) -> Option<String> {
        if self.unused_packages.is_empty() {
            return None;
        }
        Some(format!(
            "npm uninstall {} --prefix {}",
            self.unused_packages.join(" "),
            self.root.display()
        ))
    }

    /// Every applicable command, in install, touch, uninstall order.
    pub fn commands(&self) -> Vec<String> {
        [
            self.install_command(),
            self.touch_command(),
            self.uninstall_command(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Availability, Severity, SourceSpan};

    fn finding(kind: FindingKind, target: &str) -> Finding {
        Finding {
            span: SourceSpan::new(0, 0, 1),
            message: String::new(),
            kind,
            severity: Severity::Error,
            target: target.to_string(),
        }
    }

    #[test]
    fn test_empty_plan() {
        let none: Vec<Finding> = Vec::new();
        let plan = RemediationPlan::new(Path::new("/app"), &none);
        assert!(plan.is_empty());
        assert!(plan.install_command().is_none());
        assert!(plan.touch_command().is_none());
        assert!(plan.commands().is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let findings = vec![
            finding(FindingKind::MissingPackageEverywhere, "axios"),
            finding(FindingKind::PackageAvailableElsewhere(Availability::Global), "lodash"),
            finding(FindingKind::MissingPackageEverywhere, "axios"),
            finding(FindingKind::MissingFile, "/app/src/a.js"),
            finding(FindingKind::MissingFileIndex, "/app/src/lib/index.js"),
            finding(FindingKind::MissingFile, "/app/src/a.js"),
        ];
        let plan = RemediationPlan::new(Path::new("/app"), &findings);

        assert_eq!(plan.missing_packages, vec!["axios", "lodash"]);
        assert_eq!(plan.missing_files.len(), 2);
        assert_eq!(
            plan.install_command().unwrap(),
            "npm install axios lodash --prefix /app"
        );
        assert_eq!(
            plan.touch_command().unwrap(),
            "cd /app && touch \"src/a.js\" \"src/lib/index.js\""
        );
    }

    #[test]
    fn test_file_outside_root_kept_absolute() {
        let findings = vec![finding(FindingKind::MissingFile, "/elsewhere/x.js")];
        let plan = RemediationPlan::new(Path::new("/app"), &findings);
        assert_eq!(
            plan.touch_command().unwrap(),
            "cd /app && touch \"/elsewhere/x.js\""
        );
    }

    #[test]
    fn test_unused_packages() {
        let findings = vec![
            finding(FindingKind::UnusedPackage, "moment"),
            finding(FindingKind::UnusedPackage, "left-pad"),
        ];
        let plan = RemediationPlan::new(Path::new("/app"), &findings);
        assert_eq!(
            plan.commands(),
            vec!["npm uninstall moment left-pad --prefix /app".to_string()]
        );
    }
}
