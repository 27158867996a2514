//! Remediation: install, uninstall and create what the findings ask for.
//!
//! [`plan`] turns findings into command strings for reports. The functions
//! here execute those fixes through a [`CommandRunner`] or the filesystem
//! and report per-item outcomes. Nothing in the scanning core calls this
//! module.

pub mod plan;
pub mod runner;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use plan::RemediationPlan;
pub use runner::{detect_global_root, CommandRunner, RemedyError, RemedyResult, ShellRunner};

/// Where `npm install` puts packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallScope {
    /// `dependencies` of the project.
    #[default]
    Project,
    /// `devDependencies` of the project.
    Dev,
    /// The global install root.
    Global,
}

/// Builds the npm install command line for `packages`.
pub fn install_command(packages: &[String], scope: InstallScope) -> String {
    let flag = match scope {
        InstallScope::Project => "",
        InstallScope::Dev => " --save-dev",
        InstallScope::Global => " -g",
    };
    format!("npm install{} {}", flag, packages.join(" "))
}

/// Installs `packages`. Project and dev installs run in `project_dir`.
pub fn install_packages(
    runner: &dyn CommandRunner,
    packages: &[String],
    scope: InstallScope,
    project_dir: &Path,
) -> RemedyResult<()> {
    if packages.is_empty() {
        return Ok(());
    }
    let cwd = match scope {
        InstallScope::Global => None,
        InstallScope::Project | InstallScope::Dev => Some(project_dir),
    };
    runner.run(&install_command(packages, scope), cwd)?;
    tracing::info!("Installed {}", packages.join(", "));
    Ok(())
}

/// Uninstalls `packages` from the project in `project_dir`.
pub fn uninstall_packages(
    runner: &dyn CommandRunner,
    packages: &[String],
    project_dir: &Path,
) -> RemedyResult<()> {
    if packages.is_empty() {
        return Ok(());
    }
    let command = format!("npm uninstall {}", packages.join(" "));
    runner.run(&command, Some(project_dir))?;
    tracing::info!("Uninstalled {}", packages.join(", "));
    Ok(())
}

/// Per-item outcome of a batch fix.
#[derive(Debug, Default)]
pub struct FixSummary {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, RemedyError)>,
}

impl FixSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for FixSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files created, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}

/// Creates each missing file empty, along with its parent directories.
///
/// A failure is recorded and the remaining files are still attempted.
pub fn create_missing_files(paths: &[PathBuf]) -> FixSummary {
    let mut summary = FixSummary::default();
    for path in paths {
        match create_empty(path) {
            Ok(()) => summary.succeeded.push(path.clone()),
            Err(e) => {
                tracing::warn!("{}", e);
                summary.failed.push((path.clone(), e));
            }
        }
    }
    tracing::info!("{}", summary);
    summary
}

fn create_empty(path: &Path) -> RemedyResult<()> {
    let write_err = |source| RemedyError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, "").map_err(write_err)
}
