//! External command execution for remediation.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Errors from running remediation steps.
#[derive(Debug, thiserror::Error)]
pub enum RemedyError {
    #[error("Failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to create {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type RemedyResult<T> = Result<T, RemedyError>;

/// Runs a shell command line, optionally in a working directory.
pub trait CommandRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> RemedyResult<()>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

fn capture(command: &str, cwd: Option<&Path>) -> RemedyResult<Output> {
    let mut cmd = shell(command);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let output = cmd.output().map_err(|source| RemedyError::Spawn {
        command: command.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(RemedyError::Failed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> RemedyResult<()> {
        tracing::info!("Running `{}`", command);
        capture(command, cwd).map(|_| ())
    }
}

/// Asks npm for the global install root (`npm root -g`).
///
/// Returns `None` and logs a warning when npm is unavailable or fails.
pub fn detect_global_root() -> Option<PathBuf> {
    match capture("npm root -g", None) {
        Ok(output) => {
            let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if root.is_empty() {
                tracing::warn!("`npm root -g` printed nothing; global packages will not be detected");
                None
            } else {
                tracing::debug!("Global install root: {}", root);
                Some(PathBuf::from(root))
            }
        }
        Err(e) => {
            tracing::warn!("{}; global packages will not be detected", e);
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_shell_runner_success_in_cwd() {
        let dir = TempDir::new().unwrap();
        ShellRunner.run("touch made.txt", Some(dir.path())).unwrap();
        assert!(dir.path().join("made.txt").exists());
    }

    #[test]
    fn test_shell_runner_failure() {
        let err = ShellRunner.run("echo oops >&2; exit 3", None).unwrap_err();
        match err {
            RemedyError::Failed { command, stderr, .. } => {
                assert_eq!(command, "echo oops >&2; exit 3");
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
