//! Checker configuration.
//!
//! A [`Config`] is a snapshot of every recognized option. Scans take a
//! snapshot explicitly; long-lived callers hold a [`ConfigSource`] and ask
//! it for a fresh snapshot each time so edits to the configuration file
//! apply to the next scan.

pub mod ignore;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::analysis::{LocatorOptions, SourceLanguage};
use crate::diagnostic::{Severity, SeverityTable};

pub use ignore::{validate_patterns, IgnoreRules, InvalidPattern};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".modcheck.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// All recognized options, with their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Specifiers never reported.
    pub custom_ignore_packages: Vec<String>,
    /// Report imports that look embedded in string literals.
    pub check_inside_strings: bool,
    /// File names, folder names or `/`-prefixed regexes of files to skip.
    pub ignore_files_or_folders: Vec<String>,

    pub enable_diagnostics_javascript: bool,
    pub enable_diagnostics_typescript: bool,
    pub enable_diagnostics_javascriptreact: bool,
    pub enable_diagnostics_typescriptreact: bool,
    pub enable_diagnostics_vue: bool,

    pub missing_file_severity: Option<Severity>,
    pub missing_file_index_severity: Option<Severity>,
    pub missing_package_dependency_severity: Option<Severity>,
    pub package_installed_global_severity: Option<Severity>,
    pub package_installed_dev_dependency_severity: Option<Severity>,
    pub unused_package_severity: Option<Severity>,

    /// Report unused dependencies on package.json documents.
    pub enable_unused_package_check: bool,

    /// Debounce delay for single-document scans, in milliseconds.
    pub delay_for_check_document_call: u64,
    /// Debounce delay for rescanning every open document, in milliseconds.
    pub delay_time_for_check_document_all_tabs_call: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            custom_ignore_packages: Vec::new(),
            check_inside_strings: false,
            ignore_files_or_folders: Vec::new(),
            enable_diagnostics_javascript: true,
            enable_diagnostics_typescript: true,
            enable_diagnostics_javascriptreact: true,
            enable_diagnostics_typescriptreact: true,
            enable_diagnostics_vue: true,
            missing_file_severity: None,
            missing_file_index_severity: None,
            missing_package_dependency_severity: None,
            package_installed_global_severity: None,
            package_installed_dev_dependency_severity: None,
            unused_package_severity: None,
            enable_unused_package_check: true,
            delay_for_check_document_call: 500,
            delay_time_for_check_document_all_tabs_call: 1000,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns true if diagnostics are enabled for `language`.
    pub fn is_language_enabled(&self, language: SourceLanguage) -> bool {
        match language {
            SourceLanguage::JavaScript => self.enable_diagnostics_javascript,
            SourceLanguage::TypeScript => self.enable_diagnostics_typescript,
            SourceLanguage::JavaScriptReact => self.enable_diagnostics_javascriptreact,
            SourceLanguage::TypeScriptReact => self.enable_diagnostics_typescriptreact,
            SourceLanguage::Vue => self.enable_diagnostics_vue,
        }
    }

    /// Built-in severities with configured overrides applied.
    pub fn severities(&self) -> SeverityTable {
        let defaults = SeverityTable::default();
        SeverityTable {
            missing_file: self.missing_file_severity.unwrap_or(defaults.missing_file),
            missing_file_index: self
                .missing_file_index_severity
                .unwrap_or(defaults.missing_file_index),
            missing_package: self
                .missing_package_dependency_severity
                .unwrap_or(defaults.missing_package),
            available_globally: self
                .package_installed_global_severity
                .unwrap_or(defaults.available_globally),
            available_as_dev_dependency: self
                .package_installed_dev_dependency_severity
                .unwrap_or(defaults.available_as_dev_dependency),
            unused_package: self
                .unused_package_severity
                .unwrap_or(defaults.unused_package),
        }
    }

    pub fn locator_options(&self) -> LocatorOptions {
        LocatorOptions {
            check_inside_strings: self.check_inside_strings,
            ignored_specifiers: self.custom_ignore_packages.iter().cloned().collect(),
        }
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::new(&self.ignore_files_or_folders)
    }

    pub fn document_delay(&self) -> Duration {
        Duration::from_millis(self.delay_for_check_document_call)
    }

    pub fn all_documents_delay(&self) -> Duration {
        Duration::from_millis(self.delay_time_for_check_document_all_tabs_call)
    }
}

/// Supplies configuration snapshots.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> Config;
}

impl ConfigSource for Config {
    fn snapshot(&self) -> Config {
        self.clone()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Box<T> {
    fn snapshot(&self) -> Config {
        (**self).snapshot()
    }
}

/// A configuration file re-read on every snapshot.
///
/// A missing file yields defaults; an unreadable or malformed one logs a
/// warning and yields defaults for that snapshot.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for ConfigFile {
    fn snapshot(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        Config::load(&self.path).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Config::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.check_inside_strings);
        assert!(config.enable_unused_package_check);
        assert!(config.is_language_enabled(SourceLanguage::Vue));
        assert_eq!(config.document_delay(), Duration::from_millis(500));
        assert_eq!(config.severities(), SeverityTable::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{
                "customIgnorePackages": ["electron"],
                "enableDiagnosticsTypescript": false,
                "packageInstalledGlobalSeverity": "Information",
                "delayForCheckDocumentCall": 50
            }"#,
        )
        .unwrap();

        assert_eq!(config.custom_ignore_packages, vec!["electron"]);
        assert!(!config.is_language_enabled(SourceLanguage::TypeScript));
        assert!(config.is_language_enabled(SourceLanguage::JavaScript));
        assert_eq!(config.severities().available_globally, Severity::Info);
        assert_eq!(config.severities().missing_file, Severity::Error);
        assert_eq!(config.document_delay(), Duration::from_millis(50));
        assert_eq!(config.all_documents_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_locator_options() {
        let config = Config {
            check_inside_strings: true,
            custom_ignore_packages: vec!["a".to_string()],
            ..Config::default()
        };
        let options = config.locator_options();
        assert!(options.check_inside_strings);
        assert!(options.ignored_specifiers.contains("a"));
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Read { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ nope").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_file_reread_each_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let source = ConfigFile::new(&path);

        assert_eq!(source.snapshot(), Config::default());

        fs::write(&path, r#"{"checkInsideStrings": true}"#).unwrap();
        assert!(source.snapshot().check_inside_strings);

        fs::write(&path, "not json").unwrap();
        assert_eq!(source.snapshot(), Config::default());
    }
}
