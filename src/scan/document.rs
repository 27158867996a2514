//! Single-document scanning.
//!
//! [`Scanner::scan_document`] runs the locator, classifier and finding
//! builder over one document's text under one configuration snapshot. It
//! keeps no state between calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::manifest::unused_package_findings;
use crate::analysis::{Classifier, GlobalRoot, ImportLocator, RegexLocator, SourceLanguage};
use crate::config::Config;
use crate::diagnostic::{build_finding, Finding, SeverityTable};
use crate::parser::is_manifest_path;

/// Language id given to package.json documents.
pub const JSON_LANGUAGE_ID: &str = "json";

/// A document as supplied by the editor or read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub language_id: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            language_id: language_id.into(),
        }
    }

    /// Reads a document from disk, inferring its language from the
    /// file extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path, text, language_id_for(path)))
    }

    pub fn language(&self) -> Option<SourceLanguage> {
        SourceLanguage::from_language_id(&self.language_id)
    }
}

/// Editor language id for a file path.
pub fn language_id_for(path: &Path) -> &'static str {
    match SourceLanguage::from_path(path) {
        Some(language) => language.language_id(),
        None if path.extension().is_some_and(|e| e == "json") => JSON_LANGUAGE_ID,
        None => "plaintext",
    }
}

/// Result of scanning one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The check does not apply to this document under the current
    /// configuration; previously published findings should be cleared.
    Disabled,
    /// The document matches an ignore rule; previous findings are kept.
    Ignored,
    /// The document was scanned.
    Scanned(Vec<Finding>),
}

impl ScanOutcome {
    pub fn findings(&self) -> &[Finding] {
        match self {
            ScanOutcome::Scanned(findings) => findings,
            ScanOutcome::Disabled | ScanOutcome::Ignored => &[],
        }
    }

    pub fn into_findings(self) -> Vec<Finding> {
        match self {
            ScanOutcome::Scanned(findings) => findings,
            ScanOutcome::Disabled | ScanOutcome::Ignored => Vec::new(),
        }
    }
}

/// Scans documents for missing modules and packages.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    global_root: GlobalRoot,
}

impl Scanner {
    pub fn new(global_root: GlobalRoot) -> Self {
        Self { global_root }
    }

    pub fn global_root(&self) -> &GlobalRoot {
        &self.global_root
    }

    /// Scans one document under `config`.
    ///
    /// package.json documents get unused-dependency findings; source
    /// documents get missing file and package findings.
    pub fn scan_document(&self, doc: &Document, config: &Config) -> ScanOutcome {
        if is_manifest_path(&doc.path) {
            if !config.enable_unused_package_check {
                return ScanOutcome::Disabled;
            }
            let dir = doc.path.parent().unwrap_or(Path::new(""));
            return ScanOutcome::Scanned(unused_package_findings(
                &doc.text,
                dir,
                &config.severities(),
            ));
        }

        match doc.language() {
            Some(language) if config.is_language_enabled(language) => {}
            _ => return ScanOutcome::Disabled,
        }

        if config.ignore_rules().is_ignored(&doc.path) {
            tracing::debug!("Ignoring {}", doc.path.display());
            return ScanOutcome::Ignored;
        }

        let locator = RegexLocator::new(config.locator_options());
        ScanOutcome::Scanned(self.collect_findings(&locator, doc, &config.severities()))
    }

    /// Runs `locator` over the document and builds a finding for every
    /// reference that does not resolve, in source order.
    pub fn collect_findings(
        &self,
        locator: &dyn ImportLocator,
        doc: &Document,
        severities: &SeverityTable,
    ) -> Vec<Finding> {
        let classifier = Classifier::new(&self.global_root);
        locator
            .locate(&doc.text, &doc.path)
            .filter_map(|reference| {
                let classification = classifier.classify(&reference)?;
                build_finding(&classification, reference.span, severities)
            })
            .collect()
    }
}
