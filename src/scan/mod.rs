//! Scan orchestration.
//!
//! - [`document`]: one document, one configuration snapshot, one result
//! - [`manifest`]: unused-dependency findings for package.json
//! - [`session`]: debounced per-document scans with published results
//! - [`folder`]: every source file under a root

pub mod debounce;
pub mod document;
pub mod folder;
pub mod manifest;
pub mod session;

pub use debounce::Debouncer;
pub use document::{language_id_for, Document, ScanOutcome, Scanner, JSON_LANGUAGE_ID};
pub use folder::{scan_folder, FindingFilter, FolderScan};
pub use manifest::unused_package_findings;
pub use session::{Publisher, Session};
