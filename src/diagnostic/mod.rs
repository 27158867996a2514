//! Findings produced by the checker.
//!
//! [`types`] holds the data model shared by every other module;
//! [`builder`] maps a classified reference to at most one [`Finding`].

pub mod builder;
pub mod types;

pub use builder::{build_finding, unused_package_finding, SeverityTable};
pub use types::{Availability, Finding, FindingKind, Severity, SourceSpan};
