//! Source code analysis module for modcheck.
//!
//! This module finds import/require expressions in JavaScript/TypeScript
//! source text and decides whether each referenced file or package is
//! available.
//!
//! # Features
//!
//! - Locate ES6 `import`, CommonJS `require()` and dynamic `import()`
//!   expressions, skipping comments and string-embedded matches
//! - Classify references as files (resolved against the importing file)
//!   or packages (checked against the nearest package.json and the global
//!   install root)
//! - Count which declared dependencies are used anywhere in a tree
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use modcheck::analysis::{Classifier, GlobalRoot, ImportLocator, RegexLocator};
//!
//! let locator = RegexLocator::default();
//! let global = GlobalRoot::unknown();
//! let classifier = Classifier::new(&global);
//!
//! let file = Path::new("src/index.js");
//! for reference in locator.locate("import x from './x';", file) {
//!     println!("{:?}", classifier.classify(&reference));
//! }
//! ```

pub mod builtins;
pub mod classify;
pub mod language;
pub mod locator;
pub mod usage;

// Re-export main types for convenience
pub use classify::{Classification, Classifier, GlobalRoot};
pub use language::SourceLanguage;
pub use locator::{
    package_name, ImportKind, ImportLocator, LocatorOptions, ModuleReference, RegexLocator,
};
pub use usage::{is_source_file, scan_dependencies_used, UsageReport, SOURCE_EXTENSIONS};
