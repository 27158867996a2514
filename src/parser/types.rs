//! Shared types for manifest parsing.
//!
//! This module defines the data structures used to represent a project's
//! `package.json` and the dependency lists the checker consults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File name of the npm manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Represents the parts of a package.json file the checker cares about.
///
/// Unknown fields (`scripts`, `author`, ...) are ignored during
/// deserialization.
///
/// # Example
///
/// ```
/// use modcheck::parser::types::Manifest;
///
/// let json = r#"{"name": "my-app", "dependencies": {"lodash": "^4.0.0"}}"#;
/// let manifest: Manifest = serde_json::from_str(json).unwrap();
/// assert!(manifest.has_dependency("lodash"));
/// assert!(!manifest.has_dev_dependency("lodash"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Production dependencies required at runtime.
    pub dependencies: Option<BTreeMap<String, String>>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl Manifest {
    /// Returns true if `name` is a key of `dependencies`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|d| d.contains_key(name))
    }

    /// Returns true if `name` is a key of `devDependencies`.
    pub fn has_dev_dependency(&self, name: &str) -> bool {
        self.dev_dependencies
            .as_ref()
            .is_some_and(|d| d.contains_key(name))
    }

    /// Names declared under `dependencies`, in sorted order.
    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies
            .as_ref()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_default() {
        let manifest = Manifest::default();
        assert!(!manifest.has_dependency("react"));
        assert!(!manifest.has_dev_dependency("react"));
        assert!(manifest.dependency_names().is_empty());
    }

    #[test]
    fn test_manifest_lookups() {
        let mut manifest = Manifest::default();

        let mut deps = BTreeMap::new();
        deps.insert("react".to_string(), "^18.0.0".to_string());
        deps.insert("axios".to_string(), "^1.0.0".to_string());
        manifest.dependencies = Some(deps);

        let mut dev = BTreeMap::new();
        dev.insert("jest".to_string(), "^29.0.0".to_string());
        manifest.dev_dependencies = Some(dev);

        assert!(manifest.has_dependency("react"));
        assert!(!manifest.has_dependency("jest"));
        assert!(manifest.has_dev_dependency("jest"));
        assert_eq!(manifest.dependency_names(), vec!["axios", "react"]);
    }
}
