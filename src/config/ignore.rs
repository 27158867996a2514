//! Ignore rules for files and folders.
//!
//! Each configured pattern is interpreted by its shape:
//!
//! - starting with `/`: a regular expression searched in the full path
//!   (the leading slash is part of the expression)
//! - anything else: a literal name compared with the path's file name
//!   (`setupTests.js`, or a bare name such as `generated`)
//!
//! A pattern that does not compile is logged and never matches.

use std::path::Path;

use regex::Regex;

#[derive(Debug, Clone)]
enum Rule {
    Regex(Regex),
    Name(String),
    Invalid,
}

/// A configured pattern that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPattern {
    /// Position in the configured list.
    pub index: usize,
    pub pattern: String,
    pub error: String,
}

/// Compiled `ignoreFilesOrFolders` patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// Compiles `patterns`, logging any that are invalid.
    pub fn new(patterns: &[String]) -> Self {
        let rules = patterns
            .iter()
            .map(|pattern| {
                if pattern.starts_with('/') {
                    match Regex::new(pattern) {
                        Ok(regex) => Rule::Regex(regex),
                        Err(e) => {
                            tracing::warn!(
                                "Invalid regex pattern: \"{}\", check your settings: {}",
                                pattern,
                                e
                            );
                            Rule::Invalid
                        }
                    }
                } else {
                    Rule::Name(pattern.clone())
                }
            })
            .collect();
        Self { rules }
    }

    /// Returns true if any rule matches `path`.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Regex(regex) => regex.is_match(&path.to_string_lossy()),
            Rule::Name(name) => path.file_name().is_some_and(|f| f == name.as_str()),
            Rule::Invalid => false,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lists the regex patterns in `patterns` that fail to compile.
pub fn validate_patterns(patterns: &[String]) -> Vec<InvalidPattern> {
    patterns
        .iter()
        .enumerate()
        .filter(|(_, pattern)| pattern.starts_with('/'))
        .filter_map(|(index, pattern)| {
            Regex::new(pattern).err().map(|e| InvalidPattern {
                index,
                pattern: pattern.clone(),
                error: e.to_string(),
            })
        })
        .collect()
}
