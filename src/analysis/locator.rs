//! Import locator for JavaScript/TypeScript source text.
//!
//! Finds `require('...')`, `import ... from '...'` and `import('...')`
//! expressions with a regular expression and filters out matches that sit
//! in comments or inside string literals.
//!
//! This is not a tokenizer. Two approximations are accepted:
//!
//! - Comment detection only looks at how the line holding the match
//!   starts (`//`, `/*` or `*`). A match inside a multi-line block comment
//!   whose line does not start with a comment marker is still reported.
//! - String detection counts unescaped quote characters of each kind
//!   before and after the match across the whole document. An odd count
//!   on either side marks the match as embedded in a string, so an
//!   unrelated unbalanced quote elsewhere in the file can hide real
//!   imports.
//!
//! Callers depend on the [`ImportLocator`] trait so a lexer-based
//! implementation can replace [`RegexLocator`] without touching the
//! classifier.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::{CaptureMatches, Regex};

use super::builtins::is_builtin;
use crate::diagnostic::SourceSpan;

/// Quote characters a specifier may be wrapped in.
const QUOTES: [u8; 3] = [b'"', b'\'', b'`'];

/// Line prefixes that mark a line as a comment.
const COMMENT_PREFIXES: [&str; 3] = ["//", "/*", "*"];

/// The kind of import expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// CommonJS require: `const x = require('module')`
    CommonJS,
    /// ES6 import statement: `import ... from 'module'` or `import 'module'`
    ES6,
    /// Dynamic import: `import('module')`
    DynamicImport,
}

/// One occurrence of an import/require target in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference<'a> {
    /// The text between the quotes.
    pub specifier: &'a str,
    /// The quoted specifier, quotes included, on the line where it starts.
    pub span: SourceSpan,
    /// The syntactic form that referenced the module.
    pub kind: ImportKind,
    /// The file the reference was found in.
    pub containing_file: &'a Path,
}

impl ModuleReference<'_> {
    /// Returns true if this reference points at a file rather than a package.
    pub fn is_file_reference(&self) -> bool {
        is_file_specifier(self.specifier)
    }
}

/// Returns true if `specifier` is a relative or absolute path.
pub fn is_file_specifier(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/')
}

/// Returns the npm package a package specifier refers to.
///
/// Handles scoped packages and subpath imports:
/// `lodash/fp` -> `lodash`, `@scope/pkg/sub` -> `@scope/pkg`.
/// Returns `None` for file specifiers.
pub fn package_name(specifier: &str) -> Option<&str> {
    if is_file_specifier(specifier) {
        return None;
    }

    let mut slashes = specifier.match_indices('/').map(|(idx, _)| idx);
    let end = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };

    Some(&specifier[..end.unwrap_or(specifier.len())])
}

/// Builds the import-matching pattern for specifiers matching `body`.
///
/// Every alternative wraps the specifier in one capture group per quote
/// kind so the opening and closing quotes always agree. Groups 1-3 belong
/// to `require(...)`, 4-6 to `import ... from`, 7-9 to `import(...)`.
pub(crate) fn import_pattern(body: &str) -> String {
    let quoted = format!(r#"(?:"({body})"|'({body})'|`({body})`)"#);
    format!(
        r#"require\s*\(\s*{quoted}\s*\)|import(?:\s+[\w$*{{}},\s]*from)?\s*{quoted}|import\s*\(\s*{quoted}\s*\)"#
    )
}

/// Maps a capture group index of [`import_pattern`] to its import kind.
pub(crate) fn kind_for_group(group: usize) -> ImportKind {
    match (group - 1) / QUOTES.len() {
        0 => ImportKind::CommonJS,
        1 => ImportKind::ES6,
        _ => ImportKind::DynamicImport,
    }
}

fn import_regex() -> &'static Regex {
    static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
    IMPORT_RE.get_or_init(|| {
        Regex::new(&import_pattern(r#"[^"'`]+"#)).expect("import pattern is a valid regex")
    })
}

/// Byte offsets of line starts, for mapping offsets to `(line, column)`.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    /// Zero-indexed line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Byte offset at which `line` starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.starts[line]
    }

    /// Text of `line` without its terminator.
    pub fn line_text<'t>(&self, text: &'t str, line: usize) -> &'t str {
        let start = self.starts[line];
        let end = self
            .starts
            .get(line + 1)
            .map_or(text.len(), |next| next - 1);
        text[start..end].trim_end_matches('\r')
    }
}

/// Positions of unescaped quote characters, one sorted list per kind.
#[derive(Debug, Clone, Default)]
struct QuoteIndex {
    positions: [Vec<usize>; 3],
}

impl QuoteIndex {
    fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut index = Self::default();
        for (pos, byte) in bytes.iter().enumerate() {
            let Some(kind) = QUOTES.iter().position(|q| q == byte) else {
                continue;
            };
            if pos > 0 && bytes[pos - 1] == b'\\' {
                continue;
            }
            index.positions[kind].push(pos);
        }
        index
    }

    /// Returns true if any quote kind has an odd count strictly before
    /// `start` or at/after `end`.
    fn is_inside_string(&self, start: usize, end: usize) -> bool {
        self.positions.iter().any(|positions| {
            let before = positions.partition_point(|&p| p < start);
            let after = positions.len() - positions.partition_point(|&p| p < end);
            before % 2 != 0 || after % 2 != 0
        })
    }
}

/// Options for the regex locator.
#[derive(Debug, Clone, Default)]
pub struct LocatorOptions {
    /// Report matches even when they look embedded in a string literal.
    pub check_inside_strings: bool,
    /// Specifiers never reported, in addition to runtime built-ins.
    pub ignored_specifiers: HashSet<String>,
}

/// Produces module references for a document.
pub trait ImportLocator {
    /// Returns the references in `text`, in source order.
    ///
    /// The sequence is lazy; calling `locate` again restarts it.
    fn locate<'a>(
        &'a self,
        text: &'a str,
        file: &'a Path,
    ) -> Box<dyn Iterator<Item = ModuleReference<'a>> + 'a>;
}

/// Regex-driven [`ImportLocator`].
#[derive(Debug, Clone, Default)]
pub struct RegexLocator {
    options: LocatorOptions,
}

impl RegexLocator {
    pub fn new(options: LocatorOptions) -> Self {
        Self { options }
    }

    /// Concrete iterator over the references in `text`.
    pub fn references<'a>(&'a self, text: &'a str, file: &'a Path) -> References<'a> {
        let quotes = (!self.options.check_inside_strings).then(|| QuoteIndex::new(text));
        References {
            matches: import_regex().captures_iter(text),
            text,
            file,
            lines: LineIndex::new(text),
            quotes,
            options: &self.options,
        }
    }
}

impl ImportLocator for RegexLocator {
    fn locate<'a>(
        &'a self,
        text: &'a str,
        file: &'a Path,
    ) -> Box<dyn Iterator<Item = ModuleReference<'a>> + 'a> {
        Box::new(self.references(text, file))
    }
}

/// Iterator returned by [`RegexLocator::references`].
pub struct References<'a> {
    matches: CaptureMatches<'static, 'a>,
    text: &'a str,
    file: &'a Path,
    lines: LineIndex,
    quotes: Option<QuoteIndex>,
    options: &'a LocatorOptions,
}

impl<'a> References<'a> {
    fn is_comment_line(&self, line: usize) -> bool {
        let trimmed = self.lines.line_text(self.text, line).trim();
        COMMENT_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
    }
}

impl<'a> Iterator for References<'a> {
    type Item = ModuleReference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.matches.next()?;
            let Some(whole) = caps.get(0) else {
                continue;
            };

            if self.is_comment_line(self.lines.line_of(whole.start())) {
                continue;
            }

            if let Some(quotes) = &self.quotes {
                if quotes.is_inside_string(whole.start(), whole.end()) {
                    continue;
                }
            }

            let Some((group, specifier)) = caps
                .iter()
                .enumerate()
                .skip(1)
                .find_map(|(idx, m)| m.map(|m| (idx, m)))
            else {
                continue;
            };
            if specifier.as_str().is_empty() {
                continue;
            }
            if is_builtin(specifier.as_str())
                || self.options.ignored_specifiers.contains(specifier.as_str())
            {
                continue;
            }

            let line = self.lines.line_of(specifier.start());
            let line_start = self.lines.line_start(line);
            let span = SourceSpan::new(
                line,
                specifier.start() - 1 - line_start,
                specifier.end() + 1 - line_start,
            );

            return Some(ModuleReference {
                specifier: specifier.as_str(),
                span,
                kind: kind_for_group(group),
                containing_file: self.file,
            });
        }
    }
}
