//! Source languages the checker knows about.

use std::fmt;
use std::path::Path;

/// Language of a document, as far as per-language enablement goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    JavaScriptReact,
    TypeScriptReact,
    Vue,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::JavaScriptReact),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::TypeScriptReact),
            "vue" => Some(SourceLanguage::Vue),
            _ => None,
        }
    }

    /// Determine language from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Determine language from an editor language identifier.
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "javascript" => Some(SourceLanguage::JavaScript),
            "typescript" => Some(SourceLanguage::TypeScript),
            "javascriptreact" => Some(SourceLanguage::JavaScriptReact),
            "typescriptreact" => Some(SourceLanguage::TypeScriptReact),
            "vue" => Some(SourceLanguage::Vue),
            _ => None,
        }
    }

    /// Editor language identifier.
    pub fn language_id(&self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "javascript",
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::JavaScriptReact => "javascriptreact",
            SourceLanguage::TypeScriptReact => "typescriptreact",
            SourceLanguage::Vue => "vue",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceLanguage::from_extension("cjs"), Some(SourceLanguage::JavaScript));
        assert_eq!(SourceLanguage::from_extension("TSX"), Some(SourceLanguage::TypeScriptReact));
        assert_eq!(SourceLanguage::from_extension("json"), None);
    }

    #[test]
    fn test_language_id_round_trip() {
        for lang in [
            SourceLanguage::JavaScript,
            SourceLanguage::TypeScript,
            SourceLanguage::JavaScriptReact,
            SourceLanguage::TypeScriptReact,
            SourceLanguage::Vue,
        ] {
            assert_eq!(SourceLanguage::from_language_id(lang.language_id()), Some(lang));
        }
        assert_eq!(SourceLanguage::from_language_id("json"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            SourceLanguage::from_path(Path::new("/app/src/App.jsx")),
            Some(SourceLanguage::JavaScriptReact)
        );
        assert_eq!(SourceLanguage::from_path(Path::new("/app/package.json")), None);
    }
}
