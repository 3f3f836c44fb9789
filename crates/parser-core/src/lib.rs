//! Syntax layer for the strata analysis engine.
//!
//! Wraps the tree-sitter runtime and the per-language grammars behind a
//! small surface: language detection from file extensions, a
//! [`GenericParser`] that turns `(path, source)` pairs into a
//! [`ParsedFile`], and span/text helpers shared by every downstream
//! consumer. All semantic interpretation of the trees lives in the
//! `semantic` crate; this crate knows nothing about scopes or symbols.

pub mod parser;
pub mod span;

pub use parser::{GenericParser, ParsedFile};
pub use span::{node_text, named_children, SourceSpan};

use thiserror::Error;

/// Languages the engine understands. Closed set: every extension point
/// downstream matches exhaustively on this enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SupportedLanguage {
    Python,
    JavaScript,
    TypeScript,
    Rust,
}

impl SupportedLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::TypeScript => "typescript",
            SupportedLanguage::Rust => "rust",
        }
    }

    /// File extensions (without the dot) that map to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SupportedLanguage::Python => &["py", "pyi"],
            SupportedLanguage::JavaScript => &["js", "mjs", "cjs", "jsx"],
            SupportedLanguage::TypeScript => &["ts", "tsx", "mts", "cts"],
            SupportedLanguage::Rust => &["rs"],
        }
    }

    /// Index files that terminate a directory import for this language.
    pub fn index_file_names(&self) -> &'static [&'static str] {
        match self {
            SupportedLanguage::Python => &["__init__.py"],
            SupportedLanguage::JavaScript => &["index.js", "index.mjs", "index.cjs"],
            SupportedLanguage::TypeScript => &["index.ts", "index.tsx", "index.js"],
            SupportedLanguage::Rust => &["mod.rs", "lib.rs"],
        }
    }
}

impl std::fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the syntax layer.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unsupported language for extension '{0}'")]
    UnsupportedExtension(String),
    #[error("failed to load grammar for {language}: {message}")]
    GrammarLoad {
        language: SupportedLanguage,
        message: String,
    },
    #[error("failed to parse '{path}'")]
    ParseFailed { path: String },
}

/// Detect the language of a file from its extension.
pub fn detect_language_from_extension(extension: &str) -> Result<SupportedLanguage, ParserError> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    for language in [
        SupportedLanguage::Python,
        SupportedLanguage::JavaScript,
        SupportedLanguage::TypeScript,
        SupportedLanguage::Rust,
    ] {
        if language.extensions().contains(&ext.as_str()) {
            return Ok(language);
        }
    }
    Err(ParserError::UnsupportedExtension(ext))
}

/// Detect the language of a file from its path.
pub fn detect_language_from_path(path: &str) -> Result<SupportedLanguage, ParserError> {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    detect_language_from_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_languages_from_extensions() {
        assert_eq!(
            detect_language_from_extension("py").unwrap(),
            SupportedLanguage::Python
        );
        assert_eq!(
            detect_language_from_extension(".tsx").unwrap(),
            SupportedLanguage::TypeScript
        );
        assert_eq!(
            detect_language_from_extension("RS").unwrap(),
            SupportedLanguage::Rust
        );
        assert_eq!(
            detect_language_from_path("src/app/main.mjs").unwrap(),
            SupportedLanguage::JavaScript
        );
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(matches!(
            detect_language_from_extension("rb"),
            Err(ParserError::UnsupportedExtension(_))
        ));
        assert!(detect_language_from_path("README").is_err());
    }
}
