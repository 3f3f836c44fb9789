//! Generic tree-sitter parsing over the supported language set.

use crate::{ParserError, SupportedLanguage};
use tree_sitter::{Language, Node, Parser, Tree};

/// A parsed file: the concrete syntax tree together with the source it
/// was parsed from. Owns both so downstream code can borrow node text
/// for the lifetime of the analysis.
pub struct ParsedFile {
    pub file_path: String,
    pub language: SupportedLanguage,
    pub source: String,
    pub tree: Tree,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node of this file's tree.
    pub fn text(&self, node: Node) -> &str {
        crate::span::node_text(node, &self.source)
    }
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("file_path", &self.file_path)
            .field("language", &self.language)
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// Stateless parser facade. Grammar selection happens per call, so one
/// instance can be shared across languages and threads.
#[derive(Debug, Default, Clone)]
pub struct GenericParser;

impl GenericParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `source` as `language`. The file path is carried through
    /// for diagnostics and downstream cross-file keys; `.tsx`/`.jsx`
    /// paths select the JSX-aware TypeScript grammar.
    pub fn parse(
        &self,
        file_path: &str,
        source: &str,
        language: SupportedLanguage,
    ) -> Result<ParsedFile, ParserError> {
        let grammar = grammar_for(language, file_path);
        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ParserError::GrammarLoad {
                language,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParserError::ParseFailed {
                path: file_path.to_string(),
            })?;

        Ok(ParsedFile {
            file_path: file_path.to_string(),
            language,
            source: source.to_string(),
            tree,
        })
    }

    /// Detect the language from the path, then parse.
    pub fn parse_path(&self, file_path: &str, source: &str) -> Result<ParsedFile, ParserError> {
        let language = crate::detect_language_from_path(file_path)?;
        self.parse(file_path, source, language)
    }
}

fn grammar_for(language: SupportedLanguage, file_path: &str) -> Language {
    match language {
        SupportedLanguage::Python => tree_sitter_python::LANGUAGE.into(),
        SupportedLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        SupportedLanguage::TypeScript => {
            if file_path.ends_with(".tsx") {
                tree_sitter_typescript::LANGUAGE_TSX.into()
            } else {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
            }
        }
        SupportedLanguage::Rust => tree_sitter_rust::LANGUAGE.into(),
    }
}
