//! Error taxonomy for the analysis core.
//!
//! Only genuinely exceptional conditions are errors. Resolution misses
//! are `Option::None`, structural anomalies (inheritance cycles,
//! self-referential scopes) are recovered via visited sets during graph
//! walks, and a failing file never aborts the batch it is part of.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticError {
    /// The requested language has no configuration. Fatal to the single
    /// call that asked for it, never to a batch of other files.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The parser produced no tree for a file.
    #[error("failed to parse '{path}': {message}")]
    ParseFailed { path: String, message: String },

    /// A definition references a file with no parsed-tree context. The
    /// affected entity is skipped, not the build.
    #[error("missing parse context for '{path}'")]
    MissingContext { path: String },
}

impl From<parser_core::ParserError> for SemanticError {
    fn from(err: parser_core::ParserError) -> Self {
        match err {
            parser_core::ParserError::UnsupportedExtension(ext) => {
                SemanticError::UnsupportedLanguage(ext)
            }
            parser_core::ParserError::GrammarLoad { language, message } => {
                SemanticError::ParseFailed {
                    path: String::new(),
                    message: format!("{language}: {message}"),
                }
            }
            parser_core::ParserError::ParseFailed { path } => SemanticError::ParseFailed {
                path,
                message: "parser produced no tree".to_string(),
            },
        }
    }
}
