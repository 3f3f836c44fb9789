//! Structural analysis core.
//!
//! Builds three interlocking models from parsed source code:
//!
//! - a **scope tree** per file (lexical nesting and symbol visibility),
//! - a **class hierarchy** across the project (inheritance, interface
//!   and trait relationships with computed ancestry and a simplified
//!   method resolution order), and
//! - a **symbol resolution engine** mapping identifier usages to their
//!   defining declaration across files, imports, and exports.
//!
//! Per-file analysis is embarrassingly parallel; the aggregate models
//! are built in a single-writer pass once every file has been analyzed.
//! See [`pipeline::Analyzer`] for the orchestration entry point.

pub mod config;
pub mod error;
pub mod extract;
pub mod hierarchy;
pub mod overrides;
pub mod pipeline;
pub mod resolution;
pub mod scope;
pub mod symbols;
pub mod types;

pub use error::SemanticError;
pub use hierarchy::{ClassHierarchy, ClassKey, ClassNode, EdgeKind, InheritanceEdge};
pub use overrides::{MethodOverrideMap, MethodRef, OverrideInfo};
pub use pipeline::{AnalysisConfig, Analyzer, FileAnalysis, ProjectAnalysis, SourceFile};
pub use resolution::{CallSite, Confidence, ModuleGraph, ResolvedSymbol, ResolvedTarget, SymbolResolver};
pub use scope::{
    build_scope_tree, Hoisting, ScopeEntityMap, ScopeId, ScopeKind, ScopeNode, ScopeSymbol,
    ScopeTree, SymbolKind,
};
pub use symbols::{GlobalSymbolTable, SymbolId};
pub use types::{
    Definition, DefinitionKind, Export, ExportKind, Import, ImportBinding, ImportKind, Usage,
    UsageKind,
};
