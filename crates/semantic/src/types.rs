//! Shared data model: the definition, import, export, and usage records
//! that flow between the extraction layer and the aggregate builders.

use parser_core::{SourceSpan, SupportedLanguage};
use serde::{Deserialize, Serialize};

/// Kind of a declared entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Module,
    Class,
    Interface,
    Struct,
    Enum,
    Trait,
    Function,
    Method,
    Variable,
    Property,
    TypeAlias,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Module => "module",
            DefinitionKind::Class => "class",
            DefinitionKind::Interface => "interface",
            DefinitionKind::Struct => "struct",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Trait => "trait",
            DefinitionKind::Function => "function",
            DefinitionKind::Method => "method",
            DefinitionKind::Variable => "variable",
            DefinitionKind::Property => "property",
            DefinitionKind::TypeAlias => "type_alias",
        }
    }

    /// Class-like kinds participate in the hierarchy.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            DefinitionKind::Class
                | DefinitionKind::Interface
                | DefinitionKind::Struct
                | DefinitionKind::Enum
                | DefinitionKind::Trait
        )
    }
}

/// Source-level visibility of a definition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Crate,
}

/// One declared entity, as produced by the extraction layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub file_path: String,
    /// Span of the whole declaration.
    pub span: SourceSpan,
    /// Span of just the declared identifier, for exact-match checks.
    pub name_span: SourceSpan,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
    /// Parameter count for callables; `None` for non-callables.
    pub param_count: Option<usize>,
}

impl Definition {
    pub fn new(
        name: impl Into<String>,
        kind: DefinitionKind,
        file_path: impl Into<String>,
        span: SourceSpan,
        name_span: SourceSpan,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file_path: file_path.into(),
            span,
            name_span,
            is_async: false,
            is_generator: false,
            is_static: false,
            is_abstract: false,
            visibility: Visibility::default(),
            param_count: None,
        }
    }
}

/// A method or associated function of a class-like entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub span: SourceSpan,
    pub param_count: usize,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_async: bool,
    /// Decorator / attribute names attached to the method.
    pub decorators: Vec<String>,
}

/// Class-like kinds as seen by the hierarchy builder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLikeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Trait,
}

/// A class/interface/struct/trait definition with its members, the raw
/// material the hierarchy builder consumes alongside the syntax tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub kind: ClassLikeKind,
    pub file_path: String,
    pub span: SourceSpan,
    pub name_span: SourceSpan,
    pub methods: Vec<MethodInfo>,
    pub properties: Vec<String>,
    pub decorators: Vec<String>,
    pub is_abstract: bool,
}

/// One `impl` block (Rust): methods attached to a type, optionally for
/// a trait. Kept separate from `ClassRecord` because impls for a type
/// may live in any file of the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplRecord {
    pub type_name: String,
    pub trait_name: Option<String>,
    pub file_path: String,
    pub span: SourceSpan,
    pub methods: Vec<MethodInfo>,
    pub is_unsafe: bool,
}

/// How a symbol was brought into a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    /// `import { x } from "m"` / `from m import x` / `use m::x`
    Named,
    /// `import x from "m"`
    Default,
    /// `import * as ns from "m"` / `import m` / `use m::*`
    Namespace,
    /// `import "./styles.css"` - no bindings
    SideEffect,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Named => "named",
            ImportKind::Default => "default",
            ImportKind::Namespace => "namespace",
            ImportKind::SideEffect => "side_effect",
        }
    }
}

/// A single imported identifier, with its local alias when renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBinding {
    /// Original name, e.g. "foo" in `from m import foo as bar`.
    pub name: String,
    /// Alias, e.g. "bar" in `from m import foo as bar`.
    pub alias: Option<String>,
}

impl ImportBinding {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// The name this binding is visible under in the importing file.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One import statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    pub kind: ImportKind,
    /// The module path as written in source, e.g. "./utils", "pkg.sub".
    pub module_path: String,
    pub bindings: Vec<ImportBinding>,
    pub span: SourceSpan,
    /// TypeScript `import type { ... }`.
    pub is_type_only: bool,
}

/// How a symbol leaves a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    Named,
    Default,
    /// `export { x } from "m"` - forwards another module's export.
    Reexport,
    /// `export * from "m"` - barrel export.
    Wildcard,
}

/// One export statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    pub kind: ExportKind,
    pub names: Vec<ImportBinding>,
    /// Source module for re-exports and barrels.
    pub source: Option<String>,
    pub span: SourceSpan,
}

/// How an identifier is used at a site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageKind {
    Read,
    Write,
    Call,
    Import,
    Export,
    Type,
}

/// One identifier usage. For calls and qualified reads `name` carries
/// the full dotted path as written (`np.array`, `fmt::format`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub name: String,
    pub span: SourceSpan,
    pub kind: UsageKind,
}

/// Everything extracted from a single file. Read-only once built.
#[derive(Debug, Clone)]
pub struct FileIndex {
    pub file_path: String,
    pub language: SupportedLanguage,
    pub definitions: Vec<Definition>,
    pub classes: Vec<ClassRecord>,
    pub impls: Vec<ImplRecord>,
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
    pub usages: Vec<Usage>,
}

impl FileIndex {
    pub fn empty(file_path: impl Into<String>, language: SupportedLanguage) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            definitions: Vec::new(),
            classes: Vec::new(),
            impls: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            usages: Vec::new(),
        }
    }
}

/// One edge of the module dependency graph: an import path as written,
/// plus the project file it resolved to (if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub module_path: String,
    pub resolved_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_local_name_prefers_alias() {
        let plain = ImportBinding::plain("foo");
        assert_eq!(plain.local_name(), "foo");

        let aliased = ImportBinding {
            name: "foo".to_string(),
            alias: Some("bar".to_string()),
        };
        assert_eq!(aliased.local_name(), "bar");
    }

    #[test]
    fn class_like_kinds() {
        assert!(DefinitionKind::Trait.is_class_like());
        assert!(DefinitionKind::Interface.is_class_like());
        assert!(!DefinitionKind::Function.is_class_like());
        assert!(!DefinitionKind::Variable.is_class_like());
    }

    #[test]
    fn records_round_trip_through_json() {
        let mut definition = Definition::new(
            "process_data",
            DefinitionKind::Function,
            "utils.py",
            SourceSpan::zero(),
            SourceSpan::zero(),
        );
        definition.param_count = Some(2);
        let json = serde_json::to_string(&definition).unwrap();
        let back: Definition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "process_data");
        assert_eq!(back.kind, DefinitionKind::Function);
        assert_eq!(back.param_count, Some(2));

        let import = Import {
            kind: ImportKind::Named,
            module_path: "./utils".to_string(),
            bindings: vec![ImportBinding::plain("process_data")],
            span: SourceSpan::zero(),
            is_type_only: false,
        };
        let back: Import = serde_json::from_str(&serde_json::to_string(&import).unwrap()).unwrap();
        assert_eq!(back.kind, ImportKind::Named);
        assert_eq!(back.bindings, import.bindings);
    }
}
