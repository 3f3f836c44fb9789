//! Language configuration registry.
//!
//! Per-language declarative tables mapping syntax-node kinds and fields
//! to semantic roles. The walking and graph algorithms are shared; only
//! these tables differ between languages, so roughly 85% of the logic
//! stays language-agnostic. Pure data, no side effects; every lookup is
//! an exhaustive match over the closed [`SupportedLanguage`] set.

use crate::error::SemanticError;
use crate::scope::ScopeKind;
use parser_core::SupportedLanguage;

/// Where a declared symbol lands relative to the scope its declaration
/// creates: a function's own name belongs to the *enclosing* scope,
/// its parameters to the function's *own* scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeclarationTarget {
    Enclosing,
    Own,
}

/// Hoisting behavior applied as a post-pass over function/module scopes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HoistingRule {
    /// No hoisting (Python, Rust item visibility is handled by the
    /// visibility predicate instead).
    None,
    /// JavaScript/TypeScript: `function` declarations hoist fully,
    /// `var` bindings hoist as undefined-until-bound.
    VarAndFunction,
}

/// Whether a definition must textually precede a reference to be
/// visible from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityOrder {
    /// Declaration order is irrelevant within the scope chain (JS
    /// hoisted functions, Rust module items).
    Unordered,
    /// A definition is visible only at or after its declaration line
    /// (Python).
    DeclarationBeforeUse,
}

/// Declarative per-language table. All slices are static: the registry
/// is data compiled into the binary, not built at runtime.
#[derive(Debug)]
pub struct LanguageConfig {
    pub language: SupportedLanguage,

    /// Node kinds that open a new lexical scope, with the scope kind.
    pub scope_nodes: &'static [(&'static str, ScopeKind)],

    /// Class-like declaration kinds (feed the hierarchy builder).
    pub class_nodes: &'static [&'static str],
    /// Interface-like declaration kinds.
    pub interface_nodes: &'static [&'static str],
    /// Function/method declaration kinds.
    pub function_nodes: &'static [&'static str],

    /// Clause kinds carrying `extends`-style primary inheritance.
    pub extends_clause_kinds: &'static [&'static str],
    /// Clause kinds carrying `implements`-style secondary inheritance.
    pub implements_clause_kinds: &'static [&'static str],
    /// Node kinds that denote a type reference inside a clause; generic
    /// types are unwrapped to their base name (`Foo<T>` -> `Foo`).
    pub type_ref_kinds: &'static [&'static str],

    /// Tokens/decorators marking a method or class abstract.
    pub abstract_markers: &'static [&'static str],
    /// Tokens/decorators marking a method static.
    pub static_markers: &'static [&'static str],
    /// Tokens/decorators explicitly marking an override.
    pub override_markers: &'static [&'static str],

    /// Method names excluded from override analysis.
    pub method_skip_list: &'static [&'static str],

    pub hoisting: HoistingRule,
    pub visibility_order: VisibilityOrder,

    /// Namespace separator in qualified references.
    pub namespace_separator: &'static str,
    /// Index files that terminate a directory import.
    pub index_files: &'static [&'static str],
    /// Extensions probed when an import path omits one.
    pub probe_extensions: &'static [&'static str],
}

static PYTHON: LanguageConfig = LanguageConfig {
    language: SupportedLanguage::Python,
    scope_nodes: &[
        ("module", ScopeKind::Module),
        ("function_definition", ScopeKind::Function),
        ("lambda", ScopeKind::Function),
        ("class_definition", ScopeKind::Class),
        ("list_comprehension", ScopeKind::Comprehension),
        ("set_comprehension", ScopeKind::Comprehension),
        ("dictionary_comprehension", ScopeKind::Comprehension),
        ("generator_expression", ScopeKind::Comprehension),
    ],
    class_nodes: &["class_definition"],
    interface_nodes: &[],
    function_nodes: &["function_definition"],
    extends_clause_kinds: &["argument_list"],
    implements_clause_kinds: &[],
    type_ref_kinds: &["identifier", "attribute", "subscript"],
    abstract_markers: &["abstractmethod", "abc.abstractmethod"],
    static_markers: &["staticmethod"],
    override_markers: &["override", "typing.override"],
    // Dunder methods are skipped except __init__, which participates
    // in override chains.
    method_skip_list: &[
        "__repr__",
        "__str__",
        "__eq__",
        "__ne__",
        "__hash__",
        "__len__",
        "__iter__",
        "__next__",
        "__enter__",
        "__exit__",
        "__getattr__",
        "__setattr__",
        "__getitem__",
        "__setitem__",
        "__contains__",
        "__call__",
        "__new__",
        "__del__",
    ],
    hoisting: HoistingRule::None,
    visibility_order: VisibilityOrder::DeclarationBeforeUse,
    namespace_separator: ".",
    index_files: &["__init__.py"],
    probe_extensions: &["py", "pyi"],
};

static JAVASCRIPT: LanguageConfig = LanguageConfig {
    language: SupportedLanguage::JavaScript,
    scope_nodes: &[
        ("program", ScopeKind::Module),
        ("function_declaration", ScopeKind::Function),
        ("generator_function_declaration", ScopeKind::Function),
        ("function_expression", ScopeKind::Function),
        ("generator_function", ScopeKind::Function),
        ("arrow_function", ScopeKind::Function),
        ("method_definition", ScopeKind::Method),
        ("class_declaration", ScopeKind::Class),
        ("class", ScopeKind::Class),
        ("statement_block", ScopeKind::Block),
    ],
    class_nodes: &["class_declaration", "class"],
    interface_nodes: &[],
    function_nodes: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
    ],
    extends_clause_kinds: &["class_heritage", "extends_clause"],
    implements_clause_kinds: &[],
    type_ref_kinds: &["identifier", "member_expression", "generic_type"],
    abstract_markers: &[],
    static_markers: &["static"],
    override_markers: &[],
    method_skip_list: &["constructor"],
    hoisting: HoistingRule::VarAndFunction,
    visibility_order: VisibilityOrder::Unordered,
    namespace_separator: ".",
    index_files: &["index.js", "index.mjs", "index.cjs"],
    probe_extensions: &["js", "mjs", "cjs", "jsx"],
};

static TYPESCRIPT: LanguageConfig = LanguageConfig {
    language: SupportedLanguage::TypeScript,
    scope_nodes: &[
        ("program", ScopeKind::Module),
        ("function_declaration", ScopeKind::Function),
        ("generator_function_declaration", ScopeKind::Function),
        ("function_expression", ScopeKind::Function),
        ("arrow_function", ScopeKind::Function),
        ("method_definition", ScopeKind::Method),
        ("class_declaration", ScopeKind::Class),
        ("abstract_class_declaration", ScopeKind::Class),
        ("class", ScopeKind::Class),
        ("statement_block", ScopeKind::Block),
    ],
    class_nodes: &["class_declaration", "abstract_class_declaration", "class"],
    interface_nodes: &["interface_declaration"],
    function_nodes: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
    ],
    extends_clause_kinds: &[
        "class_heritage",
        "extends_clause",
        "extends_type_clause",
    ],
    implements_clause_kinds: &["implements_clause"],
    type_ref_kinds: &[
        "identifier",
        "type_identifier",
        "member_expression",
        "nested_type_identifier",
        "generic_type",
    ],
    abstract_markers: &["abstract"],
    static_markers: &["static"],
    override_markers: &["override"],
    method_skip_list: &["constructor"],
    hoisting: HoistingRule::VarAndFunction,
    visibility_order: VisibilityOrder::Unordered,
    namespace_separator: ".",
    index_files: &["index.ts", "index.tsx", "index.js"],
    probe_extensions: &["ts", "tsx", "js"],
};

static RUST: LanguageConfig = LanguageConfig {
    language: SupportedLanguage::Rust,
    scope_nodes: &[
        ("source_file", ScopeKind::Module),
        ("mod_item", ScopeKind::Module),
        ("function_item", ScopeKind::Function),
        ("closure_expression", ScopeKind::Function),
        ("impl_item", ScopeKind::Class),
        ("trait_item", ScopeKind::Class),
        ("block", ScopeKind::Block),
    ],
    class_nodes: &["struct_item", "enum_item", "union_item"],
    interface_nodes: &["trait_item"],
    function_nodes: &["function_item", "function_signature_item"],
    extends_clause_kinds: &["trait_bounds"],
    implements_clause_kinds: &[],
    type_ref_kinds: &[
        "type_identifier",
        "scoped_type_identifier",
        "generic_type",
    ],
    abstract_markers: &[],
    static_markers: &[],
    override_markers: &[],
    method_skip_list: &[],
    hoisting: HoistingRule::None,
    visibility_order: VisibilityOrder::Unordered,
    namespace_separator: "::",
    index_files: &["mod.rs", "lib.rs"],
    probe_extensions: &["rs"],
};

/// Look up the configuration for a language. Infallible: the enum is
/// closed and every variant carries a table.
pub fn get_config(language: SupportedLanguage) -> &'static LanguageConfig {
    match language {
        SupportedLanguage::Python => &PYTHON,
        SupportedLanguage::JavaScript => &JAVASCRIPT,
        SupportedLanguage::TypeScript => &TYPESCRIPT,
        SupportedLanguage::Rust => &RUST,
    }
}

/// Fallible front door for hosts handing in raw language strings.
pub fn get_config_by_name(name: &str) -> Result<&'static LanguageConfig, SemanticError> {
    match name {
        "python" => Ok(&PYTHON),
        "javascript" => Ok(&JAVASCRIPT),
        "typescript" => Ok(&TYPESCRIPT),
        "rust" => Ok(&RUST),
        other => Err(SemanticError::UnsupportedLanguage(other.to_string())),
    }
}

impl LanguageConfig {
    /// Scope kind created by a node kind, if any.
    pub fn scope_kind_for(&self, node_kind: &str) -> Option<ScopeKind> {
        self.scope_nodes
            .iter()
            .find(|(kind, _)| *kind == node_kind)
            .map(|(_, scope_kind)| *scope_kind)
    }

    pub fn is_class_node(&self, node_kind: &str) -> bool {
        self.class_nodes.contains(&node_kind)
    }

    pub fn is_interface_node(&self, node_kind: &str) -> bool {
        self.interface_nodes.contains(&node_kind)
    }

    pub fn is_function_node(&self, node_kind: &str) -> bool {
        self.function_nodes.contains(&node_kind)
    }

    pub fn is_type_ref(&self, node_kind: &str) -> bool {
        self.type_ref_kinds.contains(&node_kind)
    }

    pub fn is_skip_listed_method(&self, name: &str) -> bool {
        self.method_skip_list.contains(&name)
    }
}
