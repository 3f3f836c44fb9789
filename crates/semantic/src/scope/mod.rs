//! Lexical scope trees.
//!
//! One [`ScopeTree`] per file, built in a single pre-order traversal of
//! the syntax tree. Nodes live in an arena and refer to each other by
//! [`ScopeId`]; the tree is the sole owner, parent links are plain ids
//! looked up on demand. Immutable after the build pass except for
//! back-filled hoisting metadata.

pub mod builder;
pub mod connector;

pub use builder::build_scope_tree;
pub use connector::ScopeEntityMap;

use parser_core::SourceSpan;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Arena index of a scope node within its tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Kind of lexical region a scope covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    Module,
    Function,
    Method,
    Class,
    Block,
    Comprehension,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Method => "method",
            ScopeKind::Class => "class",
            ScopeKind::Block => "block",
            ScopeKind::Comprehension => "comprehension",
        }
    }

    /// Hoisting targets: the scopes a `var`/`function` declaration is
    /// lifted into.
    pub fn is_hoist_target(&self) -> bool {
        matches!(
            self,
            ScopeKind::Module | ScopeKind::Function | ScopeKind::Method
        )
    }
}

/// What kind of entity a scope symbol names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Variable,
    Parameter,
    Import,
    Type,
}

/// Hoisting status of a declared symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Hoisting {
    /// Declared where it is visible from; no hoisting.
    #[default]
    None,
    /// Hoisted and fully initialized throughout the scope (JS
    /// `function` declarations).
    Initialized,
    /// Hoisted but undefined until the binding point (JS `var`). The
    /// symbol's span still marks the binding point.
    Uninitialized,
}

/// One declared name within a scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Span of the declaration site.
    pub span: SourceSpan,
    pub hoisted: Hoisting,
    pub is_parameter: bool,
    /// TypeScript type-only entities (interfaces, type aliases).
    pub is_type_only: bool,
}

impl ScopeSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
            hoisted: Hoisting::None,
            is_parameter: kind == SymbolKind::Parameter,
            is_type_only: false,
        }
    }
}

/// One lexical scope. Every node except the root has exactly one
/// parent; child spans are disjoint and nested within the parent span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeNode {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Name for named function/class scopes.
    pub name: Option<String>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: SourceSpan,
    pub symbols: FxHashMap<String, ScopeSymbol>,
}

/// The scope tree of one file. Owns all its nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTree {
    pub file_path: String,
    nodes: Vec<ScopeNode>,
    root: ScopeId,
}

impl ScopeTree {
    pub fn new(file_path: impl Into<String>, root_kind: ScopeKind, root_span: SourceSpan) -> Self {
        let root = ScopeNode {
            id: ScopeId(0),
            kind: root_kind,
            name: None,
            parent: None,
            children: Vec::new(),
            span: root_span,
            symbols: FxHashMap::default(),
        };
        Self {
            file_path: file_path.into(),
            nodes: vec![root],
            root: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeNode> {
        self.nodes.iter()
    }

    /// Append a new child scope under `parent`.
    pub fn push_scope(
        &mut self,
        kind: ScopeKind,
        name: Option<String>,
        parent: ScopeId,
        span: SourceSpan,
    ) -> ScopeId {
        let id = ScopeId(self.nodes.len() as u32);
        self.nodes.push(ScopeNode {
            id,
            kind,
            name,
            parent: Some(parent),
            children: Vec::new(),
            span,
            symbols: FxHashMap::default(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Declare a symbol in a scope. First declaration wins; later
    /// same-name declarations in the same scope are redefinitions and
    /// keep the original entry's position in the table.
    pub fn declare(&mut self, scope: ScopeId, symbol: ScopeSymbol) {
        self.nodes[scope.index()]
            .symbols
            .entry(symbol.name.clone())
            .or_insert(symbol);
    }

    /// The deepest scope whose span contains the 0-based position.
    pub fn find_scope_at_position(&self, row: u32, col: u32) -> ScopeId {
        let mut current = self.root;
        'descend: loop {
            for &child in &self.nodes[current.index()].children {
                if self.nodes[child.index()].span.contains_position(row, col) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Scope ids from `scope` up to the root, inclusive, nearest first.
    pub fn scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            chain.push(id);
            current = self.nodes[id.index()].parent;
        }
        chain
    }

    /// Resolve a name through the parent chain: the nearest enclosing
    /// declaration wins, which is exactly lexical shadowing.
    pub fn resolve(&self, name: &str, scope: ScopeId) -> Option<(ScopeId, &ScopeSymbol)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = &self.nodes[id.index()];
            if let Some(symbol) = node.symbols.get(name) {
                return Some((id, symbol));
            }
            current = node.parent;
        }
        None
    }

    /// All symbols visible from a scope. Walks the chain outward;
    /// shadowed names are reported once, from their nearest
    /// declaration.
    pub fn visible_symbols(&self, scope: ScopeId) -> Vec<(&ScopeSymbol, ScopeId)> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut visible = Vec::new();
        for id in self.scope_chain(scope) {
            let node = &self.nodes[id.index()];
            let mut names: Vec<&String> = node.symbols.keys().collect();
            names.sort();
            for name in names {
                if seen.insert(name.clone()) {
                    visible.push((&node.symbols[name], id));
                }
            }
        }
        visible
    }

    /// Whether `ancestor` is on `scope`'s parent chain (inclusive).
    pub fn is_ancestor_of(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(sl: u32, sc: u32, el: u32, ec: u32) -> SourceSpan {
        SourceSpan {
            start_line: sl,
            start_col: sc,
            end_line: el,
            end_col: ec,
            start_byte: sl * 100 + sc,
            end_byte: el * 100 + ec,
        }
    }

    fn sample_tree() -> ScopeTree {
        // module 0..10, function "f" 1..5, block 2..4
        let mut tree = ScopeTree::new("a.py", ScopeKind::Module, span(0, 0, 10, 0));
        let f = tree.push_scope(
            ScopeKind::Function,
            Some("f".to_string()),
            tree.root(),
            span(1, 0, 5, 0),
        );
        let block = tree.push_scope(ScopeKind::Block, None, f, span(2, 0, 4, 0));
        tree.declare(
            tree.root(),
            ScopeSymbol::new("x", SymbolKind::Variable, span(0, 0, 0, 1)),
        );
        tree.declare(f, ScopeSymbol::new("x", SymbolKind::Parameter, span(1, 6, 1, 7)));
        tree.declare(
            block,
            ScopeSymbol::new("y", SymbolKind::Variable, span(2, 4, 2, 5)),
        );
        tree
    }

    #[test]
    fn position_lookup_returns_deepest_scope() {
        let tree = sample_tree();
        let inner = tree.find_scope_at_position(3, 0);
        assert_eq!(tree.node(inner).kind, ScopeKind::Block);
        let module = tree.find_scope_at_position(8, 0);
        assert_eq!(module, tree.root());
    }

    #[test]
    fn nearest_enclosing_declaration_shadows() {
        let tree = sample_tree();
        let block = tree.find_scope_at_position(3, 0);
        let (scope, symbol) = tree.resolve("x", block).unwrap();
        // The parameter in the function shadows the module-level x.
        assert_eq!(tree.node(scope).kind, ScopeKind::Function);
        assert!(symbol.is_parameter);

        let (scope, _) = tree.resolve("x", tree.root()).unwrap();
        assert_eq!(scope, tree.root());
    }

    #[test]
    fn visible_symbols_reports_shadowed_names_once() {
        let tree = sample_tree();
        let block = tree.find_scope_at_position(3, 0);
        let visible = tree.visible_symbols(block);
        let xs: Vec<_> = visible.iter().filter(|(s, _)| s.name == "x").collect();
        assert_eq!(xs.len(), 1);
        assert!(xs[0].0.is_parameter);
        assert!(visible.iter().any(|(s, _)| s.name == "y"));
    }

    #[test]
    fn chain_runs_to_root() {
        let tree = sample_tree();
        let block = tree.find_scope_at_position(3, 0);
        let chain = tree.scope_chain(block);
        assert_eq!(chain.len(), 3);
        assert_eq!(*chain.last().unwrap(), tree.root());
        assert!(tree.is_ancestor_of(tree.root(), block));
        assert!(!tree.is_ancestor_of(block, tree.root()));
    }

    #[test]
    fn unresolved_name_is_none_not_error() {
        let tree = sample_tree();
        assert!(tree.resolve("missing", tree.root()).is_none());
    }
}
