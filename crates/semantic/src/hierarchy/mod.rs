//! Class hierarchy graph.
//!
//! Built once per analysis run from the whole project's class-like
//! definitions, then frozen: closure fields (`all_ancestors`,
//! `all_descendants`, `method_resolution_order`) are written by a pure
//! second pass over the completed class map and never mutated again.
//! Classes refer to each other by [`ClassKey`], never by reference; the
//! hierarchy's map is the single owner.

pub mod builder;

pub use builder::build_hierarchy;

use crate::types::{ClassLikeKind, MethodInfo};
use parser_core::SourceSpan;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Qualified class identifier: file path plus name, disambiguating
/// same-named classes across files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassKey {
    pub file_path: String,
    pub name: String,
}

impl ClassKey {
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ClassKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file_path, self.name)
    }
}

/// How an inheritance edge was declared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Extends,
    Implements,
    Trait,
    Mixin,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Extends => "extends",
            EdgeKind::Implements => "implements",
            EdgeKind::Trait => "trait",
            EdgeKind::Mixin => "mixin",
        }
    }
}

/// One directed inheritance relationship, carrying the span where it
/// was declared. Multiple edges between the same pair with different
/// kinds are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InheritanceEdge {
    pub from: ClassKey,
    /// Raw target name as written; resolution to a key happens against
    /// the completed class map.
    pub to_name: String,
    pub kind: EdgeKind,
    pub span: SourceSpan,
}

/// One class/interface/struct/trait in the hierarchy.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub key: ClassKey,
    pub kind: ClassLikeKind,
    pub span: SourceSpan,

    /// Ordered base classes; `base_classes[0]` is the primary parent
    /// for single-parent languages. For multi-inheritance languages all
    /// entries are co-equal parents.
    pub base_classes: Vec<String>,
    /// Implemented/derived names, deduplicated, declaration order kept.
    pub interfaces: Vec<String>,

    pub is_abstract: bool,
    pub is_interface: bool,
    pub is_trait: bool,
    pub is_mixin: bool,
    /// Language-specific markers: `unsafe`/`auto` on Rust traits,
    /// `dataclass`/`enum`/`namedtuple`/`metaclass=...` on Python
    /// classes.
    pub modifiers: Vec<String>,

    pub methods: FxHashMap<String, MethodInfo>,
    /// Method names in declaration order, for deterministic iteration.
    pub method_order: Vec<String>,
    pub properties: Vec<String>,

    // Computed by the closure pass; empty until then.
    pub derived_classes: Vec<ClassKey>,
    pub all_ancestors: Vec<ClassKey>,
    pub all_descendants: Vec<ClassKey>,
    /// Simplified method resolution order: `[self] + all_ancestors` in
    /// discovery order. This is deliberately not C3 linearization.
    pub method_resolution_order: Vec<ClassKey>,
    /// The primary base's key, for convenience; `None` for roots.
    pub parent_class: Option<ClassKey>,
}

impl ClassNode {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn file_path(&self) -> &str {
        &self.key.file_path
    }
}

/// The frozen hierarchy for one analysis run. Any file change requires
/// a full rebuild: the closures are global.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    classes: FxHashMap<ClassKey, ClassNode>,
    /// Keys in discovery order.
    pub order: Vec<ClassKey>,
    /// Append-only edge list.
    pub edges: Vec<InheritanceEdge>,
    /// Classes with no base classes, in discovery order.
    pub root_classes: Vec<ClassKey>,
    /// Name -> all keys carrying that name, for cross-file resolution.
    by_name: FxHashMap<String, Vec<ClassKey>>,
    pub class_count: usize,
    /// Number of classes on the longest root-to-leaf extends chain.
    pub max_depth: usize,
}

impl ClassHierarchy {
    pub fn get(&self, key: &ClassKey) -> Option<&ClassNode> {
        self.classes.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &ClassKey) -> Option<&mut ClassNode> {
        self.classes.get_mut(key)
    }

    pub(crate) fn insert(&mut self, node: ClassNode) {
        let key = node.key.clone();
        if self.classes.contains_key(&key) {
            log::debug!("duplicate class '{key}' ignored");
            return;
        }
        self.by_name
            .entry(key.name.clone())
            .or_default()
            .push(key.clone());
        self.order.push(key.clone());
        self.classes.insert(key, node);
        self.class_count = self.classes.len();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassNode> {
        self.order.iter().filter_map(|key| self.classes.get(key))
    }

    /// Resolve a raw class name from the perspective of a file: a
    /// same-file definition wins, otherwise the first match in sorted
    /// key order (deterministic across runs).
    pub fn resolve_name(&self, name: &str, from_file: &str) -> Option<&ClassKey> {
        let candidates = self.by_name.get(name)?;
        candidates
            .iter()
            .find(|key| key.file_path == from_file)
            .or_else(|| candidates.iter().min())
    }

    /// All keys carrying a simple name.
    pub fn keys_named(&self, name: &str) -> &[ClassKey] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a simple name to its node, same-file preference.
    pub fn get_by_name(&self, name: &str, from_file: &str) -> Option<&ClassNode> {
        self.resolve_name(name, from_file)
            .and_then(|key| self.classes.get(key))
    }

    /// The primary parent of a class.
    pub fn get_parent_class(&self, key: &ClassKey) -> Option<&ClassNode> {
        self.get(key)?
            .parent_class
            .as_ref()
            .and_then(|parent| self.classes.get(parent))
    }

    /// Direct subclasses.
    pub fn get_subclasses(&self, key: &ClassKey) -> Vec<&ClassNode> {
        self.get(key)
            .map(|node| {
                node.derived_classes
                    .iter()
                    .filter_map(|k| self.classes.get(k))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `key` inherits (transitively) from a class named
    /// `ancestor_name`.
    pub fn is_subclass_of(&self, key: &ClassKey, ancestor_name: &str) -> bool {
        self.get(key)
            .map(|node| {
                node.all_ancestors
                    .iter()
                    .any(|ancestor| ancestor.name == ancestor_name)
            })
            .unwrap_or(false)
    }

    /// The extends path from a class up to a named ancestor, inclusive
    /// on both ends. `None` when the ancestor is not reachable.
    pub fn get_inheritance_path(&self, from: &ClassKey, to_name: &str) -> Option<Vec<ClassKey>> {
        let mut visited = rustc_hash::FxHashSet::default();
        let mut path = vec![from.clone()];
        self.path_to(from, to_name, &mut visited, &mut path)
            .then_some(path)
    }

    fn path_to(
        &self,
        current: &ClassKey,
        to_name: &str,
        visited: &mut rustc_hash::FxHashSet<ClassKey>,
        path: &mut Vec<ClassKey>,
    ) -> bool {
        if current.name == to_name {
            return true;
        }
        if !visited.insert(current.clone()) {
            return false;
        }
        let Some(node) = self.classes.get(current) else {
            return false;
        };
        for base_name in &node.base_classes {
            if let Some(base_key) = self.resolve_name(base_name, &current.file_path) {
                path.push(base_key.clone());
                if self.path_to(&base_key.clone(), to_name, visited, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Whether a class implements an interface/trait, directly or via
    /// any ancestor.
    pub fn implements_interface(&self, key: &ClassKey, interface: &str) -> bool {
        let Some(node) = self.get(key) else {
            return false;
        };
        if node.interfaces.iter().any(|i| i == interface) {
            return true;
        }
        node.all_ancestors
            .iter()
            .filter_map(|ancestor| self.classes.get(ancestor))
            .any(|ancestor| ancestor.interfaces.iter().any(|i| i == interface))
    }

    /// All methods callable on a class, own and inherited, resolved in
    /// method-resolution order: the nearest definition of each name
    /// wins.
    pub fn get_all_methods(&self, key: &ClassKey) -> Vec<(&str, &MethodInfo, &ClassKey)> {
        let Some(node) = self.get(key) else {
            return Vec::new();
        };
        let mut seen = rustc_hash::FxHashSet::default();
        let mut methods = Vec::new();
        for mro_key in &node.method_resolution_order {
            let Some(mro_node) = self.classes.get(mro_key) else {
                continue;
            };
            for name in &mro_node.method_order {
                if let Some(info) = mro_node.methods.get(name) {
                    if seen.insert(name.clone()) {
                        methods.push((name.as_str(), info, &mro_node.key));
                    }
                }
            }
        }
        methods
    }
}
