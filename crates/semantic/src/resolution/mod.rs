//! Symbol resolution engine.
//!
//! Maps a reference (bare name or call expression) to its defining
//! declaration through a strictly ordered fallback chain: local
//! same-file definitions, qualified namespace lookups, import-based
//! cross-file resolution (with re-export recursion), each gated by the
//! per-language visibility predicate. A miss is a normal outcome -
//! external library calls resolve to `None`, never to an error.

pub mod paths;
pub mod visibility;

pub use paths::ModuleGraph;

use crate::config::get_config;
use crate::scope::{ScopeId, ScopeSymbol, ScopeTree, SymbolKind};
use crate::symbols::{GlobalSymbolTable, SymbolId};
use crate::types::{Definition, DefinitionKind, ExportKind, FileIndex, Import, ImportKind};
use parser_core::{SourceSpan, SupportedLanguage};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// How certain a resolution is. AST-verified matches are `Exact`;
/// scope-table inferences without AST re-verification are `Likely`;
/// heuristic path matches degrade to `Possible`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    Likely,
    Possible,
}

/// What a resolution landed on.
#[derive(Debug, Clone)]
pub enum ResolvedTarget {
    Definition(Definition),
    Scope(ScopeSymbol),
}

impl ResolvedTarget {
    pub fn name(&self) -> &str {
        match self {
            ResolvedTarget::Definition(definition) => &definition.name,
            ResolvedTarget::Scope(symbol) => &symbol.name,
        }
    }

    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            ResolvedTarget::Definition(definition) => Some(definition),
            ResolvedTarget::Scope(_) => None,
        }
    }
}

/// Result of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedSymbol {
    pub target: ResolvedTarget,
    /// Global identity when the target is a registered definition.
    pub symbol_id: Option<SymbolId>,
    /// The scope the match was found in, for local resolutions.
    pub scope: Option<ScopeId>,
    pub confidence: Confidence,
}

/// A call (or bare reference) to resolve.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// Callee as written: `process`, `np.array`, `fmt::format`.
    pub callee: String,
    pub file_path: String,
    pub span: SourceSpan,
}

/// The resolution engine. Borrows the frozen aggregate structures; all
/// queries are read-only.
pub struct SymbolResolver<'a> {
    symbols: &'a GlobalSymbolTable,
    module_graph: &'a ModuleGraph,
    scope_trees: &'a FxHashMap<String, ScopeTree>,
    indexes: &'a FxHashMap<String, FileIndex>,
    /// Sorted for deterministic candidate selection.
    known_files: Vec<String>,
}

/// Re-export recursion guard.
const MAX_REEXPORT_DEPTH: usize = 16;

impl<'a> SymbolResolver<'a> {
    pub fn new(
        symbols: &'a GlobalSymbolTable,
        module_graph: &'a ModuleGraph,
        scope_trees: &'a FxHashMap<String, ScopeTree>,
        indexes: &'a FxHashMap<String, FileIndex>,
    ) -> Self {
        let mut known_files: Vec<String> = indexes.keys().cloned().collect();
        known_files.sort();
        Self {
            symbols,
            module_graph,
            scope_trees,
            indexes,
            known_files,
        }
    }

    /// Resolve a call site to its defining declaration.
    pub fn resolve_call(&self, call: &CallSite) -> Option<ResolvedSymbol> {
        let language = parser_core::detect_language_from_path(&call.file_path).ok()?;
        let separator = get_config(language).namespace_separator;

        if call.callee.contains(separator) {
            return self.resolve_qualified(call, language, separator);
        }
        if let Some(resolved) = self.resolve_local(call, language) {
            return Some(resolved);
        }
        self.resolve_via_imports(&call.file_path, &call.callee, language)
    }

    /// Resolve a bare name from a scope: scope chain first (nearest
    /// enclosing declaration wins), then the file's imports.
    pub fn resolve_symbol(
        &self,
        name: &str,
        file_path: &str,
        scope: ScopeId,
    ) -> Option<ResolvedSymbol> {
        let language = parser_core::detect_language_from_path(file_path).ok()?;
        if let Some(tree) = self.scope_trees.get(file_path) {
            if let Some((found_in, symbol)) = tree.resolve(name, scope) {
                if symbol.kind == SymbolKind::Import {
                    if let Some(resolved) = self.resolve_via_imports(file_path, name, language) {
                        return Some(resolved);
                    }
                }
                // Upgrade to the AST-backed definition when the spans
                // agree; otherwise the table entry itself is the
                // answer, at reduced confidence.
                if let Some(index) = self.indexes.get(file_path) {
                    if let Some(definition) = index
                        .definitions
                        .iter()
                        .find(|d| d.name == name && d.name_span == symbol.span)
                    {
                        return Some(ResolvedSymbol {
                            symbol_id: self.symbol_id_of(definition),
                            target: ResolvedTarget::Definition(definition.clone()),
                            scope: Some(found_in),
                            confidence: Confidence::Exact,
                        });
                    }
                }
                return Some(ResolvedSymbol {
                    target: ResolvedTarget::Scope(symbol.clone()),
                    symbol_id: None,
                    scope: Some(found_in),
                    confidence: Confidence::Likely,
                });
            }
        }
        self.resolve_via_imports(file_path, name, language)
    }

    // ---- step 1: local same-file lookup ----------------------------

    fn resolve_local(&self, call: &CallSite, language: SupportedLanguage) -> Option<ResolvedSymbol> {
        let index = self.indexes.get(&call.file_path)?;
        let tree = self.scope_trees.get(&call.file_path)?;
        let call_scope = tree.find_scope_at_position(call.span.start_line, call.span.start_col);

        let mut best: Option<&Definition> = None;
        for definition in &index.definitions {
            if definition.name != call.callee {
                continue;
            }
            // Methods and properties are reached through an object, not
            // by bare name.
            if matches!(definition.kind, DefinitionKind::Method | DefinitionKind::Property) {
                continue;
            }
            if !visibility::is_visible_from(language, tree, definition, call_scope, &call.span) {
                continue;
            }
            match &best {
                // Python redefinition: the latest declaration at or
                // before the call wins.
                Some(current) if language == SupportedLanguage::Python => {
                    if definition.name_span.start_line > current.name_span.start_line {
                        best = Some(definition);
                    }
                }
                Some(_) => {}
                None => best = Some(definition),
            }
        }

        best.map(|definition| ResolvedSymbol {
            symbol_id: self.symbol_id_of(definition),
            target: ResolvedTarget::Definition(definition.clone()),
            scope: Some(call_scope),
            confidence: Confidence::Exact,
        })
    }

    // ---- step 2: qualified names -----------------------------------

    fn resolve_qualified(
        &self,
        call: &CallSite,
        language: SupportedLanguage,
        separator: &str,
    ) -> Option<ResolvedSymbol> {
        let namespace = call.callee.split(separator).next()?;
        let member = call.callee.rsplit(separator).next()?;

        for import in self.symbols.imports_of(&call.file_path) {
            let target_module = match import.kind {
                ImportKind::Namespace => {
                    if !namespace_import_matches(import, namespace, separator) {
                        continue;
                    }
                    import.module_path.clone()
                }
                // `use std::fmt;` style: a named import binding a
                // module, referenced as `fmt::format`.
                ImportKind::Named | ImportKind::Default => {
                    let Some(binding) = import
                        .bindings
                        .iter()
                        .find(|binding| binding.local_name() == namespace)
                    else {
                        continue;
                    };
                    if import.module_path.is_empty() {
                        binding.name.clone()
                    } else {
                        format!("{}{}{}", import.module_path, separator, binding.name)
                    }
                }
                ImportKind::SideEffect => continue,
            };

            if let Some((file, heuristic)) =
                self.resolve_module_file(&call.file_path, &target_module, language)
            {
                let mut visited = FxHashSet::default();
                if let Some(mut resolved) = self.lookup_export(&file, member, &mut visited, 0) {
                    if heuristic {
                        resolved.confidence = Confidence::Possible;
                    }
                    return Some(resolved);
                }
            }
        }
        None
    }

    // ---- step 3: import-based resolution ---------------------------

    fn resolve_via_imports(
        &self,
        file_path: &str,
        name: &str,
        language: SupportedLanguage,
    ) -> Option<ResolvedSymbol> {
        for import in self.symbols.imports_of(file_path) {
            if import.kind == ImportKind::SideEffect {
                continue;
            }
            let binding = import
                .bindings
                .iter()
                .find(|binding| binding.local_name() == name || binding.name == "*");
            let Some(binding) = binding else {
                continue;
            };
            let original = if binding.name == "*" {
                name
            } else {
                binding.name.as_str()
            };

            let Some((target_file, heuristic)) =
                self.resolve_module_file(file_path, &import.module_path, language)
            else {
                continue;
            };
            let mut visited = FxHashSet::default();
            if let Some(mut resolved) = self.lookup_export(&target_file, original, &mut visited, 0)
            {
                if heuristic {
                    resolved.confidence = Confidence::Possible;
                }
                return Some(resolved);
            }
        }
        None
    }

    /// Module path to file, in contract order: dependency graph entry,
    /// relative/dotted resolution, then heuristic suffix match (flagged
    /// so callers can downgrade confidence).
    fn resolve_module_file(
        &self,
        importing_file: &str,
        module_path: &str,
        language: SupportedLanguage,
    ) -> Option<(String, bool)> {
        if let Some(resolved) = self.module_graph.lookup(importing_file, module_path) {
            return Some((resolved.to_string(), false));
        }
        if let Some(resolved) =
            paths::resolve_without_graph(module_path, importing_file, language, &self.known_files)
        {
            return Some((resolved, false));
        }
        paths::suffix_match(module_path, language, &self.known_files)
            .map(|resolved| (resolved, true))
    }

    /// Look up an export of a file, following re-export and barrel
    /// chains into their source modules. Visited set and depth cap keep
    /// circular barrels terminating.
    fn lookup_export(
        &self,
        file_path: &str,
        name: &str,
        visited: &mut FxHashSet<(String, String)>,
        depth: usize,
    ) -> Option<ResolvedSymbol> {
        if depth > MAX_REEXPORT_DEPTH
            || !visited.insert((file_path.to_string(), name.to_string()))
        {
            return None;
        }

        if let Some(symbol) = self.symbols.exported(file_path, name) {
            return Some(ResolvedSymbol {
                symbol_id: Some(symbol.id),
                target: ResolvedTarget::Definition(symbol.definition.clone()),
                scope: None,
                confidence: Confidence::Exact,
            });
        }

        let language = parser_core::detect_language_from_path(file_path).ok()?;
        for export in self.symbols.export_statements_of(file_path) {
            match export.kind {
                ExportKind::Reexport => {
                    let Some(binding) = export
                        .names
                        .iter()
                        .find(|binding| binding.local_name() == name)
                    else {
                        continue;
                    };
                    let Some(source) = &export.source else {
                        continue;
                    };
                    if let Some((source_file, _)) =
                        self.resolve_module_file(file_path, source, language)
                    {
                        if let Some(resolved) =
                            self.lookup_export(&source_file, &binding.name, visited, depth + 1)
                        {
                            return Some(resolved);
                        }
                    }
                }
                ExportKind::Wildcard => {
                    let Some(source) = &export.source else {
                        continue;
                    };
                    if let Some((source_file, _)) =
                        self.resolve_module_file(file_path, source, language)
                    {
                        if let Some(resolved) =
                            self.lookup_export(&source_file, name, visited, depth + 1)
                        {
                            return Some(resolved);
                        }
                    }
                }
                ExportKind::Named | ExportKind::Default => {}
            }
        }

        // Python forwards imported names as module attributes:
        // `from impl import x` in a package __init__ re-exports x.
        if language == SupportedLanguage::Python {
            for import in self.symbols.imports_of(file_path) {
                let Some(binding) = import
                    .bindings
                    .iter()
                    .find(|binding| binding.local_name() == name)
                else {
                    continue;
                };
                if binding.name == "*" {
                    continue;
                }
                if let Some((source_file, _)) =
                    self.resolve_module_file(file_path, &import.module_path, language)
                {
                    if let Some(resolved) =
                        self.lookup_export(&source_file, &binding.name, visited, depth + 1)
                    {
                        return Some(resolved);
                    }
                }
            }
        }
        None
    }

    fn symbol_id_of(&self, definition: &Definition) -> Option<SymbolId> {
        self.symbols
            .file_symbols(&definition.file_path)
            .find(|symbol| {
                symbol.definition.name == definition.name
                    && symbol.definition.name_span == definition.name_span
            })
            .map(|symbol| symbol.id)
    }
}

/// Whether a namespace-style import binds the given namespace name:
/// either via its local alias (`import numpy as np`) or via the first
/// segment of an unaliased dotted path (`import os.path` binds `os`).
fn namespace_import_matches(import: &Import, namespace: &str, separator: &str) -> bool {
    import.bindings.iter().any(|binding| {
        if binding.local_name() == namespace {
            return true;
        }
        binding.alias.is_none()
            && binding
                .name
                .split(separator)
                .next()
                .is_some_and(|first| first == namespace)
    })
}
