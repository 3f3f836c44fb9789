//! Scope-entity connector.
//!
//! Functions and classes appear twice in the model: as a *declaration*
//! in their parent scope's symbol table, and as a *scope of their own*
//! containing their body. This glue maps between the two, enabling
//! "which scope does this definition own" and "which definition created
//! this scope" queries without either side holding references into the
//! other.

use crate::scope::{ScopeId, ScopeSymbol, ScopeTree};
use crate::types::Definition;
use rustc_hash::FxHashMap;

/// Bidirectional mapping between definitions and the scopes they
/// create, keyed by declaration byte range within one file.
#[derive(Debug, Default)]
pub struct ScopeEntityMap {
    /// Definition span (start, end bytes) -> the scope that entity owns.
    entity_scope: FxHashMap<(u32, u32), ScopeId>,
    /// Scope -> index of the defining entity in the file's definitions.
    scope_entity: FxHashMap<ScopeId, usize>,
}

impl ScopeEntityMap {
    /// Connect a file's definitions with its scope tree. A definition
    /// owns the scope whose span equals its own declaration span;
    /// definitions without a scope (variables, properties) simply have
    /// no entry.
    pub fn build(tree: &ScopeTree, definitions: &[Definition]) -> Self {
        let mut by_span: FxHashMap<(u32, u32), ScopeId> = FxHashMap::default();
        for scope in tree.iter() {
            by_span.insert((scope.span.start_byte, scope.span.end_byte), scope.id);
        }

        let mut map = ScopeEntityMap::default();
        for (index, definition) in definitions.iter().enumerate() {
            let key = (definition.span.start_byte, definition.span.end_byte);
            if let Some(&scope) = by_span.get(&key) {
                map.entity_scope.insert(key, scope);
                map.scope_entity.insert(scope, index);
            }
        }
        map
    }

    /// The scope a definition creates, if it creates one.
    pub fn scope_for_definition(&self, definition: &Definition) -> Option<ScopeId> {
        self.entity_scope
            .get(&(definition.span.start_byte, definition.span.end_byte))
            .copied()
    }

    /// The definition that created a scope, if any.
    pub fn definition_for_scope<'a>(
        &self,
        scope: ScopeId,
        definitions: &'a [Definition],
    ) -> Option<&'a Definition> {
        self.scope_entity
            .get(&scope)
            .and_then(|&index| definitions.get(index))
    }

    /// Everything visible from inside a definition's body: the symbols
    /// of its own scope plus the enclosing chain (which includes the
    /// definition's own name, declared in its parent scope).
    pub fn visible_from<'a>(
        &self,
        tree: &'a ScopeTree,
        definition: &Definition,
    ) -> Vec<(&'a ScopeSymbol, ScopeId)> {
        match self.scope_for_definition(definition) {
            Some(scope) => tree.visible_symbols(scope),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_file;
    use crate::scope::build_scope_tree;
    use parser_core::GenericParser;

    #[test]
    fn connects_functions_to_their_scopes() {
        let source = "top = 1\n\ndef process(data):\n    local = data\n    return local\n";
        let parsed = GenericParser::new().parse_path("m.py", source).unwrap();
        let tree = build_scope_tree(&parsed);
        let index = extract_file(&parsed);
        let map = ScopeEntityMap::build(&tree, &index.definitions);

        let process = index
            .definitions
            .iter()
            .find(|d| d.name == "process")
            .unwrap();
        let scope = map.scope_for_definition(process).expect("function owns a scope");
        assert_eq!(tree.node(scope).name.as_deref(), Some("process"));
        assert_eq!(
            map.definition_for_scope(scope, &index.definitions).unwrap().name,
            "process"
        );

        // Variables own no scope.
        let top = index.definitions.iter().find(|d| d.name == "top").unwrap();
        assert!(map.scope_for_definition(top).is_none());

        // From inside the function both the parameter and the module
        // names are visible.
        let visible = map.visible_from(&tree, process);
        assert!(visible.iter().any(|(s, _)| s.name == "data"));
        assert!(visible.iter().any(|(s, _)| s.name == "top"));
        assert!(visible.iter().any(|(s, _)| s.name == "process"));
    }
}
