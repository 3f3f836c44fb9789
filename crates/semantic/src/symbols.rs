//! Project-wide symbol table.
//!
//! Single owner of cross-file identity: every definition gets an opaque
//! [`SymbolId`] here, and per-file export/import indexes are derived
//! once all files have been analyzed. Mutated only during the
//! aggregation pass, read-only afterwards.

use crate::types::{Definition, Export, FileIndex, Import, Usage, Visibility};
use parser_core::SupportedLanguage;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Opaque cross-file symbol identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// A definition registered in the global table.
#[derive(Debug, Clone)]
pub struct SymbolDefinition {
    pub id: SymbolId,
    pub definition: Definition,
    /// Whether the symbol is reachable from other files (exported,
    /// `pub`, or public by the language's convention).
    pub exported: bool,
}

/// The global symbol table for one analysis run.
#[derive(Debug, Default)]
pub struct GlobalSymbolTable {
    symbols: Vec<SymbolDefinition>,
    by_file: FxHashMap<String, Vec<SymbolId>>,
    /// file -> exported name -> symbol.
    exports: FxHashMap<String, FxHashMap<String, SymbolId>>,
    /// file -> import statements.
    imports: FxHashMap<String, Vec<Import>>,
    /// file -> raw export statements (re-exports need these).
    export_statements: FxHashMap<String, Vec<Export>>,
    /// symbol -> recorded usage sites.
    references: FxHashMap<SymbolId, Vec<Usage>>,
}

impl GlobalSymbolTable {
    /// Aggregate all per-file indexes into one table. Runs after the
    /// per-file phase has fully joined; single writer, no locking.
    pub fn build(indexes: &[&FileIndex]) -> Self {
        let mut table = GlobalSymbolTable::default();

        for index in indexes {
            let file_ids = table.by_file.entry(index.file_path.clone()).or_default();
            let mut by_name: FxHashMap<&str, SymbolId> = FxHashMap::default();

            for definition in &index.definitions {
                let id = SymbolId(table.symbols.len() as u32);
                let exported = is_exported(definition, index);
                table.symbols.push(SymbolDefinition {
                    id,
                    definition: definition.clone(),
                    exported,
                });
                file_ids.push(id);
                by_name.entry(definition.name.as_str()).or_insert(id);
            }

            let exports = table.exports.entry(index.file_path.clone()).or_default();
            for symbol_id in file_ids.iter() {
                let symbol = &table.symbols[symbol_id.0 as usize];
                if symbol.exported {
                    exports
                        .entry(symbol.definition.name.clone())
                        .or_insert(symbol.id);
                }
            }
            // Explicit default exports map under their export name too.
            for export in &index.exports {
                if export.kind == crate::types::ExportKind::Default {
                    if let Some(binding) = export.names.first() {
                        if let Some(&id) = by_name.get(binding.name.as_str()) {
                            exports.insert("default".to_string(), id);
                        }
                    }
                }
            }

            table
                .imports
                .insert(index.file_path.clone(), index.imports.clone());
            table
                .export_statements
                .insert(index.file_path.clone(), index.exports.clone());
        }

        log::debug!(
            "global symbol table: {} symbols across {} files",
            table.symbols.len(),
            table.by_file.len()
        );
        table
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolDefinition> {
        self.symbols.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols defined in one file.
    pub fn file_symbols(&self, file: &str) -> impl Iterator<Item = &SymbolDefinition> {
        self.by_file
            .get(file)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
    }

    /// An exported symbol of a file, by exported name.
    pub fn exported(&self, file: &str, name: &str) -> Option<&SymbolDefinition> {
        self.exports
            .get(file)
            .and_then(|exports| exports.get(name))
            .and_then(|id| self.get(*id))
    }

    /// All exported names of a file.
    pub fn exports_of(&self, file: &str) -> Option<&FxHashMap<String, SymbolId>> {
        self.exports.get(file)
    }

    pub fn imports_of(&self, file: &str) -> &[Import] {
        self.imports.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn export_statements_of(&self, file: &str) -> &[Export] {
        self.export_statements
            .get(file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record a resolved usage of a symbol.
    pub fn add_reference(&mut self, id: SymbolId, usage: Usage) {
        self.references.entry(id).or_default().push(usage);
    }

    pub fn references(&self, id: SymbolId) -> &[Usage] {
        self.references.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Language-specific export rules. JS/TS export only what an export
/// statement names; Python exports module-level non-underscore names;
/// Rust exports `pub` items.
fn is_exported(definition: &Definition, index: &FileIndex) -> bool {
    match index.language {
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => {
            index.exports.iter().any(|export| {
                export
                    .names
                    .iter()
                    .any(|binding| binding.name == definition.name)
            })
        }
        SupportedLanguage::Python => {
            is_top_level(definition, index) && !definition.name.starts_with('_')
        }
        SupportedLanguage::Rust => definition.visibility == Visibility::Public,
    }
}

/// A definition is top-level when no other definition's span strictly
/// contains it.
fn is_top_level(definition: &Definition, index: &FileIndex) -> bool {
    !index.definitions.iter().any(|other| {
        other.span != definition.span && other.span.contains(&definition.span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_file;
    use crate::types::UsageKind;
    use parser_core::{GenericParser, SourceSpan};

    fn table_of(files: &[(&str, &str)]) -> GlobalSymbolTable {
        let parser = GenericParser::new();
        let indexes: Vec<FileIndex> = files
            .iter()
            .map(|(path, source)| extract_file(&parser.parse_path(path, source).unwrap()))
            .collect();
        let refs: Vec<&FileIndex> = indexes.iter().collect();
        GlobalSymbolTable::build(&refs)
    }

    #[test]
    fn python_exports_module_level_public_names() {
        let source = "\
def process_data(rows):
    def inner(row):
        return row
    return [inner(r) for r in rows]

def _private_helper():
    pass

class Loader:
    def load(self):
        pass
";
        let table = table_of(&[("utils.py", source)]);

        assert!(table.exported("utils.py", "process_data").is_some());
        assert!(table.exported("utils.py", "Loader").is_some());
        // Nested and underscore-prefixed names are not exported.
        assert!(table.exported("utils.py", "inner").is_none());
        assert!(table.exported("utils.py", "_private_helper").is_none());
        // Methods are inside their class, not module exports.
        assert!(table.exported("utils.py", "load").is_none());
    }

    #[test]
    fn js_exports_follow_export_statements() {
        let source = "\
export function visible() {}
function hidden() {}
export default class App {}
";
        let table = table_of(&[("app.js", source)]);
        assert!(table.exported("app.js", "visible").is_some());
        assert!(table.exported("app.js", "hidden").is_none());
        // Default export reachable under both names.
        assert!(table.exported("app.js", "default").is_some());
        assert_eq!(
            table.exported("app.js", "default").unwrap().definition.name,
            "App"
        );
    }

    #[test]
    fn rust_exports_require_pub() {
        let source = "pub fn helper() {}\nfn internal() {}\npub struct Config;\n";
        let table = table_of(&[("utils.rs", source)]);
        assert!(table.exported("utils.rs", "helper").is_some());
        assert!(table.exported("utils.rs", "Config").is_some());
        assert!(table.exported("utils.rs", "internal").is_none());
    }

    #[test]
    fn references_accumulate_per_symbol() {
        let mut table = table_of(&[("m.py", "def f():\n    pass\n")]);
        let id = table.exported("m.py", "f").unwrap().id;
        assert!(table.references(id).is_empty());

        table.add_reference(
            id,
            Usage {
                name: "f".to_string(),
                span: SourceSpan::zero(),
                kind: UsageKind::Call,
            },
        );
        assert_eq!(table.references(id).len(), 1);
    }
}
