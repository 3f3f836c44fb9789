//! Scope tree construction.
//!
//! Single pre-order traversal of a file's syntax tree. At each node the
//! language table decides whether the node opens a scope and whether it
//! declares a symbol, and into which scope the symbol goes (a function's
//! name belongs to the enclosing scope, its parameters to its own).
//! JavaScript/TypeScript hoisting is applied as a post-pass over the
//! finished tree.

use crate::config::{get_config, HoistingRule, LanguageConfig};
use crate::scope::{Hoisting, ScopeId, ScopeKind, ScopeSymbol, ScopeTree, SymbolKind};
use parser_core::{named_children, ParsedFile, SourceSpan, SupportedLanguage};
use tree_sitter::Node;

/// Build the scope tree for one parsed file.
pub fn build_scope_tree(parsed: &ParsedFile) -> ScopeTree {
    let config = get_config(parsed.language);
    let root_node = parsed.root();
    let mut tree = ScopeTree::new(
        parsed.file_path.clone(),
        ScopeKind::Module,
        SourceSpan::of_node(&root_node),
    );

    let mut builder = Builder {
        config,
        parsed,
        tree: &mut tree,
    };
    for child in named_children(root_node) {
        builder.walk(child, ScopeId(0));
    }

    if config.hoisting == HoistingRule::VarAndFunction {
        apply_hoisting(&mut tree, parsed);
    }

    tree
}

struct Builder<'a> {
    config: &'static LanguageConfig,
    parsed: &'a ParsedFile,
    tree: &'a mut ScopeTree,
}

impl<'a> Builder<'a> {
    fn walk(&mut self, node: Node, current: ScopeId) {
        // Parser error subtrees are skipped, never fatal.
        if node.is_error() || node.is_missing() {
            return;
        }

        let kind = node.kind();
        if let Some(scope_kind) = self.config.scope_kind_for(kind) {
            let name = self.scope_name(node);
            let scope = self.tree.push_scope(
                scope_kind,
                name,
                current,
                SourceSpan::of_node(&node),
            );
            self.declare_for_scope_node(node, current, scope);
            for child in named_children(node) {
                self.walk(child, scope);
            }
            return;
        }

        self.declare_plain(node, current);
        for child in named_children(node) {
            self.walk(child, current);
        }
    }

    fn scope_name(&self, node: Node) -> Option<String> {
        let field = match node.kind() {
            "impl_item" => "type",
            _ => "name",
        };
        node.child_by_field_name(field)
            .map(|n| self.parsed.text(n).to_string())
    }

    /// Symbols introduced by a scope-creating node: the entity's own
    /// name into the enclosing scope, its parameters into the new one.
    fn declare_for_scope_node(&mut self, node: Node, enclosing: ScopeId, own: ScopeId) {
        let kind = node.kind();
        match self.config.language {
            SupportedLanguage::Python => match kind {
                "function_definition" => {
                    let symbol_kind = if self.tree.node(enclosing).kind == ScopeKind::Class {
                        SymbolKind::Method
                    } else {
                        SymbolKind::Function
                    };
                    self.declare_name_field(node, enclosing, symbol_kind);
                    self.declare_parameters(node, own);
                }
                "lambda" => self.declare_parameters(node, own),
                "class_definition" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Class);
                }
                // Comprehension iteration variables belong to the
                // comprehension's own scope, not the enclosing one.
                "list_comprehension" | "set_comprehension" | "dictionary_comprehension"
                | "generator_expression" => {
                    for clause in named_children(node) {
                        if clause.kind() == "for_in_clause" {
                            if let Some(left) = clause.child_by_field_name("left") {
                                self.declare_pattern(left, own, SymbolKind::Variable);
                            }
                        }
                    }
                }
                _ => {}
            },
            SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => match kind {
                // Function declaration names are placed by the hoisting
                // post-pass so each name has a single defining symbol.
                "function_declaration" | "generator_function_declaration" => {
                    self.declare_parameters(node, own);
                }
                "function_expression" | "generator_function" => {
                    // A named function expression binds its name only
                    // inside itself.
                    self.declare_name_field(node, own, SymbolKind::Function);
                    self.declare_parameters(node, own);
                }
                "arrow_function" => self.declare_parameters(node, own),
                "method_definition" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Method);
                    self.declare_parameters(node, own);
                }
                "class_declaration" | "abstract_class_declaration" | "class" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Class);
                }
                "statement_block" => {
                    // `catch (e) { ... }`: the catch parameter scopes to
                    // the handler block.
                    if let Some(parent) = node.parent() {
                        if parent.kind() == "catch_clause" {
                            if let Some(param) = parent.child_by_field_name("parameter") {
                                self.declare_pattern(param, own, SymbolKind::Parameter);
                            }
                        }
                    }
                }
                _ => {}
            },
            SupportedLanguage::Rust => match kind {
                "function_item" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Function);
                    self.declare_parameters(node, own);
                }
                "closure_expression" => self.declare_parameters(node, own),
                "trait_item" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Class);
                }
                "mod_item" => {
                    self.declare_name_field(node, enclosing, SymbolKind::Type);
                }
                // impl blocks are anonymous scopes over their methods.
                _ => {}
            },
        }
    }

    /// Declarations that do not open a scope of their own.
    fn declare_plain(&mut self, node: Node, current: ScopeId) {
        let kind = node.kind();
        match self.config.language {
            SupportedLanguage::Python => match kind {
                "assignment" => {
                    if let Some(left) = node.child_by_field_name("left") {
                        self.declare_assignment_targets(left, current);
                    }
                }
                "named_expression" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        self.declare_pattern(name, current, SymbolKind::Variable);
                    }
                }
                "for_statement" => {
                    if let Some(left) = node.child_by_field_name("left") {
                        self.declare_pattern(left, current, SymbolKind::Variable);
                    }
                }
                "as_pattern" => {
                    if let Some(alias) = node.child_by_field_name("alias") {
                        self.declare_pattern(alias, current, SymbolKind::Variable);
                    }
                }
                "import_statement" => {
                    for child in named_children(node) {
                        match child.kind() {
                            // `import foo.bar` binds `foo`.
                            "dotted_name" => {
                                let text = self.parsed.text(child);
                                let first = text.split('.').next().unwrap_or(text);
                                self.declare_symbol(
                                    current,
                                    first,
                                    SymbolKind::Import,
                                    SourceSpan::of_node(&child),
                                );
                            }
                            "aliased_import" => {
                                if let Some(alias) = child.child_by_field_name("alias") {
                                    self.declare_pattern(alias, current, SymbolKind::Import);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                "import_from_statement" => {
                    for child in named_children(node) {
                        // Skip the module_name field; only bound names.
                        if Some(child) == node.child_by_field_name("module_name") {
                            continue;
                        }
                        match child.kind() {
                            "dotted_name" => {
                                let text = self.parsed.text(child);
                                self.declare_symbol(
                                    current,
                                    text,
                                    SymbolKind::Import,
                                    SourceSpan::of_node(&child),
                                );
                            }
                            "aliased_import" => {
                                if let Some(alias) = child.child_by_field_name("alias") {
                                    self.declare_pattern(alias, current, SymbolKind::Import);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            },
            SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => match kind {
                "lexical_declaration" => {
                    for declarator in named_children(node) {
                        if declarator.kind() == "variable_declarator" {
                            if let Some(name) = declarator.child_by_field_name("name") {
                                self.declare_pattern(name, current, SymbolKind::Variable);
                            }
                        }
                    }
                }
                // `var` declarators are placed by the hoisting pass.
                "variable_declaration" => {}
                "import_statement" => self.declare_import_clause(node, current),
                "interface_declaration" | "type_alias_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        let mut symbol = ScopeSymbol::new(
                            self.parsed.text(name),
                            SymbolKind::Type,
                            SourceSpan::of_node(&name),
                        );
                        symbol.is_type_only = true;
                        self.tree.declare(current, symbol);
                    }
                }
                "enum_declaration" => {
                    self.declare_name_field(node, current, SymbolKind::Class);
                }
                _ => {}
            },
            SupportedLanguage::Rust => match kind {
                "let_declaration" => {
                    if let Some(pattern) = node.child_by_field_name("pattern") {
                        self.declare_pattern(pattern, current, SymbolKind::Variable);
                    }
                }
                "use_declaration" => {
                    if let Some(argument) = node.child_by_field_name("argument") {
                        self.declare_use_tree(argument, current);
                    }
                }
                "struct_item" | "enum_item" | "union_item" => {
                    self.declare_name_field(node, current, SymbolKind::Class);
                }
                "type_item" => {
                    self.declare_name_field(node, current, SymbolKind::Type);
                }
                "const_item" | "static_item" => {
                    self.declare_name_field(node, current, SymbolKind::Variable);
                }
                "function_signature_item" => {
                    self.declare_name_field(node, current, SymbolKind::Function);
                }
                _ => {}
            },
        }
    }

    /// Bind the local names of a `use` tree: `use a::b` binds `b`,
    /// `use a::b as c` binds `c`, `use a::{b, c}` binds both.
    fn declare_use_tree(&mut self, node: Node, current: ScopeId) {
        match node.kind() {
            "identifier" => {
                self.declare_symbol(
                    current,
                    self.parsed.text(node),
                    SymbolKind::Import,
                    SourceSpan::of_node(&node),
                );
            }
            "scoped_identifier" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare_symbol(
                        current,
                        self.parsed.text(name),
                        SymbolKind::Import,
                        SourceSpan::of_node(&name),
                    );
                }
            }
            "use_as_clause" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    self.declare_symbol(
                        current,
                        self.parsed.text(alias),
                        SymbolKind::Import,
                        SourceSpan::of_node(&alias),
                    );
                }
            }
            "use_list" => {
                for child in named_children(node) {
                    self.declare_use_tree(child, current);
                }
            }
            "scoped_use_list" => {
                if let Some(list) = node.child_by_field_name("list") {
                    self.declare_use_tree(list, current);
                }
            }
            // `use a::*` binds nothing nameable.
            "use_wildcard" => {}
            _ => {}
        }
    }

    fn declare_import_clause(&mut self, import_statement: Node, current: ScopeId) {
        let is_type_only = import_statement
            .child(1)
            .map(|c| c.kind() == "type")
            .unwrap_or(false);
        for clause in named_children(import_statement) {
            if clause.kind() != "import_clause" {
                continue;
            }
            for item in named_children(clause) {
                match item.kind() {
                    "identifier" => {
                        self.declare_import_symbol(item, current, is_type_only);
                    }
                    "namespace_import" => {
                        for ns in named_children(item) {
                            if ns.kind() == "identifier" {
                                self.declare_import_symbol(ns, current, is_type_only);
                            }
                        }
                    }
                    "named_imports" => {
                        for specifier in named_children(item) {
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            let local = specifier
                                .child_by_field_name("alias")
                                .or_else(|| specifier.child_by_field_name("name"));
                            if let Some(local) = local {
                                self.declare_import_symbol(local, current, is_type_only);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn declare_import_symbol(&mut self, node: Node, current: ScopeId, is_type_only: bool) {
        let mut symbol = ScopeSymbol::new(
            self.parsed.text(node),
            SymbolKind::Import,
            SourceSpan::of_node(&node),
        );
        symbol.is_type_only = is_type_only;
        self.tree.declare(current, symbol);
    }

    fn declare_parameters(&mut self, node: Node, own: ScopeId) {
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"));
        let Some(params) = params else {
            return;
        };
        if params.kind() == "identifier" {
            // Single-identifier arrow function parameter.
            self.declare_symbol(
                own,
                self.parsed.text(params),
                SymbolKind::Parameter,
                SourceSpan::of_node(&params),
            );
            return;
        }
        for param in named_children(params) {
            match param.kind() {
                "identifier" => {
                    self.declare_symbol(
                        own,
                        self.parsed.text(param),
                        SymbolKind::Parameter,
                        SourceSpan::of_node(&param),
                    );
                }
                "self_parameter" => {
                    self.declare_symbol(
                        own,
                        "self",
                        SymbolKind::Parameter,
                        SourceSpan::of_node(&param),
                    );
                }
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = param.child_by_field_name("name") {
                        self.declare_pattern(name, own, SymbolKind::Parameter);
                    }
                }
                "typed_parameter"
                | "list_splat_pattern"
                | "dictionary_splat_pattern"
                | "rest_pattern" => {
                    self.declare_pattern(param, own, SymbolKind::Parameter);
                }
                "assignment_pattern" => {
                    if let Some(left) = param.child_by_field_name("left") {
                        self.declare_pattern(left, own, SymbolKind::Parameter);
                    }
                }
                "required_parameter" | "optional_parameter" => {
                    if let Some(pattern) = param.child_by_field_name("pattern") {
                        self.declare_pattern(pattern, own, SymbolKind::Parameter);
                    }
                }
                "parameter" => {
                    if let Some(pattern) = param.child_by_field_name("pattern") {
                        self.declare_pattern(pattern, own, SymbolKind::Parameter);
                    }
                }
                "object_pattern" | "array_pattern" | "tuple_pattern" => {
                    self.declare_pattern(param, own, SymbolKind::Parameter);
                }
                _ => {}
            }
        }
    }

    /// Declare every identifier inside a binding pattern.
    fn declare_pattern(&mut self, node: Node, scope: ScopeId, kind: SymbolKind) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" | "type_identifier" => {
                self.declare_symbol(
                    scope,
                    self.parsed.text(node),
                    kind,
                    SourceSpan::of_node(&node),
                );
            }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.declare_pattern(value, scope, kind);
                }
            }
            _ => {
                for child in named_children(node) {
                    self.declare_pattern(child, scope, kind);
                }
            }
        }
    }

    /// Python assignment targets: plain names bind, attribute/subscript
    /// writes do not create new symbols.
    fn declare_assignment_targets(&mut self, node: Node, scope: ScopeId) {
        match node.kind() {
            "identifier" => {
                self.declare_symbol(
                    scope,
                    self.parsed.text(node),
                    SymbolKind::Variable,
                    SourceSpan::of_node(&node),
                );
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                for child in named_children(node) {
                    self.declare_assignment_targets(child, scope);
                }
            }
            "attribute" | "subscript" => {}
            _ => {}
        }
    }

    fn declare_name_field(&mut self, node: Node, scope: ScopeId, kind: SymbolKind) {
        if let Some(name) = node.child_by_field_name("name") {
            self.declare_symbol(scope, self.parsed.text(name), kind, SourceSpan::of_node(&name));
        }
    }

    fn declare_symbol(&mut self, scope: ScopeId, name: &str, kind: SymbolKind, span: SourceSpan) {
        if name.is_empty() {
            return;
        }
        self.tree.declare(scope, ScopeSymbol::new(name, kind, span));
    }
}

/// JavaScript/TypeScript hoisting post-pass: scan each function/module
/// region for `function` declarations and `var` bindings and insert
/// them into the nearest hoist-target scope's table regardless of
/// lexical depth. `function` declarations hoist fully initialized;
/// `var` bindings hoist as undefined-until-bound.
fn apply_hoisting(tree: &mut ScopeTree, parsed: &ParsedFile) {
    let root = parsed.root();
    let mut hoists: Vec<(ScopeId, ScopeSymbol)> = Vec::new();
    collect_hoists(root, parsed, tree, &mut hoists);
    for (scope, symbol) in hoists {
        tree.declare(scope, symbol);
    }
}

fn collect_hoists(
    node: Node,
    parsed: &ParsedFile,
    tree: &ScopeTree,
    hoists: &mut Vec<(ScopeId, ScopeSymbol)>,
) {
    if node.is_error() || node.is_missing() {
        return;
    }
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                let target = hoist_target(tree, &node);
                let mut symbol = ScopeSymbol::new(
                    parsed.text(name),
                    SymbolKind::Function,
                    SourceSpan::of_node(&name),
                );
                symbol.hoisted = Hoisting::Initialized;
                hoists.push((target, symbol));
            }
        }
        "variable_declaration" => {
            let target = hoist_target(tree, &node);
            for declarator in named_children(node) {
                if declarator.kind() == "variable_declarator" {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        collect_var_pattern(name, parsed, target, hoists);
                    }
                }
            }
        }
        _ => {}
    }
    for child in named_children(node) {
        collect_hoists(child, parsed, tree, hoists);
    }
}

fn collect_var_pattern(
    node: Node,
    parsed: &ParsedFile,
    target: ScopeId,
    hoists: &mut Vec<(ScopeId, ScopeSymbol)>,
) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            let mut symbol = ScopeSymbol::new(
                parsed.text(node),
                SymbolKind::Variable,
                SourceSpan::of_node(&node),
            );
            symbol.hoisted = Hoisting::Uninitialized;
            hoists.push((target, symbol));
        }
        _ => {
            for child in named_children(node) {
                collect_var_pattern(child, parsed, target, hoists);
            }
        }
    }
}

/// Nearest enclosing function/method/module scope at a node's position.
fn hoist_target(tree: &ScopeTree, node: &Node) -> ScopeId {
    let start = node.start_position();
    let mut scope = tree.find_scope_at_position(start.row as u32, start.column as u32);
    // A function declaration's start position lands inside the scope
    // the declaration itself created; its name hoists one level out.
    let node_span = SourceSpan::of_node(node);
    let scope_node = tree.node(scope);
    if scope_node.span == node_span {
        if let Some(parent) = scope_node.parent {
            scope = parent;
        }
    }
    loop {
        let scope_node = tree.node(scope);
        if scope_node.kind.is_hoist_target() {
            return scope;
        }
        match scope_node.parent {
            Some(parent) => scope = parent,
            None => return scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser_core::GenericParser;

    fn parse(path: &str, source: &str) -> ParsedFile {
        GenericParser::new().parse_path(path, source).unwrap()
    }

    #[test]
    fn python_function_name_goes_to_enclosing_scope() {
        let parsed = parse("m.py", "def outer(a, b):\n    def inner():\n        pass\n");
        let tree = build_scope_tree(&parsed);

        let module = tree.root();
        assert!(tree.node(module).symbols.contains_key("outer"));
        assert!(!tree.node(module).symbols.contains_key("inner"));

        // Parameters live in the function's own scope.
        let outer_scope = tree
            .iter()
            .find(|s| s.name.as_deref() == Some("outer"))
            .unwrap();
        assert!(outer_scope.symbols.contains_key("a"));
        assert!(outer_scope.symbols.contains_key("b"));
        assert!(outer_scope.symbols.contains_key("inner"));
    }

    #[test]
    fn python_shadowing_resolves_to_nearest_declaration() {
        let source = "x = 1\ndef f(x):\n    y = x\n";
        let parsed = parse("m.py", source);
        let tree = build_scope_tree(&parsed);

        // At the assignment on line 2, x is the parameter.
        let scope = tree.find_scope_at_position(2, 8);
        let (found_in, symbol) = tree.resolve("x", scope).unwrap();
        assert!(symbol.is_parameter);
        assert_eq!(tree.node(found_in).name.as_deref(), Some("f"));

        // At module level it is the module variable.
        let (found_in, symbol) = tree.resolve("x", tree.root()).unwrap();
        assert_eq!(found_in, tree.root());
        assert!(!symbol.is_parameter);
    }

    #[test]
    fn python_comprehension_variable_stays_local() {
        let parsed = parse("m.py", "squares = [i * i for i in range(10)]\n");
        let tree = build_scope_tree(&parsed);

        assert!(!tree.node(tree.root()).symbols.contains_key("i"));
        let comp = tree
            .iter()
            .find(|s| s.kind == ScopeKind::Comprehension)
            .unwrap();
        assert!(comp.symbols.contains_key("i"));
        assert!(tree.node(tree.root()).symbols.contains_key("squares"));
    }

    #[test]
    fn python_imports_bind_local_names() {
        let source = "import os.path\nfrom utils import process_data as pd\n";
        let parsed = parse("m.py", source);
        let tree = build_scope_tree(&parsed);
        let module = tree.node(tree.root());
        assert!(module.symbols.contains_key("os"));
        assert!(module.symbols.contains_key("pd"));
        assert!(!module.symbols.contains_key("process_data"));
    }

    #[test]
    fn js_var_hoists_to_function_scope() {
        let source = "function f() {\n  if (true) {\n    var hoisted = 1;\n    let scoped = 2;\n  }\n}\n";
        let parsed = parse("m.js", source);
        let tree = build_scope_tree(&parsed);

        let f = tree
            .iter()
            .find(|s| s.name.as_deref() == Some("f") && s.kind == ScopeKind::Function)
            .unwrap();
        let hoisted = f.symbols.get("hoisted").expect("var must hoist");
        assert_eq!(hoisted.hoisted, Hoisting::Uninitialized);
        assert!(!f.symbols.contains_key("scoped"));

        // The let-binding stays in its block.
        let block = tree
            .iter()
            .find(|s| s.kind == ScopeKind::Block && s.symbols.contains_key("scoped"))
            .unwrap();
        assert_eq!(block.symbols["scoped"].hoisted, Hoisting::None);
    }

    #[test]
    fn js_hoisted_var_resolves_identically_before_and_after_binding() {
        let source = "function f() {\n  use(v);\n  var v = 3;\n  use(v);\n}\n";
        let parsed = parse("m.js", source);
        let tree = build_scope_tree(&parsed);

        let before = tree.find_scope_at_position(1, 6);
        let after = tree.find_scope_at_position(3, 6);
        let (scope_a, symbol_a) = tree.resolve("v", before).unwrap();
        let (scope_b, symbol_b) = tree.resolve("v", after).unwrap();
        assert_eq!(scope_a, scope_b);
        assert_eq!(symbol_a.span, symbol_b.span);
        assert_eq!(symbol_a.hoisted, Hoisting::Uninitialized);
    }

    #[test]
    fn js_function_declarations_hoist_initialized() {
        let source = "helper();\nfunction helper() {}\n";
        let parsed = parse("m.js", source);
        let tree = build_scope_tree(&parsed);

        let symbol = tree.node(tree.root()).symbols.get("helper").unwrap();
        assert_eq!(symbol.hoisted, Hoisting::Initialized);
    }

    #[test]
    fn ts_interface_is_type_only() {
        let source = "interface Swimmable { swim(): void; }\nclass Duck {}\n";
        let parsed = parse("m.ts", source);
        let tree = build_scope_tree(&parsed);
        let module = tree.node(tree.root());
        assert!(module.symbols["Swimmable"].is_type_only);
        assert!(!module.symbols["Duck"].is_type_only);
    }

    #[test]
    fn rust_items_and_lets_are_declared() {
        let source = "use std::collections::HashMap;\n\nstruct Point { x: i32 }\n\nfn main() {\n    let total = 0;\n    let map = HashMap::new();\n}\n";
        let parsed = parse("main.rs", source);
        let tree = build_scope_tree(&parsed);

        let module = tree.node(tree.root());
        assert!(module.symbols.contains_key("HashMap"));
        assert!(module.symbols.contains_key("Point"));
        assert!(module.symbols.contains_key("main"));

        let block = tree
            .iter()
            .find(|s| s.kind == ScopeKind::Block && s.symbols.contains_key("total"))
            .unwrap();
        assert!(block.symbols.contains_key("map"));
    }

    #[test]
    fn error_nodes_are_skipped_not_fatal() {
        let parsed = parse("bad.py", "def good():\n    pass\n\ndef (:\n");
        let tree = build_scope_tree(&parsed);
        assert!(tree.node(tree.root()).symbols.contains_key("good"));
    }
}
