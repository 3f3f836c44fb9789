//! Extraction of raw definition, import, export, and usage records from
//! a parsed file.
//!
//! This is the upstream producer feeding the structural builders: flat
//! `Definition`s for the resolution engine, `ClassRecord`s (with member
//! lists) for the hierarchy builder, `ImplRecord`s for Rust trait
//! attachment, and import/export/usage records for the cross-file
//! index. The walk is generic; per-language decisions are an exhaustive
//! match over the closed language set.

use crate::types::{
    ClassLikeKind, ClassRecord, Definition, DefinitionKind, Export, ExportKind, FileIndex, Import,
    ImportBinding, ImportKind, ImplRecord, MethodInfo, Usage, UsageKind, Visibility,
};
use parser_core::{named_children, ParsedFile, SourceSpan, SupportedLanguage};
use tree_sitter::Node;

/// Extract everything the aggregate builders need from one file.
pub fn extract_file(parsed: &ParsedFile) -> FileIndex {
    let mut index = FileIndex::empty(parsed.file_path.clone(), parsed.language);
    let mut extractor = Extractor {
        parsed,
        index: &mut index,
    };
    extractor.walk(parsed.root(), &WalkContext::default());
    log::debug!(
        "extracted {} definitions, {} classes, {} imports from '{}'",
        index.definitions.len(),
        index.classes.len(),
        index.imports.len(),
        index.file_path
    );
    index
}

/// Ambient facts about the position of the walk.
#[derive(Debug, Default, Clone)]
struct WalkContext {
    /// Inside a class body: functions are methods.
    in_class: bool,
    /// Decorator names collected from an enclosing decorated node.
    decorators: Vec<String>,
}

struct Extractor<'a> {
    parsed: &'a ParsedFile,
    index: &'a mut FileIndex,
}

impl<'a> Extractor<'a> {
    fn walk(&mut self, node: Node, ctx: &WalkContext) {
        if node.is_error() || node.is_missing() {
            return;
        }
        match self.parsed.language {
            SupportedLanguage::Python => self.walk_python(node, ctx),
            SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => {
                self.walk_js_ts(node, ctx)
            }
            SupportedLanguage::Rust => self.walk_rust(node, ctx),
        }
    }

    fn walk_children(&mut self, node: Node, ctx: &WalkContext) {
        for child in named_children(node) {
            self.walk(child, ctx);
        }
    }

    fn text(&self, node: Node) -> &str {
        self.parsed.text(node)
    }

    fn file_path(&self) -> String {
        self.index.file_path.clone()
    }

    // ---- Python ----------------------------------------------------

    fn walk_python(&mut self, node: Node, ctx: &WalkContext) {
        match node.kind() {
            "decorated_definition" => {
                let mut decorated = ctx.clone();
                for child in named_children(node) {
                    if child.kind() == "decorator" {
                        decorated.decorators.push(decorator_name(self.text(child)));
                    }
                }
                if let Some(definition) = node.child_by_field_name("definition") {
                    self.walk(definition, &decorated);
                }
            }
            "function_definition" => {
                self.extract_python_function(node, ctx);
                let inner = WalkContext {
                    in_class: false,
                    decorators: Vec::new(),
                };
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(body, &inner);
                }
            }
            "class_definition" => {
                self.extract_python_class(node, ctx);
                let inner = WalkContext {
                    in_class: true,
                    decorators: Vec::new(),
                };
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(body, &inner);
                }
            }
            "import_statement" => self.extract_python_import(node),
            "import_from_statement" => self.extract_python_from_import(node),
            "assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.extract_assignment_definitions(left, ctx);
                }
                self.walk_children(node, ctx);
            }
            "call" => {
                if let Some(function) = node.child_by_field_name("function") {
                    self.index.usages.push(Usage {
                        name: self.text(function).to_string(),
                        span: SourceSpan::of_node(&function),
                        kind: UsageKind::Call,
                    });
                }
                self.walk_children(node, ctx);
            }
            _ => self.walk_children(node, ctx),
        }
    }

    fn extract_python_function(&mut self, node: Node, ctx: &WalkContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let kind = if ctx.in_class {
            DefinitionKind::Method
        } else {
            DefinitionKind::Function
        };
        let mut definition = Definition::new(
            name.clone(),
            kind,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        );
        definition.is_async = has_child_token(node, "async");
        definition.is_generator = subtree_contains_yield(node);
        definition.is_static = ctx.decorators.iter().any(|d| d == "staticmethod");
        definition.is_abstract = ctx
            .decorators
            .iter()
            .any(|d| d == "abstractmethod" || d.ends_with(".abstractmethod"));
        definition.param_count = Some(count_python_params(node));
        definition.visibility = if name.starts_with('_') && !name.starts_with("__") {
            Visibility::Private
        } else {
            Visibility::Public
        };
        self.index.definitions.push(definition);
    }

    fn extract_python_class(&mut self, node: Node, ctx: &WalkContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for statement in named_children(body) {
                match statement.kind() {
                    "function_definition" => {
                        methods.push(self.python_method_info(statement, &[]));
                    }
                    "decorated_definition" => {
                        let decorators: Vec<String> = named_children(statement)
                            .into_iter()
                            .filter(|c| c.kind() == "decorator")
                            .map(|c| decorator_name(self.text(c)))
                            .collect();
                        if let Some(def) = statement.child_by_field_name("definition") {
                            if def.kind() == "function_definition" {
                                methods.push(self.python_method_info(def, &decorators));
                            }
                        }
                    }
                    "expression_statement" => {
                        for expr in named_children(statement) {
                            if expr.kind() == "assignment" {
                                if let Some(left) = expr.child_by_field_name("left") {
                                    if left.kind() == "identifier" {
                                        properties.push(self.text(left).to_string());
                                    }
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let is_abstract = methods.iter().any(|m: &MethodInfo| m.is_abstract);
        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind: ClassLikeKind::Class,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods,
            properties,
            decorators: ctx.decorators.clone(),
            is_abstract,
        });
        self.index.definitions.push(Definition::new(
            name,
            DefinitionKind::Class,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        ));
    }

    fn python_method_info(&self, node: Node, decorators: &[String]) -> MethodInfo {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        MethodInfo {
            name,
            span: SourceSpan::of_node(&node),
            param_count: count_python_params(node),
            is_static: decorators.iter().any(|d| d == "staticmethod"),
            is_abstract: decorators
                .iter()
                .any(|d| d == "abstractmethod" || d.ends_with(".abstractmethod")),
            is_async: has_child_token(node, "async"),
            decorators: decorators.to_vec(),
        }
    }

    fn extract_python_import(&mut self, node: Node) {
        for child in named_children(node) {
            match child.kind() {
                "dotted_name" => {
                    let module_path = self.text(child).to_string();
                    self.index.imports.push(Import {
                        kind: ImportKind::Namespace,
                        module_path: module_path.clone(),
                        bindings: vec![ImportBinding::plain(module_path)],
                        span: SourceSpan::of_node(&node),
                        is_type_only: false,
                    });
                }
                "aliased_import" => {
                    let module_path = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    let alias = child
                        .child_by_field_name("alias")
                        .map(|n| self.text(n).to_string());
                    self.index.imports.push(Import {
                        kind: ImportKind::Namespace,
                        module_path: module_path.clone(),
                        bindings: vec![ImportBinding {
                            name: module_path,
                            alias,
                        }],
                        span: SourceSpan::of_node(&node),
                        is_type_only: false,
                    });
                }
                _ => {}
            }
        }
    }

    fn extract_python_from_import(&mut self, node: Node) {
        let module_path = node
            .child_by_field_name("module_name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let module_name_node = node.child_by_field_name("module_name");
        let mut bindings = Vec::new();
        let mut saw_wildcard = false;
        for child in named_children(node) {
            if Some(child) == module_name_node {
                continue;
            }
            match child.kind() {
                "dotted_name" => bindings.push(ImportBinding::plain(self.text(child))),
                "aliased_import" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    let alias = child
                        .child_by_field_name("alias")
                        .map(|n| self.text(n).to_string());
                    bindings.push(ImportBinding { name, alias });
                }
                "wildcard_import" => saw_wildcard = true,
                _ => {}
            }
        }
        if saw_wildcard {
            bindings.push(ImportBinding::plain("*"));
        }
        self.index.imports.push(Import {
            kind: ImportKind::Named,
            module_path,
            bindings,
            span: SourceSpan::of_node(&node),
            is_type_only: false,
        });
    }

    fn extract_assignment_definitions(&mut self, left: Node, ctx: &WalkContext) {
        if ctx.in_class {
            return;
        }
        match left.kind() {
            "identifier" => {
                self.index.definitions.push(Definition::new(
                    self.text(left),
                    DefinitionKind::Variable,
                    self.file_path(),
                    SourceSpan::of_node(&left),
                    SourceSpan::of_node(&left),
                ));
                self.index.usages.push(Usage {
                    name: self.text(left).to_string(),
                    span: SourceSpan::of_node(&left),
                    kind: UsageKind::Write,
                });
            }
            "pattern_list" | "tuple_pattern" => {
                for child in named_children(left) {
                    self.extract_assignment_definitions(child, ctx);
                }
            }
            _ => {}
        }
    }

    // ---- JavaScript / TypeScript -----------------------------------

    fn walk_js_ts(&mut self, node: Node, ctx: &WalkContext) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.extract_js_function(node, ctx);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(body, &WalkContext::default());
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.extract_js_class(node, ctx, ClassLikeKind::Class);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(
                        body,
                        &WalkContext {
                            in_class: true,
                            decorators: Vec::new(),
                        },
                    );
                }
            }
            "interface_declaration" => {
                self.extract_ts_interface(node);
            }
            "enum_declaration" => {
                self.extract_named_class_record(node, ClassLikeKind::Enum, ctx);
            }
            "type_alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.index.definitions.push(Definition::new(
                        self.text(name),
                        DefinitionKind::TypeAlias,
                        self.file_path(),
                        SourceSpan::of_node(&node),
                        SourceSpan::of_node(&name),
                    ));
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                self.extract_js_variables(node);
                self.walk_children(node, ctx);
            }
            "import_statement" => self.extract_js_import(node),
            "export_statement" => self.extract_js_export(node, ctx),
            "call_expression" => {
                if let Some(function) = node.child_by_field_name("function") {
                    self.index.usages.push(Usage {
                        name: self.text(function).to_string(),
                        span: SourceSpan::of_node(&function),
                        kind: UsageKind::Call,
                    });
                }
                self.walk_children(node, ctx);
            }
            _ => self.walk_children(node, ctx),
        }
    }

    fn extract_js_function(&mut self, node: Node, _ctx: &WalkContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let mut definition = Definition::new(
            self.text(name_node),
            DefinitionKind::Function,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        );
        definition.is_async = has_child_token(node, "async");
        definition.is_generator = node.kind().contains("generator");
        definition.param_count = Some(count_js_params(node));
        self.index.definitions.push(definition);
    }

    fn extract_js_class(&mut self, node: Node, ctx: &WalkContext, kind: ClassLikeKind) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let is_abstract =
            node.kind() == "abstract_class_declaration" || has_child_token(node, "abstract");

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                match member.kind() {
                    "method_definition" => {
                        methods.push(self.js_method_info(member, false));
                    }
                    "abstract_method_signature" | "method_signature" => {
                        methods.push(self.js_method_info(
                            member,
                            member.kind() == "abstract_method_signature",
                        ));
                    }
                    "public_field_definition" | "field_definition" | "property_signature" => {
                        if let Some(prop_name) = member.child_by_field_name("name") {
                            properties.push(self.text(prop_name).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods,
            properties,
            decorators: ctx.decorators.clone(),
            is_abstract,
        });
        self.index.definitions.push(Definition::new(
            name,
            DefinitionKind::Class,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        ));
    }

    fn js_method_info(&self, node: Node, is_abstract: bool) -> MethodInfo {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let decorators: Vec<String> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .map(|c| decorator_name(self.text(c)))
            .collect();
        MethodInfo {
            name,
            span: SourceSpan::of_node(&node),
            param_count: count_js_params(node),
            is_static: has_child_token(node, "static"),
            is_abstract: is_abstract || has_child_token(node, "abstract"),
            is_async: has_child_token(node, "async"),
            decorators,
        }
    }

    fn extract_ts_interface(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                match member.kind() {
                    "method_signature" => methods.push(self.js_method_info(member, true)),
                    "property_signature" => {
                        if let Some(prop_name) = member.child_by_field_name("name") {
                            properties.push(self.text(prop_name).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind: ClassLikeKind::Interface,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods,
            properties,
            decorators: Vec::new(),
            is_abstract: false,
        });
        self.index.definitions.push(Definition::new(
            name,
            DefinitionKind::Interface,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        ));
    }

    fn extract_named_class_record(&mut self, node: Node, kind: ClassLikeKind, ctx: &WalkContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods: Vec::new(),
            properties: Vec::new(),
            decorators: ctx.decorators.clone(),
            is_abstract: false,
        });
        self.index.definitions.push(Definition::new(
            name,
            DefinitionKind::Enum,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        ));
    }

    fn extract_js_variables(&mut self, node: Node) {
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            if let Some(name) = declarator.child_by_field_name("name") {
                if name.kind() == "identifier" {
                    self.index.definitions.push(Definition::new(
                        self.text(name),
                        DefinitionKind::Variable,
                        self.file_path(),
                        SourceSpan::of_node(&declarator),
                        SourceSpan::of_node(&name),
                    ));
                }
            }
        }
    }

    fn extract_js_import(&mut self, node: Node) {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let module_path = strip_quotes(self.text(source));
        let is_type_only = node.child(1).map(|c| c.kind() == "type").unwrap_or(false);
        let span = SourceSpan::of_node(&node);

        let mut emitted = false;
        for clause in named_children(node) {
            if clause.kind() != "import_clause" {
                continue;
            }
            for item in named_children(clause) {
                match item.kind() {
                    "identifier" => {
                        self.index.imports.push(Import {
                            kind: ImportKind::Default,
                            module_path: module_path.clone(),
                            bindings: vec![ImportBinding::plain(self.text(item))],
                            span,
                            is_type_only,
                        });
                        emitted = true;
                    }
                    "namespace_import" => {
                        let local = named_children(item)
                            .into_iter()
                            .find(|c| c.kind() == "identifier")
                            .map(|c| self.text(c).to_string())
                            .unwrap_or_default();
                        self.index.imports.push(Import {
                            kind: ImportKind::Namespace,
                            module_path: module_path.clone(),
                            bindings: vec![ImportBinding::plain(local)],
                            span,
                            is_type_only,
                        });
                        emitted = true;
                    }
                    "named_imports" => {
                        let mut bindings = Vec::new();
                        for specifier in named_children(item) {
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            let name = specifier
                                .child_by_field_name("name")
                                .map(|n| self.text(n).to_string())
                                .unwrap_or_default();
                            let alias = specifier
                                .child_by_field_name("alias")
                                .map(|n| self.text(n).to_string());
                            bindings.push(ImportBinding { name, alias });
                        }
                        self.index.imports.push(Import {
                            kind: ImportKind::Named,
                            module_path: module_path.clone(),
                            bindings,
                            span,
                            is_type_only,
                        });
                        emitted = true;
                    }
                    _ => {}
                }
            }
        }
        if !emitted {
            self.index.imports.push(Import {
                kind: ImportKind::SideEffect,
                module_path,
                bindings: Vec::new(),
                span,
                is_type_only: false,
            });
        }
    }

    fn extract_js_export(&mut self, node: Node, ctx: &WalkContext) {
        let span = SourceSpan::of_node(&node);
        let source = node
            .child_by_field_name("source")
            .map(|n| strip_quotes(self.text(n)));
        let is_default = has_child_token(node, "default");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            // The declaration itself is extracted by the normal walk.
            self.walk(declaration, ctx);
            let names = declared_names(declaration, self.parsed);
            let kind = if is_default {
                ExportKind::Default
            } else {
                ExportKind::Named
            };
            self.index.exports.push(Export {
                kind,
                names: names.into_iter().map(ImportBinding::plain).collect(),
                source: None,
                span,
            });
            return;
        }

        // `export * from "m"` and `export * as ns from "m"`.
        if has_child_token(node, "*") {
            self.index.exports.push(Export {
                kind: ExportKind::Wildcard,
                names: Vec::new(),
                source,
                span,
            });
            return;
        }
        if let Some(ns) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "namespace_export")
        {
            let alias = named_children(ns)
                .into_iter()
                .find(|c| c.kind() == "identifier")
                .map(|c| self.text(c).to_string());
            self.index.exports.push(Export {
                kind: ExportKind::Reexport,
                names: vec![ImportBinding {
                    name: "*".to_string(),
                    alias,
                }],
                source,
                span,
            });
            return;
        }

        let mut names = Vec::new();
        for clause in named_children(node) {
            if clause.kind() != "export_clause" {
                continue;
            }
            for specifier in named_children(clause) {
                if specifier.kind() != "export_specifier" {
                    continue;
                }
                let name = specifier
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let alias = specifier
                    .child_by_field_name("alias")
                    .map(|n| self.text(n).to_string());
                names.push(ImportBinding { name, alias });
            }
        }
        if !names.is_empty() || source.is_some() {
            let kind = if source.is_some() {
                ExportKind::Reexport
            } else if is_default {
                ExportKind::Default
            } else {
                ExportKind::Named
            };
            self.index.exports.push(Export {
                kind,
                names,
                source,
                span,
            });
        } else if is_default {
            // `export default <expression>`.
            self.index.exports.push(Export {
                kind: ExportKind::Default,
                names: vec![ImportBinding::plain("default")],
                source: None,
                span,
            });
            self.walk_children(node, ctx);
        }
    }

    // ---- Rust ------------------------------------------------------

    fn walk_rust(&mut self, node: Node, ctx: &WalkContext) {
        match node.kind() {
            "function_item" => {
                self.extract_rust_function(node, ctx);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(body, &WalkContext::default());
                }
            }
            "struct_item" | "enum_item" | "union_item" => {
                self.extract_rust_type(node);
            }
            "trait_item" => {
                self.extract_rust_trait(node);
            }
            "impl_item" => {
                self.extract_rust_impl(node);
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk_children(
                        body,
                        &WalkContext {
                            in_class: true,
                            decorators: Vec::new(),
                        },
                    );
                }
            }
            "mod_item" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.index.definitions.push(Definition::new(
                        self.text(name),
                        DefinitionKind::Module,
                        self.file_path(),
                        SourceSpan::of_node(&node),
                        SourceSpan::of_node(&name),
                    ));
                }
                self.walk_children(node, ctx);
            }
            "use_declaration" => self.extract_rust_use(node),
            "const_item" | "static_item" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let mut definition = Definition::new(
                        self.text(name),
                        DefinitionKind::Variable,
                        self.file_path(),
                        SourceSpan::of_node(&node),
                        SourceSpan::of_node(&name),
                    );
                    definition.visibility = rust_visibility(node);
                    self.index.definitions.push(definition);
                }
            }
            "call_expression" => {
                if let Some(function) = node.child_by_field_name("function") {
                    self.index.usages.push(Usage {
                        name: self.text(function).to_string(),
                        span: SourceSpan::of_node(&function),
                        kind: UsageKind::Call,
                    });
                }
                self.walk_children(node, ctx);
            }
            _ => self.walk_children(node, ctx),
        }
    }

    fn extract_rust_function(&mut self, node: Node, ctx: &WalkContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let kind = if ctx.in_class {
            DefinitionKind::Method
        } else {
            DefinitionKind::Function
        };
        let mut definition = Definition::new(
            self.text(name_node),
            kind,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        );
        definition.is_async = has_child_token(node, "async");
        definition.param_count = Some(count_rust_params(node));
        definition.visibility = rust_visibility(node);
        self.index.definitions.push(definition);
    }

    fn extract_rust_type(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        let kind = match node.kind() {
            "enum_item" => ClassLikeKind::Enum,
            _ => ClassLikeKind::Struct,
        };

        let mut properties = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for field in named_children(body) {
                if field.kind() == "field_declaration" {
                    if let Some(field_name) = field.child_by_field_name("name") {
                        properties.push(self.text(field_name).to_string());
                    }
                } else if field.kind() == "enum_variant" {
                    if let Some(variant_name) = field.child_by_field_name("name") {
                        properties.push(self.text(variant_name).to_string());
                    }
                }
            }
        }

        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods: Vec::new(),
            properties,
            decorators: rust_outer_attributes(node, self.parsed),
            is_abstract: false,
        });
        let def_kind = match kind {
            ClassLikeKind::Enum => DefinitionKind::Enum,
            _ => DefinitionKind::Struct,
        };
        let mut definition = Definition::new(
            name,
            def_kind,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        );
        definition.visibility = rust_visibility(node);
        self.index.definitions.push(definition);
    }

    fn extract_rust_trait(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                match member.kind() {
                    // Required method: no body, an obligation on
                    // implementors.
                    "function_signature_item" => {
                        methods.push(self.rust_method_info(member, true));
                    }
                    // Default method: has a body.
                    "function_item" => {
                        methods.push(self.rust_method_info(member, false));
                    }
                    _ => {}
                }
            }
        }

        let mut decorators = rust_outer_attributes(node, self.parsed);
        if has_child_token(node, "unsafe") {
            decorators.push("unsafe".to_string());
        }
        if has_child_token(node, "auto") {
            decorators.push("auto".to_string());
        }

        let has_required = methods.iter().any(|m| m.is_abstract);
        self.index.classes.push(ClassRecord {
            name: name.clone(),
            kind: ClassLikeKind::Trait,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            name_span: SourceSpan::of_node(&name_node),
            methods,
            properties: Vec::new(),
            decorators,
            is_abstract: has_required,
        });
        let mut definition = Definition::new(
            name,
            DefinitionKind::Trait,
            self.file_path(),
            SourceSpan::of_node(&node),
            SourceSpan::of_node(&name_node),
        );
        definition.visibility = rust_visibility(node);
        self.index.definitions.push(definition);
    }

    fn rust_method_info(&self, node: Node, is_abstract: bool) -> MethodInfo {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        MethodInfo {
            name,
            span: SourceSpan::of_node(&node),
            param_count: count_rust_params(node),
            is_static: !has_self_parameter(node),
            is_abstract,
            is_async: has_child_token(node, "async"),
            decorators: Vec::new(),
        }
    }

    fn extract_rust_impl(&mut self, node: Node) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let type_name = unwrap_generic(self.text(type_node)).to_string();
        let trait_name = node
            .child_by_field_name("trait")
            .map(|n| unwrap_generic(self.text(n)).to_string());

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            for member in named_children(body) {
                if member.kind() == "function_item" {
                    methods.push(self.rust_method_info(member, false));
                }
            }
        }

        self.index.impls.push(ImplRecord {
            type_name,
            trait_name,
            file_path: self.file_path(),
            span: SourceSpan::of_node(&node),
            methods,
            is_unsafe: has_child_token(node, "unsafe"),
        });
    }

    fn extract_rust_use(&mut self, node: Node) {
        let Some(argument) = node.child_by_field_name("argument") else {
            return;
        };
        let span = SourceSpan::of_node(&node);
        let mut imports = Vec::new();
        collect_rust_use(argument, self.parsed, String::new(), &mut imports);
        for (module_path, binding, is_wildcard) in imports {
            self.index.imports.push(Import {
                kind: if is_wildcard {
                    ImportKind::Namespace
                } else {
                    ImportKind::Named
                },
                module_path,
                bindings: binding.into_iter().collect(),
                span,
                is_type_only: false,
            });
        }
    }
}

// ---- helpers -------------------------------------------------------

/// `@decorator`, `@mod.decorator`, `@decorator(args)` -> bare name.
fn decorator_name(text: &str) -> String {
    let trimmed = text.trim_start_matches('@').trim();
    let without_args = trimmed.split('(').next().unwrap_or(trimmed);
    without_args.trim().to_string()
}

fn strip_quotes(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// `Foo<T>` -> `Foo`, `Vec<u8>` -> `Vec`.
fn unwrap_generic(text: &str) -> &str {
    text.split('<').next().unwrap_or(text).trim()
}

/// Whether a node has an anonymous child token of the given kind
/// (keywords like `async`, `static`, `abstract` are anonymous).
fn has_child_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|c| c.kind() == token);
    result
}

fn has_self_parameter(node: Node) -> bool {
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .any(|p| p.kind() == "self_parameter")
        })
        .unwrap_or(false)
}

fn count_python_params(node: Node) -> usize {
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter(|p| {
                    matches!(
                        p.kind(),
                        "identifier"
                            | "typed_parameter"
                            | "default_parameter"
                            | "typed_default_parameter"
                            | "list_splat_pattern"
                            | "dictionary_splat_pattern"
                    )
                })
                .count()
        })
        .unwrap_or(0)
}

fn count_js_params(node: Node) -> usize {
    node.child_by_field_name("parameters")
        .map(|params| named_children(params).len())
        .unwrap_or(0)
}

fn count_rust_params(node: Node) -> usize {
    node.child_by_field_name("parameters")
        .map(|params| {
            named_children(params)
                .into_iter()
                .filter(|p| matches!(p.kind(), "parameter" | "self_parameter"))
                .count()
        })
        .unwrap_or(0)
}

/// Generator detection: a `yield` anywhere in the body that is not
/// inside a nested function.
fn subtree_contains_yield(node: Node) -> bool {
    let Some(body) = node.child_by_field_name("body") else {
        return false;
    };
    contains_yield(body)
}

fn contains_yield(node: Node) -> bool {
    if node.kind() == "yield" {
        return true;
    }
    if matches!(node.kind(), "function_definition" | "lambda") {
        return false;
    }
    named_children(node).into_iter().any(contains_yield)
}

/// Names declared by a JS/TS declaration node, for export records.
fn declared_names(node: Node, parsed: &ParsedFile) -> Vec<String> {
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "type_alias_declaration" => node
            .child_by_field_name("name")
            .map(|n| vec![parsed.text(n).to_string()])
            .unwrap_or_default(),
        "lexical_declaration" | "variable_declaration" => named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .filter_map(|c| c.child_by_field_name("name"))
            .map(|n| parsed.text(n).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Outer attributes of a Rust item, with derive lists expanded:
/// `#[derive(Debug, Clone)]` contributes "derive", "Debug", "Clone".
fn rust_outer_attributes(node: Node, parsed: &ParsedFile) -> Vec<String> {
    let mut attributes = Vec::new();
    let mut sibling = node.prev_sibling();
    while let Some(current) = sibling {
        if current.kind() != "attribute_item" {
            break;
        }
        for attribute in named_children(current) {
            if attribute.kind() != "attribute" {
                continue;
            }
            let text = parsed.text(attribute);
            let name = text.split('(').next().unwrap_or(text).trim();
            attributes.push(name.to_string());
            if name == "derive" {
                if let Some(open) = text.find('(') {
                    let inner = text[open + 1..].trim_end_matches(')');
                    for derived in inner.split(',') {
                        let derived = derived.trim();
                        if !derived.is_empty() {
                            attributes.push(derived.to_string());
                        }
                    }
                }
            }
        }
        sibling = current.prev_sibling();
    }
    attributes
}

fn rust_visibility(node: Node) -> Visibility {
    for child in named_children(node) {
        if child.kind() == "visibility_modifier" {
            return Visibility::Public;
        }
    }
    Visibility::Private
}

/// Flatten a `use` tree into (module_path, binding, is_wildcard)
/// tuples. `use a::b::C` -> ("a::b", C); `use a::{B, C}` -> two rows.
fn collect_rust_use(
    node: Node,
    parsed: &ParsedFile,
    prefix: String,
    out: &mut Vec<(String, Option<ImportBinding>, bool)>,
) {
    let join = |prefix: &str, segment: &str| -> String {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}::{segment}")
        }
    };
    match node.kind() {
        "identifier" => {
            out.push((
                prefix,
                Some(ImportBinding::plain(parsed.text(node))),
                false,
            ));
        }
        "scoped_identifier" => {
            let path = node
                .child_by_field_name("path")
                .map(|p| parsed.text(p).to_string())
                .unwrap_or_default();
            let full_prefix = join(&prefix, &path);
            if let Some(name) = node.child_by_field_name("name") {
                out.push((
                    full_prefix,
                    Some(ImportBinding::plain(parsed.text(name))),
                    false,
                ));
            }
        }
        "use_as_clause" => {
            let mut inner = Vec::new();
            for child in named_children(node) {
                if Some(child) != node.child_by_field_name("alias") {
                    collect_rust_use(child, parsed, prefix.clone(), &mut inner);
                }
            }
            let alias = node
                .child_by_field_name("alias")
                .map(|a| parsed.text(a).to_string());
            for (path, binding, wildcard) in inner {
                let binding = binding.map(|b| ImportBinding {
                    name: b.name,
                    alias: alias.clone(),
                });
                out.push((path, binding, wildcard));
            }
        }
        "use_list" => {
            for child in named_children(node) {
                collect_rust_use(child, parsed, prefix.clone(), out);
            }
        }
        "scoped_use_list" => {
            let path = node
                .child_by_field_name("path")
                .map(|p| parsed.text(p).to_string())
                .unwrap_or_default();
            let full_prefix = join(&prefix, &path);
            if let Some(list) = node.child_by_field_name("list") {
                collect_rust_use(list, parsed, full_prefix, out);
            }
        }
        "use_wildcard" => {
            let path = named_children(node)
                .into_iter()
                .next()
                .map(|p| parsed.text(p).to_string())
                .unwrap_or_default();
            out.push((join(&prefix, &path), None, true));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser_core::GenericParser;

    fn extract(path: &str, source: &str) -> FileIndex {
        let parsed = GenericParser::new().parse_path(path, source).unwrap();
        extract_file(&parsed)
    }

    #[test]
    fn python_definitions_and_methods() {
        let source = "\
class Animal:
    sound = 'generic'

    def speak(self):
        pass

    @staticmethod
    def kingdom():
        return 'Animalia'

async def fetch(url):
    pass
";
        let index = extract("zoo.py", source);

        let animal = index.classes.iter().find(|c| c.name == "Animal").unwrap();
        assert_eq!(animal.methods.len(), 2);
        assert_eq!(animal.properties, vec!["sound".to_string()]);
        let kingdom = animal.methods.iter().find(|m| m.name == "kingdom").unwrap();
        assert!(kingdom.is_static);

        let fetch = index
            .definitions
            .iter()
            .find(|d| d.name == "fetch")
            .unwrap();
        assert!(fetch.is_async);
        assert_eq!(fetch.param_count, Some(1));
        assert_eq!(fetch.kind, DefinitionKind::Function);
    }

    #[test]
    fn python_imports_with_aliases() {
        let index = extract(
            "m.py",
            "import numpy as np\nfrom utils import process_data, helper as h\n",
        );
        assert_eq!(index.imports.len(), 2);

        let numpy = &index.imports[0];
        assert_eq!(numpy.kind, ImportKind::Namespace);
        assert_eq!(numpy.module_path, "numpy");
        assert_eq!(numpy.bindings[0].local_name(), "np");

        let utils = &index.imports[1];
        assert_eq!(utils.kind, ImportKind::Named);
        assert_eq!(utils.module_path, "utils");
        assert_eq!(utils.bindings.len(), 2);
        assert_eq!(utils.bindings[1].local_name(), "h");
    }

    #[test]
    fn js_exports_and_reexports() {
        let source = "\
export function helper() {}
export { widget as gadget } from './widgets';
export * from './barrel';
export default class App {}
";
        let index = extract("m.js", source);

        let named = index
            .exports
            .iter()
            .find(|e| e.kind == ExportKind::Named)
            .unwrap();
        assert_eq!(named.names[0].name, "helper");

        let reexport = index
            .exports
            .iter()
            .find(|e| e.kind == ExportKind::Reexport)
            .unwrap();
        assert_eq!(reexport.source.as_deref(), Some("./widgets"));
        assert_eq!(reexport.names[0].local_name(), "gadget");

        let wildcard = index
            .exports
            .iter()
            .find(|e| e.kind == ExportKind::Wildcard)
            .unwrap();
        assert_eq!(wildcard.source.as_deref(), Some("./barrel"));

        assert!(index
            .exports
            .iter()
            .any(|e| e.kind == ExportKind::Default));
    }

    #[test]
    fn js_import_forms() {
        let source = "\
import React from 'react';
import * as path from 'path';
import { readFile, writeFile as write } from 'fs';
import './styles.css';
";
        let index = extract("m.js", source);
        assert_eq!(index.imports.len(), 4);
        assert_eq!(index.imports[0].kind, ImportKind::Default);
        assert_eq!(index.imports[1].kind, ImportKind::Namespace);
        assert_eq!(index.imports[1].bindings[0].name, "path");
        assert_eq!(index.imports[2].kind, ImportKind::Named);
        assert_eq!(index.imports[2].bindings[1].local_name(), "write");
        assert_eq!(index.imports[3].kind, ImportKind::SideEffect);
        assert!(index.imports[3].bindings.is_empty());
    }

    #[test]
    fn ts_interface_members() {
        let source = "\
interface Swimmable {
    depth: number;
    swim(distance: number): void;
}
";
        let index = extract("m.ts", source);
        let swimmable = index.classes.iter().find(|c| c.name == "Swimmable").unwrap();
        assert_eq!(swimmable.kind, ClassLikeKind::Interface);
        assert_eq!(swimmable.properties, vec!["depth".to_string()]);
        assert_eq!(swimmable.methods.len(), 1);
        assert_eq!(swimmable.methods[0].name, "swim");
    }

    #[test]
    fn rust_derive_and_impls() {
        let source = "\
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    x: i32,
    y: i32,
}

trait Speak {
    fn speak(&self) -> String;
    fn greet(&self) -> String {
        String::from(\"hi\")
    }
}

impl Speak for Point {
    fn speak(&self) -> String {
        String::from(\"point\")
    }
}
";
        let index = extract("lib.rs", source);

        let point = index.classes.iter().find(|c| c.name == "Point").unwrap();
        assert!(point.decorators.iter().any(|d| d == "Debug"));
        assert!(point.decorators.iter().any(|d| d == "Clone"));
        assert!(point.decorators.iter().any(|d| d == "PartialEq"));
        assert_eq!(point.properties, vec!["x".to_string(), "y".to_string()]);

        let speak = index.classes.iter().find(|c| c.name == "Speak").unwrap();
        assert_eq!(speak.kind, ClassLikeKind::Trait);
        assert_eq!(speak.methods.len(), 2);
        assert!(speak.methods.iter().find(|m| m.name == "speak").unwrap().is_abstract);
        assert!(!speak.methods.iter().find(|m| m.name == "greet").unwrap().is_abstract);

        assert_eq!(index.impls.len(), 1);
        let imp = &index.impls[0];
        assert_eq!(imp.type_name, "Point");
        assert_eq!(imp.trait_name.as_deref(), Some("Speak"));
        assert_eq!(imp.methods.len(), 1);
    }

    #[test]
    fn rust_use_forms() {
        let source = "\
use std::collections::HashMap;
use std::fmt::{Display, Debug};
use serde::Serialize as Ser;
use rayon::prelude::*;
";
        let index = extract("lib.rs", source);

        let hashmap = index
            .imports
            .iter()
            .find(|i| i.bindings.first().map(|b| b.name.as_str()) == Some("HashMap"))
            .unwrap();
        assert_eq!(hashmap.module_path, "std::collections");

        let display_count = index
            .imports
            .iter()
            .filter(|i| i.module_path == "std::fmt")
            .count();
        assert_eq!(display_count, 2);

        let aliased = index
            .imports
            .iter()
            .find(|i| i.bindings.first().and_then(|b| b.alias.as_deref()) == Some("Ser"))
            .unwrap();
        assert_eq!(aliased.bindings[0].name, "Serialize");

        let wildcard = index
            .imports
            .iter()
            .find(|i| i.kind == ImportKind::Namespace)
            .unwrap();
        assert_eq!(wildcard.module_path, "rayon::prelude");
    }

    #[test]
    fn call_usages_record_full_callee_path() {
        let index = extract("m.py", "import numpy as np\nnp.array([1])\nprocess()\n");
        let callees: Vec<&str> = index
            .usages
            .iter()
            .filter(|u| u.kind == UsageKind::Call)
            .map(|u| u.name.as_str())
            .collect();
        assert!(callees.contains(&"np.array"));
        assert!(callees.contains(&"process"));
    }
}
