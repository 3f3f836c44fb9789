//! End-to-end resolution scenarios: hoisting, declaration order,
//! imports, and re-export chains through the full pipeline.

use parser_core::SourceSpan;
use semantic::{
    AnalysisConfig, Analyzer, CallSite, Confidence, ProjectAnalysis, SourceFile,
};

fn analyze(files: &[(&str, &str)]) -> ProjectAnalysis {
    let inputs = files
        .iter()
        .map(|(path, content)| SourceFile::new(*path, *content))
        .collect();
    Analyzer::new(AnalysisConfig { worker_threads: 2 })
        .analyze(inputs)
        .expect("analysis must complete")
}

fn call(callee: &str, file: &str, line: u32, col: u32) -> CallSite {
    CallSite {
        callee: callee.to_string(),
        file_path: file.to_string(),
        span: SourceSpan {
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col + callee.len() as u32,
            start_byte: 0,
            end_byte: 0,
        },
    }
}

#[test]
fn cross_file_import_resolution_scenario() {
    let result = analyze(&[
        ("utils.py", "def process_data(rows):\n    return rows\n"),
        (
            "main.py",
            "from utils import process_data\n\nprocess_data([])\n",
        ),
    ]);

    let resolver = result.resolver();
    let resolved = resolver
        .resolve_call(&call("process_data", "main.py", 2, 0))
        .expect("import must resolve");
    let definition = resolved.target.as_definition().unwrap();
    assert_eq!(definition.file_path, "utils.py");
    assert_eq!(resolved.confidence, Confidence::Exact);
}

#[test]
fn hoisting_idempotence() {
    // A hoisted var resolves to the same defining symbol before and
    // after its textual declaration point.
    let source = "function f() {\n  read(v);\n  var v = 1;\n  read(v);\n}\n";
    let result = analyze(&[("m.js", source)]);
    let tree = &result.scope_trees["m.js"];
    let resolver = result.resolver();

    let before_scope = tree.find_scope_at_position(1, 7);
    let after_scope = tree.find_scope_at_position(3, 7);
    let before = resolver.resolve_symbol("v", "m.js", before_scope).unwrap();
    let after = resolver.resolve_symbol("v", "m.js", after_scope).unwrap();

    let span_of = |resolved: &semantic::ResolvedSymbol| match &resolved.target {
        semantic::resolution::ResolvedTarget::Scope(symbol) => symbol.span,
        semantic::resolution::ResolvedTarget::Definition(definition) => definition.name_span,
    };
    assert_eq!(span_of(&before), span_of(&after));
    assert_eq!(before.scope, after.scope);
}

#[test]
fn js_function_call_before_declaration_resolves() {
    let result = analyze(&[("m.js", "boot();\nfunction boot() {}\n")]);
    let resolver = result.resolver();
    let resolved = resolver.resolve_call(&call("boot", "m.js", 0, 0)).unwrap();
    assert_eq!(resolved.target.name(), "boot");
}

#[test]
fn python_pre_declaration_rule() {
    // Unlike JS and Rust, a Python module-scope call before the
    // definition is a miss.
    let result = analyze(&[(
        "m.py",
        "setup()\n\ndef setup():\n    pass\n",
    )]);
    let resolver = result.resolver();
    assert!(resolver.resolve_call(&call("setup", "m.py", 0, 0)).is_none());
    // The same call after the definition resolves.
    let result = analyze(&[(
        "m.py",
        "def setup():\n    pass\n\nsetup()\n",
    )]);
    let resolver = result.resolver();
    assert!(resolver.resolve_call(&call("setup", "m.py", 3, 0)).is_some());
}

#[test]
fn rust_order_free_resolution() {
    let result = analyze(&[(
        "lib.rs",
        "pub fn caller() {\n    helper();\n}\n\nfn helper() {}\n",
    )]);
    let resolver = result.resolver();
    let resolved = resolver.resolve_call(&call("helper", "lib.rs", 1, 4)).unwrap();
    assert_eq!(resolved.target.name(), "helper");
}

#[test]
fn barrel_reexport_chain_resolves_to_origin() {
    let result = analyze(&[
        ("src/widgets.ts", "export function makeWidget() {}\n"),
        ("src/index.ts", "export * from './widgets';\n"),
        (
            "src/app.ts",
            "import { makeWidget } from './index';\nmakeWidget();\n",
        ),
    ]);
    let resolver = result.resolver();
    let resolved = resolver
        .resolve_call(&call("makeWidget", "src/app.ts", 1, 0))
        .unwrap();
    assert_eq!(
        resolved.target.as_definition().unwrap().file_path,
        "src/widgets.ts"
    );
}

#[test]
fn directory_import_uses_index_file() {
    let result = analyze(&[
        ("src/lib/index.ts", "export function setup() {}\n"),
        (
            "src/app.ts",
            "import { setup } from './lib';\nsetup();\n",
        ),
    ]);
    let resolver = result.resolver();
    let resolved = resolver
        .resolve_call(&call("setup", "src/app.ts", 1, 0))
        .unwrap();
    assert_eq!(
        resolved.target.as_definition().unwrap().file_path,
        "src/lib/index.ts"
    );
}

#[test]
fn shadowing_resolves_to_nearest_declaration() {
    let source = "\
count = 0

def bump(count):
    return count + 1
";
    let result = analyze(&[("m.py", source)]);
    let tree = &result.scope_trees["m.py"];
    let resolver = result.resolver();

    let inner = tree.find_scope_at_position(3, 11);
    let resolved = resolver.resolve_symbol("count", "m.py", inner).unwrap();
    // The parameter shadows the module variable.
    match resolved.target {
        semantic::resolution::ResolvedTarget::Scope(symbol) => assert!(symbol.is_parameter),
        semantic::resolution::ResolvedTarget::Definition(_) => {
            panic!("expected the parameter, not the module variable")
        }
    }

    let module_level = resolver
        .resolve_symbol("count", "m.py", tree.root())
        .unwrap();
    assert!(module_level.target.as_definition().is_some());
}

#[test]
fn batch_reports_failures_without_aborting() {
    let result = analyze(&[
        ("ok.py", "def fine():\n    pass\n"),
        ("data.json", "{}\n"),
    ]);
    assert_eq!(result.file_count(), 1);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].file_path, "data.json");
    assert!(result.symbols.exported("ok.py", "fine").is_some());
}
