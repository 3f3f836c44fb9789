//! Module path to file resolution.
//!
//! Resolution order mirrors the engine's contract: callers consult the
//! module dependency graph first; this module provides the fallbacks -
//! relative-path resolution with extension probing and index-file
//! handling, then a last-resort suffix match over all known files.
//! Everything here is pure string work; the core never touches the
//! filesystem.

use crate::types::DependencyEdge;
use parser_core::SupportedLanguage;
use rustc_hash::FxHashMap;

/// Module dependency graph handed in by the host (or built by the
/// pipeline): file -> import path -> resolved project file.
#[derive(Debug, Default, Clone)]
pub struct ModuleGraph {
    edges: FxHashMap<String, Vec<DependencyEdge>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, edge: DependencyEdge) {
        self.edges.entry(file.into()).or_default().push(edge);
    }

    pub fn edges_of(&self, file: &str) -> &[DependencyEdge] {
        self.edges.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First-choice resolution: an existing graph entry for the exact
    /// import path.
    pub fn lookup(&self, file: &str, module_path: &str) -> Option<&str> {
        self.edges_of(file)
            .iter()
            .find(|edge| edge.module_path == module_path)
            .and_then(|edge| edge.resolved_path.as_deref())
    }
}

/// Resolve an import path to a project file without the graph:
/// relative resolution (`./`, `../`, extension probing, index-file
/// fallback) for path-style imports, dotted/`::` module resolution for
/// Python and Rust.
pub fn resolve_without_graph(
    module_path: &str,
    importing_file: &str,
    language: SupportedLanguage,
    known_files: &[String],
) -> Option<String> {
    let candidates = match language {
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => {
            js_candidates(module_path, importing_file, language)
        }
        SupportedLanguage::Python => python_candidates(module_path, importing_file),
        SupportedLanguage::Rust => rust_candidates(module_path, importing_file),
    };
    candidates
        .into_iter()
        .find(|candidate| known_files.iter().any(|known| known == candidate))
}

/// Last resort: match the final path segment against all known files.
/// Heuristic by nature; callers downgrade confidence accordingly.
pub fn suffix_match(
    module_path: &str,
    language: SupportedLanguage,
    known_files: &[String],
) -> Option<String> {
    let separator = match language {
        SupportedLanguage::Rust => "::",
        _ => ".",
    };
    let last = module_path
        .trim_start_matches('.')
        .rsplit(separator)
        .next()?
        .trim_start_matches('/');
    let last = last.rsplit('/').next().unwrap_or(last);
    if last.is_empty() {
        return None;
    }
    let config = crate::config::get_config(language);
    for extension in config.probe_extensions {
        let suffix = format!("{last}.{extension}");
        if let Some(found) = known_files
            .iter()
            .find(|known| known.ends_with(&format!("/{suffix}")) || known.as_str() == suffix)
        {
            return Some(found.clone());
        }
    }
    None
}

fn js_candidates(
    module_path: &str,
    importing_file: &str,
    language: SupportedLanguage,
) -> Vec<String> {
    let config = crate::config::get_config(language);
    let base = if module_path.starts_with('.') {
        join_relative(parent_dir(importing_file), module_path)
    } else {
        module_path.to_string()
    };

    let mut candidates = Vec::new();
    // As written, when the import already carries an extension.
    if base.rsplit('/').next().is_some_and(|name| name.contains('.')) {
        candidates.push(base.clone());
    }
    for extension in config.probe_extensions {
        candidates.push(format!("{base}.{extension}"));
    }
    for index_file in config.index_files {
        candidates.push(format!("{base}/{index_file}"));
    }
    candidates
}

/// Python: `from foo.bar import x` can live at `foo/bar.py` or
/// `foo/bar/__init__.py`, probed relative to the importing file's
/// directory and the project root. Leading dots walk up packages.
fn python_candidates(module_path: &str, importing_file: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let dots = module_path.chars().take_while(|&c| c == '.').count();
    let rest = &module_path[dots..];
    let parts: Vec<&str> = rest.split('.').filter(|p| !p.is_empty()).collect();

    let mut bases = Vec::new();
    if dots > 0 {
        // Relative import: one dot is the current package, each extra
        // dot one level up.
        let mut dir = parent_dir(importing_file).to_string();
        for _ in 1..dots {
            dir = parent_dir(&dir).to_string();
        }
        bases.push(dir);
    } else {
        bases.push(parent_dir(importing_file).to_string());
        bases.push(String::new());
    }

    for base in bases {
        if parts.is_empty() {
            candidates.push(join_segments(&base, &["__init__.py"]));
            continue;
        }
        let module_file = format!("{}.py", parts.join("/"));
        candidates.push(join_segments(&base, &[&module_file]));
        let package_init = format!("{}/__init__.py", parts.join("/"));
        candidates.push(join_segments(&base, &[&package_init]));
    }
    candidates
}

fn rust_candidates(module_path: &str, importing_file: &str) -> Vec<String> {
    let parts: Vec<&str> = module_path
        .split("::")
        .filter(|p| !p.is_empty() && *p != "crate" && *p != "self" && *p != "super")
        .collect();
    if parts.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    let joined = parts.join("/");
    for base in [parent_dir(importing_file).to_string(), "src".to_string(), String::new()] {
        candidates.push(join_segments(&base, &[&format!("{joined}.rs")]));
        candidates.push(join_segments(&base, &[&format!("{joined}/mod.rs")]));
    }
    // The first segment alone also names a module file.
    if parts.len() > 1 {
        for base in [parent_dir(importing_file).to_string(), "src".to_string()] {
            candidates.push(join_segments(&base, &[&format!("{}.rs", parts[0])]));
        }
    }
    candidates
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Join and normalize a `./`/`../` path against a base directory.
fn join_relative(base: &str, relative: &str) -> String {
    let mut components: Vec<&str> = base.split('/').filter(|c| !c.is_empty()).collect();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    components.join("/")
}

fn join_segments(base: &str, segments: &[&str]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in segments {
        if path.is_empty() {
            path = (*segment).to_string();
        } else {
            path = format!("{path}/{segment}");
        }
    }
    path
}
