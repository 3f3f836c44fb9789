//! Two-phase analysis pipeline.
//!
//! Phase one is embarrassingly parallel: each file is parsed and its
//! scope tree and extraction index built independently on a rayon
//! worker pool, with no shared mutable state and no ordering guarantee.
//! Phase two runs after a full join, single-writer: the global symbol
//! table, module dependency graph, class hierarchy, and override map
//! are aggregated from the per-file results. A failing file is recorded
//! and skipped; the batch always completes.

use crate::extract::extract_file;
use crate::hierarchy::{build_hierarchy, ClassHierarchy};
use crate::overrides::{detect_overrides, MethodOverrideMap};
use crate::resolution::paths::ModuleGraph;
use crate::resolution::{CallSite, SymbolResolver};
use crate::scope::{build_scope_tree, ScopeEntityMap, ScopeTree};
use crate::symbols::GlobalSymbolTable;
use crate::types::{DependencyEdge, FileIndex, UsageKind};
use anyhow::Result;
use parser_core::{detect_language_from_path, GenericParser, ParsedFile};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Pipeline configuration, mirroring the host's indexing knobs.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Worker threads for the per-file phase; 0 means all cores.
    pub worker_threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { worker_threads: 0 }
    }
}

/// One input file: path and content. Reading is the host's job; the
/// core performs no I/O.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Per-file product of phase one. Read-only once constructed.
pub struct FileAnalysis {
    pub parsed: ParsedFile,
    pub scope_tree: ScopeTree,
    pub index: FileIndex,
}

/// A file that did not produce an analysis, with the reason.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub file_path: String,
    pub reason: String,
}

/// Result of processing one file.
pub enum FileOutcome {
    Success(Box<FileAnalysis>),
    Skipped(FileFailure),
    Failed(FileFailure),
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success(_))
    }
}

/// The aggregate product of a full run.
pub struct ProjectAnalysis {
    pub scope_trees: FxHashMap<String, ScopeTree>,
    pub indexes: FxHashMap<String, FileIndex>,
    pub entity_maps: FxHashMap<String, ScopeEntityMap>,
    pub symbols: GlobalSymbolTable,
    pub hierarchy: ClassHierarchy,
    pub overrides: MethodOverrideMap,
    pub module_graph: ModuleGraph,
    pub skipped: Vec<FileFailure>,
    pub failed: Vec<FileFailure>,
}

impl ProjectAnalysis {
    /// A resolver over this run's frozen structures.
    pub fn resolver(&self) -> SymbolResolver<'_> {
        SymbolResolver::new(
            &self.symbols,
            &self.module_graph,
            &self.scope_trees,
            &self.indexes,
        )
    }

    pub fn file_count(&self) -> usize {
        self.scope_trees.len()
    }
}

/// Orchestrates the parallel per-file phase and the single-writer
/// aggregate phase.
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze one file: detect, parse, build the scope tree and the
    /// extraction index. Unsupported extensions are skips, parse
    /// failures are errors; neither aborts a batch.
    pub fn analyze_file(&self, file: &SourceFile) -> FileOutcome {
        let language = match detect_language_from_path(&file.path) {
            Ok(language) => language,
            Err(err) => {
                return FileOutcome::Skipped(FileFailure {
                    file_path: file.path.clone(),
                    reason: err.to_string(),
                });
            }
        };

        let parsed = match GenericParser::new().parse(&file.path, &file.content, language) {
            Ok(parsed) => parsed,
            Err(err) => {
                return FileOutcome::Failed(FileFailure {
                    file_path: file.path.clone(),
                    reason: err.to_string(),
                });
            }
        };

        let scope_tree = build_scope_tree(&parsed);
        let index = extract_file(&parsed);
        FileOutcome::Success(Box::new(FileAnalysis {
            parsed,
            scope_tree,
            index,
        }))
    }

    /// Run the full pipeline over a batch of files.
    pub fn analyze(&self, files: Vec<SourceFile>) -> Result<ProjectAnalysis> {
        let start_time = Instant::now();
        let threads = if self.config.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.config.worker_threads
        };
        log::info!(
            "analyzing {} files on {} worker threads",
            files.len(),
            threads
        );

        // Phase one: parallel, independent, unordered.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        let outcomes: Vec<FileOutcome> =
            pool.install(|| files.par_iter().map(|file| self.analyze_file(file)).collect());

        // Full join happened above; everything below is single-writer.
        let mut analyses: Vec<FileAnalysis> = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Success(analysis) => analyses.push(*analysis),
                FileOutcome::Skipped(failure) => {
                    log::debug!("skipped '{}': {}", failure.file_path, failure.reason);
                    skipped.push(failure);
                }
                FileOutcome::Failed(failure) => {
                    log::warn!("failed '{}': {}", failure.file_path, failure.reason);
                    failed.push(failure);
                }
            }
        }
        // Deterministic aggregation regardless of completion order.
        analyses.sort_by(|a, b| a.parsed.file_path.cmp(&b.parsed.file_path));

        let analysis = aggregate(analyses, skipped, failed);
        log::info!(
            "analysis completed in {:?}: {} files, {} symbols, {} classes, {} skipped, {} failed",
            start_time.elapsed(),
            analysis.file_count(),
            analysis.symbols.len(),
            analysis.hierarchy.class_count,
            analysis.skipped.len(),
            analysis.failed.len()
        );
        Ok(analysis)
    }
}

/// Phase two: build the aggregate structures from the joined per-file
/// results.
fn aggregate(
    analyses: Vec<FileAnalysis>,
    skipped: Vec<FileFailure>,
    failed: Vec<FileFailure>,
) -> ProjectAnalysis {
    let known_files: Vec<String> = analyses
        .iter()
        .map(|analysis| analysis.parsed.file_path.clone())
        .collect();

    // Module dependency graph: every import edge resolved against the
    // known file set.
    let mut module_graph = ModuleGraph::new();
    for analysis in &analyses {
        let language = analysis.parsed.language;
        for import in &analysis.index.imports {
            let resolved = crate::resolution::paths::resolve_without_graph(
                &import.module_path,
                &analysis.parsed.file_path,
                language,
                &known_files,
            );
            module_graph.insert(
                analysis.parsed.file_path.clone(),
                DependencyEdge {
                    module_path: import.module_path.clone(),
                    resolved_path: resolved,
                },
            );
        }
    }

    let index_refs: Vec<&FileIndex> = analyses.iter().map(|a| &a.index).collect();
    let mut symbols = GlobalSymbolTable::build(&index_refs);

    let contexts: FxHashMap<String, &ParsedFile> = analyses
        .iter()
        .map(|analysis| (analysis.parsed.file_path.clone(), &analysis.parsed))
        .collect();
    let hierarchy = build_hierarchy(&index_refs, &contexts);
    let overrides = detect_overrides(&hierarchy);
    drop(contexts);

    let mut scope_trees = FxHashMap::default();
    let mut indexes = FxHashMap::default();
    let mut entity_maps = FxHashMap::default();
    for analysis in analyses {
        let path = analysis.parsed.file_path.clone();
        entity_maps.insert(
            path.clone(),
            ScopeEntityMap::build(&analysis.scope_tree, &analysis.index.definitions),
        );
        scope_trees.insert(path.clone(), analysis.scope_tree);
        indexes.insert(path, analysis.index);
        // The parsed tree is dropped here; aggregation is done with it.
    }

    // Resolve call usages into the reference index.
    let mut references = Vec::new();
    {
        let resolver = SymbolResolver::new(&symbols, &module_graph, &scope_trees, &indexes);
        for (file_path, index) in &indexes {
            for usage in &index.usages {
                if usage.kind != UsageKind::Call {
                    continue;
                }
                let call = CallSite {
                    callee: usage.name.clone(),
                    file_path: file_path.clone(),
                    span: usage.span,
                };
                if let Some(resolved) = resolver.resolve_call(&call) {
                    if let Some(id) = resolved.symbol_id {
                        references.push((id, usage.clone()));
                    }
                }
            }
        }
    }
    for (id, usage) in references {
        symbols.add_reference(id, usage);
    }

    ProjectAnalysis {
        scope_trees,
        indexes,
        entity_maps,
        symbols,
        hierarchy,
        overrides,
        module_graph,
        skipped,
        failed,
    }
}
