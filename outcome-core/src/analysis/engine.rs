//! Orchestration: run every pass over a buffer, a file set, or a project.
//!
//! The per-file pipeline is a pure function from source text to findings,
//! so project runs fan files out across Rayon workers and merge the
//! results. The symbol table is built first from all files and then shared
//! immutably with every worker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::warn;

use crate::config::OutcomeConfig;
use crate::scan::gather_rs_files_with_excludes;

use super::diagnostics::{Diagnostic, Severity};
use super::matches::{scan_matches, MatchRecord};
use super::sema::{collect_file_symbols, FileScope, SymbolTable};
use super::{exhaustive, suppress, usage};

/// Everything the pipeline learned about one source buffer.
#[derive(Debug, Default)]
pub struct SourceAnalysis {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
    pub matches: Vec<MatchRecord>,
    pub parse_failed: bool,
}

/// Result of a project run.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl AnalysisReport {
    /// True when any finding is at error severity, for exit-code purposes.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Build a symbol table for a set of already-loaded sources.
pub fn collect_symbols(sources: &[(String, String)]) -> SymbolTable {
    let per_file: Vec<_> = sources
        .par_iter()
        .filter_map(|(label, content)| match syn::parse_file(content) {
            Ok(ast) => {
                let scope = FileScope::new(Path::new(label), &ast);
                Some(collect_file_symbols(&scope, &ast))
            }
            Err(e) => {
                warn!(file = %label, error = %e, "skipping unparseable file in symbol pass");
                None
            }
        })
        .collect();

    let mut table = SymbolTable::default();
    for symbols in per_file {
        table.merge(symbols);
    }
    table.finalize();
    table
}

/// Run the full per-file pipeline against one buffer.
///
/// A buffer that fails to parse yields an empty result with
/// `parse_failed` set; analysis never aborts on one bad file.
pub fn analyze_source(
    label: &str,
    content: &str,
    symbols: &SymbolTable,
    config: &OutcomeConfig,
) -> SourceAnalysis {
    let ast = match syn::parse_file(content) {
        Ok(ast) => ast,
        Err(e) => {
            warn!(file = %label, error = %e, "skipping unparseable file");
            return SourceAnalysis {
                file: label.to_string(),
                parse_failed: true,
                ..SourceAnalysis::default()
            };
        }
    };
    let scope = FileScope::new(Path::new(label), &ast);
    let records = scan_matches(label, content, &ast, &scope, symbols);

    let mut diagnostics = exhaustive::check_file(&records);
    diagnostics.extend(suppress::generic_match_lint(&records));
    diagnostics.extend(usage::scan_usage(
        label,
        &ast,
        &scope,
        symbols,
        config.discard_policy(),
    ));
    let mut diagnostics = suppress::suppress_generic(diagnostics, &records);

    // Apply configured severities; Off drops the finding.
    diagnostics.retain_mut(|diag| {
        let severity = config.severity_for(diag.id);
        diag.severity = severity;
        severity != Severity::Off
    });
    diagnostics.sort_by_key(|d| (d.line, d.column, d.code));

    SourceAnalysis {
        file: label.to_string(),
        diagnostics,
        matches: records,
        parse_failed: false,
    }
}

/// Analyze a single standalone buffer, building its symbol table from the
/// buffer itself. Used by tests and the LSP for unsaved documents.
pub fn analyze_single(label: &str, content: &str, config: &OutcomeConfig) -> SourceAnalysis {
    let sources = vec![(label.to_string(), content.to_string())];
    let symbols = collect_symbols(&sources);
    analyze_source(label, content, &symbols, config)
}

/// Fluent entry point for analyzing a project directory.
///
/// ```rust,ignore
/// use outcome_core::prelude::*;
///
/// let report = Analysis::new("/path/to/crate").run()?;
/// for diag in &report.diagnostics {
///     println!("{}: {}", diag.code, diag.message);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Analysis {
    root: PathBuf,
    config: OutcomeConfig,
    extra_excludes: Vec<String>,
}

impl Analysis {
    /// Create an analysis of the crate rooted at `root` with the default
    /// configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: OutcomeConfig::default(),
            extra_excludes: Vec::new(),
        }
    }

    /// Replace the configuration (typically loaded from outcome.toml).
    pub fn with_config(mut self, config: OutcomeConfig) -> Self {
        self.config = config;
        self
    }

    /// Add directory names to skip while scanning.
    pub fn with_excludes(mut self, excludes: impl IntoIterator<Item = String>) -> Self {
        self.extra_excludes.extend(excludes);
        self
    }

    fn load_sources(&self) -> Result<(Vec<(String, String)>, usize)> {
        let excludes: Vec<&str> = self
            .config
            .exclude
            .iter()
            .map(String::as_str)
            .chain(self.extra_excludes.iter().map(String::as_str))
            .collect();
        let files = gather_rs_files_with_excludes(&self.root, &excludes)
            .with_context(|| format!("scanning {}", self.root.display()))?;

        let mut skipped = 0usize;
        let sources: Vec<(String, String)> = files
            .iter()
            .filter_map(|path| {
                let label = path
                    .strip_prefix(&self.root)
                    .unwrap_or(path)
                    .display()
                    .to_string();
                match std::fs::read_to_string(path) {
                    Ok(content) => Some((label, content)),
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "skipping unreadable file");
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();
        Ok((sources, skipped))
    }

    /// Run every pass over the project and merge the findings.
    pub fn run(&self) -> Result<AnalysisReport> {
        let (sources, skipped) = self.load_sources()?;
        let symbols = collect_symbols(&sources);

        let analyses: Vec<SourceAnalysis> = sources
            .par_iter()
            .map(|(label, content)| analyze_source(label, content, &symbols, &self.config))
            .collect();

        let files_scanned = sources.len();
        let files_skipped =
            skipped + analyses.iter().filter(|a| a.parse_failed).count();
        let mut diagnostics: Vec<Diagnostic> =
            analyses.into_iter().flat_map(|a| a.diagnostics).collect();
        diagnostics.sort_by(|a, b| {
            (a.file.as_str(), a.line, a.column, a.code)
                .cmp(&(b.file.as_str(), b.line, b.column, b.code))
        });

        Ok(AnalysisReport {
            diagnostics,
            files_scanned,
            files_skipped,
        })
    }

    /// Insert placeholder arms for every incomplete match in the project.
    ///
    /// Edits are computed per file against non-overlapping spans and
    /// applied in ascending source order. With `dry_run` the changed
    /// files are reported but nothing is written.
    #[cfg(feature = "fix")]
    pub fn apply_fixes(&self, dry_run: bool) -> Result<FixReport> {
        use super::synth;

        let (sources, _) = self.load_sources()?;
        let symbols = collect_symbols(&sources);

        let mut report = FixReport::default();
        for (label, content) in &sources {
            let analysis = analyze_source(label, content, &symbols, &self.config);
            let edits = synth::plan_file_edits(content, &analysis.matches);
            if edits.is_empty() {
                continue;
            }
            let arms: usize = edits
                .iter()
                .map(|e| e.text.matches("todo!").count())
                .sum();
            let fixed = synth::apply_edits(content, &edits)
                .with_context(|| format!("repairing {label}"))?;

            let path = self.root.join(label);
            if dry_run {
                println!("[DRY-RUN] Would add {arms} arm(s) to: {}", path.display());
            } else {
                std::fs::write(&path, fixed)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("[FIX] Added {arms} arm(s) to: {}", path.display());
            }
            report.files_changed.push(path);
            report.arms_added += arms;
        }
        Ok(report)
    }
}

/// Result of a repair run.
#[cfg(feature = "fix")]
#[derive(Debug, Default)]
pub struct FixReport {
    pub files_changed: Vec<PathBuf>,
    pub arms_added: usize,
}
