//! The compiler-independent handling linter.
//!
//! Parses Rust sources with syn, resolves just enough local semantics to
//! recognize `Outcome`-shaped types, and reports three findings:
//!
//! - `OC0001` - an `Outcome`-producing call whose value is discarded
//! - `OC0002` - a match over an `Outcome` that misses a case (carries the
//!   missing-case payload consumed by the repair step)
//! - `OC0100` - the generic no-fallback-arm lint, suppressed for
//!   `Outcome` scrutinees in favor of `OC0002`
//!
//! # Module Organization
//!
//! - [`sema`]: path resolution, structural types, project symbols
//! - [`identity`]: `Outcome` shape classification and case roles
//! - [`matches`]: match expression extraction
//! - [`exhaustive`]: the exhaustiveness pass
//! - [`usage`]: the discarded-call pass
//! - [`suppress`]: the generic lint and its suppressor
//! - [`synth`]: placeholder-arm synthesis (feature `fix`)
//! - [`diagnostics`]: identifiers, severities, finding records
//! - [`engine`]: per-file pipeline and project orchestration

pub mod diagnostics;
pub mod engine;
pub mod exhaustive;
pub mod identity;
pub mod matches;
pub mod sema;
pub mod suppress;
pub mod usage;

#[cfg(feature = "fix")]
pub mod synth;

pub use diagnostics::{Diagnostic, DiagnosticId, MissingCase, Severity};
pub use engine::{analyze_single, analyze_source, collect_symbols, Analysis, AnalysisReport, SourceAnalysis};
pub use identity::{CaseRole, Instantiation, TypeShape};
pub use matches::{ArmCoverage, ArmRecord, MatchRecord};
pub use usage::DiscardPolicy;

#[cfg(feature = "fix")]
pub use engine::FixReport;
#[cfg(feature = "fix")]
pub use synth::{apply_edits, fix_source, plan_file_edits, synthesize_arms, Edit};
