//! outcome-core: metadata-carrying success/error values plus a
//! compiler-independent handling linter for Rust.
//!
//! The crate has two halves that share one idea: failure should be an
//! ordinary, inspectable value, and code that receives one should be made
//! to deal with it.
//!
//! # Features
//!
//! - **The `Outcome` value**: a closed `Ok`/`Err` union with an immutable
//!   metadata side-channel, the full combinator set, std `Result`
//!   interop, and async mirrors for futures of outcomes
//! - **Exhaustiveness linting**: matches over `Outcome` values that miss
//!   a case are reported with a machine-readable missing-case payload
//! - **Usage linting**: calls whose `Outcome` is silently discarded are
//!   flagged, with a configurable policy for explicit `_ =` discards
//! - **Diagnostic suppression**: the generic no-fallback-arm lint is
//!   silenced where the precise `Outcome` check applies
//! - **Repair**: placeholder arms for missing cases, applied as batched,
//!   non-overlapping text edits
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use outcome_core::prelude::*;
//!
//! let report = Analysis::new("/path/to/crate").run()?;
//! for diag in &report.diagnostics {
//!     println!("{}: {}", diag.code, diag.message);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`outcome`]: the value API
//! - [`analysis`]: the linter passes and orchestration
//! - [`config`]: outcome.toml loading
//! - [`scan`]: parallel file discovery
//! - [`report`]: plain and JSON output
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `analysis` (default): the linter and its syn-based front-end
//! - `fix` (default): placeholder-arm synthesis
//! - `full`: everything

// Core modules (always available)
pub mod error;
pub mod logging;
pub mod outcome;
pub mod prelude;

// Feature-gated analysis stack
#[cfg(feature = "analysis")]
pub mod analysis;
#[cfg(feature = "analysis")]
pub mod config;
#[cfg(feature = "analysis")]
pub mod report;
#[cfg(feature = "analysis")]
pub mod scan;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// The value API
pub use outcome::{Caught, FutureOutcomeExt, IntoIter, Iter, MetaValue, Metadata, Outcome};

// Error types
pub use error::{AnalysisError, AnalysisResult};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Analysis surface
#[cfg(feature = "analysis")]
pub use analysis::{
    analyze_single, analyze_source, collect_symbols, Analysis, AnalysisReport, ArmCoverage,
    ArmRecord, CaseRole, Diagnostic, DiagnosticId, DiscardPolicy, Instantiation, MatchRecord,
    MissingCase, Severity, SourceAnalysis, TypeShape,
};

// Configuration
#[cfg(feature = "analysis")]
pub use config::{load_config, OutcomeConfig, SeverityOverrides};

// Output
#[cfg(feature = "analysis")]
pub use report::{print_json, print_plain};

// File scanning
#[cfg(feature = "analysis")]
pub use scan::{find_crate_root, gather_rs_files, gather_rs_files_with_excludes};

// Repair
#[cfg(feature = "fix")]
pub use analysis::{apply_edits, fix_source, plan_file_edits, synthesize_arms, Edit, FixReport};

#[cfg(all(test, feature = "analysis"))]
mod tests;
