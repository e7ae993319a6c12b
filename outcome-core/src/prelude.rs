//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use outcome_core::prelude::*;
//! ```
//!
//! Provides the value API and the most commonly used analysis entry
//! points without pulling in the whole surface.

// The value API
pub use crate::outcome::{Caught, FutureOutcomeExt, MetaValue, Metadata, Outcome};

// Typed errors
pub use crate::error::{AnalysisError, AnalysisResult};

// Analysis entry points
#[cfg(feature = "analysis")]
pub use crate::analysis::{
    analyze_single, Analysis, AnalysisReport, Diagnostic, DiagnosticId, Severity, SourceAnalysis,
};

// Configuration
#[cfg(feature = "analysis")]
pub use crate::config::{load_config, OutcomeConfig};

// File scanning
#[cfg(feature = "analysis")]
pub use crate::scan::{find_crate_root, gather_rs_files, gather_rs_files_with_excludes};

// Repair
#[cfg(feature = "fix")]
pub use crate::analysis::{apply_edits, fix_source, Edit, FixReport};
