//! Configuration loading from outcome.toml.
//!
//! The configuration surface is deliberately small: per-diagnostic
//! severity overrides, the discard policy, and scan excludes.
//!
//! ```toml
//! discard_counts_as_use = true
//! exclude = ["fixtures"]
//!
//! [severity]
//! unused_outcome = "warn"
//! incomplete_match = "error"
//! generic_match = "off"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::analysis::diagnostics::{DiagnosticId, Severity};
use crate::analysis::usage::DiscardPolicy;

/// Main configuration structure for outcome.toml.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Whether `_ = call()` / `let _ = call()` counts as using the value.
    /// Defaults to true: an explicit discard is a visible decision.
    pub discard_counts_as_use: Option<bool>,
    /// Extra directory names to skip while scanning.
    pub exclude: Vec<String>,
    /// Per-diagnostic severity overrides.
    pub severity: SeverityOverrides,
}

/// Severity overrides, one optional entry per diagnostic.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SeverityOverrides {
    pub unused_outcome: Option<Severity>,
    pub incomplete_match: Option<Severity>,
    pub generic_match: Option<Severity>,
}

impl OutcomeConfig {
    /// Effective severity for a diagnostic, override or default.
    pub fn severity_for(&self, id: DiagnosticId) -> Severity {
        let override_ = match id {
            DiagnosticId::UnusedOutcome => self.severity.unused_outcome,
            DiagnosticId::IncompleteMatch => self.severity.incomplete_match,
            DiagnosticId::GenericMatch => self.severity.generic_match,
        };
        override_.unwrap_or_else(|| id.default_severity())
    }

    /// The active discard policy.
    pub fn discard_policy(&self) -> DiscardPolicy {
        match self.discard_counts_as_use {
            Some(false) => DiscardPolicy::CountsAsUnused,
            _ => DiscardPolicy::CountsAsUse,
        }
    }
}

/// Loads configuration from outcome.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<OutcomeConfig>> {
    let path = root.join("outcome.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid outcome.toml")?;
    Ok(Some(cfg))
}
