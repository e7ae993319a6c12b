//! Diagnostic identifiers, severities, and the finding record itself.
//!
//! Findings are data: they are collected, filtered, serialized, and
//! rendered, but never thrown. The `OC0002` record additionally carries a
//! structured list of missing cases so the repair step can work from the
//! diagnostic alone.

use serde::{Deserialize, Serialize};

/// How prominently a finding is reported. `Off` drops it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

/// The three findings this linter can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticId {
    /// A call producing an `Outcome` whose value is discarded.
    UnusedOutcome,
    /// A match over an `Outcome` that does not cover both cases.
    IncompleteMatch,
    /// The generic no-fallback-arm lint; suppressed for `Outcome`
    /// scrutinees in favor of `IncompleteMatch`.
    GenericMatch,
}

impl DiagnosticId {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnusedOutcome => "OC0001",
            Self::IncompleteMatch => "OC0002",
            Self::GenericMatch => "OC0100",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Self::UnusedOutcome => Severity::Warning,
            Self::IncompleteMatch => Severity::Error,
            Self::GenericMatch => Severity::Warning,
        }
    }

    /// Stable documentation reference for this finding.
    pub fn docs_url(self) -> String {
        format!(
            "https://docs.rs/outcome-core/latest/outcome_core/analysis/diagnostics/#{}",
            self.code().to_ascii_lowercase()
        )
    }
}

/// One case absent from a match, in report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCase {
    /// "Ok" or "Err".
    pub case: String,
    /// Display form with the scrutinee's concrete argument, e.g. `Ok(i32)`.
    pub display: String,
    /// The arm pattern the repair step should insert.
    pub pattern: String,
}

/// A single finding at a source location.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    /// 1-based line of the anchor token.
    pub line: usize,
    /// 1-based column of the anchor token.
    pub column: usize,
    /// Byte range of the anchor token in the source buffer.
    pub span: (usize, usize),
    pub docs_url: String,
    /// For `UnusedOutcome`: the invoked operation's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// For `IncompleteMatch`: the ordered missing-case payload.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<MissingCase>,
}

impl Diagnostic {
    pub fn new(
        id: DiagnosticId,
        message: String,
        file: impl Into<String>,
        line: usize,
        column: usize,
        span: (usize, usize),
    ) -> Self {
        Self {
            id,
            code: id.code(),
            severity: id.default_severity(),
            message,
            file: file.into(),
            line,
            column,
            span,
            docs_url: id.docs_url(),
            operation: None,
            missing: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_missing(mut self, missing: Vec<MissingCase>) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}
