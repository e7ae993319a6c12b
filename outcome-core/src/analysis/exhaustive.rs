//! Exhaustiveness checking for matches over `Outcome` values.
//!
//! For each recorded match whose scrutinee classifies directly as an
//! `Outcome`, the pass folds the arms' coverage and reports one diagnostic
//! at the `match` keyword when a case is unhandled. The diagnostic carries
//! the ordered missing-case list (`Ok` before `Err`, rendered with the
//! scrutinee's concrete type arguments) as structured payload for the
//! repair step.

use super::diagnostics::{Diagnostic, DiagnosticId, MissingCase};
use super::identity::TypeShape;
use super::matches::MatchRecord;

/// Head used for synthesized patterns when no existing arm reveals how the
/// file spells the type.
const DEFAULT_PATTERN_HEAD: &str = "Outcome";

/// Compute the ordered list of cases this match does not handle.
///
/// Empty when the match is exhaustive, has a catch-all, or its scrutinee is
/// not directly `Outcome`-shaped.
pub fn missing_cases(record: &MatchRecord) -> Vec<MissingCase> {
    let TypeShape::Direct(inst) = &record.shape else {
        return Vec::new();
    };

    let mut has_ok = false;
    let mut has_err = false;
    let mut has_catch_all = false;
    for arm in &record.arms {
        has_ok |= arm.coverage.ok;
        has_err |= arm.coverage.err;
        has_catch_all |= arm.is_catch_all;
    }

    if has_catch_all || (has_ok && has_err) {
        return Vec::new();
    }

    let head = record
        .arms
        .iter()
        .find_map(|a| a.head.clone())
        .unwrap_or_else(|| DEFAULT_PATTERN_HEAD.to_string());

    let mut missing = Vec::new();
    if !has_ok {
        missing.push(MissingCase {
            case: "Ok".to_string(),
            display: format!("Ok({})", inst.ok_ty),
            pattern: format!("{head}::Ok(value, _)"),
        });
    }
    if !has_err {
        missing.push(MissingCase {
            case: "Err".to_string(),
            display: format!("Err({})", inst.err_ty),
            pattern: format!("{head}::Err(error, _)"),
        });
    }
    missing
}

/// Check one match, producing an incomplete-match diagnostic if needed.
pub fn check_match(record: &MatchRecord) -> Option<Diagnostic> {
    let missing = missing_cases(record);
    if missing.is_empty() {
        return None;
    }

    let inst = record.shape.instantiation()?;
    let listed = missing
        .iter()
        .map(|m| m.display.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let message = if missing.len() == 1 {
        format!(
            "match on `{}` does not handle the {} case",
            inst.display(),
            listed
        )
    } else {
        format!(
            "match on `{}` does not handle the {} cases",
            inst.display(),
            listed
        )
    };

    Some(
        Diagnostic::new(
            DiagnosticId::IncompleteMatch,
            message,
            record.file.clone(),
            record.kw_line,
            record.kw_column,
            record.kw_span,
        )
        .with_missing(missing),
    )
}

/// Run the pass over every recorded match in a file.
pub fn check_file(records: &[MatchRecord]) -> Vec<Diagnostic> {
    records.iter().filter_map(check_match).collect()
}
