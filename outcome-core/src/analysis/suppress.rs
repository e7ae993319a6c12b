//! The generic no-fallback-arm lint and its `Outcome`-aware suppressor.
//!
//! The generic lint knows nothing about any particular type: a match that
//! names cases of some nominal type and provides no catch-all arm may be
//! incomplete, so it warns. For `Outcome` scrutinees that warning is
//! redundant at best and contradictory at worst, since the dedicated
//! exhaustiveness pass checks the two cases precisely. The suppressor
//! resolves each generic finding back to its match and drops it when the
//! scrutinee is `Outcome`-shaped; anything it cannot resolve is left
//! alone.

use tracing::debug;

use super::diagnostics::{Diagnostic, DiagnosticId};
use super::identity::TypeShape;
use super::matches::MatchRecord;

/// Emit the generic match-completeness lint over a file's matches.
///
/// Fires on any match with at least one nominal case arm and no catch-all,
/// regardless of scrutinee type. Type-aware filtering is the suppressor's
/// job, not this lint's.
pub fn generic_match_lint(records: &[MatchRecord]) -> Vec<Diagnostic> {
    records
        .iter()
        .filter(|record| record.has_nominal_arm() && !record.has_catch_all())
        .map(|record| {
            let message = match &record.scrutinee_display {
                Some(ty) => format!(
                    "match over cases of `{ty}` has no fallback arm and may not be exhaustive"
                ),
                None => {
                    "match has no fallback arm and may not be exhaustive".to_string()
                }
            };
            Diagnostic::new(
                DiagnosticId::GenericMatch,
                message,
                record.file.clone(),
                record.kw_line,
                record.kw_column,
                record.kw_span,
            )
        })
        .collect()
}

/// Drop generic lint findings whose match scrutinee is `Outcome`-shaped.
///
/// A finding that cannot be resolved to a recorded match is kept: failing
/// to resolve is never a reason to hide a diagnostic, nor to abort the
/// pass.
pub fn suppress_generic(diagnostics: Vec<Diagnostic>, records: &[MatchRecord]) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .filter(|diag| {
            if diag.id != DiagnosticId::GenericMatch {
                return true;
            }
            let resolved = records
                .iter()
                .find(|r| r.file == diag.file && r.kw_span == diag.span);
            match resolved {
                Some(record) => {
                    let outcome_shaped = matches!(record.shape, TypeShape::Direct(_));
                    if outcome_shaped {
                        debug!(
                            file = %diag.file,
                            line = diag.line,
                            "suppressing generic match lint for Outcome scrutinee"
                        );
                    }
                    !outcome_shaped
                }
                None => true,
            }
        })
        .collect()
}
