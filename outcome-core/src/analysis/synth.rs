//! Missing-arm synthesis: the repair step behind the incomplete-match
//! diagnostic.
//!
//! Given a recorded match and its ordered missing-case list, this module
//! produces span-based text edits that insert one placeholder arm per
//! missing case. Placement keeps matches meaningful top-to-bottom: new
//! arms land immediately before the first catch-all arm, or at the end of
//! the body when no catch-all exists. Bodies are always an explicit
//! `todo!` so the author has to come back and fill them in.

use crate::error::AnalysisError;

use super::diagnostics::MissingCase;
use super::exhaustive;
use super::matches::{line_indent, pattern_key, MatchRecord};

/// A single text replacement against a source buffer. Insertions have
/// `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

fn placeholder_arm(case: &MissingCase) -> String {
    format!("{} => todo!(\"handle {}\"),", case.pattern, case.display)
}

/// Build the edit that inserts placeholder arms for `missing` into one
/// match. Cases whose pattern already appears among the arms (compared
/// with whitespace ignored) are skipped; an empty vector means there was
/// nothing left to insert.
pub fn synthesize_arms(
    content: &str,
    record: &MatchRecord,
    missing: &[MissingCase],
) -> Vec<Edit> {
    let mut existing: Vec<String> = record.arms.iter().map(|a| a.pattern_key.clone()).collect();
    let fresh: Vec<&MissingCase> = missing
        .iter()
        .filter(|case| {
            let key = pattern_key(&case.pattern);
            if existing.contains(&key) {
                return false;
            }
            existing.push(key);
            true
        })
        .collect();
    if fresh.is_empty() {
        return Vec::new();
    }

    let arm_indent = record
        .arms
        .first()
        .map(|a| line_indent(content, a.start_offset))
        .unwrap_or_else(|| format!("{}    ", record.indent));

    let catch_all = record.arms.iter().find(|a| a.is_catch_all);

    let (offset, text) = if let Some(catch) = catch_all {
        // Concrete arms must precede the wildcard, or they would never be
        // reached.
        let mut text = String::new();
        for case in &fresh {
            text.push_str(&placeholder_arm(case));
            text.push('\n');
            text.push_str(&arm_indent);
        }
        (catch.start_offset, text)
    } else if let Some(last) = record.arms.last() {
        let mut text = String::new();
        for case in &fresh {
            text.push('\n');
            text.push_str(&arm_indent);
            text.push_str(&placeholder_arm(case));
        }
        (last.end_offset, text)
    } else {
        let mut text = String::new();
        for case in &fresh {
            text.push('\n');
            text.push_str(&arm_indent);
            text.push_str(&placeholder_arm(case));
        }
        text.push('\n');
        text.push_str(&record.indent);
        (record.body_open_end, text)
    };

    vec![Edit {
        start: offset,
        end: offset,
        text,
    }]
}

/// Plan placeholder insertions for every incomplete match in a file.
///
/// Edits come back sorted by ascending source position and are guaranteed
/// non-overlapping, so the whole batch can be applied in one pass.
pub fn plan_file_edits(content: &str, records: &[MatchRecord]) -> Vec<Edit> {
    let mut edits = Vec::new();
    for record in records {
        let missing = exhaustive::missing_cases(record);
        if !missing.is_empty() {
            edits.extend(synthesize_arms(content, record, &missing));
        }
    }
    edits.sort_by_key(|e| (e.start, e.end));
    edits
}

/// Apply a batch of edits to a buffer.
///
/// Edits must be in bounds and non-overlapping; a malformed batch is an
/// error rather than a silently corrupted file.
pub fn apply_edits(content: &str, edits: &[Edit]) -> Result<String, AnalysisError> {
    let mut sorted = edits.to_vec();
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(content.len() + sorted.iter().map(|e| e.text.len()).sum::<usize>());
    let mut cursor = 0usize;
    for edit in &sorted {
        if edit.start > edit.end || edit.end > content.len() {
            return Err(AnalysisError::edit(format!(
                "edit range {}..{} is outside the buffer (len {})",
                edit.start,
                edit.end,
                content.len()
            )));
        }
        if edit.start < cursor {
            return Err(AnalysisError::edit(format!(
                "overlapping edits at byte {}",
                edit.start
            )));
        }
        out.push_str(&content[cursor..edit.start]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&content[cursor..]);
    Ok(out)
}

/// Repair every incomplete match in a buffer.
///
/// Returns `Ok(None)` when there was nothing to fix.
pub fn fix_source(
    content: &str,
    records: &[MatchRecord],
) -> Result<Option<String>, AnalysisError> {
    let edits = plan_file_edits(content, records);
    if edits.is_empty() {
        return Ok(None);
    }
    apply_edits(content, &edits).map(Some)
}
