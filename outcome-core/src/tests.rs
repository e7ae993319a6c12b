//! End-to-end scenarios across the whole pipeline.
//!
//! Each scenario drives `analyze_single` (or the repair entry points) over
//! an inline fixture, the way the CLI and LSP drive the library, and
//! checks the merged finding set rather than any single pass.

use crate::analysis::{analyze_single, DiagnosticId};
use crate::config::OutcomeConfig;
use crate::outcome::{Caught, Outcome};

const HEADER: &str = "use outcome_core::Outcome;\n\
     fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
     async fn fetch_later() -> Outcome<i32, String> { Outcome::ok(1) }\n";

fn codes(source: &str, config: &OutcomeConfig) -> Vec<String> {
    analyze_single("src/lib.rs", source, config)
        .diagnostics
        .iter()
        .map(|d| d.code.to_string())
        .collect()
}

// === Scenario: exhaustiveness over Outcome matches ===

#[test]
fn test_match_with_both_arms_is_clean() {
    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{\n\
                 Outcome::Ok(v, _) => drop(v),\n\
                 Outcome::Err(e, _) => drop(e),\n\
             }}\n\
         }}\n"
    );
    assert!(codes(&source, &OutcomeConfig::default()).is_empty());
}

#[test]
fn test_match_with_ok_and_catch_all_is_clean() {
    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{\n\
                 Outcome::Ok(v, _) => drop(v),\n\
                 _ => {{}}\n\
             }}\n\
         }}\n"
    );
    assert!(codes(&source, &OutcomeConfig::default()).is_empty());
}

#[test]
fn test_match_with_only_ok_names_the_err_case() {
    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{\n\
                 Outcome::Ok(v, _) => drop(v),\n\
             }}\n\
         }}\n"
    );
    let analysis = analyze_single("src/lib.rs", &source, &OutcomeConfig::default());
    assert_eq!(analysis.diagnostics.len(), 1);
    let diag = &analysis.diagnostics[0];
    assert_eq!(diag.id, DiagnosticId::IncompleteMatch);
    assert_eq!(diag.missing.len(), 1);
    assert_eq!(diag.missing[0].display, "Err(String)");
}

#[test]
fn test_empty_match_names_ok_first() {
    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{}}\n\
         }}\n"
    );
    let analysis = analyze_single("src/lib.rs", &source, &OutcomeConfig::default());
    assert_eq!(analysis.diagnostics.len(), 1);
    let missing: Vec<&str> = analysis.diagnostics[0]
        .missing
        .iter()
        .map(|m| m.case.as_str())
        .collect();
    assert_eq!(missing, vec!["Ok", "Err"]);
}

#[test]
fn test_generic_lint_survives_for_other_enums_only() {
    let source = format!(
        "{HEADER}\
         enum Status {{ Active, Retired }}\n\
         fn handle(s: Status) {{\n\
             match fetch() {{\n\
                 Outcome::Ok(v, _) => drop(v),\n\
                 Outcome::Err(e, _) => drop(e),\n\
             }}\n\
             match s {{\n\
                 Status::Active => {{}}\n\
                 Status::Retired => {{}}\n\
             }}\n\
         }}\n"
    );
    let found = codes(&source, &OutcomeConfig::default());
    assert_eq!(found, vec!["OC0100".to_string()]);
}

// === Scenario: repair ===

#[cfg(feature = "fix")]
#[test]
fn test_repair_then_reanalyze_is_clean() {
    use crate::analysis::fix_source;

    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{\n\
                 Outcome::Ok(v, _) => drop(v),\n\
             }}\n\
         }}\n"
    );
    let config = OutcomeConfig::default();
    let analysis = analyze_single("src/lib.rs", &source, &config);
    let repaired = fix_source(&source, &analysis.matches)
        .unwrap()
        .expect("repair should produce an edit");

    assert!(repaired.contains("Outcome::Err(error, _) => todo!(\"handle Err(String)\"),"));

    let reanalyzed = analyze_single("src/lib.rs", &repaired, &config);
    assert!(reanalyzed.diagnostics.is_empty());
    assert!(fix_source(&repaired, &reanalyzed.matches).unwrap().is_none());
}

#[cfg(feature = "fix")]
#[test]
fn test_repair_keeps_catch_all_last() {
    use crate::analysis::{apply_edits, synthesize_arms};
    use crate::analysis::MissingCase;

    let source = format!(
        "{HEADER}\
         fn handle() {{\n\
             match fetch() {{\n\
                 Outcome::Err(e, _) => drop(e),\n\
                 _ => {{}}\n\
             }}\n\
         }}\n"
    );
    let analysis = analyze_single("src/lib.rs", &source, &OutcomeConfig::default());
    let missing = vec![MissingCase {
        case: "Ok".into(),
        display: "Ok(i32)".into(),
        pattern: "Outcome::Ok(value, _)".into(),
    }];
    let edits = synthesize_arms(&source, &analysis.matches[0], &missing);
    let repaired = apply_edits(&source, &edits).unwrap();

    let ok_at = repaired.find("Outcome::Ok(value, _)").unwrap();
    let err_at = repaired.find("Outcome::Err(e, _)").unwrap();
    let wildcard_at = repaired.find("_ => {}").unwrap();
    assert!(err_at < ok_at);
    assert!(ok_at < wildcard_at);
}

// === Scenario: usage ===

#[test]
fn test_usage_statement_forms() {
    let config = OutcomeConfig::default();

    let bare = format!("{HEADER}fn handle() {{ fetch(); }}\n");
    assert_eq!(codes(&bare, &config), vec!["OC0001".to_string()]);

    let bound = format!("{HEADER}fn handle() {{ let x = fetch(); drop(x); }}\n");
    assert!(codes(&bound, &config).is_empty());

    let awaited = format!("{HEADER}async fn handle() {{ fetch_later().await; }}\n");
    assert_eq!(codes(&awaited, &config), vec!["OC0001".to_string()]);

    let stored_future = format!("{HEADER}fn handle() {{ fetch_later(); }}\n");
    assert!(codes(&stored_future, &config).is_empty());
}

#[test]
fn test_usage_discard_policy_both_ways() {
    let source = format!(
        "{HEADER}async fn handle() {{ _ = fetch(); _ = fetch_later().await; }}\n"
    );

    let lenient = OutcomeConfig::default();
    assert!(codes(&source, &lenient).is_empty());

    let strict: OutcomeConfig = toml::from_str("discard_counts_as_use = false").unwrap();
    assert_eq!(codes(&source, &strict).len(), 2);
}

// === Scenario: capturing factories ===

#[test]
fn test_from_fallible_parse_shapes() {
    let ok = Outcome::from_fallible(|| "42".parse::<i32>().ok());
    assert_eq!(ok, Outcome::ok(42));

    let failed = Outcome::from_fallible(|| "xx".parse::<i32>().ok());
    assert_eq!(failed, Outcome::err(Caught::Failed));

    let caught: Outcome<i32, Caught> = Outcome::from_fallible(|| panic!("exploded"));
    assert!(matches!(caught.error(), Some(Caught::Panicked(_))));
}

// === Scenario: aliased and re-typed forms still classify ===

#[test]
fn test_alias_and_retype_classification() {
    let source = "use outcome_core::Outcome;\n\
         type ApiResult<T> = Outcome<T, String>;\n\
         fn fetch() -> ApiResult<u32> { Outcome::ok(1) }\n\
         fn handle() {\n\
             match fetch() {\n\
                 ApiResult::Ok(v, _) => drop(v),\n\
             }\n\
             fetch();\n\
         }\n";
    let analysis = analyze_single("src/lib.rs", source, &OutcomeConfig::default());
    let found: Vec<&str> = analysis.diagnostics.iter().map(|d| d.code).collect();
    assert!(found.contains(&"OC0002"));
    assert!(found.contains(&"OC0001"));
    assert!(!found.contains(&"OC0100"));
}
