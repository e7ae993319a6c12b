//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::analysis::diagnostics::{Diagnostic, Severity};
use crate::analysis::AnalysisReport;

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Off => "off",
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

/// Prints findings in plain text format.
pub fn print_plain(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("No findings.");
        return;
    }
    println!("FINDINGS ({}):", diagnostics.len());
    for diag in diagnostics {
        println!(
            "{}[{}]: {}",
            severity_label(diag.severity),
            diag.code,
            diag.message
        );
        println!("  --> {}:{}:{}", diag.file, diag.line, diag.column);
    }
}

/// Prints a full report in JSON format.
///
/// Falls back to a minimal envelope if serialization fails, so the caller
/// always gets valid JSON on stdout.
pub fn print_json(report: &AnalysisReport) {
    let envelope = json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "files_scanned": report.files_scanned,
        "files_skipped": report.files_skipped,
        "findings": report.diagnostics,
    });
    match serde_json::to_string_pretty(&envelope) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"findings\": []}}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::diagnostics::DiagnosticId;

    #[test]
    fn test_findings_serialize_into_envelope() {
        let report = AnalysisReport {
            diagnostics: vec![Diagnostic::new(
                DiagnosticId::UnusedOutcome,
                "discarded".into(),
                "src/lib.rs",
                3,
                5,
                (10, 15),
            )],
            files_scanned: 1,
            files_skipped: 0,
        };
        let value = serde_json::to_value(&report.diagnostics).unwrap();
        assert_eq!(value[0]["code"], "OC0001");
        assert_eq!(value[0]["line"], 3);
    }
}
