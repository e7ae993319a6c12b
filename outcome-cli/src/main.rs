//! outcome CLI - handling linter for Outcome values.
//!
//! Features:
//! - Project-wide analysis without invoking the compiler
//! - Plain or JSON report output
//! - Severity overrides and discard policy from outcome.toml
//! - Placeholder-arm repair for incomplete matches (`--fix`)
//!
//! Exit codes: 0 clean, 1 when any finding is at error severity, 2 on an
//! internal failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use outcome_core::{
    init_structured_logging, load_config, print_json, print_plain, Analysis, OutcomeConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Handling linter for Outcome values")]
pub struct Cli {
    /// Path to the root of the Rust project
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Directory names to exclude from scanning
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Insert placeholder arms for every missing case
    #[arg(long)]
    fix: bool,

    /// Show what --fix would change without writing anything
    #[arg(long)]
    fix_dry_run: bool,
}

/// Resolve and validate the project root.
fn project_root(raw: &str) -> Result<PathBuf> {
    let root = PathBuf::from(raw);
    if !root.is_dir() {
        return Err(anyhow!("not a directory: {}", root.display()));
    }
    Ok(root)
}

fn run(cli: &Cli) -> Result<bool> {
    let root = project_root(&cli.path)?;

    let config = load_config(&root)
        .with_context(|| format!("loading outcome.toml from {}", root.display()))?
        .unwrap_or_else(OutcomeConfig::default);

    let analysis = Analysis::new(&root)
        .with_config(config)
        .with_excludes(cli.exclude.iter().cloned());

    if cli.fix || cli.fix_dry_run {
        let fix = analysis.apply_fixes(cli.fix_dry_run)?;
        if fix.files_changed.is_empty() {
            println!("Nothing to fix.");
        } else {
            println!(
                "{} arm(s) across {} file(s).",
                fix.arms_added,
                fix.files_changed.len()
            );
        }
    }

    let report = analysis.run()?;
    if cli.json {
        print_json(&report);
    } else {
        print_plain(&report.diagnostics);
        eprintln!(
            "INFO: scanned {} file(s), skipped {}",
            report.files_scanned, report.files_skipped
        );
    }

    Ok(report.has_errors())
}

fn main() -> ExitCode {
    init_structured_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(2)
        }
    }
}
