//! Outcome LSP Server - live handling lints for Outcome values.
//!
//! Provides IDE integration with:
//! - Diagnostics on file open/save (unused outcomes, incomplete matches)
//! - A quick-fix code action that inserts placeholder arms for missing
//!   cases
//!
//! Resilient by construction: analysis failures are logged to the client
//! and never crash the server.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use outcome_core::{
    find_crate_root, load_config, Analysis, Diagnostic as Finding, DiagnosticId, OutcomeConfig,
    Severity,
};

/// Outcome Language Server state.
struct OutcomeLsp {
    client: Client,
    /// Cached workspace root path.
    workspace_root: Arc<RwLock<Option<PathBuf>>>,
}

impl OutcomeLsp {
    fn new(client: Client) -> Self {
        Self {
            client,
            workspace_root: Arc::new(RwLock::new(None)),
        }
    }

    /// Run the linter over the containing crate and publish diagnostics.
    async fn run_analysis(&self, uri: Url) {
        let file_path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                self.log_error("Invalid file URI").await;
                return;
            }
        };

        let crate_root = match find_crate_root(&file_path) {
            Some(r) => r,
            None => {
                self.log_info("No Cargo.toml found, skipping analysis").await;
                return;
            }
        };

        {
            let mut root = self.workspace_root.write().await;
            *root = Some(crate_root.clone());
        }

        match compute_diagnostics(&crate_root) {
            Ok(file_diagnostics) => {
                for (file_uri, diagnostics) in file_diagnostics {
                    self.client
                        .publish_diagnostics(file_uri, diagnostics, None)
                        .await;
                }
            }
            Err(e) => {
                self.log_error(&format!("Analysis failed: {}", e)).await;
            }
        }
    }

    async fn log_info(&self, message: &str) {
        self.client.log_message(MessageType::INFO, message).await;
    }

    async fn log_error(&self, message: &str) {
        self.client.log_message(MessageType::ERROR, message).await;
    }
}

fn load_effective_config(root: &Path) -> OutcomeConfig {
    load_config(root)
        .ok()
        .flatten()
        .unwrap_or_else(OutcomeConfig::default)
}

/// Run a project analysis and group findings per file URI.
///
/// Files seen by the scan get an (initially empty) entry so stale
/// diagnostics are cleared on publish.
fn compute_diagnostics(crate_root: &Path) -> Result<HashMap<Url, Vec<Diagnostic>>> {
    let config = load_effective_config(crate_root);
    let report = Analysis::new(crate_root).with_config(config).run()?;

    let mut result: HashMap<Url, Vec<Diagnostic>> = HashMap::new();
    for finding in &report.diagnostics {
        let path = crate_root.join(&finding.file);
        if let Ok(uri) = Url::from_file_path(&path) {
            result.entry(uri).or_default().push(to_lsp(finding));
        }
    }
    Ok(result)
}

fn to_lsp(finding: &Finding) -> Diagnostic {
    let line = finding.line.saturating_sub(1) as u32;
    let start = Position {
        line,
        character: finding.column.saturating_sub(1) as u32,
    };
    let end = Position {
        line,
        character: (finding.column.saturating_sub(1) + (finding.span.1 - finding.span.0)) as u32,
    };
    Diagnostic {
        range: Range { start, end },
        severity: Some(match finding.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
            _ => DiagnosticSeverity::INFORMATION,
        }),
        code: Some(NumberOrString::String(finding.code.to_string())),
        code_description: Url::parse(&finding.docs_url)
            .ok()
            .map(|href| CodeDescription { href }),
        source: Some("outcome".to_string()),
        message: finding.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Build the quick-fix edit for a file with incomplete matches, if any.
///
/// The repaired buffer replaces the whole document, which keeps the edit
/// robust against position drift from multiple insertions.
fn build_fix_action(crate_root: &Path, file_path: &Path, uri: &Url) -> Result<Option<CodeAction>> {
    let content = std::fs::read_to_string(file_path)?;
    let label = file_path
        .strip_prefix(crate_root)
        .unwrap_or(file_path)
        .display()
        .to_string();

    let config = load_effective_config(crate_root);
    let sources = project_sources(crate_root)?;
    let symbols = outcome_core::collect_symbols(&sources);
    let analysis = outcome_core::analyze_source(&label, &content, &symbols, &config);

    let Some(fixed) = outcome_core::fix_source(&content, &analysis.matches)? else {
        return Ok(None);
    };

    let full_range = Range {
        start: Position::new(0, 0),
        end: Position::new(content.lines().count() as u32 + 1, 0),
    };
    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![TextEdit::new(full_range, fixed)]);

    Ok(Some(CodeAction {
        title: "Add missing match arms".to_string(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: None,
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            ..WorkspaceEdit::default()
        }),
        command: None,
        is_preferred: Some(true),
        disabled: None,
        data: None,
    }))
}

fn project_sources(crate_root: &Path) -> Result<Vec<(String, String)>> {
    let files = outcome_core::gather_rs_files(crate_root)?;
    Ok(files
        .iter()
        .filter_map(|path| {
            let label = path
                .strip_prefix(crate_root)
                .unwrap_or(path)
                .display()
                .to_string();
            std::fs::read_to_string(path).ok().map(|c| (label, c))
        })
        .collect())
}

#[tower_lsp::async_trait]
impl LanguageServer for OutcomeLsp {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(root_uri) = params.root_uri {
            if let Ok(path) = root_uri.to_file_path() {
                let mut root = self.workspace_root.write().await;
                *root = Some(path);
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "outcome-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Outcome LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        if uri.path().ends_with(".rs") {
            self.run_analysis(uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if uri.path().ends_with(".rs") {
            self.run_analysis(uri).await;
        }
    }

    async fn did_change(&self, _params: DidChangeTextDocumentParams) {
        // Analysis runs on save; re-linting every keystroke would thrash
        // the project scan.
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
        // Only offer the fix where an incomplete-match finding sits.
        let has_incomplete = params
            .context
            .diagnostics
            .iter()
            .any(|d| matches!(&d.code, Some(NumberOrString::String(code)) if code == DiagnosticId::IncompleteMatch.code()));
        if !has_incomplete {
            return Ok(None);
        }

        let uri = params.text_document.uri;
        let Ok(file_path) = uri.to_file_path() else {
            return Ok(None);
        };
        let Some(crate_root) = find_crate_root(&file_path) else {
            return Ok(None);
        };

        match build_fix_action(&crate_root, &file_path, &uri) {
            Ok(Some(action)) => Ok(Some(vec![CodeActionOrCommand::CodeAction(action)])),
            Ok(None) => Ok(None),
            Err(e) => {
                self.log_error(&format!("Quick fix failed: {}", e)).await;
                Ok(None)
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Panic hook keeps stderr informative if something slips through.
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] outcome-lsp internal error: {}", info);
    }));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(OutcomeLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
