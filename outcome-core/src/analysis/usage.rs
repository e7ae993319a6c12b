//! Discarded-`Outcome` detection.
//!
//! A call whose return type classifies as `Outcome` (directly, or through
//! one async layer that is awaited on the spot) and whose value ends up in
//! statement position is reported: the success or failure it carries will
//! go unnoticed. An un-awaited future is treated as used, since it may be
//! stored and awaited later. Whether an explicit discard (`_ = call()` or
//! `let _ = call()`) counts as use is a configuration policy; the default
//! says it does.

use proc_macro2::Span;
use syn::visit::Visit;
use syn::{Expr, Pat, Stmt};

use super::diagnostics::{Diagnostic, DiagnosticId};
use super::identity::{self, TypeShape};
use super::sema::{paths, FileScope, FnSig, SymbolTable};

/// Policy for explicit discard targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardPolicy {
    /// `_ = call()` acknowledges the value; no diagnostic. The default.
    CountsAsUse,
    /// `_ = call()` is as silent as a bare statement; diagnose it.
    CountsAsUnused,
}

impl Default for DiscardPolicy {
    fn default() -> Self {
        Self::CountsAsUse
    }
}

/// Scan a parsed file for discarded `Outcome`-producing calls.
pub fn scan_usage(
    file: &str,
    ast: &syn::File,
    scope: &FileScope,
    symbols: &SymbolTable,
    policy: DiscardPolicy,
) -> Vec<Diagnostic> {
    let mut scanner = UsageScanner {
        file,
        scope,
        symbols,
        policy,
        diagnostics: Vec::new(),
    };
    scanner.visit_file(ast);
    scanner.diagnostics
}

struct UsageScanner<'a> {
    file: &'a str,
    scope: &'a FileScope,
    symbols: &'a SymbolTable,
    policy: DiscardPolicy,
    diagnostics: Vec<Diagnostic>,
}

impl UsageScanner<'_> {
    /// Inspect an expression sitting in statement (or discard) position.
    fn check_discarded(&mut self, expr: &Expr) {
        let mut current = expr;
        let mut awaited = false;
        // Climb down through purely syntactic wrappers to the call itself.
        loop {
            match current {
                Expr::Paren(p) => current = &p.expr,
                Expr::Group(g) => current = &g.expr,
                Expr::Reference(r) => current = &r.expr,
                Expr::Await(a) => {
                    awaited = true;
                    current = &a.base;
                }
                _ => break,
            }
        }

        let (sig, name, span) = match current {
            Expr::Call(call) => {
                let Expr::Path(p) = &*call.func else {
                    return;
                };
                let raw = paths::path_segments(&p.path);
                let resolved = self.scope.resolve_value_path(&raw);
                let Some(sig) = self.symbols.function(&resolved) else {
                    return;
                };
                (sig, raw.join("::"), p.path.segments[0].ident.span())
            }
            Expr::MethodCall(mc) => {
                let Some(sig) = self.symbols.method(&mc.method.to_string()) else {
                    return;
                };
                (sig, mc.method.to_string(), mc.method.span())
            }
            _ => return,
        };

        if self.is_discarded_outcome(sig, awaited) {
            self.diagnostics.push(unused_diagnostic(self.file, &name, span));
        }
    }

    fn is_discarded_outcome(&self, sig: &FnSig, awaited: bool) -> bool {
        match identity::classify(&sig.call_type(), self.scope, self.symbols) {
            TypeShape::Direct(_) => true,
            // A future that is not awaited right here may be stored for
            // later; only the awaited form is known to be discarded.
            TypeShape::Wrapped(_) => awaited,
            TypeShape::Other => false,
        }
    }
}

fn unused_diagnostic(file: &str, operation: &str, span: Span) -> Diagnostic {
    let start = span.start();
    let range = span.byte_range();
    Diagnostic::new(
        DiagnosticId::UnusedOutcome,
        format!(
            "the Outcome returned by `{operation}` is discarded; its success or failure state may go unnoticed"
        ),
        file,
        start.line,
        start.column + 1,
        (range.start, range.end),
    )
    .with_operation(operation)
}

impl<'ast> Visit<'ast> for UsageScanner<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            // Bare expression statement: `do_thing();`
            Stmt::Expr(expr, Some(_)) => {
                // `_ = call()` in expression position follows the policy.
                if let Expr::Assign(assign) = expr {
                    if matches!(&*assign.left, Expr::Infer(_)) {
                        if self.policy == DiscardPolicy::CountsAsUnused {
                            self.check_discarded(&assign.right);
                        }
                        syn::visit::visit_stmt(self, stmt);
                        return;
                    }
                }
                self.check_discarded(expr);
            }
            // `let _ = call();`
            Stmt::Local(local) => {
                if matches!(&local.pat, Pat::Wild(_)) {
                    if self.policy == DiscardPolicy::CountsAsUnused {
                        if let Some(init) = &local.init {
                            self.check_discarded(&init.expr);
                        }
                    }
                }
            }
            _ => {}
        }
        syn::visit::visit_stmt(self, stmt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sema::collect_file_symbols;
    use std::path::PathBuf;

    fn scan_with(source: &str, policy: DiscardPolicy) -> Vec<Diagnostic> {
        let ast = syn::parse_file(source).unwrap();
        let scope = FileScope::new(&PathBuf::from("src/lib.rs"), &ast);
        let mut symbols = SymbolTable::default();
        symbols.merge(collect_file_symbols(&scope, &ast));
        symbols.finalize();
        scan_usage("src/lib.rs", &ast, &scope, &symbols, policy)
    }

    fn scan(source: &str) -> Vec<Diagnostic> {
        scan_with(source, DiscardPolicy::default())
    }

    const HEADER: &str = "use outcome_core::Outcome;\n\
         fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
         async fn fetch_later() -> Outcome<i32, String> { Outcome::ok(1) }\n\
         fn plain() -> i32 { 1 }\n";

    #[test]
    fn test_bare_statement_warns() {
        let source = format!("{HEADER}fn handle() {{ fetch(); }}\n");
        let diags = scan(&source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "OC0001");
        assert_eq!(diags[0].operation.as_deref(), Some("fetch"));
        assert!(diags[0].message.contains("`fetch`"));
    }

    #[test]
    fn test_bound_call_does_not_warn() {
        let source = format!("{HEADER}fn handle() {{ let x = fetch(); drop(x); }}\n");
        assert!(scan(&source).is_empty());
    }

    #[test]
    fn test_consumed_call_does_not_warn() {
        let source = format!("{HEADER}fn handle() -> bool {{ fetch().is_ok() }}\n");
        assert!(scan(&source).is_empty());
    }

    #[test]
    fn test_non_outcome_call_does_not_warn() {
        let source = format!("{HEADER}fn handle() {{ plain(); }}\n");
        assert!(scan(&source).is_empty());
    }

    #[test]
    fn test_awaited_statement_warns() {
        let source = format!("{HEADER}async fn handle() {{ fetch_later().await; }}\n");
        let diags = scan(&source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].operation.as_deref(), Some("fetch_later"));
    }

    #[test]
    fn test_unawaited_future_statement_is_treated_as_used() {
        let source = format!("{HEADER}fn handle() {{ fetch_later(); }}\n");
        assert!(scan(&source).is_empty());
    }

    #[test]
    fn test_discard_counts_as_use_by_default() {
        let source = format!(
            "{HEADER}fn handle() {{ _ = fetch(); let _ = fetch(); }}\n"
        );
        assert!(scan(&source).is_empty());
    }

    #[test]
    fn test_discard_policy_counts_as_unused() {
        let source = format!(
            "{HEADER}fn handle() {{ _ = fetch(); let _ = fetch(); }}\n"
        );
        let diags = scan_with(&source, DiscardPolicy::CountsAsUnused);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_awaited_discard_follows_policy() {
        let source = format!("{HEADER}async fn handle() {{ _ = fetch_later().await; }}\n");
        assert!(scan(&source).is_empty());
        let diags = scan_with(&source, DiscardPolicy::CountsAsUnused);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_parenthesized_statement_still_warns() {
        let source = format!("{HEADER}fn handle() {{ (fetch()); }}\n");
        assert_eq!(scan(&source).len(), 1);
    }

    #[test]
    fn test_qualified_call_warns_with_full_name() {
        let source = "use outcome_core::Outcome;\n\
             mod api {\n\
                 use outcome_core::Outcome;\n\
                 pub fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
             }\n\
             fn handle() { api::fetch(); }\n";
        let diags = scan(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].operation.as_deref(), Some("api::fetch"));
    }

    #[test]
    fn test_method_call_statement_warns() {
        let source = "use outcome_core::Outcome;\n\
             struct Client;\n\
             impl Client {\n\
                 fn send(&self) -> Outcome<(), String> { Outcome::ok(()) }\n\
             }\n\
             fn handle(c: Client) { c.send(); }\n";
        let diags = scan(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].operation.as_deref(), Some("send"));
    }
}
