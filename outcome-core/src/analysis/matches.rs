//! Match expression extraction.
//!
//! Walks a parsed file, classifies every `match` scrutinee through the
//! identity layer, and records each arm's pattern text, case coverage, and
//! byte offsets. The records are plain data: the exhaustiveness pass, the
//! generic lint, the suppressor, and the arm synthesizer all work from
//! them without touching the syntax tree again.

use std::collections::HashMap;

use quote::ToTokens;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{ExprMatch, ImplItemFn, ItemFn, Pat};

use super::identity::{self, CaseRole, TypeShape};
use super::sema::{collect_bindings, infer_expr_type, FileScope, SymbolTable, TypeRef};

/// Which cases a single arm covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmCoverage {
    pub ok: bool,
    pub err: bool,
    pub catch_all: bool,
}

impl ArmCoverage {
    fn union(self, other: Self) -> Self {
        Self {
            ok: self.ok || other.ok,
            err: self.err || other.err,
            catch_all: self.catch_all || other.catch_all,
        }
    }
}

/// One arm of a recorded match.
#[derive(Debug, Clone)]
pub struct ArmRecord {
    /// Readable pattern text.
    pub pattern_text: String,
    /// Whitespace-free pattern text, used for duplicate detection.
    pub pattern_key: String,
    pub coverage: ArmCoverage,
    pub has_guard: bool,
    /// A guarded arm may decline at runtime, so only an unguarded
    /// wildcard/binding counts as a real catch-all.
    pub is_catch_all: bool,
    /// True when the pattern names cases of some nominal type.
    pub is_nominal: bool,
    /// Path prefix of a classified Ok/Err pattern, e.g. `Outcome`.
    pub head: Option<String>,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// A recorded match expression.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub file: String,
    /// 1-based position of the `match` keyword.
    pub kw_line: usize,
    pub kw_column: usize,
    /// Byte range of the `match` keyword.
    pub kw_span: (usize, usize),
    /// Byte offset just past the opening `{` of the match body.
    pub body_open_end: usize,
    /// Byte offset of the closing `}` of the match body.
    pub body_close_start: usize,
    /// Indentation of the line holding the `match` keyword.
    pub indent: String,
    pub shape: TypeShape,
    /// Rendered scrutinee type, when inference succeeded.
    pub scrutinee_display: Option<String>,
    pub arms: Vec<ArmRecord>,
}

impl MatchRecord {
    pub fn has_catch_all(&self) -> bool {
        self.arms.iter().any(|a| a.is_catch_all)
    }

    pub fn has_nominal_arm(&self) -> bool {
        self.arms.iter().any(|a| a.is_nominal)
    }
}

/// Extract every match expression in a parsed file.
pub fn scan_matches(
    file: &str,
    content: &str,
    ast: &syn::File,
    scope: &FileScope,
    symbols: &SymbolTable,
) -> Vec<MatchRecord> {
    let mut scanner = MatchScanner {
        file,
        content,
        scope,
        symbols,
        bindings: Vec::new(),
        matches: Vec::new(),
    };
    scanner.visit_file(ast);
    scanner.matches
}

struct MatchScanner<'a> {
    file: &'a str,
    content: &'a str,
    scope: &'a FileScope,
    symbols: &'a SymbolTable,
    bindings: Vec<HashMap<String, TypeRef>>,
    matches: Vec<MatchRecord>,
}

impl MatchScanner<'_> {
    fn current_bindings(&self) -> HashMap<String, TypeRef> {
        self.bindings.last().cloned().unwrap_or_default()
    }

    fn record_match(&mut self, m: &ExprMatch) {
        let bindings = self.current_bindings();
        let scrutinee = infer_expr_type(&m.expr, &bindings, self.scope, self.symbols);
        let shape = scrutinee
            .as_ref()
            .map(|ty| identity::classify(ty, self.scope, self.symbols))
            .unwrap_or(TypeShape::Other);
        let scrutinee_display = scrutinee.as_ref().map(|ty| {
            self.symbols
                .resolve_alias_chain(ty, self.scope)
                .to_string()
        });

        let kw_span = m.match_token.span;
        let kw_range = kw_span.byte_range();
        let start = kw_span.start();

        let arms = m.arms.iter().map(|arm| self.record_arm(arm)).collect();

        self.matches.push(MatchRecord {
            file: self.file.to_string(),
            kw_line: start.line,
            kw_column: start.column + 1,
            kw_span: (kw_range.start, kw_range.end),
            body_open_end: m.brace_token.span.open().byte_range().end,
            body_close_start: m.brace_token.span.close().byte_range().start,
            indent: line_indent(self.content, kw_range.start),
            shape,
            scrutinee_display,
            arms,
        });
    }

    fn record_arm(&self, arm: &syn::Arm) -> ArmRecord {
        let info = pattern_info(&arm.pat, self.scope, self.symbols);
        let has_guard = arm.guard.is_some();
        let pattern_text = tidy_tokens(&arm.pat.to_token_stream().to_string());

        let start_offset = arm.pat.span().byte_range().start;
        let end_offset = match &arm.comma {
            Some(comma) => comma.span().byte_range().end,
            None => arm.body.span().byte_range().end,
        };

        ArmRecord {
            pattern_key: pattern_key(&pattern_text),
            pattern_text,
            coverage: if has_guard {
                ArmCoverage::default()
            } else {
                info.coverage
            },
            has_guard,
            is_catch_all: info.coverage.catch_all && !has_guard,
            is_nominal: info.nominal,
            head: info.head,
            start_offset,
            end_offset,
        }
    }
}

impl<'ast> Visit<'ast> for MatchScanner<'_> {
    fn visit_item_fn(&mut self, f: &'ast ItemFn) {
        self.bindings
            .push(collect_bindings(&f.sig, &f.block, self.scope, self.symbols));
        syn::visit::visit_item_fn(self, f);
        self.bindings.pop();
    }

    fn visit_impl_item_fn(&mut self, f: &'ast ImplItemFn) {
        self.bindings
            .push(collect_bindings(&f.sig, &f.block, self.scope, self.symbols));
        syn::visit::visit_impl_item_fn(self, f);
        self.bindings.pop();
    }

    fn visit_expr_match(&mut self, m: &'ast ExprMatch) {
        self.record_match(m);
        syn::visit::visit_expr_match(self, m);
    }
}

struct PatInfo {
    coverage: ArmCoverage,
    nominal: bool,
    head: Option<String>,
}

fn pattern_info(pat: &Pat, scope: &FileScope, symbols: &SymbolTable) -> PatInfo {
    let mut info = PatInfo {
        coverage: ArmCoverage::default(),
        nominal: false,
        head: None,
    };
    fold_pattern(pat, scope, symbols, &mut info);
    info
}

fn fold_pattern(pat: &Pat, scope: &FileScope, symbols: &SymbolTable, info: &mut PatInfo) {
    match pat {
        Pat::Wild(_) => {
            info.coverage = info.coverage.union(ArmCoverage {
                ok: true,
                err: true,
                catch_all: true,
            });
        }
        Pat::Ident(pi) => match &pi.subpat {
            Some((_, sub)) => fold_pattern(sub, scope, symbols, info),
            None => {
                info.coverage = info.coverage.union(ArmCoverage {
                    ok: true,
                    err: true,
                    catch_all: true,
                });
            }
        },
        Pat::TupleStruct(ts) => {
            info.nominal = true;
            apply_case(&ts.path, scope, symbols, info);
        }
        Pat::Struct(ps) => {
            info.nominal = true;
            apply_case(&ps.path, scope, symbols, info);
        }
        Pat::Path(pp) => {
            info.nominal = true;
            apply_case(&pp.path, scope, symbols, info);
        }
        Pat::Or(po) => {
            for case in &po.cases {
                fold_pattern(case, scope, symbols, info);
            }
        }
        Pat::Paren(pp) => fold_pattern(&pp.pat, scope, symbols, info),
        Pat::Reference(pr) => fold_pattern(&pr.pat, scope, symbols, info),
        _ => {}
    }
}

fn apply_case(path: &syn::Path, scope: &FileScope, symbols: &SymbolTable, info: &mut PatInfo) {
    let role = identity::case_of(path, scope, symbols);
    match role {
        CaseRole::Ok => info.coverage.ok = true,
        CaseRole::Err => info.coverage.err = true,
        CaseRole::Neither => return,
    }
    if info.head.is_none() {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        if segments.len() > 1 {
            info.head = Some(segments[..segments.len() - 1].join("::"));
        }
    }
}

/// Indentation of the line containing `offset`.
pub fn line_indent(content: &str, offset: usize) -> String {
    let line_start = content[..offset.min(content.len())]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    content[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Clean up token-stream spacing for display.
fn tidy_tokens(raw: &str) -> String {
    raw.replace(" :: ", "::")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(" ,", ",")
        .replace("& ", "&")
}

/// Whitespace-free form used to compare patterns for duplication.
pub fn pattern_key(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sema::collect_file_symbols;
    use std::path::PathBuf;

    fn scan(source: &str) -> Vec<MatchRecord> {
        let ast = syn::parse_file(source).unwrap();
        let scope = FileScope::new(&PathBuf::from("src/lib.rs"), &ast);
        let mut symbols = SymbolTable::default();
        symbols.merge(collect_file_symbols(&scope, &ast));
        symbols.finalize();
        scan_matches("src/lib.rs", source, &ast, &scope, &symbols)
    }

    const HEADER: &str = "use outcome_core::Outcome;\n\
         fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n";

    #[test]
    fn test_records_outcome_match_with_both_arms() {
        let source = format!(
            "{HEADER}\
             fn handle() {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(v, _) => drop(v),\n\
                     Outcome::Err(e, _) => drop(e),\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert!(matches!(m.shape, TypeShape::Direct(_)));
        assert_eq!(m.arms.len(), 2);
        assert!(m.arms[0].coverage.ok);
        assert!(m.arms[1].coverage.err);
        assert!(!m.has_catch_all());
        assert_eq!(m.arms[0].head.as_deref(), Some("Outcome"));
        assert_eq!(m.scrutinee_display.as_deref(), Some("Outcome<i32, String>"));
    }

    #[test]
    fn test_wildcard_and_binding_are_catch_all() {
        let source = format!(
            "{HEADER}\
             fn handle() {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(v, _) => drop(v),\n\
                     other => drop(other),\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        assert!(matches[0].has_catch_all());
    }

    #[test]
    fn test_guarded_wildcard_is_not_catch_all() {
        let source = format!(
            "{HEADER}\
             fn handle(flag: bool) {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(v, _) => drop(v),\n\
                     _ if flag => {{}}\n\
                     Outcome::Err(e, _) => drop(e),\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        let m = &matches[0];
        assert!(!m.has_catch_all());
        assert!(m.arms[1].has_guard);
        assert_eq!(m.arms[1].coverage, ArmCoverage::default());
    }

    #[test]
    fn test_or_pattern_covers_both_cases() {
        let source = format!(
            "{HEADER}\
             fn handle() {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(_, _) | Outcome::Err(_, _) => {{}}\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        let arm = &matches[0].arms[0];
        assert!(arm.coverage.ok && arm.coverage.err);
        assert!(!arm.is_catch_all);
    }

    #[test]
    fn test_annotated_local_scrutinee() {
        let source = "use outcome_core::Outcome;\n\
             fn handle(r: Outcome<u8, bool>) {\n\
                 match r {\n\
                     Outcome::Ok(v, _) => drop(v),\n\
                 }\n\
             }\n";
        let matches = scan(source);
        assert!(matches!(matches[0].shape, TypeShape::Direct(_)));
    }

    #[test]
    fn test_unknown_scrutinee_is_other() {
        let source = "fn handle(x: i32) {\n\
                 match mystery(x) {\n\
                     1 => {}\n\
                     _ => {}\n\
                 }\n\
             }\n";
        let matches = scan(source);
        assert_eq!(matches[0].shape, TypeShape::Other);
        assert!(!matches[0].has_nominal_arm());
    }

    #[test]
    fn test_lookalike_variants_stay_unclassified() {
        let source = "enum Status { Ok(i32), Err(String) }\n\
             fn handle(s: Status) {\n\
                 match s {\n\
                     Status::Ok(v) => drop(v),\n\
                     Status::Err(e) => drop(e),\n\
                 }\n\
             }\n";
        let matches = scan(source);
        let m = &matches[0];
        assert!(m.has_nominal_arm());
        assert!(!m.arms[0].coverage.ok);
        assert!(!m.arms[1].coverage.err);
    }

    #[test]
    fn test_offsets_and_indent() {
        let source = format!(
            "{HEADER}\
             fn handle() {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(v, _) => drop(v),\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        let m = &matches[0];
        assert_eq!(&source[m.kw_span.0..m.kw_span.1], "match");
        assert_eq!(&source[m.body_close_start..m.body_close_start + 1], "}");
        assert!(m.body_open_end > m.kw_span.1);
        let arm = &m.arms[0];
        assert!(source[arm.start_offset..arm.end_offset].starts_with("Outcome::Ok"));
        assert!(source[arm.start_offset..arm.end_offset].ends_with(','));
    }

    #[test]
    fn test_nested_match_is_recorded() {
        let source = format!(
            "{HEADER}\
             fn handle() {{\n\
                 match fetch() {{\n\
                     Outcome::Ok(v, _) => match fetch() {{\n\
                         Outcome::Err(e, _) => drop(e),\n\
                         _ => drop(v),\n\
                     }},\n\
                     Outcome::Err(_, _) => {{}}\n\
                 }}\n\
             }}\n"
        );
        let matches = scan(&source);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_pattern_key_ignores_whitespace() {
        assert_eq!(
            pattern_key("Outcome::Ok(v, _)"),
            pattern_key("Outcome::Ok( v , _ )")
        );
    }
}
