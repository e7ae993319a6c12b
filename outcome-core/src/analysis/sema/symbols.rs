//! Project symbol collection and local type inference.
//!
//! One pass over every file collects the symbols the analyses need: type
//! aliases (the ancestor chain a written type resolves through), free
//! function signatures, and inherent methods. A second, per-function pass
//! builds a flat table of local bindings from parameter and `let`
//! annotations. Both are deliberately approximate - this is a linter
//! working from syntax, not a type checker - and anything unresolvable
//! simply stays unknown.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use syn::visit::Visit;
use syn::{Block, Expr, FnArg, Item, Pat, ReturnType, Signature, Type};
use tracing::warn;

use super::paths::{path_segments, segments_to_string, FileScope};
use super::types::TypeRef;

/// A `type Alias<P...> = Target;` definition.
#[derive(Debug, Clone)]
pub struct AliasDef {
    pub params: Vec<String>,
    pub target: TypeRef,
}

/// A callable's signature, reduced to what the analyses consume.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub name: String,
    pub is_async: bool,
    pub ret: Option<TypeRef>,
}

impl FnSig {
    /// The static type of a call to this signature. An `async fn` call
    /// produces a future of the written return type.
    pub fn call_type(&self) -> TypeRef {
        let ret = self.ret.clone().unwrap_or(TypeRef::Opaque);
        if self.is_async {
            TypeRef::Future {
                output: Box::new(ret),
            }
        } else {
            ret
        }
    }
}

/// Symbols extracted from one file, merged into the project table.
#[derive(Debug, Default)]
pub struct FileSymbols {
    aliases: HashMap<String, AliasDef>,
    functions: HashMap<String, FnSig>,
    methods: HashMap<String, Vec<FnSig>>,
}

/// Project-wide symbol table shared immutably across analysis workers.
#[derive(Debug, Default)]
pub struct SymbolTable {
    aliases: HashMap<String, AliasDef>,
    functions: HashMap<String, FnSig>,
    methods: HashMap<String, Vec<FnSig>>,
}

impl SymbolTable {
    pub fn merge(&mut self, file: FileSymbols) {
        self.aliases.extend(file.aliases);
        self.functions.extend(file.functions);
        for (name, sigs) in file.methods {
            self.methods.entry(name).or_default().extend(sigs);
        }
    }

    /// Drop alias definitions that participate in a reference cycle.
    ///
    /// A cyclic alias chain can never resolve to a concrete type, and
    /// leaving it in the table would force every resolution to carry a
    /// cycle guard.
    pub fn finalize(&mut self) {
        let keys: Vec<String> = self.aliases.keys().cloned().collect();
        let index: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect();

        let mut graph: DiGraph<(), ()> = DiGraph::new();
        let nodes: Vec<_> = keys.iter().map(|_| graph.add_node(())).collect();
        for (i, key) in keys.iter().enumerate() {
            if let Some(def) = self.aliases.get(key) {
                if let TypeRef::Path { segments, .. } = &def.target {
                    if let Some(&j) = index.get(segments_to_string(segments).as_str()) {
                        graph.add_edge(nodes[i], nodes[j], ());
                    }
                }
            }
        }

        for scc in tarjan_scc(&graph) {
            let cyclic = scc.len() > 1
                || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0]));
            if cyclic {
                for node in scc {
                    let key = &keys[node.index()];
                    warn!(alias = %key, "dropping cyclic type alias");
                    self.aliases.remove(key);
                }
            }
        }
    }

    /// Expand a type through its alias chain until a non-alias head is
    /// reached. Generic alias parameters are substituted positionally.
    pub fn resolve_alias_chain(&self, ty: &TypeRef, scope: &FileScope) -> TypeRef {
        let mut current = ty.clone();
        // Depth cap as a belt against tables built without finalize().
        for _ in 0..32 {
            let TypeRef::Path { segments, args } = &current else {
                break;
            };
            let def = self.aliases.get(&segments_to_string(segments)).or_else(|| {
                if segments.len() == 1 {
                    let mut key = scope.ctx.segments.clone();
                    key.push(segments[0].clone());
                    self.aliases.get(&segments_to_string(&key))
                } else {
                    None
                }
            });
            match def {
                Some(alias) => current = alias.target.substitute(&alias.params, args),
                None => break,
            }
        }
        current
    }

    /// Look up a free function (or inherent associated function) by its
    /// resolved path.
    pub fn function(&self, resolved: &[String]) -> Option<&FnSig> {
        self.functions.get(&segments_to_string(resolved))
    }

    /// Look up a method by bare name. Ambiguous names resolve to nothing,
    /// which keeps the usage lint free of cross-type false positives.
    pub fn method(&self, name: &str) -> Option<&FnSig> {
        match self.methods.get(name).map(Vec::as_slice) {
            Some([only]) => Some(only),
            _ => None,
        }
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

/// Collect the symbols of one parsed file.
pub fn collect_file_symbols(scope: &FileScope, ast: &syn::File) -> FileSymbols {
    let mut out = FileSymbols::default();
    collect_items(&ast.items, scope, &scope.ctx.segments.clone(), &mut out);
    out
}

fn collect_items(items: &[Item], scope: &FileScope, module: &[String], out: &mut FileSymbols) {
    for item in items {
        match item {
            Item::Type(alias) => {
                let params: Vec<String> = alias
                    .generics
                    .type_params()
                    .map(|p| p.ident.to_string())
                    .collect();
                let mut key = module.to_vec();
                key.push(alias.ident.to_string());
                out.aliases.insert(
                    segments_to_string(&key),
                    AliasDef {
                        params,
                        target: TypeRef::from_syn(&alias.ty, scope),
                    },
                );
            }
            Item::Fn(f) => {
                let sig = reduce_signature(&f.sig, scope);
                let mut key = module.to_vec();
                key.push(sig.name.clone());
                out.functions.insert(segments_to_string(&key), sig);
            }
            Item::Impl(imp) => {
                let owner = match &*imp.self_ty {
                    Type::Path(tp) => tp.path.segments.last().map(|s| s.ident.to_string()),
                    _ => None,
                };
                for member in &imp.items {
                    if let syn::ImplItem::Fn(m) = member {
                        let sig = reduce_signature(&m.sig, scope);
                        if let Some(owner) = &owner {
                            let mut key = module.to_vec();
                            key.push(owner.clone());
                            key.push(sig.name.clone());
                            out.functions.insert(segments_to_string(&key), sig.clone());
                        }
                        out.methods.entry(sig.name.clone()).or_default().push(sig);
                    }
                }
            }
            Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    let mut inner = module.to_vec();
                    inner.push(m.ident.to_string());
                    collect_items(nested, scope, &inner, out);
                }
            }
            _ => {}
        }
    }
}

fn reduce_signature(sig: &Signature, scope: &FileScope) -> FnSig {
    let ret = match &sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(TypeRef::from_syn(ty, scope)),
    };
    FnSig {
        name: sig.ident.to_string(),
        is_async: sig.asyncness.is_some(),
        ret,
    }
}

/// Flat table of a function body's typed local bindings.
///
/// Parameters and annotated `let`s contribute directly; an unannotated
/// `let x = f();` picks up the call's signature when it resolves. Later
/// bindings shadow earlier ones, which matches reading order.
pub fn collect_bindings(
    sig: &Signature,
    block: &Block,
    scope: &FileScope,
    symbols: &SymbolTable,
) -> HashMap<String, TypeRef> {
    let mut bindings = HashMap::new();
    for input in &sig.inputs {
        if let FnArg::Typed(pt) = input {
            if let Pat::Ident(pi) = &*pt.pat {
                bindings.insert(pi.ident.to_string(), TypeRef::from_syn(&pt.ty, scope));
            }
        }
    }

    let mut collector = BindingCollector {
        scope,
        symbols,
        bindings,
    };
    collector.visit_block(block);
    collector.bindings
}

struct BindingCollector<'a> {
    scope: &'a FileScope,
    symbols: &'a SymbolTable,
    bindings: HashMap<String, TypeRef>,
}

impl<'ast> Visit<'ast> for BindingCollector<'_> {
    fn visit_local(&mut self, local: &'ast syn::Local) {
        match &local.pat {
            Pat::Type(pt) => {
                if let Pat::Ident(pi) = &*pt.pat {
                    self.bindings
                        .insert(pi.ident.to_string(), TypeRef::from_syn(&pt.ty, self.scope));
                }
            }
            Pat::Ident(pi) => {
                if let Some(init) = &local.init {
                    if let Some(inferred) =
                        infer_expr_type(&init.expr, &self.bindings, self.scope, self.symbols)
                    {
                        self.bindings.insert(pi.ident.to_string(), inferred);
                    }
                }
            }
            _ => {}
        }
        syn::visit::visit_local(self, local);
    }
}

/// Best-effort static type of an expression.
///
/// Covers the shapes the analyses care about: locals, calls to known
/// functions, single-candidate method calls, awaits over known futures,
/// and syntactic wrappers around those. Everything else is unknown.
pub fn infer_expr_type(
    expr: &Expr,
    bindings: &HashMap<String, TypeRef>,
    scope: &FileScope,
    symbols: &SymbolTable,
) -> Option<TypeRef> {
    match expr {
        Expr::Path(p) if p.qself.is_none() && p.path.segments.len() == 1 => {
            let name = p.path.segments[0].ident.to_string();
            bindings.get(&name).cloned()
        }
        Expr::Call(c) => {
            let Expr::Path(p) = &*c.func else {
                return None;
            };
            let resolved = scope.resolve_value_path(&path_segments(&p.path));
            symbols.function(&resolved).map(FnSig::call_type)
        }
        Expr::MethodCall(mc) => symbols.method(&mc.method.to_string()).map(FnSig::call_type),
        Expr::Await(a) => {
            match infer_expr_type(&a.base, bindings, scope, symbols) {
                Some(TypeRef::Future { output }) => Some(*output),
                _ => None,
            }
        }
        Expr::Reference(r) => infer_expr_type(&r.expr, bindings, scope, symbols),
        Expr::Paren(p) => infer_expr_type(&p.expr, bindings, scope, symbols),
        Expr::Group(g) => infer_expr_type(&g.expr, bindings, scope, symbols),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table_for(source: &str) -> (SymbolTable, FileScope) {
        let ast = syn::parse_file(source).unwrap();
        let scope = FileScope::new(&PathBuf::from("src/lib.rs"), &ast);
        let mut table = SymbolTable::default();
        table.merge(collect_file_symbols(&scope, &ast));
        table.finalize();
        (table, scope)
    }

    #[test]
    fn test_collects_free_functions() {
        let (table, _) = table_for(
            "use outcome_core::Outcome;\n\
             fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
             async fn fetch_later() -> Outcome<i32, String> { Outcome::ok(1) }",
        );
        let fetch = table.function(&["fetch".to_string()]).unwrap();
        assert!(!fetch.is_async);
        assert_eq!(fetch.ret.as_ref().unwrap().head(), Some("Outcome"));

        let later = table.function(&["fetch_later".to_string()]).unwrap();
        assert!(later.is_async);
        match later.call_type() {
            TypeRef::Future { output } => assert_eq!(output.head(), Some("Outcome")),
            other => panic!("unexpected call type: {other:?}"),
        }
    }

    #[test]
    fn test_collects_inherent_methods() {
        let (table, _) = table_for(
            "struct Client;\n\
             impl Client {\n\
                 fn ping(&self) -> bool { true }\n\
             }",
        );
        assert!(table.method("ping").is_some());
        assert!(table.function(&["Client".to_string(), "ping".to_string()]).is_some());
    }

    #[test]
    fn test_ambiguous_method_names_resolve_to_nothing() {
        let (table, _) = table_for(
            "struct A; struct B;\n\
             impl A { fn go(&self) -> i32 { 1 } }\n\
             impl B { fn go(&self) -> bool { true } }",
        );
        assert!(table.method("go").is_none());
    }

    #[test]
    fn test_alias_chain_resolution() {
        let (table, scope) = table_for(
            "use outcome_core::Outcome;\n\
             type ApiError = String;\n\
             type ApiResult<T> = Outcome<T, ApiError>;\n\
             type UserResult = ApiResult<u32>;",
        );
        let written = TypeRef::named(&["UserResult"]);
        let resolved = table.resolve_alias_chain(&written, &scope);
        match resolved {
            TypeRef::Path { segments, args } => {
                assert_eq!(segments, vec!["outcome_core", "Outcome"]);
                assert_eq!(args[0], TypeRef::named(&["u32"]));
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn test_cyclic_aliases_are_dropped() {
        let (table, scope) = table_for("type A = B;\ntype B = A;");
        assert_eq!(table.alias_count(), 0);
        let resolved = table.resolve_alias_chain(&TypeRef::named(&["A"]), &scope);
        assert_eq!(resolved, TypeRef::named(&["A"]));
    }

    #[test]
    fn test_nested_module_paths() {
        let (table, _) = table_for(
            "mod api {\n\
                 pub fn fetch() -> i32 { 1 }\n\
             }",
        );
        assert!(table
            .function(&["api".to_string(), "fetch".to_string()])
            .is_some());
    }

    #[test]
    fn test_bindings_from_params_and_lets() {
        let source = "use outcome_core::Outcome;\n\
             fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
             fn handler(seed: u32) {\n\
                 let annotated: Outcome<i32, String> = fetch();\n\
                 let inferred = fetch();\n\
                 let unknown = mystery();\n\
             }";
        let ast = syn::parse_file(source).unwrap();
        let scope = FileScope::new(&PathBuf::from("src/lib.rs"), &ast);
        let mut table = SymbolTable::default();
        table.merge(collect_file_symbols(&scope, &ast));
        table.finalize();

        let Item::Fn(handler) = &ast.items[2] else {
            panic!("expected handler fn");
        };
        let bindings = collect_bindings(&handler.sig, &handler.block, &scope, &table);

        assert_eq!(bindings.get("seed"), Some(&TypeRef::named(&["u32"])));
        assert_eq!(bindings.get("annotated").and_then(|t| t.head()), Some("Outcome"));
        assert_eq!(bindings.get("inferred").and_then(|t| t.head()), Some("Outcome"));
        assert!(!bindings.contains_key("unknown"));
    }

    #[test]
    fn test_infer_await_unwraps_future() {
        let source = "use outcome_core::Outcome;\n\
             async fn fetch() -> Outcome<i32, String> { Outcome::ok(1) }\n\
             fn placeholder() {}";
        let (table, scope) = table_for(source);
        let bindings = HashMap::new();

        let call: Expr = syn::parse_str("fetch()").unwrap();
        match infer_expr_type(&call, &bindings, &scope, &table) {
            Some(TypeRef::Future { .. }) => {}
            other => panic!("expected future, got {other:?}"),
        }

        let awaited: Expr = syn::parse_str("fetch().await").unwrap();
        let inferred = infer_expr_type(&awaited, &bindings, &scope, &table).unwrap();
        assert_eq!(inferred.head(), Some("Outcome"));
    }
}
