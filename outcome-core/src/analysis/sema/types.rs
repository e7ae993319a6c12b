//! Structural type references.
//!
//! [`TypeRef`] is the linter's view of a written type: a resolved path head
//! with structural generic arguments, a future (for `impl Future` and
//! `dyn Future` forms), or an opaque blob the analyses will not reason
//! about. Resolution of the path head happens at construction time against
//! the file's [`FileScope`], so downstream identity checks compare resolved
//! paths rather than surface spellings.

use std::fmt;

use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

use super::paths::FileScope;

/// A structural view of a written type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A nominal type: resolved path segments plus generic type arguments.
    Path {
        segments: Vec<String>,
        args: Vec<TypeRef>,
    },
    /// A future with a known output type (`impl Future<Output = T>`,
    /// `dyn Future<Output = T>`, or an `async fn`'s call type).
    Future { output: Box<TypeRef> },
    /// Anything the analyses do not model (tuples, closures, macros, ...).
    Opaque,
}

impl TypeRef {
    /// A plain named type with no generic arguments.
    pub fn named(segments: &[&str]) -> Self {
        Self::Path {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            args: Vec::new(),
        }
    }

    /// Build a reference from a syn type, resolving the head through the
    /// file scope. Unmodeled shapes come back [`TypeRef::Opaque`].
    pub fn from_syn(ty: &Type, scope: &FileScope) -> Self {
        match ty {
            Type::Path(tp) => {
                if tp.qself.is_some() {
                    return Self::Opaque;
                }
                let raw: Vec<String> = tp
                    .path
                    .segments
                    .iter()
                    .map(|s| s.ident.to_string())
                    .collect();
                let segments = scope.resolve_type_path(&raw);
                let args = tp
                    .path
                    .segments
                    .last()
                    .map(|last| generic_type_args(&last.arguments, scope))
                    .unwrap_or_default();
                Self::Path { segments, args }
            }
            Type::Reference(r) => Self::from_syn(&r.elem, scope),
            Type::Paren(p) => Self::from_syn(&p.elem, scope),
            Type::Group(g) => Self::from_syn(&g.elem, scope),
            Type::TraitObject(t) => future_from_bounds(t.bounds.iter(), scope),
            Type::ImplTrait(t) => future_from_bounds(t.bounds.iter(), scope),
            _ => Self::Opaque,
        }
    }

    /// Last path segment, when this is a nominal type.
    pub fn head(&self) -> Option<&str> {
        match self {
            Self::Path { segments, .. } => segments.last().map(String::as_str),
            _ => None,
        }
    }

    /// Replace occurrences of the named generic parameters with concrete
    /// arguments, used when expanding a type alias definition.
    pub fn substitute(&self, params: &[String], actual: &[TypeRef]) -> Self {
        match self {
            Self::Path { segments, args } => {
                if segments.len() == 1 && args.is_empty() {
                    if let Some(pos) = params.iter().position(|p| p == &segments[0]) {
                        if let Some(replacement) = actual.get(pos) {
                            return replacement.clone();
                        }
                    }
                }
                Self::Path {
                    segments: segments.clone(),
                    args: args.iter().map(|a| a.substitute(params, actual)).collect(),
                }
            }
            Self::Future { output } => Self::Future {
                output: Box::new(output.substitute(params, actual)),
            },
            Self::Opaque => Self::Opaque,
        }
    }
}

/// Extract the type arguments of a path segment, skipping lifetimes.
fn generic_type_args(arguments: &PathArguments, scope: &FileScope) -> Vec<TypeRef> {
    match arguments {
        PathArguments::AngleBracketed(ab) => ab
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(TypeRef::from_syn(ty, scope)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Recognize a `Future<Output = T>` bound in a trait object or impl-trait.
fn future_from_bounds<'a>(
    bounds: impl Iterator<Item = &'a TypeParamBound>,
    scope: &FileScope,
) -> TypeRef {
    for bound in bounds {
        let TypeParamBound::Trait(tb) = bound else {
            continue;
        };
        let Some(last) = tb.path.segments.last() else {
            continue;
        };
        if last.ident != "Future" {
            continue;
        }
        if let PathArguments::AngleBracketed(ab) = &last.arguments {
            for arg in &ab.args {
                if let GenericArgument::AssocType(assoc) = arg {
                    if assoc.ident == "Output" {
                        return TypeRef::Future {
                            output: Box::new(TypeRef::from_syn(&assoc.ty, scope)),
                        };
                    }
                }
            }
        }
    }
    TypeRef::Opaque
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { segments, args } => {
                // Short name reads better in messages than the full path.
                let name = segments.last().map(String::as_str).unwrap_or("_");
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Self::Future { output } => write!(f, "impl Future<Output = {output}>"),
            Self::Opaque => write!(f, "_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scope(source: &str) -> FileScope {
        let ast = syn::parse_file(source).unwrap();
        FileScope::new(&PathBuf::from("src/lib.rs"), &ast)
    }

    fn parse_type(ty: &str) -> Type {
        syn::parse_str(ty).unwrap()
    }

    #[test]
    fn test_simple_path_type() {
        let s = scope("");
        let tref = TypeRef::from_syn(&parse_type("i32"), &s);
        assert_eq!(tref, TypeRef::named(&["i32"]));
        assert_eq!(tref.to_string(), "i32");
    }

    #[test]
    fn test_generic_path_type_resolves_head() {
        let s = scope("use outcome_core::Outcome;");
        let tref = TypeRef::from_syn(&parse_type("Outcome<i32, String>"), &s);
        match &tref {
            TypeRef::Path { segments, args } => {
                assert_eq!(segments, &["outcome_core", "Outcome"]);
                assert_eq!(args.len(), 2);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        assert_eq!(tref.to_string(), "Outcome<i32, String>");
    }

    #[test]
    fn test_reference_is_stripped() {
        let s = scope("");
        let tref = TypeRef::from_syn(&parse_type("&mut Vec<u8>"), &s);
        assert_eq!(tref.head(), Some("Vec"));
    }

    #[test]
    fn test_lifetimes_are_skipped() {
        let s = scope("");
        let tref = TypeRef::from_syn(&parse_type("Cow<'a, str>"), &s);
        match tref {
            TypeRef::Path { args, .. } => assert_eq!(args.len(), 1),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_dyn_future_output() {
        let s = scope("use outcome_core::Outcome;");
        let tref = TypeRef::from_syn(
            &parse_type("Pin<Box<dyn Future<Output = Outcome<i32, String>>>>"),
            &s,
        );
        // The Pin head itself is a nominal path; unwrapping happens in the
        // identity layer. The inner trait object is reachable via its args.
        assert_eq!(tref.head(), Some("Pin"));
    }

    #[test]
    fn test_impl_future_output() {
        let s = scope("");
        let tref = TypeRef::from_syn(&parse_type("impl Future<Output = u8>"), &s);
        assert_eq!(
            tref,
            TypeRef::Future {
                output: Box::new(TypeRef::named(&["u8"]))
            }
        );
    }

    #[test]
    fn test_unmodeled_shapes_are_opaque() {
        let s = scope("");
        assert_eq!(TypeRef::from_syn(&parse_type("(i32, u8)"), &s), TypeRef::Opaque);
        assert_eq!(
            TypeRef::from_syn(&parse_type("fn(i32) -> u8"), &s),
            TypeRef::Opaque
        );
    }

    #[test]
    fn test_substitute_alias_params() {
        let s = scope("use outcome_core::Outcome;");
        let target = TypeRef::from_syn(&parse_type("Outcome<T, ApiError>"), &s);
        let substituted = target.substitute(&["T".to_string()], &[TypeRef::named(&["u32"])]);
        match substituted {
            TypeRef::Path { args, .. } => {
                assert_eq!(args[0], TypeRef::named(&["u32"]));
                assert_eq!(args[1].head(), Some("ApiError"));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
