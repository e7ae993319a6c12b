//! Deciding whether a type is `Outcome`-shaped and which case a pattern
//! names.
//!
//! Identity is resolution-based, never name-based: a type or pattern counts
//! only when its path resolves (through the file's imports and the
//! project's alias chain) to the canonical two-parameter `Outcome`. An
//! unrelated type that happens to be called `Outcome`, or an enum with
//! variants spelled `Ok`/`Err`, resolves elsewhere and is rejected.

use syn::Path;

use super::sema::{paths, FileScope, SymbolTable, TypeRef};

/// Names under which the async wrapper types are recognized. One layer of
/// these (or an `async fn` call, or a `dyn`/`impl Future`) is unwrapped
/// when classifying; deeper nesting is deliberately not resolved.
const FUTURE_WRAPPERS: &[&str] = &["BoxFuture", "LocalBoxFuture", "JoinHandle"];

/// The concrete type arguments of an `Outcome` instantiation, rendered for
/// messages and payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instantiation {
    pub ok_ty: String,
    pub err_ty: String,
}

impl Instantiation {
    pub fn display(&self) -> String {
        format!("Outcome<{}, {}>", self.ok_ty, self.err_ty)
    }
}

/// Classification of a static type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Not `Outcome`-shaped.
    Other,
    /// Exactly `Outcome<V, E>` (possibly through aliases).
    Direct(Instantiation),
    /// One async/future layer around `Outcome<V, E>`.
    Wrapped(Instantiation),
}

impl TypeShape {
    pub fn instantiation(&self) -> Option<&Instantiation> {
        match self {
            Self::Direct(inst) | Self::Wrapped(inst) => Some(inst),
            Self::Other => None,
        }
    }
}

/// Which case of an `Outcome` a pattern names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRole {
    Ok,
    Err,
    Neither,
}

/// True when resolved segments name the canonical `Outcome` type.
///
/// Resolution evidence is required: a bare, import-free `Outcome` does not
/// qualify.
fn is_canonical_outcome(segments: &[String]) -> bool {
    segments.len() >= 2
        && paths::OUTCOME_CRATES.contains(&segments[0].as_str())
        && segments.last().is_some_and(|s| s == "Outcome")
}

/// Classify a type as `Outcome`-shaped, async-wrapped, or other.
pub fn classify(ty: &TypeRef, scope: &FileScope, symbols: &SymbolTable) -> TypeShape {
    let resolved = symbols.resolve_alias_chain(ty, scope);

    if let Some(inst) = direct_instantiation(&resolved) {
        return TypeShape::Direct(inst);
    }

    // Unwrap exactly one async layer, then require a direct hit.
    if let Some(inner) = strip_async_layer(&resolved) {
        let inner = symbols.resolve_alias_chain(&inner, scope);
        if let Some(inst) = direct_instantiation(&inner) {
            return TypeShape::Wrapped(inst);
        }
    }

    TypeShape::Other
}

fn direct_instantiation(ty: &TypeRef) -> Option<Instantiation> {
    let TypeRef::Path { segments, args } = ty else {
        return None;
    };
    if !is_canonical_outcome(segments) || args.len() != 2 {
        return None;
    }
    Some(Instantiation {
        ok_ty: args[0].to_string(),
        err_ty: args[1].to_string(),
    })
}

/// Peel one future layer off a type, if it has one.
fn strip_async_layer(ty: &TypeRef) -> Option<TypeRef> {
    match ty {
        TypeRef::Future { output } => Some((**output).clone()),
        TypeRef::Path { segments, args } => {
            let head = segments.last()?.as_str();
            if FUTURE_WRAPPERS.contains(&head) {
                // BoxFuture<'a, T> keeps only type arguments, so T is last.
                return args.last().cloned();
            }
            if head == "Pin" {
                // Pin<Box<dyn Future<Output = T>>> counts as one layer.
                if let Some(TypeRef::Path {
                    segments: box_segments,
                    args: box_args,
                }) = args.first()
                {
                    if box_segments.last().is_some_and(|s| s == "Box") {
                        if let Some(TypeRef::Future { output }) = box_args.first() {
                            return Some((**output).clone());
                        }
                    }
                }
            }
            None
        }
        TypeRef::Opaque => None,
    }
}

/// Decide which case of the scrutinee's instantiation a pattern path names.
///
/// The path must resolve to the canonical `Outcome`'s `Ok` or `Err`; a bare
/// `Ok(..)`/`Err(..)` qualifies only when the variant itself was imported
/// from the outcome crate. Explicit generics on the pattern path are
/// ignored: re-typing one payload parameter does not change which case a
/// value is.
pub fn case_of(path: &Path, scope: &FileScope, symbols: &SymbolTable) -> CaseRole {
    let raw = paths::path_segments(path);
    let Some(variant) = raw.last() else {
        return CaseRole::Neither;
    };
    let role = match variant.as_str() {
        "Ok" => CaseRole::Ok,
        "Err" => CaseRole::Err,
        _ => return CaseRole::Neither,
    };

    if raw.len() == 1 {
        // A bare variant name must carry import evidence of its parent.
        let resolved = scope.resolve_type_path(&raw);
        if resolved.len() >= 2 && is_canonical_outcome(&resolved[..resolved.len() - 1]) {
            return role;
        }
        return CaseRole::Neither;
    }

    // Resolve the parent path (everything before the variant segment)
    // through imports and aliases.
    let parent = TypeRef::Path {
        segments: scope.resolve_type_path(&raw[..raw.len() - 1]),
        args: Vec::new(),
    };
    let parent = symbols.resolve_alias_chain(&parent, scope);
    match parent {
        TypeRef::Path { segments, .. } if is_canonical_outcome(&segments) => role,
        _ => CaseRole::Neither,
    }
}
