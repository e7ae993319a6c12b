//! The linter's semantic model: path resolution, structural types, and
//! project symbols.
//!
//! This layer stands in for a compiler front-end. It resolves exactly as
//! much as the analyses need (imports, type aliases, signatures, local
//! bindings) and answers "unknown" for everything else, so downstream
//! passes stay silent instead of guessing.

pub mod paths;
pub mod symbols;
pub mod types;

pub use paths::{path_segments, segments_to_string, FileScope, ModulePathContext, UseMap};
pub use symbols::{
    collect_bindings, collect_file_symbols, infer_expr_type, AliasDef, FileSymbols, FnSig,
    SymbolTable,
};
pub use types::TypeRef;
