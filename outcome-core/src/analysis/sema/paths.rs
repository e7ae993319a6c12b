//! Import and path resolution for the analysis passes.
//!
//! The linter runs without the compiler, so names are resolved the same way
//! a reader would: through the file's `use` statements, then through
//! `crate`/`self`/`super` prefixes, then by position in the module tree.
//! Glob imports are tracked by their prefix so that well-known names from
//! the outcome crate can still be recognized behind `use ...::prelude::*`.

use std::collections::HashMap;
use std::path::Path;

use syn::{File, Item, UseTree};

/// Path prefixes under which the canonical `Outcome` type lives.
pub const OUTCOME_CRATES: &[&str] = &["outcome_core", "outcome"];

/// Names a glob import of the outcome crate is allowed to introduce.
const OUTCOME_GLOB_NAMES: &[&str] = &["Outcome", "Metadata", "MetaValue", "Caught"];

/// A file's position in its crate's module tree.
///
/// `src/api/v1/handler.rs` sits at `["api", "v1", "handler"]`; crate roots
/// (`lib.rs`, `main.rs`) and `mod.rs` files sit at their directory.
#[derive(Debug, Clone, Default)]
pub struct ModulePathContext {
    pub segments: Vec<String>,
}

impl ModulePathContext {
    /// Derive the module position from a path relative to the crate root.
    pub fn from_file_path(path: &Path) -> Self {
        let mut segments = Vec::new();
        let mut inside_src = false;

        for component in path.iter() {
            let part = component.to_string_lossy();
            if part == "src" {
                inside_src = true;
                segments.clear();
                continue;
            }
            if !inside_src {
                continue;
            }
            if part == "mod.rs" || part == "lib.rs" || part == "main.rs" {
                continue;
            }
            let segment = part.strip_suffix(".rs").unwrap_or(&part);
            segments.push(segment.to_string());
        }

        Self { segments }
    }

    /// Parent module position, used for `super::` resolution.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }
}

/// Maps names introduced by `use` statements to full path segments, plus
/// the prefixes of any glob imports.
#[derive(Debug, Clone, Default)]
pub struct UseMap {
    names: HashMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
}

impl UseMap {
    pub fn record(&mut self, local_name: String, full_path: Vec<String>) {
        self.names.insert(local_name, full_path);
    }

    pub fn record_glob(&mut self, prefix: Vec<String>) {
        self.globs.push(prefix);
    }

    pub fn resolve(&self, name: &str) -> Option<&[String]> {
        self.names.get(name).map(Vec::as_slice)
    }

    /// True when a glob import rooted in the outcome crate is in scope.
    pub fn has_outcome_glob(&self) -> bool {
        self.globs
            .iter()
            .any(|g| g.first().is_some_and(|s| OUTCOME_CRATES.contains(&s.as_str())))
    }
}

/// Per-file resolution scope: module position plus import table.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    pub ctx: ModulePathContext,
    pub usemap: UseMap,
}

impl FileScope {
    /// Build the scope for a parsed file.
    pub fn new(relative_path: &Path, ast: &File) -> Self {
        let ctx = ModulePathContext::from_file_path(relative_path);
        let mut usemap = UseMap::default();
        for item in &ast.items {
            if let Item::Use(u) = item {
                collect_use_tree(&u.tree, &ctx, &mut usemap, Vec::new());
            }
        }
        Self { ctx, usemap }
    }

    /// Resolve a type-position path head.
    ///
    /// Imports win, then `crate`/`self`/`super` prefixes. A bare name with
    /// no import stays bare: unqualified type names are usually prelude or
    /// same-module types, and inventing a module prefix for them would let
    /// lookalike names slip through later identity checks. The one
    /// exception is a bare well-known name under an outcome glob import.
    pub fn resolve_type_path(&self, segments: &[String]) -> Vec<String> {
        if segments.is_empty() {
            return Vec::new();
        }
        if segments.len() == 1 {
            let name = &segments[0];
            if let Some(full) = self.usemap.resolve(name) {
                return full.to_vec();
            }
            if self.usemap.has_outcome_glob() && OUTCOME_GLOB_NAMES.contains(&name.as_str()) {
                return vec!["outcome_core".to_string(), name.clone()];
            }
            return segments.to_vec();
        }
        self.resolve_qualified(segments)
    }

    /// Resolve a value-position path (a call target).
    ///
    /// Same order as type resolution, except that a bare unresolved name is
    /// assumed to live in the current module, which is where an unqualified
    /// function call normally lands.
    pub fn resolve_value_path(&self, segments: &[String]) -> Vec<String> {
        if segments.is_empty() {
            return Vec::new();
        }
        if segments.len() == 1 {
            let name = &segments[0];
            if let Some(full) = self.usemap.resolve(name) {
                return full.to_vec();
            }
            let mut result = self.ctx.segments.clone();
            result.push(name.clone());
            return result;
        }
        self.resolve_qualified(segments)
    }

    fn resolve_qualified(&self, segments: &[String]) -> Vec<String> {
        let head = segments[0].as_str();
        match head {
            "crate" => segments[1..].to_vec(),
            "self" => {
                let mut result = self.ctx.segments.clone();
                result.extend_from_slice(&segments[1..]);
                result
            }
            "super" => {
                let mut result = self.ctx.parent().segments;
                result.extend_from_slice(&segments[1..]);
                result
            }
            _ => {
                if let Some(full) = self.usemap.resolve(head) {
                    let mut result = full.to_vec();
                    result.extend_from_slice(&segments[1..]);
                    result
                } else {
                    segments.to_vec()
                }
            }
        }
    }
}

/// Flatten a `use` tree into the map, resolving relative prefixes.
fn collect_use_tree(
    tree: &UseTree,
    ctx: &ModulePathContext,
    map: &mut UseMap,
    mut prefix: Vec<String>,
) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            collect_use_tree(&p.tree, ctx, map, prefix);
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            prefix.push(name.clone());
            map.record(name, resolve_prefix(&prefix, ctx));
        }
        UseTree::Rename(r) => {
            prefix.push(r.ident.to_string());
            map.record(r.rename.to_string(), resolve_prefix(&prefix, ctx));
        }
        UseTree::Group(g) => {
            for item in &g.items {
                collect_use_tree(item, ctx, map, prefix.clone());
            }
        }
        UseTree::Glob(_) => {
            if !prefix.is_empty() {
                map.record_glob(resolve_prefix(&prefix, ctx));
            }
        }
    }
}

fn resolve_prefix(path: &[String], ctx: &ModulePathContext) -> Vec<String> {
    match path.first().map(String::as_str) {
        Some("crate") => path[1..].to_vec(),
        Some("self") => {
            let mut result = ctx.segments.clone();
            result.extend_from_slice(&path[1..]);
            result
        }
        Some("super") => {
            let mut result = ctx.parent().segments;
            result.extend_from_slice(&path[1..]);
            result
        }
        _ => path.to_vec(),
    }
}

/// Extract the plain segment idents of a syn path, ignoring generics.
pub fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Render resolved segments back into `a::b::c` form.
pub fn segments_to_string(segments: &[String]) -> String {
    segments.join("::")
}
