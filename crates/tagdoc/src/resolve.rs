//! Mixin resolution and merge engine
//!
//! Composition references form an arbitrary directed graph (diamonds,
//! mutual references), not a tree, so resolution is a recursive graph
//! traversal over `(file, symbol)` keys with a memoization cache and an
//! explicit in-progress set acting as a call-stack cycle guard. A cycle
//! is broken silently: the cyclic edge contributes an empty fragment.
//!
//! The `ResolveContext` is created per top-level call and threaded as
//! `&mut` through every recursive step; nothing is process-global, so
//! independent calls share no mutable state.

use crate::diagnostics::{Diagnostic, DiagnosticsCollector, TagdocResult};
use crate::extract::{custom_element_tag, extract_own_parts};
use crate::facts::{ClassDocParts, ComponentDoc};
use crate::heritage::{heritage_names, HeritageRef};
use crate::index::{build_file_info, FileInfo, ImportKind};
use crate::utils::swc::parse_typescript_file;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Cache key for resolved fragments and the cycle guard
type SymbolKey = (PathBuf, String);

/// Per-call resolution state
///
/// Scoped to exactly one `resolve_component` invocation; never shared.
#[derive(Default)]
pub struct ResolveContext {
    /// File index cache; `None` records a file that failed to load
    files: HashMap<PathBuf, Option<Rc<FileInfo>>>,
    /// Memoized fragments keyed by `(file, symbol)`
    cache: HashMap<SymbolKey, ClassDocParts>,
    /// Keys currently being resolved (cycle guard, same key space as the cache)
    in_progress: HashSet<SymbolKey>,
    /// Expected-absence warnings collected along the way
    pub diagnostics: DiagnosticsCollector,
}

impl ResolveContext {
    fn new() -> Self {
        Self::default()
    }

    /// Seed the entry file's already-parsed index to avoid re-parsing
    fn seed(&mut self, path: PathBuf, info: Rc<FileInfo>) {
        self.files.insert(path, Some(info));
    }

    /// Load and index a file, caching the outcome either way
    fn file_info(&mut self, path: &Path) -> Option<Rc<FileInfo>> {
        if let Some(cached) = self.files.get(path) {
            return cached.clone();
        }
        let loaded = match parse_typescript_file(path) {
            Ok(parsed) => Some(Rc::new(build_file_info(path, parsed))),
            Err(e) => {
                // A missing or unparseable import degrades to no contribution
                self.diagnostics
                    .add(Diagnostic::warning(format!("skipping import: {}", e)).in_file(path));
                None
            }
        };
        self.files.insert(path.to_path_buf(), loaded.clone());
        loaded
    }
}

/// Resolve one symbol in one file to its documentation fragment
///
/// Returns an empty fragment for anything unresolvable: unknown symbols,
/// namespace imports, bare specifiers, cycles.
fn resolve_symbol(ctx: &mut ResolveContext, file: &Path, symbol: &str) -> ClassDocParts {
    let key: SymbolKey = (file.to_path_buf(), symbol.to_string());

    if let Some(hit) = ctx.cache.get(&key) {
        return hit.clone();
    }
    if ctx.in_progress.contains(&key) {
        // Cycle: break silently, the edge contributes nothing
        return ClassDocParts::new();
    }
    ctx.in_progress.insert(key.clone());

    let parts = resolve_symbol_inner(ctx, file, symbol);

    ctx.in_progress.remove(&key);
    ctx.cache.insert(key, parts.clone());
    parts
}

fn resolve_symbol_inner(ctx: &mut ResolveContext, file: &Path, symbol: &str) -> ClassDocParts {
    let Some(info) = ctx.file_info(file) else {
        return ClassDocParts::new();
    };

    if let Some(decl) = info.decls.get(symbol) {
        let Some(class) = &decl.class else {
            return ClassDocParts::new();
        };
        let mut parts = extract_own_parts(&info.parsed, class, decl.doc_span);
        if let Some(super_class) = &class.super_class {
            // Outer-to-inner: merge each base reference in encounter order
            for heritage in heritage_names(super_class) {
                if let HeritageRef::PlainName(name) = heritage {
                    let resolved = resolve_symbol(ctx, file, &name);
                    parts.merge(&resolved);
                }
            }
        }
        return parts;
    }

    if let Some(import) = info.imports.get(symbol) {
        if import.kind == ImportKind::Namespace {
            return ClassDocParts::new();
        }
        match &import.resolved {
            Some(target) => {
                let target = target.clone();
                let imported = import.imported.clone();
                return resolve_symbol(ctx, &target, &imported);
            }
            None => {
                ctx.diagnostics.add(
                    Diagnostic::info(format!("unresolved import binding '{}'", symbol))
                        .in_file(file),
                );
                return ClassDocParts::new();
            }
        }
    }

    ClassDocParts::new()
}

/// Resolve a component file to its documentation record
///
/// Returns `Ok(None)` when the file declares no exported class with a
/// `@customElement` registration. IO and parse errors on the entry file
/// propagate; anything that goes wrong while chasing imports degrades to
/// warnings on the context.
pub fn resolve_component(path: impl AsRef<Path>) -> TagdocResult<Option<ComponentDoc>> {
    resolve_component_with_diagnostics(path).map(|(doc, _)| doc)
}

/// Like [`resolve_component`], also returning the collected diagnostics
pub fn resolve_component_with_diagnostics(
    path: impl AsRef<Path>,
) -> TagdocResult<(Option<ComponentDoc>, Vec<Diagnostic>)> {
    let path = path.as_ref();
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let parsed = parse_typescript_file(&path)?;
    let info = Rc::new(build_file_info(&path, parsed));

    let mut ctx = ResolveContext::new();
    ctx.seed(path.clone(), info.clone());

    // First exported class-like declaration carrying a registration wins
    for (name, decl) in &info.decls {
        if !decl.exported {
            continue;
        }
        let Some(class) = &decl.class else {
            continue;
        };
        let Some(tag_name) = custom_element_tag(class) else {
            continue;
        };

        let mut parts = extract_own_parts(&info.parsed, class, decl.doc_span);
        if let Some(super_class) = &class.super_class {
            for heritage in heritage_names(super_class) {
                if let HeritageRef::PlainName(base) = heritage {
                    let mut resolved = resolve_symbol(&mut ctx, &path, &base);
                    // The component's method list is exactly its own methods;
                    // everything else flows through the composition chain
                    resolved.methods.clear();
                    parts.merge(&resolved);
                }
            }
        }

        let doc = ComponentDoc {
            class_name: name.clone(),
            tag_name,
            path: path.display().to_string(),
            location: info.parsed.span_to_location(class.span),
            parts,
        };
        return Ok((Some(doc), ctx.diagnostics.into_diagnostics()));
    }

    Ok((None, ctx.diagnostics.into_diagnostics()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, source: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_non_component_returns_none() {
        let dir = TempDir::new().unwrap();
        let entry = write(&dir, "util.ts", "export class Helper {}");
        assert!(resolve_component(&entry).unwrap().is_none());
    }

    #[test]
    fn test_missing_entry_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.ts");
        assert!(resolve_component(&missing).is_err());
    }

    #[test]
    fn test_single_file_mixin_chain() {
        let dir = TempDir::new().unwrap();
        let entry = write(
            &dir,
            "toggle.ts",
            r#"
            /**
             * @slot - Focus ring content
             */
            const Focusable = (base) => class extends base {
                @property() tabIndexWhenDisabled = -1;
                focusSelf() {
                    this.dispatchEvent(new CustomEvent('my-focus'));
                }
            };

            /** A toggle control. */
            @customElement('my-toggle')
            export class MyToggle extends Focusable(LitElement) {
                @property() pressed = false;
                toggle() {}
            }
            "#,
        );

        let doc = resolve_component(&entry).unwrap().unwrap();
        assert_eq!(doc.tag_name, "my-toggle");
        assert_eq!(doc.class_name, "MyToggle");
        assert_eq!(doc.parts.description.as_deref(), Some("A toggle control."));

        let prop_names: Vec<_> = doc.parts.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(prop_names, vec!["pressed", "tabIndexWhenDisabled"]);
        assert_eq!(doc.parts.properties[1].ty.as_deref(), Some("number"));

        assert_eq!(doc.parts.slots.len(), 1);
        assert_eq!(doc.parts.events.len(), 1);
        assert_eq!(doc.parts.events[0].name, "my-focus");

        // Mixin methods are discarded at component attachment
        let method_names: Vec<_> = doc.parts.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(method_names, vec!["toggle"]);
    }

    #[test]
    fn test_cycle_terminates_within_file() {
        let dir = TempDir::new().unwrap();
        let entry = write(
            &dir,
            "cyclic.ts",
            r#"
            /** @slot alpha - A */
            const A = (base) => class extends B(base) {};
            /** @slot beta - B */
            const B = (base) => class extends A(base) {};

            @customElement('my-cyclic')
            export class MyCyclic extends A(LitElement) {}
            "#,
        );

        let doc = resolve_component(&entry).unwrap().unwrap();
        let slot_names: Vec<_> = doc.parts.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(slot_names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_namespace_import_never_followed() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "mixins.ts",
            "/** @slot - x */ export const M = (b) => class extends b {};",
        );
        let entry = write(
            &dir,
            "comp.ts",
            r#"
            import * as mixins from './mixins';

            @customElement('my-comp')
            export class MyComp extends mixins.M(LitElement) {}
            "#,
        );

        let doc = resolve_component(&entry).unwrap().unwrap();
        // Qualified heritage names contribute nothing
        assert!(doc.parts.slots.is_empty());
    }
}
