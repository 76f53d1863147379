//! Per-file declaration and import indexing
//!
//! Builds a `FileInfo` for one source file: every class-like declaration
//! (including mixin-shaped functions that return a class) keyed by local
//! name, and every import binding resolved through the specifier
//! heuristics. The resolution engine caches these by path for the
//! lifetime of one resolve call.

use crate::specifier::resolve_specifier;
use crate::utils::swc::{str_value, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// How an imported name is bound locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Named,
    Default,
    Namespace,
}

/// One locally bound import
#[derive(Debug, Clone)]
pub struct ImportRecord {
    /// Resolved file, or None for unresolved/bare specifiers
    pub resolved: Option<PathBuf>,
    /// Exported name to look up in the target file (`default` for default imports)
    pub imported: String,
    pub kind: ImportKind,
}

/// One locally declared class-like symbol
///
/// The class node and the doc span differ when a mixin's JSDoc sits on
/// the function or variable declaration rather than the class expression
/// it returns. The record owns a clone of the class subtree; spans inside
/// the clone still address the file's source text, and parsed trees are
/// never mutated.
#[derive(Debug, Clone)]
pub struct DeclRecord {
    /// The member-bearing class node, when one could be determined
    pub class: Option<swc_ast::Class>,
    /// Span of the statement carrying the declaration's own JSDoc
    pub doc_span: Span,
    /// Whether the declaration is exported from the file
    pub exported: bool,
}

/// Index of one source file
#[derive(Debug)]
pub struct FileInfo {
    /// Canonical file path
    pub path: PathBuf,
    /// The parsed syntax tree
    pub parsed: ParsedModule,
    /// Locally declared class-like symbols, in declaration order
    pub decls: IndexMap<String, DeclRecord>,
    /// Locally bound imports, in declaration order
    pub imports: IndexMap<String, ImportRecord>,
}

/// Build the index for one parsed file
pub fn build_file_info(path: &Path, parsed: ParsedModule) -> FileInfo {
    let mut decls: IndexMap<String, DeclRecord> = IndexMap::new();
    let mut imports: IndexMap<String, ImportRecord> = IndexMap::new();

    for item in &parsed.module().body {
        match item {
            swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => {
                index_decl(decl, decl.span(), false, &mut decls);
            }
            swc_ast::ModuleItem::ModuleDecl(module_decl) => match module_decl {
                swc_ast::ModuleDecl::ExportDecl(export) => {
                    // JSDoc attaches to the export span, not the inner declaration
                    index_decl(&export.decl, export.span, true, &mut decls);
                }
                swc_ast::ModuleDecl::ExportDefaultDecl(export) => {
                    if let swc_ast::DefaultDecl::Class(class_expr) = &export.decl {
                        let name = class_expr
                            .ident
                            .as_ref()
                            .map(|i| i.sym.to_string())
                            .unwrap_or_else(|| "default".to_string());
                        decls.insert(
                            name,
                            DeclRecord {
                                class: Some((*class_expr.class).clone()),
                                doc_span: export.span,
                                exported: true,
                            },
                        );
                    }
                }
                swc_ast::ModuleDecl::ExportDefaultExpr(export) => {
                    // `export default Name` aliases an earlier declaration,
                    // keeping its doc span so the original JSDoc is found
                    let record = match unwrap_expr(&export.expr) {
                        swc_ast::Expr::Ident(ident) => {
                            decls.get(ident.sym.as_ref()).map(|decl| DeclRecord {
                                exported: true,
                                ..decl.clone()
                            })
                        }
                        _ => class_from_initializer(&export.expr).map(|class| DeclRecord {
                            class: Some(class),
                            doc_span: export.span,
                            exported: true,
                        }),
                    };
                    if let Some(record) = record {
                        decls.insert("default".to_string(), record);
                    }
                }
                swc_ast::ModuleDecl::Import(import) => {
                    index_import(import, path, &mut imports);
                }
                _ => {}
            },
            _ => {}
        }
    }

    FileInfo {
        path: path.to_path_buf(),
        parsed,
        decls,
        imports,
    }
}

/// Index one declaration statement
fn index_decl(
    decl: &swc_ast::Decl,
    doc_span: Span,
    exported: bool,
    decls: &mut IndexMap<String, DeclRecord>,
) {
    match decl {
        swc_ast::Decl::Class(class_decl) => {
            decls.insert(
                class_decl.ident.sym.to_string(),
                DeclRecord {
                    class: Some((*class_decl.class).clone()),
                    doc_span,
                    exported,
                },
            );
        }
        swc_ast::Decl::Fn(fn_decl) => {
            decls.insert(
                fn_decl.ident.sym.to_string(),
                DeclRecord {
                    class: mixin_class_from_function(&fn_decl.function),
                    doc_span,
                    exported,
                },
            );
        }
        swc_ast::Decl::Var(var_decl) => {
            for declarator in &var_decl.decls {
                let swc_ast::Pat::Ident(name) = &declarator.name else {
                    continue;
                };
                let Some(init) = &declarator.init else {
                    continue;
                };
                let class = class_from_initializer(init);
                decls.insert(
                    name.sym.to_string(),
                    DeclRecord {
                        class,
                        doc_span,
                        exported,
                    },
                );
            }
        }
        _ => {}
    }
}

/// Classify a variable initializer as a class-bearing shape
fn class_from_initializer(init: &swc_ast::Expr) -> Option<swc_ast::Class> {
    match unwrap_expr(init) {
        swc_ast::Expr::Class(class_expr) => Some((*class_expr.class).clone()),
        swc_ast::Expr::Fn(fn_expr) => mixin_class_from_function(&fn_expr.function),
        swc_ast::Expr::Arrow(arrow) => match &*arrow.body {
            swc_ast::BlockStmtOrExpr::BlockStmt(body) => mixin_class_from_body(body),
            swc_ast::BlockStmtOrExpr::Expr(expr) => class_from_expr(expr),
        },
        _ => None,
    }
}

/// Take the class literal out of an expression, unwrapping parens/casts
fn class_from_expr(expr: &swc_ast::Expr) -> Option<swc_ast::Class> {
    if let swc_ast::Expr::Class(class_expr) = unwrap_expr(expr) {
        Some((*class_expr.class).clone())
    } else {
        None
    }
}

/// Find the class a mixin-shaped function returns
fn mixin_class_from_function(function: &swc_ast::Function) -> Option<swc_ast::Class> {
    function.body.as_ref().and_then(mixin_class_from_body)
}

/// Return-shape analysis for a mixin function body
///
/// Collect every class declared in the body; scan return statements (a
/// returned class literal wins, a returned identifier selects a collected
/// class by name); fall back to a collected class with a base-class
/// clause, then the first collected class.
fn mixin_class_from_body(body: &swc_ast::BlockStmt) -> Option<swc_ast::Class> {
    let mut collected: Vec<(String, &swc_ast::Class)> = Vec::new();
    collect_classes(&body.stmts, &mut collected);

    let mut returns: Vec<&swc_ast::Expr> = Vec::new();
    collect_returns(&body.stmts, &mut returns);

    for ret in returns {
        match unwrap_expr(ret) {
            swc_ast::Expr::Class(class_expr) => return Some((*class_expr.class).clone()),
            swc_ast::Expr::Ident(ident) => {
                let name = ident.sym.to_string();
                if let Some((_, class)) = collected.iter().find(|(n, _)| *n == name) {
                    return Some((*class).clone());
                }
            }
            _ => {}
        }
    }

    // No return statement resolved: prefer a class with an extends clause
    if let Some((_, class)) = collected.iter().find(|(_, c)| c.super_class.is_some()) {
        return Some((*class).clone());
    }
    collected.first().map(|(_, class)| (*class).clone())
}

/// Collect class declarations from statements, recursing into blocks
fn collect_classes<'a>(stmts: &'a [swc_ast::Stmt], out: &mut Vec<(String, &'a swc_ast::Class)>) {
    for stmt in stmts {
        match stmt {
            swc_ast::Stmt::Decl(swc_ast::Decl::Class(class_decl)) => {
                out.push((class_decl.ident.sym.to_string(), &class_decl.class));
            }
            swc_ast::Stmt::Block(block) => collect_classes(&block.stmts, out),
            swc_ast::Stmt::If(if_stmt) => {
                collect_classes(std::slice::from_ref(&if_stmt.cons), out);
                if let Some(alt) = &if_stmt.alt {
                    collect_classes(std::slice::from_ref(alt), out);
                }
            }
            _ => {}
        }
    }
}

/// Collect return expressions from statements, recursing into blocks
fn collect_returns<'a>(stmts: &'a [swc_ast::Stmt], out: &mut Vec<&'a swc_ast::Expr>) {
    for stmt in stmts {
        match stmt {
            swc_ast::Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    out.push(arg);
                }
            }
            swc_ast::Stmt::Block(block) => collect_returns(&block.stmts, out),
            swc_ast::Stmt::If(if_stmt) => {
                collect_returns(std::slice::from_ref(&if_stmt.cons), out);
                if let Some(alt) = &if_stmt.alt {
                    collect_returns(std::slice::from_ref(alt), out);
                }
            }
            swc_ast::Stmt::Try(try_stmt) => {
                collect_returns(&try_stmt.block.stmts, out);
                if let Some(handler) = &try_stmt.handler {
                    collect_returns(&handler.body.stmts, out);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    collect_returns(&finalizer.stmts, out);
                }
            }
            _ => {}
        }
    }
}

/// Unwrap parenthesization and type-assertion wrappers
fn unwrap_expr(expr: &swc_ast::Expr) -> &swc_ast::Expr {
    match expr {
        swc_ast::Expr::Paren(paren) => unwrap_expr(&paren.expr),
        swc_ast::Expr::TsAs(cast) => unwrap_expr(&cast.expr),
        swc_ast::Expr::TsTypeAssertion(assertion) => unwrap_expr(&assertion.expr),
        swc_ast::Expr::TsNonNull(non_null) => unwrap_expr(&non_null.expr),
        swc_ast::Expr::TsSatisfies(satisfies) => unwrap_expr(&satisfies.expr),
        swc_ast::Expr::TsConstAssertion(assertion) => unwrap_expr(&assertion.expr),
        other => other,
    }
}

/// Index one import statement
fn index_import(
    import: &swc_ast::ImportDecl,
    importing_file: &Path,
    imports: &mut IndexMap<String, ImportRecord>,
) {
    let specifier = str_value(&import.src);
    // Resolve the specifier once per import statement
    let resolved = resolve_specifier(&specifier, importing_file);

    for spec in &import.specifiers {
        match spec {
            swc_ast::ImportSpecifier::Named(named) => {
                let imported = match &named.imported {
                    Some(swc_ast::ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                    Some(swc_ast::ModuleExportName::Str(s)) => str_value(s),
                    None => named.local.sym.to_string(),
                };
                imports.insert(
                    named.local.sym.to_string(),
                    ImportRecord {
                        resolved: resolved.clone(),
                        imported,
                        kind: ImportKind::Named,
                    },
                );
            }
            swc_ast::ImportSpecifier::Default(default) => {
                imports.insert(
                    default.local.sym.to_string(),
                    ImportRecord {
                        resolved: resolved.clone(),
                        imported: "default".to_string(),
                        kind: ImportKind::Default,
                    },
                );
            }
            swc_ast::ImportSpecifier::Namespace(namespace) => {
                imports.insert(
                    namespace.local.sym.to_string(),
                    ImportRecord {
                        resolved: resolved.clone(),
                        imported: "*".to_string(),
                        kind: ImportKind::Namespace,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::swc::parse_typescript_source;

    fn index_source(source: &str) -> FileInfo {
        let path = Path::new("/tmp/index-test.ts");
        let parsed = parse_typescript_source(path, source).unwrap();
        build_file_info(path, parsed)
    }

    #[test]
    fn test_class_declaration() {
        let info = index_source("export class Button extends Base {}");
        let decl = info.decls.get("Button").unwrap();
        assert!(decl.class.is_some());
        assert!(decl.exported);
    }

    #[test]
    fn test_arrow_mixin_with_expression_body() {
        let info = index_source("const Focusable = (base) => class extends base {};");
        let decl = info.decls.get("Focusable").unwrap();
        assert!(decl.class.is_some());
        assert!(!decl.exported);
    }

    #[test]
    fn test_function_mixin_returned_class_literal() {
        let info = index_source(
            r#"
            export function Focusable(base) {
                return class extends base {
                    focus() {}
                };
            }
            "#,
        );
        assert!(info.decls.get("Focusable").unwrap().class.is_some());
    }

    #[test]
    fn test_function_mixin_returned_identifier() {
        let info = index_source(
            r#"
            export function Focusable(base) {
                class FocusableImpl extends base {}
                class Unrelated {}
                return FocusableImpl;
            }
            "#,
        );
        let class = info.decls.get("Focusable").unwrap().class.clone().unwrap();
        assert!(class.super_class.is_some());
    }

    #[test]
    fn test_function_mixin_fallback_prefers_extending_class() {
        let info = index_source(
            r#"
            function Focusable(base) {
                class Helper {}
                class FocusableImpl extends base {}
                customElements.whenDefined('x').then(() => FocusableImpl);
            }
            "#,
        );
        let class = info.decls.get("Focusable").unwrap().class.clone().unwrap();
        assert!(class.super_class.is_some());
    }

    #[test]
    fn test_function_without_class_has_no_class_node() {
        let info = index_source("export function helper() { return 42; }");
        assert!(info.decls.get("helper").unwrap().class.is_none());
    }

    #[test]
    fn test_default_export_class() {
        let info = index_source("export default class Button {}");
        let decl = info.decls.get("Button").unwrap();
        assert!(decl.class.is_some());
        assert!(decl.exported);
    }

    #[test]
    fn test_default_export_identifier_aliases_declaration() {
        let info = index_source(
            r#"
            const Focusable = (base) => class extends base {};
            export default Focusable;
            "#,
        );
        let decl = info.decls.get("default").unwrap();
        assert!(decl.class.is_some());
        assert!(decl.exported);
    }

    #[test]
    fn test_import_kinds() {
        let info = index_source(
            r#"
            import Base, { Focusable as F, Sizable } from './mixins';
            import * as helpers from './helpers';
            import { html } from 'lit';
            "#,
        );

        let f = info.imports.get("F").unwrap();
        assert_eq!(f.kind, ImportKind::Named);
        assert_eq!(f.imported, "Focusable");

        let sizable = info.imports.get("Sizable").unwrap();
        assert_eq!(sizable.imported, "Sizable");

        let base = info.imports.get("Base").unwrap();
        assert_eq!(base.kind, ImportKind::Default);
        assert_eq!(base.imported, "default");

        let helpers = info.imports.get("helpers").unwrap();
        assert_eq!(helpers.kind, ImportKind::Namespace);

        // Bare specifiers are recorded but never resolve
        let html = info.imports.get("html").unwrap();
        assert_eq!(html.resolved, None);
    }

    #[test]
    fn test_doc_span_differs_for_exported_mixin() {
        let info = index_source(
            r#"
            /** The focusable mixin. */
            export const Focusable = (base) => class extends base {};
            "#,
        );
        let decl = info.decls.get("Focusable").unwrap();
        let class = decl.class.as_ref().unwrap();
        assert_ne!(decl.doc_span, class.span);
    }
}
