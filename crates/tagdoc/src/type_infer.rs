//! Type label inference for documented properties
//!
//! Precedence, highest first: an explicit type annotation (verbatim source
//! text), a `type:` hint from the registration decorator (normalized), an
//! inference from the initializer literal, and finally `any`.

use crate::utils::swc::ParsedModule;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;

/// Compute the type label for a property
pub fn property_type(
    parsed: &ParsedModule,
    annotation: Option<&swc_ast::TsTypeAnn>,
    hint: Option<&str>,
    initializer: Option<&swc_ast::Expr>,
) -> String {
    if let Some(ann) = annotation {
        return parsed.text_for_span(ann.type_ann.span()).trim().to_string();
    }
    if let Some(hint) = hint {
        return normalize_type_hint(hint);
    }
    if let Some(init) = initializer {
        if let Some(inferred) = infer_from_initializer(init) {
            return inferred;
        }
    }
    "any".to_string()
}

/// Normalize a decorator `type:` hint to a primitive label
///
/// Well-known constructor names map to their primitive labels; anything
/// else passes through with a trailing `Constructor` suffix stripped.
pub fn normalize_type_hint(hint: &str) -> String {
    match hint {
        "String" => "string".to_string(),
        "Number" => "number".to_string(),
        "Boolean" => "boolean".to_string(),
        "Array" => "unknown[]".to_string(),
        "Object" => "Record<string, unknown>".to_string(),
        "Date" => "Date".to_string(),
        other => other.trim_end_matches("Constructor").to_string(),
    }
}

/// Infer a type label from an initializer literal
pub fn infer_from_initializer(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Lit(lit) => match lit {
            swc_ast::Lit::Str(_) => Some("string".to_string()),
            swc_ast::Lit::Bool(_) => Some("boolean".to_string()),
            swc_ast::Lit::Num(_) => Some("number".to_string()),
            swc_ast::Lit::Null(_) => Some("null".to_string()),
            _ => None,
        },
        swc_ast::Expr::Tpl(_) => Some("string".to_string()),
        swc_ast::Expr::Array(_) => Some("unknown[]".to_string()),
        swc_ast::Expr::Object(_) => Some("Record<string, unknown>".to_string()),
        swc_ast::Expr::Unary(unary) if unary.op == swc_ast::UnaryOp::Minus => {
            match infer_from_initializer(&unary.arg) {
                Some(label) if label == "number" => Some("number".to_string()),
                _ => None,
            }
        }
        swc_ast::Expr::Ident(ident) if ident.sym.as_ref() == "undefined" => {
            Some("undefined".to_string())
        }
        _ => None,
    }
}
