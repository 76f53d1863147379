//! Base-class clause matcher
//!
//! Composition chains show up in `extends` clauses as arbitrarily nested
//! call expressions, parenthesization, and type assertions, e.g.
//! `extends Focusable(Sizable(LitElement) as Base)`. This module flattens
//! such an expression into the referenced names, in left-to-right
//! encounter order, as a closed-form recursive matcher over the syntax
//! tree rather than string manipulation.

use crate::utils::swc::expr_to_name;
use deno_ast::swc::ast as swc_ast;

/// One name referenced by a base-class clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeritageRef {
    /// A bare identifier, resolvable against the file's index
    PlainName(String),
    /// A qualified (dotted) name; never resolved
    QualifiedName(String),
    /// A shape the matcher does not recognize
    Unsupported,
}

impl HeritageRef {
    /// The plain name, when this reference is resolvable
    pub fn plain(&self) -> Option<&str> {
        match self {
            HeritageRef::PlainName(name) => Some(name),
            _ => None,
        }
    }
}

/// Flatten a base-class clause expression into referenced names
///
/// Call expressions contribute their callee followed by their arguments,
/// so `A(B(Base))` yields `[A, B, Base]` (outer-to-inner).
pub fn heritage_names(expr: &swc_ast::Expr) -> Vec<HeritageRef> {
    let mut refs = Vec::new();
    collect(expr, &mut refs);
    refs
}

fn collect(expr: &swc_ast::Expr, refs: &mut Vec<HeritageRef>) {
    match expr {
        swc_ast::Expr::Ident(ident) => {
            refs.push(HeritageRef::PlainName(ident.sym.to_string()));
        }
        swc_ast::Expr::Member(_) => {
            refs.push(match expr_to_name(expr) {
                Some(name) => HeritageRef::QualifiedName(name),
                None => HeritageRef::Unsupported,
            });
        }
        swc_ast::Expr::Call(call) => {
            match &call.callee {
                swc_ast::Callee::Expr(callee) => collect(callee, refs),
                _ => refs.push(HeritageRef::Unsupported),
            }
            for arg in &call.args {
                collect(&arg.expr, refs);
            }
        }
        swc_ast::Expr::Paren(paren) => collect(&paren.expr, refs),
        swc_ast::Expr::TsAs(cast) => collect(&cast.expr, refs),
        swc_ast::Expr::TsTypeAssertion(assertion) => collect(&assertion.expr, refs),
        swc_ast::Expr::TsNonNull(non_null) => collect(&non_null.expr, refs),
        swc_ast::Expr::TsSatisfies(satisfies) => collect(&satisfies.expr, refs),
        swc_ast::Expr::TsConstAssertion(assertion) => collect(&assertion.expr, refs),
        _ => refs.push(HeritageRef::Unsupported),
    }
}
