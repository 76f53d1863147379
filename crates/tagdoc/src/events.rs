//! Event fact derivation
//!
//! Events are derived, not declared: every constructor body, method body,
//! and property initializer is walked recursively for
//! `dispatchEvent(new SomeEvent('name', init))` calls. The first string-literal constructor argument names the event;
//! a second object-literal argument yields the bubbling flags (literal
//! `true`/`false` only); a constructor type argument is captured verbatim
//! as the detail type. Privacy hides a method from the docs but does not
//! un-fire its events, so private method bodies are walked too.

use crate::facts::EventFact;
use crate::utils::swc::{str_value, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Spanned;

/// Extract dispatched events from a class, deduplicated by name in
/// first-occurrence order
pub fn extract_events(parsed: &ParsedModule, class: &swc_ast::Class) -> Vec<EventFact> {
    let mut events = Vec::new();

    for member in &class.body {
        match member {
            swc_ast::ClassMember::Constructor(ctor) => {
                if let Some(body) = &ctor.body {
                    walk_stmts(parsed, &body.stmts, &mut events);
                }
            }
            swc_ast::ClassMember::Method(method) => {
                if let Some(body) = &method.function.body {
                    walk_stmts(parsed, &body.stmts, &mut events);
                }
            }
            swc_ast::ClassMember::PrivateMethod(method) => {
                if let Some(body) = &method.function.body {
                    walk_stmts(parsed, &body.stmts, &mut events);
                }
            }
            // Handler properties (`onClick = () => ...`) dispatch too
            swc_ast::ClassMember::ClassProp(prop) => {
                if let Some(value) = &prop.value {
                    walk_expr(parsed, value, &mut events);
                }
            }
            swc_ast::ClassMember::PrivateProp(prop) => {
                if let Some(value) = &prop.value {
                    walk_expr(parsed, value, &mut events);
                }
            }
            _ => {}
        }
    }

    events
}

fn push_event(events: &mut Vec<EventFact>, event: EventFact) {
    if !events.iter().any(|e| e.name == event.name) {
        events.push(event);
    }
}

fn walk_stmts(parsed: &ParsedModule, stmts: &[swc_ast::Stmt], events: &mut Vec<EventFact>) {
    for stmt in stmts {
        walk_stmt(parsed, stmt, events);
    }
}

fn walk_stmt(parsed: &ParsedModule, stmt: &swc_ast::Stmt, events: &mut Vec<EventFact>) {
    use swc_ast::Stmt;
    match stmt {
        Stmt::Block(block) => walk_stmts(parsed, &block.stmts, events),
        Stmt::Expr(expr_stmt) => walk_expr(parsed, &expr_stmt.expr, events),
        Stmt::Return(ret) => {
            if let Some(arg) = &ret.arg {
                walk_expr(parsed, arg, events);
            }
        }
        Stmt::Throw(throw) => walk_expr(parsed, &throw.arg, events),
        Stmt::If(if_stmt) => {
            walk_expr(parsed, &if_stmt.test, events);
            walk_stmt(parsed, &if_stmt.cons, events);
            if let Some(alt) = &if_stmt.alt {
                walk_stmt(parsed, alt, events);
            }
        }
        Stmt::While(while_stmt) => {
            walk_expr(parsed, &while_stmt.test, events);
            walk_stmt(parsed, &while_stmt.body, events);
        }
        Stmt::DoWhile(do_while) => {
            walk_expr(parsed, &do_while.test, events);
            walk_stmt(parsed, &do_while.body, events);
        }
        Stmt::For(for_stmt) => {
            if let Some(swc_ast::VarDeclOrExpr::Expr(init)) = &for_stmt.init {
                walk_expr(parsed, init, events);
            }
            if let Some(test) = &for_stmt.test {
                walk_expr(parsed, test, events);
            }
            if let Some(update) = &for_stmt.update {
                walk_expr(parsed, update, events);
            }
            walk_stmt(parsed, &for_stmt.body, events);
        }
        Stmt::ForIn(for_in) => walk_stmt(parsed, &for_in.body, events),
        Stmt::ForOf(for_of) => walk_stmt(parsed, &for_of.body, events),
        Stmt::Switch(switch) => {
            walk_expr(parsed, &switch.discriminant, events);
            for case in &switch.cases {
                walk_stmts(parsed, &case.cons, events);
            }
        }
        Stmt::Try(try_stmt) => {
            walk_stmts(parsed, &try_stmt.block.stmts, events);
            if let Some(handler) = &try_stmt.handler {
                walk_stmts(parsed, &handler.body.stmts, events);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                walk_stmts(parsed, &finalizer.stmts, events);
            }
        }
        Stmt::Labeled(labeled) => walk_stmt(parsed, &labeled.body, events),
        Stmt::Decl(swc_ast::Decl::Var(var_decl)) => {
            for declarator in &var_decl.decls {
                if let Some(init) = &declarator.init {
                    walk_expr(parsed, init, events);
                }
            }
        }
        _ => {}
    }
}

fn walk_expr(parsed: &ParsedModule, expr: &swc_ast::Expr, events: &mut Vec<EventFact>) {
    use swc_ast::Expr;
    match expr {
        Expr::Call(call) => {
            if is_dispatch_call(call) {
                if let Some(arg) = call.args.first() {
                    if let Some(event) = event_from_construction(parsed, &arg.expr) {
                        push_event(events, event);
                    }
                }
            }
            if let swc_ast::Callee::Expr(callee) = &call.callee {
                walk_expr(parsed, callee, events);
            }
            for arg in &call.args {
                walk_expr(parsed, &arg.expr, events);
            }
        }
        Expr::New(new_expr) => {
            walk_expr(parsed, &new_expr.callee, events);
            if let Some(args) = &new_expr.args {
                for arg in args {
                    walk_expr(parsed, &arg.expr, events);
                }
            }
        }
        Expr::Member(member) => walk_expr(parsed, &member.obj, events),
        Expr::Paren(paren) => walk_expr(parsed, &paren.expr, events),
        Expr::Seq(seq) => {
            for inner in &seq.exprs {
                walk_expr(parsed, inner, events);
            }
        }
        Expr::Cond(cond) => {
            walk_expr(parsed, &cond.test, events);
            walk_expr(parsed, &cond.cons, events);
            walk_expr(parsed, &cond.alt, events);
        }
        Expr::Bin(bin) => {
            walk_expr(parsed, &bin.left, events);
            walk_expr(parsed, &bin.right, events);
        }
        Expr::Unary(unary) => walk_expr(parsed, &unary.arg, events),
        Expr::Update(update) => walk_expr(parsed, &update.arg, events),
        Expr::Assign(assign) => walk_expr(parsed, &assign.right, events),
        Expr::Await(await_expr) => walk_expr(parsed, &await_expr.arg, events),
        Expr::Yield(yield_expr) => {
            if let Some(arg) = &yield_expr.arg {
                walk_expr(parsed, arg, events);
            }
        }
        Expr::Arrow(arrow) => match &*arrow.body {
            swc_ast::BlockStmtOrExpr::BlockStmt(block) => walk_stmts(parsed, &block.stmts, events),
            swc_ast::BlockStmtOrExpr::Expr(inner) => walk_expr(parsed, inner, events),
        },
        Expr::Fn(fn_expr) => {
            if let Some(body) = &fn_expr.function.body {
                walk_stmts(parsed, &body.stmts, events);
            }
        }
        Expr::Object(object) => {
            for prop in &object.props {
                if let swc_ast::PropOrSpread::Prop(prop) = prop {
                    if let swc_ast::Prop::KeyValue(kv) = &**prop {
                        walk_expr(parsed, &kv.value, events);
                    }
                }
            }
        }
        Expr::Array(array) => {
            for elem in array.elems.iter().flatten() {
                walk_expr(parsed, &elem.expr, events);
            }
        }
        Expr::Tpl(tpl) => {
            for inner in &tpl.exprs {
                walk_expr(parsed, inner, events);
            }
        }
        Expr::TaggedTpl(tagged) => {
            for inner in &tagged.tpl.exprs {
                walk_expr(parsed, inner, events);
            }
        }
        Expr::TsAs(cast) => walk_expr(parsed, &cast.expr, events),
        Expr::TsNonNull(non_null) => walk_expr(parsed, &non_null.expr, events),
        Expr::TsTypeAssertion(assertion) => walk_expr(parsed, &assertion.expr, events),
        Expr::TsSatisfies(satisfies) => walk_expr(parsed, &satisfies.expr, events),
        Expr::TsConstAssertion(assertion) => walk_expr(parsed, &assertion.expr, events),
        _ => {}
    }
}

/// Whether a call expression is `dispatchEvent(...)` or `x.dispatchEvent(...)`
fn is_dispatch_call(call: &swc_ast::CallExpr) -> bool {
    let swc_ast::Callee::Expr(callee) = &call.callee else {
        return false;
    };
    match &**callee {
        swc_ast::Expr::Ident(ident) => ident.sym.as_ref() == "dispatchEvent",
        swc_ast::Expr::Member(member) => match &member.prop {
            swc_ast::MemberProp::Ident(ident) => ident.sym.as_ref() == "dispatchEvent",
            _ => false,
        },
        _ => false,
    }
}

/// Read an event fact off `new SomeEvent('name', { bubbles: true, ... })`
fn event_from_construction(parsed: &ParsedModule, expr: &swc_ast::Expr) -> Option<EventFact> {
    let swc_ast::Expr::New(new_expr) = expr else {
        return None;
    };
    let args = new_expr.args.as_ref()?;

    let name = match args.first().map(|a| &*a.expr) {
        Some(swc_ast::Expr::Lit(swc_ast::Lit::Str(s))) => str_value(s),
        _ => return None,
    };

    let mut event = EventFact {
        name,
        detail_type: new_expr
            .type_args
            .as_ref()
            .and_then(|ta| ta.params.first())
            .map(|ty| parsed.text_for_span(ty.span()).trim().to_string()),
        bubbles: None,
        composed: None,
        cancelable: None,
    };

    if let Some(swc_ast::Expr::Object(init)) = args.get(1).map(|a| &*a.expr) {
        for prop in &init.props {
            let swc_ast::PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            let swc_ast::Prop::KeyValue(kv) = &**prop else {
                continue;
            };
            let Some(key) = crate::utils::swc::prop_name_str(&kv.key) else {
                continue;
            };
            // Only literal true/false set a flag; other expressions leave it unset
            let swc_ast::Expr::Lit(swc_ast::Lit::Bool(b)) = &*kv.value else {
                continue;
            };
            match key.as_str() {
                "bubbles" => event.bubbles = Some(b.value),
                "composed" => event.composed = Some(b.value),
                "cancelable" => event.cancelable = Some(b.value),
                _ => {}
            }
        }
    }

    Some(event)
}
