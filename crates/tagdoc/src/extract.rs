//! Class, property, and method fact extraction
//!
//! Pure, stateless readers that turn one syntax node plus its attached
//! JSDoc into typed facts. Properties are documented only when they carry
//! a `@property`/`@state` decorator; methods are documented unless they
//! are private, underscore-prefixed, `@internal`-tagged, or framework
//! lifecycle callbacks.

use crate::events::extract_events;
use crate::facts::{
    ClassDocParts, CssPartFact, CssPropertyFact, Deprecation, MethodFact, MethodParam,
    MethodReturn, PropertyFact, SlotFact,
};
use crate::js_doc::{DocComment, DocTag};
use crate::type_infer::property_type;
use crate::utils::swc::{prop_name_str, str_value, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};

/// Maximum length of a default-value snippet before truncation
const MAX_DEFAULT_LEN: usize = 50;

/// Framework lifecycle methods, always excluded from documentation
const LIFECYCLE_METHODS: &[&str] = &[
    "connectedCallback",
    "disconnectedCallback",
    "attributeChangedCallback",
    "adoptedCallback",
    "render",
    "update",
    "updated",
    "firstUpdated",
    "willUpdate",
    "shouldUpdate",
    "createRenderRoot",
    "performUpdate",
];

/// Extract a declaration's own fragment: class-level facts, properties,
/// methods, and dispatched events
///
/// `doc_span` is the span of the statement carrying the declaration's
/// JSDoc; when it differs from the class node's own span (mixins, export
/// declarations), that comment's class-level facts are merged in as well.
pub fn extract_own_parts(
    parsed: &ParsedModule,
    class: &swc_ast::Class,
    doc_span: Span,
) -> ClassDocParts {
    let mut parts = ClassDocParts::new();

    if let Some(raw) = parsed.jsdoc_at(class_doc_pos(class)) {
        parts = class_level_parts(&DocComment::parse(&raw));
    }
    if doc_span != class.span {
        if let Some(raw) = parsed.jsdoc_for_span(doc_span) {
            parts.merge(&class_level_parts(&DocComment::parse(&raw)));
        }
    }

    for member in &class.body {
        match member {
            swc_ast::ClassMember::ClassProp(prop) => {
                if let Some(fact) = extract_property(parsed, prop) {
                    parts.properties.push(fact);
                }
            }
            swc_ast::ClassMember::Method(method) => {
                if let Some(fact) = extract_method(parsed, method) {
                    parts.methods.push(fact);
                }
            }
            _ => {}
        }
    }

    parts.events = extract_events(parsed, class);
    parts
}

/// Position of the class node's leading JSDoc
///
/// With decorators present the comment sits before the first decorator.
fn class_doc_pos(class: &swc_ast::Class) -> deno_ast::swc::common::BytePos {
    match class.decorators.first() {
        Some(dec) if dec.span.lo < class.span.lo => dec.span.lo,
        _ => class.span.lo,
    }
}

/// Build class-level facts from a parsed JSDoc comment
pub fn class_level_parts(doc: &DocComment) -> ClassDocParts {
    let mut parts = ClassDocParts::new();
    parts.description = doc.description.clone();

    for tag in &doc.tags {
        match tag {
            DocTag::Slot { name, doc } => parts.slots.push(SlotFact {
                name: name.clone(),
                description: doc.clone(),
            }),
            DocTag::CssProperty { name, doc, default } => {
                parts.css_properties.push(CssPropertyFact {
                    name: name.clone(),
                    description: doc.clone(),
                    default: default.clone(),
                })
            }
            DocTag::CssPart { name, doc } => parts.css_parts.push(CssPartFact {
                name: name.clone(),
                description: doc.clone(),
            }),
            DocTag::Dependency { name } => parts.dependencies.push(name.clone()),
            DocTag::Example { doc } => parts.examples.push(doc.clone()),
            _ => {}
        }
    }

    parts
}

/// The custom element tag name from a `@customElement('x-tag')` decorator
pub fn custom_element_tag(class: &swc_ast::Class) -> Option<String> {
    for decorator in &class.decorators {
        let swc_ast::Expr::Call(call) = &*decorator.expr else {
            continue;
        };
        let swc_ast::Callee::Expr(callee) = &call.callee else {
            continue;
        };
        let swc_ast::Expr::Ident(ident) = &**callee else {
            continue;
        };
        if ident.sym.as_ref() != "customElement" {
            continue;
        }
        if let Some(arg) = call.args.first() {
            if let swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) = &*arg.expr {
                return Some(str_value(s));
            }
        }
    }
    None
}

/// A parsed `@property`/`@state` registration decorator
struct RegistrationOptions {
    internal: bool,
    /// Explicit attribute name, `Some(None)` = attributes disabled
    attribute: Option<Option<String>>,
    reflect: bool,
    type_hint: Option<String>,
}

/// Extract one property fact, or None when the member is not documented
fn extract_property(parsed: &ParsedModule, prop: &swc_ast::ClassProp) -> Option<PropertyFact> {
    // Privacy and static modifiers always exclude, regardless of annotation
    if prop.is_static || is_private(prop.accessibility) {
        return None;
    }
    let options = registration_options(&prop.decorators)?;
    let name = prop_name_str(&prop.key)?;

    let attribute = match &options.attribute {
        Some(None) => None,
        Some(Some(explicit)) => Some(explicit.clone()),
        None => Some(kebab_case(&name)),
    };

    let ty = property_type(
        parsed,
        prop.type_ann.as_deref(),
        options.type_hint.as_deref(),
        prop.value.as_deref(),
    );

    let default = prop
        .value
        .as_deref()
        .map(|init| default_value_text(parsed, init));

    let doc = parsed
        .jsdoc_at(member_doc_pos(prop.span, &prop.decorators))
        .map(|raw| DocComment::parse(&raw))
        .unwrap_or_default();

    Some(PropertyFact {
        name,
        attribute,
        ty: Some(ty),
        reflects: options.reflect,
        internal: options.internal,
        required: doc.is_required(),
        deprecated: doc
            .deprecated()
            .map(|message| Deprecation::from_message(message)),
        default,
        description: doc.description.clone(),
    })
}

/// Read the `@property(...)`/`@state(...)` decorator off a member
fn registration_options(decorators: &[swc_ast::Decorator]) -> Option<RegistrationOptions> {
    for decorator in decorators {
        let (name, args) = match &*decorator.expr {
            swc_ast::Expr::Ident(ident) => (ident.sym.to_string(), None),
            swc_ast::Expr::Call(call) => {
                let swc_ast::Callee::Expr(callee) = &call.callee else {
                    continue;
                };
                let swc_ast::Expr::Ident(ident) = &**callee else {
                    continue;
                };
                (ident.sym.to_string(), call.args.first())
            }
            _ => continue,
        };

        let internal = match name.as_str() {
            "property" => false,
            "state" => true,
            _ => continue,
        };

        let mut options = RegistrationOptions {
            internal,
            attribute: None,
            reflect: false,
            type_hint: None,
        };

        if let Some(arg) = args {
            if let swc_ast::Expr::Object(object) = &*arg.expr {
                read_registration_object(object, &mut options);
            }
        }
        // Internal state never surfaces an attribute
        if options.internal {
            options.attribute = Some(None);
        }
        return Some(options);
    }
    None
}

/// Read `attribute`/`reflect`/`type` keys off the decorator options object
fn read_registration_object(object: &swc_ast::ObjectLit, options: &mut RegistrationOptions) {
    for prop in &object.props {
        let swc_ast::PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let swc_ast::Prop::KeyValue(kv) = &**prop else {
            continue;
        };
        let Some(key) = prop_name_str(&kv.key) else {
            continue;
        };
        match key.as_str() {
            "attribute" => match &*kv.value {
                swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => {
                    options.attribute = Some(Some(str_value(s)));
                }
                swc_ast::Expr::Lit(swc_ast::Lit::Bool(b)) if !b.value => {
                    options.attribute = Some(None);
                }
                _ => {}
            },
            "reflect" => {
                if let swc_ast::Expr::Lit(swc_ast::Lit::Bool(b)) = &*kv.value {
                    options.reflect = b.value;
                }
            }
            "type" => {
                if let swc_ast::Expr::Ident(ident) = &*kv.value {
                    options.type_hint = Some(ident.sym.to_string());
                }
            }
            _ => {}
        }
    }
}

/// Extract one method fact, or None when the member is not documented
fn extract_method(parsed: &ParsedModule, method: &swc_ast::ClassMethod) -> Option<MethodFact> {
    // Accessors surface through properties, not the method list
    if method.kind != swc_ast::MethodKind::Method {
        return None;
    }
    if is_private(method.accessibility) {
        return None;
    }
    let name = prop_name_str(&method.key)?;
    if name.starts_with('_') || LIFECYCLE_METHODS.contains(&name.as_str()) {
        return None;
    }

    let doc = parsed
        .jsdoc_at(member_doc_pos(method.span, &method.function.decorators))
        .map(|raw| DocComment::parse(&raw))
        .unwrap_or_default();
    if doc.is_internal() {
        return None;
    }

    let params = method
        .function
        .params
        .iter()
        .filter_map(|p| extract_param(parsed, &p.pat, &doc))
        .collect();

    let returns = method.function.return_type.as_deref().map(|ann| MethodReturn {
        ty: parsed.text_for_span(ann.type_ann.span()).trim().to_string(),
        description: doc.returns_doc().map(str::to_string),
    });

    Some(MethodFact {
        name,
        description: doc.description.clone(),
        is_async: method.function.is_async,
        deprecated: doc
            .deprecated()
            .map(|message| Deprecation::from_message(message)),
        params,
        returns,
    })
}

/// Extract one parameter from a binding pattern
fn extract_param(
    parsed: &ParsedModule,
    pat: &swc_ast::Pat,
    doc: &DocComment,
) -> Option<MethodParam> {
    match pat {
        swc_ast::Pat::Ident(binding) => {
            let name = binding.sym.to_string();
            Some(MethodParam {
                ty: annotation_text(parsed, binding.type_ann.as_deref()),
                description: doc.param_doc(&name).map(str::to_string),
                optional: binding.optional,
                default: None,
                name,
            })
        }
        swc_ast::Pat::Assign(assign) => {
            let mut param = extract_param(parsed, &assign.left, doc)?;
            param.optional = true;
            param.default = Some(collapse_whitespace(
                parsed.text_for_span(assign.right.span()),
            ));
            Some(param)
        }
        swc_ast::Pat::Rest(rest) => {
            let swc_ast::Pat::Ident(binding) = &*rest.arg else {
                return None;
            };
            let name = binding.sym.to_string();
            Some(MethodParam {
                ty: annotation_text(parsed, rest.type_ann.as_deref()),
                description: doc.param_doc(&name).map(str::to_string),
                optional: false,
                default: None,
                name: format!("...{}", name),
            })
        }
        // Destructuring patterns are not documented
        _ => None,
    }
}

fn annotation_text(parsed: &ParsedModule, ann: Option<&swc_ast::TsTypeAnn>) -> String {
    match ann {
        Some(ann) => parsed.text_for_span(ann.type_ann.span()).trim().to_string(),
        None => "any".to_string(),
    }
}

/// Render an initializer as a default-value snippet
///
/// Whitespace-collapsed, truncated beyond 50 characters with an ellipsis;
/// tagged styling/templating literals are replaced by a placeholder with
/// the body elided.
fn default_value_text(parsed: &ParsedModule, init: &swc_ast::Expr) -> String {
    if let swc_ast::Expr::TaggedTpl(tagged) = init {
        if let swc_ast::Expr::Ident(tag) = &*tagged.tag {
            if matches!(tag.sym.as_ref(), "css" | "html") {
                return format!("{}`…`", tag.sym);
            }
        }
    }

    let collapsed = collapse_whitespace(parsed.text_for_span(init.span()));
    if collapsed.chars().count() > MAX_DEFAULT_LEN {
        let truncated: String = collapsed.chars().take(MAX_DEFAULT_LEN).collect();
        format!("{}…", truncated)
    } else {
        collapsed
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Position of a member's leading JSDoc, accounting for decorators
fn member_doc_pos(
    span: Span,
    decorators: &[swc_ast::Decorator],
) -> deno_ast::swc::common::BytePos {
    match decorators.first() {
        Some(dec) if dec.span.lo < span.lo => dec.span.lo,
        _ => span.lo,
    }
}

fn is_private(accessibility: Option<swc_ast::Accessibility>) -> bool {
    matches!(
        accessibility,
        Some(swc_ast::Accessibility::Private) | Some(swc_ast::Accessibility::Protected)
    )
}

/// Convert a camelCase property name to its kebab-case attribute name
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
