//! SWC/deno_ast TypeScript parsing utilities
//!
//! This module provides utilities for parsing TypeScript files using deno_ast
//! (which wraps SWC). It handles:
//! - Parsing TypeScript/JavaScript files
//! - Extracting JSDoc block comments
//! - Location tracking
//! - Source text extraction

use crate::diagnostics::{TagdocError, TagdocResult};
use crate::facts::Location;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, SourceTextInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about the source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The file path
    pub path: PathBuf,
    /// The source text
    pub text: Arc<str>,
    /// Source text info for location lookups
    pub text_info: SourceTextInfo,
}

impl SourceInfo {
    /// Create source info from a file path and content
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text_info = SourceTextInfo::new(text.clone());
        Self {
            path: path.into(),
            text,
            text_info,
        }
    }

    /// Get the source text as a string slice
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Convert a byte position to a line and column
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        // Convert BytePos to SourcePos using the unsafe conversion
        // This is the correct pattern when receiving positions from SWC
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        let line_and_col = self.text_info.line_and_column_index(source_pos);
        (line_and_col.line_index + 1, line_and_col.column_index) // 1-indexed line, 0-indexed column
    }

    /// Convert a span to a Location
    pub fn span_to_location(&self, span: Span) -> Location {
        let (line, col) = self.line_col(span.lo);
        Location {
            filename: self.path.display().to_string(),
            line,
            col,
        }
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        let start = span.lo.0 as usize;
        let end = span.hi.0 as usize;
        &self.text[start..end.min(self.text.len())]
    }
}

/// A parsed TypeScript module with source information
#[derive(Debug)]
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// Source information for location lookups
    pub source_info: SourceInfo,
}

impl ParsedModule {
    /// Get the module AST
    pub fn module(&self) -> &swc_ast::Module {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => m,
            deno_ast::ProgramRef::Script(_) => {
                // This shouldn't happen for TypeScript modules, but provide a fallback
                panic!("Expected module but got script")
            }
        }
    }

    /// Get the source text
    pub fn source_text(&self) -> &str {
        self.source_info.source_text()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.source_info.path
    }

    /// Convert a span to a Location
    pub fn span_to_location(&self, span: Span) -> Location {
        self.source_info.span_to_location(span)
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_leading(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get the JSDoc comment leading an arbitrary position
    ///
    /// A mixin's JSDoc attaches to the outer statement (the function or
    /// variable declaration), not the class expression it returns, so
    /// lookups must be possible at positions other than a class span.
    pub fn jsdoc_at(&self, pos: BytePos) -> Option<String> {
        let leading = self.leading_comments(pos);

        // Find the last block comment (JSDoc style)
        for comment in leading.iter().rev() {
            if comment.kind == CommentKind::Block {
                let text = comment.text.to_string();
                // Check if it looks like JSDoc (starts with *)
                if text.starts_with('*') {
                    return Some(text);
                }
            }
        }
        None
    }

    /// Get JSDoc comment for a span (looks for leading block comments)
    pub fn jsdoc_for_span(&self, span: Span) -> Option<String> {
        self.jsdoc_at(span.lo)
    }
}

/// Parse a TypeScript file from disk
pub fn parse_typescript_file(path: impl AsRef<Path>) -> TagdocResult<ParsedModule> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        TagdocError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    parse_typescript_source(path, text)
}

/// Parse TypeScript source code from a string
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> TagdocResult<ParsedModule> {
    let path = path.as_ref();
    let source: Arc<str> = source.into();

    // Determine media type from extension
    let media_type = MediaType::from_path(path);

    // Create specifier from path
    let specifier = deno_ast::ModuleSpecifier::from_file_path(path)
        .map_err(|_| TagdocError::InvalidPath(path.display().to_string()))?;

    // Parse the source
    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| TagdocError::parse(path, format!("{}", e)))?;

    let source_info = SourceInfo::new(path, source);

    Ok(ParsedModule {
        source: parsed,
        source_info,
    })
}

/// Helper to convert an SWC string literal to a String
///
/// Wtf8Atom stores WTF-8 encoded data which is a superset of UTF-8.
pub fn str_value(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Get the name of a property key
pub fn prop_name_str(name: &swc_ast::PropName) -> Option<String> {
    match name {
        swc_ast::PropName::Ident(i) => Some(i.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(str_value(s)),
        swc_ast::PropName::Num(n) => Some(n.value.to_string()),
        swc_ast::PropName::BigInt(b) => Some(b.value.to_string()),
        swc_ast::PropName::Computed(_) => None, // Can't statically determine
    }
}

/// Get a dotted name from an expression
pub fn expr_to_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(str_value(s)),
        swc_ast::Expr::Member(m) => {
            let obj = expr_to_name(&m.obj)?;
            let prop = match &m.prop {
                swc_ast::MemberProp::Ident(i) => i.sym.to_string(),
                swc_ast::MemberProp::Computed(c) => expr_to_name(&c.expr)?,
                swc_ast::MemberProp::PrivateName(p) => format!("#{}", p.name),
            };
            Some(format!("{}.{}", obj, prop))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_source() {
        let source = r#"
            export class MyButton extends LitElement {
                label = 'Click me';
            }
        "#;

        // deno_ast requires absolute paths for file specifiers
        let parsed = parse_typescript_source("/tmp/test.ts", source).unwrap();
        assert!(!parsed.module().body.is_empty());
    }

    #[test]
    fn test_jsdoc_extraction() {
        let source = r#"
/**
 * A button component.
 * @slot - Button content
 */
export class MyButton {}
"#;

        let parsed = parse_typescript_source("/tmp/test.ts", source).unwrap();
        let module = parsed.module();

        if let Some(swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export))) =
            module.body.first()
        {
            let jsdoc = parsed.jsdoc_for_span(export.span);
            assert!(jsdoc.is_some());
            let jsdoc = jsdoc.unwrap();
            assert!(jsdoc.contains("A button component."));
            assert!(jsdoc.contains("@slot"));
        } else {
            panic!("Expected export declaration");
        }
    }

    #[test]
    fn test_text_for_span() {
        let source = "export const x: string = 'hello';";
        let parsed = parse_typescript_source("/tmp/test.ts", source).unwrap();
        use deno_ast::swc::common::Spanned;
        let span = parsed.module().body.first().unwrap().span();
        assert_eq!(parsed.text_for_span(span), source);
    }
}
