//! JSDoc parsing and representation
//!
//! This module parses the structured comment tags that carry component
//! documentation: `@slot`, `@csspart`, `@cssproperty`, `@dependency`,
//! `@example`, plus the member-level tags `@param`, `@returns`,
//! `@deprecated`, `@required` and `@internal`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Regex for the `[default: value]` suffix on css custom property docs
    static ref CSS_DEFAULT_REGEX: Regex = Regex::new(r"\[default:\s*([^\]]*)\]\s*$").unwrap();
}

/// Parsed JSDoc documentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocComment {
    /// Main description text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Parsed JSDoc tags
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<DocTag>,
}

impl DocComment {
    /// Create a new empty doc
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse JSDoc from a comment string
    ///
    /// Accepts both a full `/** ... */` block and the inner text SWC
    /// reports for a block comment (leading `*` per line).
    pub fn parse(comment: &str) -> Self {
        let cleaned = clean_jsdoc_comment(comment);
        let description = extract_description(&cleaned);
        let tags = parse_tags(&cleaned);

        Self { description, tags }
    }

    /// Check if this doc is empty
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }

    /// Get the main description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get all @param tags
    pub fn params(&self) -> impl Iterator<Item = &DocTag> {
        self.tags
            .iter()
            .filter(|t| matches!(t, DocTag::Param { .. }))
    }

    /// Get the doc text of the @param tag matching `name`
    pub fn param_doc(&self, name: &str) -> Option<&str> {
        self.tags.iter().find_map(|t| match t {
            DocTag::Param { name: n, doc, .. } if n == name => doc.as_deref(),
            _ => None,
        })
    }

    /// Get the @returns tag
    pub fn returns(&self) -> Option<&DocTag> {
        self.tags
            .iter()
            .find(|t| matches!(t, DocTag::Returns { .. }))
    }

    /// Get the doc text of the @returns tag
    pub fn returns_doc(&self) -> Option<&str> {
        self.tags.iter().find_map(|t| match t {
            DocTag::Returns { doc, .. } => doc.as_deref(),
            _ => None,
        })
    }

    /// Get the @deprecated tag's message, if the tag is present
    ///
    /// `Some(None)` means a bare `@deprecated` with no message.
    pub fn deprecated(&self) -> Option<Option<&str>> {
        self.tags.iter().find_map(|t| match t {
            DocTag::Deprecated { doc } => Some(doc.as_deref()),
            _ => None,
        })
    }

    /// Check if marked @required
    pub fn is_required(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, DocTag::Required))
    }

    /// Check if marked @internal
    pub fn is_internal(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, DocTag::Internal))
    }

    /// Get all usage example blocks in declaration order
    pub fn examples(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(|t| match t {
            DocTag::Example { doc } => Some(doc.as_str()),
            _ => None,
        })
    }

    /// Get all @dependency names in declaration order
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(|t| match t {
            DocTag::Dependency { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// JSDoc tag types recognized by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DocTag {
    /// @slot name - description (empty name = default slot)
    #[serde(rename_all = "camelCase")]
    Slot {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },

    /// @cssproperty --name - description [default: value]
    #[serde(rename_all = "camelCase")]
    CssProperty {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },

    /// @csspart name - description
    #[serde(rename_all = "camelCase")]
    CssPart {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },

    /// @dependency name
    #[serde(rename_all = "camelCase")]
    Dependency { name: String },

    /// @example / @usage
    #[serde(rename_all = "camelCase")]
    Example { doc: String },

    /// @param {type} name - description
    #[serde(rename_all = "camelCase")]
    Param {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_ref: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
        #[serde(default)]
        optional: bool,
    },

    /// @returns {type} description
    #[serde(rename_all = "camelCase")]
    Returns {
        #[serde(skip_serializing_if = "Option::is_none")]
        type_ref: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },

    /// @deprecated message
    #[serde(rename_all = "camelCase")]
    Deprecated {
        #[serde(skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },

    /// @required
    Required,

    /// @internal
    Internal,

    /// Unknown/custom tag
    #[serde(rename_all = "camelCase")]
    Unknown { tag: String, value: String },
}

/// Clean JSDoc comment by removing delimiters and normalizing whitespace
fn clean_jsdoc_comment(comment: &str) -> String {
    let mut result = String::new();

    for line in comment.lines() {
        let trimmed = line.trim();

        // Skip opening/closing delimiters
        if trimmed == "/**" || trimmed == "*/" {
            continue;
        }

        let mut content = trimmed;

        if content.starts_with("/**") {
            content = content.trim_start_matches("/**").trim_start();
        }

        // Remove leading * and whitespace
        if content.starts_with("* ") {
            content = &content[2..];
        } else if content.starts_with('*') {
            content = &content[1..];
        }

        if content.ends_with("*/") {
            content = content.trim_end_matches("*/").trim_end();
        }

        if !result.is_empty() && !content.is_empty() {
            result.push('\n');
        }
        result.push_str(content);
    }

    result.trim().to_string()
}

/// Extract description text before the first tag
fn extract_description(text: &str) -> Option<String> {
    let first_tag_pos =
        text.find("\n@")
            .or_else(|| if text.starts_with('@') { Some(0) } else { None });

    let desc = match first_tag_pos {
        Some(0) => return None,
        Some(pos) => &text[..pos],
        None => text,
    };

    let trimmed = desc.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse all JSDoc tags from the cleaned comment
fn parse_tags(text: &str) -> Vec<DocTag> {
    let mut tags = Vec::new();
    let mut current_tag: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(after_at) = trimmed.strip_prefix('@') {
            // Save previous tag
            if let Some((tag_name, content)) = current_tag.take() {
                tags.push(parse_single_tag(&tag_name, &content));
            }

            // Start new tag
            if let Some(space_pos) = after_at.find(' ') {
                let tag_name = after_at[..space_pos].to_string();
                let content = after_at[space_pos + 1..].to_string();
                current_tag = Some((tag_name, content));
            } else {
                current_tag = Some((after_at.to_string(), String::new()));
            }
        } else if let Some((_, ref mut content)) = current_tag {
            // Continue multi-line tag content
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(trimmed);
        }
    }

    if let Some((tag_name, content)) = current_tag {
        tags.push(parse_single_tag(&tag_name, &content));
    }

    tags
}

/// Parse a single JSDoc tag
fn parse_single_tag(tag_name: &str, content: &str) -> DocTag {
    let content = content.trim();

    match tag_name {
        "slot" => parse_slot_tag(content),
        "cssproperty" | "cssprop" => parse_css_property_tag(content),
        "csspart" => {
            let (name, doc) = split_name_and_doc(content);
            DocTag::CssPart { name, doc }
        }
        "dependency" => DocTag::Dependency {
            name: content.to_string(),
        },
        "example" | "usage" => DocTag::Example {
            doc: content.to_string(),
        },
        "param" | "arg" | "argument" => parse_param_tag(content),
        "returns" | "return" => parse_returns_tag(content),
        "deprecated" => DocTag::Deprecated {
            doc: if content.is_empty() {
                None
            } else {
                Some(content.to_string())
            },
        },
        "required" => DocTag::Required,
        "internal" => DocTag::Internal,
        _ => DocTag::Unknown {
            tag: tag_name.to_string(),
            value: content.to_string(),
        },
    }
}

/// Parse @slot tag content
///
/// A bare `-` token before the description denotes the default slot and
/// is normalized to the empty name.
fn parse_slot_tag(content: &str) -> DocTag {
    let (name, doc) = split_name_and_doc(content);
    let name = if name == "-" { String::new() } else { name };
    DocTag::Slot { name, doc }
}

/// Parse @cssproperty tag content, splitting out a `[default: ...]` suffix
fn parse_css_property_tag(content: &str) -> DocTag {
    let (name, doc) = split_name_and_doc(content);

    let (doc, default) = match doc {
        Some(d) => {
            if let Some(caps) = CSS_DEFAULT_REGEX.captures(&d) {
                let default = caps.get(1).map(|m| m.as_str().trim().to_string());
                let stripped = CSS_DEFAULT_REGEX.replace(&d, "").trim().to_string();
                let doc = if stripped.is_empty() {
                    None
                } else {
                    Some(stripped)
                };
                (doc, default)
            } else {
                (Some(d), None)
            }
        }
        None => (None, None),
    };

    DocTag::CssProperty { name, doc, default }
}

/// Parse @param tag content
fn parse_param_tag(content: &str) -> DocTag {
    let (type_ref, rest) = extract_type_and_rest(content);

    // Check for optional [name] syntax
    let (name, optional, doc) = if rest.starts_with('[') {
        if let Some(bracket_end) = rest.find(']') {
            let bracket_content = &rest[1..bracket_end];
            let after_bracket = rest[bracket_end + 1..].trim();

            // A default in the brackets is part of the name field, drop it
            let name = match bracket_content.find('=') {
                Some(eq_pos) => bracket_content[..eq_pos].trim().to_string(),
                None => bracket_content.trim().to_string(),
            };

            let doc = {
                let trimmed = after_bracket.trim_start_matches('-').trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            };
            (name, true, doc)
        } else {
            (rest.to_string(), false, None)
        }
    } else {
        let (name, doc) = split_name_and_doc(rest);
        (name, false, doc)
    };

    DocTag::Param {
        name,
        type_ref,
        doc,
        optional,
    }
}

/// Parse @returns tag content
fn parse_returns_tag(content: &str) -> DocTag {
    let (type_ref, rest) = extract_type_and_rest(content);
    let doc = if rest.is_empty() {
        None
    } else {
        Some(rest.trim_start_matches('-').trim().to_string())
    };

    DocTag::Returns { type_ref, doc }
}

/// Extract type from {type} at start of content
fn extract_type_and_rest(content: &str) -> (Option<String>, &str) {
    if content.starts_with('{') {
        if let Some(close_pos) = find_matching_brace(content) {
            let type_str = &content[1..close_pos];
            let rest = content[close_pos + 1..].trim();
            (Some(type_str.to_string()), rest)
        } else {
            (None, content)
        }
    } else {
        (None, content)
    }
}

/// Find matching closing brace, handling nested braces
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.chars().enumerate() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split "name - description" or "name description"
fn split_name_and_doc(s: &str) -> (String, Option<String>) {
    let s = s.trim();

    // Try "name - description" first
    if let Some(dash_pos) = s.find(" - ") {
        let name = s[..dash_pos].trim().to_string();
        let doc = s[dash_pos + 3..].trim().to_string();
        return (name, Some(doc));
    }

    // Otherwise split on first whitespace
    if let Some(space_pos) = s.find(char::is_whitespace) {
        let name = s[..space_pos].trim().to_string();
        let doc = s[space_pos..].trim().to_string();
        if doc.is_empty() {
            (name, None)
        } else {
            (name, Some(doc))
        }
    } else {
        (s.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_jsdoc() {
        let doc = DocComment::parse("/** Hello world */");
        assert_eq!(doc.description(), Some("Hello world"));
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_parse_slot_named() {
        let doc = DocComment::parse("/** @slot icon - The icon area */");
        assert_eq!(
            doc.tags,
            vec![DocTag::Slot {
                name: "icon".to_string(),
                doc: Some("The icon area".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_slot_default() {
        let doc = DocComment::parse("/** @slot - The default content */");
        assert_eq!(
            doc.tags,
            vec![DocTag::Slot {
                name: String::new(),
                doc: Some("The default content".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_slot_bare() {
        let doc = DocComment::parse("/** @slot */");
        assert_eq!(
            doc.tags,
            vec![DocTag::Slot {
                name: String::new(),
                doc: None,
            }]
        );
    }

    #[test]
    fn test_parse_css_property_with_default() {
        let doc =
            DocComment::parse("/** @cssproperty --button-color - Button text color [default: #000] */");
        assert_eq!(
            doc.tags,
            vec![DocTag::CssProperty {
                name: "--button-color".to_string(),
                doc: Some("Button text color".to_string()),
                default: Some("#000".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_css_property_without_default() {
        let doc = DocComment::parse("/** @cssprop --gap - Spacing between items */");
        assert_eq!(
            doc.tags,
            vec![DocTag::CssProperty {
                name: "--gap".to_string(),
                doc: Some("Spacing between items".to_string()),
                default: None,
            }]
        );
    }

    #[test]
    fn test_parse_csspart() {
        let doc = DocComment::parse("/** @csspart base - The wrapper element */");
        assert_eq!(
            doc.tags,
            vec![DocTag::CssPart {
                name: "base".to_string(),
                doc: Some("The wrapper element".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_typed_param() {
        let doc = DocComment::parse("/** @param {string} path - The path */");
        let params: Vec<_> = doc.params().collect();
        assert_eq!(params.len(), 1);

        if let DocTag::Param {
            name,
            type_ref,
            doc,
            ..
        } = &params[0]
        {
            assert_eq!(name, "path");
            assert_eq!(type_ref.as_deref(), Some("string"));
            assert_eq!(doc.as_deref(), Some("The path"));
        } else {
            panic!("Expected Param tag");
        }
    }

    #[test]
    fn test_parse_optional_param() {
        let doc = DocComment::parse("/** @param [encoding] - Optional encoding */");
        if let DocTag::Param { name, optional, .. } = &doc.tags[0] {
            assert_eq!(name, "encoding");
            assert!(*optional);
        } else {
            panic!("Expected Param tag");
        }
    }

    #[test]
    fn test_parse_deprecated() {
        let doc = DocComment::parse("/** @deprecated Use `newThing` instead */");
        assert_eq!(doc.deprecated(), Some(Some("Use `newThing` instead")));

        let doc = DocComment::parse("/** @deprecated */");
        assert_eq!(doc.deprecated(), Some(None));
    }

    #[test]
    fn test_parse_example_multiline() {
        let doc = DocComment::parse(
            r#"/**
             * A button.
             * @example
             * <my-button label="Go"></my-button>
             * <my-button disabled></my-button>
             */"#,
        );

        let examples: Vec<_> = doc.examples().collect();
        assert_eq!(examples.len(), 1);
        assert!(examples[0].contains("label=\"Go\""));
        assert!(examples[0].contains("disabled"));
    }

    #[test]
    fn test_parse_dependency() {
        let doc = DocComment::parse(
            r#"/**
             * @dependency my-icon
             * @dependency my-spinner
             */"#,
        );
        let deps: Vec<_> = doc.dependencies().collect();
        assert_eq!(deps, vec!["my-icon", "my-spinner"]);
    }

    #[test]
    fn test_required_and_internal() {
        let doc = DocComment::parse("/** @required */");
        assert!(doc.is_required());
        assert!(!doc.is_internal());

        let doc = DocComment::parse("/** @internal */");
        assert!(doc.is_internal());
    }

    #[test]
    fn test_description_before_tags() {
        let doc = DocComment::parse(
            r#"/**
             * Buttons represent actions.
             * @slot - Content
             */"#,
        );
        assert_eq!(doc.description(), Some("Buttons represent actions."));
        assert_eq!(doc.tags.len(), 1);
    }
}
