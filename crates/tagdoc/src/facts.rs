//! Documentation fact types and the mergeable fragment
//!
//! `ClassDocParts` is the unit of extraction and the unit of merge: every
//! class-like declaration (component or mixin) resolves to one, and mixin
//! resolution composes fragments with `ClassDocParts::merge`.
//!
//! Collections are deduplicated by name at merge time, never at extraction
//! time, so a standalone fragment may contain duplicates if the source
//! does, but a merge never introduces one.

use serde::{Deserialize, Serialize};

/// Source location for a documented item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Source filename
    pub filename: String,
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column number
    pub col: usize,
}

impl Location {
    /// Create a new location
    pub fn new(filename: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            col,
        }
    }
}

/// A deprecation note: either a bare flag or a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deprecation {
    /// Bare `@deprecated`
    Flag(bool),
    /// `@deprecated` with a message
    Message(String),
}

impl Deprecation {
    /// Build from an optional message (bare tag = `true`)
    pub fn from_message(message: Option<&str>) -> Self {
        match message {
            Some(m) => Deprecation::Message(m.to_string()),
            None => Deprecation::Flag(true),
        }
    }
}

/// A documented slot (`@slot name - description`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFact {
    /// Slot name; empty for the default slot
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// A themeable css custom property (`@cssproperty --name - description`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssPropertyFact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<String>,
}

/// A shadow part exposed for external styling (`@csspart name - description`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssPartFact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// A documented reactive property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFact {
    /// Property name
    pub name: String,
    /// Associated attribute name; None when attributes are disabled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attribute: Option<String>,
    /// Normalized type label
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub ty: Option<String>,
    /// Whether the property reflects back to its attribute
    #[serde(default)]
    pub reflects: bool,
    /// Whether this is internal reactive state (`@state`)
    #[serde(default)]
    pub internal: bool,
    /// Whether the property is marked `@required`
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deprecated: Option<Deprecation>,
    /// Default value as source text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// A dispatched custom event, derived from method bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFact {
    /// Event name (first string argument to the event constructor)
    pub name: String,
    /// Detail type label, captured verbatim from the constructor type argument
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail_type: Option<String>,
    /// Set only when the init object carries a literal `true`/`false`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bubbles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub composed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cancelable: Option<bool>,
}

/// A documented method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodParam {
    pub name: String,
    /// Type annotation source text, or `any` when absent
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<String>,
}

/// A documented method return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodReturn {
    /// Return type annotation source text
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// A documented public method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deprecated: Option<Deprecation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub params: Vec<MethodParam>,
    /// Present only when the method carries a return type annotation
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub returns: Option<MethodReturn>,
}

/// The mergeable documentation fragment of one class-like declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocParts {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Usage example blocks, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
    /// Names of other components this one depends on
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub slots: Vec<SlotFact>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub css_properties: Vec<CssPropertyFact>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub css_parts: Vec<CssPartFact>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub properties: Vec<PropertyFact>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<EventFact>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub methods: Vec<MethodFact>,
}

/// Facts that deduplicate by name during a merge
trait NamedFact {
    fn fact_name(&self) -> &str;
}

macro_rules! named_fact {
    ($($ty:ty),*) => {
        $(impl NamedFact for $ty {
            fn fact_name(&self) -> &str {
                &self.name
            }
        })*
    };
}

named_fact!(
    SlotFact,
    CssPropertyFact,
    CssPartFact,
    PropertyFact,
    EventFact,
    MethodFact
);

/// Append entries from `source` whose name is not already in `target`
fn merge_named<T: NamedFact + Clone>(target: &mut Vec<T>, source: &[T]) {
    for entry in source {
        if !target.iter().any(|e| e.fact_name() == entry.fact_name()) {
            target.push(entry.clone());
        }
    }
}

impl ClassDocParts {
    /// Create an empty fragment (no contribution)
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the fragment contributes nothing
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.examples.is_empty()
            && self.dependencies.is_empty()
            && self.slots.is_empty()
            && self.css_properties.is_empty()
            && self.css_parts.is_empty()
            && self.properties.is_empty()
            && self.events.is_empty()
            && self.methods.is_empty()
    }

    /// Merge another fragment into this one
    ///
    /// The target's entries win name ties, so the more-specific/outer
    /// declaration keeps its facts. The description fills only when the
    /// target has none.
    pub fn merge(&mut self, source: &ClassDocParts) {
        if self.description.as_deref().map_or(true, str::is_empty) {
            if let Some(desc) = &source.description {
                if !desc.is_empty() {
                    self.description = Some(desc.clone());
                }
            }
        }

        for example in &source.examples {
            if !self.examples.contains(example) {
                self.examples.push(example.clone());
            }
        }
        for dep in &source.dependencies {
            if !self.dependencies.contains(dep) {
                self.dependencies.push(dep.clone());
            }
        }

        merge_named(&mut self.slots, &source.slots);
        merge_named(&mut self.css_properties, &source.css_properties);
        merge_named(&mut self.css_parts, &source.css_parts);
        merge_named(&mut self.properties, &source.properties);
        merge_named(&mut self.events, &source.events);
        merge_named(&mut self.methods, &source.methods);
    }
}

/// The fully resolved documentation record of one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDoc {
    /// Declared class name
    pub class_name: String,
    /// Registered custom element tag name
    pub tag_name: String,
    /// Source file path
    pub path: String,
    /// Location of the class declaration
    pub location: Location,
    /// The merged documentation fragment
    #[serde(flatten)]
    pub parts: ClassDocParts,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, desc: &str) -> SlotFact {
        SlotFact {
            name: name.to_string(),
            description: Some(desc.to_string()),
        }
    }

    #[test]
    fn test_merge_description_fills_only_when_empty() {
        let mut target = ClassDocParts {
            description: Some("Outer".to_string()),
            ..Default::default()
        };
        let source = ClassDocParts {
            description: Some("Inner".to_string()),
            ..Default::default()
        };
        target.merge(&source);
        assert_eq!(target.description.as_deref(), Some("Outer"));

        let mut empty = ClassDocParts::default();
        empty.merge(&source);
        assert_eq!(empty.description.as_deref(), Some("Inner"));
    }

    #[test]
    fn test_merge_name_dedup_target_wins() {
        let mut target = ClassDocParts {
            slots: vec![slot("icon", "from target")],
            ..Default::default()
        };
        let source = ClassDocParts {
            slots: vec![slot("icon", "from source"), slot("footer", "new")],
            ..Default::default()
        };
        target.merge(&source);

        assert_eq!(target.slots.len(), 2);
        assert_eq!(target.slots[0].description.as_deref(), Some("from target"));
        assert_eq!(target.slots[1].name, "footer");
    }

    #[test]
    fn test_merge_examples_exact_dedup() {
        let mut target = ClassDocParts {
            examples: vec!["<a></a>".to_string()],
            dependencies: vec!["my-icon".to_string()],
            ..Default::default()
        };
        let source = ClassDocParts {
            examples: vec!["<a></a>".to_string(), "<b></b>".to_string()],
            dependencies: vec!["my-icon".to_string(), "my-spinner".to_string()],
            ..Default::default()
        };
        target.merge(&source);

        assert_eq!(target.examples, vec!["<a></a>", "<b></b>"]);
        assert_eq!(target.dependencies, vec!["my-icon", "my-spinner"]);
    }

    #[test]
    fn test_is_empty() {
        assert!(ClassDocParts::new().is_empty());
        let parts = ClassDocParts {
            events: vec![EventFact {
                name: "change".to_string(),
                detail_type: None,
                bubbles: None,
                composed: None,
                cancelable: None,
            }],
            ..Default::default()
        };
        assert!(!parts.is_empty());
    }

    #[test]
    fn test_deprecation_serialization() {
        let flag = Deprecation::from_message(None);
        assert_eq!(serde_json::to_string(&flag).unwrap(), "true");

        let msg = Deprecation::from_message(Some("Use other"));
        assert_eq!(serde_json::to_string(&msg).unwrap(), "\"Use other\"");
    }
}
