//! Terminal summary printer
//!
//! Compact per-component output for batch runs: the tag name, the source
//! location, and counts per fact collection, with deprecation notices.
//! This is batch reporting, not documentation rendering.

use crate::facts::{ComponentDoc, Deprecation};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal printer for one resolved component
pub struct ComponentPrinter<'a> {
    doc: &'a ComponentDoc,
    use_color: bool,
}

impl<'a> ComponentPrinter<'a> {
    /// Create a new printer
    pub fn new(doc: &'a ComponentDoc, use_color: bool) -> Self {
        Self { doc, use_color }
    }

    /// Print directly to stdout
    pub fn print_to_stdout(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        if let Err(e) = self.write_colored(&mut stdout) {
            eprintln!("Error printing component summary: {}", e);
        }
    }

    /// Write with colors to a WriteColor implementor
    fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        let doc = self.doc;

        w.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(w, "<{}>", doc.tag_name)?;
        w.reset()?;
        writeln!(w, "  {} ({})", doc.class_name, doc.location.filename)?;

        let counts = self.counts();
        let rendered: Vec<String> = counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("{} {}", n, label))
            .collect();
        if !rendered.is_empty() {
            writeln!(w, "  {}", rendered.join(", "))?;
        }

        for (kind, name, note) in self.deprecations() {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(w, "  deprecated")?;
            w.reset()?;
            match note {
                Deprecation::Message(message) => {
                    writeln!(w, " {} `{}`: {}", kind, name, message)?
                }
                Deprecation::Flag(_) => writeln!(w, " {} `{}`", kind, name)?,
            }
        }

        Ok(())
    }

    fn counts(&self) -> [(&'static str, usize); 6] {
        let parts = &self.doc.parts;
        [
            ("properties", parts.properties.len()),
            ("events", parts.events.len()),
            ("methods", parts.methods.len()),
            ("slots", parts.slots.len()),
            ("css properties", parts.css_properties.len()),
            ("css parts", parts.css_parts.len()),
        ]
    }

    fn deprecations(&self) -> Vec<(&'static str, &str, &Deprecation)> {
        let parts = &self.doc.parts;
        let mut out = Vec::new();
        for prop in &parts.properties {
            if let Some(note) = &prop.deprecated {
                out.push(("property", prop.name.as_str(), note));
            }
        }
        for method in &parts.methods {
            if let Some(note) = &method.deprecated {
                out.push(("method", method.name.as_str(), note));
            }
        }
        out
    }
}

impl Display for ComponentPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let doc = self.doc;
        writeln!(
            f,
            "<{}>  {} ({})",
            doc.tag_name, doc.class_name, doc.location.filename
        )?;
        let rendered: Vec<String> = self
            .counts()
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("{} {}", n, label))
            .collect();
        if !rendered.is_empty() {
            writeln!(f, "  {}", rendered.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ClassDocParts, EventFact, Location, PropertyFact};

    fn sample_doc() -> ComponentDoc {
        ComponentDoc {
            class_name: "MyButton".to_string(),
            tag_name: "my-button".to_string(),
            path: "/src/button.ts".to_string(),
            location: Location::new("/src/button.ts", 4, 0),
            parts: ClassDocParts {
                properties: vec![PropertyFact {
                    name: "label".to_string(),
                    attribute: Some("label".to_string()),
                    ty: Some("string".to_string()),
                    reflects: false,
                    internal: false,
                    required: false,
                    deprecated: None,
                    default: None,
                    description: None,
                }],
                events: vec![EventFact {
                    name: "my-click".to_string(),
                    detail_type: None,
                    bubbles: None,
                    composed: None,
                    cancelable: None,
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_display_summary() {
        let doc = sample_doc();
        let printer = ComponentPrinter::new(&doc, false);
        let output = printer.to_string();
        assert!(output.contains("<my-button>"));
        assert!(output.contains("MyButton"));
        assert!(output.contains("1 properties"));
        assert!(output.contains("1 events"));
        assert!(!output.contains("slots"));
    }
}
