//! tagdoc: component metadata extraction for custom elements
//!
//! This crate extracts structured documentation facts (properties, events,
//! methods, slots, css custom properties, css shadow parts) from
//! TypeScript/JavaScript sources that declare custom elements built by
//! mixin composition, by:
//! - Parsing source files using deno_ast/SWC
//! - Indexing class-like declarations, mixin-shaped functions, and imports
//! - Reading decorators and JSDoc tags off syntax nodes
//! - Resolving mixin composition chains across files, memoized and
//!   cycle-safe, and merging each layer's fragment into one record
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌────────────────┐
//! │ utils::swc   │───▶│ index         │───▶│ resolve        │
//! │ (parse)      │    │ (decls/imports)│   │ (merge engine) │
//! └──────────────┘    └───────────────┘    └───────┬────────┘
//!        │                    ▲                    │
//!        ▼                    │                    ▼
//! ┌──────────────┐    ┌───────────────┐    ┌────────────────┐
//! │ js_doc       │    │ specifier     │    │ ComponentDoc   │
//! │ (tags)       │    │ (path probes) │    │ (facts)        │
//! └──────────────┘    └───────────────┘    └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use tagdoc::resolve_component;
//!
//! let doc = resolve_component("src/my-button.ts").unwrap();
//! if let Some(doc) = doc {
//!     println!("<{}> has {} properties", doc.tag_name, doc.parts.properties.len());
//! }
//! ```

// Core types
pub mod diagnostics;
pub mod facts;
pub mod js_doc;

// Extraction
pub mod events;
pub mod extract;
pub mod type_infer;

// Indexing and resolution
pub mod heritage;
pub mod index;
pub mod resolve;
pub mod specifier;

// Output and utilities
pub mod printer;
pub mod utils;

// Re-exports for convenience
pub use diagnostics::{Diagnostic, DiagnosticsCollector, TagdocError, TagdocResult};
pub use facts::{
    ClassDocParts, ComponentDoc, CssPartFact, CssPropertyFact, Deprecation, EventFact, Location,
    MethodFact, MethodParam, MethodReturn, PropertyFact, SlotFact,
};
pub use heritage::{heritage_names, HeritageRef};
pub use index::{build_file_info, DeclRecord, FileInfo, ImportKind, ImportRecord};
pub use js_doc::{DocComment, DocTag};
pub use printer::ComponentPrinter;
pub use resolve::{resolve_component, resolve_component_with_diagnostics};
pub use specifier::resolve_specifier;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
