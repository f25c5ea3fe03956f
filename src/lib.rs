//! replace-dom-string: in-place pattern substitution across a document tree
//!
//! Given one or more needles (literal text or regular expressions) and their
//! replacements, rewrites matching attribute values and text-node contents
//! under a root node. Which nodes and attributes are touched is controlled
//! per call through [`ReplaceOptions`].
//!
//! # Architecture
//!
//! - [`needle`] normalizes needles and replacements into an ordered list of
//!   compiled [`Substitution`]s.
//! - [`walk`] performs the filtered depth-first traversal.
//! - [`replace`] ties both together and performs the rewrites.
//! - [`tree::NodeTree`] is the only thing the engine knows about a tree;
//!   [`dom::Document`] is the bundled arena implementation.
//!
//! Only attribute values and text payloads change. Nodes are never inserted,
//! removed or reordered, and the inert content of `<template>` elements is
//! never reached.
//!
//! # Example
//!
//! ```
//! use replace_dom_string::{replace_content, Document};
//!
//! let mut doc = Document::new();
//! let div = doc.append_element(doc.root(), "div").unwrap();
//! doc.set_attribute(div, "title", "Hello {{name}}").unwrap();
//! doc.append_text(div, "Hi {{name}}!").unwrap();
//!
//! replace_content("{{name}}", "World", &mut doc, div).unwrap();
//!
//! assert_eq!(doc.outer_html(div), r#"<div title="Hello World">Hi World!</div>"#);
//! ```

pub mod config;
pub mod dom;
pub mod errors;
pub mod needle;
pub mod replace;
pub mod tree;
pub mod walk;

// Re-exports
pub use config::{OptionFlags, ReplaceOptions, DEFAULT_FLAGS};
pub use dom::{Document, DomError, MutationRecord, NodeId};
pub use errors::{FilterError, ReplaceError};
pub use needle::{normalize, Needle, Needles, Replacements, Substitution};
pub use replace::{apply_substitutions, replace_content, replace_content_json, replace_content_with};
pub use tree::{AttributeRef, FilterResult, IgnoredKind, NodeKind, NodeRef, NodeTree};
