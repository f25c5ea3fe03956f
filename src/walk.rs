//! Depth-first, pre-order traversal with per-node filter decisions.
//!
//! Documents and fragments are transparent: their own node is never offered
//! to the filter, but their children are walked whatever the flags say.
//! Elements (and text nodes given as the root) go through `accept_node`:
//!
//! - `Accept` visits the node for attribute processing (when it has
//!   attributes and attribute rewriting is on) and walks its children.
//! - `Skip` walks the children without visiting the node.
//! - `Reject` does neither.
//!
//! Child elements are recursed into only when `subtree` is on. Child text
//! nodes are leaves: with `character_data` on, each one is offered to the
//! filter and visited on `Accept`. Everything else is passed over.

use crate::config::ResolvedOptions;
use crate::errors::ReplaceError;
use crate::tree::{FilterResult, NodeKind, NodeRef, NodeTree};
use tracing::trace;

/// Walk `root` and call `visit` for every node selected for rewriting.
///
/// The first error from a filter or from `visit` stops the walk and is
/// returned as is.
pub fn walk<T, V>(
    tree: &mut T,
    root: T::Node,
    options: &ResolvedOptions<'_, '_, T>,
    visit: &mut V,
) -> Result<(), ReplaceError>
where
    T: NodeTree,
    V: FnMut(&mut T, T::Node) -> Result<(), ReplaceError>,
{
    let flags = options.flags;

    let walk_children = match tree.kind(root) {
        NodeKind::Document | NodeKind::DocumentFragment => true,
        NodeKind::Ignored(_) => false,
        NodeKind::Element | NodeKind::Text => {
            let decision = options.accept_node(NodeRef::new(&*tree, root))?;
            trace!(node = ?root, ?decision, "accept_node");

            if flags.attributes && decision == FilterResult::Accept && tree.has_attributes(root) {
                visit(tree, root)?;
            }

            (flags.subtree || flags.character_data)
                && decision != FilterResult::Reject
                && tree.has_child_nodes(root)
        }
    };

    if !walk_children {
        return Ok(());
    }

    for child in tree.child_nodes(root) {
        match tree.kind(child) {
            NodeKind::Element if flags.subtree => walk(tree, child, options, visit)?,
            NodeKind::Text if flags.character_data => {
                let decision = options.accept_node(NodeRef::new(&*tree, child))?;
                trace!(node = ?child, ?decision, "accept_node");
                if decision == FilterResult::Accept {
                    visit(tree, child)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReplaceOptions;
    use crate::dom::{Document, NodeId};
    use std::cell::RefCell;

    /// `<div attr><text/><nested attr><text/></nested></div>` under the
    /// document node.
    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        doc.set_attribute(div, "attr", "v").unwrap();
        doc.append_text(div, "t1").unwrap();
        let nested = doc.append_element(div, "nested").unwrap();
        doc.set_attribute(nested, "attr", "v").unwrap();
        doc.append_text(nested, "t2").unwrap();
        (doc, div, nested)
    }

    fn visited(doc: &mut Document, root: NodeId, options: &ReplaceOptions<'_, Document>) -> Vec<String> {
        let resolved = options.resolve().unwrap();
        let mut names = Vec::new();
        walk(doc, root, &resolved, &mut |tree: &mut Document, node| {
            let label = match tree.text(node) {
                Some(text) => format!("#text:{text}"),
                None => tree.node_name(node),
            };
            names.push(label);
            Ok(())
        })
        .unwrap();
        names
    }

    #[test]
    fn default_walk_visits_elements_then_text_in_order() {
        let (mut doc, div, _) = sample();
        let names = visited(&mut doc, div, &ReplaceOptions::new());
        assert_eq!(names, ["DIV", "#text:t1", "NESTED", "#text:t2"]);
    }

    #[test]
    fn document_root_is_transparent() {
        let (mut doc, _, _) = sample();
        let root = doc.root();
        let names = visited(&mut doc, root, &ReplaceOptions::new());
        assert_eq!(names, ["DIV", "#text:t1", "NESTED", "#text:t2"]);
    }

    #[test]
    fn document_root_walks_direct_text_children() {
        let mut doc = Document::new();
        let fragment = doc.create_fragment();
        doc.append_text(fragment, "loose").unwrap();
        let names = visited(&mut doc, fragment, &ReplaceOptions::new());
        assert_eq!(names, ["#text:loose"]);
    }

    #[test]
    fn subtree_off_stays_on_root() {
        let (mut doc, div, _) = sample();
        let names = visited(&mut doc, div, &ReplaceOptions::new().subtree(false));
        assert_eq!(names, ["DIV", "#text:t1"]);
    }

    #[test]
    fn character_data_off_skips_text() {
        let (mut doc, div, _) = sample();
        let names = visited(&mut doc, div, &ReplaceOptions::new().character_data(false));
        assert_eq!(names, ["DIV", "NESTED"]);
    }

    #[test]
    fn attributes_off_skips_elements() {
        let (mut doc, div, _) = sample();
        let names = visited(&mut doc, div, &ReplaceOptions::new().attributes(false));
        assert_eq!(names, ["#text:t1", "#text:t2"]);
    }

    #[test]
    fn element_without_attributes_is_not_visited() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        doc.append_text(div, "t").unwrap();
        let names = visited(&mut doc, div, &ReplaceOptions::new());
        assert_eq!(names, ["#text:t"]);
    }

    #[test]
    fn skip_and_reject() {
        let (mut doc, div, nested) = sample();
        let options = ReplaceOptions::new().accept_node(|node: NodeRef<'_, Document>| {
            if node.id() == div {
                FilterResult::Skip
            } else {
                FilterResult::Accept
            }
        });
        let names = visited(&mut doc, div, &options);
        assert_eq!(names, ["#text:t1", "NESTED", "#text:t2"]);

        let options = ReplaceOptions::new().accept_node(|node: NodeRef<'_, Document>| {
            if node.id() == nested {
                FilterResult::Reject
            } else {
                FilterResult::Accept
            }
        });
        let names = visited(&mut doc, div, &options);
        assert_eq!(names, ["DIV", "#text:t1"]);
    }

    #[test]
    fn rejected_text_is_not_visited() {
        let (mut doc, div, _) = sample();
        let options = ReplaceOptions::new().accept_node(|node: NodeRef<'_, Document>| {
            if node.text() == Some("t1") {
                FilterResult::Reject
            } else {
                FilterResult::Accept
            }
        });
        let names = visited(&mut doc, div, &options);
        assert_eq!(names, ["DIV", "NESTED", "#text:t2"]);
    }

    #[test]
    fn filter_sees_candidates_in_document_order() {
        let (mut doc, div, _) = sample();
        let calls = RefCell::new(Vec::new());
        let options = ReplaceOptions::new().accept_node(|node: NodeRef<'_, Document>| {
            calls.borrow_mut().push(node.node_name());
            FilterResult::Accept
        });
        visited(&mut doc, div, &options);
        assert_eq!(*calls.borrow(), ["DIV", "#text", "NESTED", "#text"]);
    }

    #[test]
    fn text_root_is_never_visited() {
        let mut doc = Document::new();
        let text = doc.append_text(doc.root(), "alone").unwrap();
        let names = visited(&mut doc, text, &ReplaceOptions::new());
        assert!(names.is_empty());
    }

    #[test]
    fn ignored_kinds_contribute_nothing() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        let comment = doc.create_comment("c");
        doc.append_child(div, comment).unwrap();
        let cdata = doc.create_cdata_section("d");
        doc.append_child(div, cdata).unwrap();

        assert!(visited(&mut doc, div, &ReplaceOptions::new()).is_empty());
        assert!(visited(&mut doc, comment, &ReplaceOptions::new()).is_empty());
    }

    #[test]
    fn template_content_is_unreachable() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        let template = doc.create_template();
        doc.append_child(div, template).unwrap();
        let content = doc.template_content(template).unwrap();
        let inner = doc.append_element(content, "inner").unwrap();
        doc.set_attribute(inner, "attr", "v").unwrap();
        doc.append_text(inner, "hidden").unwrap();

        assert!(visited(&mut doc, div, &ReplaceOptions::new()).is_empty());
        assert!(visited(&mut doc, template, &ReplaceOptions::new()).is_empty());
    }

    #[test]
    fn filter_error_stops_the_walk() {
        let (mut doc, div, nested) = sample();
        let options = ReplaceOptions::new().try_accept_node(|node: NodeRef<'_, Document>| {
            if node.id() == nested {
                Err("boom".into())
            } else {
                Ok(FilterResult::Accept)
            }
        });
        let resolved = options.resolve().unwrap();
        let mut count = 0;
        let result = walk(&mut doc, div, &resolved, &mut |_: &mut Document, _| {
            count += 1;
            Ok(())
        });
        assert!(matches!(result, Err(ReplaceError::Filter(_))));
        assert_eq!(count, 2);
    }
}
