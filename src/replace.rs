//! Public entry points: argument validation, then walk-and-rewrite.

use crate::config::{ReplaceOptions, ResolvedOptions};
use crate::errors::ReplaceError;
use crate::needle::{apply_all, normalize, Needles, Replacements, Substitution};
use crate::tree::{AttributeRef, NodeKind, NodeRef, NodeTree};
use crate::walk::walk;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

/// Replace every match of `needles` with the paired `replacements` in the
/// attribute values and text nodes under `root`, using default options.
///
/// A value is written back only when at least one needle matched it, so
/// unmatched attributes and text nodes see no write at all.
///
/// # Errors
///
/// Argument errors ([`ReplaceError::InvalidArgument`],
/// [`ReplaceError::LengthMismatch`]) are returned before any node is
/// touched. A failing filter callback aborts the walk with
/// [`ReplaceError::Filter`], leaving earlier rewrites in place.
pub fn replace_content<T: NodeTree>(
    needles: impl Into<Needles>,
    replacements: impl Into<Replacements>,
    tree: &mut T,
    root: T::Node,
) -> Result<(), ReplaceError> {
    replace_content_with(needles, replacements, tree, root, &ReplaceOptions::default())
}

/// [`replace_content`] with caller options.
pub fn replace_content_with<T: NodeTree>(
    needles: impl Into<Needles>,
    replacements: impl Into<Replacements>,
    tree: &mut T,
    root: T::Node,
    options: &ReplaceOptions<'_, T>,
) -> Result<(), ReplaceError> {
    let substitutions = normalize(needles, replacements)?;
    apply_substitutions(&substitutions, tree, root, options)
}

/// Entry point for dynamically shaped input, e.g. arguments arriving over a
/// scripting or RPC boundary.
///
/// `needles` is a string, a `{"pattern", "flags"}` object or an array of
/// those; `replacements` is a string or an array of strings; `options`, when
/// given, must be an object of flags.
pub fn replace_content_json<T: NodeTree>(
    needles: &Value,
    replacements: &Value,
    tree: &mut T,
    root: T::Node,
    options: Option<&Value>,
) -> Result<(), ReplaceError> {
    let needles = Needles::try_from(needles)?;
    let replacements = Replacements::try_from(replacements)?;
    let substitutions = normalize(needles, replacements)?;
    let options = match options {
        Some(value) => ReplaceOptions::from_json(value)?,
        None => ReplaceOptions::default(),
    };
    apply_substitutions(&substitutions, tree, root, &options)
}

/// Run already-compiled substitutions over `root`.
pub fn apply_substitutions<T: NodeTree>(
    substitutions: &[Substitution],
    tree: &mut T,
    root: T::Node,
    options: &ReplaceOptions<'_, T>,
) -> Result<(), ReplaceError> {
    if !tree.contains(root) {
        return Err(ReplaceError::invalid("Target must be a Node"));
    }
    let resolved = options.resolve()?;

    let mut stats = RewriteStats::default();
    let result = walk(tree, root, &resolved, &mut |tree: &mut T, node| {
        rewrite(tree, node, substitutions, &resolved, &mut stats)
    });

    debug!(
        substitutions = substitutions.len(),
        elements = stats.elements,
        text_nodes = stats.text_nodes,
        changed = stats.changed,
        completed = result.is_ok(),
        "replace_content finished"
    );
    result
}

#[derive(Debug, Default)]
struct RewriteStats {
    elements: usize,
    text_nodes: usize,
    changed: usize,
}

fn rewrite<T: NodeTree>(
    tree: &mut T,
    node: T::Node,
    substitutions: &[Substitution],
    options: &ResolvedOptions<'_, '_, T>,
    stats: &mut RewriteStats,
) -> Result<(), ReplaceError> {
    match tree.kind(node) {
        NodeKind::Element => {
            stats.elements += 1;
            // Snapshot: writes below must not disturb the iteration.
            for name in tree.attribute_names(node) {
                let Some(value) = tree.attribute(node, &name) else {
                    continue;
                };
                let attribute = AttributeRef::new(&name, value, NodeRef::new(&*tree, node));
                if !options.accept_attribute(attribute)? {
                    continue;
                }
                if let Some(updated) = rewritten(substitutions, value) {
                    tree.set_attribute(node, &name, updated);
                    stats.changed += 1;
                }
            }
        }
        NodeKind::Text => {
            stats.text_nodes += 1;
            let updated = tree
                .text(node)
                .and_then(|text| rewritten(substitutions, text));
            if let Some(updated) = updated {
                tree.set_text(node, updated);
                stats.changed += 1;
            }
        }
        _ => {}
    }
    Ok(())
}

/// The new value, or `None` when no substitution matched.
fn rewritten(substitutions: &[Substitution], value: &str) -> Option<String> {
    match apply_all(substitutions, value) {
        Cow::Owned(updated) => Some(updated),
        Cow::Borrowed(_) => None,
    }
}
