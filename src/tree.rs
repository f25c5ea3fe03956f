//! The read/write surface the replacement engine needs from a document tree.
//!
//! The engine never creates, removes or reorders nodes. It only discriminates
//! node kinds, enumerates children and attributes, and rewrites attribute
//! values and text payloads. Any tree that can answer those questions can be
//! used by implementing [`NodeTree`]; [`crate::dom::Document`] is the bundled
//! arena implementation.

use std::fmt;

/// Node kinds the walker knows how to treat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Transparent entry point; its children are always walked.
    Document,
    /// Transparent entry point; its children are always walked.
    DocumentFragment,
    Element,
    Text,
    /// Contributes nothing and is never descended into.
    Ignored(IgnoredKind),
}

/// Node kinds that are skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredKind {
    Attribute,
    CdataSection,
    Comment,
    DocumentType,
    Entity,
    EntityReference,
    Notation,
    ProcessingInstruction,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::DocumentFragment)
    }
}

/// Decision returned by a node filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterResult {
    /// Process the node and walk its children.
    #[default]
    Accept,
    /// Exclude the node and all of its descendants.
    Reject,
    /// Exclude the node itself; its children are still walked.
    Skip,
}

/// Capability surface of a mutable document tree.
///
/// `child_nodes` must enumerate live children in document order and must not
/// yield the inert content fragment of template-like elements. That is the
/// only mechanism by which template content is kept out of a traversal.
pub trait NodeTree {
    /// Cheap handle identifying a node within this tree.
    type Node: Copy + Eq + fmt::Debug;

    /// Whether `node` is a node of this tree.
    fn contains(&self, node: Self::Node) -> bool;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// DOM-style node name: upper-cased tag for elements, `#text` and friends
    /// for everything else.
    fn node_name(&self, node: Self::Node) -> String;

    fn child_nodes(&self, node: Self::Node) -> Vec<Self::Node>;

    fn has_child_nodes(&self, node: Self::Node) -> bool {
        !self.child_nodes(node).is_empty()
    }

    /// Attribute names of an element in their stored order. Empty for
    /// anything that is not an element.
    fn attribute_names(&self, node: Self::Node) -> Vec<String>;

    fn has_attributes(&self, node: Self::Node) -> bool {
        !self.attribute_names(node).is_empty()
    }

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: String);

    /// Text payload of a text node.
    fn text(&self, node: Self::Node) -> Option<&str>;

    fn set_text(&mut self, node: Self::Node, value: String);
}

/// Immutable view of a node handed to `accept_node` filters.
pub struct NodeRef<'t, T: NodeTree> {
    tree: &'t T,
    node: T::Node,
}

impl<'t, T: NodeTree> NodeRef<'t, T> {
    pub fn new(tree: &'t T, node: T::Node) -> Self {
        Self { tree, node }
    }

    pub fn id(&self) -> T::Node {
        self.node
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.node)
    }

    pub fn node_name(&self) -> String {
        self.tree.node_name(self.node)
    }

    pub fn attribute(&self, name: &str) -> Option<&'t str> {
        self.tree.attribute(self.node, name)
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.tree.attribute_names(self.node)
    }

    pub fn text(&self) -> Option<&'t str> {
        self.tree.text(self.node)
    }

    pub fn tree(&self) -> &'t T {
        self.tree
    }
}

impl<T: NodeTree> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: NodeTree> Copy for NodeRef<'_, T> {}

impl<T: NodeTree> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("node", &self.node)
            .field("name", &self.node_name())
            .finish()
    }
}

/// Immutable view of one attribute handed to `accept_attribute` filters.
pub struct AttributeRef<'t, T: NodeTree> {
    name: &'t str,
    value: &'t str,
    owner: NodeRef<'t, T>,
}

impl<'t, T: NodeTree> AttributeRef<'t, T> {
    pub fn new(name: &'t str, value: &'t str, owner: NodeRef<'t, T>) -> Self {
        Self { name, value, owner }
    }

    pub fn name(&self) -> &'t str {
        self.name
    }

    pub fn value(&self) -> &'t str {
        self.value
    }

    /// The element carrying this attribute.
    pub fn owner_element(&self) -> NodeRef<'t, T> {
        self.owner
    }
}

impl<T: NodeTree> fmt::Debug for AttributeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRef")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("owner", &self.owner)
            .finish()
    }
}
