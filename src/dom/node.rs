use crate::tree::{IgnoredKind, NodeKind};
use std::fmt;

/// Index of a node inside its [`crate::dom::Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a single arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Fragment,
    Element {
        tag: String,
        /// Stored in insertion order; names are unique.
        attributes: Vec<(String, String)>,
        /// Inert content of a `<template>`; never listed among the children.
        template_content: Option<NodeId>,
    },
    Text(String),
    Comment(String),
    CdataSection(String),
    ProcessingInstruction { target: String, data: String },
    Doctype { name: String },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Fragment => NodeKind::DocumentFragment,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Ignored(IgnoredKind::Comment),
            NodeData::CdataSection(_) => NodeKind::Ignored(IgnoredKind::CdataSection),
            NodeData::ProcessingInstruction { .. } => {
                NodeKind::Ignored(IgnoredKind::ProcessingInstruction)
            }
            NodeData::Doctype { .. } => NodeKind::Ignored(IgnoredKind::DocumentType),
        }
    }

    pub fn node_name(&self) -> String {
        match self {
            NodeData::Document => "#document".to_string(),
            NodeData::Fragment => "#document-fragment".to_string(),
            NodeData::Element { tag, .. } => tag.to_ascii_uppercase(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::CdataSection(_) => "#cdata-section".to_string(),
            NodeData::ProcessingInstruction { target, .. } => target.clone(),
            NodeData::Doctype { name } => name.clone(),
        }
    }

    /// Whether nodes of this kind may have children appended.
    pub fn accepts_children(&self) -> bool {
        matches!(
            self,
            NodeData::Document | NodeData::Fragment | NodeData::Element { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeSlot {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Set on template content fragments: the template element owning them.
    pub(crate) host: Option<NodeId>,
}

impl NodeSlot {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            host: None,
        }
    }
}
