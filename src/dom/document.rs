use crate::dom::errors::DomError;
use crate::dom::mutation::MutationRecord;
use crate::dom::node::{NodeData, NodeId, NodeSlot};
use crate::dom::serialize;
use crate::tree::{IgnoredKind, NodeKind, NodeTree};
use xxhash_rust::xxh3::xxh3_64;

/// An arena of nodes rooted at a document node.
///
/// Nodes created with the `create_*` methods start detached; they become part
/// of the live tree once appended under [`Document::root`] (directly or
/// through other nodes).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeSlot>,
    records: Option<Vec<MutationRecord>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeSlot::new(NodeData::Document)],
            records: None,
        }
    }

    /// The document node itself.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever created in this arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is created with the arena. Present to
    /// pair with [`Document::len`].
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot::new(data));
        id
    }

    pub(crate) fn slot(&self, id: NodeId) -> Result<&NodeSlot, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            template_content: None,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    pub fn create_cdata_section(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::CdataSection(text.into()))
    }

    pub fn create_processing_instruction(
        &mut self,
        target: impl Into<String>,
        data: impl Into<String>,
    ) -> NodeId {
        self.push(NodeData::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        })
    }

    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeData::Doctype { name: name.into() })
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::Fragment)
    }

    /// Create a `<template>` element together with its inert content
    /// fragment. The fragment is reachable only through
    /// [`Document::template_content`].
    pub fn create_template(&mut self) -> NodeId {
        let content = self.create_fragment();
        let template = self.push(NodeData::Element {
            tag: "template".to_string(),
            attributes: Vec::new(),
            template_content: Some(content),
        });
        self.nodes[content.0].host = Some(template);
        template
    }

    pub fn template_content(&self, template: NodeId) -> Option<NodeId> {
        match self.data(template)? {
            NodeData::Element {
                template_content, ..
            } => *template_content,
            _ => None,
        }
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|slot| &slot.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent. Appending a fragment moves its children instead.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        let parent_slot = self.slot(parent)?;
        if !parent_slot.data.accepts_children() {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "parent cannot have children",
            });
        }

        self.check_not_ancestor(parent, child)?;
        match self.slot(child)?.data.kind() {
            NodeKind::Document => {
                return Err(DomError::HierarchyRequest {
                    parent,
                    child,
                    reason: "a document cannot be inserted",
                })
            }
            NodeKind::DocumentFragment => {
                let moved = std::mem::take(&mut self.slot_mut(child)?.children);
                self.record(MutationRecord::ChildList {
                    target: child,
                    added: Vec::new(),
                    removed: moved.clone(),
                });
                for &node in &moved {
                    self.slot_mut(node)?.parent = Some(parent);
                }
                self.slot_mut(parent)?.children.extend(moved.iter().copied());
                self.record(MutationRecord::ChildList {
                    target: parent,
                    added: moved,
                    removed: Vec::new(),
                });
                return Ok(child);
            }
            _ => {}
        }

        self.detach(child)?;

        self.slot_mut(child)?.parent = Some(parent);
        self.slot_mut(parent)?.children.push(child);
        self.record(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(child)
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        let element = self.create_element(tag);
        self.append_child(parent, element)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        let node = self.create_text(text);
        self.append_child(parent, node)
    }

    /// Remove `child` from its parent, if it has one.
    pub fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        let Some(old_parent) = self.slot(child)?.parent else {
            return Ok(());
        };
        self.slot_mut(old_parent)?.children.retain(|&c| c != child);
        self.slot_mut(child)?.parent = None;
        self.record(MutationRecord::ChildList {
            target: old_parent,
            added: Vec::new(),
            removed: vec![child],
        });
        Ok(())
    }

    /// Walks up from `parent` (through template hosts as well) and fails if
    /// `child` is found.
    fn check_not_ancestor(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return Err(DomError::HierarchyRequest {
                    parent,
                    child,
                    reason: "the child is an ancestor of the parent",
                });
            }
            let slot = self.slot(node)?;
            current = slot.parent.or(slot.host);
        }
        Ok(())
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        match self.data(element)? {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn attributes(&self, element: NodeId) -> &[(String, String)] {
        match self.data(element) {
            Some(NodeData::Element { attributes, .. }) => attributes.as_slice(),
            _ => &[],
        }
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let name = name.into();
        let value = value.into();
        let NodeData::Element { attributes, .. } = &mut self.slot_mut(element)?.data else {
            return Err(DomError::NotAnElement { node: element });
        };

        let old_value = match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                attributes.push((name.clone(), value));
                None
            }
        };

        self.record(MutationRecord::Attributes {
            target: element,
            name,
            old_value,
        });
        Ok(())
    }

    pub fn remove_attribute(
        &mut self,
        element: NodeId,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        let NodeData::Element { attributes, .. } = &mut self.slot_mut(element)?.data else {
            return Err(DomError::NotAnElement { node: element });
        };
        let Some(position) = attributes.iter().position(|(n, _)| n == name) else {
            return Ok(None);
        };
        let (_, old_value) = attributes.remove(position);
        self.record(MutationRecord::Attributes {
            target: element,
            name: name.to_string(),
            old_value: Some(old_value.clone()),
        });
        Ok(Some(old_value))
    }

    /// Character data of a text, comment, CDATA or processing-instruction
    /// node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(text) | NodeData::Comment(text) | NodeData::CdataSection(text) => {
                Some(text)
            }
            NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let old_value = match &mut self.slot_mut(node)?.data {
            NodeData::Text(text) | NodeData::Comment(text) | NodeData::CdataSection(text) => {
                std::mem::replace(text, value)
            }
            NodeData::ProcessingInstruction { data, .. } => std::mem::replace(data, value),
            _ => return Err(DomError::NotCharacterData { node }),
        };
        self.record(MutationRecord::CharacterData {
            target: node,
            old_value,
        });
        Ok(())
    }

    /// Start recording mutations. Any previously recorded ones are dropped.
    pub fn observe(&mut self) {
        self.records = Some(Vec::new());
    }

    /// Stop recording and return what was recorded.
    pub fn disconnect(&mut self) -> Vec<MutationRecord> {
        self.records.take().unwrap_or_default()
    }

    /// Drain the records gathered so far while continuing to record.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.records.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record(&mut self, record: MutationRecord) {
        if let Some(records) = &mut self.records {
            records.push(record);
        }
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        serialize::outer_html(self, node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        serialize::inner_html(self, node)
    }

    /// xxh3 hash over every node of the arena, detached subtrees and
    /// template content included.
    pub fn fingerprint(&self) -> u64 {
        let mut buffer = String::new();
        for (index, slot) in self.nodes.iter().enumerate() {
            if slot.parent.is_some() || slot.host.is_some() {
                continue;
            }
            buffer.push_str(&serialize::outer_html(self, NodeId(index)));
            buffer.push('\0');
        }
        xxh3_64(buffer.as_bytes())
    }
}

impl NodeTree for Document {
    type Node = NodeId;

    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        // Unknown handles behave like nodes the walker ignores.
        self.data(node)
            .map_or(NodeKind::Ignored(IgnoredKind::Attribute), NodeData::kind)
    }

    fn node_name(&self, node: NodeId) -> String {
        self.data(node).map(NodeData::node_name).unwrap_or_default()
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).to_vec()
    }

    fn has_child_nodes(&self, node: NodeId) -> bool {
        !self.children(node).is_empty()
    }

    fn attribute_names(&self, node: NodeId) -> Vec<String> {
        self.attributes(node)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn has_attributes(&self, node: NodeId) -> bool {
        !self.attributes(node).is_empty()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, node, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: String) {
        if let Err(error) = Document::set_attribute(self, node, name, value) {
            tracing::warn!(%error, "ignoring attribute write");
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    fn set_text(&mut self, node: NodeId, value: String) {
        if let Err(error) = Document::set_text(self, node, value) {
            tracing::warn!(%error, "ignoring text write");
        }
    }
}
