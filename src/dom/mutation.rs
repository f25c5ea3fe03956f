use crate::dom::node::NodeId;

/// A change observed on a [`crate::dom::Document`] while recording is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// An attribute value was written.
    Attributes {
        target: NodeId,
        name: String,
        old_value: Option<String>,
    },
    /// A text payload was written.
    CharacterData { target: NodeId, old_value: String },
    /// Children were inserted into or removed from `target`.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
}

impl MutationRecord {
    pub fn target(&self) -> NodeId {
        match self {
            MutationRecord::Attributes { target, .. }
            | MutationRecord::CharacterData { target, .. }
            | MutationRecord::ChildList { target, .. } => *target,
        }
    }

    /// True for records that add or remove nodes.
    pub fn is_structural(&self) -> bool {
        matches!(self, MutationRecord::ChildList { added, removed, .. }
            if !added.is_empty() || !removed.is_empty())
    }
}
