use crate::dom::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("cannot insert node {child} into node {parent}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },

    #[error("node {node} is not an element")]
    NotAnElement { node: NodeId },

    #[error("node {node} has no character data")]
    NotCharacterData { node: NodeId },
}
