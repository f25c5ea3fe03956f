//! Arena-backed document tree implementing [`crate::tree::NodeTree`].
//!
//! This is the tree the crate's own tests run against, and a usable default
//! for callers that do not already have a tree of their own. Nodes are
//! addressed by [`NodeId`] and are never freed while the [`Document`] lives.

pub mod document;
pub mod errors;
pub mod mutation;
pub mod node;
pub mod serialize;

pub use document::Document;
pub use errors::DomError;
pub use mutation::MutationRecord;
pub use node::{NodeData, NodeId};
