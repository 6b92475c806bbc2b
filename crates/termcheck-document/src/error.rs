//! Error types for host documents
//!
//! - `DocumentError`: a host call failed
//! - `StructureError`: the tree itself is malformed or pathological

use crate::node::{FontDescriptor, NodeId};

/// Errors returned by document hosts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// Node id unknown to the host
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Font cannot be made available
    #[error("font unavailable: {0}")]
    FontUnavailable(FontDescriptor),

    /// Text edit attempted before its font was loaded
    #[error("font {font} not loaded for {node}")]
    FontNotLoaded {
        /// Text node being edited
        node: NodeId,
        /// Font that must be loaded first
        font: FontDescriptor,
    },

    /// Node has no text capability
    #[error("node {0} has no text")]
    NotText(NodeId),

    /// Node has no children capability
    #[error("node {0} cannot hold children")]
    NotContainer(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("cannot attach {child} under {parent}: would create a cycle")]
    InvalidHierarchy {
        /// Requested parent
        parent: NodeId,
        /// Node being attached
        child: NodeId,
    },

    /// Host-specific failure
    #[error("host error: {0}")]
    Host(String),
}

/// Errors raised while traversing a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// Node reached twice
    #[error("node {node} reached twice (cycle or shared subtree)")]
    Cycle {
        /// Node seen a second time
        node: NodeId,
    },

    /// Nesting deeper than allowed
    #[error("tree depth exceeds limit of {limit}")]
    DepthExceeded {
        /// Configured maximum depth
        limit: usize,
    },

    /// More nodes than allowed
    #[error("tree exceeds limit of {limit} nodes")]
    TooManyNodes {
        /// Configured maximum node count
        limit: usize,
    },

    /// Child id unknown to the host
    #[error("dangling node reference: {node}")]
    DanglingNode {
        /// Referenced id
        node: NodeId,
    },
}
