//! Host document contracts

use crate::error::DocumentError;
use crate::node::{Color, FontDescriptor, NodeId, NodeInfo, Point, TextFacet};
use async_trait::async_trait;

/// Read access to a host document
///
/// A node may expose text, children, both, or neither. Callers branch on
/// which facet is present rather than on [`crate::NodeKind`].
pub trait DocumentTree {
    /// Metadata for `node`, `None` if unknown
    fn info(&self, node: NodeId) -> Option<NodeInfo>;

    /// Text facet (`hasText`)
    fn text(&self, node: NodeId) -> Option<TextFacet>;

    /// Ordered children (`hasChildren`)
    fn children(&self, node: NodeId) -> Option<Vec<NodeId>>;

    /// Whether the host knows `node`
    fn contains(&self, node: NodeId) -> bool {
        self.info(node).is_some()
    }
}

/// Mutating side of a host document
///
/// Every mutation is a suspension point; implementations acknowledge once
/// the change is applied. Mutations are not transactional.
#[async_trait]
pub trait DocumentHost: DocumentTree + Send + Sync {
    /// Root node new content is attached to when nothing better exists
    fn root(&self) -> NodeId;

    /// Currently selected nodes
    async fn current_selection(&self) -> Vec<NodeId>;

    /// Create a text node with the default font, attached to the root
    async fn create_text_node(&self, text: &str) -> Result<NodeId, DocumentError>;

    /// Deep-clone a subtree into a new, detached node
    async fn clone_node(&self, node: NodeId) -> Result<NodeId, DocumentError>;

    /// Attach `node` as the last child of `parent`
    async fn append_child(&self, parent: NodeId, node: NodeId) -> Result<(), DocumentError>;

    /// Replace the selection
    async fn set_selection(&self, nodes: &[NodeId]) -> Result<(), DocumentError>;

    /// Scroll and zoom so `nodes` are visible
    async fn focus_view(&self, nodes: &[NodeId]) -> Result<(), DocumentError>;

    /// Make a font usable for text edits
    async fn ensure_font_available(&self, font: &FontDescriptor) -> Result<(), DocumentError>;

    /// Replace fills with a single solid color
    async fn set_fill(&self, node: NodeId, color: Color) -> Result<(), DocumentError>;

    /// Rename a node
    async fn set_name(&self, node: NodeId, name: &str) -> Result<(), DocumentError>;

    /// Move a node's top-left corner
    async fn set_position(&self, node: NodeId, position: Point) -> Result<(), DocumentError>;

    /// Replace visible characters
    async fn set_text(&self, node: NodeId, text: &str) -> Result<(), DocumentError>;

    /// Apply a single font to all characters
    async fn set_font(&self, node: NodeId, font: &FontDescriptor) -> Result<(), DocumentError>;

    /// Center of the visible viewport
    async fn viewport_center(&self) -> Point;
}
