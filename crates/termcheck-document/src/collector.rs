//! Text leaf collection
//!
//! Flattens a subtree into its text-bearing leaves in document (pre-order)
//! order. A node with text is atomic: its children, if any, are not visited.
//!
//! Traversal uses an explicit stack, so deep trees cost heap, not call
//! stack. Depth and node count are bounded and every node may be reached
//! only once.

use crate::error::StructureError;
use crate::host::DocumentTree;
use crate::node::{FontDescriptor, NodeId, TextFacet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bounds applied to every traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalLimits {
    /// Maximum nesting depth below the root
    pub max_depth: usize,
    /// Maximum number of visited nodes
    pub max_nodes: usize,
}

impl TraversalLimits {
    /// Create limits
    #[inline]
    #[must_use]
    pub const fn new(max_depth: usize, max_nodes: usize) -> Self {
        Self {
            max_depth,
            max_nodes,
        }
    }
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self::new(5_000, 1_000_000)
    }
}

/// A collected text leaf with the facet read during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    /// Leaf node
    pub node: NodeId,
    /// Text facet at collection time
    pub text: TextFacet,
}

/// Collect text leaves under `root` with their facets
///
/// # Errors
/// [`StructureError`] on cycles, dangling references, or exceeded limits.
pub fn collect_leaves<T>(
    tree: &T,
    root: NodeId,
    limits: TraversalLimits,
) -> Result<Vec<TextLeaf>, StructureError>
where
    T: DocumentTree + ?Sized,
{
    let mut leaves = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if depth > limits.max_depth {
            return Err(StructureError::DepthExceeded {
                limit: limits.max_depth,
            });
        }
        if !visited.insert(node) {
            return Err(StructureError::Cycle { node });
        }
        if visited.len() > limits.max_nodes {
            return Err(StructureError::TooManyNodes {
                limit: limits.max_nodes,
            });
        }
        if !tree.contains(node) {
            return Err(StructureError::DanglingNode { node });
        }

        if let Some(text) = tree.text(node) {
            leaves.push(TextLeaf { node, text });
            continue;
        }

        if let Some(children) = tree.children(node) {
            // Reversed so the first child is popped first
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }

    tracing::debug!("Collected {} text leaves under {}", leaves.len(), root);
    Ok(leaves)
}

/// Collect text leaf ids under `root` in document order
///
/// # Errors
/// See [`collect_leaves`].
pub fn collect_text_leaves<T>(
    tree: &T,
    root: NodeId,
    limits: TraversalLimits,
) -> Result<Vec<NodeId>, StructureError>
where
    T: DocumentTree + ?Sized,
{
    Ok(collect_leaves(tree, root, limits)?
        .into_iter()
        .map(|leaf| leaf.node)
        .collect())
}

/// Distinct fonts used by text leaves under `root`, first-seen order
///
/// # Errors
/// See [`collect_leaves`].
pub fn collect_fonts<T>(
    tree: &T,
    root: NodeId,
    limits: TraversalLimits,
) -> Result<Vec<FontDescriptor>, StructureError>
where
    T: DocumentTree + ?Sized,
{
    let mut seen = HashSet::new();
    let mut fonts = Vec::new();
    for leaf in collect_leaves(tree, root, limits)? {
        for font in leaf.text.fonts {
            if seen.insert(font.clone()) {
                fonts.push(font);
            }
        }
    }
    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Bounds, NodeInfo, NodeKind};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Hand-wired tree that can express shapes a real host forbids
    #[derive(Default)]
    struct RawTree {
        text: HashMap<NodeId, TextFacet>,
        children: HashMap<NodeId, Vec<NodeId>>,
        known: HashSet<NodeId>,
    }

    impl RawTree {
        fn container(mut self, id: u64, children: &[u64]) -> Self {
            self.known.insert(NodeId(id));
            self.children
                .insert(NodeId(id), children.iter().map(|&c| NodeId(c)).collect());
            self
        }

        fn leaf(mut self, id: u64, characters: &str) -> Self {
            self.known.insert(NodeId(id));
            self.text
                .insert(NodeId(id), TextFacet::new(characters, characters));
            self
        }

        fn empty(mut self, id: u64) -> Self {
            self.known.insert(NodeId(id));
            self
        }
    }

    impl DocumentTree for RawTree {
        fn info(&self, node: NodeId) -> Option<NodeInfo> {
            self.known.contains(&node).then(|| NodeInfo {
                id: node,
                kind: NodeKind::Other,
                name: String::new(),
                bounds: Bounds::default(),
                parent: None,
            })
        }

        fn text(&self, node: NodeId) -> Option<TextFacet> {
            self.text.get(&node).cloned()
        }

        fn children(&self, node: NodeId) -> Option<Vec<NodeId>> {
            self.children.get(&node).cloned()
        }
    }

    fn ids(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().map(|&i| NodeId(i)).collect()
    }

    #[test]
    fn text_root_is_atomic() {
        // Node 1 has both text and children; children must be ignored
        let tree = RawTree::default()
            .container(1, &[2])
            .leaf(1, "Title")
            .leaf(2, "Hidden");
        let leaves = collect_text_leaves(&tree, NodeId(1), TraversalLimits::default()).unwrap();
        assert_eq!(leaves, ids(&[1]));
    }

    #[test]
    fn pre_order_across_branches() {
        let tree = RawTree::default()
            .container(1, &[2, 5, 8])
            .container(2, &[3, 4])
            .leaf(3, "a")
            .leaf(4, "b")
            .container(5, &[])
            .container(8, &[9, 10])
            .container(9, &[11])
            .leaf(11, "c")
            .leaf(10, "d");
        let leaves = collect_text_leaves(&tree, NodeId(1), TraversalLimits::default()).unwrap();
        assert_eq!(leaves, ids(&[3, 4, 11, 10]));
    }

    #[test]
    fn node_without_capabilities_contributes_nothing() {
        let tree = RawTree::default().container(1, &[2, 3]).empty(2).leaf(3, "x");
        let leaves = collect_text_leaves(&tree, NodeId(1), TraversalLimits::default()).unwrap();
        assert_eq!(leaves, ids(&[3]));
    }

    #[test]
    fn cycle_is_rejected() {
        let tree = RawTree::default().container(1, &[2]).container(2, &[1]);
        let err = collect_text_leaves(&tree, NodeId(1), TraversalLimits::default()).unwrap_err();
        assert_eq!(err, StructureError::Cycle { node: NodeId(1) });
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut tree = RawTree::default();
        for i in 0..20 {
            tree = tree.container(i, &[i + 1]);
        }
        tree = tree.leaf(20, "deep");

        let err =
            collect_text_leaves(&tree, NodeId(0), TraversalLimits::new(10, 1_000)).unwrap_err();
        assert_eq!(err, StructureError::DepthExceeded { limit: 10 });

        let ok = collect_text_leaves(&tree, NodeId(0), TraversalLimits::new(20, 1_000)).unwrap();
        assert_eq!(ok, ids(&[20]));
    }

    #[test]
    fn node_limit_is_enforced() {
        let children: Vec<u64> = (2..12).collect();
        let mut tree = RawTree::default().container(1, &children);
        for c in &children {
            tree = tree.leaf(*c, "x");
        }
        let err =
            collect_text_leaves(&tree, NodeId(1), TraversalLimits::new(100, 5)).unwrap_err();
        assert_eq!(err, StructureError::TooManyNodes { limit: 5 });
    }

    #[test]
    fn dangling_child_is_rejected() {
        let tree = RawTree::default().container(1, &[99]);
        let err = collect_text_leaves(&tree, NodeId(1), TraversalLimits::default()).unwrap_err();
        assert_eq!(err, StructureError::DanglingNode { node: NodeId(99) });
    }

    #[test]
    fn very_deep_chain_does_not_overflow_stack() {
        let mut tree = RawTree::default();
        for i in 0..4_000 {
            tree = tree.container(i, &[i + 1]);
        }
        tree = tree.leaf(4_000, "bottom");
        let leaves = collect_text_leaves(&tree, NodeId(0), TraversalLimits::default()).unwrap();
        assert_eq!(leaves, ids(&[4_000]));
    }

    #[test]
    fn fonts_are_distinct_in_first_seen_order() {
        let mut tree = RawTree::default().container(1, &[2, 3, 4]);
        let bold = FontDescriptor::new("Inter", "Bold");
        for (id, font) in [
            (2, FontDescriptor::inter_regular()),
            (3, bold.clone()),
            (4, FontDescriptor::inter_regular()),
        ] {
            tree.known.insert(NodeId(id));
            tree.text.insert(
                NodeId(id),
                TextFacet {
                    characters: "x".into(),
                    label: "x".into(),
                    fonts: vec![font],
                },
            );
        }
        let fonts = collect_fonts(&tree, NodeId(1), TraversalLimits::default()).unwrap();
        assert_eq!(fonts, vec![FontDescriptor::inter_regular(), bold]);
    }
}
