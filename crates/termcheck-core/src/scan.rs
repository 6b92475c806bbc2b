//! Scan orchestration
//!
//! Validates every text leaf under a frame or group against a pinned
//! [`GlossaryView`] and highlights the rejected ones.

use crate::cancel::CancelFlag;
use crate::config::ScanOptions;
use crate::error::{CoreResult, PreconditionError};
use crate::validator::is_valid_term;
use serde::{Deserialize, Serialize};
use termcheck_document::{collect_leaves, DocumentHost, DocumentTree, NodeId, TraversalLimits};
use termcheck_model::GlossaryView;

/// A text leaf whose content is not an approved term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidLeaf {
    /// Rejected text
    pub text: String,
    /// Leaf node
    pub node: NodeId,
}

/// Outcome of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Rejected leaves in document order
    pub invalid_leaves: Vec<InvalidLeaf>,
    /// Number of leaves validated
    pub leaves_scanned: usize,
}

impl ScanResult {
    /// Rejected texts in document order
    #[must_use]
    pub fn invalid_texts(&self) -> Vec<String> {
        self.invalid_leaves.iter().map(|l| l.text.clone()).collect()
    }

    /// Whether every leaf matched
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid_leaves.is_empty()
    }
}

/// Require exactly one selected frame or group
///
/// # Errors
/// [`PreconditionError`] describing why the selection cannot be scanned.
pub fn ensure_scan_target<T>(tree: &T, selection: &[NodeId]) -> Result<NodeId, PreconditionError>
where
    T: DocumentTree + ?Sized,
{
    let node = match selection {
        [] => return Err(PreconditionError::EmptySelection),
        [node] => *node,
        _ => {
            return Err(PreconditionError::MultipleSelection {
                count: selection.len(),
            })
        }
    };
    let kind = tree.info(node).map(|i| i.kind).unwrap_or_default();
    if kind.is_scan_container() {
        Ok(node)
    } else {
        Err(PreconditionError::UnsupportedKind { kind })
    }
}

/// Validate and highlight every text leaf under `root`
///
/// A baseline font failure is logged and the scan continues.
///
/// # Errors
/// - [`crate::CoreError::Structure`] on a malformed tree
/// - [`crate::CoreError::Document`] when highlighting fails
/// - [`crate::CoreError::Cancelled`] when `cancel` is set between leaves
pub async fn scan_for_invalid_terms<H>(
    host: &H,
    root: NodeId,
    view: &GlossaryView,
    options: &ScanOptions,
    limits: TraversalLimits,
    cancel: &CancelFlag,
) -> CoreResult<ScanResult>
where
    H: DocumentHost + ?Sized,
{
    tracing::info!(
        "Scanning {} against {} terms (category: {})",
        root,
        view.len(),
        view.category().unwrap_or("all")
    );

    if let Err(e) = host.ensure_font_available(&options.baseline_font).await {
        tracing::warn!("Could not load {}: {}", options.baseline_font, e);
    }

    let leaves = collect_leaves(host, root, limits)?;
    let mut result = ScanResult {
        invalid_leaves: Vec::new(),
        leaves_scanned: leaves.len(),
    };

    for leaf in leaves {
        cancel.check()?;
        let text = leaf.text.characters;
        if is_valid_term(Some(text.as_str()), view) {
            continue;
        }
        tracing::debug!("Invalid term '{}' at {}", text, leaf.node);
        host.set_fill(leaf.node, options.highlight).await?;
        result.invalid_leaves.push(InvalidLeaf {
            text,
            node: leaf.node,
        });
    }

    tracing::info!(
        "Scan complete: {} of {} leaves invalid",
        result.invalid_leaves.len(),
        result.leaves_scanned
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use termcheck_document::{Color, FontDescriptor, MemoryDocument, NodeKind, NodeSpec};
    use termcheck_model::{Glossary, Term};

    fn view() -> GlossaryView {
        GlossaryView::new(
            Arc::new(Glossary::new(vec![
                Term::new("r1", "Submit").unwrap(),
                Term::new("r2", "Confirm").unwrap(),
            ])),
            Some(""),
        )
    }

    fn card() -> MemoryDocument {
        MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
            NodeSpec::frame("Card").with_children(vec![
                NodeSpec::text("A", "Submit"),
                NodeSpec::group("Row").with_children(vec![
                    NodeSpec::text("B", "submit"),
                    NodeSpec::shape("Divider"),
                ]),
                NodeSpec::text("C", "Cancel"),
            ]),
        ]))
    }

    async fn scan(doc: &MemoryDocument, root: NodeId) -> CoreResult<ScanResult> {
        scan_for_invalid_terms(
            doc,
            root,
            &view(),
            &ScanOptions::default(),
            TraversalLimits::default(),
            &CancelFlag::new(),
        )
        .await
    }

    #[tokio::test]
    async fn flags_exactly_the_unknown_text() {
        let doc = card();
        let card = doc.find_by_name("Card").unwrap();
        let result = scan(&doc, card).await.unwrap();

        assert_eq!(result.leaves_scanned, 3);
        assert_eq!(result.invalid_texts(), vec!["Cancel".to_string()]);
        let cancel_node = doc.find_by_name("C").unwrap();
        assert_eq!(result.invalid_leaves[0].node, cancel_node);
        assert_eq!(doc.fill(cancel_node), Some(Color::RED));
        assert_eq!(doc.fill(doc.find_by_name("A").unwrap()), None);
    }

    #[tokio::test]
    async fn empty_container_is_clean() {
        let doc = MemoryDocument::from_spec(
            NodeSpec::page("Page").with_children(vec![NodeSpec::frame("Empty")]),
        );
        let root = doc.find_by_name("Empty").unwrap();
        let result = scan(&doc, root).await.unwrap();
        assert!(result.is_clean());
        assert_eq!(result.leaves_scanned, 0);
    }

    #[tokio::test]
    async fn baseline_font_failure_is_not_fatal() {
        let doc = card().with_installed_fonts(vec![FontDescriptor::new("Roboto", "Regular")]);
        let root = doc.find_by_name("Card").unwrap();
        let result = scan(&doc, root).await.unwrap();
        assert_eq!(result.invalid_leaves.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_scan_stops_before_first_leaf() {
        let doc = card();
        let root = doc.find_by_name("Card").unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = scan_for_invalid_terms(
            &doc,
            root,
            &view(),
            &ScanOptions::default(),
            TraversalLimits::default(),
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[tokio::test]
    async fn over_deep_tree_is_structure_error() {
        let mut spec = NodeSpec::text("Leaf", "Submit");
        for depth in 0..10 {
            spec = NodeSpec::group(format!("G{depth}")).with_children(vec![spec]);
        }
        let doc = MemoryDocument::from_spec(spec);
        let err = scan_for_invalid_terms(
            &doc,
            doc.root(),
            &view(),
            &ScanOptions::default(),
            TraversalLimits::new(4, 100),
            &CancelFlag::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Structure(_)));
    }

    #[test]
    fn scan_target_requires_single_container() {
        let doc = card();
        let card = doc.find_by_name("Card").unwrap();
        let row = doc.find_by_name("Row").unwrap();
        let text = doc.find_by_name("A").unwrap();

        assert_eq!(ensure_scan_target(&doc, &[card]), Ok(card));
        assert_eq!(ensure_scan_target(&doc, &[row]), Ok(row));
        assert_eq!(
            ensure_scan_target(&doc, &[]),
            Err(PreconditionError::EmptySelection)
        );
        assert_eq!(
            ensure_scan_target(&doc, &[card, row]),
            Err(PreconditionError::MultipleSelection { count: 2 })
        );
        assert_eq!(
            ensure_scan_target(&doc, &[text]),
            Err(PreconditionError::UnsupportedKind {
                kind: NodeKind::Text
            })
        );
    }
}
