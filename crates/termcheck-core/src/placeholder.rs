//! Placeholder detection and substitution
//!
//! A text leaf is a placeholder site when its visible text or its layer
//! label contains the token. Text takes precedence: the label is only used
//! when the visible text does not carry the token.

use serde::{Deserialize, Serialize};
use termcheck_document::{collect_leaves, DocumentTree, NodeId, StructureError, TraversalLimits};
use termcheck_model::{PlaceholderToken, Term};

/// A text leaf that receives a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSite {
    /// Leaf node
    pub node: NodeId,
    /// Token found at this site
    pub token: String,
    /// Visible text at detection time
    pub original_text: String,
    /// Token only present in the label
    pub resolved_via_label: bool,
}

/// Find placeholder sites under `root` in document order
///
/// # Errors
/// [`StructureError`] from traversal.
pub fn find_placeholders<T>(
    tree: &T,
    root: NodeId,
    token: &PlaceholderToken,
    limits: TraversalLimits,
) -> Result<Vec<PlaceholderSite>, StructureError>
where
    T: DocumentTree + ?Sized,
{
    let needle = token.as_str();
    let sites: Vec<PlaceholderSite> = collect_leaves(tree, root, limits)?
        .into_iter()
        .filter_map(|leaf| {
            let in_text = leaf.text.characters.contains(needle);
            let in_label = leaf.text.label.contains(needle);
            (in_text || in_label).then(|| PlaceholderSite {
                node: leaf.node,
                token: needle.to_string(),
                original_text: leaf.text.characters,
                resolved_via_label: in_label && !in_text,
            })
        })
        .collect();

    tracing::debug!("Found {} {} sites under {}", sites.len(), token, root);
    Ok(sites)
}

/// Text for `site` after substituting `term`
///
/// Label sites take the term wholesale; text sites replace the first
/// occurrence of the token.
#[must_use]
pub fn resolve(site: &PlaceholderSite, term: &Term) -> String {
    if site.resolved_via_label {
        term.term.clone()
    } else {
        site.original_text.replacen(&site.token, &term.term, 1)
    }
}
