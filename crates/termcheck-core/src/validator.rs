//! Term validation
//!
//! Matching is case-insensitive equality against the pinned, category
//! filtered glossary. Suggestions are case-insensitive substring matches,
//! returned in glossary order without ranking.

use serde::{Deserialize, Serialize};
use termcheck_model::{normalize_category, GlossaryView, Term};

/// Whether `text` equals some visible term, ignoring case
///
/// Empty text is never valid.
#[must_use]
pub fn is_valid_term(text: Option<&str>, view: &GlossaryView) -> bool {
    text.is_some_and(|t| find_match(t, view).is_some())
}

/// First visible term equal to `text`, ignoring case
#[must_use]
pub fn find_match<'a>(text: &str, view: &'a GlossaryView) -> Option<&'a Term> {
    if text.is_empty() {
        return None;
    }
    let folded = text.to_lowercase();
    view.folded_terms()
        .find(|(_, candidate)| *candidate == folded)
        .map(|(term, _)| term)
}

/// Approved terms in `category` containing `rejected`, ignoring case
///
/// Searches the whole snapshot, not just the visible terms. `None` or an
/// empty category skips the category test. `limit` truncates the result.
#[must_use]
pub fn suggest_similar(
    rejected: &str,
    category: Option<&str>,
    view: &GlossaryView,
    limit: Option<usize>,
) -> Vec<Term> {
    if rejected.is_empty() {
        return Vec::new();
    }
    let needle = rejected.to_lowercase();
    let category = normalize_category(category);
    view.snapshot()
        .terms()
        .iter()
        .filter(|t| t.approved)
        .filter(|t| category.map_or(true, |c| t.category() == Some(c)))
        .filter(|t| t.term.to_lowercase().contains(&needle))
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// Result of validating a single selected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the text is an approved term
    pub matched: bool,
    /// Matching term, when found
    pub term: Option<Term>,
    /// Similar approved terms, when not matched
    pub suggestions: Vec<Term>,
}

/// Validate one text and suggest replacements when it is rejected
#[must_use]
pub fn validate_selection(text: &str, view: &GlossaryView, limit: Option<usize>) -> ValidationOutcome {
    match find_match(text, view) {
        Some(term) => ValidationOutcome {
            matched: true,
            term: Some(term.clone()),
            suggestions: Vec::new(),
        },
        None => ValidationOutcome {
            matched: false,
            term: None,
            suggestions: suggest_similar(text, view.category(), view, limit),
        },
    }
}
