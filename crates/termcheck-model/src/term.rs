//! Glossary terms and views
//!
//! A [`Glossary`] is never mutated in place: a refresh builds a new one and
//! swaps the shared snapshot. Readers pin a [`GlossaryView`] for the duration
//! of a pass so a concurrent refresh cannot change what they match against.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Errors constructing terms
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    /// Display text was empty or whitespace only
    #[error("term text is empty (record {id})")]
    EmptyText {
        /// Source record id
        id: String,
    },
}

/// One approved-vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Stable, source-assigned identifier
    pub id: String,
    /// Display text (non-empty)
    pub term: String,
    /// Grouping tag ("platform")
    #[serde(default, alias = "platform")]
    pub category: Option<String>,
    /// Always true for fetched terms
    #[serde(default = "approved_default")]
    pub approved: bool,
    /// Usage notes shown next to the term
    #[serde(default)]
    pub explanation: Option<String>,
}

fn approved_default() -> bool {
    true
}

impl Term {
    /// Create an approved term without category or explanation
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Result<Self, TermError> {
        let id = id.into();
        let term = term.into();
        if term.trim().is_empty() {
            return Err(TermError::EmptyText { id });
        }
        Ok(Self {
            id,
            term,
            category: None,
            approved: true,
            explanation: None,
        })
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// With explanation
    #[inline]
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Category as a string slice
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Treat `None` and `""` alike: both mean "no filtering"
#[inline]
#[must_use]
pub fn normalize_category(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.is_empty())
}

/// Ordered set of distinct, non-empty categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    categories: IndexSet<String>,
}

impl CategoryIndex {
    /// Build from terms, keeping order of first appearance
    #[must_use]
    pub fn from_terms(terms: &[Term]) -> Self {
        let categories = terms
            .iter()
            .filter_map(|t| normalize_category(t.category()))
            .map(str::to_string)
            .collect();
        Self { categories }
    }

    /// Whether the category is known
    #[inline]
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Iterate categories in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Copy into a plain list
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }
}

/// Ordered term set owned by the glossary cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glossary {
    terms: Vec<Term>,
}

impl Glossary {
    /// Create glossary from terms (order is preserved)
    #[inline]
    #[must_use]
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// Empty glossary
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All terms in glossary order
    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of terms
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the glossary is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Derived category index
    #[must_use]
    pub fn categories(&self) -> CategoryIndex {
        CategoryIndex::from_terms(&self.terms)
    }

    /// Terms visible under a category filter
    ///
    /// An empty or absent category returns every term. Otherwise the match
    /// is exact and case-sensitive.
    pub fn iter_category<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        let category = normalize_category(category);
        self.terms
            .iter()
            .filter(move |t| category.map_or(true, |c| t.category() == Some(c)))
    }

    /// Owned copy of [`Glossary::iter_category`]
    #[must_use]
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<Term> {
        self.iter_category(category).cloned().collect()
    }
}

/// A pinned glossary snapshot seen through the active category filter
///
/// Lowercased term text is folded once up front so per-leaf validation is a
/// plain string comparison.
#[derive(Debug, Clone)]
pub struct GlossaryView {
    snapshot: Arc<Glossary>,
    category: Option<String>,
    visible: Vec<usize>,
    folded: Vec<String>,
}

impl GlossaryView {
    /// Pin `snapshot` under `category` (`None` or `""` for no filtering)
    #[must_use]
    pub fn new(snapshot: Arc<Glossary>, category: Option<&str>) -> Self {
        let category = normalize_category(category).map(str::to_string);
        let visible: Vec<usize> = snapshot
            .terms()
            .iter()
            .enumerate()
            .filter(|(_, t)| category.as_deref().map_or(true, |c| t.category() == Some(c)))
            .map(|(i, _)| i)
            .collect();
        let folded = visible
            .iter()
            .map(|&i| snapshot.terms()[i].term.to_lowercase())
            .collect();
        Self {
            snapshot,
            category,
            visible,
            folded,
        }
    }

    /// View with no category filter
    #[inline]
    #[must_use]
    pub fn unfiltered(snapshot: Arc<Glossary>) -> Self {
        Self::new(snapshot, None)
    }

    /// Active category, if any
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Underlying full snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Arc<Glossary> {
        &self.snapshot
    }

    /// Visible terms in glossary order
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.visible.iter().map(|&i| &self.snapshot.terms()[i])
    }

    /// Visible terms paired with their lowercased text
    pub fn folded_terms(&self) -> impl Iterator<Item = (&Term, &str)> {
        self.terms().zip(self.folded.iter().map(String::as_str))
    }

    /// Number of visible terms
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether no term is visible
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Owned copy of the visible terms
    #[must_use]
    pub fn to_vec(&self) -> Vec<Term> {
        self.terms().cloned().collect()
    }
}
