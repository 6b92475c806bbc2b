//! Snapshot cache for the active glossary
//!
//! Holds the current [`Glossary`] as an `Arc` snapshot. A refresh builds a
//! complete replacement before swapping it in, so readers see either the
//! previous glossary or the new one, never a mix. Failed refreshes leave the
//! snapshot untouched.

use crate::error::GlossaryError;
use crate::source::{map_records, GlossarySource};
use parking_lot::RwLock;
use std::sync::Arc;
use termcheck_model::{CategoryIndex, Glossary, GlossaryView, SourceConfig, Term};
use tokio::sync::watch;

/// In-memory glossary with observable category index
#[derive(Debug)]
pub struct GlossaryCache {
    current: RwLock<Arc<Glossary>>,
    categories: watch::Sender<CategoryIndex>,
}

impl GlossaryCache {
    /// Create empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_glossary(Glossary::empty())
    }

    /// Create cache seeded with `glossary`
    #[must_use]
    pub fn with_glossary(glossary: Glossary) -> Self {
        let (categories, _) = watch::channel(glossary.categories());
        Self {
            current: RwLock::new(Arc::new(glossary)),
            categories,
        }
    }

    /// Replace the stored glossary with every record of the configured table
    ///
    /// On success the new category index is published to subscribers.
    ///
    /// # Errors
    /// Whatever the source reports; the previous snapshot is kept.
    pub async fn refresh<S>(
        &self,
        source: &S,
        config: &SourceConfig,
    ) -> Result<Arc<Glossary>, GlossaryError>
    where
        S: GlossarySource + ?Sized,
    {
        tracing::info!("Refreshing glossary from source '{}'", config.id);

        let records = match source.fetch_all(config).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Error fetching terms: {}", e);
                return Err(e);
            }
        };

        let glossary = Glossary::new(map_records(records, &config.field_mapping));
        let snapshot = self.replace(glossary);
        tracing::info!("Glossary refreshed: {} terms", snapshot.len());
        Ok(snapshot)
    }

    /// Swap in `glossary` and publish its category index
    pub fn replace(&self, glossary: Glossary) -> Arc<Glossary> {
        let snapshot = Arc::new(glossary);
        let index = snapshot.categories();
        *self.current.write() = Arc::clone(&snapshot);
        self.categories.send_replace(index);
        snapshot
    }

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<Glossary> {
        Arc::clone(&self.current.read())
    }

    /// Pin the current snapshot under `category`
    #[must_use]
    pub fn view(&self, category: Option<&str>) -> GlossaryView {
        GlossaryView::new(self.snapshot(), category)
    }

    /// Terms visible under `category`; empty or absent means all
    #[must_use]
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<Term> {
        self.snapshot().filter_by_category(category)
    }

    /// Category index of the current snapshot
    #[must_use]
    pub fn categories(&self) -> CategoryIndex {
        self.categories.borrow().clone()
    }

    /// Receive the category index after every successful refresh
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CategoryIndex> {
        self.categories.subscribe()
    }
}

impl Default for GlossaryCache {
    fn default() -> Self {
        Self::new()
    }
}
