//! termcheck Glossary
//!
//! Fetches approved terminology from a remote table and keeps the current
//! snapshot in memory.
//!
//! # Core Operations
//!
//! - **Refresh**: pull every record through a [`GlossarySource`] and swap the snapshot
//! - **Filter**: view the snapshot through a category
//! - **Observe**: subscribe to the category index recomputed on each refresh
//!
//! # Architecture
//!
//! ```text
//! Airtable / JSON file → GlossarySource → RawRecord → FieldMapping → Glossary
//!                                                                  ↓
//!                                               GlossaryCache (Arc snapshot)
//!                                                                  ↓
//!                                                      watch<CategoryIndex>
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use termcheck_glossary::{AirtableSource, GlossaryCache};
//! use termcheck_model::SourceConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = GlossaryCache::new();
//! let source = AirtableSource::new();
//! let config = SourceConfig::new("common", "appXXXX", "Common Terms");
//!
//! let glossary = cache.refresh(&source, &config).await?;
//! println!("{} terms", glossary.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod airtable;
pub mod cache;
pub mod error;
pub mod file;
pub mod source;

// Re-exports for convenience
pub use airtable::{AirtableSource, RetryPolicy};
pub use cache::GlossaryCache;
pub use error::GlossaryError;
pub use file::JsonFileSource;
pub use source::{map_records, parse_page, GlossarySource, RawRecord, RecordPage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with glossary sources
    pub use crate::{AirtableSource, GlossaryCache, GlossaryError, GlossarySource, JsonFileSource};
    pub use termcheck_model::{CategoryIndex, Glossary, GlossaryView, SourceConfig, Term};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
