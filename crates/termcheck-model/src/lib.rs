//! termcheck Model
//!
//! Shared vocabulary types for the termcheck workspace.
//!
//! # Overview
//!
//! - **Term**: one approved glossary entry
//! - **Glossary**: ordered, wholesale-replaced term set
//! - **CategoryIndex**: distinct categories in order of first appearance
//! - **GlossaryView**: pinned snapshot + active category, passed into every core call
//! - **SourceConfig**: remote table location, auth and field mapping
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use termcheck_model::{Glossary, GlossaryView, Term};
//!
//! let glossary = Glossary::new(vec![
//!     Term::new("rec1", "Submit").unwrap().with_category("Web"),
//!     Term::new("rec2", "Confirm").unwrap().with_category("iOS"),
//! ]);
//!
//! let view = GlossaryView::new(Arc::new(glossary), Some("Web"));
//! assert_eq!(view.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod source;
pub mod term;
pub mod token;

// Re-exports
pub use source::{AuthConfig, FieldMapping, SourceConfig, DEFAULT_ENDPOINT};
pub use term::{normalize_category, CategoryIndex, Glossary, GlossaryView, Term, TermError};
pub use token::PlaceholderToken;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for glossary types
    pub use crate::{
        CategoryIndex, FieldMapping, Glossary, GlossaryView, PlaceholderToken, SourceConfig, Term,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
