//! termcheck Core - document scan and template substitution engine
//!
//! The engine that:
//! - Validates text leaves against the approved glossary
//! - Suggests approved replacements for rejected text
//! - Finds placeholder sites and substitutes terms into them
//! - Clones templates once per term and lays them out on a grid
//! - Dispatches UI commands and reports results as events
//!
//! # Example
//!
//! ```rust,ignore
//! use termcheck_core::{Session, TermcheckConfig, UiCommand};
//! use termcheck_document::MemoryDocument;
//! use termcheck_glossary::AirtableSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TermcheckConfig::load("termcheck.toml")?;
//! let (mut session, mut events) =
//!     Session::new(MemoryDocument::new(), AirtableSource::new(), config);
//!
//! session.initialize().await;
//! session.handle(UiCommand::ScanSelected).await;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod mock;
pub mod placeholder;
pub mod scan;
pub mod session;
pub mod validator;

// Re-exports for convenience
pub use cancel::CancelFlag;
pub use config::{MockOptions, ScanOptions, TermcheckConfig};
pub use error::{CoreError, CoreResult, PreconditionError};
pub use events::{UiCommand, UiEvent};
pub use layout::{grid_cell, grid_columns, grid_position, GridCell};
pub use mock::{generate_mocks, MockGenerator};
pub use placeholder::{find_placeholders, resolve, PlaceholderSite};
pub use scan::{ensure_scan_target, scan_for_invalid_terms, InvalidLeaf, ScanResult};
pub use session::Session;
pub use validator::{find_match, is_valid_term, suggest_similar, validate_selection, ValidationOutcome};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with termcheck core
    pub use crate::{
        CancelFlag, CoreError, MockGenerator, PreconditionError, ScanResult, Session,
        TermcheckConfig, UiCommand, UiEvent,
    };
    pub use termcheck_model::{GlossaryView, PlaceholderToken, Term};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
