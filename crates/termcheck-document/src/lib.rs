//! termcheck Document
//!
//! The boundary between termcheck and the host design document.
//!
//! # Core Concepts
//!
//! - **DocumentTree**: synchronous read access; nodes expose a text facet,
//!   a children facet, both, or neither
//! - **DocumentHost**: asynchronous mutations (clone, fill, fonts, selection)
//! - **Collector**: bounded, cycle-safe pre-order flattening into text leaves
//! - **MemoryDocument**: in-process host used by tests and the CLI
//!
//! # Architecture
//!
//! ```text
//! root ──► collector ──► [TextLeaf] ──► validator / placeholder resolver
//!                                            │
//!                      DocumentHost ◄────────┘ (fills, clones, text)
//! ```
//!
//! # Example
//!
//! ```rust
//! use termcheck_document::{collect_text_leaves, MemoryDocument, NodeSpec, TraversalLimits};
//!
//! let doc = MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
//!     NodeSpec::frame("Card").with_children(vec![
//!         NodeSpec::text("Title", "Submit"),
//!         NodeSpec::text("Body", "Cancel"),
//!     ]),
//! ]));
//!
//! let card = doc.find_by_name("Card").unwrap();
//! let leaves = collect_text_leaves(&doc, card, TraversalLimits::default()).unwrap();
//! assert_eq!(leaves.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod collector;
pub mod error;
pub mod host;
pub mod memory;
pub mod node;

// Re-exports for convenience
pub use collector::{
    collect_fonts, collect_leaves, collect_text_leaves, TextLeaf, TraversalLimits,
};
pub use error::{DocumentError, StructureError};
pub use host::{DocumentHost, DocumentTree};
pub use memory::{MemoryDocument, NodeSpec};
pub use node::{Bounds, Color, FontDescriptor, NodeId, NodeInfo, NodeKind, Point, TextFacet};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with host documents
    pub use crate::{
        collect_text_leaves, DocumentError, DocumentHost, DocumentTree, FontDescriptor, NodeId,
        NodeKind, StructureError, TextFacet, TraversalLimits,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
