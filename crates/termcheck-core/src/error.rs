//! Error types for termcheck core
//!
//! Provides error handling for:
//! - Glossary refresh failures
//! - Host document failures
//! - Malformed or pathological trees
//! - Unmet preconditions (selection, placeholders, terms)
//! - Partially completed generation and cancellation

use termcheck_document::{DocumentError, FontDescriptor, NodeId, NodeKind, StructureError};
use termcheck_glossary::GlossaryError;

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Glossary refresh failed
    #[error("glossary error: {0}")]
    Glossary(#[from] GlossaryError),

    /// Host call failed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Tree could not be traversed
    #[error("structure error: {0}")]
    Structure(#[from] StructureError),

    /// Operation refused before touching the document
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    /// Neither the template font nor the fallback could be loaded
    #[error("font unavailable: {0}")]
    FontUnavailable(FontDescriptor),

    /// Generation stopped after some clones were created
    #[error("generation interrupted after {} clones: {source}", created.len())]
    GenerationInterrupted {
        /// Clones already attached to the document
        created: Vec<NodeId>,
        /// What stopped the batch
        #[source]
        source: Box<CoreError>,
    },

    /// Cancelled between units of work
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration invalid or unreadable
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Create config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap `source` as an interruption unless nothing was created yet
    #[must_use]
    pub fn interrupted(created: Vec<NodeId>, source: CoreError) -> Self {
        if created.is_empty() {
            source
        } else {
            Self::GenerationInterrupted {
                created,
                source: Box::new(source),
            }
        }
    }

    /// Whether the message is meant for the designer rather than a log
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Precondition(_) | Self::FontUnavailable(_) | Self::Cancelled
        )
    }

    /// Whether retrying the same operation may succeed
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Glossary(e) => e.is_retryable(),
            Self::Precondition(_) | Self::Cancelled => true,
            Self::GenerationInterrupted { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Clones left behind by a failed generation
    #[must_use]
    pub fn created_nodes(&self) -> &[NodeId] {
        match self {
            Self::GenerationInterrupted { created, .. } => created,
            _ => &[],
        }
    }
}

/// Preconditions checked before any mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// Nothing selected
    #[error("Please select a frame or group to scan")]
    EmptySelection,

    /// More than one node selected
    #[error("Please select only one frame or group (got {count})")]
    MultipleSelection {
        /// Number of selected nodes
        count: usize,
    },

    /// Selected node has the wrong kind
    #[error("Selected node is a {kind}; select a frame or group")]
    UnsupportedKind {
        /// Kind of the selected node
        kind: NodeKind,
    },

    /// Template has no placeholder site
    #[error("No {token} placeholder found in the selected template")]
    NoPlaceholders {
        /// Token searched for
        token: String,
    },

    /// Nothing to substitute
    #[error("No terms available for the selected category")]
    NoTerms,

    /// Clones would be attached inside the template they copy
    #[error("Select a template inside a page or frame, not the document root")]
    TemplateEnclosesParent,

    /// Category not present in the index
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    /// Source id not configured
    #[error("Unknown glossary source '{0}'")]
    UnknownSource(String),
}
