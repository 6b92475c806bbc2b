//! Error types for glossary sources

use std::path::PathBuf;

/// Errors while fetching or decoding a glossary
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    /// Remote answered with a non-success status
    #[error("failed to fetch terms: {status} {body}")]
    Fetch {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Remote unreachable
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload has no sequence of record objects
    #[error("invalid data format: {0}")]
    Format(String),

    /// Source misconfigured (missing token, bad endpoint)
    #[error("configuration error: {0}")]
    Config(String),

    /// Local source unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GlossaryError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Whether another attempt may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Fetch { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
