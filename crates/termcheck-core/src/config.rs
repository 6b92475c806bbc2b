//! Workspace configuration
//!
//! Loaded from TOML. Every section is optional and falls back to defaults:
//!
//! ```toml
//! default_source = "common"
//! suggestion_limit = 5
//!
//! [[sources]]
//! id = "common"
//! label = "Common Terms"
//! base = "appXXXX"
//! table = "Common Terms"
//! auth = { token_env = "AIRTABLE_TOKEN" }
//!
//! [limits]
//! max_depth = 5000
//! max_nodes = 1000000
//!
//! [mock]
//! spacing = 20.0
//! ```

use crate::error::{CoreError, CoreResult, PreconditionError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use termcheck_document::{Color, FontDescriptor, TraversalLimits};
use termcheck_model::SourceConfig;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermcheckConfig {
    /// Configured glossary tables
    pub sources: Vec<SourceConfig>,
    /// Source used at startup; first configured source when absent
    pub default_source: Option<String>,
    /// Traversal bounds
    pub limits: TraversalLimits,
    /// Mock generation options
    pub mock: MockOptions,
    /// Scan options
    pub scan: ScanOptions,
    /// Maximum suggestions per rejected text
    pub suggestion_limit: Option<usize>,
}

impl TermcheckConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an additional source
    #[must_use]
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.sources.push(source);
        self
    }

    /// With default source id
    #[must_use]
    pub fn with_default_source(mut self, id: impl Into<String>) -> Self {
        self.default_source = Some(id.into());
        self
    }

    /// With traversal limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: TraversalLimits) -> Self {
        self.limits = limits;
        self
    }

    /// With suggestion limit
    #[inline]
    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = Some(limit);
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// [`CoreError::Config`] when the document does not parse.
    pub fn from_toml_str(input: &str) -> CoreResult<Self> {
        toml::from_str(input).map_err(|e| CoreError::config(format!("invalid config: {e}")))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`CoreError::Config`] when the file is unreadable or invalid.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| CoreError::config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&body)?;
        tracing::info!(
            "Loaded config from {} ({} sources)",
            path.display(),
            config.sources.len()
        );
        Ok(config)
    }

    /// Source with `id`
    ///
    /// # Errors
    /// [`PreconditionError::UnknownSource`] when not configured.
    pub fn source(&self, id: &str) -> Result<&SourceConfig, PreconditionError> {
        self.sources
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PreconditionError::UnknownSource(id.to_string()))
    }

    /// Id of the source used at startup
    #[must_use]
    pub fn initial_source(&self) -> Option<&str> {
        self.default_source
            .as_deref()
            .or_else(|| self.sources.first().map(|s| s.id.as_str()))
    }
}

/// Mock generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockOptions {
    /// Gap between grid cells
    pub spacing: f64,
    /// Font substituted when a template font cannot be loaded
    pub fallback_font: FontDescriptor,
}

impl MockOptions {
    /// With spacing
    #[inline]
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// With fallback font
    #[must_use]
    pub fn with_fallback_font(mut self, font: FontDescriptor) -> Self {
        self.fallback_font = font;
        self
    }
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            fallback_font: FontDescriptor::inter_regular(),
        }
    }
}

/// Scan options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Font loaded before any text is touched
    pub baseline_font: FontDescriptor,
    /// Fill applied to rejected text
    pub highlight: Color,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            baseline_font: FontDescriptor::inter_regular(),
            highlight: Color::RED,
        }
    }
}
