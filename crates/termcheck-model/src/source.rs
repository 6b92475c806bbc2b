//! Glossary source configuration
//!
//! Field names are configuration, not code: the same table layout can be
//! published under different column names per workspace.

use crate::token::PlaceholderToken;
use serde::{Deserialize, Serialize};

/// Default Airtable REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";

/// Location, credentials and field mapping of one remote glossary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier used by `glossary-source-changed`
    pub id: String,
    /// Human readable label shown next to the category list
    #[serde(default)]
    pub label: String,
    /// REST endpoint root
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Base (database) identifier
    #[serde(default)]
    pub base: String,
    /// Table name
    #[serde(default)]
    pub table: String,
    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,
    /// Column names
    #[serde(default)]
    pub field_mapping: FieldMapping,
    /// Upper bound on followed pagination cursors
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_pages() -> usize {
    100
}

impl SourceConfig {
    /// Create config for a base/table pair with default mapping
    #[must_use]
    pub fn new(id: impl Into<String>, base: impl Into<String>, table: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            endpoint: default_endpoint(),
            base: base.into(),
            table: table.into(),
            auth: AuthConfig::default(),
            field_mapping: FieldMapping::default(),
            max_pages: default_max_pages(),
        }
    }

    /// With label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// With endpoint root
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With field mapping
    #[inline]
    #[must_use]
    pub fn with_field_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mapping = mapping;
        self
    }

    /// With auth
    #[inline]
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Label, falling back to the id
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Placeholder token for templates fed by this source
    #[inline]
    #[must_use]
    pub fn placeholder_token(&self) -> PlaceholderToken {
        self.field_mapping.placeholder_token()
    }
}

/// Bearer token, given inline or through an environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Literal token
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable holding the token
    #[serde(default)]
    pub token_env: Option<String>,
}

impl AuthConfig {
    /// Inline token
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            token_env: None,
        }
    }

    /// Token read from `var` at fetch time
    #[must_use]
    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            token: None,
            token_env: Some(var.into()),
        }
    }

    /// Resolve the token; the inline value wins over the environment
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.token_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|t| !t.is_empty())
            })
    }
}

/// Column names of the glossary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Primary text column; also names the placeholder token
    #[serde(default = "default_term_field")]
    pub term: String,
    /// Category column
    #[serde(default = "default_category_field")]
    pub category: String,
    /// Explanation column
    #[serde(default = "default_explanation_field")]
    pub explanation: String,
}

fn default_term_field() -> String {
    "Content".to_string()
}

fn default_category_field() -> String {
    "Platform".to_string()
}

fn default_explanation_field() -> String {
    "Examples + Explanation".to_string()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            term: default_term_field(),
            category: default_category_field(),
            explanation: default_explanation_field(),
        }
    }
}

impl FieldMapping {
    /// Mapping with explicit column names
    #[must_use]
    pub fn new(
        term: impl Into<String>,
        category: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            category: category.into(),
            explanation: explanation.into(),
        }
    }

    /// `{{<term column>}}`
    #[inline]
    #[must_use]
    pub fn placeholder_token(&self) -> PlaceholderToken {
        PlaceholderToken::for_field(&self.term)
    }
}
