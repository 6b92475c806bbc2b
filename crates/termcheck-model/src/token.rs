//! Placeholder tokens

use serde::Serialize;

/// Literal marker `{{Field}}` naming a substitution site in a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlaceholderToken(String);

impl PlaceholderToken {
    /// Token for the given primary field name
    #[must_use]
    pub fn for_field(field: &str) -> Self {
        Self(format!("{{{{{field}}}}}"))
    }

    /// Raw token text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field name between the braces
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.0[2..self.0.len() - 2]
    }
}

impl std::fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlaceholderToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
