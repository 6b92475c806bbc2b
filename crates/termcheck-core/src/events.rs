//! Presentation-layer messages
//!
//! Both directions serialize as JSON objects tagged by `type`:
//!
//! ```json
//! { "type": "category-changed", "category": "Web" }
//! { "type": "scan-complete", "invalid_texts": ["Cancel"] }
//! ```

use serde::{Deserialize, Serialize};
use termcheck_model::Term;

/// Inbound command from the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiCommand {
    /// Active category changed; empty means all
    CategoryChanged {
        /// New category
        #[serde(default)]
        category: String,
    },
    /// Create a standalone text node
    CreateMockOrSingle {
        /// Text to place
        text: String,
    },
    /// Scan the selected frame or group
    ScanSelected,
    /// Generate mocks from the selected template
    GenerateMocks {
        /// Category to draw terms from; active category when absent
        #[serde(default)]
        category: Option<String>,
    },
    /// Switch glossary source and refresh
    GlossarySourceChanged {
        /// Configured source id
        source_id: String,
    },
    /// Refresh the active source
    RefreshGlossary,
    /// Host selection changed
    SelectionChanged,
}

/// Outbound event to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    /// Terms visible under the active category
    GlossaryUpdated {
        /// Filtered terms
        terms: Vec<Term>,
    },
    /// Category index after a refresh
    CategoriesUpdated {
        /// Distinct categories
        categories: Vec<String>,
        /// Label of the source they came from
        active_source_label: String,
    },
    /// Scan finished
    ScanComplete {
        /// Rejected texts in document order
        invalid_texts: Vec<String>,
    },
    /// Something failed
    Error {
        /// Human readable message
        message: String,
    },
    /// Single selected text validated
    ValidationResult {
        /// Whether it is an approved term
        matched: bool,
        /// Replacements when rejected
        suggestions: Vec<Term>,
    },
    /// Mock generation finished
    MocksCreated {
        /// Clones created
        count: usize,
    },
    /// Informational message
    Notice {
        /// Human readable message
        message: String,
    },
}

impl UiEvent {
    /// Error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Notice event
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }

    /// Wire name of the event
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GlossaryUpdated { .. } => "glossary-updated",
            Self::CategoriesUpdated { .. } => "categories-updated",
            Self::ScanComplete { .. } => "scan-complete",
            Self::Error { .. } => "error",
            Self::ValidationResult { .. } => "validation-result",
            Self::MocksCreated { .. } => "mocks-created",
            Self::Notice { .. } => "notice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn commands_decode_from_tagged_json() {
        let cmd: UiCommand =
            serde_json::from_value(json!({"type": "category-changed", "category": "Web"})).unwrap();
        assert_eq!(
            cmd,
            UiCommand::CategoryChanged {
                category: "Web".to_string()
            }
        );

        let cmd: UiCommand = serde_json::from_value(json!({"type": "scan-selected"})).unwrap();
        assert_eq!(cmd, UiCommand::ScanSelected);

        let cmd: UiCommand =
            serde_json::from_value(json!({"type": "generate-mocks"})).unwrap();
        assert_eq!(cmd, UiCommand::GenerateMocks { category: None });

        let cmd: UiCommand = serde_json::from_value(
            json!({"type": "glossary-source-changed", "source_id": "zones"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            UiCommand::GlossarySourceChanged {
                source_id: "zones".to_string()
            }
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(serde_json::from_value::<UiCommand>(json!({"type": "delete-all"})).is_err());
    }

    #[test]
    fn events_encode_with_type_tag() {
        let value = serde_json::to_value(UiEvent::ScanComplete {
            invalid_texts: vec!["Cancel".to_string()],
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"type": "scan-complete", "invalid_texts": ["Cancel"]})
        );

        let value = serde_json::to_value(UiEvent::error("boom")).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(UiEvent::error("boom").kind(), "error");
    }
}
