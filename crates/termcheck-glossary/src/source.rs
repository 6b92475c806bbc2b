//! Glossary source contract and record decoding

use crate::error::GlossaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use termcheck_model::{FieldMapping, SourceConfig, Term};

/// Remote table record before field mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source-assigned id
    pub id: String,
    /// Column name → cell value
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Create record
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Cell as text
    ///
    /// Strings are taken as-is, numbers are formatted, and multi-select cells
    /// contribute their first string entry.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
            _ => None,
        }
    }
}

/// One page of a table listing
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    /// Records on this page
    pub records: Vec<RawRecord>,
    /// Cursor for the next page
    pub offset: Option<String>,
}

/// Decode a `{ "records": [...], "offset": "..." }` payload
///
/// # Errors
/// [`GlossaryError::Format`] when the body is not JSON, has no `records`
/// array, or a record is not an object with a string id.
pub fn parse_page(body: &[u8]) -> Result<RecordPage, GlossaryError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GlossaryError::format(format!("response is not JSON: {e}")))?;

    let items = value
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| GlossaryError::format("response has no record sequence"))?;

    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let object = item
                .as_object()
                .ok_or_else(|| GlossaryError::format(format!("record {i} is not an object")))?;
            let id = object
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| GlossaryError::format(format!("record {i} has no id")))?;
            let fields = object
                .get("fields")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Ok(RawRecord::new(id, fields))
        })
        .collect::<Result<Vec<_>, GlossaryError>>()?;

    let offset = value
        .get("offset")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RecordPage { records, offset })
}

/// Map raw records to terms under `mapping`
///
/// Records whose term cell is missing or blank are skipped.
#[must_use]
pub fn map_records(records: Vec<RawRecord>, mapping: &FieldMapping) -> Vec<Term> {
    let total = records.len();
    let terms: Vec<Term> = records
        .into_iter()
        .filter_map(|record| {
            let text = record.text_field(&mapping.term).unwrap_or_default();
            match Term::new(record.id.clone(), text) {
                Ok(mut term) => {
                    term.category = record
                        .text_field(&mapping.category)
                        .filter(|c| !c.is_empty());
                    term.explanation = record.text_field(&mapping.explanation);
                    Some(term)
                }
                Err(e) => {
                    tracing::warn!("Skipping record: {}", e);
                    None
                }
            }
        })
        .collect();

    if terms.len() != total {
        tracing::warn!(
            "Mapped {} of {} records (field '{}')",
            terms.len(),
            total,
            mapping.term
        );
    }
    terms
}

/// A remote table that can list every record
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GlossarySource: Send + Sync {
    /// Fetch all raw records of the configured table
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError>;
}

#[async_trait]
impl<T: GlossarySource + ?Sized> GlossarySource for Box<T> {
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError> {
        (**self).fetch_all(config).await
    }
}

#[async_trait]
impl<T: GlossarySource + ?Sized> GlossarySource for Arc<T> {
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError> {
        (**self).fetch_all(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_page_reads_records_and_offset() {
        let body = json!({
            "records": [
                {"id": "rec1", "fields": {"Content": "Submit", "Platform": "Web"}},
                {"id": "rec2"}
            ],
            "offset": "itr123"
        })
        .to_string();

        let page = parse_page(body.as_bytes()).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id, "rec1");
        assert!(page.records[1].fields.is_empty());
        assert_eq!(page.offset.as_deref(), Some("itr123"));
    }

    #[test]
    fn missing_records_is_format_error() {
        let err = parse_page(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, GlossaryError::Format(_)));
    }

    #[test]
    fn records_not_array_is_format_error() {
        let err = parse_page(br#"{"records": {"id": "x"}}"#).unwrap_err();
        assert!(matches!(err, GlossaryError::Format(_)));
    }

    #[test]
    fn non_object_record_is_format_error() {
        let err = parse_page(br#"{"records": ["rec1"]}"#).unwrap_err();
        assert!(matches!(err, GlossaryError::Format(_)));
    }

    #[test]
    fn non_json_is_format_error() {
        let err = parse_page(b"<html>").unwrap_err();
        assert!(matches!(err, GlossaryError::Format(_)));
    }

    #[test]
    fn map_records_uses_configured_fields() {
        let page = parse_page(
            json!({"records": [
                {"id": "r1", "fields": {"Zone Name": "Lobby", "Area": "North", "Notes": "Ground floor"}},
                {"id": "r2", "fields": {"Zone Name": "", "Area": "South"}},
                {"id": "r3", "fields": {"Area": "East"}},
                {"id": "r4", "fields": {"Zone Name": "Atrium", "Area": ["West", "Central"]}}
            ]})
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        let mapping = FieldMapping::new("Zone Name", "Area", "Notes");
        let terms = map_records(page.records, &mapping);

        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].term, "Lobby");
        assert_eq!(terms[0].category(), Some("North"));
        assert_eq!(terms[0].explanation.as_deref(), Some("Ground floor"));
        assert!(terms[0].approved);
        assert_eq!(terms[1].category(), Some("West"));
        assert_eq!(terms[1].explanation, None);
    }

    #[test]
    fn empty_category_cell_maps_to_none() {
        let record = RawRecord::new(
            "r1",
            json!({"Content": "Save", "Platform": ""})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let terms = map_records(vec![record], &FieldMapping::default());
        assert_eq!(terms[0].category, None);
    }
}
