//! Local JSON source
//!
//! Reads a table export in the same `{ "records": [...] }` shape the REST
//! API returns. Useful offline and in tests.

use crate::error::GlossaryError;
use crate::source::{parse_page, GlossarySource, RawRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use termcheck_model::SourceConfig;

/// Glossary source reading a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create source for `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GlossarySource for JsonFileSource {
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError> {
        tracing::debug!("Reading glossary '{}' from {}", config.id, self.path.display());
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| GlossaryError::io_error(&self.path, e))?;
        Ok(parse_page(&body)?.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_records_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"records":[{{"id":"r1","fields":{{"Content":"Submit"}}}}]}}"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source
            .fetch_all(&SourceConfig::new("file", "local", "terms"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text_field("Content").as_deref(), Some("Submit"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source
            .fetch_all(&SourceConfig::new("file", "local", "terms"))
            .await
            .unwrap_err();
        assert!(matches!(err, GlossaryError::Io { .. }));
    }
}
