//! Airtable-compatible REST source
//!
//! Lists `{endpoint}/{base}/{table}` with a bearer token and follows the
//! `offset` cursor until the table is exhausted or `max_pages` is reached.

use crate::error::GlossaryError;
use crate::source::{parse_page, GlossarySource, RawRecord};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;
use std::time::Duration;
use termcheck_model::SourceConfig;
use tracing::instrument;

/// Retry schedule for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per page, including the first
    pub max_attempts: usize,
    /// Linear backoff step
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
        }
    }
}

/// Glossary source backed by the Airtable list-records API
#[derive(Debug, Clone)]
pub struct AirtableSource {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl AirtableSource {
    /// Create source with default client and retry policy
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// List URL for the configured table
    ///
    /// # Errors
    /// [`GlossaryError::Config`] if the endpoint is not a valid base URL.
    pub fn table_url(config: &SourceConfig) -> Result<Url, GlossaryError> {
        if config.base.is_empty() || config.table.is_empty() {
            return Err(GlossaryError::Config(format!(
                "source '{}' needs both base and table",
                config.id
            )));
        }
        let mut url = Url::parse(&config.endpoint)
            .map_err(|e| GlossaryError::Config(format!("invalid endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GlossaryError::Config("endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push(&config.base)
            .push(&config.table);
        Ok(url)
    }

    fn headers(config: &SourceConfig) -> Result<HeaderMap, GlossaryError> {
        let token = config.auth.resolve().ok_or_else(|| {
            GlossaryError::Config(format!("no API token configured for source '{}'", config.id))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GlossaryError::Config(format!("invalid token: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get_once(&self, url: &Url, headers: &HeaderMap) -> Result<Vec<u8>, GlossaryError> {
        let resp = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| GlossaryError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Glossary API error: status={} url={}", status, url);
            return Err(GlossaryError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| GlossaryError::Transport(format!("read body failed: {e}")))
    }

    #[instrument(name = "glossary_get_with_retry", skip(self, headers))]
    async fn get_with_retry(&self, url: &Url, headers: &HeaderMap) -> Result<Vec<u8>, GlossaryError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.get_once(url, headers).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    tracing::warn!("Attempt {} failed, retrying: {}", attempt, e);
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(Duration::from_millis(
                self.retry.base_backoff_ms.saturating_mul(attempt as u64),
            ))
            .await;
        }
    }
}

impl Default for AirtableSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GlossarySource for AirtableSource {
    #[instrument(name = "airtable_fetch_all", skip(self, config), fields(source = %config.id))]
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError> {
        let base_url = Self::table_url(config)?;
        let headers = Self::headers(config)?;
        tracing::info!("Fetching from URL: {}", base_url);

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        for page in 0..config.max_pages.max(1) {
            let mut url = base_url.clone();
            if let Some(cursor) = &offset {
                url.query_pairs_mut().append_pair("offset", cursor);
            }

            let body = self.get_with_retry(&url, &headers).await?;
            let page_data = parse_page(&body)?;
            tracing::debug!("Page {} returned {} records", page, page_data.records.len());
            records.extend(page_data.records);

            match page_data.offset {
                Some(next) => offset = Some(next),
                None => return Ok(records),
            }
        }

        tracing::warn!(
            "Stopped after {} pages; table '{}' may be truncated",
            config.max_pages,
            config.table
        );
        Ok(records)
    }
}
