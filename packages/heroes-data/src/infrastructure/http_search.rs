//! HTTP search engine adapter
//!
//! Posts query documents to `{uri}/{index}/_search`. Connection failures,
//! timeouts and non-2xx statuses surface as transport errors; an
//! unparseable body is a decode error.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::domain::SearchClient;
use crate::error::{Backend, HeroesError, Result};

/// Longest response body quoted in a status error
const BODY_EXCERPT_CHARS: usize = 256;

#[derive(Clone)]
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    base_uri: String,
    timeout: Duration,
}

impl HttpSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                HeroesError::config("cannot build search HTTP client")
                    .with_backend(Backend::SearchEngine)
                    .with_source(e)
            })?;
        Ok(Self {
            http_client,
            base_uri: config.uri.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_uri, index)
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let url = self.search_url(index);
        tracing::debug!(url = %url, "search request");

        let response = self
            .http_client
            .post(url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
            return Err(HeroesError::transport(format!(
                "search request failed with {}: {}",
                status, excerpt
            ))
            .with_backend(Backend::SearchEngine));
        }

        Ok(response.json::<Value>().await?)
    }
}
