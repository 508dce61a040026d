//! Pexels video search HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{FootageError, FootageResult};
use crate::provider::FootageProvider;
use crate::types::{ProviderVideo, SearchResponse};

/// Results requested per search.
pub const PAGE_SIZE: u32 = 80;

/// Configuration for the Pexels client.
#[derive(Debug, Clone)]
pub struct PexelsConfig {
    /// API key; checked on every request
    pub api_key: Option<String>,
    /// Base URL of the Pexels API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.pexels.com".to_string(),
            timeout: Duration::from_millis(5000),
        }
    }
}

impl PexelsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("PEXELS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: std::env::var("PEXELS_BASE_URL")
                .unwrap_or_else(|_| "https://api.pexels.com".to_string()),
            timeout: Duration::from_millis(
                std::env::var("PEXELS_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Client for the Pexels video search API.
pub struct PexelsClient {
    http: Client,
    config: PexelsConfig,
}

impl PexelsClient {
    /// Create a new Pexels client.
    pub fn new(config: PexelsConfig) -> FootageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FootageError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> FootageResult<Self> {
        Self::new(PexelsConfig::from_env())
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// Search portrait videos for `term`.
    pub async fn search_videos(&self, term: &str) -> FootageResult<Vec<ProviderVideo>> {
        let api_key = self.api_key().ok_or(FootageError::MissingApiKey)?;
        let url = format!("{}/videos/search", self.config.base_url.trim_end_matches('/'));
        let per_page = PAGE_SIZE.to_string();

        debug!(term, "Searching Pexels videos");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, api_key)
            .query(&[
                ("orientation", "portrait"),
                ("size", "medium"),
                ("per_page", per_page.as_str()),
                ("query", term),
            ])
            .send()
            .await
            .map_err(|e| classify_transport_error(e, term))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(term, %status, "Pexels search returned an error status");
            return Err(FootageError::RequestFailed(format!(
                "Pexels returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, term))?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        let videos = parsed.videos.ok_or_else(|| {
            FootageError::InvalidResponse(format!("no video list in response for '{}'", term))
        })?;
        if videos.is_empty() {
            return Err(FootageError::NoResults(term.to_string()));
        }

        Ok(videos.into_iter().map(ProviderVideo::from).collect())
    }
}

#[async_trait]
impl FootageProvider for PexelsClient {
    async fn search(&self, term: &str) -> FootageResult<Vec<ProviderVideo>> {
        self.search_videos(term).await
    }

    fn name(&self) -> &'static str {
        "pexels"
    }
}

fn classify_transport_error(e: reqwest::Error, term: &str) -> FootageError {
    if e.is_timeout() {
        FootageError::Timeout {
            term: term.to_string(),
        }
    } else {
        FootageError::Network(e)
    }
}
