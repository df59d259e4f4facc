//! Page fetching for the analyzer

use crate::config::AnalyzerConfig;
use crate::errors::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Source of raw HTML for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its HTML
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// Fetches pages over HTTP with a fixed timeout and no retries
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new fetcher instance
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.timeout_seconds, &config.user_agent)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        info!("🌐 Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| FetchError::MalformedInput {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!("📄 Downloaded {} characters of HTML content", html.len());

        Ok(html)
    }
}

/// Serves pages from memory, keyed by absolute URL.
///
/// Useful for analysing saved pages and for exercising the analyzer without
/// network access.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `html` as the body served for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
