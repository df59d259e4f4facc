//! Error types for page fetching
use thiserror::Error;

/// Failure to turn a URL into an HTML document.
///
/// Every variant is recovered by the analysis stage that triggered it: the
/// stage is abandoned and its fields stay absent.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response body from {url}: {reason}")]
    MalformedInput { url: String, reason: String },

    #[error("no page available for {0}")]
    NotFound(String),
}

impl FetchError {
    /// URL the failed fetch was aimed at
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::MalformedInput { url, .. } => url,
            FetchError::NotFound(url) => url,
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
