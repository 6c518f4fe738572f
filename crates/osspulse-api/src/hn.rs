use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry, Retryable, RetryConfig};

const HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

#[derive(Error, Debug)]
pub enum HnError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Item not found: {0}")]
    NotFound(u64),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl Retryable for HnError {
    fn is_retryable(&self) -> bool {
        match self {
            HnError::ServerError(_) | HnError::RateLimitExceeded | HnError::NetworkError(_) => {
                true
            }
            HnError::RequestFailed(_) | HnError::NotFound(_) | HnError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HnError>;

/// A raw item record as returned by the Firebase `item` endpoint.
///
/// Almost every field is optional on the wire; stories, comments and
/// jobs all share this one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnItem {
    pub id: u64,
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub time: i64,
    pub by: Option<String>,
    pub descendants: Option<u32>,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default)]
    pub deleted: bool,
}

pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl HnClient {
    pub fn new() -> Self {
        Self::with_base_url(HN_API_BASE.to_string())
    }

    /// For tests and API mirrors
    pub fn with_base_url(base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("OssPulse/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            retry_config: RetryConfig::default(),
        }
    }

    /// Override the backoff behavior, e.g. to fail fast in tests
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Fetch the current top-story id list
    pub async fn top_story_ids(&self) -> Result<Vec<u64>> {
        let url = format!("{}/topstories.json", self.base_url);

        with_retry(&self.retry_config, || async {
            let response = self.client.get(&url).send().await?;

            if response.status() == 429 {
                return Err(HnError::RateLimitExceeded);
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                if is_retryable_status(status) {
                    return Err(HnError::ServerError(format!("Status {}: {}", status, body)));
                }

                return Err(HnError::RequestFailed(format!(
                    "Status {}: {}",
                    status, body
                )));
            }

            let ids: Vec<u64> = response.json().await?;
            Ok(ids)
        })
        .await
    }

    /// Fetch one item by id.
    ///
    /// The endpoint answers `null` with a 200 status for ids that don't
    /// resolve, which we surface as `NotFound`.
    pub async fn item(&self, id: u64) -> Result<HnItem> {
        let url = format!("{}/item/{}.json", self.base_url, id);

        with_retry(&self.retry_config, || async {
            let response = self.client.get(&url).send().await?;

            if response.status() == 429 {
                return Err(HnError::RateLimitExceeded);
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                if is_retryable_status(status) {
                    return Err(HnError::ServerError(format!("Status {}: {}", status, body)));
                }

                return Err(HnError::RequestFailed(format!(
                    "Status {}: {}",
                    status, body
                )));
            }

            let item: Option<HnItem> = response.json().await?;
            item.ok_or(HnError::NotFound(id))
        })
        .await
    }

    /// Resolve a batch of ids concurrently.
    ///
    /// The join is all-or-nothing: a failure on any single fetch fails
    /// the whole batch.
    pub async fn items(&self, ids: &[u64]) -> Result<Vec<HnItem>> {
        use futures::future::try_join_all;

        let fetches = ids.iter().map(|&id| self.item(id));
        try_join_all(fetches).await
    }
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}
