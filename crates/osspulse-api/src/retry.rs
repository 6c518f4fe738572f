// Backoff for the public, unauthenticated Firebase endpoints
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Classifies errors for the retry loop: transient failures get another
/// attempt, permanent ones surface immediately.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Backoff parameters for one client
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Run `operation`, retrying transient failures with doubling delays.
///
/// A permanent failure (a purged item, a client error in the request
/// itself) returns on the spot; waiting would not change the answer.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt = 1;
    let mut delay = config.base_delay;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Request succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= config.max_attempts => {
                warn!("Giving up after {} attempts: {}", attempt, err);
                return Err(err);
            }
            Err(err) => {
                warn!(
                    "Attempt {}/{} failed: {}. Next try in {:?}",
                    attempt, config.max_attempts, err, delay
                );
                sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
                attempt += 1;
            }
        }
    }
}

/// Statuses where a later attempt can plausibly succeed
pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status.is_server_error()
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
}
