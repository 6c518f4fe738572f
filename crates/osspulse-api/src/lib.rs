// Hacker News API client
pub mod hn;
pub mod retry;

// Re-export common types
pub use hn::{HnClient, HnError, HnItem};
pub use retry::{Retryable, RetryConfig};
