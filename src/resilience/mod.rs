//! Resilience layer for the Pasis client.
//!
//! Retries with exponential backoff for transport failures and 5xx
//! responses.

mod retry;

pub use retry::{RetryConfig, RetryPolicy};
