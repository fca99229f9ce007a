//! HTTP transport layer for the Pasis client.
//!
//! Provides the transport abstraction the credential manager and request
//! executor dispatch through, and the pooled `reqwest` implementation.

mod http;

pub use self::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

/// Transport error types. Each one means no HTTP response was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The request could not be built or sent.
    #[error("Request error: {message}")]
    Request {
        /// Error message.
        message: String,
    },

    /// The response body could not be read.
    #[error("Body error: {message}")]
    Body {
        /// Error message.
        message: String,
    },
}
