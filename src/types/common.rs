//! Response envelopes shared by every Pasis endpoint.

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaginationMeta {
    /// Current page (1-based).
    #[serde(default)]
    pub page: u32,
    /// Items per page.
    #[serde(default)]
    pub per_page: u32,
    /// Total number of items.
    #[serde(default)]
    pub total: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

/// Outer shape of every successful response.
///
/// `data` is kept untyped so one envelope serves all operations; the executor
/// decodes it into the operation's own type afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuccessEnvelope {
    /// Operation payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Pagination metadata for list operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

/// Outer shape of every non-2xx response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Individual error details.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// A decoded success response with a typed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Typed payload.
    pub data: T,
    /// Optional message from the envelope.
    pub message: Option<String>,
    /// Pagination metadata from the envelope.
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// Discards the envelope metadata and returns the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}
