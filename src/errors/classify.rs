//! Maps non-2xx responses onto the error taxonomy.

use super::{ApiError, PasisError};
use crate::types::ErrorEnvelope;

/// Classifies a non-2xx response.
///
/// The body is decoded as an [`ErrorEnvelope`]; if that fails the result is a
/// plain API error whatever the status, with a message synthesized from the
/// status line. A decoded 401 becomes an authentication error and a decoded
/// 400/422 a validation error, both wrapping the API error.
pub fn classify(status: u16, body: &[u8]) -> PasisError {
    let api = match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => ApiError::new(status, envelope.message, envelope.errors),
        Err(_) => return PasisError::Api(ApiError::new(status, status_line(status), Vec::new())),
    };

    match status {
        401 => PasisError::Authentication {
            message: api.message.clone(),
            source: Some(Box::new(PasisError::Api(api))),
        },
        400 | 422 => PasisError::Validation {
            message: api.message.clone(),
            errors: api.errors.clone(),
            source: Some(api),
        },
        _ => PasisError::Api(api),
    }
}

fn status_line(status: u16) -> String {
    let reason = http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Status");
    format!("HTTP {}: {}", status, reason)
}
