//! Token exchange payloads.

use serde::{Deserialize, Serialize};

/// Request body for application authentication.
#[derive(Serialize)]
pub struct AppAuthRequest<'a> {
    /// Application key.
    pub app_key: &'a str,
    /// Application secret.
    pub secret_key: &'a str,
}

/// Token pair returned by the authenticate and refresh endpoints.
#[derive(Clone, Default, Deserialize)]
pub struct AppAuthResponse {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Credential for obtaining a new access token.
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    #[serde(default, alias = "expires_in_seconds")]
    pub expires_in: i64,
}

impl std::fmt::Debug for AppAuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppAuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
