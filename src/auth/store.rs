//! Token storage.
//!
//! The credential manager mirrors every token change into a [`TokenStore`] and
//! consults it before deciding whether a token is stale, so a store shared
//! between processes lets them reuse each other's tokens.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::errors::PasisError;

/// Access token, refresh token and expiry for one client.
///
/// An empty access token means "nothing cached". `expires_at` is `None` when
/// the expiry is unknown; otherwise it was strictly in the future when set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Bearer credential for domain operations.
    pub access_token: String,
    /// Credential for obtaining a new access token.
    pub refresh_token: String,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Creates a credential.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Returns true if no access token is held.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Returns true if a refresh token is held.
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Returns true if the token must be renewed: the expiry is unknown, or
    /// `now + buffer` is past it.
    pub fn is_stale(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now + buffer > expires_at,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &str| if token.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("Credential")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token storage interface.
///
/// Implementations must make `set` and `clear` atomic with respect to
/// concurrent `get`/`set` calls.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Retrieve the stored credential; empty when nothing is cached.
    ///
    /// Callers treat an error as a cache miss.
    async fn get(&self) -> Result<Credential, PasisError>;

    /// Overwrite the stored credential.
    async fn set(&self, credential: Credential) -> Result<(), PasisError>;

    /// Reset to the empty credential.
    async fn clear(&self) -> Result<(), PasisError>;
}

/// In-process token store. Reads share the lock; writes are exclusive.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    credential: RwLock<Credential>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(credential),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self) -> Result<Credential, PasisError> {
        Ok(self.credential.read().await.clone())
    }

    async fn set(&self, credential: Credential) -> Result<(), PasisError> {
        *self.credential.write().await = credential;
        Ok(())
    }

    async fn clear(&self) -> Result<(), PasisError> {
        *self.credential.write().await = Credential::default();
        Ok(())
    }
}
