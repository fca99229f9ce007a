//! Authentication module for the Pasis client.
//!
//! The [`CredentialManager`] owns the access/refresh token pair, decides when
//! it must be renewed, and performs the authenticate and refresh exchanges.
//! Token state is shared by every operation on a client and is only ever read
//! or written under its lock.

mod store;

pub use store::{Credential, InMemoryTokenStore, TokenStore};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{join_url, PasisConfig};
use crate::errors::{classify, PasisError, PasisResult};
use crate::executor::decode_success;
use crate::observability::MetricsCollector;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{AppAuthRequest, AppAuthResponse};

const AUTHENTICATE_FAILED: &str = "failed to authenticate";
const REFRESH_FAILED: &str = "failed to refresh token";

/// Keeps one credential pair valid across concurrent callers.
pub struct CredentialManager {
    app_key: String,
    secret_key: SecretString,
    base_url: Url,
    refresh_buffer: chrono::Duration,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    metrics: Arc<dyn MetricsCollector>,
    current: RwLock<Credential>,
}

impl CredentialManager {
    /// Creates a credential manager with no token held.
    pub fn new(
        config: &PasisConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        metrics: Arc<dyn MetricsCollector>,
    ) -> PasisResult<Self> {
        let refresh_buffer = chrono::Duration::from_std(config.refresh_buffer).map_err(|_| {
            PasisError::configuration("refresh buffer is out of range")
        })?;

        Ok(Self {
            app_key: config.app_key.clone(),
            secret_key: config.secret_key().clone(),
            base_url: config.base_url.clone(),
            refresh_buffer,
            transport,
            store,
            metrics,
            current: RwLock::new(Credential::default()),
        })
    }

    /// Makes sure a usable access token is held, renewing it if needed.
    ///
    /// A non-empty cached credential in the token store is adopted first, as
    /// another process may have renewed it. A stale token is refreshed when a
    /// refresh token is held; any refresh failure falls back to a full
    /// authentication. Concurrent callers that all see a stale token each
    /// perform their own exchange and the last write wins.
    #[instrument(skip(self))]
    pub async fn ensure_token(&self) -> PasisResult<()> {
        match self.store.get().await {
            Ok(cached) if !cached.is_empty() => {
                *self.current.write().await = cached;
            }
            Ok(_) => {}
            Err(err) => {
                debug!(error = %err, "Token store read failed, treating as cache miss");
            }
        }

        let (stale, has_refresh_token) = {
            let current = self.current.read().await;
            (
                current.is_stale(Utc::now(), self.refresh_buffer),
                current.has_refresh_token(),
            )
        };

        if !stale {
            return Ok(());
        }

        if has_refresh_token {
            match self.refresh().await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(error = %err, "Token refresh failed, re-authenticating");
                }
            }
        }

        self.authenticate().await
    }

    /// Exchanges the application key and secret for a fresh token pair.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> PasisResult<()> {
        let body = serde_json::to_vec(&AppAuthRequest {
            app_key: &self.app_key,
            secret_key: self.secret_key.expose_secret(),
        })
        .map_err(|source| PasisError::Serialization { source }.into_authentication(AUTHENTICATE_FAILED))?;

        let url = join_url(&self.base_url, &["auth", "app"], &[])
            .map_err(|e| e.into_authentication(AUTHENTICATE_FAILED))?;
        let request = HttpRequest::post(url.as_str())
            .with_json_headers()
            .with_body(body);

        let result = self.exchange(request, AUTHENTICATE_FAILED).await;
        self.metrics
            .record_token_exchange("authenticate", result.is_ok());
        let grant = result?;

        self.store_grant(grant, String::new()).await;
        info!("Application authenticated");
        Ok(())
    }

    /// Exchanges the held refresh token for a new token pair.
    ///
    /// Fails without a network call when no refresh token is held.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> PasisResult<()> {
        let refresh_token = self.current.read().await.refresh_token.clone();
        if refresh_token.is_empty() {
            return Err(PasisError::authentication("no refresh token available"));
        }

        let url = join_url(&self.base_url, &["auth", "refresh"], &[])
            .map_err(|e| e.into_authentication(REFRESH_FAILED))?;
        let request = HttpRequest::post(url.as_str())
            .with_json_headers()
            .with_bearer(&refresh_token);

        let result = self.exchange(request, REFRESH_FAILED).await;
        self.metrics.record_token_exchange("refresh", result.is_ok());
        let grant = result?;

        self.store_grant(grant, refresh_token).await;
        info!("Access token refreshed");
        Ok(())
    }

    /// Returns the current access token, or `None` if none is held.
    ///
    /// Always a fresh read, so a token renewed by a concurrent call is seen.
    pub async fn access_token(&self) -> Option<String> {
        let current = self.current.read().await;
        if current.is_empty() {
            None
        } else {
            Some(current.access_token.clone())
        }
    }

    /// Returns a snapshot of the current credential.
    pub async fn credential(&self) -> Credential {
        self.current.read().await.clone()
    }

    /// Drops the held credential and clears the token store.
    pub async fn clear(&self) -> PasisResult<()> {
        *self.current.write().await = Credential::default();
        self.store.clear().await
    }

    async fn exchange(&self, request: HttpRequest, context: &str) -> PasisResult<AppAuthResponse> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| PasisError::transport("request failed", e).into_authentication(context))?;

        if !response.is_success() {
            return Err(classify(response.status, &response.body).into_authentication(context));
        }

        let grant = decode_success::<AppAuthResponse>(&response.body)
            .map(|envelope| envelope.data)
            .map_err(|e| e.into_authentication(context))?;

        if grant.access_token.is_empty() {
            return Err(PasisError::authentication(format!(
                "{}: no access token in response",
                context
            )));
        }
        Ok(grant)
    }

    /// Updates the current credential and writes it through to the store.
    ///
    /// An empty refresh token in the grant keeps `previous_refresh_token`.
    async fn store_grant(&self, grant: AppAuthResponse, previous_refresh_token: String) {
        let refresh_token = if grant.refresh_token.is_empty() {
            previous_refresh_token
        } else {
            grant.refresh_token
        };
        let credential = Credential::new(
            grant.access_token,
            refresh_token,
            expiry_from(Utc::now(), grant.expires_in),
        );

        *self.current.write().await = credential.clone();

        if let Err(err) = self.store.set(credential).await {
            warn!(error = %err, "Failed to write credential to token store");
        }
    }
}

/// Computes the expiry of a token issued at `issued_at`. A non-positive or
/// out-of-range lifetime leaves the expiry unknown.
fn expiry_from(issued_at: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    if expires_in <= 0 {
        return None;
    }
    chrono::Duration::try_seconds(expires_in)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("app_key", &self.app_key)
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}
