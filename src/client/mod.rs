//! Pasis API client.
//!
//! Provides the main client interface for interacting with the Pasis API.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::{CredentialManager, InMemoryTokenStore, TokenStore};
use crate::config::{PasisConfig, PasisConfigBuilder};
use crate::errors::{PasisError, PasisResult};
use crate::executor::RequestExecutor;
use crate::observability::{DefaultMetricsCollector, MetricsCollector, RequestMetrics};
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::services::{MerchantService, TransactionsService, WalletService};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Pasis client.
///
/// Cloning is cheap; clones share the credential, transport and metrics.
///
/// # Example
///
/// ```rust,no_run
/// use pasis_client::{DepositRequest, PasisClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PasisClient::builder()
///         .app_key("your-app-key")
///         .secret_key("your-secret-key")
///         .base_url("https://api.pasis.example/api")
///         .build()?;
///
///     let wallet = client.wallet().get().await?;
///     println!("balance: {:?}", wallet.balance);
///
///     let request = DepositRequest::new("25.00", "KES", "mpesa", "KE")
///         .phone_number("+254700000000");
///     let tx = client.wallet().deposit(&request).await?;
///     println!("deposit {} is {:?}", tx.id, tx.status);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PasisClient {
    inner: Arc<ClientInner>,
    cancel: CancellationToken,
}

struct ClientInner {
    config: PasisConfig,
    executor: RequestExecutor,
    metrics: Arc<dyn MetricsCollector>,
}

impl PasisClient {
    /// Creates a new client builder.
    pub fn builder() -> PasisClientBuilder {
        PasisClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `PASIS_APP_KEY` and `PASIS_SECRET_KEY`, and optionally
    /// `PASIS_BASE_URL`, `PASIS_TIMEOUT` and `PASIS_MAX_RETRIES`.
    pub fn from_env() -> PasisResult<Self> {
        let config = PasisConfig::from_env()?;
        PasisClientBuilder::from_config(&config).build()
    }

    /// Returns the wallet service.
    pub fn wallet(&self) -> WalletService<'_> {
        WalletService::new(&self.inner.executor, &self.cancel)
    }

    /// Returns the transactions service.
    pub fn transactions(&self) -> TransactionsService<'_> {
        TransactionsService::new(&self.inner.executor, &self.cancel)
    }

    /// Returns the merchant service.
    pub fn merchant(&self) -> MerchantService<'_> {
        MerchantService::new(&self.inner.executor, &self.cancel)
    }

    /// Returns the request executor, for endpoints without a typed service.
    pub fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    /// Makes sure a valid access token is held.
    pub async fn ensure_token(&self) -> PasisResult<()> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(PasisError::Cancelled),
            result = self.inner.executor.credentials().ensure_token() => result,
        }
    }

    /// Returns the current access token, if one is held.
    pub async fn access_token(&self) -> Option<String> {
        self.inner.executor.credentials().access_token().await
    }

    /// Drops the held credential and clears the token store.
    pub async fn clear_credentials(&self) -> PasisResult<()> {
        self.inner.executor.credentials().clear().await
    }

    /// Returns a snapshot of the client's metrics.
    pub fn metrics(&self) -> RequestMetrics {
        self.inner.metrics.get_metrics()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PasisConfig {
        &self.inner.config
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.config.base_url
    }

    /// Returns the cancellation token bound to this client.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns a client sharing all state with this one, bound to `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel,
        }
    }
}

impl std::fmt::Debug for PasisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasisClient")
            .field("config", &self.inner.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// Builder for the Pasis client.
pub struct PasisClientBuilder {
    config_builder: PasisConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    token_store: Option<Arc<dyn TokenStore>>,
    retry_config: Option<RetryConfig>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    cancel: Option<CancellationToken>,
}

impl PasisClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::with_config_builder(PasisConfigBuilder::new())
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: &PasisConfig) -> Self {
        use secrecy::ExposeSecret;

        let mut config_builder = PasisConfigBuilder::new()
            .app_key(config.app_key.clone())
            .secret_key(config.secret_key().expose_secret().clone())
            .base_url(config.base_url.as_str())
            .timeout(config.timeout)
            .max_retries(config.max_retries)
            .refresh_buffer(config.refresh_buffer);
        for (name, value) in &config.custom_headers {
            config_builder = config_builder.header(name.clone(), value.clone());
        }

        Self::with_config_builder(config_builder)
    }

    fn with_config_builder(config_builder: PasisConfigBuilder) -> Self {
        Self {
            config_builder,
            transport: None,
            token_store: None,
            retry_config: None,
            metrics: None,
            cancel: None,
        }
    }

    /// Sets the application key.
    pub fn app_key(mut self, app_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.app_key(app_key);
        self
    }

    /// Sets the application secret.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.secret_key(secret_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the maximum retry attempts.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config_builder = self.config_builder.max_retries(retries);
        self
    }

    /// Sets the token refresh buffer.
    pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
        self.config_builder = self.config_builder.refresh_buffer(buffer);
        self
    }

    /// Adds a custom header sent with every API request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the token store. Defaults to an in-memory store.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Sets the full retry configuration, replacing the one derived from
    /// `max_retries`.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Binds the client to a cancellation token.
    pub fn cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Builds the client.
    pub fn build(self) -> PasisResult<PasisClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(config.timeout)
                    .map_err(|e| PasisError::configuration(e.to_string()))?,
            ),
        };

        let token_store: Arc<dyn TokenStore> = self
            .token_store
            .unwrap_or_else(|| Arc::new(InMemoryTokenStore::new()));

        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let retry_config = self
            .retry_config
            .unwrap_or_else(|| RetryConfig::default().max_retries(config.max_retries));

        let credentials = Arc::new(CredentialManager::new(
            &config,
            Arc::clone(&transport),
            token_store,
            Arc::clone(&metrics),
        )?);

        let executor = RequestExecutor::new(
            &config,
            transport,
            credentials,
            RetryPolicy::new(retry_config),
            Arc::clone(&metrics),
        );

        tracing::debug!(base_url = %config.base_url, "Pasis client built");

        Ok(PasisClient {
            inner: Arc::new(ClientInner {
                config,
                executor,
                metrics,
            }),
            cancel: self.cancel.unwrap_or_else(CancellationToken::new),
        })
    }
}

impl Default for PasisClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
