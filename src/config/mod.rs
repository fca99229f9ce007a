//! Configuration module for the Pasis client.
//!
//! Holds the application credentials, base URL, timeouts, and retry and
//! token-refresh settings.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::errors::{PasisError, PasisResult};

/// Default base URL for the Pasis API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default margin before expiry at which a token is renewed (5 minutes).
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::from_secs(5 * 60);

/// Configuration for the Pasis client.
#[derive(Clone)]
pub struct PasisConfig {
    /// Application key.
    pub app_key: String,
    /// Application secret (stored securely).
    pub(crate) secret_key: SecretString,
    /// Base URL for API requests. Its path is kept as a prefix.
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts; 0 disables retries.
    pub max_retries: u32,
    /// Renew the token when it expires within this margin.
    pub refresh_buffer: Duration,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl PasisConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PasisConfigBuilder {
        PasisConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PASIS_APP_KEY` (required): application key
    /// - `PASIS_SECRET_KEY` (required): application secret
    /// - `PASIS_BASE_URL` (optional): custom base URL
    /// - `PASIS_TIMEOUT` (optional): request timeout in seconds
    /// - `PASIS_MAX_RETRIES` (optional): maximum retry attempts
    pub fn from_env() -> PasisResult<Self> {
        let app_key = required_env("PASIS_APP_KEY")?;
        let secret_key = required_env("PASIS_SECRET_KEY")?;

        let mut builder = PasisConfigBuilder::new()
            .app_key(app_key)
            .secret_key(secret_key);

        if let Ok(base_url) = std::env::var("PASIS_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("PASIS_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(secs) => builder = builder.timeout_secs(secs),
                Err(_) => tracing::warn!(value = %timeout_str, "Ignoring invalid PASIS_TIMEOUT"),
            }
        }

        if let Ok(retries_str) = std::env::var("PASIS_MAX_RETRIES") {
            match retries_str.parse::<u32>() {
                Ok(retries) => builder = builder.max_retries(retries),
                Err(_) => {
                    tracing::warn!(value = %retries_str, "Ignoring invalid PASIS_MAX_RETRIES");
                }
            }
        }

        builder.build()
    }

    /// Returns the application secret.
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Returns the full URL for an endpoint path such as `wallet/deposit`.
    pub fn endpoint_url(&self, path: &str) -> PasisResult<Url> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        join_url(&self.base_url, &segments, &[])
    }
}

fn required_env(name: &str) -> PasisResult<String> {
    std::env::var(name)
        .map_err(|_| PasisError::configuration(format!("{} environment variable not set", name)))
}

/// Appends path segments and query pairs to `base`.
///
/// The base path is kept as a prefix and each segment is percent-encoded, so
/// caller-supplied identifiers cannot change the path structure.
pub(crate) fn join_url<S: AsRef<str>>(
    base: &Url,
    segments: &[S],
    query: &[(String, String)],
) -> PasisResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| PasisError::configuration(format!("base URL {} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments.iter().map(AsRef::as_ref));

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(url)
}

impl std::fmt::Debug for PasisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasisConfig")
            .field("app_key", &self.app_key)
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}

/// Builder for `PasisConfig`.
#[derive(Default)]
pub struct PasisConfigBuilder {
    app_key: Option<String>,
    secret_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    refresh_buffer: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl PasisConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application key.
    pub fn app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Sets the application secret.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets the maximum retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the token refresh buffer.
    pub fn refresh_buffer(mut self, refresh_buffer: Duration) -> Self {
        self.refresh_buffer = Some(refresh_buffer);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> PasisResult<PasisConfig> {
        let app_key = non_empty(self.app_key, "app key")?;
        let secret_key = non_empty(self.secret_key, "secret key")?;

        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(PasisError::configuration(format!(
                "base URL must use http or https, got {}",
                base_url.scheme()
            )));
        }
        if base_url.scheme() == "http" && base_url.host_str() != Some("localhost") {
            tracing::warn!(base_url = %base_url, "Base URL does not use HTTPS");
        }

        Ok(PasisConfig {
            app_key,
            secret_key: SecretString::new(secret_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            refresh_buffer: self.refresh_buffer.unwrap_or(DEFAULT_REFRESH_BUFFER),
            custom_headers: self.custom_headers,
        })
    }
}

fn non_empty(value: Option<String>, name: &str) -> PasisResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(PasisError::configuration(format!("{} cannot be empty", name))),
        None => Err(PasisError::configuration(format!("{} is required", name))),
    }
}
