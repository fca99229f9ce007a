//! Request execution.
//!
//! [`RequestExecutor`] runs one logical API call: it makes sure a token is
//! held, dispatches the request with retries, classifies failures, and decodes
//! the success envelope into the caller's type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, Span};
use url::Url;
use uuid::Uuid;

use crate::auth::CredentialManager;
use crate::config::{join_url, PasisConfig};
use crate::errors::{classify, PasisError, PasisResult};
use crate::observability::MetricsCollector;
use crate::resilience::RetryPolicy;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::{ApiResponse, SuccessEnvelope};

/// Header carrying the per-call request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// A logical API request relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: HttpMethod,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    operation: Option<String>,
}

impl ApiRequest {
    /// Creates a request for a `/`-separated path such as `wallet/deposit`.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            query: Vec::new(),
            body: None,
            operation: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: &str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Appends one path segment. The value is percent-encoded, so it may
    /// contain `/` or other reserved characters.
    pub fn segment(mut self, raw: impl Into<String>) -> Self {
        self.segments.push(raw.into());
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> PasisResult<Self> {
        let bytes = serde_json::to_vec(body).map_err(|source| PasisError::Serialization { source })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Names the operation for metrics, e.g. `wallet.deposit`.
    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.operation = Some(name.into());
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the path relative to the base URL, unencoded.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Returns the serialized body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn operation_name(&self) -> String {
        self.operation
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.method, self.path()))
    }
}

/// Runs API requests with authentication, retries and classification.
pub struct RequestExecutor {
    base_url: Url,
    custom_headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialManager>,
    retry: RetryPolicy,
    metrics: Arc<dyn MetricsCollector>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: &PasisConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialManager>,
        retry: RetryPolicy,
        metrics: Arc<dyn MetricsCollector>,
    ) -> Self {
        Self {
            base_url: config.base_url.clone(),
            custom_headers: config.custom_headers.clone(),
            transport,
            credentials,
            retry,
            metrics,
        }
    }

    /// Returns the credential manager requests are authenticated with.
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Executes a request and decodes the envelope's `data` into `T`.
    ///
    /// A success response without `data` yields `T::default()`.
    pub async fn execute<T: DeserializeOwned + Default>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> PasisResult<ApiResponse<T>> {
        self.observe(&request, cancel, |response| decode_success(&response.body))
            .await
    }

    /// Executes a request whose response body is not needed.
    pub async fn execute_unit(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> PasisResult<()> {
        self.observe(&request, cancel, |_| Ok(())).await
    }

    async fn observe<R>(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
        decode: impl FnOnce(HttpResponse) -> PasisResult<R>,
    ) -> PasisResult<R> {
        let started = Instant::now();
        let operation = request.operation_name();

        let result = self.dispatch(request, &operation, cancel).await.and_then(decode);

        self.metrics
            .record_request(&operation, result.is_ok(), started.elapsed());
        if let Err(err) = &result {
            self.metrics.record_error(err.kind().as_str());
        }
        result
    }

    #[instrument(
        skip(self, request, cancel),
        fields(method = %request.method, path = %request.path(), request_id = tracing::field::Empty)
    )]
    async fn dispatch(
        &self,
        request: &ApiRequest,
        operation: &str,
        cancel: &CancellationToken,
    ) -> PasisResult<HttpResponse> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PasisError::Cancelled),
            result = self.credentials.ensure_token() => result?,
        }

        let url = join_url(&self.base_url, &request.segments, &request.query)?;
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let url = url.as_str();
        let request_id = request_id.as_str();
        self.retry
            .execute(cancel, move |attempt| {
                self.attempt(request, operation, url, request_id, attempt, cancel)
            })
            .await
    }

    async fn attempt(
        &self,
        request: &ApiRequest,
        operation: &str,
        url: &str,
        request_id: &str,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> PasisResult<HttpResponse> {
        if attempt > 0 {
            self.metrics.record_retry(operation);
        }

        let mut http_request = HttpRequest::new(request.method, url).with_json_headers();
        for (name, value) in &self.custom_headers {
            http_request = http_request.with_header(name.clone(), value.clone());
        }
        http_request = http_request.with_header(REQUEST_ID_HEADER, request_id);

        if let Some(token) = self.credentials.access_token().await {
            http_request = http_request.with_bearer(&token);
        }
        if let Some(body) = &request.body {
            http_request = http_request.with_body(body.clone());
        }

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PasisError::Cancelled),
            result = self.transport.send(http_request) => {
                result.map_err(|e| PasisError::transport("request failed", e))?
            }
        };

        debug!(attempt, status = response.status, "Attempt completed");

        if response.is_success() {
            Ok(response)
        } else {
            Err(classify(response.status, &response.body))
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish()
    }
}

/// Decodes a success body: first the envelope, then its `data` into `T`.
///
/// A failure at either stage is a [`PasisError::Decode`]. A missing or null
/// `data` leaves the payload at `T::default()`.
pub fn decode_success<T: DeserializeOwned + Default>(body: &[u8]) -> PasisResult<ApiResponse<T>> {
    let envelope: SuccessEnvelope = serde_json::from_slice(body)
        .map_err(|e| PasisError::decode("failed to decode response envelope", e))?;

    let data = if envelope.data.is_null() {
        T::default()
    } else {
        serde_json::from_value(envelope.data)
            .map_err(|e| PasisError::decode("failed to decode response data", e))?
    };

    Ok(ApiResponse {
        data,
        message: envelope.message,
        pagination: envelope.pagination,
    })
}
