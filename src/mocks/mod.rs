//! Mock implementations for testing.
//!
//! Provides a scripted transport and a token store with injectable failures
//! for unit testing without making real API calls.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::auth::{Credential, InMemoryTokenStore, TokenStore};
use crate::errors::PasisError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a response with a raw body.
    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a JSON response.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Creates a 200 success envelope around `data`.
    pub fn success(data: serde_json::Value) -> Self {
        Self::json(200, &serde_json::json!({ "data": data }))
    }

    /// Creates a 200 success envelope with pagination metadata.
    pub fn paginated(data: serde_json::Value, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page))
        };
        Self::json(
            200,
            &serde_json::json!({
                "data": data,
                "pagination": {
                    "page": page,
                    "per_page": per_page,
                    "total": total,
                    "total_pages": total_pages,
                }
            }),
        )
    }

    /// Creates an error envelope response.
    pub fn error(status: u16, message: &str, errors: &[&str]) -> Self {
        Self::json(
            status,
            &serde_json::json!({ "message": message, "errors": errors }),
        )
    }

    /// Creates a token exchange response.
    pub fn token(access_token: &str, refresh_token: &str, expires_in: i64) -> Self {
        Self::success(serde_json::json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": expires_in,
        }))
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    fn into_response(self) -> HttpResponse {
        HttpResponse {
            status: self.status,
            headers: self.headers,
            body: Bytes::from(self.body),
        }
    }
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Response(MockResponse),
    Failure(String),
}

#[derive(Debug)]
struct Route {
    suffix: String,
    outcomes: VecDeque<MockOutcome>,
}

/// Mock HTTP transport for testing.
///
/// Requests are matched against routes by URL path suffix. A route replays
/// its outcomes in order and keeps repeating the last one. Unmatched requests
/// get the default response, or a 404 if none is set.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    default_response: Mutex<Option<MockResponse>>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a response to the route for `suffix`.
    pub fn route(&self, suffix: &str, response: MockResponse) {
        self.push_outcome(suffix, MockOutcome::Response(response));
    }

    /// Adds a connection failure to the route for `suffix`.
    pub fn route_failure(&self, suffix: &str, message: &str) {
        self.push_outcome(suffix, MockOutcome::Failure(message.to_string()));
    }

    /// Sets the response for unmatched requests.
    pub fn with_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Delays every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).iter().map(|(_, r)| r.clone()).collect()
    }

    /// Gets the recorded requests whose path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<HttpRequest> {
        lock(&self.requests)
            .iter()
            .filter(|(_, r)| path_of(&r.url).ends_with(suffix))
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Gets the times at which requests to `suffix` were received.
    pub fn request_times_to(&self, suffix: &str) -> Vec<Instant> {
        lock(&self.requests)
            .iter()
            .filter(|(_, r)| path_of(&r.url).ends_with(suffix))
            .map(|(at, _)| *at)
            .collect()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().map(|(_, r)| r.clone())
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns the number of requests whose path ends with `suffix`.
    pub fn count_to(&self, suffix: &str) -> usize {
        self.request_times_to(suffix).len()
    }

    fn push_outcome(&self, suffix: &str, outcome: MockOutcome) {
        let mut routes = lock(&self.routes);
        match routes.iter_mut().find(|route| route.suffix == suffix) {
            Some(route) => route.outcomes.push_back(outcome),
            None => routes.push(Route {
                suffix: suffix.to_string(),
                outcomes: VecDeque::from([outcome]),
            }),
        }
    }

    fn next_outcome(&self, url: &str) -> MockOutcome {
        let path = path_of(url);
        let mut routes = lock(&self.routes);
        if let Some(route) = routes.iter_mut().find(|route| path.ends_with(&route.suffix)) {
            let outcome = if route.outcomes.len() > 1 {
                route.outcomes.pop_front()
            } else {
                route.outcomes.front().cloned()
            };
            if let Some(outcome) = outcome {
                return outcome;
            }
        }

        let fallback = lock(&self.default_response)
            .clone()
            .unwrap_or_else(|| MockResponse::error(404, "no mock route", &[]));
        MockOutcome::Response(fallback)
    }
}

fn path_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let outcome = self.next_outcome(&request.url);
        lock(&self.requests).push((Instant::now(), request));

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            MockOutcome::Response(response) => Ok(response.into_response()),
            MockOutcome::Failure(message) => Err(TransportError::Connection { message }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Token store with injectable read and write failures.
#[derive(Debug, Default)]
pub struct MockTokenStore {
    inner: InMemoryTokenStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    sets: AtomicUsize,
}

impl MockTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            inner: InMemoryTokenStore::with_credential(credential),
            ..Self::default()
        }
    }

    /// Makes `get` fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes `set` and `clear` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of `set` calls, including failed ones.
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn get(&self) -> Result<Credential, PasisError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PasisError::configuration("mock token store read failure"));
        }
        self.inner.get().await
    }

    async fn set(&self, credential: Credential) -> Result<(), PasisError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PasisError::configuration("mock token store write failure"));
        }
        self.inner.set(credential).await
    }

    async fn clear(&self) -> Result<(), PasisError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PasisError::configuration("mock token store write failure"));
        }
        self.inner.clear().await
    }
}
