//! Integration tests using WireMock
//!
//! These tests drive the full client against a mock HTTP server: token
//! exchange, authenticated domain calls, error classification and retries.

pub mod auth_flow;
pub mod retries;
pub mod transactions;
pub mod wallet;

use pasis_client::{PasisClient, PasisClientBuilder, RetryConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "acc-int-1";
pub const REFRESH_TOKEN: &str = "ref-int-1";

/// Starts a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Returns a client builder pointed at the mock server with fast retries.
pub fn client_builder(server: &MockServer) -> PasisClientBuilder {
    PasisClient::builder()
        .app_key("int-app")
        .secret_key("int-secret")
        .base_url(format!("{}/api", server.uri()))
        .retry(
            RetryConfig::new()
                .max_retries(2)
                .initial_delay(Duration::from_millis(5)),
        )
}

/// Builds a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> PasisClient {
    client_builder(server).build().unwrap()
}

/// Envelope for a token exchange.
pub fn token_body(access: &str, refresh: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "data": {
            "access_token": access,
            "refresh_token": refresh,
            "expires_in": expires_in
        }
    })
}

/// Mounts a successful application authentication.
pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .respond_with(success_response(token_body(ACCESS_TOKEN, REFRESH_TOKEN, 3600)))
        .mount(server)
        .await;
}

/// Helper to create error response templates
pub fn error_response(status: u16, message: &str, errors: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message, "errors": errors }))
}

/// Helper to create success response templates
pub fn success_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}
