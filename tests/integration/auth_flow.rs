//! Integration tests for the credential lifecycle

use super::*;
use futures::future::join_all;
use pasis_client::{Credential, ErrorKind, InMemoryTokenStore, TokenStore};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_first_call_authenticates_then_uses_bearer() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .and(body_json(json!({"app_key": "int-app", "secret_key": "int-secret"})))
        .respond_with(success_response(token_body(ACCESS_TOKEN, REFRESH_TOKEN, 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .and(header("Authorization", "Bearer acc-int-1"))
        .respond_with(success_response(json!({"data": {"id": "w1"}})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert_eq!(client.wallet().get().await.unwrap().id, "w1");
    assert_eq!(client.wallet().get().await.unwrap().id, "w1");
    assert_eq!(client.access_token().await.as_deref(), Some(ACCESS_TOKEN));
}

#[tokio::test]
async fn test_token_near_expiry_is_refreshed() {
    let mock_server = setup_mock_server().await;

    // Expires inside the default five minute buffer, so the next call refreshes.
    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .respond_with(success_response(token_body("acc-short", REFRESH_TOKEN, 60)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("Authorization", "Bearer ref-int-1"))
        .respond_with(success_response(token_body("acc-refreshed", "ref-int-2", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    client.ensure_token().await.unwrap();
    assert_eq!(client.access_token().await.as_deref(), Some("acc-short"));

    client.ensure_token().await.unwrap();
    assert_eq!(client.access_token().await.as_deref(), Some("acc-refreshed"));

    // Fresh now: no further exchange.
    client.ensure_token().await.unwrap();
}

#[tokio::test]
async fn test_failed_refresh_falls_back_to_authentication() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(error_response(401, "refresh token expired", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .respond_with(success_response(token_body("acc-new", "ref-new", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(InMemoryTokenStore::with_credential(Credential::new(
        "acc-old",
        "ref-old",
        Some(chrono::Utc::now() + chrono::Duration::seconds(30)),
    )));
    let client = client_builder(&mock_server)
        .token_store(store.clone())
        .build()
        .unwrap();

    client.ensure_token().await.unwrap();

    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, "acc-new");
    assert_eq!(stored.refresh_token, "ref-new");
}

#[tokio::test]
async fn test_rejected_credentials_stop_the_call() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .respond_with(error_response(401, "invalid app key", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(success_response(json!({"data": {"id": "w1"}})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.wallet().get().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_concurrent_ensure_token_with_empty_store() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/app"))
        .respond_with(success_response(token_body(ACCESS_TOKEN, REFRESH_TOKEN, 3600)))
        .expect(1..=10)
        .mount(&mock_server)
        .await;

    let store = Arc::new(InMemoryTokenStore::new());
    let client = client_builder(&mock_server)
        .token_store(store.clone())
        .build()
        .unwrap();

    let results = join_all((0..10).map(|_| {
        let client = client.clone();
        async move { client.ensure_token().await }
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));

    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, ACCESS_TOKEN);
    assert_eq!(stored.refresh_token, REFRESH_TOKEN);
    assert!(stored.expires_at.unwrap() > chrono::Utc::now());
}
