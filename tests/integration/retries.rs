//! Integration tests for retry and cancellation behaviour

use super::*;
use pasis_client::{CancellationToken, ErrorKind, PasisError};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_server_error_is_retried_until_exhausted() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(error_response(503, "maintenance", &[]))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.wallet().get().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(client.metrics().retries, 2);
}

#[tokio::test]
async fn test_server_error_then_success() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(success_response(json!({"data": {"id": "w1"}})))
        .mount(&mock_server)
        .await;

    let wallet = client_for(&mock_server).wallet().get().await.unwrap();
    assert_eq!(wallet.id, "w1");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(error_response(404, "not found", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).merchant().profile().await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_undecodable_error_body_gets_status_line() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).wallet().get().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 418: I'm a teapot");
}

#[tokio::test]
async fn test_unauthorized_html_body_is_plain_api_error() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>Unauthorized</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).wallet().get().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
}

#[tokio::test]
async fn test_cancellation_interrupts_slow_request() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(
            success_response(json!({"data": {"id": "w1"}})).set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let client = client_for(&mock_server).with_cancellation(cancel.clone());
    client.ensure_token().await.unwrap();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = client.wallet().get().await.unwrap_err();

    assert!(matches!(err, PasisError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(4));
}
