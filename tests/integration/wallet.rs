//! Integration tests for wallet operations

use super::*;
use pasis_client::{DepositRequest, ErrorKind, PasisError, TransactionStatus, WithdrawRequest};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::Mock;

fn transaction(kind: &str, status: &str) -> serde_json::Value {
    json!({
        "data": {
            "id": "tx-100",
            "wallet_id": "w1",
            "amount": "25.00",
            "currency": "KES",
            "type": kind,
            "status": status,
            "provider": "mpesa",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }
    })
}

#[tokio::test]
async fn test_get_wallet() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet"))
        .respond_with(success_response(
            json!({"data": {"id": "w1", "balance": "10.00", "currency": "USD"}}),
        ))
        .mount(&mock_server)
        .await;

    let wallet = client_for(&mock_server).wallet().get().await.unwrap();

    assert_eq!(wallet.id, "w1");
    assert_eq!(wallet.balance.as_deref(), Some("10.00"));
    assert_eq!(wallet.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn test_deposit() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/wallet/deposit"))
        .and(body_json(json!({
            "amount": "25.00",
            "currency": "KES",
            "provider": "mpesa",
            "region": "KE",
            "phone_number": "+254700000000"
        })))
        .respond_with(success_response(transaction("DEPOSIT", "PENDING")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = DepositRequest::new("25.00", "KES", "mpesa", "KE").phone_number("+254700000000");
    let tx = client_for(&mock_server)
        .wallet()
        .deposit(&request)
        .await
        .unwrap();

    assert_eq!(tx.id, "tx-100");
    assert_eq!(tx.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn test_withdraw_validation_error() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/wallet/withdraw"))
        .respond_with(error_response(422, "invalid amount", &["amount must be positive"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .wallet()
        .withdraw(&WithdrawRequest::new("-5.00", "KES", "mpesa", "KE"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    match err {
        PasisError::Validation { message, errors, .. } => {
            assert_eq!(message, "invalid amount");
            assert_eq!(errors, vec!["amount must be positive".to_string()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_merchant_profile() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(success_response(json!({
            "data": {"id": "u1", "email": "shop@example.com", "first_name": "Amina"}
        })))
        .mount(&mock_server)
        .await;

    let profile = client_for(&mock_server).merchant().profile().await.unwrap();

    assert_eq!(profile.email.as_deref(), Some("shop@example.com"));
    assert_eq!(profile.full_name().as_deref(), Some("Amina"));
}
