//! Integration tests for transaction listing and lookup

use super::*;
use pasis_client::{ErrorKind, ListTransactionsParams, TransactionType};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::Mock;

fn transaction(id: &str) -> serde_json::Value {
    json!({"id": id, "amount": "1.00", "currency": "KES", "type": "DEPOSIT", "status": "COMPLETED"})
}

#[tokio::test]
async fn test_list_transactions_with_pagination() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/transactions"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "2"))
        .respond_with(success_response(json!({
            "data": [transaction("t3"), transaction("t4")],
            "pagination": {"page": 2, "per_page": 2, "total": 4, "total_pages": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = client_for(&mock_server)
        .transactions()
        .list(ListTransactionsParams::new(2, 2))
        .await
        .unwrap();

    assert_eq!(page.transactions.len(), 2);
    assert_eq!(page.transactions[0].id, "t3");
    assert_eq!(page.transactions[0].transaction_type, TransactionType::Deposit);
    assert_eq!(page.pagination.unwrap().total, 4);
    assert!(!page.has_next_page());
}

#[tokio::test]
async fn test_list_transactions_without_params_sends_no_query() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/transactions"))
        .respond_with(success_response(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let page = client_for(&mock_server)
        .transactions()
        .list(ListTransactionsParams::default())
        .await
        .unwrap();
    assert!(page.transactions.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    let list_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/wallet/transactions")
        .unwrap();
    assert_eq!(list_request.url.query(), None);
}

#[tokio::test]
async fn test_get_transaction() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/transactions/t1"))
        .respond_with(success_response(json!({"data": transaction("t1")})))
        .mount(&mock_server)
        .await;

    let tx = client_for(&mock_server)
        .transactions()
        .get("t1")
        .await
        .unwrap();

    assert_eq!(tx.id, "t1");
}

#[tokio::test]
async fn test_get_missing_transaction() {
    let mock_server = setup_mock_server().await;
    mount_auth(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/wallet/transactions/nope"))
        .respond_with(error_response(404, "transaction not found", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .transactions()
        .get("nope")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status_code(), Some(404));
}
