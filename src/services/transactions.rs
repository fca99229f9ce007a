//! Transactions service.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::errors::{PasisError, PasisResult};
use crate::executor::{ApiRequest, RequestExecutor};
use crate::types::{ListTransactionsParams, TransactionPage, WalletTransaction};

/// Transaction listing and lookup.
#[derive(Debug, Clone, Copy)]
pub struct TransactionsService<'a> {
    executor: &'a RequestExecutor,
    cancel: &'a CancellationToken,
}

impl<'a> TransactionsService<'a> {
    /// Creates a new transactions service.
    pub fn new(executor: &'a RequestExecutor, cancel: &'a CancellationToken) -> Self {
        Self { executor, cancel }
    }

    /// Lists one page of wallet transactions.
    ///
    /// Zero `page` or `per_page` values are left to the server's defaults.
    #[instrument(skip(self))]
    pub async fn list(&self, params: ListTransactionsParams) -> PasisResult<TransactionPage> {
        let mut request = ApiRequest::get("wallet/transactions").operation("transactions.list");
        if params.page > 0 {
            request = request.query("page", params.page);
        }
        if params.per_page > 0 {
            request = request.query("per_page", params.per_page);
        }

        let response = self
            .executor
            .execute::<Vec<WalletTransaction>>(request, self.cancel)
            .await
            .map_err(|e| e.with_context("failed to list transactions"))?;

        Ok(TransactionPage {
            transactions: response.data,
            pagination: response.pagination,
        })
    }

    /// Retrieves one transaction by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> PasisResult<WalletTransaction> {
        if id.is_empty() {
            return Err(PasisError::validation("transaction ID cannot be empty"));
        }

        let request = ApiRequest::get("wallet/transactions")
            .segment(id)
            .operation("transactions.get");

        self.executor
            .execute(request, self.cancel)
            .await
            .map(|response| response.into_data())
            .map_err(|e| e.with_context("failed to get transaction"))
    }
}
