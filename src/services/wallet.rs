//! Wallet service.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::errors::PasisResult;
use crate::executor::{ApiRequest, RequestExecutor};
use crate::types::{DepositRequest, Wallet, WalletTransaction, WithdrawRequest};

/// Wallet lookup, deposits and withdrawals.
#[derive(Debug, Clone, Copy)]
pub struct WalletService<'a> {
    executor: &'a RequestExecutor,
    cancel: &'a CancellationToken,
}

impl<'a> WalletService<'a> {
    /// Creates a new wallet service.
    pub fn new(executor: &'a RequestExecutor, cancel: &'a CancellationToken) -> Self {
        Self { executor, cancel }
    }

    /// Retrieves the wallet of the authenticated merchant.
    #[instrument(skip(self))]
    pub async fn get(&self) -> PasisResult<Wallet> {
        let request = ApiRequest::get("wallet").operation("wallet.get");

        self.executor
            .execute(request, self.cancel)
            .await
            .map(|response| response.into_data())
            .map_err(|e| e.with_context("failed to get wallet"))
    }

    /// Initiates a deposit into the wallet.
    #[instrument(skip(self, request), fields(currency = %request.currency, provider = %request.provider))]
    pub async fn deposit(&self, request: &DepositRequest) -> PasisResult<WalletTransaction> {
        self.move_funds("wallet/deposit", "wallet.deposit", request)
            .await
            .map_err(|e| e.with_context("failed to deposit"))
    }

    /// Initiates a withdrawal from the wallet.
    #[instrument(skip(self, request), fields(currency = %request.currency, provider = %request.provider))]
    pub async fn withdraw(&self, request: &WithdrawRequest) -> PasisResult<WalletTransaction> {
        self.move_funds("wallet/withdraw", "wallet.withdraw", request)
            .await
            .map_err(|e| e.with_context("failed to withdraw"))
    }

    async fn move_funds(
        &self,
        path: &str,
        operation: &str,
        request: &DepositRequest,
    ) -> PasisResult<WalletTransaction> {
        request.validate()?;

        let request = ApiRequest::post(path).operation(operation).json(request)?;
        self.executor
            .execute(request, self.cancel)
            .await
            .map(|response| response.into_data())
    }
}
