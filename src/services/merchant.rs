//! Merchant service.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::errors::PasisResult;
use crate::executor::{ApiRequest, RequestExecutor};
use crate::types::MerchantProfile;

/// Merchant profile lookup.
#[derive(Debug, Clone, Copy)]
pub struct MerchantService<'a> {
    executor: &'a RequestExecutor,
    cancel: &'a CancellationToken,
}

impl<'a> MerchantService<'a> {
    /// Creates a new merchant service.
    pub fn new(executor: &'a RequestExecutor, cancel: &'a CancellationToken) -> Self {
        Self { executor, cancel }
    }

    /// Retrieves the profile of the authenticated merchant.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> PasisResult<MerchantProfile> {
        let request = ApiRequest::get("user/me").operation("merchant.profile");

        self.executor
            .execute(request, self.cancel)
            .await
            .map(|response| response.into_data())
            .map_err(|e| e.with_context("failed to get merchant profile"))
    }
}
