//! Wallet and transaction types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::PaginationMeta;
use crate::errors::{PasisError, PasisResult};

/// Wallet details for the authenticated merchant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Wallet {
    /// Wallet ID.
    pub id: String,
    /// Owning user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Balance as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// Currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request to move funds into or out of the wallet.
///
/// Amounts are decimal strings to preserve precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletOperationRequest {
    /// Amount as a decimal string.
    pub amount: String,
    /// Currency code.
    pub currency: String,
    /// Payment provider.
    pub provider: String,
    /// Region code.
    pub region: String,
    /// Phone number for mobile-money providers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Caller metadata echoed on the transaction.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// Deposit request.
pub type DepositRequest = WalletOperationRequest;

/// Withdrawal request.
pub type WithdrawRequest = WalletOperationRequest;

impl WalletOperationRequest {
    /// Creates a request with the required fields.
    pub fn new(
        amount: impl Into<String>,
        currency: impl Into<String>,
        provider: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
            provider: provider.into(),
            region: region.into(),
            phone_number: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the phone number.
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Adds a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Checks that every required field is present.
    pub fn validate(&self) -> PasisResult<()> {
        let missing: Vec<String> = [
            ("amount", &self.amount),
            ("currency", &self.currency),
            ("provider", &self.provider),
            ("region", &self.region),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| format!("{} is required", field))
        .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(PasisError::Validation {
            message: "invalid wallet request".to_string(),
            errors: missing,
            source: None,
        })
    }
}

/// Fee breakdown for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fees {
    /// Provider fee.
    pub provider: String,
    /// Platform fee.
    pub system: String,
    /// Total fee.
    pub total: String,
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Awaiting provider confirmation.
    Pending,
    /// Settled.
    Completed,
    /// Rejected or errored.
    Failed,
    /// Cancelled before settlement.
    Cancelled,
    /// Any status this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Transaction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Funds moved into the wallet.
    Deposit,
    /// Funds moved out of the wallet.
    Withdrawal,
    /// Wallet-to-wallet transfer.
    Transfer,
    /// Fee charge.
    Fee,
    /// Any type this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A wallet transaction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WalletTransaction {
    /// Transaction ID.
    pub id: String,
    /// Wallet ID.
    #[serde(default)]
    pub wallet_id: String,
    /// Amount as a decimal string.
    #[serde(default)]
    pub amount: String,
    /// Currency code.
    #[serde(default)]
    pub currency: String,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Transaction status.
    pub status: TransactionStatus,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payment provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Provider-side reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
    /// Fee breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<Fees>,
    /// Arbitrary metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: String,
    /// Update timestamp as sent by the server.
    #[serde(default)]
    pub updated_at: String,
}

/// Query parameters for listing transactions. Zero values are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTransactionsParams {
    /// Page to fetch (1-based).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl ListTransactionsParams {
    /// Creates parameters for a page.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// One page of transactions with its pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    /// Transactions on this page.
    pub transactions: Vec<WalletTransaction>,
    /// Pagination metadata, when the server supplied it.
    pub pagination: Option<PaginationMeta>,
}

impl TransactionPage {
    /// Returns true if the server reports further pages.
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .map_or(false, |meta| meta.page < meta.total_pages)
    }
}
