//! Type definitions for the Pasis API.
//!
//! Response envelopes, token exchange payloads, and the wallet, transaction
//! and merchant types returned by the typed endpoints.

pub mod auth;
pub mod common;
pub mod merchant;
pub mod wallet;

pub use auth::{AppAuthRequest, AppAuthResponse};
pub use common::{ApiResponse, ErrorEnvelope, PaginationMeta, SuccessEnvelope};
pub use merchant::MerchantProfile;
pub use wallet::{
    DepositRequest, Fees, ListTransactionsParams, TransactionPage, TransactionStatus,
    TransactionType, Wallet, WalletOperationRequest, WalletTransaction, WithdrawRequest,
};
