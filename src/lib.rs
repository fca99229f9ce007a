//! Pasis Payment Platform Client Library
//!
//! A production-ready Rust client for the Pasis payment platform API. Gives
//! merchants typed operations for wallet lookup, deposits, withdrawals,
//! transaction listing and profile retrieval, on top of an engine that keeps an
//! access/refresh token pair valid across concurrent callers and turns each
//! operation into an authenticated, retried HTTP exchange.
//!
//! # Features
//!
//! - **Credential lifecycle**: application authentication, proactive refresh
//!   ahead of expiry, fallback to re-authentication, pluggable token store
//! - **Resilience**: exponential backoff retries for transport failures and 5xx
//!   responses, never for 4xx
//! - **Cancellation**: every call honours a `CancellationToken`, including
//!   during backoff
//! - **Typed errors**: one error value per failure, with a kind, status code
//!   and server sub-errors
//! - **Observability**: `tracing` spans and events, redaction, metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pasis_client::{ListTransactionsParams, PasisClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PasisClient::from_env()?;
//!
//!     let page = client
//!         .transactions()
//!         .list(ListTransactionsParams::new(1, 20))
//!         .await?;
//!     for tx in &page.transactions {
//!         println!("{} {} {}", tx.id, tx.amount, tx.currency);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use pasis_client::{DepositRequest, ErrorKind, PasisClient};
//!
//! # async fn run(client: PasisClient) {
//! let request = DepositRequest::new("-1", "KES", "mpesa", "KE");
//! match client.wallet().deposit(&request).await {
//!     Ok(tx) => println!("created {}", tx.id),
//!     Err(err) if err.kind() == ErrorKind::Validation => {
//!         for detail in err.sub_errors() {
//!             eprintln!("invalid: {}", detail);
//!         }
//!     }
//!     Err(err) => eprintln!("deposit failed: {}", err),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{Credential, CredentialManager, InMemoryTokenStore, TokenStore};
pub use client::{PasisClient, PasisClientBuilder};
pub use config::PasisConfig;
pub use errors::{ApiError, ErrorKind, PasisError, PasisResult};
pub use executor::{ApiRequest, RequestExecutor};
pub use resilience::RetryConfig;
pub use tokio_util::sync::CancellationToken;

// Type re-exports
pub use types::{
    ApiResponse, DepositRequest, Fees, ListTransactionsParams, MerchantProfile, PaginationMeta,
    TransactionPage, TransactionStatus, TransactionType, Wallet, WalletTransaction,
    WithdrawRequest,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
