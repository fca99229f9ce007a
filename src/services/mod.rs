//! Typed endpoints for the Pasis API.
//!
//! Each service is a thin mapping of one resource's paths and payloads onto
//! the [`RequestExecutor`](crate::executor::RequestExecutor). Services borrow
//! the client's executor and cancellation token and are cheap to create.

mod merchant;
mod transactions;
mod wallet;

pub use merchant::MerchantService;
pub use transactions::TransactionsService;
pub use wallet::WalletService;
