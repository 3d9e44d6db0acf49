pub mod abi;
pub mod borrowing;
pub mod config;
pub mod contract;
pub mod error;
pub mod lending;
pub mod status;
pub mod wallet;

pub use borrowing::{BorrowingFlow, BorrowingState};
pub use config::ClientConfig;
pub use contract::MicroLoanContract;
pub use error::ClientError;
pub use lending::{fetch_open_loans, FetchTicket, LendingFlow};
pub use wallet::{Provider, RpcError, Wallet, WalletContext};
