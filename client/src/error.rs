use micro_loan::LoanError;
use thiserror::Error;

use crate::wallet::{RpcError, USER_REJECTED_CODE};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Loan(#[from] LoanError),

    #[error("{0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("No wallet extension detected")]
    WalletUnavailable {},

    #[error("{0}")]
    UserRejected(String),

    #[error("{0}")]
    TransactionFailed(String),

    #[error("No accounts found")]
    NoAccounts {},

    #[error("Wallet is not connected")]
    NotConnected {},

    #[error("Please fill in every loan term before submitting")]
    IncompleteTerms {},

    #[error("No loan request is selected")]
    NoLoanSelected {},

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ClientError::UserRejected(_))
    }
}

/// Wallet failures only carry a code and a message. The standard rejection
/// code becomes `UserRejected`, anything else is passed through verbatim.
impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err.code {
            Some(USER_REJECTED_CODE) => ClientError::UserRejected(err.message),
            _ => ClientError::TransactionFailed(err.message),
        }
    }
}
