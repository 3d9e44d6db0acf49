use thiserror::Error;

use crate::state::LoanStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("invalid amount \"{input}\": {reason}")]
    Parse { input: String, reason: String },

    #[error("Unknown loan status code: {0}")]
    UnknownStatus(u8),

    #[error("Arithmetic overflow")]
    Overflow {},

    #[error("The {field} must be greater than zero")]
    InvalidAmount { field: &'static str },

    #[error("The {field} value does not fit in {bits} bits")]
    ValueOutOfRange { field: &'static str, bits: u32 },

    #[error("Can't change the state of the loan from {from} to {to}")]
    CantChangeLoanState { from: LoanStatus, to: LoanStatus },
}

impl LoanError {
    pub fn parse(input: &str, reason: impl ToString) -> Self {
        LoanError::Parse {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
