use std::fmt;

use alloy_primitives::Address;
use cosmwasm_std::{Decimal256, Timestamp, Uint256};
use serde::{Deserialize, Serialize};

use crate::{
    error::LoanError,
    repayment::{RepaymentPreview, DAYS_PER_YEAR},
    units::{format_coin, seconds_to_days},
};

/// Lifecycle of a loan as stored by the contract.
/// The discriminants are the contract's `uint8` status codes, so the variant
/// order must never change.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum LoanStatus {
    Requested = 0,
    Funded = 1,
    Repaid = 2,
    Defaulted = 3,
    Cancelled = 4,
}

impl LoanStatus {
    /// Every status, indexed by its on-chain code.
    pub const ALL: [LoanStatus; 5] = [
        LoanStatus::Requested,
        LoanStatus::Funded,
        LoanStatus::Repaid,
        LoanStatus::Defaulted,
        LoanStatus::Cancelled,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Requested => "REQUESTED",
            LoanStatus::Funded => "FUNDED",
            LoanStatus::Repaid => "REPAID",
            LoanStatus::Defaulted => "DEFAULTED",
            LoanStatus::Cancelled => "CANCELLED",
        }
    }

    /// An open loan is waiting for a lender.
    pub fn is_open(&self) -> bool {
        *self == LoanStatus::Requested
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoanStatus::Repaid | LoanStatus::Defaulted | LoanStatus::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Requested, LoanStatus::Funded)
                | (LoanStatus::Requested, LoanStatus::Cancelled)
                | (LoanStatus::Funded, LoanStatus::Repaid)
                | (LoanStatus::Funded, LoanStatus::Defaulted)
        )
    }

    pub fn transition(self, next: LoanStatus) -> Result<LoanStatus, LoanError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(LoanError::CantChangeLoanState {
                from: self,
                to: next,
            })
        }
    }
}

impl TryFrom<u8> for LoanStatus {
    type Error = LoanError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        LoanStatus::ALL
            .get(code as usize)
            .copied()
            .ok_or(LoanError::UnknownStatus(code))
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tuple handed to `requestLoan`, everything in on-chain units.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoanTerms {
    /// Principal in base units
    pub amount: Uint256,
    /// Whole annual percent
    pub interest: Uint256,
    /// Seconds
    pub duration: u64,
    /// Collateral in base units
    pub collateral_amount: Uint256,
    /// Zero address until token collateral is supported
    pub collateral_token: Address,
}

/// Snapshot of one loan as returned by the contract's `loans(id)` getter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoanRequest {
    pub id: u64,
    pub borrower: Address,
    pub lender: Option<Address>,
    pub amount: Uint256,
    pub interest: Uint256,
    pub duration: u64,
    pub start_time: Option<Timestamp>,
    pub collateral_amount: Uint256,
    pub collateral_token: Address,
    pub status: LoanStatus,
}

impl LoanRequest {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn loan_amount(&self) -> String {
        format_coin(self.amount)
    }

    pub fn collateral(&self) -> String {
        format_coin(self.collateral_amount)
    }

    pub fn duration_days(&self) -> Decimal256 {
        seconds_to_days(self.duration)
    }

    /// Start time in unix seconds, or "N/A" while the loan is unfunded.
    pub fn start_time_display(&self) -> String {
        match self.start_time {
            Some(time) => time.seconds().to_string(),
            None => "N/A".to_string(),
        }
    }

    /// The preview a lender sees before funding, computed from on-chain fields.
    /// `None` when the borrower's figures overflow the calculator.
    pub fn repayment_preview(&self) -> Option<RepaymentPreview> {
        let rate = Decimal256::checked_from_ratio(self.interest, 1u8).ok()?;
        RepaymentPreview::compute(Decimal256::new(self.amount), rate, self.duration_days()).ok()
    }

    /// Interest earned by the lender over the whole duration, in base units.
    pub fn interest_due(&self) -> Option<Uint256> {
        let scaled = self
            .amount
            .checked_mul(self.interest)
            .ok()?
            .checked_mul(Uint256::from(self.duration))
            .ok()?;
        scaled
            .checked_div(Uint256::from(DAYS_PER_YEAR * 100 * crate::units::SECONDS_PER_DAY))
            .ok()
    }
}

/// A loan request the current session submitted, kept for the "my requests"
/// view only. It is never matched against the chain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LocalLoanRecord {
    pub id: u64,
    pub amount: String,
    pub collateral: String,
    pub duration: String,
    pub interest_rate: String,
    pub total_repayment: Option<String>,
    pub status: LoanStatus,
    pub timestamp: Timestamp,
}
