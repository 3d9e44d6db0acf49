use alloy_primitives::{Address, U256};
use micro_loan::{units::parse_coin, units::to_abi_uint, LoanStatus};

use crate::common_setup::{
    app::{MockChain, MockLoan},
    setup_accounts_and_block::BORROWER_ADDR,
};

/// Whole-coin string to ABI base units.
pub fn coin(amount: &str) -> U256 {
    to_abi_uint(parse_coin(amount).unwrap())
}

pub fn open_loan(amount: &str, interest: u64, days: u64, collateral: &str) -> MockLoan {
    MockLoan {
        borrower: BORROWER_ADDR,
        lender: Address::ZERO,
        amount: coin(amount),
        interest: U256::from(interest),
        duration: U256::from(days * 86_400),
        start_time: U256::ZERO,
        collateral_amount: coin(collateral),
        collateral_token: Address::ZERO,
        status: LoanStatus::Requested.code(),
    }
}

/// Seeds the standard listing used by the lending tests: loans 1, 2 and 3.
pub fn seed_open_loans(chain: &MockChain) {
    chain.insert_loan(1, open_loan("1", 5, 30, "2"));
    chain.insert_loan(2, open_loan("2", 10, 73, "0.5"));
    chain.insert_loan(3, open_loan("0.25", 12, 365, "1"));
}
