use alloy_primitives::Address;
use micro_loan_client::{MicroLoanContract, WalletContext};

use crate::common_setup::app::MockChain;

pub const CONTRACT_ADDR: Address = Address::repeat_byte(0xc7);
pub const BORROWER_ADDR: Address = Address::repeat_byte(0xb0);
pub const LENDER_ADDR: Address = Address::repeat_byte(0x1e);

pub fn contract() -> MicroLoanContract {
    MicroLoanContract(CONTRACT_ADDR)
}

/// Chain with the loan contract deployed and a wallet exposing `account`.
pub fn setup_chain(account: Address) -> MockChain {
    MockChain::new(CONTRACT_ADDR, vec![account])
}

/// Wallet installed but not connected yet.
pub fn setup_wallet(account: Address) -> WalletContext<MockChain> {
    WalletContext::new(setup_chain(account))
}

pub fn connected_wallet(account: Address) -> WalletContext<MockChain> {
    WalletContext::connected(setup_chain(account), account)
}

pub fn chain(wallet: &WalletContext<MockChain>) -> &MockChain {
    wallet.provider().expect("wallet installed")
}
