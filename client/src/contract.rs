use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use cosmwasm_std::{Timestamp, Uint256};
use micro_loan::{
    units::{abi_uint_to_u64, from_abi_uint, to_abi_uint},
    LoanRequest, LoanStatus, LoanTerms,
};

use crate::{
    abi::IMicroLoan,
    error::ClientError,
    wallet::{PendingTransaction, Provider, Signer, Wallet},
};

/// MicroLoanContract is a wrapper around the contract address that provides
/// the calls the front-end makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MicroLoanContract(pub Address);

impl MicroLoanContract {
    pub fn addr(&self) -> Address {
        self.0
    }

    pub fn request_loan_calldata(terms: &LoanTerms) -> Bytes {
        IMicroLoan::requestLoanCall {
            request: IMicroLoan::LoanRequestParams {
                amount: to_abi_uint(terms.amount),
                interest: to_abi_uint(terms.interest),
                duration: U256::from(terms.duration),
                collateralAmount: to_abi_uint(terms.collateral_amount),
                collateralToken: terms.collateral_token,
            },
        }
        .abi_encode()
        .into()
    }

    pub fn fund_loan_calldata(loan_id: u64) -> Bytes {
        IMicroLoan::fundLoanCall {
            loanId: U256::from(loan_id),
        }
        .abi_encode()
        .into()
    }

    pub async fn open_loan_ids<P: Provider>(&self, provider: &P) -> Result<Vec<u64>, ClientError> {
        let data = IMicroLoan::getOpenLoanIdsCall {}.abi_encode();
        let raw = provider.call(self.0, data.into()).await?;
        let ids = IMicroLoan::getOpenLoanIdsCall::abi_decode_returns(&raw, true)?._0;
        log::debug!("contract {} reports {} open loans", self.0, ids.len());
        ids.into_iter()
            .map(|id| abi_uint_to_u64(id, "loan id").map_err(ClientError::from))
            .collect()
    }

    pub async fn loan<P: Provider>(&self, provider: &P, loan_id: u64) -> Result<LoanRequest, ClientError> {
        let data = IMicroLoan::loansCall {
            loanId: U256::from(loan_id),
        }
        .abi_encode();
        let raw = provider.call(self.0, data.into()).await?;
        let loan = IMicroLoan::loansCall::abi_decode_returns(&raw, true)?;
        decode_loan(loan_id, loan)
    }

    pub async fn request_loan<'a, W: Wallet>(
        &self,
        signer: &Signer<'a, W>,
        terms: &LoanTerms,
    ) -> Result<PendingTransaction<'a, W>, ClientError> {
        log::debug!(
            "requestLoan amount={} interest={} duration={}s collateral={}",
            terms.amount,
            terms.interest,
            terms.duration,
            terms.collateral_amount
        );
        signer
            .send_transaction(self.0, Self::request_loan_calldata(terms), U256::ZERO)
            .await
    }

    /// Funds `loan_id`, attaching exactly `value` base units.
    pub async fn fund_loan<'a, W: Wallet>(
        &self,
        signer: &Signer<'a, W>,
        loan_id: u64,
        value: Uint256,
    ) -> Result<PendingTransaction<'a, W>, ClientError> {
        log::debug!("fundLoan id={loan_id} value={value}");
        signer
            .send_transaction(self.0, Self::fund_loan_calldata(loan_id), to_abi_uint(value))
            .await
    }
}

fn decode_loan(id: u64, raw: IMicroLoan::loansReturn) -> Result<LoanRequest, ClientError> {
    let start_time = match abi_uint_to_u64(raw.startTime, "start time")? {
        0 => None,
        seconds => Some(Timestamp::from_seconds(seconds)),
    };
    Ok(LoanRequest {
        id,
        borrower: raw.borrower,
        lender: (raw.lender != Address::ZERO).then_some(raw.lender),
        amount: from_abi_uint(raw.amount),
        interest: from_abi_uint(raw.interest),
        duration: abi_uint_to_u64(raw.duration, "duration")?,
        start_time,
        collateral_amount: from_abi_uint(raw.collateralAmount),
        collateral_token: raw.collateralToken,
        status: LoanStatus::try_from(raw.status)?,
    })
}
