use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolInterface};
use micro_loan::LoanStatus;
use micro_loan_client::{
    abi::IMicroLoan::{self, IMicroLoanCalls},
    wallet::{Provider, RpcError, TransactionReceipt, TransactionRequest, Wallet},
};

/// JSON-RPC "internal error", what nodes return for a reverted estimate.
pub const EXECUTION_REVERTED_CODE: i64 = -32603;

/// Storage layout of one loan inside the simulated contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockLoan {
    pub borrower: Address,
    pub lender: Address,
    pub amount: U256,
    pub interest: U256,
    pub duration: U256,
    pub start_time: U256,
    pub collateral_amount: U256,
    pub collateral_token: Address,
    /// Raw status byte, so tests can store codes the client must reject
    pub status: u8,
}

/// Failures the next calls should produce.
#[derive(Clone, Debug, Default)]
pub struct MockBehaviour {
    pub accounts: Vec<Address>,
    pub connect_error: Option<RpcError>,
    pub open_ids_error: Option<RpcError>,
    pub failing_loan_details: BTreeSet<u64>,
    /// Replaces the contract's own open-id list
    pub open_ids_override: Option<Vec<u64>>,
    pub send_error: Option<RpcError>,
    pub revert_on_mine: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ChainState {
    pub next_loan_id: u64,
    pub loans: BTreeMap<u64, MockLoan>,
    /// Ids with status REQUESTED, in creation order
    pub open_ids: Vec<u64>,
    pub sent_transactions: Vec<TransactionRequest>,
    pub receipts: BTreeMap<B256, TransactionReceipt>,
    pub block_height: u64,
    pub block_time: u64,
    pub reads: u64,
}

/// In-memory chain with the micro-loan contract deployed at `contract`.
/// Every call resolves immediately.
pub struct MockChain {
    pub contract: Address,
    pub state: RefCell<ChainState>,
    pub behaviour: RefCell<MockBehaviour>,
}

impl MockChain {
    pub fn new(contract: Address, accounts: Vec<Address>) -> Self {
        Self {
            contract,
            state: RefCell::new(ChainState {
                next_loan_id: 1,
                block_height: 10_000,
                block_time: 1_647_032_400,
                ..Default::default()
            }),
            behaviour: RefCell::new(MockBehaviour {
                accounts,
                ..Default::default()
            }),
        }
    }

    pub fn behaviour(&self) -> std::cell::RefMut<'_, MockBehaviour> {
        self.behaviour.borrow_mut()
    }

    pub fn loan(&self, loan_id: u64) -> Option<MockLoan> {
        self.state.borrow().loans.get(&loan_id).cloned()
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.borrow().sent_transactions.clone()
    }

    pub fn open_ids(&self) -> Vec<u64> {
        self.state.borrow().open_ids.clone()
    }

    /// Stores a loan directly, as if requested in an earlier block.
    pub fn insert_loan(&self, loan_id: u64, loan: MockLoan) {
        let mut state = self.state.borrow_mut();
        if LoanStatus::try_from(loan.status).map(|s| s.is_open()).unwrap_or(false) {
            state.open_ids.push(loan_id);
        }
        state.next_loan_id = state.next_loan_id.max(loan_id + 1);
        state.loans.insert(loan_id, loan);
    }

    fn execute(&self, tx: &TransactionRequest) -> Result<(), String> {
        let call = IMicroLoanCalls::abi_decode(&tx.data, true).map_err(|e| e.to_string())?;
        let mut state = self.state.borrow_mut();
        match call {
            IMicroLoanCalls::requestLoan(IMicroLoan::requestLoanCall { request }) => {
                if !tx.value.is_zero() {
                    return Err("requestLoan is not payable".to_string());
                }
                if request.amount.is_zero() {
                    return Err("Amount must be greater than zero".to_string());
                }
                let loan_id = state.next_loan_id;
                state.next_loan_id += 1;
                state.loans.insert(
                    loan_id,
                    MockLoan {
                        borrower: tx.from,
                        lender: Address::ZERO,
                        amount: request.amount,
                        interest: request.interest,
                        duration: request.duration,
                        start_time: U256::ZERO,
                        collateral_amount: request.collateralAmount,
                        collateral_token: request.collateralToken,
                        status: LoanStatus::Requested.code(),
                    },
                );
                state.open_ids.push(loan_id);
                Ok(())
            }
            IMicroLoanCalls::fundLoan(IMicroLoan::fundLoanCall { loanId }) => {
                let loan_id =
                    u64::try_from(loanId).map_err(|_| "loan id out of range".to_string())?;
                let now = U256::from(state.block_time);
                let loan = state
                    .loans
                    .get_mut(&loan_id)
                    .ok_or_else(|| "Loan does not exist".to_string())?;
                let current = LoanStatus::try_from(loan.status).map_err(|e| e.to_string())?;
                let next = current
                    .transition(LoanStatus::Funded)
                    .map_err(|e| e.to_string())?;
                if tx.value != loan.amount {
                    return Err("Incorrect funding amount".to_string());
                }
                loan.lender = tx.from;
                loan.start_time = now;
                loan.status = next.code();
                state.open_ids.retain(|id| *id != loan_id);
                Ok(())
            }
            _ => Err("not a transaction entry point".to_string()),
        }
    }
}

impl Provider for MockChain {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        if to != self.contract {
            return Err(RpcError::new(EXECUTION_REVERTED_CODE, "call to non-contract address"));
        }
        self.state.borrow_mut().reads += 1;
        let call = IMicroLoanCalls::abi_decode(&data, true)
            .map_err(|e| RpcError::new(EXECUTION_REVERTED_CODE, e.to_string()))?;
        let behaviour = self.behaviour.borrow();
        let state = self.state.borrow();
        let encoded = match call {
            IMicroLoanCalls::getOpenLoanIds(_) => {
                if let Some(err) = &behaviour.open_ids_error {
                    return Err(err.clone());
                }
                let ids: Vec<U256> = behaviour
                    .open_ids_override
                    .as_ref()
                    .unwrap_or(&state.open_ids)
                    .iter()
                    .map(|id| U256::from(*id))
                    .collect();
                IMicroLoan::getOpenLoanIdsCall::abi_encode_returns(&(ids,))
            }
            IMicroLoanCalls::loans(IMicroLoan::loansCall { loanId }) => {
                let loan_id = u64::try_from(loanId)
                    .map_err(|_| RpcError::new(EXECUTION_REVERTED_CODE, "loan id out of range"))?;
                if behaviour.failing_loan_details.contains(&loan_id) {
                    return Err(RpcError::without_code(format!(
                        "could not decode result data for loan {loan_id}"
                    )));
                }
                // unknown ids read as the zero value, like a solidity mapping
                let loan = state.loans.get(&loan_id).cloned().unwrap_or_default();
                IMicroLoan::loansCall::abi_encode_returns(&(
                    loan.borrower,
                    loan.lender,
                    loan.amount,
                    loan.interest,
                    loan.duration,
                    loan.start_time,
                    loan.collateral_amount,
                    loan.collateral_token,
                    loan.status,
                ))
            }
            _ => {
                return Err(RpcError::new(
                    EXECUTION_REVERTED_CODE,
                    "state-changing call used as a read",
                ))
            }
        };
        Ok(encoded.into())
    }
}

impl Wallet for MockChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        let behaviour = self.behaviour.borrow();
        match &behaviour.connect_error {
            Some(err) => Err(err.clone()),
            None => Ok(behaviour.accounts.clone()),
        }
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, RpcError> {
        if let Some(err) = self.behaviour.borrow().send_error.clone() {
            return Err(err);
        }
        if tx.to != self.contract {
            return Err(RpcError::new(EXECUTION_REVERTED_CODE, "unknown recipient"));
        }
        let revert_on_mine = self.behaviour.borrow().revert_on_mine;
        if !revert_on_mine {
            // gas estimation runs the call first, so contract reverts surface here
            self.execute(&tx).map_err(|reason| {
                RpcError::new(EXECUTION_REVERTED_CODE, format!("execution reverted: {reason}"))
            })?;
        }

        let mut state = self.state.borrow_mut();
        state.sent_transactions.push(tx);
        state.block_height += 1;
        state.block_time += 5;
        let nonce = state.sent_transactions.len() as u64;
        let hash = B256::left_padding_from(&nonce.to_be_bytes());
        let receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: state.block_height,
            success: !revert_on_mine,
        };
        state.receipts.insert(hash, receipt);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, RpcError> {
        self.state
            .borrow()
            .receipts
            .get(&hash)
            .cloned()
            .ok_or_else(|| RpcError::without_code(format!("transaction {hash} not found")))
    }
}
