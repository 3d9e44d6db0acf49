use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::Address;
use cosmwasm_std::Timestamp;
use micro_loan::{LoanForm, LoanStatus, LocalLoanRecord, RepaymentPreview};

use crate::{
    contract::MicroLoanContract,
    error::ClientError,
    status,
    wallet::{connection_status, Signer, TransactionReceipt, Wallet, WalletContext},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorrowingState {
    WalletDisconnected,
    WalletConnecting,
    WalletConnected,
    Submitting,
    Confirmed,
    Failed,
}

/// Borrower screen: collects loan terms, previews the repayment and submits
/// the request to the contract.
pub struct BorrowingFlow<'a, W> {
    wallet: &'a WalletContext<W>,
    contract: MicroLoanContract,
    form: LoanForm,
    state: BorrowingState,
    status: String,
    history: Vec<LocalLoanRecord>,
}

impl<'a, W: Wallet> BorrowingFlow<'a, W> {
    pub fn new(wallet: &'a WalletContext<W>, contract: MicroLoanContract) -> Self {
        let state = if wallet.is_connected() {
            BorrowingState::WalletConnected
        } else {
            BorrowingState::WalletDisconnected
        };
        Self {
            wallet,
            contract,
            form: LoanForm::default(),
            state,
            status: String::new(),
            history: vec![],
        }
    }

    pub fn state(&self) -> BorrowingState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn form(&self) -> &LoanForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoanForm {
        &mut self.form
    }

    /// Requests submitted this session, newest first.
    pub fn history(&self) -> &[LocalLoanRecord] {
        &self.history
    }

    pub fn preview(&self) -> Option<RepaymentPreview> {
        self.form.preview()
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            BorrowingState::WalletConnecting | BorrowingState::Submitting
        )
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.wallet.is_connected() && !self.is_busy() && self.form.is_complete()
    }

    pub async fn connect(&mut self) -> Result<Address, ClientError> {
        self.state = BorrowingState::WalletConnecting;
        let result = self.wallet.connect().await;
        self.set_status(connection_status(&result));
        // a failed retry keeps an account connected earlier
        self.state = if self.wallet.is_connected() {
            BorrowingState::WalletConnected
        } else {
            BorrowingState::WalletDisconnected
        };
        result
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let wallet = self.wallet;
        let Some(signer) = wallet.signer() else {
            self.set_status(status::CONNECT_FIRST);
            return Err(ClientError::NotConnected {});
        };
        if !self.form.is_complete() {
            return Err(ClientError::IncompleteTerms {});
        }

        self.state = BorrowingState::Submitting;
        self.set_status(status::SUBMITTING_REQUEST);

        match self.send_request(&signer).await {
            Ok(receipt) => {
                log::info!(
                    "loan request confirmed in transaction {}",
                    receipt.transaction_hash
                );
                self.record_submission();
                self.form.reset();
                self.state = BorrowingState::Confirmed;
                self.set_status(status::REQUEST_CONFIRMED);
                Ok(())
            }
            Err(err) => {
                log::error!("loan request failed: {err}");
                self.state = BorrowingState::Failed;
                self.set_status(format!("{}{err}", status::REQUEST_FAILED_PREFIX));
                Err(err)
            }
        }
    }

    async fn send_request(&mut self, signer: &Signer<'a, W>) -> Result<TransactionReceipt, ClientError> {
        let terms = self.form.to_terms()?;
        let pending = self.contract.request_loan(signer, &terms).await?;
        self.set_status(status::TX_SUBMITTED);
        pending.wait().await
    }

    fn record_submission(&mut self) {
        let now = now();
        let millis = now.nanos() / 1_000_000;
        // ids stay unique when two requests land in the same millisecond
        let id = match self.history.first() {
            Some(last) if last.id >= millis => last.id + 1,
            _ => millis,
        };
        self.history.insert(
            0,
            LocalLoanRecord {
                id,
                amount: self.form.loan_amount().to_string(),
                collateral: self.form.collateral_amount().to_string(),
                duration: self.form.duration().to_string(),
                interest_rate: self.form.interest_rate().to_string(),
                total_repayment: self.form.preview().map(|p| p.total_display()),
                status: LoanStatus::Requested,
                timestamp: now,
            },
        );
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        log::info!("{}", self.status);
    }
}

fn now() -> Timestamp {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Timestamp::from_nanos(elapsed.as_nanos() as u64)
}
