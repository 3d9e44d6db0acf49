use alloy_primitives::Address;
use futures::future::try_join_all;
use micro_loan::{LoanRequest, RepaymentPreview};

use crate::{
    contract::MicroLoanContract,
    error::ClientError,
    status,
    wallet::{connection_status, Provider, Signer, TransactionReceipt, Wallet, WalletContext},
};

/// Loads every open loan request: the id list first, then all details
/// concurrently. One failing detail fails the whole batch. Loans keep the
/// order the contract returned their ids in.
pub async fn fetch_open_loans<P: Provider>(
    contract: &MicroLoanContract,
    provider: &P,
) -> Result<Vec<LoanRequest>, ClientError> {
    let ids = contract.open_loan_ids(provider).await?;
    try_join_all(ids.into_iter().map(|id| contract.loan(provider, id))).await
}

/// Identifies one listing fetch. Only the most recently issued ticket may
/// update the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Lender screen: lists open loan requests and funds the selected one.
pub struct LendingFlow<'a, W> {
    wallet: &'a WalletContext<W>,
    contract: MicroLoanContract,
    open_loans: Vec<LoanRequest>,
    selected: Option<LoanRequest>,
    status: String,
    processing: bool,
    connecting: bool,
    generation: u64,
}

impl<'a, W: Wallet> LendingFlow<'a, W> {
    pub fn new(wallet: &'a WalletContext<W>, contract: MicroLoanContract) -> Self {
        Self {
            wallet,
            contract,
            open_loans: vec![],
            selected: None,
            status: String::new(),
            processing: false,
            connecting: false,
            generation: 0,
        }
    }

    pub fn open_loans(&self) -> &[LoanRequest] {
        &self.open_loans
    }

    /// The loan shown in the confirmation view, if any.
    pub fn selected(&self) -> Option<&LoanRequest> {
        self.selected.as_ref()
    }

    pub fn selected_preview(&self) -> Option<RepaymentPreview> {
        self.selected.as_ref()?.repayment_preview()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Whether the fund action is enabled.
    pub fn can_fund(&self) -> bool {
        self.selected.is_some() && self.wallet.is_connected() && !self.processing
    }

    pub async fn connect(&mut self) -> Result<Address, ClientError> {
        self.connecting = true;
        let result = self.wallet.connect().await;
        self.set_status(connection_status(&result));
        self.connecting = false;
        result
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Applies a fetch result. Returns `Ok(false)` when a newer fetch has been
    /// issued since `ticket`, in which case the result is dropped.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<LoanRequest>, ClientError>,
    ) -> Result<bool, ClientError> {
        if ticket.0 != self.generation {
            log::debug!(
                "dropping stale loan listing (fetch {} < {})",
                ticket.0,
                self.generation
            );
            return Ok(false);
        }
        match result {
            Ok(loans) => {
                log::info!("loaded {} open loan requests", loans.len());
                self.open_loans = loans;
                Ok(true)
            }
            Err(err) => {
                log::error!("Error fetching open loans: {err}");
                self.set_status(format!("{}{err}", status::FETCH_FAILED_PREFIX));
                Err(err)
            }
        }
    }

    /// Re-reads the open loans. Does nothing until a provider is available.
    pub async fn refresh(&mut self) -> Result<bool, ClientError> {
        let wallet = self.wallet;
        let Some(provider) = wallet.provider() else {
            return Ok(false);
        };
        let ticket = self.begin_fetch();
        let result = fetch_open_loans(&self.contract, provider).await;
        self.apply_fetch(ticket, result)
    }

    /// Opens the confirmation view for `loan_id`.
    pub fn select(&mut self, loan_id: u64) -> bool {
        self.selected = self
            .open_loans
            .iter()
            .find(|loan| loan.id == loan_id)
            .cloned();
        self.selected.is_some()
    }

    pub fn cancel(&mut self) {
        if !self.processing {
            self.selected = None;
        }
    }

    /// Funds the selected loan with exactly its on-chain principal, then
    /// reloads the listing and closes the confirmation view.
    pub async fn fund_selected(&mut self) -> Result<(), ClientError> {
        let loan = self.selected.clone().ok_or(ClientError::NoLoanSelected {})?;
        let wallet = self.wallet;
        let Some(signer) = wallet.signer() else {
            self.set_status(status::CONNECT_WALLET_FIRST);
            return Err(ClientError::NotConnected {});
        };

        self.processing = true;
        self.set_status(status::PROCESSING_FUNDING);
        let result = self.send_funding(&signer, &loan).await;

        let outcome = match result {
            Ok(receipt) => {
                log::info!(
                    "loan {} funded in transaction {}",
                    loan.id,
                    receipt.transaction_hash
                );
                self.set_status(status::FUNDING_CONFIRMED);
                if let Err(err) = self.refresh().await {
                    log::warn!("loan {} funded but the listing could not be reloaded: {err}", loan.id);
                }
                self.selected = None;
                Ok(())
            }
            Err(err) => {
                if err.is_user_rejection() {
                    self.set_status(status::FUNDING_REJECTED);
                } else {
                    self.set_status(format!("{}{err}", status::FUNDING_FAILED_PREFIX));
                }
                Err(err)
            }
        };
        self.processing = false;
        outcome
    }

    async fn send_funding(
        &mut self,
        signer: &Signer<'a, W>,
        loan: &LoanRequest,
    ) -> Result<TransactionReceipt, ClientError> {
        let pending = self.contract.fund_loan(signer, loan.id, loan.amount).await?;
        self.set_status(status::TX_SUBMITTED);
        pending.wait().await
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        log::info!("{}", self.status);
    }
}
