use std::{cell::Cell, fmt};

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::{error::ClientError, status};

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Error object as thrown by a browser wallet or its RPC node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcError {
    pub code: Option<i64>,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn without_code(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    /// False when the transaction was mined but reverted
    pub success: bool,
}

/// Read-only chain access.
#[allow(async_fn_in_trait)]
pub trait Provider {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError>;
}

/// A browser wallet: read access plus account access and transaction signing.
#[allow(async_fn_in_trait)]
pub trait Wallet: Provider {
    /// Prompts the user to expose their accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, RpcError>;

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, RpcError>;
}

/// Session-wide wallet state shared by every flow. The only thing that ever
/// changes is the connected account, and only through [`WalletContext::connect`].
pub struct WalletContext<W> {
    wallet: Option<W>,
    account: Cell<Option<Address>>,
}

impl<W: Wallet> WalletContext<W> {
    pub fn new(wallet: W) -> Self {
        Self {
            wallet: Some(wallet),
            account: Cell::new(None),
        }
    }

    /// No wallet extension installed.
    pub fn unavailable() -> Self {
        Self {
            wallet: None,
            account: Cell::new(None),
        }
    }

    /// A session that was already connected before the flows were built.
    pub fn connected(wallet: W, account: Address) -> Self {
        Self {
            wallet: Some(wallet),
            account: Cell::new(Some(account)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.account.get()
    }

    pub fn is_connected(&self) -> bool {
        self.account.get().is_some()
    }

    pub fn provider(&self) -> Option<&W> {
        self.wallet.as_ref()
    }

    pub fn signer(&self) -> Option<Signer<'_, W>> {
        let wallet = self.wallet.as_ref()?;
        let account = self.account.get()?;
        Some(Signer { wallet, account })
    }

    pub async fn connect(&self) -> Result<Address, ClientError> {
        let wallet = self.wallet.as_ref().ok_or(ClientError::WalletUnavailable {})?;
        let accounts = wallet.request_accounts().await?;
        let account = accounts.first().copied().ok_or(ClientError::NoAccounts {})?;
        self.account.set(Some(account));
        log::info!("wallet connected: {account}");
        Ok(account)
    }
}

/// Status line shown after a connect attempt.
pub fn connection_status(result: &Result<Address, ClientError>) -> String {
    match result {
        Ok(_) => status::WALLET_CONNECTED.to_string(),
        Err(ClientError::WalletUnavailable {}) => status::INSTALL_WALLET.to_string(),
        Err(err) if err.is_user_rejection() => status::APPROVE_CONNECTION.to_string(),
        Err(err) => format!("{}{err}", status::CONNECT_FAILED_PREFIX),
    }
}

/// Transaction-signing handle for the connected account.
pub struct Signer<'a, W> {
    wallet: &'a W,
    account: Address,
}

impl<'a, W: Wallet> Signer<'a, W> {
    pub fn address(&self) -> Address {
        self.account
    }

    pub async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<PendingTransaction<'a, W>, ClientError> {
        let request = TransactionRequest {
            from: self.account,
            to,
            data,
            value,
        };
        log::debug!("sending transaction from {} to {to} with value {value}", self.account);
        let hash = self.wallet.send_transaction(request).await?;
        Ok(PendingTransaction {
            wallet: self.wallet,
            hash,
        })
    }
}

/// A submitted transaction that has not been confirmed yet.
pub struct PendingTransaction<'a, W> {
    wallet: &'a W,
    hash: B256,
}

impl<'a, W: Wallet> PendingTransaction<'a, W> {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    pub async fn wait(self) -> Result<TransactionReceipt, ClientError> {
        let receipt = self.wallet.wait_for_receipt(self.hash).await?;
        if !receipt.success {
            return Err(ClientError::TransactionFailed(format!(
                "transaction {} reverted",
                self.hash
            )));
        }
        log::debug!("transaction {} confirmed in block {}", self.hash, receipt.block_number);
        Ok(receipt)
    }
}
