//! User-facing status lines. Error variants append the error's message.

pub const WALLET_CONNECTED: &str = "Wallet connected successfully";
pub const INSTALL_WALLET: &str = "Please install MetaMask to continue";
pub const APPROVE_CONNECTION: &str = "Please approve the MetaMask connection";
pub const CONNECT_FAILED_PREFIX: &str = "Failed to connect wallet: ";

pub const TX_SUBMITTED: &str = "Transaction submitted. Waiting for confirmation...";

// borrowing
pub const CONNECT_FIRST: &str = "Please connect MetaMask!";
pub const SUBMITTING_REQUEST: &str = "Submitting loan request on-chain...";
pub const REQUEST_CONFIRMED: &str = "Loan requested successfully on-chain!";
pub const REQUEST_FAILED_PREFIX: &str = "Error requesting loan: ";

// lending
pub const FETCH_FAILED_PREFIX: &str = "Error fetching loans: ";
pub const CONNECT_WALLET_FIRST: &str = "Please connect your wallet first";
pub const PROCESSING_FUNDING: &str = "Processing loan approval...";
pub const FUNDING_CONFIRMED: &str = "Loan approved and funded!";
pub const FUNDING_REJECTED: &str = "Transaction rejected by user";
pub const FUNDING_FAILED_PREFIX: &str = "Error approving loan: ";
