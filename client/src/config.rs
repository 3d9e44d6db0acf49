use std::str::FromStr;

use alloy_primitives::Address;

use crate::{contract::MicroLoanContract, error::ClientError};

pub const CONTRACT_ADDRESS_ENV: &str = "MICRO_LOAN_ADDRESS";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xc7e393878c1f05040b54afa172d00d73b0db412e";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub contract_address: Address,
}

impl ClientConfig {
    /// Reads the contract address from the process environment. Load `.env`
    /// beforehand to pick up local overrides.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// An unset or empty variable falls back to the default deployment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let raw = lookup(CONTRACT_ADDRESS_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string());
        let contract_address = Address::from_str(&raw)
            .map_err(|e| ClientError::Config(format!("{CONTRACT_ADDRESS_ENV}={raw}: {e}")))?;
        Ok(Self { contract_address })
    }

    pub fn contract(&self) -> MicroLoanContract {
        MicroLoanContract(self.contract_address)
    }
}
