use std::str::FromStr;

use alloy_primitives::U256;
use cosmwasm_std::{Decimal256, StdError, Uint256};

use crate::error::LoanError;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Number of fractional digits of the chain's native coin.
pub const COIN_DECIMALS: u32 = Decimal256::DECIMAL_PLACES;

pub fn days_to_seconds(days: u64) -> Result<u64, LoanError> {
    days.checked_mul(SECONDS_PER_DAY)
        .ok_or(LoanError::Overflow {})
}

/// On-chain durations are plain seconds, so the day count may be fractional.
pub fn seconds_to_days(seconds: u64) -> Decimal256 {
    Decimal256::from_ratio(seconds, SECONDS_PER_DAY)
}

/// Parses a whole-coin decimal string ("1.25") into base units.
pub fn parse_coin(input: &str) -> Result<Uint256, LoanError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LoanError::parse(input, "empty amount"));
    }
    parse_decimal(trimmed)
        .map(|amount| amount.atomics())
        .map_err(|e| LoanError::parse(input, e))
}

/// Strict decimal parse that also takes a bare fraction (".5"), as number
/// inputs do.
pub fn parse_decimal(input: &str) -> Result<Decimal256, StdError> {
    let trimmed = input.trim();
    if trimmed.starts_with('.') {
        Decimal256::from_str(&format!("0{trimmed}"))
    } else {
        Decimal256::from_str(trimmed)
    }
}

/// Renders base units as a whole-coin decimal string, keeping at least one
/// fractional digit ("1.0", "0.25").
pub fn format_coin(amount: Uint256) -> String {
    let rendered = Decimal256::new(amount).to_string();
    if rendered.contains('.') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

pub fn to_abi_uint(value: Uint256) -> U256 {
    U256::from_be_bytes(value.to_be_bytes())
}

pub fn from_abi_uint(value: U256) -> Uint256 {
    Uint256::from_be_bytes(value.to_be_bytes::<32>())
}

/// Narrows an ABI word that the front-end treats as a machine integer
/// (ids, seconds).
pub fn abi_uint_to_u64(value: U256, field: &'static str) -> Result<u64, LoanError> {
    u64::try_from(value).map_err(|_| LoanError::ValueOutOfRange { field, bits: 64 })
}
