use alloy_primitives::Address;
use cosmwasm_std::{Decimal256, Uint256};
use serde::{Deserialize, Serialize};

use crate::{
    error::LoanError,
    repayment::RepaymentPreview,
    state::LoanTerms,
    units::{days_to_seconds, parse_coin, parse_decimal},
};

pub const MIN_DURATION_DAYS: i128 = 2;
pub const MIN_INTEREST_RATE: f64 = 2.0;

pub const DEFAULT_DURATION_DAYS: &str = "30";
pub const DEFAULT_INTEREST_RATE: &str = "5";

/// Borrower input exactly as typed. The duration and rate setters apply the
/// floor clamps on every edit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoanForm {
    loan_amount: String,
    collateral_amount: String,
    duration: String,
    interest_rate: String,
}

impl Default for LoanForm {
    fn default() -> Self {
        Self {
            loan_amount: String::new(),
            collateral_amount: String::new(),
            duration: DEFAULT_DURATION_DAYS.to_string(),
            interest_rate: DEFAULT_INTEREST_RATE.to_string(),
        }
    }
}

impl LoanForm {
    pub fn loan_amount(&self) -> &str {
        &self.loan_amount
    }

    pub fn collateral_amount(&self) -> &str {
        &self.collateral_amount
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn interest_rate(&self) -> &str {
        &self.interest_rate
    }

    pub fn set_loan_amount(&mut self, input: impl Into<String>) {
        self.loan_amount = input.into();
    }

    pub fn set_collateral_amount(&mut self, input: impl Into<String>) {
        self.collateral_amount = input.into();
    }

    pub fn set_duration(&mut self, input: &str) {
        self.duration = clamp_duration(input);
    }

    pub fn set_interest_rate(&mut self, input: &str) {
        self.interest_rate = clamp_interest_rate(input);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All four fields are filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.loan_amount,
            &self.collateral_amount,
            &self.duration,
            &self.interest_rate,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Repayment preview for the current input, `None` when any field is
    /// missing or not a number.
    pub fn preview(&self) -> Option<RepaymentPreview> {
        if self.loan_amount.trim().is_empty()
            || self.interest_rate.trim().is_empty()
            || self.duration.trim().is_empty()
        {
            return None;
        }
        let principal = parse_decimal(&self.loan_amount).ok()?;
        let rate = parse_decimal(&self.interest_rate).ok()?;
        let days = u64::try_from(parse_int_prefix(&self.duration)?).ok()?;
        RepaymentPreview::compute(principal, rate, Decimal256::from_ratio(days, 1u8)).ok()
    }

    /// Converts the form into the contract's request tuple. The amounts are
    /// converted from the raw strings, never from the rounded preview.
    pub fn to_terms(&self) -> Result<LoanTerms, LoanError> {
        let amount = parse_coin(&self.loan_amount)?;
        if amount.is_zero() {
            return Err(LoanError::InvalidAmount {
                field: "loan amount",
            });
        }
        let collateral_amount = parse_coin(&self.collateral_amount)?;
        if collateral_amount.is_zero() {
            return Err(LoanError::InvalidAmount {
                field: "collateral amount",
            });
        }

        let days = parse_int_prefix(&self.duration)
            .and_then(|days| u64::try_from(days).ok())
            .ok_or_else(|| LoanError::parse(&self.duration, "duration is not a whole number of days"))?;
        // The contract only takes whole percents
        let interest = parse_int_prefix(&self.interest_rate)
            .and_then(|rate| u128::try_from(rate).ok())
            .ok_or_else(|| LoanError::parse(&self.interest_rate, "interest rate is not a number"))?;

        Ok(LoanTerms {
            amount,
            interest: Uint256::from(interest),
            duration: days_to_seconds(days)?,
            collateral_amount,
            collateral_token: Address::ZERO,
        })
    }
}

/// `max(2, parseInt(input) || 2)`: a cleared or zero field snaps to the floor,
/// large values pass through.
pub fn clamp_duration(input: &str) -> String {
    let days = match parse_int_prefix(input) {
        Some(days) if days != 0 => days,
        _ => MIN_DURATION_DAYS,
    };
    days.max(MIN_DURATION_DAYS).to_string()
}

/// `max(2, parseFloat(input) || 2)`, with the same floor-only behaviour.
pub fn clamp_interest_rate(input: &str) -> String {
    let rate = match parse_float_prefix(input) {
        Some(rate) if rate != 0.0 && !rate.is_nan() => rate,
        _ => MIN_INTEREST_RATE,
    };
    rate.max(MIN_INTEREST_RATE).to_string()
}

/// Leading integer of `input`, ignoring leading whitespace and any trailing
/// garbage ("12abc" is 12, "3.7" is 3). Saturates instead of overflowing.
pub fn parse_int_prefix(input: &str) -> Option<i128> {
    let trimmed = input.trim_start();
    let (negative, digits) = split_sign(trimmed);
    let mut seen = false;
    let mut value: i128 = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(10)) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(digit as i128);
    }
    seen.then_some(if negative { -value } else { value })
}

/// Leading decimal number of `input` ("5.5%" is 5.5, "1e2" is 100).
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    trimmed[..end].parse().ok()
}

fn split_sign(input: &str) -> (bool, &str) {
    if let Some(rest) = input.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = input.strip_prefix('+') {
        (false, rest)
    } else {
        (false, input)
    }
}
