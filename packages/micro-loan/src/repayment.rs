use cosmwasm_std::{Decimal256, Uint256};

use crate::error::LoanError;

pub const DAYS_PER_YEAR: u64 = 365;

/// Rates are expressed in percent, so the interest denominator is 365 * 100.
const INTEREST_DENOMINATOR: u64 = DAYS_PER_YEAR * 100;

/// Simple interest on `principal` at `annual_rate_percent` for `duration_days`,
/// counted against a 365-day year.
pub fn interest_for(
    principal: Decimal256,
    annual_rate_percent: Decimal256,
    duration_days: Decimal256,
) -> Result<Decimal256, LoanError> {
    principal
        .checked_mul(annual_rate_percent)
        .and_then(|scaled| scaled.checked_mul(duration_days))
        .map_err(|_| LoanError::Overflow {})?
        .checked_div(Decimal256::from_ratio(INTEREST_DENOMINATOR, 1u8))
        .map_err(|_| LoanError::Overflow {})
}

pub fn total_repayment(
    principal: Decimal256,
    annual_rate_percent: Decimal256,
    duration_days: Decimal256,
) -> Result<Decimal256, LoanError> {
    let interest = interest_for(principal, annual_rate_percent, duration_days)?;
    principal
        .checked_add(interest)
        .map_err(|_| LoanError::Overflow {})
}

/// Full-precision repayment figures. Rounding only happens in the `*_display`
/// renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepaymentPreview {
    pub principal: Decimal256,
    pub total: Decimal256,
    /// Interest over the loan period, in percent of the principal
    pub period_interest_percent: Decimal256,
    pub duration_days: Decimal256,
}

impl RepaymentPreview {
    pub fn compute(
        principal: Decimal256,
        annual_rate_percent: Decimal256,
        duration_days: Decimal256,
    ) -> Result<Self, LoanError> {
        let total = total_repayment(principal, annual_rate_percent, duration_days)?;
        let period_interest_percent = annual_rate_percent
            .checked_mul(duration_days)
            .map_err(|_| LoanError::Overflow {})?
            .checked_div(Decimal256::from_ratio(DAYS_PER_YEAR, 1u8))
            .map_err(|_| LoanError::Overflow {})?;
        Ok(Self {
            principal,
            total,
            period_interest_percent,
            duration_days,
        })
    }

    pub fn interest(&self) -> Decimal256 {
        self.total - self.principal
    }

    /// Total owed, four decimal places.
    pub fn total_display(&self) -> String {
        to_fixed(self.total, 4)
    }

    pub fn period_interest_display(&self) -> String {
        to_fixed(self.period_interest_percent, 2)
    }
}

/// Renders `value` with exactly `places` fractional digits, rounding half up.
pub fn to_fixed(value: Decimal256, places: u32) -> String {
    let places = places.min(Decimal256::DECIMAL_PLACES);
    let scale = Uint256::from(10u8).pow(Decimal256::DECIMAL_PLACES - places);
    let atomics = value.atomics();
    let mut rounded = atomics / scale;
    if (atomics % scale) * Uint256::from(2u8) >= scale {
        rounded += Uint256::one();
    }

    if places == 0 {
        return rounded.to_string();
    }
    let unit = Uint256::from(10u8).pow(places);
    let whole = rounded / unit;
    let fraction = (rounded % unit).to_string();
    format!("{whole}.{fraction:0>width$}", width = places as usize)
}
