use crate::error::StriperError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor units in one major unit.
///
/// Every currency is treated as having two decimal places.
const MINOR_PER_MAJOR: Decimal = dec!(100);

/// An amount in the smallest currency unit (cents for USD).
///
/// This is what the payment API expects on the wire. Amounts are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(u64);

impl MinorUnits {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Converts a major-unit amount (e.g. `19.99`) into minor units (`1999`).
    ///
    /// Sub-cent remainders are rounded half away from zero.
    pub fn from_major(amount: Decimal) -> Result<Self, StriperError> {
        amount
            .checked_mul(MINOR_PER_MAJOR)
            .ok_or_else(|| StriperError::ValidationError(format!("Amount {amount} overflows")))
            .and_then(Self::round)
    }

    /// Rounds an amount already expressed in minor units to a whole unit.
    pub fn round(amount: Decimal) -> Result<Self, StriperError> {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            return Err(StriperError::ValidationError(format!(
                "Amount must not be negative, got {amount}"
            )));
        }
        rounded.to_u64().map(Self).ok_or_else(|| {
            StriperError::ValidationError(format!("Amount {amount} is out of range"))
        })
    }
}

impl From<MinorUnits> for u64 {
    fn from(amount: MinorUnits) -> Self {
        amount.0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
