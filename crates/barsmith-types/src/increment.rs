//! Decimal-exact price increment arithmetic.
//!
//! Prices travel through the engine as `f64`, but every operation that snaps
//! a price to the instrument grid is carried out in [`Decimal`] so that
//! repeated threshold calculations never accumulate binary rounding drift.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{Result, ValidationError};

/// The minimum increment of a price or quantity grid (tick size).
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Increment(Decimal);

impl Increment {
    /// Creates an increment from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not strictly positive.
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidIncrement(value.to_string()));
        }
        Ok(Self(value.normalize()))
    }

    /// Creates an increment from a floating point value such as `0.25`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite or not strictly positive.
    pub fn from_f64(value: f64) -> Result<Self> {
        Decimal::from_f64(value)
            .ok_or_else(|| ValidationError::InvalidIncrement(value.to_string()))
            .and_then(Self::new)
    }

    /// Returns the increment as a decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the increment as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        to_f64(self.0)
    }

    /// Rounds `price` to the nearest multiple of the increment, midpoints
    /// away from zero.
    ///
    /// Non-finite prices are returned unchanged.
    #[must_use]
    pub fn round(&self, price: f64) -> f64 {
        self.increments_of(price)
            .and_then(|n| n.checked_mul(self.0))
            .map_or(price, to_f64)
    }

    /// Returns `price` moved by `count` increments, after snapping it to the
    /// grid.
    #[must_use]
    pub fn add_increments(&self, price: f64, count: i64) -> f64 {
        self.increments_of(price)
            .and_then(|n| n.checked_add(Decimal::from(count)))
            .and_then(|n| n.checked_mul(self.0))
            .map_or(price, to_f64)
    }

    /// Converts a number of increments into a price distance.
    #[must_use]
    pub fn to_points(&self, count: i64) -> f64 {
        Decimal::from(count)
            .checked_mul(self.0)
            .map_or(f64::NAN, to_f64)
    }

    /// Converts a price distance into the nearest whole number of increments.
    ///
    /// Returns `None` for non-finite or out-of-range distances.
    #[must_use]
    pub fn to_increments(&self, points: f64) -> Option<i64> {
        self.increments_of(points).and_then(|n| n.to_i64())
    }

    /// Multiplies a price distance by `factor` and snaps the result to the
    /// grid.
    #[must_use]
    pub fn scale_points(&self, points: f64, factor: f64) -> f64 {
        let scaled = Decimal::from_f64(points)
            .zip(Decimal::from_f64(factor))
            .and_then(|(p, f)| p.checked_mul(f));
        scaled
            .and_then(|p| p.checked_div(self.0))
            .map(|n| n.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|n| n.checked_mul(self.0))
            .map_or(points * factor, to_f64)
    }

    /// Returns every grid price from the lower to the higher of the two
    /// prices, inclusive, in ascending order.
    #[must_use]
    pub fn prices_between(&self, first: f64, second: f64) -> Vec<f64> {
        let (low, high) = if first <= second { (first, second) } else { (second, first) };
        let (Some(from), Some(to)) = (self.increments_of(low), self.increments_of(high)) else {
            return Vec::new();
        };
        let mut prices = Vec::new();
        let mut n = from;
        while n <= to {
            prices.push(n.checked_mul(self.0).map_or(f64::NAN, to_f64));
            n += Decimal::ONE;
        }
        prices
    }

    /// The whole number of increments nearest to `price`.
    fn increments_of(&self, price: f64) -> Option<Decimal> {
        Decimal::from_f64(price)
            .and_then(|p| p.checked_div(self.0))
            .map(|n| n.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl TryFrom<Decimal> for Increment {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Increment> for Decimal {
    fn from(increment: Increment) -> Self {
        increment.0
    }
}

impl std::fmt::Display for Increment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
