//! OHLCV bar data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Direction;

/// A single field of a bar, used for field-generic access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarField {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Cumulative volume.
    Volume,
}

/// OHLCV bar.
///
/// The timestamp follows the bar-close convention: it is the instant the
/// bar ends (time bars) or the instant of its most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Volume accumulated over the bar.
    pub volume: f64,
    /// Bar timestamp (UTC, bar close).
    pub timestamp: DateTime<Utc>,
    /// Number of ticks in the bar.
    pub tick_count: u32,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
        tick_count: u32,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
            tick_count,
        }
    }

    /// Creates a bar from a single price.
    #[must_use]
    pub const fn from_price(price: f64, volume: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(price, price, price, price, volume, timestamp, 1)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if the bar closed above its open.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if the bar closed below its open.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.close < self.open
    }

    /// Returns the direction from open to close.
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_values(self.open, self.close)
    }

    /// Returns the value of `field`.
    #[must_use]
    pub const fn value(&self, field: BarField) -> f64 {
        match field {
            BarField::Open => self.open,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Close => self.close,
            BarField::Volume => self.volume,
        }
    }

    /// Returns true if the OHLC prices are consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    /// Merges a later bar into this one.
    ///
    /// Keeps this open, extends high and low, and takes the close and
    /// timestamp of `later`.
    pub fn cumulate(&mut self, later: &Self) {
        self.high = self.high.max(later.high);
        self.low = self.low.min(later.low);
        self.close = later.close;
        self.volume += later.volume;
        self.timestamp = later.timestamp;
        self.tick_count += later.tick_count;
    }

    /// Returns true if the prices, volume and timestamp are equal.
    ///
    /// Tick count is ignored.
    #[must_use]
    pub fn values_equal(&self, other: &Self) -> bool {
        self.open == other.open
            && self.high == other.high
            && self.low == other.low
            && self.close == other.close
            && self.volume == other.volume
            && self.timestamp == other.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn create_test_bar() -> Bar {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Bar::new(1.1000, 1.1050, 1.0980, 1.1020, 1000.0, timestamp, 500)
    }

    #[test]
    fn test_range_and_body() {
        let bar = create_test_bar();
        assert_relative_eq!(bar.range(), 0.0070, epsilon = 1e-10);
        assert_relative_eq!(bar.body(), 0.0020, epsilon = 1e-10);
    }

    #[test]
    fn test_direction() {
        let bar = create_test_bar();
        assert!(bar.is_up());
        assert!(!bar.is_down());
        assert_eq!(bar.direction(), Direction::Up);

        let flat = Bar::from_price(1.0, 1.0, bar.timestamp);
        assert_eq!(flat.direction(), Direction::Unknown);
    }

    #[test]
    fn test_value() {
        let bar = create_test_bar();
        assert_eq!(bar.value(BarField::High), 1.1050);
        assert_eq!(bar.value(BarField::Volume), 1000.0);
    }

    #[test]
    fn test_cumulate() {
        let mut bar = create_test_bar();
        let later_ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 1, 0).unwrap();
        let later = Bar::new(1.1020, 1.1060, 1.1010, 1.1040, 10.0, later_ts, 2);
        bar.cumulate(&later);

        assert_eq!(bar.open, 1.1000);
        assert_eq!(bar.high, 1.1060);
        assert_eq!(bar.low, 1.0980);
        assert_eq!(bar.close, 1.1040);
        assert_eq!(bar.timestamp, later_ts);
        assert_eq!(bar.tick_count, 502);
        assert!(bar.is_consistent());
    }

    #[test]
    fn test_values_equal_ignores_tick_count() {
        let bar = create_test_bar();
        let mut other = bar;
        other.tick_count = 1;
        assert!(bar.values_equal(&other));
        other.close = 1.0;
        assert!(!bar.values_equal(&other));
    }
}
