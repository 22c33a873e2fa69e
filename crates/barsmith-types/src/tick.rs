//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InstrumentId;

/// A single trade print.
///
/// Ticks are supplied in non-decreasing timestamp order and never change
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument the trade belongs to.
    pub instrument: InstrumentId,
    /// Trade price.
    pub price: f64,
    /// Best bid at the time of the trade.
    pub bid: f64,
    /// Best ask at the time of the trade.
    pub ask: f64,
    /// Traded volume.
    pub volume: f64,
    /// Timestamp of the trade (UTC).
    pub timestamp: DateTime<Utc>,
    /// Feed sequence number.
    pub sequence: u64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(
        instrument: InstrumentId,
        price: f64,
        bid: f64,
        ask: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
        sequence: u64,
    ) -> Self {
        Self {
            instrument,
            price,
            bid,
            ask,
            volume,
            timestamp,
            sequence,
        }
    }

    /// Creates a tick trading at `price` with a zero spread.
    #[must_use]
    pub const fn trade(
        instrument: InstrumentId,
        price: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(instrument, price, price, price, volume, timestamp, 0)
    }

    /// Returns the mid price (average of ask and bid).
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.ask + self.bid) / 2.0
    }

    /// Returns the spread (ask - bid).
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn tick() -> Tick {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Tick::new(InstrumentId::new("EURUSD").unwrap(), 1.10005, 1.1000, 1.1001, 3.0, ts, 7)
    }

    #[test]
    fn test_tick_mid_price() {
        assert_relative_eq!(tick().mid(), 1.10005, epsilon = 1e-10);
    }

    #[test]
    fn test_tick_spread() {
        assert_relative_eq!(tick().spread(), 0.0001, epsilon = 1e-10);
    }

    #[test]
    fn test_trade_has_no_spread() {
        let t = tick();
        let trade = Tick::trade(t.instrument.clone(), 1.5, 1.0, t.timestamp);
        assert_eq!(trade.spread(), 0.0);
        assert_eq!(trade.sequence, 0);
    }
}
