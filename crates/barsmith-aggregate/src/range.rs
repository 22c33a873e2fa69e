//! Bars spanning a fixed number of price increments.

use barsmith_series::{BarSeries, BarSeriesMut, Bars, BarsInfo};
use barsmith_types::{Bar, Increment, Period, Tick};
use tracing::trace;

use crate::formation::BarFormation;
use crate::gate::{Admission, SessionGate};
use crate::{BuilderError, Result};

/// Builds bars whose high and low lie exactly `ticks` increments apart.
///
/// A tick beyond the bar's threshold closes the bar at the threshold, not at
/// the tick price. The next bar opens one increment past the threshold, or
/// at the tick price when the tick already lies beyond that bar's own
/// threshold.
#[derive(Debug)]
pub struct RangeBarBuilder<S = Bars> {
    info: BarsInfo,
    gate: SessionGate,
    bars: S,
    increment: Increment,
    ticks: i64,
    range: f64,
}

impl<S: BarSeriesMut + Default> RangeBarBuilder<S> {
    /// Creates a builder for a [`Period::Range`] series.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PeriodMismatch`] for any other period and
    /// [`BuilderError::Validation`] for a zero range.
    pub fn new(info: BarsInfo) -> Result<Self> {
        let Period::Range { ticks } = info.period else {
            return Err(BuilderError::PeriodMismatch {
                builder: "Range",
                period: info.period,
            });
        };
        info.period.validate()?;
        let increment = info.instrument.price_increment();
        let ticks = i64::from(ticks);
        Ok(Self {
            gate: SessionGate::new(&info),
            info,
            bars: S::default(),
            increment,
            ticks,
            range: increment.to_points(ticks),
        })
    }
}

impl<S: BarSeriesMut> RangeBarBuilder<S> {
    /// Bar span as a price distance.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.range
    }

    fn open_bar(&mut self, open: f64, tick: &Tick) {
        let bar = Bar::new(
            open,
            open.max(tick.price),
            open.min(tick.price),
            tick.price,
            tick.volume,
            tick.timestamp,
            1,
        );
        trace!(timestamp = %tick.timestamp, open, "New range bar");
        self.bars.add(bar);
    }

    fn close_bar(&mut self, close: f64, high: f64, low: f64) {
        if let Some(bar) = self.bars.last_mut() {
            bar.high = high;
            bar.low = low;
            bar.close = close;
        }
    }
}

impl<S: BarSeriesMut> BarFormation for RangeBarBuilder<S> {
    type Store = S;

    fn info(&self) -> &BarsInfo {
        &self.info
    }

    fn on_tick(&mut self, tick: &Tick) {
        let admission = self.gate.admit(tick);
        if !admission.is_admitted() {
            return;
        }

        let current = self
            .bars
            .last()
            .copied()
            .filter(|_| admission == Admission::InSession);
        let Some(current) = current else {
            self.open_bar(tick.price, tick);
            return;
        };

        let price = tick.price;
        let max_high = self.increment.round(current.low + self.range);
        let min_low = self.increment.round(current.high - self.range);

        if price > max_high {
            self.close_bar(max_high, max_high, current.low);
            let gap = self.increment.add_increments(max_high, self.ticks + 1);
            let open = if price > gap {
                price
            } else {
                self.increment.add_increments(max_high, 1)
            };
            self.open_bar(open, tick);
        } else if price < min_low {
            self.close_bar(min_low, current.high, min_low);
            let gap = self.increment.add_increments(min_low, -(self.ticks + 1));
            let open = if price < gap {
                price
            } else {
                self.increment.add_increments(min_low, -1)
            };
            self.open_bar(open, tick);
        } else if let Some(bar) = self.bars.last_mut() {
            bar.high = bar.high.max(price);
            bar.low = bar.low.min(price);
            bar.close = price;
            bar.volume += tick.volume;
            bar.timestamp = tick.timestamp;
            bar.tick_count += 1;
        }
    }

    fn bars(&self) -> &S {
        &self.bars
    }
}
