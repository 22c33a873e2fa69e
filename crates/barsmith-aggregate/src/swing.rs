//! Trend and reversal swing bars.

use barsmith_series::{BarSeries, BarSeriesMut, Bars, BarsInfo, SeriesIndex};
use barsmith_types::{Bar, Direction, Increment, Period, Tick};
use chrono::TimeDelta;
use tracing::{debug, trace};

use crate::formation::BarFormation;
use crate::gate::{Admission, SessionGate};
use crate::{BuilderError, Result};

/// Factor applied to both sizes by an automatic adjustment.
const ADJUST_FACTOR: f64 = 1.5;

/// Completed bars a session needs before sizes may adjust.
const ADJUST_MIN_BARS: usize = 3;

/// Price levels derived from the open of the in-progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Thresholds {
    max_high: f64,
    min_low: f64,
    next_open_up: f64,
    next_open_down: f64,
    next_bar_max_high: f64,
    next_bar_min_low: f64,
}

/// Builds [`Period::PriceAction`] bars.
///
/// A bar closes once price moves `trend` size from its open in the trend
/// direction, or `reversal` size against it; the latter flips the trend.
/// The closing bar ends exactly at the threshold and the next bar opens one
/// increment beyond it, or at the tick price on a gap. With `auto_adjust`
/// both sizes grow by half after three alternating bars and shrink back
/// when bars are more than a minute apart.
#[derive(Debug)]
pub struct SwingBarBuilder<S = Bars> {
    info: BarsInfo,
    gate: SessionGate,
    bars: S,
    increment: Increment,
    auto_adjust: bool,
    initial_trend_size: f64,
    initial_reversal_size: f64,
    trend_size: f64,
    reversal_size: f64,
    trend: Direction,
    session_bars: usize,
    thresholds: Thresholds,
}

impl<S: BarSeriesMut + Default> SwingBarBuilder<S> {
    /// Creates a builder for a [`Period::PriceAction`] series.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PeriodMismatch`] for any other period and
    /// [`BuilderError::Validation`] for zero sizes.
    pub fn new(info: BarsInfo) -> Result<Self> {
        let Period::PriceAction {
            trend_ticks,
            reversal_ticks,
            auto_adjust,
        } = info.period
        else {
            return Err(BuilderError::PeriodMismatch {
                builder: "PriceAction",
                period: info.period,
            });
        };
        info.period.validate()?;
        let increment = info.instrument.price_increment();
        let trend_size = increment.to_points(i64::from(trend_ticks));
        let reversal_size = increment.to_points(i64::from(reversal_ticks));
        Ok(Self {
            gate: SessionGate::new(&info),
            info,
            bars: S::default(),
            increment,
            auto_adjust,
            initial_trend_size: trend_size,
            initial_reversal_size: reversal_size,
            trend_size,
            reversal_size,
            trend: Direction::Up,
            session_bars: 0,
            thresholds: Thresholds::default(),
        })
    }
}

impl<S: BarSeriesMut> SwingBarBuilder<S> {
    /// Current trend direction.
    #[must_use]
    pub const fn trend(&self) -> Direction {
        self.trend
    }

    /// Current trend size as a price distance.
    #[must_use]
    pub const fn trend_size(&self) -> f64 {
        self.trend_size
    }

    /// Current reversal size as a price distance.
    #[must_use]
    pub const fn reversal_size(&self) -> f64 {
        self.reversal_size
    }

    fn reset_session(&mut self) {
        self.trend = Direction::Up;
        self.trend_size = self.initial_trend_size;
        self.reversal_size = self.initial_reversal_size;
        self.session_bars = 0;
    }

    fn open_bar(&mut self, open: f64, tick: &Tick) {
        if self.auto_adjust && self.session_bars >= ADJUST_MIN_BARS {
            self.adjust_sizes();
        }
        let bar = Bar::new(
            open,
            open.max(tick.price),
            open.min(tick.price),
            tick.price,
            tick.volume,
            tick.timestamp,
            1,
        );
        trace!(timestamp = %tick.timestamp, open, trend = %self.trend, "New swing bar");
        self.bars.add(bar);
        self.thresholds = self.thresholds_from(open);
    }

    fn close_bar(&mut self, close: f64, high: f64, low: f64) {
        if let Some(bar) = self.bars.last_mut() {
            bar.high = high;
            bar.low = low;
            bar.close = close;
        }
        self.session_bars += 1;
    }

    fn thresholds_from(&self, open: f64) -> Thresholds {
        let inc = self.increment;
        let (up, down) = match self.trend {
            Direction::Up => (self.trend_size, self.reversal_size),
            Direction::Down | Direction::Unknown => (self.reversal_size, self.trend_size),
        };
        let max_high = inc.round(open + up);
        let min_low = inc.round(open - down);
        let next_open_up = inc.add_increments(max_high, 1);
        let next_open_down = inc.add_increments(min_low, -1);
        Thresholds {
            max_high,
            min_low,
            next_open_up,
            next_open_down,
            next_bar_max_high: inc.round(next_open_up + self.trend_size),
            next_bar_min_low: inc.round(next_open_down - self.trend_size),
        }
    }

    /// Grows the sizes after three alternating bars, otherwise shrinks them
    /// when the last two bars are more than a minute apart.
    fn adjust_sizes(&mut self) {
        let recent = [3, 2, 1].map(|n| self.bars.get(SeriesIndex::FromEnd(n)).copied());
        let [Some(third), Some(second), Some(last)] = recent else {
            return;
        };

        let directions = [third.direction(), second.direction(), last.direction()];
        let alternating = matches!(
            directions,
            [Direction::Up, Direction::Down, Direction::Up] | [Direction::Down, Direction::Up, Direction::Down]
        );

        let factor = if alternating && self.trend_size <= self.initial_trend_size {
            ADJUST_FACTOR
        } else if self.trend_size >= self.initial_trend_size
            && last.timestamp - second.timestamp > TimeDelta::minutes(1)
        {
            ADJUST_FACTOR.recip()
        } else {
            return;
        };

        let inc = self.increment;
        let one = inc.as_f64();
        self.trend_size = inc.scale_points(self.trend_size, factor).max(one);
        self.reversal_size = inc.scale_points(self.reversal_size, factor).max(one);
        debug!(
            factor,
            trend_size = self.trend_size,
            reversal_size = self.reversal_size,
            "Adjusted swing sizes"
        );
    }
}

impl<S: BarSeriesMut> BarFormation for SwingBarBuilder<S> {
    type Store = S;

    fn info(&self) -> &BarsInfo {
        &self.info
    }

    fn on_tick(&mut self, tick: &Tick) {
        let admission = self.gate.admit(tick);
        if !admission.is_admitted() {
            return;
        }

        let price = tick.price;
        if admission == Admission::SessionStart || self.bars.last().is_none() {
            self.reset_session();
            self.open_bar(price, tick);
            return;
        }

        let t = self.thresholds;
        if price > t.max_high {
            let low = self.bars.last().map_or(price, |b| b.low);
            self.close_bar(t.max_high, t.max_high, low);
            self.trend = Direction::Up;
            let open = if price > t.next_bar_max_high {
                price
            } else {
                t.next_open_up
            };
            self.open_bar(open, tick);
        } else if price < t.min_low {
            let high = self.bars.last().map_or(price, |b| b.high);
            self.close_bar(t.min_low, high, t.min_low);
            self.trend = Direction::Down;
            let open = if price < t.next_bar_min_low {
                price
            } else {
                t.next_open_down
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, es_info, split_calendar, tick, utc_24x7};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Utc};
    use tracing_test::traced_test;

    fn period(auto_adjust: bool) -> Period {
        Period::PriceAction {
            trend_ticks: 4,
            reversal_ticks: 2,
            auto_adjust,
        }
    }

    fn ohlc(bar: &Bar) -> (f64, f64, f64, f64) {
        (bar.open, bar.high, bar.low, bar.close)
    }

    fn feed<S: BarSeriesMut>(builder: &mut SwingBarBuilder<S>, ticks: &[(f64, DateTime<Utc>)]) {
        for &(price, ts) in ticks {
            builder.on_tick(&tick(price, ts));
        }
    }

    #[test]
    fn test_rejects_other_periods() {
        let info = es_info(Period::Range { ticks: 4 }, utc_24x7());
        assert!(matches!(
            SwingBarBuilder::<Bars>::new(info).unwrap_err(),
            BuilderError::PeriodMismatch {
                builder: "PriceAction",
                ..
            }
        ));
    }

    #[test]
    fn test_trend_and_reversal_thresholds() {
        // Trend 1.0, reversal 0.5
        let mut b = SwingBarBuilder::<Bars>::new(es_info(period(false), utc_24x7())).unwrap();
        feed(
            &mut b,
            &[
                (100.0, at(2024, 1, 2, 10, 0, 0)),
                (100.5, at(2024, 1, 2, 10, 0, 1)),
                (101.25, at(2024, 1, 2, 10, 0, 2)),
                (100.5, at(2024, 1, 2, 10, 0, 3)),
                (97.0, at(2024, 1, 2, 10, 0, 4)),
            ],
        );

        let bars = b.bars();
        assert_eq!(bars.count(), 4);
        assert_eq!(ohlc(bars.get(0).unwrap()), (100.0, 101.0, 100.0, 101.0));
        assert_eq!(bars.tick_count(0), Some(2));
        // Reversal against the up trend
        assert_eq!(ohlc(bars.get(1).unwrap()), (101.25, 101.25, 100.75, 100.75));
        // Trend continuation down
        assert_eq!(ohlc(bars.get(2).unwrap()), (100.5, 100.5, 99.5, 99.5));
        // Gap beyond the next bar's threshold opens at the tick price
        assert_eq!(ohlc(bars.get(3).unwrap()), (97.0, 97.0, 97.0, 97.0));
        assert_eq!(b.trend(), Direction::Down);
        assert_relative_eq!(b.trend_size(), 1.0);
    }

    #[test]
    #[traced_test]
    fn test_auto_adjust_grows_after_alternating_bars_and_resets_per_session() {
        let mut b = SwingBarBuilder::<Bars>::new(es_info(period(true), split_calendar())).unwrap();
        feed(
            &mut b,
            &[
                (100.0, at(2024, 1, 2, 11, 0, 0)),
                (101.25, at(2024, 1, 2, 11, 0, 1)),
                (100.5, at(2024, 1, 2, 11, 0, 2)),
                (101.25, at(2024, 1, 2, 11, 0, 3)),
            ],
        );

        let directions: Vec<_> = b.bars().iter().take(3).map(Bar::direction).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Down, Direction::Up]);
        assert_relative_eq!(b.trend_size(), 1.5);
        assert_relative_eq!(b.reversal_size(), 0.75);
        assert!(logs_contain("Adjusted swing sizes"));

        // The new bar uses the grown sizes
        b.on_tick(&tick(102.5, at(2024, 1, 2, 11, 0, 4)));
        assert_eq!(b.bars().count(), 4);
        assert_eq!(b.bars().high(3), Some(102.5));

        // Afternoon session starts over
        b.on_tick(&tick(102.0, at(2024, 1, 2, 13, 0, 5)));
        assert_eq!(b.bars().count(), 5);
        assert_eq!(b.trend(), Direction::Up);
        assert_relative_eq!(b.trend_size(), 1.0);
        assert_relative_eq!(b.reversal_size(), 0.5);
    }

    #[test]
    fn test_auto_adjust_shrinks_when_bars_slow_down() {
        let mut b = SwingBarBuilder::<Bars>::new(es_info(period(true), utc_24x7())).unwrap();
        feed(
            &mut b,
            &[
                (100.0, at(2024, 1, 2, 10, 0, 0)),
                (101.25, at(2024, 1, 2, 10, 0, 1)),
                (102.5, at(2024, 1, 2, 10, 0, 2)),
                (103.0, at(2024, 1, 2, 10, 3, 0)),
                (103.75, at(2024, 1, 2, 10, 5, 0)),
            ],
        );

        assert_eq!(b.bars().count(), 4);
        assert_relative_eq!(b.trend_size(), 0.75);
        assert_relative_eq!(b.reversal_size(), 0.25);
    }

    #[test]
    fn test_fixed_sizes_never_adjust() {
        let mut b = SwingBarBuilder::<Bars>::new(es_info(period(false), utc_24x7())).unwrap();
        feed(
            &mut b,
            &[
                (100.0, at(2024, 1, 2, 10, 0, 0)),
                (101.25, at(2024, 1, 2, 10, 0, 1)),
                (100.5, at(2024, 1, 2, 10, 0, 2)),
                (101.25, at(2024, 1, 2, 10, 0, 3)),
                (101.5, at(2024, 1, 2, 10, 9, 0)),
                (102.75, at(2024, 1, 2, 10, 9, 1)),
            ],
        );
        assert_relative_eq!(b.trend_size(), 1.0);
        assert_relative_eq!(b.reversal_size(), 0.5);
    }
}
