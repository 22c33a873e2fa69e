//! Bars holding a fixed number of ticks.

use barsmith_series::{BarSeries, BarSeriesMut, Bars, BarsInfo};
use barsmith_types::{Bar, Period, Tick};
use tracing::trace;

use crate::formation::BarFormation;
use crate::gate::{Admission, SessionGate};
use crate::{BuilderError, Result};

/// Starts a new bar every `ticks` ticks and at every session start.
///
/// The bar timestamp is the timestamp of its latest tick.
#[derive(Debug)]
pub struct TickBarBuilder<S = Bars> {
    info: BarsInfo,
    gate: SessionGate,
    bars: S,
    ticks_per_bar: u32,
}

impl<S: BarSeriesMut + Default> TickBarBuilder<S> {
    /// Creates a builder for a [`Period::Tick`] series.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PeriodMismatch`] for any other period and
    /// [`BuilderError::Validation`] for zero ticks.
    pub fn new(info: BarsInfo) -> Result<Self> {
        let Period::Tick { ticks } = info.period else {
            return Err(BuilderError::PeriodMismatch {
                builder: "Tick",
                period: info.period,
            });
        };
        info.period.validate()?;
        Ok(Self {
            gate: SessionGate::new(&info),
            info,
            bars: S::default(),
            ticks_per_bar: ticks,
        })
    }
}

impl<S: BarSeriesMut> BarFormation for TickBarBuilder<S> {
    type Store = S;

    fn info(&self) -> &BarsInfo {
        &self.info
    }

    fn on_tick(&mut self, tick: &Tick) {
        let admission = self.gate.admit(tick);
        if !admission.is_admitted() {
            return;
        }

        let full = self
            .bars
            .last()
            .is_none_or(|bar| bar.tick_count >= self.ticks_per_bar);
        if admission == Admission::SessionStart || full {
            self.bars
                .add(Bar::from_price(tick.price, tick.volume, tick.timestamp));
            trace!(timestamp = %tick.timestamp, open = tick.price, "New tick bar");
        } else if let Some(bar) = self.bars.last_mut() {
            bar.high = bar.high.max(tick.price);
            bar.low = bar.low.min(tick.price);
            bar.close = tick.price;
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
    use chrono::TimeDelta;

    #[test]
    fn test_rejects_other_periods() {
        let info = es_info(Period::Range { ticks: 4 }, utc_24x7());
        assert!(matches!(
            TickBarBuilder::<Bars>::new(info).unwrap_err(),
            BuilderError::PeriodMismatch { builder: "Tick", .. }
        ));
    }

    #[test]
    fn test_fixed_tick_count() {
        let info = es_info(Period::Tick { ticks: 3 }, utc_24x7());
        let mut builder = TickBarBuilder::<Bars>::new(info).unwrap();
        let start = at(2024, 1, 2, 10, 0, 0);
        for (i, price) in [10.0, 12.0, 9.0, 11.0, 11.5, 10.5, 13.0].into_iter().enumerate() {
            builder.on_tick(&tick(price, start + TimeDelta::seconds(i as i64)));
        }

        let bars = builder.bars();
        assert_eq!(bars.count(), 3);
        let first = bars.get(0).unwrap();
        assert_eq!((first.open, first.high, first.low, first.close), (10.0, 12.0, 9.0, 9.0));
        assert_eq!(first.timestamp, start + TimeDelta::seconds(2));
        assert_eq!(first.tick_count, 3);
        assert_eq!(bars.tick_count(2), Some(1));
        assert_eq!(bars.open(2), Some(13.0));
    }

    #[test]
    fn test_session_start_begins_new_bar() {
        let info = es_info(Period::Tick { ticks: 100 }, split_calendar());
        let mut builder = TickBarBuilder::<Bars>::new(info).unwrap();
        builder.on_tick(&tick(1.0, at(2024, 1, 2, 11, 0, 0)));
        builder.on_tick(&tick(2.0, at(2024, 1, 2, 11, 30, 0)));
        // Lunch break, dropped
        builder.on_tick(&tick(3.0, at(2024, 1, 2, 12, 30, 0)));
        builder.on_tick(&tick(4.0, at(2024, 1, 2, 13, 30, 0)));

        let bars = builder.bars();
        assert_eq!(bars.count(), 2);
        assert_eq!(bars.tick_count(0), Some(2));
        assert_eq!(bars.open(1), Some(4.0));
    }
}
