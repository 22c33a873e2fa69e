//! Selection of the bar builder matching a period.

use barsmith_series::{BarSeriesMut, Bars, BarsInfo};
use barsmith_types::{Period, Tick};

use crate::formation::BarFormation;
use crate::{RangeBarBuilder, Result, SwingBarBuilder, TickBarBuilder, TimeBarBuilder};

/// A bar builder of any formation policy.
#[derive(Debug)]
pub enum BarBuilder<S = Bars> {
    /// Second and minute bars.
    Time(TimeBarBuilder<S>),
    /// Fixed tick count bars.
    Tick(TickBarBuilder<S>),
    /// Fixed range bars.
    Range(RangeBarBuilder<S>),
    /// Trend and reversal swing bars.
    PriceAction(SwingBarBuilder<S>),
}

impl<S: BarSeriesMut + Default> BarBuilder<S> {
    /// Creates the builder for `info.period`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Validation`](crate::BuilderError::Validation)
    /// for invalid period parameters.
    pub fn new(info: BarsInfo) -> Result<Self> {
        Ok(match info.period {
            Period::Second { .. } | Period::Minute { .. } => Self::Time(TimeBarBuilder::new(info)?),
            Period::Tick { .. } => Self::Tick(TickBarBuilder::new(info)?),
            Period::Range { .. } => Self::Range(RangeBarBuilder::new(info)?),
            Period::PriceAction { .. } => Self::PriceAction(SwingBarBuilder::new(info)?),
        })
    }
}

impl<S: BarSeriesMut> BarBuilder<S> {
    /// Feeds a batch of ticks in order.
    pub fn on_ticks<'a>(&mut self, ticks: impl IntoIterator<Item = &'a Tick>) {
        for tick in ticks {
            self.on_tick(tick);
        }
    }
}

impl<S: BarSeriesMut> BarFormation for BarBuilder<S> {
    type Store = S;

    fn info(&self) -> &BarsInfo {
        match self {
            Self::Time(b) => b.info(),
            Self::Tick(b) => b.info(),
            Self::Range(b) => b.info(),
            Self::PriceAction(b) => b.info(),
        }
    }

    fn on_tick(&mut self, tick: &Tick) {
        match self {
            Self::Time(b) => b.on_tick(tick),
            Self::Tick(b) => b.on_tick(tick),
            Self::Range(b) => b.on_tick(tick),
            Self::PriceAction(b) => b.on_tick(tick),
        }
    }

    fn bars(&self) -> &S {
        match self {
            Self::Time(b) => b.bars(),
            Self::Tick(b) => b.bars(),
            Self::Range(b) => b.bars(),
            Self::PriceAction(b) => b.bars(),
        }
    }
}
