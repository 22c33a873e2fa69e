//! Second and minute bars aligned to the session start.

use barsmith_series::{BarSeriesMut, Bars, BarsInfo};
use barsmith_types::{Bar, Period, Tick};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::formation::BarFormation;
use crate::gate::{Admission, SessionGate};
use crate::{BuilderError, Result};

/// Builds bars of a fixed duration.
///
/// Bar boundaries are multiples of the period counted from the session
/// start; the last bar of a session ends at the session end. A bar's
/// timestamp is its boundary.
#[derive(Debug)]
pub struct TimeBarBuilder<S = Bars> {
    info: BarsInfo,
    gate: SessionGate,
    bars: S,
    length: TimeDelta,
    bar_end: Option<DateTime<Utc>>,
}

impl<S: BarSeriesMut + Default> TimeBarBuilder<S> {
    /// Creates a builder for a [`Period::Second`] or [`Period::Minute`] series.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PeriodMismatch`] for any other period and
    /// [`BuilderError::Validation`] for a zero length.
    pub fn new(info: BarsInfo) -> Result<Self> {
        let length = match info.period {
            Period::Second { seconds } => TimeDelta::seconds(i64::from(seconds)),
            Period::Minute { minutes } => TimeDelta::minutes(i64::from(minutes)),
            period => {
                return Err(BuilderError::PeriodMismatch {
                    builder: "Time",
                    period,
                });
            }
        };
        info.period.validate()?;
        Ok(Self {
            gate: SessionGate::new(&info),
            info,
            bars: S::default(),
            length,
            bar_end: None,
        })
    }

    /// Length of one bar.
    #[must_use]
    pub const fn length(&self) -> TimeDelta {
        self.length
    }
}

impl<S: BarSeriesMut> BarFormation for TimeBarBuilder<S> {
    type Store = S;

    fn info(&self) -> &BarsInfo {
        &self.info
    }

    fn on_tick(&mut self, tick: &Tick) {
        let admission = self.gate.admit(tick);
        if !admission.is_admitted() {
            return;
        }

        let starts_bar = admission == Admission::SessionStart
            || self.bar_end.is_none_or(|end| tick.timestamp > end);
        if starts_bar {
            let session = self.gate.session();
            let end = bar_end(session.start, session.end, self.length, tick.timestamp);
            self.bar_end = Some(end);
            self.bars.add(Bar::from_price(tick.price, tick.volume, end));
            trace!(timestamp = %end, open = tick.price, "New time bar");
        } else if let Some(bar) = self.bars.last_mut() {
            bar.high = bar.high.max(tick.price);
            bar.low = bar.low.min(tick.price);
            bar.close = tick.price;
            bar.volume += tick.volume;
            bar.tick_count += 1;
        }
    }

    fn bars(&self) -> &S {
        &self.bars
    }
}

/// First period boundary at or after `at`, counted from `session_start` and
/// capped at `session_end`.
fn bar_end(
    session_start: DateTime<Utc>,
    session_end: DateTime<Utc>,
    length: TimeDelta,
    at: DateTime<Utc>,
) -> DateTime<Utc> {
    let (Some(elapsed), Some(step)) = ((at - session_start).num_nanoseconds(), length.num_nanoseconds()) else {
        return session_end;
    };
    if step <= 0 {
        return session_end;
    }
    let steps = (elapsed.max(0) + step - 1) / step;
    i32::try_from(steps)
        .ok()
        .and_then(|n| length.checked_mul(n))
        .and_then(|offset| session_start.checked_add_signed(offset))
        .map_or(session_end, |end| end.min(session_end))
}
