//! Identity of a bar series.

use barsmith_calendar::TradingSessions;
use barsmith_types::{Instrument, Period};
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything that determines the contents of a bar series.
///
/// Two series built from the same ticks with equal `BarsInfo` are
/// identical, which makes this the key of the bars cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarsInfo {
    /// Instrument whose ticks feed the series.
    pub instrument: Arc<Instrument>,
    /// Bar formation policy.
    pub period: Period,
    /// Trading calendar the series follows.
    pub sessions: Arc<TradingSessions>,
    /// Approximate date of the first tick, used to seed the session iterator.
    pub first_session_date: NaiveDate,
}

impl BarsInfo {
    /// Creates a series identity.
    #[must_use]
    pub const fn new(
        instrument: Arc<Instrument>,
        period: Period,
        sessions: Arc<TradingSessions>,
        first_session_date: NaiveDate,
    ) -> Self {
        Self {
            instrument,
            period,
            sessions,
            first_session_date,
        }
    }

    /// Returns a copy with a different period.
    #[must_use]
    pub fn with_period(&self, period: Period) -> Self {
        Self {
            period,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for BarsInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}] from {}",
            self.instrument.id(),
            self.period,
            self.sessions.name(),
            self.first_session_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barsmith_types::{Increment, InstrumentId};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn info(period: Period) -> BarsInfo {
        let instrument = Instrument::new(
            InstrumentId::new("ES").unwrap(),
            "E-mini S&P 500",
            Increment::new(dec!(0.25)).unwrap(),
            Increment::new(dec!(1)).unwrap(),
        );
        BarsInfo::new(
            Arc::new(instrument),
            period,
            Arc::new(TradingSessions::create_24x7(chrono_tz::UTC)),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
    }

    #[test]
    fn test_equal_infos_hash_equal() {
        let mut set = HashSet::new();
        set.insert(info(Period::Range { ticks: 4 }));
        assert!(set.contains(&info(Period::Range { ticks: 4 })));
        assert!(!set.contains(&info(Period::Range { ticks: 5 })));
    }

    #[test]
    fn test_with_period() {
        let a = info(Period::Tick { ticks: 10 });
        let b = a.with_period(Period::Minute { minutes: 1 });
        assert_eq!(b.period, Period::Minute { minutes: 1 });
        assert_eq!(a.instrument, b.instrument);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let text = info(Period::Range { ticks: 4 }).to_string();
        assert!(text.starts_with("ES 4-Range"));
        assert!(text.ends_with("from 2024-01-02"));
    }
}
