//! Benchmark fixtures for barsmith.

use barsmith_lib::{BarsInfo, CalendarRegistry, Increment, Instrument, InstrumentId, Period, Tick};
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use std::sync::Arc;

/// Instrument id used by every fixture.
pub const INSTRUMENT: &str = "ES";

/// First tick time of the generated streams (Tuesday 2024-01-02, 09:30 New York).
pub fn stream_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap()
}

/// E-mini S&P 500 with a 0.25 price increment.
pub fn instrument() -> Arc<Instrument> {
    Arc::new(Instrument::new(
        InstrumentId::new(INSTRUMENT).unwrap(),
        "E-mini S&P 500",
        Increment::from_f64(0.25).unwrap(),
        Increment::from_f64(1.0).unwrap(),
    ))
}

/// Series identity on the US equities calendar.
pub fn bars_info(period: Period) -> BarsInfo {
    BarsInfo::new(
        instrument(),
        period,
        CalendarRegistry::global().require("us-equities").unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    )
}

/// A deterministic random walk of `count` ticks on the 0.25 grid.
///
/// Ticks are 0 to 250 ms apart, so duplicate timestamps occur.
pub fn random_walk(count: usize) -> Vec<Tick> {
    let id = InstrumentId::new(INSTRUMENT).unwrap();
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut price = 4700.0;
    let mut ts = stream_start();
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            price += ((state >> 33) % 5) as f64 * 0.25 - 0.5;
            ts += TimeDelta::milliseconds(((state >> 13) % 251) as i64);
            Tick::trade(id.clone(), price, 1.0, ts)
        })
        .collect()
}

/// Timestamps with a heavily skewed distribution: a dense burst followed by
/// sparse stragglers.
pub fn skewed_timestamps(count: usize) -> Vec<DateTime<Utc>> {
    let start = stream_start();
    let dense = count * 9 / 10;
    (0..count)
        .map(|i| {
            if i < dense {
                start + TimeDelta::microseconds(i as i64)
            } else {
                start + TimeDelta::hours((i - dense) as i64 + 1)
            }
        })
        .collect()
}
