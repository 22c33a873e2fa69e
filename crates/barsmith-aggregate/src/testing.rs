//! Fixtures shared by the builder tests.

use barsmith_calendar::{TimeOfWeek, TradingSessionTemplate, TradingSessions};
use barsmith_series::BarsInfo;
use barsmith_types::{Increment, Instrument, InstrumentId, Period, Tick};
use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use rust_decimal_macros::dec;
use std::sync::Arc;

pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub(crate) fn es() -> Arc<Instrument> {
    Arc::new(Instrument::new(
        InstrumentId::new("ES").unwrap(),
        "E-mini S&P 500",
        Increment::new(dec!(0.25)).unwrap(),
        Increment::new(dec!(1)).unwrap(),
    ))
}

pub(crate) fn utc_24x7() -> Arc<TradingSessions> {
    Arc::new(TradingSessions::create_24x7(chrono_tz::UTC))
}

/// Two UTC sessions a weekday: 08:00-12:00 and 13:00-17:00.
pub(crate) fn split_calendar() -> Arc<TradingSessions> {
    let tow = |s: String| s.parse::<TimeOfWeek>().unwrap();
    let templates = [
        (Weekday::Mon, "Mon"),
        (Weekday::Tue, "Tue"),
        (Weekday::Wed, "Wed"),
        (Weekday::Thu, "Thu"),
        (Weekday::Fri, "Fri"),
    ]
    .into_iter()
    .flat_map(|(day, name)| {
        [
            TradingSessionTemplate::new(day, tow(format!("{name} 08:00")), tow(format!("{name} 12:00"))),
            TradingSessionTemplate::new(day, tow(format!("{name} 13:00")), tow(format!("{name} 17:00"))),
        ]
    })
    .collect();
    Arc::new(TradingSessions::new("split", chrono_tz::UTC, templates, Vec::new(), Vec::new()).unwrap())
}

pub(crate) fn es_info(period: Period, sessions: Arc<TradingSessions>) -> BarsInfo {
    BarsInfo::new(es(), period, sessions, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
}

pub(crate) fn tick(price: f64, timestamp: DateTime<Utc>) -> Tick {
    Tick::trade(InstrumentId::new("ES").unwrap(), price, 1.0, timestamp)
}
