//! Tick-to-bar aggregation with trading calendars and time-indexed bar
//! series.
//!
//! This is a facade crate that re-exports functionality from the barsmith
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use barsmith_lib::prelude::*;
//! use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
//! use std::sync::Arc;
//!
//! let id = InstrumentId::new("ES").unwrap();
//! let es = Instrument::new(
//!     id.clone(),
//!     "E-mini S&P 500",
//!     Increment::from_f64(0.25).unwrap(),
//!     Increment::from_f64(1.0).unwrap(),
//! );
//! let info = BarsInfo::new(
//!     Arc::new(es),
//!     "m1".parse().unwrap(),
//!     CalendarRegistry::global().require("us-equities").unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
//! );
//!
//! let mut cache = BarsCache::<Bars>::new();
//! let builder = cache.get_or_create(&info).unwrap();
//! let open = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
//! for s in 1..=150 {
//!     builder.on_tick(&Tick::trade(id.clone(), 4700.0, 1.0, open + TimeDelta::seconds(s)));
//! }
//!
//! let bars = cache.bars(&info).unwrap();
//! assert_eq!(bars.count(), 3);
//! let found = bars.find_at(open + TimeDelta::minutes(2)).unwrap();
//! assert_eq!(found.first_index, 1);
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barsmith_types::*;

// Re-export calendars and session iterators
pub use barsmith_calendar::{
    ActualTradingSession, CalendarError, CalendarRegistry, Holiday, InfiniteSession,
    InfiniteSessionIterator, PartialHoliday, PartialHolidayKind, Session, SessionIterator,
    SettlementSession, SettlementSessionIterator, SettlementSessions, TimeOfWeek,
    TradingSessionIterator, TradingSessionTemplate, TradingSessions,
};

// Re-export bar stores and search
pub use barsmith_series::{
    BarPositionDescriptor, BarPositions, BarSeries, BarSeriesMut, Bars, BarsInfo,
    DEFAULT_MAX_LOOKBACK, FieldView, LimitedLookBackBars, NthClose, PositionMatch, SearchMatch,
    SeriesIndex, TimestampSearch, TimestampSeries, Timestamped,
};

// Re-export bar builders
#[cfg(feature = "aggregate")]
pub use barsmith_aggregate::{
    BarBuilder, BarFormation, BarsCache, BuilderError, RangeBarBuilder, SwingBarBuilder,
    TickBarBuilder, TimeBarBuilder,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barsmith_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barsmith_types::{
        Bar, BarField, Direction, Increment, Instrument, InstrumentId, Period, Tick,
        ValidationError,
    };

    pub use barsmith_calendar::{
        CalendarRegistry, Session, SessionIterator, TradingSessionIterator, TradingSessions,
    };

    pub use barsmith_series::{
        BarSeries, BarSeriesMut, Bars, BarsInfo, LimitedLookBackBars, SeriesIndex,
        TimestampSearch,
    };

    #[cfg(feature = "aggregate")]
    pub use barsmith_aggregate::{BarBuilder, BarFormation, BarsCache};
}
