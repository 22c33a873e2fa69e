//! Tick-to-bar builders for barsmith.
//!
//! Every builder gates ticks through a trading calendar, dropping ticks of
//! other instruments and ticks outside sessions, and restarts its bar state
//! at each session start:
//!
//! - [`TimeBarBuilder`] - second and minute bars aligned to the session start
//! - [`TickBarBuilder`] - bars of a fixed number of ticks
//! - [`RangeBarBuilder`] - bars of a fixed price range
//! - [`SwingBarBuilder`] - trend and reversal bars, optionally self-adjusting
//!
//! [`BarBuilder`] picks the builder for a [`Period`](barsmith_types::Period)
//! and [`BarsCache`] shares builders between consumers of the same series.
//!
//! # Example
//!
//! ```
//! use barsmith_aggregate::{BarBuilder, BarFormation};
//! use barsmith_calendar::CalendarRegistry;
//! use barsmith_series::{BarSeries, Bars, BarsInfo};
//! use barsmith_types::{Increment, Instrument, InstrumentId, Period, Tick};
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
//!     Period::Range { ticks: 4 },
//!     CalendarRegistry::global().require("cme-globex").unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
//! );
//!
//! let mut builder = BarBuilder::<Bars>::new(info).unwrap();
//! let start = Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap();
//! for (i, price) in [5000.0, 5000.5, 5001.25].into_iter().enumerate() {
//!     builder.on_tick(&Tick::trade(id.clone(), price, 1.0, start + TimeDelta::seconds(i as i64)));
//! }
//!
//! assert_eq!(builder.bars().count(), 2);
//! assert_eq!(builder.bars().high(0), Some(5001.0));
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod cache;
mod error;
mod formation;
mod gate;
mod range;
mod swing;
mod tick_count;
mod time;

#[cfg(test)]
mod testing;

pub use builder::BarBuilder;
pub use cache::BarsCache;
pub use error::{BuilderError, Result};
pub use formation::BarFormation;
pub use range::RangeBarBuilder;
pub use swing::SwingBarBuilder;
pub use tick_count::TickBarBuilder;
pub use time::TimeBarBuilder;
