//! Bar stores and time-indexed search for barsmith.
//!
//! - [`Bars`] and [`LimitedLookBackBars`] - append-only bar stores
//! - [`BarSeries`] / [`BarSeriesMut`] - read and builder-only write access
//! - [`TimestampSearch`] - interpolation search over any [`TimestampSeries`]
//! - [`BarPositions`] - relocating a bar across series of different periods
//!
//! # Example
//!
//! ```
//! use barsmith_series::{BarSeries, BarSeriesMut, Bars, SeriesIndex, TimestampSearch};
//! use barsmith_types::Bar;
//! use chrono::{TimeDelta, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
//! let mut bars = Bars::new();
//! for i in 0..10 {
//!     bars.add(Bar::from_price(100.0 + i as f64, 1.0, start + TimeDelta::minutes(i)));
//! }
//!
//! assert_eq!(bars.close(SeriesIndex::FromEnd(1)), Some(109.0));
//! let found = bars.find_at_or_before(start + TimeDelta::seconds(150)).unwrap();
//! assert_eq!(found.last_index, 2);
//! assert!(!found.is_exact);
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bars;
mod info;
mod position;
mod search;

pub use bars::{
    BarSeries, BarSeriesMut, Bars, DEFAULT_MAX_LOOKBACK, FieldView, LimitedLookBackBars, SeriesIndex,
};
pub use info::BarsInfo;
pub use position::{BarPositionDescriptor, BarPositions, NthClose, PositionMatch};
pub use search::{SearchMatch, TimestampSearch, TimestampSeries, Timestamped};
