//! Core types for the barsmith tick-to-bar aggregation engine.
//!
//! This crate provides the fundamental data structures shared by every
//! other barsmith crate:
//!
//! - [`Tick`] - A single trade print with price, quote and volume
//! - [`Bar`] - An OHLCV bar using the bar-close timestamp convention
//! - [`Instrument`] - Tradable instrument with increments and trading days
//! - [`Increment`] - Decimal-exact rounding to a price grid
//! - [`Period`] - Bar formation policy and its parameters
//! - [`Direction`] - Up, down or unknown price movement

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod direction;
mod error;
mod increment;
mod instrument;
mod period;
mod tick;

pub use bar::{Bar, BarField};
pub use direction::Direction;
pub use error::{PeriodParseError, Result, ValidationError};
pub use increment::Increment;
pub use instrument::{Instrument, InstrumentId, SettlementTime};
pub use period::Period;
pub use tick::Tick;
