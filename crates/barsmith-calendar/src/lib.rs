//! Trading calendars and session iterators for barsmith.
//!
//! A [`TradingSessions`] calendar describes a trading week as an ordered
//! list of [`TradingSessionTemplate`]s in one time zone, modified by full
//! [`Holiday`]s and [`PartialHoliday`]s. It materialises concrete
//! [`ActualTradingSession`]s on demand.
//!
//! A [`SessionIterator`] walks forward through sessions as ticks arrive and
//! reports whether each instant is inside a session:
//!
//! - [`TradingSessionIterator`] - sessions of a [`TradingSessions`] calendar
//! - [`SettlementSessionIterator`] - settlement-to-settlement sessions
//! - [`InfiniteSessionIterator`] - one session covering all of time
//!
//! # Example
//!
//! ```
//! use barsmith_calendar::{CalendarRegistry, SessionIterator, TradingSessionIterator};
//! use chrono::{NaiveDate, TimeZone, Utc};
//!
//! let calendar = CalendarRegistry::global().require("us-equities").unwrap();
//! let mut sessions = TradingSessionIterator::new(calendar, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
//!
//! sessions.move_until(Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap());
//! assert!(sessions.is_in_session());
//! assert!(sessions.is_first_tick_of_session());
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod infinite;
mod registry;
mod session;
mod sessions;
mod settlement;
mod template;
mod time_of_week;
mod trading_iterator;

pub use error::{CalendarError, Result};
pub use infinite::{InfiniteSession, InfiniteSessionIterator};
pub use registry::CalendarRegistry;
pub use session::{Session, SessionIterator};
pub use sessions::{ActualTradingSession, TradingSessions};
pub use settlement::{SettlementSession, SettlementSessionIterator, SettlementSessions};
pub use template::{Holiday, PartialHoliday, PartialHolidayKind, TradingSessionTemplate};
pub use time_of_week::{TimeOfWeek, offset_into_week, week_floor};
pub use trading_iterator::TradingSessionIterator;
