//! Offsets from the start of the exchange week.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CalendarError;

const SECONDS_PER_DAY: u32 = 86_400;

const DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A point in the local exchange week, measured in whole seconds from
/// Sunday 00:00.
///
/// Serialised as `"Mon 09:30"`. `"Sat 24:00"` is the end of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfWeek(u32);

impl TimeOfWeek {
    /// Sunday 00:00.
    pub const START_OF_WEEK: Self = Self(0);

    /// The following Sunday 00:00.
    pub const END_OF_WEEK: Self = Self(7 * SECONDS_PER_DAY);

    /// Creates a time of week from a day and a local time of day.
    #[must_use]
    pub fn new(day: Weekday, time: NaiveTime) -> Self {
        Self(day.num_days_from_sunday() * SECONDS_PER_DAY + time.num_seconds_from_midnight())
    }

    /// Creates a time of week from seconds since Sunday 00:00.
    #[must_use]
    pub const fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds <= Self::END_OF_WEEK.0 {
            Some(Self(seconds))
        } else {
            None
        }
    }

    /// Seconds since Sunday 00:00.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// The offset from the start of the week.
    #[must_use]
    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.0))
    }
}

/// Returns the Sunday starting the week that contains `date`.
#[must_use]
pub fn week_floor(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Returns the offset of `local` from the start of its week, with
/// sub-second precision.
#[must_use]
pub fn offset_into_week(local: NaiveDateTime) -> TimeDelta {
    local - week_floor(local.date()).and_time(NaiveTime::MIN)
}

impl std::fmt::Display for TimeOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::END_OF_WEEK {
            return f.write_str("Sat 24:00");
        }
        let day = DAYS[(self.0 / SECONDS_PER_DAY) as usize];
        let rem = self.0 % SECONDS_PER_DAY;
        let (h, m, s) = (rem / 3600, rem % 3600 / 60, rem % 60);
        if s == 0 {
            write!(f, "{day} {h:02}:{m:02}")
        } else {
            write!(f, "{day} {h:02}:{m:02}:{s:02}")
        }
    }
}

impl FromStr for TimeOfWeek {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CalendarError::InvalidTimeOfWeek(s.to_string());
        let (day, time) = s.trim().split_once(char::is_whitespace).ok_or_else(err)?;
        let day = Weekday::from_str(day).map_err(|_| err())?;

        let mut parts = time.trim().split(':').map(str::parse::<u32>);
        let hour = parts.next().ok_or_else(err)?.map_err(|_| err())?;
        let minute = parts.next().ok_or_else(err)?.map_err(|_| err())?;
        let second = parts.next().transpose().map_err(|_| err())?.unwrap_or(0);
        if parts.next().is_some() || minute > 59 || second > 59 || hour > 24 {
            return Err(err());
        }
        if hour == 24 && (minute != 0 || second != 0) {
            return Err(err());
        }

        let seconds = day.num_days_from_sunday() * SECONDS_PER_DAY + hour * 3600 + minute * 60 + second;
        Self::from_seconds(seconds).ok_or_else(err)
    }
}

impl TryFrom<String> for TimeOfWeek {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfWeek> for String {
    fn from(value: TimeOfWeek) -> Self {
        value.to_string()
    }
}
