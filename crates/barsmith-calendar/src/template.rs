//! Weekly session templates and holiday exceptions.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::TimeOfWeek;

/// One weekly recurring trading session in the calendar's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingSessionTemplate {
    /// Exchange day the session belongs to. An evening session may start on
    /// the day before its exchange day.
    pub exchange_day: Weekday,
    /// Session start, exclusive.
    pub start: TimeOfWeek,
    /// Session end, inclusive.
    pub end: TimeOfWeek,
}

impl TradingSessionTemplate {
    /// Creates a template.
    #[must_use]
    pub const fn new(exchange_day: Weekday, start: TimeOfWeek, end: TimeOfWeek) -> Self {
        Self {
            exchange_day,
            start,
            end,
        }
    }
}

/// A date on which every session is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    /// Exchange date of the cancelled sessions.
    pub session_date: NaiveDate,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Holiday {
    /// Creates a holiday.
    #[must_use]
    pub fn new(session_date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            session_date,
            name: name.into(),
        }
    }
}

/// How a partial holiday changes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialHolidayKind {
    /// Trading starts later than usual.
    LateStart,
    /// Trading ends earlier than usual.
    EarlyEnd,
}

/// A date on which sessions open late or close early.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialHoliday {
    /// Exchange date of the affected sessions.
    pub session_date: NaiveDate,
    /// Whether the start or the end moves.
    pub kind: PartialHolidayKind,
    /// The replacement boundary, as an offset into the session's week.
    pub time_of_week: TimeOfWeek,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl PartialHoliday {
    /// Creates a late-start partial holiday.
    #[must_use]
    pub fn late_start(session_date: NaiveDate, time_of_week: TimeOfWeek, name: impl Into<String>) -> Self {
        Self {
            session_date,
            kind: PartialHolidayKind::LateStart,
            time_of_week,
            name: name.into(),
        }
    }

    /// Creates an early-end partial holiday.
    #[must_use]
    pub fn early_end(session_date: NaiveDate, time_of_week: TimeOfWeek, name: impl Into<String>) -> Self {
        Self {
            session_date,
            kind: PartialHolidayKind::EarlyEnd,
            time_of_week,
            name: name.into(),
        }
    }

    /// Applies this partial holiday to a template's boundaries.
    ///
    /// Returns the adjusted `(start, end)`, or `None` when the session is
    /// wiped out entirely.
    #[must_use]
    pub fn apply(&self, template: &TradingSessionTemplate) -> Option<(TimeOfWeek, TimeOfWeek)> {
        let boundary = self.time_of_week;
        match self.kind {
            PartialHolidayKind::LateStart => {
                if boundary >= template.end {
                    None
                } else {
                    Some((boundary.max(template.start), template.end))
                }
            }
            PartialHolidayKind::EarlyEnd => {
                if boundary <= template.start {
                    None
                } else {
                    Some((template.start, boundary.min(template.end)))
                }
            }
        }
    }
}
