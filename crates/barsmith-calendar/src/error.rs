//! Error types for calendar construction.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for calendar operations.
pub type Result<T> = std::result::Result<T, CalendarError>;

/// Errors raised while building or loading a trading calendar.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The calendar has no session templates.
    #[error("A trading calendar needs at least one session template")]
    NoSessions,

    /// A template ends at or before its start.
    #[error("Session template {index} ends at or before its start")]
    EmptyTemplate {
        /// Position of the template.
        index: usize,
    },

    /// A template starts before the previous template ends.
    #[error("Session template {index} starts before the previous template ends")]
    OverlappingTemplates {
        /// Position of the template.
        index: usize,
    },

    /// Template exchange days are not in ascending order.
    #[error("Session template {index} has an exchange day before the previous template's")]
    ExchangeDayOutOfOrder {
        /// Position of the template.
        index: usize,
    },

    /// Two full holidays share a date.
    #[error("More than one holiday on {0}")]
    DuplicateHoliday(NaiveDate),

    /// Two partial holidays share a date.
    #[error("More than one partial holiday on {0}")]
    DuplicatePartialHoliday(NaiveDate),

    /// A date has both a full and a partial holiday.
    #[error("Both a holiday and a partial holiday on {0}")]
    ConflictingHolidays(NaiveDate),

    /// A time-of-week string could not be parsed.
    #[error("Invalid time of week '{0}', expected e.g. 'Mon 09:30' or 'Sat 24:00'")]
    InvalidTimeOfWeek(String),

    /// The instrument has no settlement time.
    #[error("Instrument {0} has no settlement time")]
    MissingSettlementTime(String),

    /// The settlement time is midnight, which cannot delimit a trading day.
    #[error("Settlement at midnight is not supported for instrument {0}")]
    MidnightSettlement(String),

    /// A settlement session was requested for a non-trading day.
    #[error("{0} is not a trading day")]
    NotATradingDay(NaiveDate),

    /// No calendar is registered under the requested id.
    #[error("Unknown calendar: {0}")]
    UnknownCalendar(String),

    /// The calendar JSON could not be parsed.
    #[error("Invalid calendar JSON: {0}")]
    Json(#[from] serde_json::Error),
}
