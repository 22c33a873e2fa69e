//! Weekly trading calendars.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::time_of_week::{offset_into_week, week_floor};
use crate::{CalendarError, Holiday, PartialHoliday, Result, Session, TimeOfWeek, TradingSessionTemplate};

/// A concrete occurrence of a session template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActualTradingSession {
    /// The template this session was generated from.
    pub template: TradingSessionTemplate,
    /// Exchange date of the session.
    pub session_date: NaiveDate,
    /// Session start (exclusive).
    pub start: DateTime<Utc>,
    /// Session end (inclusive).
    pub end: DateTime<Utc>,
    /// Time zone of the calendar.
    pub time_zone: Tz,
}

impl ActualTradingSession {
    /// Returns true if this session is in a different week than `previous`.
    #[must_use]
    pub fn is_new_week(&self, previous: &Self) -> bool {
        week_floor(self.session_date) != week_floor(previous.session_date)
    }

    /// Returns true if this session is on a different exchange day than
    /// `previous`.
    #[must_use]
    pub fn is_new_exchange_day(&self, previous: &Self) -> bool {
        self.session_date != previous.session_date
    }

    /// Length of the session.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl Session for ActualTradingSession {
    fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// A trading calendar: weekly session templates plus full and partial
/// holidays, in one time zone.
///
/// Always valid once constructed. Deserialisation runs the same checks as
/// [`TradingSessions::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TradingSessionsDef")]
pub struct TradingSessions {
    name: String,
    time_zone: Tz,
    templates: Vec<TradingSessionTemplate>,
    holidays: Vec<Holiday>,
    partial_holidays: Vec<PartialHoliday>,
}

#[derive(Deserialize)]
struct TradingSessionsDef {
    name: String,
    time_zone: Tz,
    templates: Vec<TradingSessionTemplate>,
    #[serde(default)]
    holidays: Vec<Holiday>,
    #[serde(default)]
    partial_holidays: Vec<PartialHoliday>,
}

impl TryFrom<TradingSessionsDef> for TradingSessions {
    type Error = CalendarError;

    fn try_from(def: TradingSessionsDef) -> Result<Self> {
        Self::new(def.name, def.time_zone, def.templates, def.holidays, def.partial_holidays)
    }
}

impl TradingSessions {
    /// Creates and validates a calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no templates, a template is empty,
    /// templates overlap or are out of order, or holidays collide on a date.
    pub fn new(
        name: impl Into<String>,
        time_zone: Tz,
        templates: Vec<TradingSessionTemplate>,
        holidays: Vec<Holiday>,
        partial_holidays: Vec<PartialHoliday>,
    ) -> Result<Self> {
        let sessions = Self {
            name: name.into(),
            time_zone,
            templates,
            holidays,
            partial_holidays,
        };
        sessions.validate()?;
        Ok(sessions)
    }

    /// A calendar trading around the clock, one session per calendar day.
    #[must_use]
    pub fn create_24x7(time_zone: Tz) -> Self {
        const DAYS: [Weekday; 7] = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        let day = TimeOfWeek::END_OF_WEEK.seconds() / 7;
        let templates = DAYS
            .iter()
            .zip(0u32..)
            .filter_map(|(&exchange_day, i)| {
                let start = TimeOfWeek::from_seconds(i * day)?;
                let end = TimeOfWeek::from_seconds((i + 1) * day)?;
                Some(TradingSessionTemplate::new(exchange_day, start, end))
            })
            .collect();
        Self {
            name: format!("24 x 7 {}", time_zone.name()),
            time_zone,
            templates,
            holidays: Vec::new(),
            partial_holidays: Vec::new(),
        }
    }

    /// Parses and validates a calendar from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Json`] for malformed JSON or an invalid
    /// calendar.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the calendar for configuration mistakes.
    ///
    /// # Errors
    ///
    /// See [`TradingSessions::new`].
    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(CalendarError::NoSessions);
        }
        for (index, template) in self.templates.iter().enumerate() {
            if template.end <= template.start {
                return Err(CalendarError::EmptyTemplate { index });
            }
        }
        for (index, pair) in self.templates.windows(2).enumerate() {
            let (previous, template) = (&pair[0], &pair[1]);
            if template.start < previous.end {
                return Err(CalendarError::OverlappingTemplates { index: index + 1 });
            }
            if template.exchange_day.num_days_from_sunday() < previous.exchange_day.num_days_from_sunday() {
                return Err(CalendarError::ExchangeDayOutOfOrder { index: index + 1 });
            }
        }

        let mut full = HashSet::new();
        for holiday in &self.holidays {
            if !full.insert(holiday.session_date) {
                return Err(CalendarError::DuplicateHoliday(holiday.session_date));
            }
        }
        let mut partial = HashSet::new();
        for holiday in &self.partial_holidays {
            if !partial.insert(holiday.session_date) {
                return Err(CalendarError::DuplicatePartialHoliday(holiday.session_date));
            }
            if full.contains(&holiday.session_date) {
                return Err(CalendarError::ConflictingHolidays(holiday.session_date));
            }
        }
        Ok(())
    }

    /// Returns the calendar name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the calendar time zone.
    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Returns the weekly session templates in order.
    #[must_use]
    pub fn templates(&self) -> &[TradingSessionTemplate] {
        &self.templates
    }

    /// Returns the full holidays.
    #[must_use]
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns the partial holidays.
    #[must_use]
    pub fn partial_holidays(&self) -> &[PartialHoliday] {
        &self.partial_holidays
    }

    /// Returns the session active at `at`, or the next session if none is.
    #[must_use]
    pub fn session_at(&self, at: DateTime<Utc>) -> ActualTradingSession {
        let local = at.with_timezone(&self.time_zone).naive_local();
        let mut week_start = week_floor(local.date());
        let offset = offset_into_week(local);
        let mut index = self
            .templates
            .iter()
            .position(|t| t.end.as_delta() >= offset)
            .unwrap_or(self.templates.len());

        loop {
            if index == self.templates.len() {
                index = 0;
                week_start = week_start + Days::new(7);
            }
            if let Some(session) = self.materialize(week_start, &self.templates[index]) {
                return session;
            }
            index += 1;
        }
    }

    /// Returns the session following `session`.
    #[must_use]
    pub fn next_session_after(&self, session: &ActualTradingSession) -> ActualTradingSession {
        self.session_at(session.end + TimeDelta::nanoseconds(1))
    }

    /// Builds the session for `template` in the week starting `week_start`,
    /// or `None` when a holiday cancels it.
    fn materialize(&self, week_start: NaiveDate, template: &TradingSessionTemplate) -> Option<ActualTradingSession> {
        let session_date = week_start + Days::new(u64::from(template.exchange_day.num_days_from_sunday()));

        if self.holidays.iter().any(|h| h.session_date == session_date) {
            debug!(%session_date, calendar = %self.name, "Skipping session on holiday");
            return None;
        }

        let (start, end) = match self.partial_holidays.iter().find(|h| h.session_date == session_date) {
            Some(partial) => match partial.apply(template) {
                Some(bounds) => bounds,
                None => {
                    debug!(%session_date, calendar = %self.name, "Partial holiday voids session");
                    return None;
                }
            },
            None => (template.start, template.end),
        };

        let week_start = week_start.and_time(NaiveTime::MIN);
        Some(ActualTradingSession {
            template: *template,
            session_date,
            start: self.to_utc(week_start + start.as_delta()),
            end: self.to_utc(week_start + end.as_delta()),
            time_zone: self.time_zone,
        })
    }

    /// Converts a local wall-clock time to UTC.
    ///
    /// Ambiguous times resolve to the earlier instant. Times skipped by a
    /// forward clock change use the offset in effect before the change.
    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        if let Some(t) = local.and_local_timezone(self.time_zone).earliest() {
            return t.with_timezone(&Utc);
        }
        let shift = TimeDelta::hours(3);
        match (local - shift).and_local_timezone(self.time_zone).earliest() {
            Some(t) => t.with_timezone(&Utc) + shift,
            None => local.and_utc(),
        }
    }
}
