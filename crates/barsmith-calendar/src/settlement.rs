//! Settlement-to-settlement sessions.
//!
//! Each session runs from one trading day's settlement to the next trading
//! day's settlement, so every instant belongs to exactly one session.

use barsmith_types::{Instrument, SettlementTime};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::{CalendarError, Result, Session, SessionIterator};

/// One settlement-to-settlement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettlementSession {
    /// Trading day that settles at the end of the session.
    pub session_date: NaiveDate,
    /// Previous trading day's settlement (exclusive).
    pub start: DateTime<Utc>,
    /// This trading day's settlement (inclusive).
    pub end: DateTime<Utc>,
}

impl Session for SettlementSession {
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

/// Settlement sessions of one instrument.
#[derive(Debug, Clone)]
pub struct SettlementSessions {
    instrument: Arc<Instrument>,
    settlement: SettlementTime,
}

impl SettlementSessions {
    /// Creates the settlement calendar of `instrument`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument has no settlement time or settles
    /// at midnight.
    pub fn new(instrument: Arc<Instrument>) -> Result<Self> {
        let settlement = instrument
            .settlement()
            .ok_or_else(|| CalendarError::MissingSettlementTime(instrument.id().to_string()))?;
        if settlement.time == NaiveTime::MIN {
            return Err(CalendarError::MidnightSettlement(instrument.id().to_string()));
        }
        Ok(Self {
            instrument,
            settlement,
        })
    }

    /// Returns the instrument.
    #[must_use]
    pub const fn instrument(&self) -> &Arc<Instrument> {
        &self.instrument
    }

    /// Returns the session that settles on `session_date`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NotATradingDay`] if `session_date` is not a
    /// trading day of the instrument.
    pub fn session_on(&self, session_date: NaiveDate) -> Result<SettlementSession> {
        if !self.instrument.is_trading_day(session_date) {
            return Err(CalendarError::NotATradingDay(session_date));
        }
        let start_date = self.instrument.this_or_previous_trading_day(previous_day(session_date));
        Ok(self.build(session_date, start_date))
    }

    /// Returns the session containing `at`.
    #[must_use]
    pub fn session_at(&self, at: DateTime<Utc>) -> SettlementSession {
        let local = at.with_timezone(&self.settlement.time_zone).naive_local();
        let date = if local.time() <= self.settlement.time {
            local.date()
        } else {
            next_day(local.date())
        };
        self.settled_on(self.instrument.this_or_next_trading_day(date))
    }

    /// Returns the session after `session`.
    #[must_use]
    pub fn next_after(&self, session: &SettlementSession) -> SettlementSession {
        self.settled_on(self.instrument.this_or_next_trading_day(next_day(session.session_date)))
    }

    /// Returns the session before `session`.
    #[must_use]
    pub fn previous_before(&self, session: &SettlementSession) -> SettlementSession {
        self.settled_on(self.instrument.this_or_previous_trading_day(previous_day(session.session_date)))
    }

    /// Builds the session for a date already known to be a trading day.
    fn settled_on(&self, session_date: NaiveDate) -> SettlementSession {
        let start_date = self.instrument.this_or_previous_trading_day(previous_day(session_date));
        self.build(session_date, start_date)
    }

    fn build(&self, session_date: NaiveDate, start_date: NaiveDate) -> SettlementSession {
        SettlementSession {
            session_date,
            start: self.settlement_instant(start_date),
            end: self.settlement_instant(session_date),
        }
    }

    fn settlement_instant(&self, date: NaiveDate) -> DateTime<Utc> {
        let local = date.and_time(self.settlement.time);
        match local.and_local_timezone(self.settlement.time_zone).earliest() {
            Some(t) => t.with_timezone(&Utc),
            None => {
                let shift = TimeDelta::hours(3);
                (local - shift)
                    .and_local_timezone(self.settlement.time_zone)
                    .earliest()
                    .map_or_else(|| local.and_utc(), |t| t.with_timezone(&Utc) + shift)
            }
        }
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Iterates settlement sessions. Always in session; every settlement starts
/// a new session.
#[derive(Debug, Clone)]
pub struct SettlementSessionIterator {
    sessions: SettlementSessions,
    previous: SettlementSession,
    current: SettlementSession,
    next: SettlementSession,
    current_time: DateTime<Utc>,
    is_new_session: bool,
}

impl SettlementSessionIterator {
    /// Creates an iterator expecting its first move on or after
    /// `approximate_first_move`.
    #[must_use]
    pub fn new(sessions: SettlementSessions, approximate_first_move: NaiveDate) -> Self {
        let seed_date = approximate_first_move
            .checked_sub_days(Days::new(10))
            .unwrap_or(approximate_first_move);
        let current = sessions.settled_on(sessions.instrument.this_or_previous_trading_day(seed_date));
        let mut iterator = Self {
            previous: sessions.previous_before(&current),
            next: sessions.next_after(&current),
            current_time: current.start,
            current,
            is_new_session: false,
            sessions,
        };
        iterator.move_until(current.start + TimeDelta::nanoseconds(1));
        iterator
    }

    fn advance(&mut self) {
        self.previous = self.current;
        self.current = self.next;
        self.next = self.sessions.next_after(&self.current);
    }
}

impl SessionIterator for SettlementSessionIterator {
    type Session = SettlementSession;

    fn time_zone(&self) -> Tz {
        self.sessions.settlement.time_zone
    }

    fn previous_session(&self) -> Option<&SettlementSession> {
        Some(&self.previous)
    }

    fn current_session(&self) -> &SettlementSession {
        &self.current
    }

    fn next_session(&self) -> Option<&SettlementSession> {
        Some(&self.next)
    }

    fn is_new_session(&self) -> bool {
        self.is_new_session
    }

    fn is_in_session(&self) -> bool {
        true
    }

    fn is_first_tick_of_session(&self) -> bool {
        self.is_new_session
    }

    fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    fn move_until(&mut self, until: DateTime<Utc>) {
        assert!(
            until >= self.current_time,
            "session iterator moved backwards from {} to {until}",
            self.current_time
        );
        self.current_time = until;
        if until <= self.current.end {
            self.is_new_session = false;
        } else {
            while until > self.current.end {
                self.advance();
            }
            self.is_new_session = true;
        }
    }
}
