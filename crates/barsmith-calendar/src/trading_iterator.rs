//! Calendar-driven session iterator.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::trace;

use crate::{ActualTradingSession, Session, SessionIterator, TradingSessions};

/// Days looked back from the approximate first move when seeding.
const SEED_LOOKBACK_DAYS: u64 = 12;

/// Weeks searched backwards for the session preceding the seed session.
const PREVIOUS_LOOKBACK_WEEKS: usize = 8;

/// Walks the sessions of a [`TradingSessions`] calendar.
///
/// Seeded from a date roughly twelve days before the approximate time of the
/// first move, so the first move only advances over a handful of sessions.
/// The first move always reports a new session.
#[derive(Debug, Clone)]
pub struct TradingSessionIterator {
    sessions: Arc<TradingSessions>,
    previous: ActualTradingSession,
    current: ActualTradingSession,
    next: ActualTradingSession,
    current_time: DateTime<Utc>,
    started: bool,
    is_new_session: bool,
    is_in_session: bool,
    is_first_tick_of_session: bool,
}

impl TradingSessionIterator {
    /// Creates an iterator expecting its first move on or after
    /// `approximate_first_move`.
    ///
    /// Moves earlier than twelve days before that date panic.
    #[must_use]
    pub fn new(sessions: Arc<TradingSessions>, approximate_first_move: NaiveDate) -> Self {
        let seed = approximate_first_move
            .checked_sub_days(Days::new(SEED_LOOKBACK_DAYS))
            .unwrap_or(approximate_first_move)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let current = sessions.session_at(seed);
        let next = sessions.next_session_after(&current);
        let previous = session_before(&sessions, &current);
        Self {
            previous,
            current,
            next,
            current_time: seed,
            started: false,
            is_new_session: false,
            is_in_session: false,
            is_first_tick_of_session: false,
            sessions,
        }
    }

    /// Returns the calendar being walked.
    #[must_use]
    pub fn sessions(&self) -> &Arc<TradingSessions> {
        &self.sessions
    }

    /// The session before the current one.
    #[must_use]
    pub const fn previous(&self) -> &ActualTradingSession {
        &self.previous
    }

    /// The active or upcoming session.
    #[must_use]
    pub const fn current(&self) -> &ActualTradingSession {
        &self.current
    }

    /// The session after the current one.
    #[must_use]
    pub const fn next(&self) -> &ActualTradingSession {
        &self.next
    }

    fn advance(&mut self) {
        let next = self.sessions.next_session_after(&self.next);
        self.previous = std::mem::replace(&mut self.current, std::mem::replace(&mut self.next, next));
        trace!(
            session_date = %self.current.session_date,
            start = %self.current.start,
            end = %self.current.end,
            "Advanced to session"
        );
    }
}

impl SessionIterator for TradingSessionIterator {
    type Session = ActualTradingSession;

    fn time_zone(&self) -> Tz {
        self.sessions.time_zone()
    }

    fn previous_session(&self) -> Option<&ActualTradingSession> {
        Some(&self.previous)
    }

    fn current_session(&self) -> &ActualTradingSession {
        &self.current
    }

    fn next_session(&self) -> Option<&ActualTradingSession> {
        Some(&self.next)
    }

    fn is_new_session(&self) -> bool {
        self.is_new_session
    }

    fn is_in_session(&self) -> bool {
        self.is_in_session
    }

    fn is_first_tick_of_session(&self) -> bool {
        self.is_first_tick_of_session
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

        if until <= self.current.end() && self.started {
            self.is_new_session = false;
            if until > self.current.start() {
                self.is_first_tick_of_session = !self.is_in_session;
                self.is_in_session = true;
            } else {
                self.is_in_session = false;
                self.is_first_tick_of_session = false;
            }
        } else {
            while until > self.current.end() {
                self.advance();
            }
            self.started = true;
            self.is_new_session = true;
            self.is_in_session = until > self.current.start();
            self.is_first_tick_of_session = self.is_in_session;
        }
    }
}

/// Finds the last session starting before `session`, or `session` itself
/// when the calendar has none within the look-back.
fn session_before(
    sessions: &TradingSessions,
    session: &ActualTradingSession,
) -> ActualTradingSession {
    let mut earlier = session.clone();
    let mut look_from = session.start;
    for _ in 0..PREVIOUS_LOOKBACK_WEEKS {
        let Some(at) = look_from.checked_sub_signed(TimeDelta::weeks(1)) else {
            break;
        };
        look_from = at;
        let candidate = sessions.session_at(at);
        if candidate.start < session.start {
            earlier = candidate;
            break;
        }
    }
    if earlier == *session {
        return earlier;
    }
    loop {
        let next = sessions.next_session_after(&earlier);
        if next.start >= session.start {
            return earlier;
        }
        earlier = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TimeOfWeek, TradingSessionTemplate};
    use chrono::{TimeZone, Weekday};

    fn tow(s: &str) -> TimeOfWeek {
        s.parse().unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    /// Two UTC sessions a day with a gap between them, Monday to Friday.
    fn split_calendar() -> Arc<TradingSessions> {
        let days = [
            (Weekday::Mon, "Mon"),
            (Weekday::Tue, "Tue"),
            (Weekday::Wed, "Wed"),
            (Weekday::Thu, "Thu"),
            (Weekday::Fri, "Fri"),
        ];
        let templates = days
            .into_iter()
            .flat_map(|(day, s)| {
                [
                    TradingSessionTemplate::new(day, tow(&format!("{s} 08:00")), tow(&format!("{s} 12:00"))),
                    TradingSessionTemplate::new(day, tow(&format!("{s} 13:00")), tow(&format!("{s} 17:00"))),
                ]
            })
            .collect();
        Arc::new(TradingSessions::new("split", chrono_tz::UTC, templates, vec![], vec![]).unwrap())
    }

    fn iterator() -> TradingSessionIterator {
        TradingSessionIterator::new(split_calendar(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    #[test]
    fn test_first_move_in_session() {
        let mut it = iterator();
        it.move_until(utc(2024, 1, 2, 9, 0));
        assert!(it.is_new_session());
        assert!(it.is_in_session());
        assert!(it.is_first_tick_of_session());
        assert_eq!(it.current().start, utc(2024, 1, 2, 8, 0));
        assert_eq!(it.previous().end, utc(2024, 1, 1, 17, 0));
        assert_eq!(it.next().start, utc(2024, 1, 2, 13, 0));

        it.move_until(utc(2024, 1, 2, 9, 1));
        assert!(!it.is_new_session());
        assert!(it.is_in_session());
        assert!(!it.is_first_tick_of_session());
    }

    #[test]
    fn test_gap_between_sessions() {
        let mut it = iterator();
        it.move_until(utc(2024, 1, 2, 11, 0));

        // Past the end of the morning session, before the afternoon start
        it.move_until(utc(2024, 1, 2, 12, 30));
        assert!(it.is_new_session());
        assert!(!it.is_in_session());
        assert!(!it.is_first_tick_of_session());
        assert_eq!(it.current().start, utc(2024, 1, 2, 13, 0));

        it.move_until(utc(2024, 1, 2, 12, 45));
        assert!(!it.is_new_session());
        assert!(!it.is_in_session());

        it.move_until(utc(2024, 1, 2, 13, 0) + TimeDelta::seconds(1));
        assert!(!it.is_new_session());
        assert!(it.is_in_session());
        assert!(it.is_first_tick_of_session());
    }

    #[test]
    fn test_start_exclusive_end_inclusive() {
        let mut it = iterator();
        it.move_until(utc(2024, 1, 2, 8, 0));
        assert!(it.is_new_session());
        assert!(!it.is_in_session());

        it.move_until(utc(2024, 1, 2, 12, 0));
        assert!(it.is_in_session());
        assert!(it.is_first_tick_of_session());
        assert_eq!(it.current().end, utc(2024, 1, 2, 12, 0));
    }

    #[test]
    fn test_jump_over_several_sessions() {
        let mut it = iterator();
        it.move_until(utc(2024, 1, 2, 9, 0));
        it.move_until(utc(2024, 1, 4, 14, 0));
        assert!(it.is_new_session());
        assert!(it.is_first_tick_of_session());
        assert_eq!(it.current().start, utc(2024, 1, 4, 13, 0));
        assert_eq!(it.previous().start, utc(2024, 1, 4, 8, 0));
    }

    #[test]
    fn test_first_tick_once_per_entered_session() {
        let mut it = iterator();
        let mut firsts = 0;
        let mut t = utc(2024, 1, 1, 0, 0);
        while t < utc(2024, 1, 6, 0, 0) {
            it.move_until(t);
            if it.is_first_tick_of_session() {
                firsts += 1;
                assert!(it.is_in_session());
            }
            assert_eq!(it.is_in_session(), it.current().contains(t));
            t += TimeDelta::minutes(7);
        }
        // Ten sessions from Monday to Friday
        assert_eq!(firsts, 10);
    }

    #[test]
    fn test_seeded_previous_is_an_earlier_session() {
        // Seeds on Friday 2023-12-29, whose morning session is current
        let it = TradingSessionIterator::new(
            split_calendar(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        assert_eq!(it.current().start, utc(2023, 12, 29, 8, 0));
        assert_ne!(it.previous(), it.current());
        assert_eq!(it.previous().start, utc(2023, 12, 28, 13, 0));
        assert_eq!(it.previous().end, utc(2023, 12, 28, 17, 0));
    }

    #[test]
    fn test_first_move_inside_seed_session_keeps_previous() {
        let mut it = TradingSessionIterator::new(
            split_calendar(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        it.move_until(utc(2023, 12, 29, 9, 0));
        assert!(it.is_first_tick_of_session());
        assert_eq!(it.current().start, utc(2023, 12, 29, 8, 0));
        assert_eq!(it.previous().end, utc(2023, 12, 28, 17, 0));
    }

    #[test]
    #[should_panic(expected = "moved backwards")]
    fn test_decreasing_time_panics() {
        let mut it = iterator();
        it.move_until(utc(2024, 1, 2, 9, 0));
        it.move_until(utc(2024, 1, 2, 8, 59));
    }
}
