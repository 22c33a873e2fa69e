//! Session and session-iterator abstractions.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// A contiguous trading interval, exclusive of its start and inclusive of
/// its end.
pub trait Session {
    /// Exchange date the session belongs to.
    fn session_date(&self) -> NaiveDate;

    /// Session start (exclusive).
    fn start(&self) -> DateTime<Utc>;

    /// Session end (inclusive).
    fn end(&self) -> DateTime<Utc>;

    /// Returns true if `at` lies inside the session.
    fn contains(&self, at: DateTime<Utc>) -> bool {
        at > self.start() && at <= self.end()
    }
}

/// Forward-only cursor over a sequence of sessions.
///
/// A call to [`move_until`](Self::move_until) with a time past the end of
/// the current session advances until the current session ends at or after
/// that time. Between sessions the iterator already points at the upcoming
/// session, reporting [`is_new_session`](Self::is_new_session) on the move
/// that advanced it and [`is_first_tick_of_session`](Self::is_first_tick_of_session)
/// on the first move past its start.
pub trait SessionIterator {
    /// Session type produced by this iterator.
    type Session: Session;

    /// Time zone the sessions are defined in.
    fn time_zone(&self) -> Tz;

    /// The session before the current one, if there is one.
    fn previous_session(&self) -> Option<&Self::Session>;

    /// The active or upcoming session.
    fn current_session(&self) -> &Self::Session;

    /// The session after the current one, if there is one.
    fn next_session(&self) -> Option<&Self::Session>;

    /// True when the last move advanced to a new session.
    fn is_new_session(&self) -> bool;

    /// True when the current time is inside the current session.
    fn is_in_session(&self) -> bool;

    /// True on the first move into the current session.
    fn is_first_tick_of_session(&self) -> bool;

    /// The time of the last move.
    fn current_time(&self) -> DateTime<Utc>;

    /// Advances the iterator to `until`.
    ///
    /// # Panics
    ///
    /// Implementations panic when `until` is before the time of the previous
    /// move.
    fn move_until(&mut self, until: DateTime<Utc>);
}
