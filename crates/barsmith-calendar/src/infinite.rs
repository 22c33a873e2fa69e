//! A single session covering all of time.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{Session, SessionIterator};

/// The unbounded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InfiniteSession;

impl Session for InfiniteSession {
    fn session_date(&self) -> NaiveDate {
        NaiveDate::MIN
    }

    fn start(&self) -> DateTime<Utc> {
        DateTime::<Utc>::MIN_UTC
    }

    fn end(&self) -> DateTime<Utc> {
        DateTime::<Utc>::MAX_UTC
    }
}

/// Iterator over [`InfiniteSession`]: always in session, never a new one.
#[derive(Debug, Clone, Copy)]
pub struct InfiniteSessionIterator {
    current_time: DateTime<Utc>,
}

impl InfiniteSessionIterator {
    /// Creates the iterator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_time: DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl Default for InfiniteSessionIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionIterator for InfiniteSessionIterator {
    type Session = InfiniteSession;

    fn time_zone(&self) -> Tz {
        Tz::UTC
    }

    fn previous_session(&self) -> Option<&InfiniteSession> {
        None
    }

    fn current_session(&self) -> &InfiniteSession {
        &InfiniteSession
    }

    fn next_session(&self) -> Option<&InfiniteSession> {
        None
    }

    fn is_new_session(&self) -> bool {
        false
    }

    fn is_in_session(&self) -> bool {
        true
    }

    fn is_first_tick_of_session(&self) -> bool {
        false
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_always_in_session() {
        let mut it = InfiniteSessionIterator::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        it.move_until(t);
        assert!(it.is_in_session());
        assert!(!it.is_new_session());
        assert!(!it.is_first_tick_of_session());
        assert!(it.current_session().contains(t));
        assert!(it.previous_session().is_none());
        assert_eq!(it.current_time(), t);
    }
}
