//! Interpolation search over monotonic timestamp series.
//!
//! Every query walks outward from the matched index so that a result always
//! covers the whole run of entries sharing the matched timestamp.

use barsmith_types::{Bar, Tick};
use chrono::{DateTime, TimeDelta, Utc};
use std::ops::RangeInclusive;

/// Brackets at or below this size are finished with a linear scan.
const LINEAR_SCAN_THRESHOLD: usize = 32;

/// A series of non-decreasing timestamps addressed by absolute index.
///
/// Valid indices are `first_index()..len()`. Series that discard old
/// entries keep counting from the start, so `first_index` may be non-zero.
pub trait TimestampSeries {
    /// Total number of entries ever held, including discarded ones.
    fn len(&self) -> usize;

    /// Smallest index still addressable.
    fn first_index(&self) -> usize {
        0
    }

    /// Timestamp at absolute `index`. Callers only pass valid indices.
    fn timestamp_at(&self, index: usize) -> DateTime<Utc>;

    /// Returns true if no entries are addressable.
    fn is_empty(&self) -> bool {
        self.len() <= self.first_index()
    }
}

/// Types carrying a timestamp.
pub trait Timestamped {
    /// The timestamp of the value.
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for DateTime<Utc> {
    fn timestamp(&self) -> DateTime<Utc> {
        *self
    }
}

impl Timestamped for Bar {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for Tick {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl<T: Timestamped> TimestampSeries for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn timestamp_at(&self, index: usize) -> DateTime<Utc> {
        self[index].timestamp()
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// The timestamp found.
    pub timestamp: DateTime<Utc>,
    /// First index holding `timestamp`.
    pub first_index: usize,
    /// Last index holding `timestamp`.
    pub last_index: usize,
    /// True if `timestamp` equals the searched time.
    pub is_exact: bool,
}

impl SearchMatch {
    /// The indices holding the matched timestamp.
    #[must_use]
    pub const fn indices(&self) -> RangeInclusive<usize> {
        self.first_index..=self.last_index
    }
}

/// Timestamp queries available on every [`TimestampSeries`].
pub trait TimestampSearch: TimestampSeries {
    /// Finds the entries at exactly `time`.
    fn find_at(&self, time: DateTime<Utc>) -> Option<SearchMatch> {
        self.find_at_or_before(time).filter(|m| m.is_exact)
    }

    /// Finds the entries at `time`, or the latest entries before it.
    ///
    /// Returns `None` for an empty series or when `time` precedes the first
    /// entry.
    fn find_at_or_before(&self, time: DateTime<Utc>) -> Option<SearchMatch> {
        if self.is_empty() {
            return None;
        }
        let first = self.first_index();
        let last = self.len() - 1;
        if self.timestamp_at(first) > time {
            return None;
        }
        let index = if self.timestamp_at(last) <= time {
            last
        } else {
            last_before(self, first, last, time, true)
        };
        Some(run_ending_at(self, index, time))
    }

    /// Finds the entries at `time`, or the earliest entries after it.
    ///
    /// Returns `None` for an empty series or when `time` follows the last
    /// entry.
    fn find_at_or_after(&self, time: DateTime<Utc>) -> Option<SearchMatch> {
        if self.is_empty() {
            return None;
        }
        let first = self.first_index();
        let last = self.len() - 1;
        if self.timestamp_at(last) < time {
            return None;
        }
        let index = if self.timestamp_at(first) >= time {
            first
        } else {
            last_before(self, first, last, time, false) + 1
        };
        Some(run_starting_at(self, index, time))
    }

    /// Finds the indices of all entries with timestamps in `from..=to`.
    fn find_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Option<RangeInclusive<usize>> {
        let start = self.find_at_or_after(from)?;
        if start.timestamp > to {
            return None;
        }
        let end = self.find_at_or_before(to)?;
        Some(start.first_index..=end.last_index)
    }
}

impl<S: TimestampSeries + ?Sized> TimestampSearch for S {}

/// Returns the largest index in `lo..hi` whose timestamp is before `time`
/// (or at it, when `inclusive`).
///
/// Requires the predicate to hold at `lo` and fail at `hi`.
fn last_before<S: TimestampSeries + ?Sized>(
    series: &S,
    mut lo: usize,
    mut hi: usize,
    time: DateTime<Utc>,
    inclusive: bool,
) -> usize {
    let before = |t: DateTime<Utc>| if inclusive { t <= time } else { t < time };

    while hi - lo > LINEAR_SCAN_THRESHOLD {
        let t_lo = series.timestamp_at(lo);
        let t_hi = series.timestamp_at(hi);
        let fraction = nanos(time - t_lo) / nanos(t_hi - t_lo);
        let offset = if fraction.is_finite() {
            (fraction * (hi - lo) as f64) as usize
        } else {
            (hi - lo) / 2
        };
        let guess = (lo + offset).clamp(lo + 1, hi - 1);
        let moved_lo = before(series.timestamp_at(guess));
        if moved_lo {
            lo = guess;
        } else {
            hi = guess;
        }

        // Probe a tenth of the remaining bracket past the guess, so skewed
        // distributions still shrink the bracket geometrically.
        let step = ((hi - lo) / 10).max(1);
        if hi - lo > 1 {
            let probe = if moved_lo { lo + step } else { hi - step };
            if before(series.timestamp_at(probe)) {
                lo = probe;
            } else {
                hi = probe;
            }
        }
    }

    for index in lo + 1..hi {
        if !before(series.timestamp_at(index)) {
            break;
        }
        lo = index;
    }
    lo
}

fn nanos(delta: TimeDelta) -> f64 {
    delta
        .num_nanoseconds()
        .map_or_else(|| delta.num_milliseconds() as f64 * 1e6, |n| n as f64)
}

fn run_ending_at<S: TimestampSeries + ?Sized>(series: &S, last_index: usize, time: DateTime<Utc>) -> SearchMatch {
    let timestamp = series.timestamp_at(last_index);
    let mut first_index = last_index;
    while first_index > series.first_index() && series.timestamp_at(first_index - 1) == timestamp {
        first_index -= 1;
    }
    SearchMatch {
        timestamp,
        first_index,
        last_index,
        is_exact: timestamp == time,
    }
}

fn run_starting_at<S: TimestampSeries + ?Sized>(series: &S, first_index: usize, time: DateTime<Utc>) -> SearchMatch {
    let timestamp = series.timestamp_at(first_index);
    let mut last_index = first_index;
    while last_index + 1 < series.len() && series.timestamp_at(last_index + 1) == timestamp {
        last_index += 1;
    }
    SearchMatch {
        timestamp,
        first_index,
        last_index,
        is_exact: timestamp == time,
    }
}
