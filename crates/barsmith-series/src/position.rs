//! Locating a bar across series built with different periods.
//!
//! A bar is identified by its timestamp, its close and its sequence among
//! earlier bars sharing both. Tick and range series often hold several
//! bars with one timestamp, so the timestamp alone is ambiguous.

use chrono::{DateTime, Utc};

use crate::{BarSeries, TimestampSearch, TimestampSeries};

/// Portable position of a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPositionDescriptor {
    /// Bar timestamp.
    pub timestamp: DateTime<Utc>,
    /// Bar close.
    pub close: f64,
    /// Number of earlier bars with the same timestamp and close.
    pub sequence: usize,
}

/// Outcome of a nearest-bar lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMatch {
    /// Absolute index of the bar.
    pub index: usize,
    /// True if the bar matches the descriptor exactly.
    pub is_exact: bool,
}

/// Scan result of [`BarPositions::index_of_nth_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthClose {
    /// The requested occurrence.
    Found(usize),
    /// Fewer occurrences exist; holds the last one seen.
    Partial(usize),
    /// No bar in the range has the close.
    Missing,
}

/// Position queries over any searchable bar series.
pub trait BarPositions: BarSeries + TimestampSeries {
    /// Describes the bar at absolute `index`.
    fn position_descriptor(&self, index: usize) -> Option<BarPositionDescriptor> {
        let bar = *self.bar_at(index)?;
        let run = self.find_at(bar.timestamp)?;
        let sequence = (run.first_index..index)
            .filter(|&i| self.bar_at(i).is_some_and(|b| b.close == bar.close))
            .count();
        Some(BarPositionDescriptor {
            timestamp: bar.timestamp,
            close: bar.close,
            sequence,
        })
    }

    /// First bar at exactly `timestamp` with the given close.
    fn find_index_of(&self, timestamp: DateTime<Utc>, close: f64) -> Option<usize> {
        let run = self.find_at(timestamp)?;
        run.indices()
            .find(|&i| self.bar_at(i).is_some_and(|b| b.close == close))
    }

    /// Number of bars in `from..=to` with the given close.
    fn count_closes_at(&self, from: usize, to: usize, close: f64) -> usize {
        (from..=to)
            .filter(|&i| self.bar_at(i).is_some_and(|b| b.close == close))
            .count()
    }

    /// Finds the `n`th (zero based) bar in `min..=max` with the given close.
    fn index_of_nth_close(&self, min: usize, max: usize, close: f64, n: usize) -> NthClose {
        let mut seen = 0;
        let mut last = None;
        for i in min..=max {
            if self.bar_at(i).is_some_and(|b| b.close == close) {
                if seen == n {
                    return NthClose::Found(i);
                }
                seen += 1;
                last = Some(i);
            }
        }
        last.map_or(NthClose::Missing, NthClose::Partial)
    }

    /// Index of the bar matching `position` exactly.
    fn find_bar_exact(&self, position: &BarPositionDescriptor) -> Option<usize> {
        let run = self.find_at(position.timestamp)?;
        match self.index_of_nth_close(run.first_index, run.last_index, position.close, position.sequence) {
            NthClose::Found(i) => Some(i),
            NthClose::Partial(_) | NthClose::Missing => None,
        }
    }

    /// The exact bar, or the closest bar before it.
    ///
    /// Returns `None` only when every bar is later than the position.
    fn find_bar_exact_or_before(&self, position: &BarPositionDescriptor) -> Option<PositionMatch> {
        let run = self.find_at_or_before(position.timestamp)?;
        if !run.is_exact {
            return Some(PositionMatch {
                index: run.last_index,
                is_exact: false,
            });
        }
        let found = match self.index_of_nth_close(run.first_index, run.last_index, position.close, position.sequence) {
            NthClose::Found(i) => PositionMatch { index: i, is_exact: true },
            NthClose::Partial(i) => PositionMatch { index: i, is_exact: false },
            NthClose::Missing => PositionMatch {
                index: run.last_index,
                is_exact: false,
            },
        };
        Some(found)
    }

    /// The exact bar, or the closest bar after it.
    ///
    /// Returns `None` only when every bar is earlier than the position.
    fn find_bar_exact_or_after(&self, position: &BarPositionDescriptor) -> Option<PositionMatch> {
        let run = self.find_at_or_after(position.timestamp)?;
        if !run.is_exact {
            return Some(PositionMatch {
                index: run.first_index,
                is_exact: false,
            });
        }
        let found = match self.index_of_nth_close(run.first_index, run.last_index, position.close, position.sequence) {
            NthClose::Found(i) => PositionMatch { index: i, is_exact: true },
            NthClose::Partial(_) | NthClose::Missing => PositionMatch {
                index: (run.last_index + 1).min(self.count() - 1),
                is_exact: false,
            },
        };
        Some(found)
    }
}

impl<S: BarSeries + TimestampSeries> BarPositions for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BarSeriesMut, Bars};
    use barsmith_types::Bar;
    use chrono::{TimeDelta, TimeZone};

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap() + TimeDelta::minutes(minute)
    }

    fn bar(minute: i64, close: f64) -> Bar {
        Bar::new(close, close, close, close, 1.0, ts(minute), 1)
    }

    // index: 0    1    2    3    4    5    6
    // min:   0    1    1    1    1    2    4
    // close: 10   11   12   11   11   12   13
    fn series() -> Bars {
        let mut bars = Bars::new();
        for (minute, close) in [(0, 10.0), (1, 11.0), (1, 12.0), (1, 11.0), (1, 11.0), (2, 12.0), (4, 13.0)] {
            bars.add(bar(minute, close));
        }
        bars
    }

    #[test]
    fn test_descriptor_sequence() {
        let bars = series();
        let d = bars.position_descriptor(4).unwrap();
        assert_eq!(d.timestamp, ts(1));
        assert_eq!(d.close, 11.0);
        assert_eq!(d.sequence, 2);
        assert_eq!(bars.position_descriptor(2).unwrap().sequence, 0);
        assert!(bars.position_descriptor(7).is_none());
    }

    #[test]
    fn test_descriptor_round_trips_through_find_exact() {
        let bars = series();
        for i in 0..bars.count() {
            let d = bars.position_descriptor(i).unwrap();
            assert_eq!(bars.find_bar_exact(&d), Some(i));
        }
    }

    #[test]
    fn test_find_index_of() {
        let bars = series();
        assert_eq!(bars.find_index_of(ts(1), 11.0), Some(1));
        assert_eq!(bars.find_index_of(ts(1), 12.0), Some(2));
        assert_eq!(bars.find_index_of(ts(1), 13.0), None);
        assert_eq!(bars.find_index_of(ts(3), 12.0), None);
    }

    #[test]
    fn test_nth_close() {
        let bars = series();
        assert_eq!(bars.count_closes_at(1, 4, 11.0), 3);
        assert_eq!(bars.index_of_nth_close(1, 4, 11.0, 1), NthClose::Found(3));
        assert_eq!(bars.index_of_nth_close(1, 4, 11.0, 5), NthClose::Partial(4));
        assert_eq!(bars.index_of_nth_close(1, 4, 99.0, 0), NthClose::Missing);
    }

    #[test]
    fn test_exact_or_one_before() {
        let bars = series();
        let exact = BarPositionDescriptor {
            timestamp: ts(1),
            close: 11.0,
            sequence: 1,
        };
        assert_eq!(
            bars.find_bar_exact_or_before(&exact),
            Some(PositionMatch { index: 3, is_exact: true })
        );

        let gap = BarPositionDescriptor {
            timestamp: ts(3),
            close: 12.0,
            sequence: 0,
        };
        assert_eq!(
            bars.find_bar_exact_or_before(&gap),
            Some(PositionMatch { index: 5, is_exact: false })
        );

        let too_many = BarPositionDescriptor { sequence: 7, ..exact };
        assert_eq!(
            bars.find_bar_exact_or_before(&too_many),
            Some(PositionMatch { index: 4, is_exact: false })
        );

        let other_close = BarPositionDescriptor { close: 50.0, ..exact };
        assert_eq!(
            bars.find_bar_exact_or_before(&other_close),
            Some(PositionMatch { index: 4, is_exact: false })
        );

        let early = BarPositionDescriptor {
            timestamp: ts(-5),
            ..exact
        };
        assert_eq!(bars.find_bar_exact_or_before(&early), None);
    }

    #[test]
    fn test_exact_or_one_after() {
        let bars = series();
        let exact = BarPositionDescriptor {
            timestamp: ts(1),
            close: 12.0,
            sequence: 0,
        };
        assert_eq!(
            bars.find_bar_exact_or_after(&exact),
            Some(PositionMatch { index: 2, is_exact: true })
        );

        let gap = BarPositionDescriptor {
            timestamp: ts(3),
            ..exact
        };
        assert_eq!(
            bars.find_bar_exact_or_after(&gap),
            Some(PositionMatch { index: 6, is_exact: false })
        );

        let missing = BarPositionDescriptor { close: 50.0, ..exact };
        assert_eq!(
            bars.find_bar_exact_or_after(&missing),
            Some(PositionMatch { index: 5, is_exact: false })
        );

        let last_run = BarPositionDescriptor {
            timestamp: ts(4),
            close: 1.0,
            sequence: 0,
        };
        assert_eq!(
            bars.find_bar_exact_or_after(&last_run),
            Some(PositionMatch { index: 6, is_exact: false })
        );

        let late = BarPositionDescriptor {
            timestamp: ts(10),
            ..exact
        };
        assert_eq!(bars.find_bar_exact_or_after(&late), None);
    }
}
