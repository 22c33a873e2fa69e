//! Append-only bar stores.

use barsmith_types::{Bar, BarField};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

use crate::TimestampSeries;

/// Default number of bars kept by [`LimitedLookBackBars`].
pub const DEFAULT_MAX_LOOKBACK: usize = 256;

/// Position of a bar in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesIndex {
    /// Absolute index counted from the first bar ever added.
    FromStart(usize),
    /// Counted back from the end; `FromEnd(1)` is the last bar.
    FromEnd(usize),
}

impl From<usize> for SeriesIndex {
    fn from(index: usize) -> Self {
        Self::FromStart(index)
    }
}

/// Read access to a bar series.
///
/// Only the last bar may still change; every earlier bar is final.
pub trait BarSeries {
    /// Total number of bars ever added. Never decreases.
    fn count(&self) -> usize;

    /// Smallest absolute index still held.
    fn first_index(&self) -> usize {
        0
    }

    /// Bar at absolute `index`, if still held.
    fn bar_at(&self, index: usize) -> Option<&Bar>;

    /// Iterates the held bars from oldest to newest.
    fn iter(&self) -> impl Iterator<Item = &Bar> + '_;

    /// Resolves `index` to an absolute index, if it is held.
    fn resolve(&self, index: impl Into<SeriesIndex>) -> Option<usize> {
        let absolute = match index.into() {
            SeriesIndex::FromStart(i) => i,
            SeriesIndex::FromEnd(n) => self.count().checked_sub(n)?,
        };
        (absolute >= self.first_index() && absolute < self.count()).then_some(absolute)
    }

    /// Bar at `index`.
    fn get(&self, index: impl Into<SeriesIndex>) -> Option<&Bar> {
        self.bar_at(self.resolve(index)?)
    }

    /// The most recent bar.
    fn last(&self) -> Option<&Bar> {
        self.get(SeriesIndex::FromEnd(1))
    }

    /// Open price at `index`.
    fn open(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.open)
    }

    /// High price at `index`.
    fn high(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.high)
    }

    /// Low price at `index`.
    fn low(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.low)
    }

    /// Close price at `index`.
    fn close(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.close)
    }

    /// Volume at `index`.
    fn volume(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.volume)
    }

    /// Tick count at `index`.
    fn tick_count(&self, index: impl Into<SeriesIndex>) -> Option<u32> {
        self.get(index).map(|b| b.tick_count)
    }

    /// Timestamp at `index`.
    fn timestamp(&self, index: impl Into<SeriesIndex>) -> Option<DateTime<Utc>> {
        self.get(index).map(|b| b.timestamp)
    }

    /// Value of `field` at `index`.
    fn value(&self, field: BarField, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.get(index).map(|b| b.value(field))
    }

    /// A read view over one field, sharing this series' indices.
    fn field_view(&self, field: BarField) -> FieldView<'_, Self>
    where
        Self: Sized,
    {
        FieldView { bars: self, field }
    }
}

/// Write access to a bar series, held by the single builder that owns it.
pub trait BarSeriesMut: BarSeries {
    /// Appends a new in-progress bar.
    fn add(&mut self, bar: Bar);

    /// Overwrites the prices, volume and timestamp of the last bar.
    ///
    /// Does nothing on an empty series.
    fn update_last(&mut self, open: f64, high: f64, low: f64, close: f64, volume: f64, timestamp: DateTime<Utc>) {
        if let Some(bar) = self.last_mut() {
            bar.open = open;
            bar.high = high;
            bar.low = low;
            bar.close = close;
            bar.volume = volume;
            bar.timestamp = timestamp;
        }
    }

    /// Mutable access to the last bar.
    fn last_mut(&mut self) -> Option<&mut Bar>;
}

/// Per-field view of a bar series.
#[derive(Debug)]
pub struct FieldView<'a, S> {
    bars: &'a S,
    field: BarField,
}

impl<S> Clone for FieldView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for FieldView<'_, S> {}

impl<S: BarSeries> FieldView<'_, S> {
    /// The field this view reads.
    #[must_use]
    pub const fn field(&self) -> BarField {
        self.field
    }

    /// Number of bars in the underlying series.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bars.count()
    }

    /// Value at `index`.
    pub fn get(&self, index: impl Into<SeriesIndex>) -> Option<f64> {
        self.bars.value(self.field, index)
    }

    /// Iterates the held values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let field = self.field;
        self.bars.iter().map(move |b| b.value(field))
    }
}

/// Unbounded bar store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bars {
    bars: Vec<Bar>,
}

impl Bars {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// The bars as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    /// Releases spare capacity.
    pub fn trim(&mut self) {
        self.bars.shrink_to_fit();
    }
}

impl BarSeries for Bars {
    fn count(&self) -> usize {
        self.bars.len()
    }

    fn bar_at(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    fn iter(&self) -> impl Iterator<Item = &Bar> + '_ {
        self.bars.iter()
    }
}

impl BarSeriesMut for Bars {
    fn add(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    fn last_mut(&mut self) -> Option<&mut Bar> {
        self.bars.last_mut()
    }
}

impl TimestampSeries for Bars {
    fn len(&self) -> usize {
        self.bars.len()
    }

    fn timestamp_at(&self, index: usize) -> DateTime<Utc> {
        self.bars[index].timestamp
    }
}

/// Bar store keeping only the most recent bars.
///
/// Absolute indices stay valid for held bars; indices below
/// [`removed_count`](Self::removed_count) are out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitedLookBackBars {
    bars: VecDeque<Bar>,
    max_lookback: usize,
    removed: usize,
}

impl LimitedLookBackBars {
    /// Creates a store holding at most [`DEFAULT_MAX_LOOKBACK`] bars.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_lookback(DEFAULT_MAX_LOOKBACK)
    }

    /// Creates a store holding at most `max_lookback` bars (at least one).
    #[must_use]
    pub fn with_max_lookback(max_lookback: usize) -> Self {
        Self {
            bars: VecDeque::new(),
            max_lookback: max_lookback.max(1),
            removed: 0,
        }
    }

    /// Maximum number of held bars.
    #[must_use]
    pub const fn max_lookback(&self) -> usize {
        self.max_lookback
    }

    /// Raises the maximum lookback. Smaller values are ignored.
    pub fn increase_max_lookback(&mut self, max_lookback: usize) {
        if max_lookback > self.max_lookback {
            self.max_lookback = max_lookback;
        }
    }

    /// Number of bars discarded so far.
    #[must_use]
    pub const fn removed_count(&self) -> usize {
        self.removed
    }

    /// Releases spare capacity.
    pub fn trim(&mut self) {
        self.bars.shrink_to_fit();
    }
}

impl Default for LimitedLookBackBars {
    fn default() -> Self {
        Self::new()
    }
}

impl BarSeries for LimitedLookBackBars {
    fn count(&self) -> usize {
        self.bars.len() + self.removed
    }

    fn first_index(&self) -> usize {
        self.removed
    }

    fn bar_at(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index.checked_sub(self.removed)?)
    }

    fn iter(&self) -> impl Iterator<Item = &Bar> + '_ {
        self.bars.iter()
    }
}

impl BarSeriesMut for LimitedLookBackBars {
    fn add(&mut self, bar: Bar) {
        self.bars.push_back(bar);
        if self.bars.len() > self.max_lookback {
            self.bars.pop_front();
            self.removed += 1;
            debug!(removed = self.removed, max_lookback = self.max_lookback, "Trimmed oldest bar");
        }
    }

    fn last_mut(&mut self) -> Option<&mut Bar> {
        self.bars.back_mut()
    }
}

impl TimestampSeries for LimitedLookBackBars {
    fn len(&self) -> usize {
        self.count()
    }

    fn first_index(&self) -> usize {
        self.removed
    }

    fn timestamp_at(&self, index: usize) -> DateTime<Utc> {
        self.bars[index - self.removed].timestamp
    }
}
