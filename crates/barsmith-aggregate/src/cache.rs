//! Bar series shared by [`BarsInfo`].

use barsmith_series::{BarSeriesMut, Bars, BarsInfo};
use barsmith_types::Tick;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

use crate::formation::BarFormation;
use crate::{BarBuilder, Result};

/// Builders keyed by the identity of the series they build.
///
/// Requesting a series twice with equal [`BarsInfo`] yields the same
/// builder, so consumers share one series instead of rebuilding it.
#[derive(Debug)]
pub struct BarsCache<S = Bars> {
    builders: HashMap<BarsInfo, BarBuilder<S>>,
}

impl<S> Default for BarsCache<S> {
    fn default() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }
}

impl<S: BarSeriesMut + Default> BarsCache<S> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the builder for `info`, creating it on first request.
    ///
    /// # Errors
    ///
    /// Returns the construction error of a new builder.
    pub fn get_or_create(&mut self, info: &BarsInfo) -> Result<&mut BarBuilder<S>> {
        match self.builders.entry(info.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let builder = BarBuilder::new(info.clone())?;
                debug!(series = %info, "Created bar builder");
                Ok(entry.insert(builder))
            }
        }
    }
}

impl<S: BarSeriesMut> BarsCache<S> {
    /// The builder for `info`, if one was created.
    #[must_use]
    pub fn get(&self, info: &BarsInfo) -> Option<&BarBuilder<S>> {
        self.builders.get(info)
    }

    /// The bars of `info`, if its builder was created.
    #[must_use]
    pub fn bars(&self, info: &BarsInfo) -> Option<&S> {
        self.get(info).map(BarFormation::bars)
    }

    /// Feeds a tick to every cached builder.
    pub fn on_tick(&mut self, tick: &Tick) {
        for builder in self.builders.values_mut() {
            builder.on_tick(tick);
        }
    }

    /// Drops the builder for `info`.
    pub fn remove(&mut self, info: &BarsInfo) -> Option<BarBuilder<S>> {
        self.builders.remove(info)
    }

    /// Number of cached builders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns true if no builder is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}
