//! The interface every bar builder implements.

use barsmith_series::{BarSeries, BarsInfo};
use barsmith_types::Tick;

/// A per-tick bar formation policy writing into its own bar store.
///
/// Ticks must arrive in non-decreasing timestamp order. Ticks of other
/// instruments and ticks outside trading sessions are dropped.
pub trait BarFormation {
    /// Bar store the builder writes to.
    type Store: BarSeries;

    /// Identity of the series being built.
    fn info(&self) -> &BarsInfo;

    /// Feeds one tick.
    ///
    /// # Panics
    ///
    /// Panics if the tick is older than a previously accepted tick.
    fn on_tick(&mut self, tick: &Tick);

    /// Read access to the bars built so far. The last bar may still change.
    fn bars(&self) -> &Self::Store;
}
