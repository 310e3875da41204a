//! Simulation observer trait for progress reporting and data collection.

use tf_core::Tick;
use tf_element::TrafficElement;

/// Callbacks invoked by [`Scenario::run`][crate::Scenario::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `updated` is the number of
    /// autonomous elements swept this tick (Manual elements excluded).
    fn on_tick_end(&mut self, _tick: Tick, _updated: usize) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks) with the full element collection in update order, so output
    /// writers can record poses without the scenario knowing any format.
    fn on_snapshot(&mut self, _tick: Tick, _elements: &[TrafficElement]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
