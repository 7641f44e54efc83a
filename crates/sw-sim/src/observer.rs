//! Simulation observer trait for progress reporting and data collection.

use sw_core::Tick;

use crate::{Snapshot, TickMetrics};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers never feed back into the
/// simulation; the only external mutation is
/// [`Sim::set_target`][crate::Sim::set_target], between ticks.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_metrics(&mut self, m: &TickMetrics) {
///         if m.tick.is_multiple_of(self.interval) {
///             println!("{}: {} collisions", m.tick, m.colliding_pairs);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before tick `tick` is computed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every tick with the fresh snapshot (the render hook).
    fn on_tick_end(&mut self, _snapshot: &Snapshot) {}

    /// Called after every tick with collision counts and the opinion
    /// distribution.
    fn on_metrics(&mut self, _metrics: &TickMetrics) {}

    /// Called every `config.output_interval` ticks.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once after the final tick with the final state.
    fn on_sim_end(&mut self, _last: &Snapshot) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
