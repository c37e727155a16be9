//! Environment observer trait for progress reporting and data collection.

use mas_core::Tick;

/// Callbacks invoked by [`Environment::run`][crate::Environment::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl EnvObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, acted: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {acted} agents acted");
///         }
///     }
/// }
/// ```
pub trait EnvObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `acted` is the number of agents that emitted at least one action
    /// this tick.
    fn on_tick_end(&mut self, _tick: Tick, _acted: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// An [`EnvObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl EnvObserver for NoopObserver {}
