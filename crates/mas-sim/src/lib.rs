//! `mas-sim` — the environment and tick loop for the rust_mas framework.
//!
//! # Tick loop
//!
//! ```text
//! for each tick:
//!   ① Sync   — positions changed last tick are pushed into the quadtree,
//!              fixing the start-of-tick snapshot every agent perceives.
//!   ② Act    — each registered mind, in spawn order, observes a WorldView
//!              and returns actions; they are applied immediately:
//!                MoveTo(p)          → set position (clamped to bounds)
//!                Interact{t, f}     → run f(me, t, &mut store)
//!                Spawn{..}          → add actor; its mind acts next tick
//!                Remove(a)          → retire a; index updated in lockstep
//!   ③ Clock  — the tick counter advances.
//! ```
//!
//! Everything is single-threaded and ordered, so two runs with the same
//! seed and the same setup produce identical histories.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mas_behavior::NoopMind;
//! use mas_core::{Kind, Rect, Vec2};
//! use mas_sim::{EnvConfig, Environment, NoopObserver};
//!
//! let mut env = Environment::new(Rect::new(0.0, 0.0, 100.0, 100.0), EnvConfig::default());
//! env.spawn_agent(Kind(1), Vec2::new(50.0, 50.0), Box::new(NoopMind))?;
//! env.run(1_000, &mut NoopObserver)?;
//! ```

pub mod env;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use env::{EnvConfig, Environment};
pub use error::{SimError, SimResult};
pub use observer::{EnvObserver, NoopObserver};
