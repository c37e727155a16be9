//! `mas-core` — foundational types for the `rust_mas` multi-agent simulation
//! framework.
//!
//! This crate is a dependency of every other `mas-*` crate.  It intentionally
//! has no `mas-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                    |
//! |-----------|---------------------------------------------|
//! | [`ids`]   | `ActorId`, `Kind`                           |
//! | [`vec2`]  | `Vec2`, `Rect` planar geometry              |
//! | [`time`]  | `Tick`                                      |
//! | [`rng`]   | `ActorRng` (per-actor), `SimRng` (global)   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to plain-data types.    |

pub mod ids;
pub mod rng;
pub mod time;
pub mod vec2;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{ActorId, Kind};
pub use rng::{ActorRng, SimRng};
pub use time::Tick;
pub use vec2::{Rect, Vec2};
