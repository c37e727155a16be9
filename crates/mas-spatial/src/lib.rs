//! `mas-spatial` — point-region quadtree over actor positions.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`quadtree`] | `Quadtree`, `SpatialEntry`                            |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                    |
//!
//! # What the index answers
//!
//! - `nearest(point, predicate)` — closest entry satisfying a predicate,
//!   with region-distance pruning so only subtrees that could hold a
//!   strictly closer entry are visited.
//! - `query_rect` / `query_radius` — all entries within an area (the basis
//!   of agent perception).
//!
//! Entries are `(ActorId, Kind, Vec2)` triples; the index carries the kind
//! tag so "nearest actor of kind K" never needs to touch the population
//! store.

pub mod error;
pub mod quadtree;


pub use error::{SpatialError, SpatialResult};
pub use quadtree::{Quadtree, SpatialEntry};
