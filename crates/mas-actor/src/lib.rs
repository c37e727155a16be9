//! `mas-actor` — actor population storage for the `rust_mas` framework.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`component`] | `ComponentMap` (typed per-actor state columns)               |
//! | [`store`]     | `ActorStore` (population arrays), `ActorRngs`                |
//!
//! Actor identity and position live in `ActorStore`'s parallel arrays,
//! indexed by `ActorId`.  Everything application-specific (how many gems a
//! mine holds, what a miner is carrying) lives in [`ComponentMap`] — the
//! framework never has to know those types exist.
//!
//! Slots are tombstoned rather than reused: a retired actor's `ActorId`
//! stays dead forever, so stale references can never silently alias a new
//! actor.

pub mod component;
pub mod store;


pub use component::ComponentMap;
pub use store::{ActorRngs, ActorStore};
