//! `mas-behavior` — the agent capability layer.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`action`]  | `Action` enum (`MoveTo`, `Interact`, `Spawn`, `Remove`)       |
//! | [`context`] | `WorldView<'a>` — read-only tick snapshot with perception     |
//! | [`mind`]    | `Mind` trait — the perceive-and-act capability                |
//! | [`noop`]    | `NoopMind` — placeholder that never acts                      |
//!
//! # Design notes
//!
//! The tick loop in mas-sim runs a produce/apply split per agent:
//!
//! 1. **Produce**: the agent's [`Mind::act`] reads the world through a
//!    shared [`WorldView`] and returns a list of [`Action`]s.  No world
//!    mutation happens here.
//! 2. **Apply**: the environment consumes those actions, mutating the
//!    population and spatial index, before the next agent acts.
//!
//! The split keeps every mutation in one place (the environment) while
//! letting minds hold private mutable state — beliefs, plan stacks —
//! behind `&mut self`.  An actor without a mind is a plain prop others
//! perceive and interact with; minds are an optional layering, not a
//! mandatory hierarchy.

pub mod action;
pub mod context;
pub mod mind;
pub mod noop;

#[cfg(test)]
mod tests;

pub use action::{Action, InteractFn};
pub use context::WorldView;
pub use mind::Mind;
pub use noop::NoopMind;
