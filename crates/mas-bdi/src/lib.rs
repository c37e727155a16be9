//! `mas-bdi` — a belief-desire-intention decision engine on top of the
//! `Mind` capability.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`belief`] | `Belief` value enum, `Beliefs` key→value store           |
//! | [`desire`] | `Desire` (name, strength, satisfaction, plan factory),   |
//! |            | `DesireSet` (insertion-ordered)                          |
//! | [`plan`]   | `Plan`, `Instruction`, `Target`                          |
//! | [`engine`] | `BdiAgent` — the per-tick state machine                  |
//!
//! # The model, in one paragraph
//!
//! A `BdiAgent` holds private *beliefs* (what it thinks is true), a set of
//! *desires* (what it wants, each with a strength and a satisfaction
//! predicate), and at most one *intention* — the strongest unsatisfied
//! desire, pursued through a *plan* of instructions executed one per tick.
//! The intention is reconsidered every tick, so a strictly stronger desire
//! preempts a running plan immediately, and a plan whose prerequisites
//! vanish parks in a `Blocked` phase that retries each tick rather than
//! failing.  Being unable to act is an expected condition here, not an
//! error.

pub mod belief;
pub mod desire;
pub mod engine;
pub mod plan;


pub use belief::{Belief, Beliefs};
pub use desire::{Desire, DesireSet};
pub use engine::{AgentParams, BdiAgent, Phase};
pub use plan::{Filter, Instruction, Plan, Target};
