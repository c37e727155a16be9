//! The `Mind` trait — the main extension point for agent logic.

use mas_core::{ActorId, ActorRng};

use crate::{Action, WorldView};

/// Pluggable agent behavior: perceive the world, decide, request actions.
///
/// Implement this directly for reflex agents (flocking, fleeing — pure
/// stimulus-response each tick), or use `mas-bdi`'s `BdiAgent`, which
/// implements it with a full belief-desire-intention loop.
///
/// # Contract
///
/// - Called once per tick per live agent, in agent insertion order.
/// - All reads go through `view`; all world mutation goes through the
///   returned [`Action`]s.  An empty `Vec` means "do nothing this tick".
/// - Randomness must come from `rng` (the agent's own deterministic
///   stream), never from a global source, or reproducibility is lost.
///
/// `&mut self` is deliberate: minds own their private state (memory,
/// beliefs, plan progress).  The tick loop is single-threaded, so no
/// `Send`/`Sync` bounds are needed.
pub trait Mind {
    /// Decide what `me` does this tick.
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action>;
}
