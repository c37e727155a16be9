//! Agent actions — the requests a mind can make of the environment.

use std::fmt;
use std::rc::Rc;

use mas_actor::ActorStore;
use mas_core::{ActorId, Kind, Vec2};

use crate::Mind;

/// An interaction callback, bound when the requesting plan or reflex is
/// built and invoked with the ids of both parties and mutable access to the
/// population.
///
/// `Rc` because the same callback is typically held by a plan instruction
/// and handed out once per emitted action.
pub type InteractFn = Rc<dyn Fn(ActorId, ActorId, &mut ActorStore)>;

/// An action an agent wants performed during the current tick.
///
/// Actions are produced by [`Mind::act`] and consumed by the environment's
/// apply step, sequentially, in the order returned.  Everything that touches
/// shared state — positions, the spatial index, the population — goes
/// through here; minds themselves never mutate the world.
pub enum Action {
    /// Move the acting agent to this position.  The environment clamps it
    /// to the world bounds before committing.
    MoveTo(Vec2),

    /// Invoke `effect(me, target, &mut store)` — the typed interaction
    /// callback.  Dropped silently if `target` died earlier this tick.
    Interact {
        target: ActorId,
        effect: InteractFn,
    },

    /// Add a new actor, optionally with a mind.  The newcomer joins the
    /// population and index at once but first acts on the next tick.
    Spawn {
        kind: Kind,
        pos:  Vec2,
        mind: Option<Box<dyn Mind>>,
    },

    /// Retire an actor — population and spatial index stay consistent.
    /// Removing an already-dead actor is not an error (two agents may
    /// legitimately target the same victim in one tick).
    Remove(ActorId),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveTo(p) => write!(f, "MoveTo({p})"),
            Action::Interact { target, .. } => write!(f, "Interact({target})"),
            Action::Spawn { kind, pos, .. } => write!(f, "Spawn({kind} at {pos})"),
            Action::Remove(a) => write!(f, "Remove({a})"),
        }
    }
}
