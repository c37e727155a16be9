//! A mind that never acts.

use mas_core::{ActorId, ActorRng};

use crate::{Action, Mind, WorldView};

/// A [`Mind`] that always returns an empty action list.
///
/// Useful in tests and for populations that should tick without doing
/// anything — though a plain actor (no mind at all) is cheaper for props.
pub struct NoopMind;

impl Mind for NoopMind {
    fn act(&mut self, _me: ActorId, _view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        vec![]
    }
}
