//! Read-only world state passed to every acting mind.

use mas_actor::ActorStore;
use mas_core::{ActorId, Kind, Rect, Tick, Vec2};
use mas_spatial::{Quadtree, SpatialEntry};

/// A read-only view of the simulation passed to every [`Mind::act`] call.
///
/// Built by the environment once per acting agent and handed in explicitly —
/// there is no ambient global simulation state anywhere in the framework.
///
/// The spatial index reflects positions as of the start of the tick (moves
/// are synced at the next tick boundary), while liveness and component data
/// are current — an actor removed earlier this tick is never reported.
///
/// [`Mind::act`]: crate::Mind::act
pub struct WorldView<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// The world's bounding region.
    pub bounds: Rect,

    /// Read-only view of the actor population and its components.
    pub actors: &'a ActorStore,

    /// The spatial index over actor positions.
    pub index: &'a Quadtree,
}

impl<'a> WorldView<'a> {
    #[inline]
    pub fn new(tick: Tick, bounds: Rect, actors: &'a ActorStore, index: &'a Quadtree) -> Self {
        Self { tick, bounds, actors, index }
    }

    /// Everything within `radius` of `me`, excluding `me` itself — the
    /// standard perception query.
    ///
    /// Returns an empty list for a dead or unknown actor.
    pub fn perceive(&self, me: ActorId, radius: f32) -> Vec<SpatialEntry> {
        let Some(pos) = self.actors.position(me) else {
            return Vec::new();
        };
        let mut seen = self.index.query_radius(pos, radius);
        seen.retain(|e| e.actor != me && self.actors.is_alive(e.actor));
        seen
    }

    /// Nearest live entry to `point` satisfying `pred`.
    pub fn nearest<F>(&self, point: Vec2, mut pred: F) -> Option<SpatialEntry>
    where
        F: FnMut(&SpatialEntry) -> bool,
    {
        self.index
            .nearest(point, |e| self.actors.is_alive(e.actor) && pred(e))
    }

    /// Nearest live actor of `kind` to `point`, excluding `me`.
    pub fn nearest_of_kind(&self, me: ActorId, point: Vec2, kind: Kind) -> Option<SpatialEntry> {
        self.nearest(point, |e| e.kind == kind && e.actor != me)
    }
}
