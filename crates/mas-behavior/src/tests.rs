//! Unit tests for mas-behavior.

use mas_actor::ActorStore;
use mas_core::{ActorId, ActorRng, Kind, Rect, Tick, Vec2};
use mas_spatial::{Quadtree, SpatialEntry};

use crate::{Action, Mind, NoopMind, WorldView};

const BOID: Kind = Kind(1);

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 100.0)
}

/// Build a store + index holding `positions`, all of kind `BOID`.
fn populate(positions: &[Vec2]) -> (ActorStore, Quadtree) {
    let mut store = ActorStore::new();
    let mut index = Quadtree::with_bounds(bounds());
    for &pos in positions {
        let id = store.spawn(BOID, pos);
        index.insert(SpatialEntry::new(id, BOID, pos)).unwrap();
    }
    (store, index)
}

#[cfg(test)]
mod view {
    use super::*;

    #[test]
    fn perceive_excludes_self() {
        let (store, index) = populate(&[
            Vec2::new(50.0, 50.0),
            Vec2::new(52.0, 50.0),
            Vec2::new(90.0, 90.0),
        ]);
        let view = WorldView::new(Tick::ZERO, bounds(), &store, &index);
        let seen = view.perceive(ActorId(0), 10.0);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].actor, ActorId(1));
    }

    #[test]
    fn perceive_dead_observer_sees_nothing() {
        let (mut store, index) = populate(&[Vec2::new(50.0, 50.0), Vec2::new(51.0, 50.0)]);
        store.retire(ActorId(0));
        let view = WorldView::new(Tick::ZERO, bounds(), &store, &index);
        assert!(view.perceive(ActorId(0), 10.0).is_empty());
    }

    #[test]
    fn nearest_skips_dead() {
        let (mut store, index) = populate(&[
            Vec2::new(50.0, 50.0),
            Vec2::new(55.0, 50.0),
            Vec2::new(60.0, 50.0),
        ]);
        store.retire(ActorId(1));
        let view = WorldView::new(Tick::ZERO, bounds(), &store, &index);
        let hit = view.nearest_of_kind(ActorId(0), Vec2::new(50.0, 50.0), BOID).unwrap();
        assert_eq!(hit.actor, ActorId(2));
    }
}

#[cfg(test)]
mod minds {
    use super::*;

    #[test]
    fn noop_returns_empty() {
        let (store, index) = populate(&[Vec2::new(1.0, 1.0)]);
        let view = WorldView::new(Tick::ZERO, bounds(), &store, &index);
        let mut rng = ActorRng::new(0, ActorId(0));
        assert!(NoopMind.act(ActorId(0), &view, &mut rng).is_empty());
    }

    /// A reflex that always drifts east — exercises object-safe dispatch.
    struct DriftEast;

    impl Mind for DriftEast {
        fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
            let pos = view.actors.position(me).unwrap_or(Vec2::ZERO);
            vec![Action::MoveTo(pos + Vec2::new(1.0, 0.0))]
        }
    }

    #[test]
    fn custom_mind_via_box() {
        let (store, index) = populate(&[Vec2::new(10.0, 10.0)]);
        let view = WorldView::new(Tick::ZERO, bounds(), &store, &index);
        let mut rng = ActorRng::new(0, ActorId(0));
        let mut mind: Box<dyn Mind> = Box::new(DriftEast);
        let actions = mind.act(ActorId(0), &view, &mut rng);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::MoveTo(p) if p == Vec2::new(11.0, 10.0)));
    }

    #[test]
    fn action_debug_names_variants() {
        let a = Action::Remove(ActorId(3));
        assert_eq!(format!("{a:?}"), "Remove(ActorId(3))");
    }
}
