//! Unit and scenario tests for mas-sim.

use std::cell::RefCell;
use std::rc::Rc;

use mas_behavior::{Action, Mind, NoopMind, WorldView};
use mas_core::{ActorId, ActorRng, Kind, Rect, Tick, Vec2};

use crate::{EnvConfig, Environment, EnvObserver, NoopObserver, SimError};

const WALKER: Kind = Kind(1);
const PREY:   Kind = Kind(2);

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 100.0, 100.0)
}

fn env_with_seed(seed: u64) -> Environment {
    Environment::new(bounds(), EnvConfig { seed, ..EnvConfig::default() })
}

/// Wanders by a bounded random offset every tick.
struct RandomWalker;

impl Mind for RandomWalker {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, rng: &mut ActorRng) -> Vec<Action> {
        let Some(pos) = view.actors.position(me) else {
            return Vec::new();
        };
        let step = Vec2::new(rng.gen_range(-1.0..1.0_f32), rng.gen_range(-1.0..1.0_f32));
        vec![Action::MoveTo(pos + step)]
    }
}

/// Moves east by a fixed amount every tick.
struct DriftEast(f32);

impl Mind for DriftEast {
    fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
        match view.actors.position(me) {
            Some(pos) => vec![Action::MoveTo(pos + Vec2::new(self.0, 0.0))],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod population {
    use super::*;

    #[test]
    fn spawn_updates_store_and_index_together() {
        let mut env = env_with_seed(0);
        let a = env.spawn_actor(WALKER, Vec2::new(25.0, 25.0)).unwrap();
        assert_eq!(env.actors().live_count(), 1);
        assert_eq!(env.index().position_of(a), Some(Vec2::new(25.0, 25.0)));
    }

    #[test]
    fn out_of_bounds_spawn_is_rejected_atomically() {
        let mut env = env_with_seed(0);
        let err = env.spawn_actor(WALKER, Vec2::new(500.0, 50.0)).unwrap_err();
        assert!(matches!(err, SimError::Spatial(_)));
        assert_eq!(env.actors().live_count(), 0);
        assert!(env.index().is_empty());
    }

    #[test]
    fn remove_clears_store_and_index() {
        let mut env = env_with_seed(0);
        let a = env.spawn_actor(WALKER, Vec2::new(25.0, 25.0)).unwrap();
        env.remove_actor(a).unwrap();
        assert_eq!(env.actors().live_count(), 0);
        assert!(!env.index().contains(a));
        assert!(matches!(env.remove_actor(a), Err(SimError::ActorNotFound(_))));
    }

    #[test]
    fn nearest_and_nearby_skip_dead_actors() {
        let mut env = env_with_seed(0);
        let near = env.spawn_actor(PREY, Vec2::new(51.0, 50.0)).unwrap();
        let far = env.spawn_actor(PREY, Vec2::new(60.0, 50.0)).unwrap();
        env.remove_actor(near).unwrap();

        let hit = env.nearest(Vec2::new(50.0, 50.0), PREY).unwrap();
        assert_eq!(hit.actor, far);
        let seen = env.nearby(Vec2::new(50.0, 50.0), 20.0);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].actor, far);
    }
}

#[cfg(test)]
mod ticking {
    use super::*;

    #[test]
    fn movement_applies_now_and_indexes_next_tick() {
        let mut env = env_with_seed(0);
        let a = env
            .spawn_agent(WALKER, Vec2::new(50.0, 50.0), Box::new(DriftEast(2.0)))
            .unwrap();

        env.step().unwrap();
        // The store is current, the index still holds the start-of-tick pos.
        assert_eq!(env.actors().position(a), Some(Vec2::new(52.0, 50.0)));
        assert_eq!(env.index().position_of(a), Some(Vec2::new(50.0, 50.0)));

        env.step().unwrap();
        assert_eq!(env.index().position_of(a), Some(Vec2::new(52.0, 50.0)));
        assert_eq!(env.tick(), Tick(2));
    }

    #[test]
    fn moves_are_clamped_to_bounds() {
        let mut env = env_with_seed(0);
        let a = env
            .spawn_agent(WALKER, Vec2::new(99.0, 50.0), Box::new(DriftEast(50.0)))
            .unwrap();

        for _ in 0..3 {
            env.step().unwrap();
        }
        let pos = env.actors().position(a).unwrap();
        assert!(env.bounds().contains(pos), "escaped to {pos}");
    }

    #[test]
    fn spawned_agent_first_acts_next_tick() {
        struct FirstAct(Rc<RefCell<Option<Tick>>>);
        impl Mind for FirstAct {
            fn act(&mut self, _me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
                self.0.borrow_mut().get_or_insert(view.tick);
                Vec::new()
            }
        }

        struct SpawnOnce {
            done: bool,
            slot: Rc<RefCell<Option<Tick>>>,
        }
        impl Mind for SpawnOnce {
            fn act(&mut self, _me: ActorId, _view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
                if self.done {
                    return Vec::new();
                }
                self.done = true;
                vec![Action::Spawn {
                    kind: PREY,
                    pos:  Vec2::new(10.0, 10.0),
                    mind: Some(Box::new(FirstAct(self.slot.clone()))),
                }]
            }
        }

        let slot = Rc::new(RefCell::new(None));
        let mut env = env_with_seed(0);
        env.spawn_agent(
            WALKER,
            Vec2::new(50.0, 50.0),
            Box::new(SpawnOnce { done: false, slot: slot.clone() }),
        )
        .unwrap();

        env.step().unwrap();
        // Spawned during tick 0; has not acted yet.
        assert_eq!(env.actors().live_count(), 2);
        assert_eq!(*slot.borrow(), None);

        env.step().unwrap();
        assert_eq!(*slot.borrow(), Some(Tick(1)));
    }

    #[test]
    fn removed_agent_stops_acting() {
        struct CullOnce(ActorId, bool);
        impl Mind for CullOnce {
            fn act(&mut self, _me: ActorId, _view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
                if self.1 {
                    return Vec::new();
                }
                self.1 = true;
                vec![Action::Remove(self.0)]
            }
        }

        let mut env = env_with_seed(0);
        let victim = env
            .spawn_agent(PREY, Vec2::new(20.0, 20.0), Box::new(DriftEast(1.0)))
            .unwrap();
        env.spawn_agent(WALKER, Vec2::new(50.0, 50.0), Box::new(CullOnce(victim, false)))
            .unwrap();

        // The victim acts once (it registered first), then the hunter's
        // removal lands the same tick.
        env.step().unwrap();
        assert!(!env.actors().is_alive(victim));
        assert!(!env.index().contains(victim));
        assert_eq!(env.actors().live_count(), 1);

        // Further ticks run cleanly with the dead mind still registered.
        env.step().unwrap();
        env.step().unwrap();
        assert_eq!(env.actors().live_count(), 1);
    }
}

#[cfg(test)]
mod determinism {
    use super::*;

    fn walker_env(seed: u64, n: usize) -> Environment {
        let mut env = env_with_seed(seed);
        for i in 0..n {
            let pos = Vec2::new(10.0 + 4.0 * i as f32, 50.0);
            env.spawn_agent(WALKER, pos, Box::new(RandomWalker)).unwrap();
        }
        env
    }

    fn snapshot(env: &Environment) -> Vec<(ActorId, Vec2)> {
        env.actors()
            .ids()
            .map(|a| (a, env.actors().position(a).unwrap()))
            .collect()
    }

    #[test]
    fn identical_seeds_produce_identical_histories() {
        let mut a = walker_env(1234, 12);
        let mut b = walker_env(1234, 12);
        a.run(100, &mut NoopObserver).unwrap();
        b.run(100, &mut NoopObserver).unwrap();
        assert_eq!(snapshot(&a), snapshot(&b));
        assert_eq!(a.tick(), b.tick());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = walker_env(1, 12);
        let mut b = walker_env(2, 12);
        a.run(100, &mut NoopObserver).unwrap();
        b.run(100, &mut NoopObserver).unwrap();
        assert_ne!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn late_spawns_do_not_disturb_existing_streams() {
        let mut a = walker_env(77, 6);
        let mut b = walker_env(77, 6);
        b.spawn_agent(WALKER, Vec2::new(90.0, 90.0), Box::new(RandomWalker))
            .unwrap();
        a.run(50, &mut NoopObserver).unwrap();
        b.run(50, &mut NoopObserver).unwrap();

        // The first six walkers trace the same paths in both runs.
        let a_snap = snapshot(&a);
        let b_snap = snapshot(&b);
        assert_eq!(a_snap[..6], b_snap[..6]);
    }
}

#[cfg(test)]
mod observers {
    use super::*;

    #[derive(Default)]
    struct Counting {
        starts: u64,
        ends:   u64,
        acted:  usize,
        ended:  Option<Tick>,
    }

    impl EnvObserver for Counting {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, _tick: Tick, acted: usize) {
            self.ends += 1;
            self.acted += acted;
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.ended = Some(final_tick);
        }
    }

    #[test]
    fn run_reports_every_tick() {
        let mut env = env_with_seed(0);
        env.spawn_agent(WALKER, Vec2::new(50.0, 50.0), Box::new(DriftEast(1.0)))
            .unwrap();
        env.spawn_agent(WALKER, Vec2::new(60.0, 50.0), Box::new(NoopMind))
            .unwrap();

        let mut obs = Counting::default();
        env.run(10, &mut obs).unwrap();
        assert_eq!(obs.starts, 10);
        assert_eq!(obs.ends, 10);
        // Only the drifter emits actions; the noop agent acts but asks nothing.
        assert_eq!(obs.acted, 10);
        assert_eq!(obs.ended, Some(Tick(10)));
    }

    #[test]
    fn run_until_stops_on_predicate() {
        let mut env = env_with_seed(0);
        let a = env
            .spawn_agent(WALKER, Vec2::new(0.5, 50.0), Box::new(DriftEast(1.0)))
            .unwrap();

        let reached = env
            .run_until(
                |env| env.actors().position(a).is_some_and(|p| p.x >= 10.0),
                100,
                &mut NoopObserver,
            )
            .unwrap();
        assert!(reached);
        assert!(env.tick() < Tick(100));
    }

    #[test]
    fn run_until_gives_up_at_max_steps() {
        let mut env = env_with_seed(0);
        env.spawn_actor(WALKER, Vec2::new(50.0, 50.0)).unwrap();
        let reached = env
            .run_until(|_| false, 25, &mut NoopObserver)
            .unwrap();
        assert!(!reached);
        assert_eq!(env.tick(), Tick(25));
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    use mas_actor::ActorStore;
    use mas_behavior::InteractFn;
    use mas_bdi::{AgentParams, BdiAgent, Beliefs, Desire, Plan};

    const MINE:  Kind = Kind(10);
    const CAMP:  Kind = Kind(11);
    const MINER: Kind = Kind(12);

    #[derive(Clone, Copy, Default)]
    struct Gems(u32);
    #[derive(Clone, Copy, Default)]
    struct Hands(u32);
    #[derive(Clone, Copy, Default)]
    struct Delivered(u32);

    fn mine_effect() -> InteractFn {
        Rc::new(|me, mine, store: &mut ActorStore| {
            let Some(gems) = store.component_of_mut::<Gems>(mine) else {
                return;
            };
            if gems.0 == 0 {
                return;
            }
            gems.0 -= 1;
            if let Some(hands) = store.component_of_mut::<Hands>(me) {
                hands.0 += 1;
            }
        })
    }

    fn deliver_effect() -> InteractFn {
        Rc::new(|me, camp, store: &mut ActorStore| {
            let carried = store
                .component_of_mut::<Hands>(me)
                .map(|h| std::mem::take(&mut h.0))
                .unwrap_or(0);
            if let Some(tally) = store.component_of_mut::<Delivered>(camp) {
                tally.0 += carried;
            }
        })
    }

    fn miner_agent() -> BdiAgent {
        let params = AgentParams { perception: 15.0, reach: 1.5, speed: 2.0 };
        BdiAgent::new(params)
            .on_sense(|beliefs, _seen, me, view| {
                let carrying = view
                    .actors
                    .component_of::<Hands>(me)
                    .is_some_and(|h| h.0 > 0);
                beliefs.set("carrying", carrying);
            })
            .with_desire(Desire::new(
                "collect",
                1.0,
                |b: &Beliefs| b.holds("carrying"),
                |_| {
                    Plan::new().interact_nearest_where(
                        MINE,
                        |mine, view| {
                            view.actors
                                .component_of::<Gems>(mine)
                                .is_some_and(|g| g.0 > 0)
                        },
                        mine_effect(),
                    )
                },
            ))
            .with_desire(Desire::new(
                "deliver",
                2.0,
                |b: &Beliefs| !b.holds("carrying"),
                |_| Plan::new().interact_nearest(CAMP, deliver_effect()),
            ))
    }

    /// Full collect→deliver loop: one miner empties a five-gem mine into
    /// the camp, one gem per round trip.
    #[test]
    fn miner_empties_the_mine_into_the_camp() {
        let mut env = env_with_seed(9);
        env.actors_mut().register_component::<Gems>();
        env.actors_mut().register_component::<Hands>();
        env.actors_mut().register_component::<Delivered>();

        let mine = env.spawn_actor(MINE, Vec2::new(10.0, 10.0)).unwrap();
        let camp = env.spawn_actor(CAMP, Vec2::new(90.0, 90.0)).unwrap();
        let miner = env
            .spawn_agent(MINER, Vec2::new(50.0, 50.0), Box::new(miner_agent()))
            .unwrap();
        env.actors_mut().component_of_mut::<Gems>(mine).unwrap().0 = 5;

        let done = env
            .run_until(
                move |env| {
                    env.actors()
                        .component_of::<Delivered>(camp)
                        .is_some_and(|d| d.0 == 5)
                },
                2_000,
                &mut NoopObserver,
            )
            .unwrap();

        assert!(done, "miner did not finish by tick {}", env.tick());
        assert_eq!(env.actors().component_of::<Gems>(mine).unwrap().0, 0);
        assert_eq!(env.actors().component_of::<Hands>(miner).unwrap().0, 0);
    }

    /// A plan blocked on a missing resource completes once one appears.
    #[test]
    fn blocked_miner_recovers_when_a_mine_spawns() {
        let mut env = env_with_seed(3);
        env.actors_mut().register_component::<Gems>();
        env.actors_mut().register_component::<Hands>();
        env.actors_mut().register_component::<Delivered>();

        let camp = env.spawn_actor(CAMP, Vec2::new(90.0, 90.0)).unwrap();
        env.spawn_agent(MINER, Vec2::new(50.0, 50.0), Box::new(miner_agent()))
            .unwrap();

        // No mine: the collect plan can never start.
        env.run(20, &mut NoopObserver).unwrap();
        assert_eq!(env.actors().component_of::<Delivered>(camp).unwrap().0, 0);

        let mine = env.spawn_actor(MINE, Vec2::new(55.0, 50.0)).unwrap();
        env.actors_mut().component_of_mut::<Gems>(mine).unwrap().0 = 1;

        let done = env
            .run_until(
                move |env| {
                    env.actors()
                        .component_of::<Delivered>(camp)
                        .is_some_and(|d| d.0 == 1)
                },
                500,
                &mut NoopObserver,
            )
            .unwrap();
        assert!(done);
    }

    // ── Multi-stage assembly line ─────────────────────────────────────────

    const DEPOT:  Kind = Kind(13);
    const RIG:    Kind = Kind(14);
    const PORTER: Kind = Kind(15);

    const PART_COUNT: usize = 2;

    #[derive(Clone, Copy, Default)]
    struct Ships(usize);
    #[derive(Clone, Copy, Default)]
    struct Shelf(u32);
    #[derive(Clone, Copy, Default)]
    struct RigBins([u32; PART_COUNT]);
    #[derive(Clone, Copy, Default)]
    struct Built(u32);
    #[derive(Clone, Copy, Default)]
    struct Mitt(Option<usize>);

    /// Consumes one part of each kind per tick when every bin is stocked.
    struct RigMind;

    impl Mind for RigMind {
        fn act(&mut self, me: ActorId, view: &WorldView<'_>, _rng: &mut ActorRng) -> Vec<Action> {
            let stocked = view
                .actors
                .component_of::<RigBins>(me)
                .is_some_and(|b| b.0.iter().all(|&n| n > 0));
            if !stocked {
                return Vec::new();
            }
            vec![Action::Interact {
                target: me,
                effect: Rc::new(|me, _, store: &mut ActorStore| {
                    if let Some(bins) = store.component_of_mut::<RigBins>(me) {
                        for n in &mut bins.0 {
                            *n -= 1;
                        }
                    }
                    if let Some(built) = store.component_of_mut::<Built>(me) {
                        built.0 += 1;
                    }
                }),
            }]
        }
    }

    fn take_part_effect() -> InteractFn {
        Rc::new(|porter, depot, store: &mut ActorStore| {
            let Some(part) = store.component_of::<Ships>(depot).map(|s| s.0) else {
                return;
            };
            let Some(shelf) = store.component_of_mut::<Shelf>(depot) else {
                return;
            };
            if shelf.0 == 0 {
                return;
            }
            shelf.0 -= 1;
            if let Some(mitt) = store.component_of_mut::<Mitt>(porter) {
                mitt.0 = Some(part);
            }
        })
    }

    fn drop_part_effect() -> InteractFn {
        Rc::new(|porter, rig, store: &mut ActorStore| {
            let Some(part) = store.component_of_mut::<Mitt>(porter).and_then(|m| m.0.take())
            else {
                return;
            };
            if let Some(bins) = store.component_of_mut::<RigBins>(rig) {
                if let Some(bin) = bins.0.get_mut(part) {
                    *bin += 1;
                }
            }
        })
    }

    fn porter_agent() -> BdiAgent {
        let params = AgentParams { perception: 20.0, reach: 1.5, speed: 2.0 };
        BdiAgent::new(params)
            .on_sense(|beliefs, _seen, me, view| {
                let held = view.actors.component_of::<Mitt>(me).and_then(|m| m.0);
                beliefs.set("carrying", held.is_some());

                let Some(here) = view.actors.position(me) else {
                    return;
                };
                if let Some(rig) = view.nearest_of_kind(me, here, RIG) {
                    beliefs.set("rig", rig.actor);
                    if let Some(bins) = view.actors.component_of::<RigBins>(rig.actor) {
                        let wanted = bins
                            .0
                            .iter()
                            .enumerate()
                            .min_by_key(|&(_, &n)| n)
                            .map_or(0, |(i, _)| i);
                        beliefs.set("wanted", wanted as f32);
                    }
                }
            })
            .with_desire(Desire::new(
                "fetch",
                1.0,
                |b: &Beliefs| b.holds("carrying"),
                |b| {
                    let wanted = b.get_num("wanted").unwrap_or(0.0) as usize;
                    Plan::new().interact_nearest_where(
                        DEPOT,
                        move |d, view| {
                            view.actors.component_of::<Ships>(d).is_some_and(|s| s.0 == wanted)
                                && view.actors.component_of::<Shelf>(d).is_some_and(|s| s.0 > 0)
                        },
                        take_part_effect(),
                    )
                },
            ))
            .with_desire(Desire::new(
                "deliver",
                2.0,
                |b: &Beliefs| !b.holds("carrying"),
                |_| Plan::new().interact_nearest(RIG, drop_part_effect()),
            ))
    }

    /// Two porters keep a rig supplied from two single-part depots until it
    /// has built its quota.  Exercises the full pipeline: reactive producer
    /// minds, deliberating couriers, and component state threading through
    /// interaction effects.
    #[test]
    fn porters_keep_the_rig_building_until_quota() {
        let mut env = env_with_seed(21);
        env.actors_mut().register_component::<Ships>();
        env.actors_mut().register_component::<Shelf>();
        env.actors_mut().register_component::<RigBins>();
        env.actors_mut().register_component::<Built>();
        env.actors_mut().register_component::<Mitt>();

        let stock_depot = |env: &mut Environment, pos: Vec2, part: usize| {
            let depot = env.spawn_actor(DEPOT, pos).unwrap();
            env.actors_mut().component_of_mut::<Ships>(depot).unwrap().0 = part;
            env.actors_mut().component_of_mut::<Shelf>(depot).unwrap().0 = 3;
            depot
        };
        let left = stock_depot(&mut env, Vec2::new(20.0, 50.0), 0);
        let right = stock_depot(&mut env, Vec2::new(80.0, 50.0), 1);

        let rig = env.spawn_agent(RIG, Vec2::new(50.0, 50.0), Box::new(RigMind)).unwrap();
        let porters = [
            env.spawn_agent(PORTER, Vec2::new(50.0, 40.0), Box::new(porter_agent())).unwrap(),
            env.spawn_agent(PORTER, Vec2::new(50.0, 60.0), Box::new(porter_agent())).unwrap(),
        ];

        let done = env
            .run_until(
                move |env| env.actors().component_of::<Built>(rig).is_some_and(|b| b.0 >= 3),
                2_000,
                &mut NoopObserver,
            )
            .unwrap();

        assert!(done, "rig did not make quota by tick {}", env.tick());
        // Every shelved part either went into a build or is still in transit.
        assert_eq!(env.actors().component_of::<Shelf>(left).unwrap().0, 0);
        assert_eq!(env.actors().component_of::<Shelf>(right).unwrap().0, 0);
        for porter in porters {
            assert_eq!(env.actors().component_of::<Mitt>(porter).unwrap().0, None);
        }
    }
}
