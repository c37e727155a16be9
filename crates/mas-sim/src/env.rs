//! The `Environment` struct and its tick loop.

use mas_actor::{ActorRngs, ActorStore};
use mas_behavior::{Action, Mind, WorldView};
use mas_core::{ActorId, Kind, Rect, Tick, Vec2};
use mas_spatial::{Quadtree, SpatialEntry};

use crate::{EnvObserver, SimError, SimResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Environment construction parameters.
#[derive(Clone, Copy, Debug)]
pub struct EnvConfig {
    /// Quadtree leaf capacity before a split.
    pub capacity: usize,
    /// Maximum quadtree subdivision depth.
    pub max_depth: u32,
    /// Global seed all per-actor RNG streams derive from.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self { capacity: 8, max_depth: 8, seed: 0 }
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// The simulation world: the actor population, the spatial index over it,
/// the registered minds, and the clock.
///
/// The tick loop is strictly sequential.  Each tick:
///
/// 1. **Index sync** — positions changed last tick are pushed into the
///    quadtree, so every agent this tick perceives the same start-of-tick
///    snapshot of where everyone is.
/// 2. **Act + apply** — each mind, in registration order, observes the world
///    through a fresh [`WorldView`] and returns its actions, which are
///    applied immediately.  Only the currently acting agent's actions touch
///    the world, so a run is reproducible from its seed alone.  Agents
///    spawned during the tick are not asked to act until the next one.
/// 3. The clock advances.
pub struct Environment {
    bounds: Rect,
    tick:   Tick,
    actors: ActorStore,
    index:  Quadtree,
    rngs:   ActorRngs,
    /// Registered minds in spawn order.  Entries whose actor has been
    /// retired are skipped, not removed, so indices stay stable.
    minds: Vec<(ActorId, Box<dyn Mind>)>,
}

impl Environment {
    pub fn new(bounds: Rect, config: EnvConfig) -> Self {
        Self {
            bounds,
            tick:   Tick::ZERO,
            actors: ActorStore::new(),
            index:  Quadtree::new(bounds, config.capacity, config.max_depth),
            rngs:   ActorRngs::new(config.seed),
            minds:  Vec::new(),
        }
    }

    // ── Population management ─────────────────────────────────────────────

    /// Add a mindless actor (a mine, a landmark, a resource).
    ///
    /// Population and index are mutated together: an out-of-bounds position
    /// rejects the spawn entirely.
    pub fn spawn_actor(&mut self, kind: Kind, pos: Vec2) -> SimResult<ActorId> {
        let actor = self.actors.spawn(kind, pos);
        if let Err(e) = self.index.insert(SpatialEntry::new(actor, kind, pos)) {
            // Roll back; the burnt id is never reused.
            self.actors.retire(actor);
            return Err(e.into());
        }
        self.rngs.grow_to(self.actors.slot_count());
        Ok(actor)
    }

    /// Add an actor driven by `mind`.  It first acts on the next tick.
    pub fn spawn_agent(
        &mut self,
        kind: Kind,
        pos: Vec2,
        mind: Box<dyn Mind>,
    ) -> SimResult<ActorId> {
        let actor = self.spawn_actor(kind, pos)?;
        self.minds.push((actor, mind));
        Ok(actor)
    }

    /// Retire `actor` and drop it from the spatial index.
    pub fn remove_actor(&mut self, actor: ActorId) -> SimResult<()> {
        if !self.actors.retire(actor) {
            return Err(SimError::ActorNotFound(actor));
        }
        self.index.remove(actor)?;
        Ok(())
    }

    // ── Query surface ─────────────────────────────────────────────────────

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn actors(&self) -> &ActorStore {
        &self.actors
    }

    /// Mutable store access, for component registration and scenario setup.
    pub fn actors_mut(&mut self) -> &mut ActorStore {
        &mut self.actors
    }

    pub fn index(&self) -> &Quadtree {
        &self.index
    }

    /// Nearest live actor of `kind` to `point`.
    ///
    /// Positions are as of the last index sync; liveness is current.
    pub fn nearest(&self, point: Vec2, kind: Kind) -> Option<SpatialEntry> {
        self.index
            .nearest(point, |e| e.kind == kind && self.actors.is_alive(e.actor))
    }

    /// All live actors within `radius` of `point`.
    pub fn nearby(&self, point: Vec2, radius: f32) -> Vec<SpatialEntry> {
        let mut found = self.index.query_radius(point, radius);
        found.retain(|e| self.actors.is_alive(e.actor));
        found
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    ///
    /// Returns the number of agents that emitted at least one action.
    pub fn step(&mut self) -> SimResult<usize> {
        // ── Phase 1: index sync ───────────────────────────────────────────
        //
        // Push last tick's movement into the quadtree.  Everyone acting this
        // tick then sees the same start-of-tick position snapshot.
        for actor in self.actors.drain_moved() {
            if !self.actors.is_alive(actor) {
                continue;
            }
            if let Some(pos) = self.actors.position(actor) {
                self.index.update(actor, pos)?;
            }
        }

        // ── Phase 2: act + apply, in registration order ───────────────────
        //
        // The mind list length is latched before the loop: agents spawned by
        // an action this tick are registered past `registered` and first act
        // next tick.
        let registered = self.minds.len();
        let mut acted = 0;
        for i in 0..registered {
            let actor = self.minds[i].0;
            if !self.actors.is_alive(actor) {
                continue;
            }
            // Disjoint field borrows: the view reads actors + index, the
            // mind and the rng are mutated.
            let actions = {
                let view = WorldView::new(self.tick, self.bounds, &self.actors, &self.index);
                let rng = self.rngs.get_mut(actor);
                self.minds[i].1.act(actor, &view, rng)
            };
            if !actions.is_empty() {
                acted += 1;
            }
            self.apply(actor, actions)?;
        }

        // ── Phase 3: advance the clock ────────────────────────────────────
        self.tick = self.tick + 1;
        Ok(acted)
    }

    /// Run exactly `steps` ticks, reporting each to `observer`.
    pub fn run<O: EnvObserver>(&mut self, steps: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..steps {
            let now = self.tick;
            observer.on_tick_start(now);
            let acted = self.step()?;
            observer.on_tick_end(now, acted);
        }
        observer.on_sim_end(self.tick);
        Ok(())
    }

    /// Run until `pred` holds, or `max_steps` ticks elapse.
    ///
    /// `pred` is checked before every tick; returns whether it held.
    pub fn run_until<O, P>(
        &mut self,
        mut pred: P,
        max_steps: u64,
        observer: &mut O,
    ) -> SimResult<bool>
    where
        O: EnvObserver,
        P: FnMut(&Environment) -> bool,
    {
        for _ in 0..max_steps {
            if pred(self) {
                observer.on_sim_end(self.tick);
                return Ok(true);
            }
            let now = self.tick;
            observer.on_tick_start(now);
            let acted = self.step()?;
            observer.on_tick_end(now, acted);
        }
        observer.on_sim_end(self.tick);
        Ok(pred(self))
    }

    // ── Apply phase ───────────────────────────────────────────────────────

    /// Apply one agent's actions, immediately and in order.
    ///
    /// Stale requests (the actor or its target died earlier this tick) are
    /// dropped silently; the world an agent observed is always at least one
    /// apply-step old, so these races are expected.
    fn apply(&mut self, actor: ActorId, actions: Vec<Action>) -> SimResult<()> {
        for action in actions {
            match action {
                Action::MoveTo(pos) => {
                    if self.actors.is_alive(actor) {
                        self.actors.set_position(actor, self.bounds.clamp(pos));
                    }
                }

                Action::Interact { target, effect } => {
                    if self.actors.is_alive(actor) && self.actors.is_alive(target) {
                        effect(actor, target, &mut self.actors);
                    }
                }

                Action::Spawn { kind, pos, mind } => {
                    // Agent-requested positions are clamped rather than
                    // rejected; only direct API spawns get the hard error.
                    let spawned = self.spawn_actor(kind, self.bounds.clamp(pos))?;
                    if let Some(mind) = mind {
                        self.minds.push((spawned, mind));
                    }
                }

                Action::Remove(target) => {
                    if self.actors.is_alive(target) {
                        self.remove_actor(target)?;
                    }
                }
            }
        }
        Ok(())
    }
}
