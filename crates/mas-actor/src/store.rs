//! Core population storage: `ActorStore` (parallel arrays) and `ActorRngs`
//! (per-actor RNG).
//!
//! # Why two structs?
//!
//! The act phase needs `&mut ActorRngs` (the acting agent draws randomness)
//! and `&ActorStore` (read-only world state) simultaneously.  Keeping the
//! RNGs outside the store lets the borrow checker see the two borrows are
//! disjoint.
//!
//! # Identity model
//!
//! `ActorId` is the index into every parallel array.  Slots are never
//! reused: retiring an actor flips its `alive` flag and the slot becomes a
//! permanent tombstone.  With `u32` IDs that allows ~4.3 billion spawns per
//! run before exhaustion.

use mas_core::{ActorId, ActorRng, Kind, Vec2};

use crate::component::ComponentMap;

// ── ActorRngs ─────────────────────────────────────────────────────────────────

/// Per-actor deterministic RNG state, separated from [`ActorStore`] to allow
/// simultaneous `&mut ActorRngs` + `&ActorStore` borrows during the act
/// phase.
pub struct ActorRngs {
    global_seed: u64,
    inner: Vec<ActorRng>,
}

impl ActorRngs {
    pub fn new(global_seed: u64) -> Self {
        Self { global_seed, inner: Vec::new() }
    }

    /// Ensure an RNG exists for every slot up to `count`.
    ///
    /// Seeds depend only on the global seed and the actor index, so growing
    /// the population never perturbs existing actors' streams.
    pub fn grow_to(&mut self, count: usize) {
        while self.inner.len() < count {
            let id = ActorId(self.inner.len() as u32);
            self.inner.push(ActorRng::new(self.global_seed, id));
        }
    }

    /// Mutable reference to one actor's RNG.
    ///
    /// # Panics
    /// Panics if `actor` has no slot — call [`grow_to`](Self::grow_to) after
    /// every spawn.
    #[inline]
    pub fn get_mut(&mut self, actor: ActorId) -> &mut ActorRng {
        &mut self.inner[actor.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── ActorStore ────────────────────────────────────────────────────────────────

/// Parallel-array storage for the actor population.
///
/// Every `Vec` field has one element per ever-spawned actor; the `ActorId`
/// value is the index into all of them.  Application-defined state lives in
/// [`ComponentMap`] and is accessed via [`ActorStore::component`] /
/// [`ActorStore::component_mut`].
#[derive(Default)]
pub struct ActorStore {
    kinds:     Vec<Kind>,
    positions: Vec<Vec2>,
    alive:     Vec<bool>,

    /// Actors whose position changed since the last `drain_moved` call,
    /// with a parallel flag array so repeat movers are recorded once.
    moved:      Vec<ActorId>,
    moved_flag: Vec<bool>,

    live: usize,

    components: ComponentMap,
}

impl ActorStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Append a new live actor and return its ID.
    ///
    /// Every registered component gets a `T::default()` slot for it.
    pub fn spawn(&mut self, kind: Kind, pos: Vec2) -> ActorId {
        let id = ActorId(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.positions.push(pos);
        self.alive.push(true);
        self.moved_flag.push(false);
        self.components.push_defaults();
        self.live += 1;
        id
    }

    /// Mark `actor` dead.  Returns `false` if it was unknown or already
    /// dead — callers that treat that as a consistency error (the
    /// environment does) surface it themselves.
    pub fn retire(&mut self, actor: ActorId) -> bool {
        match self.alive.get_mut(actor.index()) {
            Some(flag) if *flag => {
                *flag = false;
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Total slots ever allocated, dead ones included.
    pub fn slot_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of live actors.
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.alive.get(actor.index()).copied().unwrap_or(false)
    }

    /// The actor's kind tag, if it is alive.
    pub fn kind(&self, actor: ActorId) -> Option<Kind> {
        self.is_alive(actor).then(|| self.kinds[actor.index()])
    }

    /// The actor's position, if it is alive.
    pub fn position(&self, actor: ActorId) -> Option<Vec2> {
        self.is_alive(actor).then(|| self.positions[actor.index()])
    }

    /// Move `actor` to `pos`, recording it for the next spatial-index sync.
    ///
    /// Returns `false` (and does nothing) for dead or unknown actors.
    pub fn set_position(&mut self, actor: ActorId, pos: Vec2) -> bool {
        if !self.is_alive(actor) {
            return false;
        }
        let i = actor.index();
        if self.positions[i] == pos {
            return true;
        }
        self.positions[i] = pos;
        if !self.moved_flag[i] {
            self.moved_flag[i] = true;
            self.moved.push(actor);
        }
        true
    }

    /// Iterator over all live `ActorId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(|(i, _)| ActorId(i as u32))
    }

    /// Take the list of actors that moved since the last call, in the order
    /// they first moved.  Clears the dirty flags.
    pub fn drain_moved(&mut self) -> Vec<ActorId> {
        for actor in &self.moved {
            self.moved_flag[actor.index()] = false;
        }
        std::mem::take(&mut self.moved)
    }

    // ── Component access ──────────────────────────────────────────────────

    /// Register an application component type, giving every current and
    /// future actor a `T::default()` slot.
    pub fn register_component<T: Default + Send + Sync + 'static>(&mut self) {
        self.components.register::<T>(self.slot_count());
    }

    /// Read-only slice of application component `T`, indexed by
    /// `actor.index()`.  `None` if `T` was never registered.
    pub fn component<T: Default + Send + Sync + 'static>(&self) -> Option<&[T]> {
        self.components.get::<T>()
    }

    /// Mutable slice of application component `T`.
    pub fn component_mut<T: Default + Send + Sync + 'static>(&mut self) -> Option<&mut [T]> {
        self.components.get_mut::<T>()
    }

    /// One live actor's `T` value, if the component exists and the actor is
    /// alive.
    pub fn component_of<T: Default + Send + Sync + 'static>(&self, actor: ActorId) -> Option<&T> {
        if !self.is_alive(actor) {
            return None;
        }
        self.component::<T>().and_then(|s| s.get(actor.index()))
    }

    /// Mutable access to one live actor's `T` value.
    pub fn component_of_mut<T: Default + Send + Sync + 'static>(
        &mut self,
        actor: ActorId,
    ) -> Option<&mut T> {
        if !self.is_alive(actor) {
            return None;
        }
        self.component_mut::<T>().and_then(|s| s.get_mut(actor.index()))
    }

    /// Reference to the whole `ComponentMap`.
    pub fn components(&self) -> &ComponentMap {
        &self.components
    }
}
