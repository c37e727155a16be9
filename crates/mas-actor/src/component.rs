//! Type-erased, heterogeneous per-actor state storage.
//!
//! Each registered component type `T` is stored as a plain `Vec<T>` behind a
//! private type-erased column trait in a `HashMap<TypeId, …>`.  Indexing is
//! always by `ActorId` (`vec[actor.index()]`), and every column is kept the
//! same length as the population — retired actors keep their slot, holding
//! whatever value they last had.
//!
//! Only [`ComponentMap`] is public: columns are an implementation detail,
//! reachable solely through the typed `get`/`get_mut` slice accessors.
//!
//! # Usage
//!
//! ```rust
//! use mas_actor::ComponentMap;
//!
//! #[derive(Default)]
//! struct GemsLeft(u32);
//!
//! let mut map = ComponentMap::new();
//! map.register::<GemsLeft>(0);
//! assert!(map.contains::<GemsLeft>());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

// ── Column erasure ────────────────────────────────────────────────────────────

/// What `ComponentMap` needs from a column without knowing its `T`: grow by
/// one default element, and recover the concrete `Vec<T>` via `Any`.
trait Column: Send + Sync + 'static {
    fn push_default(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Default + Send + Sync + 'static> Column for Vec<T> {
    fn push_default(&mut self) {
        self.push(T::default());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── ComponentMap ──────────────────────────────────────────────────────────────

/// Registry of application-defined component columns, one `Vec<T>` per type.
///
/// When a new actor is spawned, [`ComponentMap::push_defaults`] appends
/// `T::default()` for every registered type in a single pass, so columns can
/// never drift out of sync with the population.
#[derive(Default)]
pub struct ComponentMap {
    map: HashMap<TypeId, Box<dyn Column>>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Register component type `T`, pre-filling `current_count` default
    /// values so existing actors get a slot too.
    ///
    /// Calling this twice for the same `T` is a no-op — existing data is not
    /// disturbed.
    pub fn register<T: Default + Send + Sync + 'static>(&mut self, current_count: usize) {
        let key = TypeId::of::<T>();
        if self.map.contains_key(&key) {
            return;
        }
        let mut column: Vec<T> = Vec::with_capacity(current_count);
        column.resize_with(current_count, T::default);
        self.map.insert(key, Box::new(column));
    }

    /// Append `T::default()` for every registered component type.
    ///
    /// Called once per spawned actor by `ActorStore::spawn`.
    pub(crate) fn push_defaults(&mut self) {
        for column in self.map.values_mut() {
            column.push_default();
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Shared slice of component `T` for all actors (indexed by `ActorId`).
    ///
    /// Returns `None` if `T` was never registered.
    pub fn get<T: Default + Send + Sync + 'static>(&self) -> Option<&[T]> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<Vec<T>>())
            .map(Vec::as_slice)
    }

    /// Mutable slice of component `T`.
    ///
    /// Returns `None` if `T` was never registered.
    pub fn get_mut<T: Default + Send + Sync + 'static>(&mut self) -> Option<&mut [T]> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Vec<T>>())
            .map(Vec::as_mut_slice)
    }

    // ── Metadata ──────────────────────────────────────────────────────────

    /// Number of distinct component types currently registered.
    pub fn type_count(&self) -> usize {
        self.map.len()
    }

    /// `true` if component `T` has been registered.
    pub fn contains<T: Default + Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }
}
