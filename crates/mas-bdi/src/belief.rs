//! Belief storage: a private proposition-key → value map.
//!
//! Beliefs belong to exactly one agent and are updated only by that agent's
//! own sensing and deliberation code — there is no cross-agent sharing and
//! no global blackboard.  The framework attaches no meaning to keys; they
//! are plain strings chosen by the application ("carrying", "home", …).

use rustc_hash::FxHashMap;

use mas_core::{ActorId, Kind, Vec2};

// ── Belief ────────────────────────────────────────────────────────────────────

/// A single belief value.
///
/// The variants cover what plans and predicates actually need: flags,
/// quantities, references to actors and places, kind tags, and free text.
#[derive(Clone, Debug, PartialEq)]
pub enum Belief {
    Bool(bool),
    Num(f32),
    Text(String),
    Actor(ActorId),
    Point(Vec2),
    Kind(Kind),
}

impl From<bool> for Belief {
    fn from(v: bool) -> Self {
        Belief::Bool(v)
    }
}

impl From<f32> for Belief {
    fn from(v: f32) -> Self {
        Belief::Num(v)
    }
}

impl From<&str> for Belief {
    fn from(v: &str) -> Self {
        Belief::Text(v.to_owned())
    }
}

impl From<String> for Belief {
    fn from(v: String) -> Self {
        Belief::Text(v)
    }
}

impl From<ActorId> for Belief {
    fn from(v: ActorId) -> Self {
        Belief::Actor(v)
    }
}

impl From<Vec2> for Belief {
    fn from(v: Vec2) -> Self {
        Belief::Point(v)
    }
}

impl From<Kind> for Belief {
    fn from(v: Kind) -> Self {
        Belief::Kind(v)
    }
}

// ── Beliefs ───────────────────────────────────────────────────────────────────

/// One agent's belief store.
#[derive(Default)]
pub struct Beliefs {
    map: FxHashMap<String, Belief>,
}

impl Beliefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `key`, replacing any previous belief.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Belief>) {
        self.map.insert(key.into(), value.into());
    }

    /// Forget `key`.  Returns the dropped belief, if any.
    pub fn unset(&mut self, key: &str) -> Option<Belief> {
        self.map.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Belief> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// `true` exactly when `key` holds `Bool(true)`.
    pub fn holds(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(Belief::Bool(true)))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // ── Typed accessors ───────────────────────────────────────────────────
    //
    // Each returns `None` when the key is absent *or* holds a different
    // variant — a type mismatch is treated as "I don't know", not a panic.

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(Belief::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_num(&self, key: &str) -> Option<f32> {
        match self.map.get(key) {
            Some(Belief::Num(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(Belief::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_actor(&self, key: &str) -> Option<ActorId> {
        match self.map.get(key) {
            Some(Belief::Actor(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_point(&self, key: &str) -> Option<Vec2> {
        match self.map.get(key) {
            Some(Belief::Point(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_kind(&self, key: &str) -> Option<Kind> {
        match self.map.get(key) {
            Some(Belief::Kind(v)) => Some(*v),
            _ => None,
        }
    }
}
