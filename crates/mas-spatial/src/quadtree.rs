//! `Quadtree` — incremental point-region quadtree.
//!
//! # Structure
//!
//! Each node covers an axis-aligned region.  A leaf holds up to `capacity`
//! entries; inserting past that splits the leaf into four equal quadrants
//! and redistributes its entries.  Splitting is lazy (only on overflow) and
//! stops at `max_depth` — a max-depth leaf may exceed capacity, so any
//! number of actors at one identical point is fine.
//!
//! Node regions and depths are recomputed on descent rather than stored,
//! which keeps nodes at two words and makes the containment invariant
//! (every entry lies inside its node's region) impossible to corrupt by a
//! stale cached rect.
//!
//! # Bookkeeping
//!
//! A side table maps every indexed `ActorId` to its `(Kind, Vec2)`.  It
//! enforces the exactly-once invariant (`AlreadyInserted` / `NotFound`),
//! answers `contains`/`position_of` in O(1), and lets `remove` descend by
//! the last-known position instead of searching.
//!
//! # Removal
//!
//! Removal never merges children back into a leaf.  Collapse is deliberately
//! deferred: the split structure simply persists, and the containment
//! invariant is unaffected.

use rustc_hash::FxHashMap;

use mas_core::{ActorId, Kind, Rect, Vec2};

use crate::{SpatialError, SpatialResult};

// ── SpatialEntry ──────────────────────────────────────────────────────────────

/// One indexed actor: identity, type tag, and position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialEntry {
    pub actor: ActorId,
    pub kind:  Kind,
    pub pos:   Vec2,
}

impl SpatialEntry {
    #[inline]
    pub fn new(actor: ActorId, kind: Kind, pos: Vec2) -> Self {
        Self { actor, kind, pos }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

enum Node {
    Leaf { entries: Vec<SpatialEntry> },
    Branch { children: Box<[Node; 4]> },
}

impl Node {
    fn empty_leaf() -> Node {
        Node::Leaf { entries: Vec::new() }
    }

    fn empty_branch() -> Node {
        Node::Branch {
            children: Box::new([
                Node::empty_leaf(),
                Node::empty_leaf(),
                Node::empty_leaf(),
                Node::empty_leaf(),
            ]),
        }
    }
}

/// Which quadrant of `bounds` holds `p`: 0 = NW, 1 = NE, 2 = SW, 3 = SE.
///
/// Seam points go east/south, matching `Rect::quadrant`'s half-open regions.
#[inline]
fn quadrant_of(bounds: &Rect, p: Vec2) -> usize {
    let east = p.x >= bounds.x + bounds.w * 0.5;
    let south = p.y >= bounds.y + bounds.h * 0.5;
    (east as usize) | ((south as usize) << 1)
}

// ── Quadtree ──────────────────────────────────────────────────────────────────

/// An incremental point-region quadtree over `SpatialEntry`s.
pub struct Quadtree {
    bounds:    Rect,
    capacity:  usize,
    max_depth: u32,
    root:      Node,
    /// `ActorId → (Kind, last indexed position)` for every present entry.
    known: FxHashMap<ActorId, (Kind, Vec2)>,
}

impl Quadtree {
    /// Default leaf capacity, matching a handful of actors per screen-sized
    /// region before the first split.
    pub const DEFAULT_CAPACITY: usize = 8;
    /// Default subdivision limit.
    pub const DEFAULT_MAX_DEPTH: u32 = 8;

    /// Create an empty index over `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `bounds` is degenerate — both are
    /// construction-time configuration bugs, not runtime conditions.
    pub fn new(bounds: Rect, capacity: usize, max_depth: u32) -> Self {
        assert!(capacity > 0, "quadtree capacity must be greater than zero");
        assert!(bounds.w > 0.0 && bounds.h > 0.0, "quadtree bounds must have area");
        Self {
            bounds,
            capacity,
            max_depth,
            root: Node::empty_leaf(),
            known: FxHashMap::default(),
        }
    }

    /// Create an index with the default capacity and depth limit.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self::new(bounds, Self::DEFAULT_CAPACITY, Self::DEFAULT_MAX_DEPTH)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The root region.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// `true` if `actor` is currently indexed.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.known.contains_key(&actor)
    }

    /// The indexed position of `actor`, if present.
    pub fn position_of(&self, actor: ActorId) -> Option<Vec2> {
        self.known.get(&actor).map(|&(_, pos)| pos)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add `entry` to the index.
    ///
    /// Fails with `OutOfBounds` if the position lies outside the root
    /// region, and with `AlreadyInserted` if the actor is already indexed —
    /// an actor is reflected in the index exactly once.
    pub fn insert(&mut self, entry: SpatialEntry) -> SpatialResult<()> {
        if !self.bounds.contains(entry.pos) {
            return Err(SpatialError::OutOfBounds {
                actor:  entry.actor,
                pos:    entry.pos,
                bounds: self.bounds,
            });
        }
        if self.known.contains_key(&entry.actor) {
            return Err(SpatialError::AlreadyInserted(entry.actor));
        }
        insert_rec(&mut self.root, self.bounds, 0, self.capacity, self.max_depth, entry);
        self.known.insert(entry.actor, (entry.kind, entry.pos));
        Ok(())
    }

    /// Remove `actor` from the index.
    ///
    /// Fails with `NotFound` if absent — a sign the caller's population and
    /// index have drifted apart.
    pub fn remove(&mut self, actor: ActorId) -> SpatialResult<()> {
        let (_, pos) = self
            .known
            .remove(&actor)
            .ok_or(SpatialError::NotFound(actor))?;
        let removed = remove_rec(&mut self.root, self.bounds, pos, actor);
        debug_assert!(removed, "side table and tree disagree on {actor}");
        Ok(())
    }

    /// Record that `actor` moved to `new_pos`.
    ///
    /// Semantically remove-then-insert, but when the new position stays
    /// inside the leaf currently holding the entry, the entry is mutated in
    /// place with no structural change.
    pub fn update(&mut self, actor: ActorId, new_pos: Vec2) -> SpatialResult<()> {
        let &(kind, old_pos) = self.known.get(&actor).ok_or(SpatialError::NotFound(actor))?;
        if !self.bounds.contains(new_pos) {
            return Err(SpatialError::OutOfBounds {
                actor,
                pos: new_pos,
                bounds: self.bounds,
            });
        }

        if !relocate_rec(&mut self.root, self.bounds, old_pos, actor, new_pos) {
            // Left its leaf: re-insert from the root.
            insert_rec(
                &mut self.root,
                self.bounds,
                0,
                self.capacity,
                self.max_depth,
                SpatialEntry::new(actor, kind, new_pos),
            );
        }
        self.known.insert(actor, (kind, new_pos));
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The entry satisfying `pred` closest to `point`, or `None`.
    ///
    /// Subtrees are visited in order of minimum possible distance to
    /// `point` and skipped entirely once they cannot contain a strictly
    /// closer match than the best found so far.
    pub fn nearest<F>(&self, point: Vec2, mut pred: F) -> Option<SpatialEntry>
    where
        F: FnMut(&SpatialEntry) -> bool,
    {
        let mut best: Option<(f32, SpatialEntry)> = None;
        nearest_rec(&self.root, self.bounds, point, &mut pred, &mut best);
        best.map(|(_, entry)| entry)
    }

    /// All entries whose position lies within `area` (closed containment —
    /// points on the far edges are reported).
    pub fn query_rect(&self, area: Rect) -> Vec<SpatialEntry> {
        let mut out = Vec::new();
        query_rec(&self.root, self.bounds, &area, &mut out);
        out
    }

    /// All entries within Euclidean distance `radius` of `center`.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<SpatialEntry> {
        let r_sq = radius * radius;
        let mut out = self.query_rect(Rect::around(center, radius));
        out.retain(|e| e.pos.distance_sq(center) <= r_sq);
        out
    }
}

// ── Recursive workers ─────────────────────────────────────────────────────────

fn insert_rec(
    node:      &mut Node,
    bounds:    Rect,
    depth:     u32,
    capacity:  usize,
    max_depth: u32,
    entry:     SpatialEntry,
) {
    match node {
        Node::Branch { children } => {
            let q = quadrant_of(&bounds, entry.pos);
            insert_rec(&mut children[q], bounds.quadrant(q), depth + 1, capacity, max_depth, entry);
        }
        Node::Leaf { entries } => {
            if entries.len() < capacity || depth >= max_depth {
                entries.push(entry);
                return;
            }
            // Overflow: split into four quadrants and redistribute.
            let old = std::mem::take(entries);
            *node = Node::empty_branch();
            for e in old {
                insert_rec(node, bounds, depth, capacity, max_depth, e);
            }
            insert_rec(node, bounds, depth, capacity, max_depth, entry);
        }
    }
}

/// Remove `actor` from the leaf that covers `pos`.  Returns `false` only if
/// the entry was not where the side table said it would be.
fn remove_rec(node: &mut Node, bounds: Rect, pos: Vec2, actor: ActorId) -> bool {
    match node {
        Node::Branch { children } => {
            let q = quadrant_of(&bounds, pos);
            remove_rec(&mut children[q], bounds.quadrant(q), pos, actor)
        }
        Node::Leaf { entries } => match entries.iter().position(|e| e.actor == actor) {
            Some(i) => {
                entries.remove(i);
                true
            }
            None => false,
        },
    }
}

/// Try to move `actor` (currently in the leaf covering `old_pos`) to
/// `new_pos` without structural change.  Returns `true` if the entry was
/// updated in place; `false` if it crossed out of its leaf and was removed
/// (the caller must re-insert it from the root).
fn relocate_rec(node: &mut Node, bounds: Rect, old_pos: Vec2, actor: ActorId, new_pos: Vec2) -> bool {
    match node {
        Node::Branch { children } => {
            let q = quadrant_of(&bounds, old_pos);
            relocate_rec(&mut children[q], bounds.quadrant(q), old_pos, actor, new_pos)
        }
        Node::Leaf { entries } => {
            let Some(i) = entries.iter().position(|e| e.actor == actor) else {
                // Descent is driven by the side table; a miss here means the
                // entry must be re-added from the root.
                debug_assert!(false, "side table points at a leaf lacking {actor}");
                return false;
            };
            if bounds.contains(new_pos) {
                entries[i].pos = new_pos;
                true
            } else {
                entries.remove(i);
                false
            }
        }
    }
}

fn nearest_rec<F>(
    node:   &Node,
    bounds: Rect,
    point:  Vec2,
    pred:   &mut F,
    best:   &mut Option<(f32, SpatialEntry)>,
) where
    F: FnMut(&SpatialEntry) -> bool,
{
    match node {
        Node::Leaf { entries } => {
            for e in entries {
                if !pred(e) {
                    continue;
                }
                let d = point.distance_sq(e.pos);
                if best.is_none_or(|(b, _)| d < b) {
                    *best = Some((d, *e));
                }
            }
        }
        Node::Branch { children } => {
            // Visit quadrants nearest-first so the best distance tightens as
            // early as possible, maximizing pruning in later quadrants.
            let mut order: [(f32, usize); 4] = [(0.0, 0); 4];
            for (i, slot) in order.iter_mut().enumerate() {
                *slot = (bounds.quadrant(i).min_dist_sq(point), i);
            }
            order.sort_by(|a, b| a.0.total_cmp(&b.0));

            for (min_d, i) in order {
                if best.is_some_and(|(b, _)| min_d > b) {
                    // Every remaining quadrant is at least this far away.
                    break;
                }
                nearest_rec(&children[i], bounds.quadrant(i), point, pred, best);
            }
        }
    }
}

fn query_rec(node: &Node, bounds: Rect, area: &Rect, out: &mut Vec<SpatialEntry>) {
    match node {
        Node::Leaf { entries } => {
            out.extend(entries.iter().filter(|e| area.covers(e.pos)));
        }
        Node::Branch { children } => {
            for i in 0..4 {
                let child_bounds = bounds.quadrant(i);
                if child_bounds.intersects(area) {
                    query_rec(&children[i], child_bounds, area, out);
                }
            }
        }
    }
}
