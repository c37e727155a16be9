//! Planar geometry: `Vec2` points/vectors and `Rect` axis-aligned regions.
//!
//! Coordinates are `f32` (single-precision).  Simulation planes are at most
//! a few thousand units across, so f32 keeps spatial-index entries half the
//! size of f64 with precision to spare.
//!
//! # Containment convention
//!
//! `Rect::contains` is **half-open**: `[x, x+w) × [y, y+h)`.  This makes
//! quadrant membership unambiguous — a point on the seam between two
//! quadrants belongs to exactly one of them.  Query areas that need to keep
//! their far edges use the closed [`Rect::covers`] instead.

use std::ops::{Add, AddAssign, Mul, Sub};

// ── Vec2 ──────────────────────────────────────────────────────────────────────

/// A 2-D point or direction vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec2) -> f32 {
        (self - other).length_sq()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Unit vector in the same direction, or `Vec2::ZERO` for the zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self * (1.0 / len) } else { Vec2::ZERO }
    }

    /// Advance at most `step` toward `target`, landing exactly on it when the
    /// remaining distance is shorter than `step`.
    pub fn step_toward(self, target: Vec2, step: f32) -> Vec2 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= step || dist == 0.0 {
            target
        } else {
            self + delta * (step / dist)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle described by its top-left corner and size.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square region of half-extent `radius` centered on `center`.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Half-open containment: `[x, x+w) × [y, y+h)`.
    ///
    /// Used for tree-structural membership so seam points land in exactly
    /// one quadrant.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Closed containment: `[x, x+w] × [y, y+h]`.
    ///
    /// Used for query areas, where a point sitting exactly on the far edge
    /// should still be reported.
    #[inline]
    pub fn covers(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// `true` if the two rectangles overlap (edge contact counts).
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }

    /// The `i`-th equal quadrant: 0 = NW, 1 = NE, 2 = SW, 3 = SE.
    pub fn quadrant(&self, i: usize) -> Rect {
        let hw = self.w * 0.5;
        let hh = self.h * 0.5;
        match i {
            0 => Rect::new(self.x, self.y, hw, hh),
            1 => Rect::new(self.x + hw, self.y, hw, hh),
            2 => Rect::new(self.x, self.y + hh, hw, hh),
            3 => Rect::new(self.x + hw, self.y + hh, hw, hh),
            _ => unreachable!("quadrant index must be 0..4"),
        }
    }

    /// Squared distance from `p` to the nearest point of the rectangle.
    ///
    /// Zero when `p` is inside.  This is the pruning metric for quadtree
    /// nearest-neighbor search: a subtree can be skipped when this value
    /// already exceeds the best squared distance found so far.
    pub fn min_dist_sq(&self, p: Vec2) -> f32 {
        let dx = (self.x - p.x).max(0.0).max(p.x - (self.x + self.w));
        let dy = (self.y - p.y).max(0.0).max(p.y - (self.y + self.h));
        dx * dx + dy * dy
    }

    /// Clamp `p` to lie inside the rectangle (half-open on the far edges,
    /// nudged in by the smallest representable amount that matters here).
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        let max_x = (self.x + self.w) - self.w * 1e-6;
        let max_y = (self.y + self.h) - self.h * 1e-6;
        Vec2::new(p.x.clamp(self.x, max_x), p.y.clamp(self.y, max_y))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1},{:.1} {:.1}×{:.1}]", self.x, self.y, self.w, self.h)
    }
}
