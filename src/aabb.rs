//! Axis-Aligned Bounding Boxes
//!
//! Broad-phase pruning volume. Each body stores its AABB in the body-local
//! frame (centred on the body origin); world-space queries offset both boxes
//! by their owning bodies' positions before testing.
//!
//! Overlap is a pure predicate with no side effects — a failed test simply
//! means "no possible contact", never an error.

use crate::body::Body;
use crate::math::Vec2;

/// Axis-aligned bounding box with `min`/`max` corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    #[inline]
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Both corners finite and not inverted on either axis.
    ///
    /// A degenerate (point or line) box is still valid; only `max < min` or
    /// non-finite bounds are rejected.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.max.x - self.min.x < 0.0 {
            return false;
        }
        if self.max.y - self.min.y < 0.0 {
            return false;
        }
        self.min.is_valid() && self.max.is_valid()
    }

    /// Translate both corners by `offset`. Converts a body-local box to
    /// world space when `offset` is the body position.
    #[inline]
    #[must_use]
    pub fn offset(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Whether a point lies inside this box (bounds inclusive).
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Whether two boxes overlap: they must overlap on both axes.
    #[inline]
    #[must_use]
    pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
        a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
    }

    /// Whether two bodies' AABBs overlap in world space.
    #[inline]
    #[must_use]
    pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
        Self::overlaps(&a.aabb().offset(a.position), &b.aabb().offset(b.position))
    }
}

// ============================================================================
// Tests
// ============================================================================
