//! 2D Vector and Rotation-Matrix Primitives
//!
//! Everything downstream (shapes, bodies, the contact solver) is built on the
//! two types in this module:
//!
//! - [`Vec2`]: 2D vector with full operator overloading
//! - [`Mat2`]: 2×2 rotation matrix built from an angle in radians
//!
//! All arithmetic is `f64`. Values can become NaN/±∞ under caller abuse
//! (e.g. seeding a body with an infinite position); [`Vec2::is_valid`] is the
//! explicit validity predicate for callers that sanitize scene input. The
//! engine itself never consults it.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// ============================================================================
// Vec2 — 2D Vector
// ============================================================================

/// 2D vector with `f64` components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Zero vector (0, 0)
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit X vector (1, 0)
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0 };

    /// Unit Y vector (0, 1)
    pub const UNIT_Y: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new 2D vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a unit direction vector from an angle in radians.
    #[inline]
    #[must_use]
    pub fn from_angle(direction: f64) -> Self {
        Self {
            x: direction.cos(),
            y: direction.sin(),
        }
    }

    /// Squared length (avoids sqrt).
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product (returns a scalar: `a.x * b.y - a.y * b.x`).
    ///
    /// This is the z-component of the 3D cross product when both vectors are
    /// embedded in the XY plane.
    #[inline]
    #[must_use]
    pub fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Cross product with a scalar: the perpendicular of this vector scaled
    /// by `s`. Used for the angular contribution `ω × r` of a rotating body.
    #[inline]
    #[must_use]
    pub fn cross_scalar(self, s: f64) -> Self {
        self.normal() * s
    }

    /// Return the perpendicular vector `(-y, x)`.
    #[inline]
    #[must_use]
    pub fn normal(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Normalize to unit length.
    ///
    /// A zero-length vector divides by 1 instead of 0 and comes back
    /// unchanged, never NaN.
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut d = self.length();
        if d == 0.0 {
            d = 1.0;
        }
        Self {
            x: self.x / d,
            y: self.y / d,
        }
    }

    /// Distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Scale by a scalar.
    #[inline]
    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Neither component is NaN or ±infinity.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Both components are exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

// ============================================================================
// Mat2 — 2×2 Rotation Matrix
// ============================================================================

/// 2×2 rotation matrix, stored as two row vectors.
///
/// `from_angle(θ)` produces the counter-clockwise rotation
///
/// ```text
/// | cos θ  -sin θ |
/// | sin θ   cos θ |
/// ```
///
/// used to carry shape-local vertices and normals into world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat2 {
    /// First row: (m00, m01)
    pub row1: Vec2,
    /// Second row: (m10, m11)
    pub row2: Vec2,
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat2 {
    /// Identity rotation (angle 0).
    pub const IDENTITY: Self = Self {
        row1: Vec2 { x: 1.0, y: 0.0 },
        row2: Vec2 { x: 0.0, y: 1.0 },
    };

    /// Build a rotation matrix from an angle in radians.
    #[must_use]
    pub fn from_angle(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            row1: Vec2::new(cos, -sin),
            row2: Vec2::new(sin, cos),
        }
    }

    /// Reset this matrix to the rotation for `radians`.
    #[inline]
    pub fn set_angle(&mut self, radians: f64) {
        *self = Self::from_angle(radians);
    }

    /// Copy another matrix into this one.
    #[inline]
    pub fn set(&mut self, other: &Mat2) {
        *self = *other;
    }

    /// Transposed matrix. For a rotation this is the inverse.
    #[inline]
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            row1: Vec2::new(self.row1.x, self.row2.x),
            row2: Vec2::new(self.row1.y, self.row2.y),
        }
    }

    /// Transform a vector, returning the rotated copy.
    #[inline]
    #[must_use]
    pub fn mul(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.row1.x * v.x + self.row1.y * v.y,
            self.row2.x * v.x + self.row2.y * v.y,
        )
    }

    /// Transform a vector in place.
    #[inline]
    pub fn mul_in_place(&self, v: &mut Vec2) {
        *v = self.mul(*v);
    }
}

// ============================================================================
// Tests
// ============================================================================
