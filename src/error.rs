//! Engine Error Types
//!
//! Unified error type for operations that can fail loudly. Geometric misses
//! (a separating axis, an under-clipped face, a failed overlap test) are not
//! errors — they surface as `None`/zero contacts by design. `PhysicsError`
//! covers genuine caller mistakes: degenerate geometry, non-finite bounds and
//! out-of-range body handles.

use core::fmt;

/// Unified error type for physics operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsError {
    /// Body index is out of range.
    InvalidBodyIndex {
        /// The invalid index that was provided
        index: usize,
        /// Current number of bodies in the world
        count: usize,
    },
    /// Joint index is out of range.
    InvalidJointIndex {
        /// The invalid index that was provided
        index: usize,
        /// Current number of joints in the world
        count: usize,
    },
    /// A supplied AABB has non-finite or inverted bounds.
    InvalidAabb,
    /// A body position or velocity contains NaN/±infinity.
    NonFiniteState {
        /// Which quantity was non-finite
        quantity: &'static str,
    },
    /// A polygon's convex hull collapsed below three vertices.
    DegeneratePolygon {
        /// Number of hull vertices that survived
        hull_vertices: usize,
    },
    /// Invalid configuration parameter.
    InvalidConfiguration {
        /// Description of the invalid configuration
        reason: &'static str,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBodyIndex { index, count } => {
                write!(f, "body index {index} out of range (count={count})")
            }
            Self::InvalidJointIndex { index, count } => {
                write!(f, "joint index {index} out of range (count={count})")
            }
            Self::InvalidAabb => write!(f, "AABB has non-finite or inverted bounds"),
            Self::NonFiniteState { quantity } => {
                write!(f, "non-finite {quantity}")
            }
            Self::DegeneratePolygon { hull_vertices } => {
                write!(f, "convex hull has {hull_vertices} vertices, need at least 3")
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

// ============================================================================
// Tests
// ============================================================================
