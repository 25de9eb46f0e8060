//! # rigid2d
//!
//! **Discrete-time 2D rigid-body physics**
//!
//! A simulation kernel for circles and convex polygons: broad-phase AABB
//! pruning, narrow-phase collision detection (SAT with reference-face
//! clipping for polygons), a sequential-impulse contact solver with Coulomb
//! friction, positional penetration correction, semi-implicit Euler
//! integration and spring-damper joints.
//!
//! ## Quick Start
//!
//! ```rust
//! use rigid2d::prelude::*;
//!
//! let mut world = World::new(Vec2::new(0.0, -9.81));
//!
//! // A static floor and a falling ball
//! let floor = world
//!     .add_body(Body::new(Shape::rectangle(50.0, 1.0), Vec2::new(0.0, -1.0)))
//!     .unwrap();
//! world.bodies_mut()[floor].set_density(0.0);
//! let ball = world
//!     .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 10.0)))
//!     .unwrap();
//!
//! // Fixed-step simulation loop
//! let dt = world.config().preferred_dt();
//! for _ in 0..120 {
//!     world.step(dt);
//! }
//! assert!(world.bodies()[ball].position.y < 10.0);
//! ```
//!
//! ## Design
//!
//! - **No warm-starting**: contacts are rebuilt and solved from scratch every
//!   step (Box2D-lite style); stacking accuracy comes from iteration count.
//! - **Silent geometric rejection**: separating axes, failed clips and missed
//!   overlaps mean "no contact", never an error. [`PhysicsError`] is reserved
//!   for caller mistakes (degenerate polygons, non-finite state, bad
//!   indices).
//! - **Single-threaded stepping**: one `step` is an uninterruptible
//!   sequential pipeline; [`runner::StepGate`] coordinates a dedicated
//!   stepping thread with pause/resume and cooperative shutdown.

pub mod aabb;
pub mod arbiter;
pub mod body;
pub mod debug_render;
pub mod error;
pub mod explosion;
pub mod joint;
pub mod math;
pub mod profiling;
pub mod raycast;
pub mod runner;
pub mod shape;
pub mod slice;
pub mod world;

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::aabb::Aabb;
    pub use crate::arbiter::Arbiter;
    pub use crate::body::Body;
    pub use crate::error::PhysicsError;
    pub use crate::joint::Joint;
    pub use crate::math::{Mat2, Vec2};
    pub use crate::shape::Shape;
    pub use crate::world::{World, WorldConfig};
}

pub use prelude::*;
