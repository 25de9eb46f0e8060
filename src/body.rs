//! Rigid Bodies
//!
//! A [`Body`] combines one owned [`Shape`] with kinematic state (position,
//! orientation, velocities), per-step force/torque accumulators and material
//! properties (restitution, friction pair, damping).
//!
//! Mass of zero means infinite mass: `inv_mass`/`inv_inertia` are zero, the
//! solver's impulses cancel out and the integrator skips the body entirely.
//! That is the engine's representation of a static body, not an error state.

use crate::aabb::Aabb;
use crate::math::{Mat2, Vec2};
use crate::shape::Shape;

/// A simulated rigid body.
#[derive(Clone, Debug)]
pub struct Body {
    /// Collision shape, exclusively owned by this body.
    pub shape: Shape,
    /// World-space position of the centre of mass.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Angular velocity (radians per second, positive = CCW).
    pub angular_velocity: f64,
    /// Force accumulated for the current step, cleared after integration.
    pub force: Vec2,
    /// Torque accumulated for the current step, cleared after integration.
    pub torque: f64,
    /// Total mass (0 = static).
    pub mass: f64,
    /// Inverse mass (0 for static bodies).
    pub inv_mass: f64,
    /// Rotational inertia (0 = static).
    pub inertia: f64,
    /// Inverse rotational inertia (0 for static bodies).
    pub inv_inertia: f64,
    /// Coefficient of restitution (bounciness, 0..1).
    pub restitution: f64,
    /// Static friction coefficient.
    pub static_friction: f64,
    /// Dynamic friction coefficient.
    pub dynamic_friction: f64,
    /// Quadratic linear drag coefficient (0 = no drag).
    pub linear_damping: f64,
    /// Whether world gravity is applied to this body.
    pub affected_by_gravity: bool,
    /// Particle bodies skip collision against other particle bodies.
    pub particle: bool,
    orientation: f64,
    orient: Mat2,
    aabb: Aabb,
}

impl Body {
    /// Create a body from a shape at an initial position.
    ///
    /// Mass and inertia are computed immediately at density 1; use
    /// [`Body::set_density`] to change them (or make the body static).
    #[must_use]
    pub fn new(shape: Shape, position: Vec2) -> Self {
        let mut body = Self {
            shape,
            position,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            restitution: 0.8,
            static_friction: 0.5,
            dynamic_friction: 0.2,
            linear_damping: 0.0,
            affected_by_gravity: true,
            particle: false,
            orientation: 0.0,
            orient: Mat2::IDENTITY,
            aabb: Aabb::default(),
        };
        body.set_density(1.0);
        body
    }

    /// Orientation angle in radians.
    #[inline]
    #[must_use]
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Set the orientation, re-rotating the cached local AABB.
    pub fn set_orientation(&mut self, radians: f64) {
        self.orientation = radians;
        self.orient = Mat2::from_angle(radians);
        self.aabb = self.shape.compute_local_aabb(&self.orient);
    }

    /// Rotation matrix for the current orientation.
    #[inline]
    #[must_use]
    pub fn orient(&self) -> &Mat2 {
        &self.orient
    }

    /// Bounding box in the body-local frame.
    #[inline]
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Bounding box translated to world space.
    #[inline]
    #[must_use]
    pub fn world_aabb(&self) -> Aabb {
        self.aabb.offset(self.position)
    }

    /// Transform a body-local point into world space.
    #[inline]
    #[must_use]
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + self.orient.mul(local)
    }

    /// `true` when the body has infinite mass.
    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Accumulate a force applied at a point relative to the centre of mass,
    /// contributing both force and torque.
    pub fn apply_force(&mut self, force: Vec2, local_point: Vec2) {
        self.force += force;
        self.torque += local_point.cross(force);
    }

    /// Accumulate a force through the centre of mass (no torque).
    #[inline]
    pub fn apply_force_to_centre(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Apply an impulse at a point relative to the centre of mass, changing
    /// linear and angular velocity immediately.
    pub fn apply_linear_impulse(&mut self, impulse: Vec2, local_point: Vec2) {
        self.apply_linear_impulse_to_centre(impulse);
        self.angular_velocity += self.inv_inertia * local_point.cross(impulse);
    }

    /// Apply an impulse through the centre of mass.
    #[inline]
    pub fn apply_linear_impulse_to_centre(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Recompute mass and inertia for a density. Density ≤ 0 makes the body
    /// static (all mass and inertia fields zeroed).
    pub fn set_density(&mut self, density: f64) {
        if density > 0.0 {
            let mass_data = self.shape.compute_mass(density);
            self.mass = mass_data.mass;
            self.inv_mass = if self.mass != 0.0 { 1.0 / self.mass } else { 0.0 };
            self.inertia = mass_data.inertia;
            self.inv_inertia = if self.inertia != 0.0 { 1.0 / self.inertia } else { 0.0 };
        } else {
            self.mass = 0.0;
            self.inv_mass = 0.0;
            self.inertia = 0.0;
            self.inv_inertia = 0.0;
        }
        // Polygon vertices may have been recentred; the cached box follows.
        self.aabb = self.shape.compute_local_aabb(&self.orient);
    }

    /// World-space point containment test.
    ///
    /// Polygon: the point must lie behind every face plane. Circle: within
    /// the radius (boundary inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        match &self.shape {
            Shape::Polygon { vertices, normals } => {
                for i in 0..vertices.len() {
                    let face_point = self.world_point(vertices[i]);
                    let world_normal = self.orient.mul(normals[i]);
                    if (point - face_point).dot(world_normal) > 0.0 {
                        return false;
                    }
                }
                true
            }
            Shape::Circle { radius } => (self.position - point).length() <= *radius,
        }
    }
}

/// Mutable references to two distinct bodies of one slice.
///
/// Panics if `a == b`; pair indices come from the world's `i < j` sweep and
/// from validated joints, so equal indices are a caller bug.
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    assert_ne!(a, b, "a body pair needs two distinct bodies");
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ---- construction and mass ----

    #[test]
    fn test_new_body_computes_mass_at_unit_density() {
        let body = Body::new(Shape::circle(1.0), Vec2::ZERO);
        assert_relative_eq!(body.mass, core::f64::consts::PI);
        assert_relative_eq!(body.inv_mass, 1.0 / core::f64::consts::PI);
        assert!(body.affected_by_gravity);
        assert!(!body.particle);
    }

    #[test]
    fn test_inverse_mass_invariant() {
        let body = Body::new(Shape::rectangle(1.0, 1.0), Vec2::ZERO);
        assert!(body.mass > 0.0);
        assert_relative_eq!(body.inv_mass, 1.0 / body.mass);
        assert_relative_eq!(body.inv_inertia, 1.0 / body.inertia);
    }

    #[test]
    fn test_zero_density_makes_static() {
        let mut body = Body::new(Shape::circle(2.0), Vec2::ZERO);
        body.set_density(0.0);
        assert!(body.is_static());
        assert_eq!(body.mass, 0.0);
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.inertia, 0.0);
        assert_eq!(body.inv_inertia, 0.0);
    }

    #[test]
    fn test_negative_density_makes_static() {
        let mut body = Body::new(Shape::rectangle(1.0, 1.0), Vec2::ZERO);
        body.set_density(-5.0);
        assert!(body.is_static());
    }

    // ---- forces and impulses ----

    #[test]
    fn test_impulse_to_centre() {
        let mut body = Body::new(Shape::circle(1.0), Vec2::ZERO);
        let m = body.mass;
        body.apply_linear_impulse_to_centre(Vec2::new(10.0, 0.0));
        assert_relative_eq!(body.velocity.x, 10.0 / m);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_offset_impulse_spins() {
        let mut body = Body::new(Shape::circle(1.0), Vec2::ZERO);
        body.apply_linear_impulse(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!(body.angular_velocity > 0.0);
    }

    #[test]
    fn test_static_body_ignores_impulse() {
        let mut body = Body::new(Shape::circle(1.0), Vec2::ZERO);
        body.set_density(0.0);
        body.apply_linear_impulse(Vec2::new(100.0, 0.0), Vec2::new(0.0, 1.0));
        assert!(body.velocity.is_zero());
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_offset_force_accumulates_torque() {
        let mut body = Body::new(Shape::rectangle(1.0, 1.0), Vec2::ZERO);
        body.apply_force(Vec2::new(0.0, 5.0), Vec2::new(2.0, 0.0));
        assert_eq!(body.force, Vec2::new(0.0, 5.0));
        assert_eq!(body.torque, 10.0);
        body.apply_force_to_centre(Vec2::new(1.0, 0.0));
        assert_eq!(body.force, Vec2::new(1.0, 5.0));
        assert_eq!(body.torque, 10.0);
    }

    // ---- orientation and AABB ----

    #[test]
    fn test_set_orientation_rotates_aabb() {
        let mut body = Body::new(Shape::rectangle(2.0, 1.0), Vec2::ZERO);
        assert_relative_eq!(body.aabb().max.x, 2.0);
        body.set_orientation(core::f64::consts::FRAC_PI_2);
        assert_relative_eq!(body.aabb().max.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(body.aabb().max.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_world_aabb_is_offset() {
        let body = Body::new(Shape::circle(1.0), Vec2::new(5.0, -3.0));
        let world = body.world_aabb();
        assert_eq!(world.min, Vec2::new(4.0, -4.0));
        assert_eq!(world.max, Vec2::new(6.0, -2.0));
    }

    // ---- point containment ----

    #[test]
    fn test_contains_point_circle() {
        let body = Body::new(Shape::circle(1.0), Vec2::new(2.0, 0.0));
        assert!(body.contains_point(Vec2::new(2.0, 0.0)));
        assert!(body.contains_point(Vec2::new(3.0, 0.0)));
        assert!(!body.contains_point(Vec2::new(3.1, 0.0)));
    }

    #[test]
    fn test_pair_mut_order_follows_indices() {
        let mut bodies = vec![
            Body::new(Shape::circle(1.0), Vec2::ZERO),
            Body::new(Shape::circle(2.0), Vec2::ZERO),
        ];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert!(matches!(a.shape, Shape::Circle { radius } if radius == 2.0));
        assert!(matches!(b.shape, Shape::Circle { radius } if radius == 1.0));
    }

    #[test]
    fn test_contains_point_polygon() {
        let mut body = Body::new(Shape::rectangle(2.0, 1.0), Vec2::new(10.0, 10.0));
        assert!(body.contains_point(Vec2::new(10.0, 10.0)));
        assert!(body.contains_point(Vec2::new(11.9, 10.9)));
        assert!(!body.contains_point(Vec2::new(12.1, 10.0)));
        assert!(!body.contains_point(Vec2::new(10.0, 11.1)));

        // Rotate 90°: the wide axis now points along y
        body.set_orientation(core::f64::consts::FRAC_PI_2);
        assert!(body.contains_point(Vec2::new(10.0, 11.9)));
        assert!(!body.contains_point(Vec2::new(11.9, 10.0)));
    }
}
