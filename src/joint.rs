//! Spring-Damper Joints
//!
//! A [`Joint`] is a spring-damper constraint between two bodies or between a
//! body and a fixed world-space point. Joints never own their bodies — they
//! hold indices into the world's body list and recompute both attachment
//! points from the bodies' current pose on every application.
//!
//! Tension follows Hooke's law plus a damping term on the rate of change of
//! extension, applied as equal-and-opposite linear impulses along the line
//! between the attachment points. A joint that `can_go_slack` produces zero
//! tension under compression (rope/rubber-band behaviour).

use crate::body::{pair_mut, Body};
use crate::math::Vec2;

/// Spring-damper constraint attached to one or two bodies.
#[derive(Clone, Debug)]
pub enum Joint {
    /// Joint connecting two bodies through local attachment offsets.
    ToBody {
        /// Index of the first body.
        body_a: usize,
        /// Index of the second body.
        body_b: usize,
        /// Attachment offset in body A's object space.
        offset_a: Vec2,
        /// Attachment offset in body B's object space.
        offset_b: Vec2,
        /// Rest length of the spring.
        natural_length: f64,
        /// Hooke's-law spring constant.
        spring_constant: f64,
        /// Damping constant on the rate of extension.
        damping_constant: f64,
        /// Zero tension under compression when set.
        can_go_slack: bool,
    },
    /// Joint connecting one body to a fixed point in world space.
    ToPoint {
        /// Index of the attached body.
        body: usize,
        /// Fixed world-space anchor.
        point: Vec2,
        /// Attachment offset in the body's object space.
        offset: Vec2,
        /// Rest length of the spring.
        natural_length: f64,
        /// Hooke's-law spring constant.
        spring_constant: f64,
        /// Damping constant on the rate of extension.
        damping_constant: f64,
        /// Zero tension under compression when set.
        can_go_slack: bool,
    },
}

impl Joint {
    /// Recompute the attachment points from the current body pose and apply
    /// the tension as equal-and-opposite impulses.
    pub fn apply_tension(&self, bodies: &mut [Body]) {
        match *self {
            Self::ToBody {
                body_a,
                body_b,
                offset_a,
                offset_b,
                ..
            } => {
                let tension = self.calculate_tension(bodies);
                let (a, b) = pair_mut(bodies, body_a, body_b);
                let attach_a = a.world_point(offset_a);
                let attach_b = b.world_point(offset_b);
                let direction = (attach_b - attach_a).normalized();

                let impulse = direction * tension;
                a.apply_linear_impulse(impulse, attach_a - a.position);
                b.apply_linear_impulse(-impulse, attach_b - b.position);
            }
            Self::ToPoint {
                body,
                point,
                offset,
                ..
            } => {
                let tension = self.calculate_tension(bodies);
                let b = &mut bodies[body];
                let attach = b.world_point(offset);
                let direction = (point - attach).normalized();

                let impulse = direction * tension;
                b.apply_linear_impulse(impulse, attach - b.position);
            }
        }
    }

    /// Tension force magnitude for the current pose: zero when slack,
    /// otherwise the Hooke's-law term plus damping on the extension rate.
    #[must_use]
    pub fn calculate_tension(&self, bodies: &[Body]) -> f64 {
        let (distance, natural_length, spring_constant, damping_constant, can_go_slack) =
            match *self {
                Self::ToBody {
                    body_a,
                    body_b,
                    offset_a,
                    offset_b,
                    natural_length,
                    spring_constant,
                    damping_constant,
                    can_go_slack,
                } => {
                    let attach_a = bodies[body_a].world_point(offset_a);
                    let attach_b = bodies[body_b].world_point(offset_b);
                    (
                        (attach_a - attach_b).length(),
                        natural_length,
                        spring_constant,
                        damping_constant,
                        can_go_slack,
                    )
                }
                Self::ToPoint {
                    body,
                    point,
                    offset,
                    natural_length,
                    spring_constant,
                    damping_constant,
                    can_go_slack,
                } => {
                    let attach = bodies[body].world_point(offset);
                    (
                        (attach - point).length(),
                        natural_length,
                        spring_constant,
                        damping_constant,
                        can_go_slack,
                    )
                }
            };

        if distance < natural_length && can_go_slack {
            return 0.0;
        }
        let extension = distance - natural_length;
        let hooke_tension = extension * spring_constant;
        let damping_tension = damping_constant * self.rate_of_change_of_extension(bodies);
        hooke_tension + damping_tension
    }

    /// Relative velocity of the two attachment points (with angular
    /// contributions) projected onto the unit vector between them.
    #[must_use]
    pub fn rate_of_change_of_extension(&self, bodies: &[Body]) -> f64 {
        match *self {
            Self::ToBody {
                body_a,
                body_b,
                offset_a,
                offset_b,
                ..
            } => {
                let a = &bodies[body_a];
                let b = &bodies[body_b];
                let attach_a = a.world_point(offset_a);
                let attach_b = b.world_point(offset_b);
                let direction = (attach_b - attach_a).normalized();

                let relative_velocity = b.velocity - a.velocity
                    + (attach_b - b.position).cross_scalar(b.angular_velocity)
                    - (attach_a - a.position).cross_scalar(a.angular_velocity);

                relative_velocity.dot(direction)
            }
            Self::ToPoint {
                body,
                point,
                offset,
                ..
            } => {
                let b = &bodies[body];
                let attach = b.world_point(offset);
                let direction = (point - attach).normalized();

                // The fixed point has zero velocity; only the body's
                // attachment point moves.
                let relative_velocity =
                    -(b.velocity + (attach - b.position).cross_scalar(b.angular_velocity));

                relative_velocity.dot(direction)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
