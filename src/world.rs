//! Simulation World
//!
//! The [`World`] owns every body and joint and runs the fixed-step pipeline:
//!
//! 1. clear the previous step's contact list
//! 2. broad phase — O(n²) pair sweep with cheap rejects, then AABB overlap
//! 3. narrow phase — build an [`Arbiter`] per intersecting pair
//! 4. integrate forces (drag, gravity, accumulated force/torque)
//! 5. apply joint tension once, then run the contact solver for
//!    `solver_iterations` Gauss-Seidel sweeps
//! 6. integrate positions and orientations, zero the accumulators
//! 7. one positional penetration-correction pass
//!
//! The step is strictly sequential; bodies and joints are mutated only inside
//! `step(&mut self)`, so a partially updated world is never observable.
//! Bodies are addressed by index. Removing a body swaps the last body into
//! its slot and repairs the joint list accordingly.

use crate::aabb::Aabb;
use crate::arbiter::{Arbiter, PENETRATION_ALLOWANCE};
use crate::body::Body;
use crate::error::PhysicsError;
use crate::joint::Joint;
use crate::math::Vec2;
use crate::profiling::StepCounters;

// ============================================================================
// WorldConfig
// ============================================================================

/// Solver configuration, fixed at world construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Intended stepping cadence. `step` still takes the caller's `dt`;
    /// this feeds [`WorldConfig::preferred_dt`] for driver loops.
    pub step_frequency_hz: f64,
    /// Contact-solver sweeps per step. More iterations buy stacking accuracy
    /// with CPU time.
    pub solver_iterations: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            step_frequency_hz: 60.0,
            solver_iterations: 100,
        }
    }
}

impl WorldConfig {
    /// Fixed timestep matching `step_frequency_hz`.
    #[inline]
    #[must_use]
    pub fn preferred_dt(&self) -> f64 {
        1.0 / self.step_frequency_hz
    }

    /// Reject non-positive or non-finite frequencies and zero iterations.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.step_frequency_hz.is_finite() || self.step_frequency_hz <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "step_frequency_hz must be positive and finite",
            });
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "solver_iterations must be at least 1",
            });
        }
        Ok(())
    }
}

// ============================================================================
// World
// ============================================================================

/// Container and stepper for the whole simulation.
pub struct World {
    /// Gravitational acceleration applied to gravity-affected bodies.
    pub gravity: Vec2,
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    contacts: Vec<Arbiter>,
    config: WorldConfig,
    counters: StepCounters,
}

impl World {
    /// Create a world with the given gravity and default configuration.
    #[must_use]
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            joints: Vec::new(),
            contacts: Vec::new(),
            config: WorldConfig::default(),
            counters: StepCounters::new(),
        }
    }

    /// Create a world with an explicit configuration.
    pub fn with_config(gravity: Vec2, config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let mut world = Self::new(gravity);
        world.config = config;
        Ok(world)
    }

    /// Solver configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Work counters for the most recent step.
    #[inline]
    #[must_use]
    pub fn counters(&self) -> &StepCounters {
        &self.counters
    }

    /// All bodies, indexable by the handles returned from [`World::add_body`].
    #[inline]
    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the bodies. A slice on purpose: external code can
    /// adjust state (velocities, materials) but not grow or shrink the list
    /// under the joints' indices.
    #[inline]
    #[must_use]
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// All joints.
    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Contact arbiters produced by the most recent step.
    #[inline]
    #[must_use]
    pub fn contacts(&self) -> &[Arbiter] {
        &self.contacts
    }

    /// Add a body, returning its index.
    ///
    /// Rejects non-finite positions and invalid bounding boxes up front —
    /// those are caller errors, unlike geometric misses which stay silent.
    pub fn add_body(&mut self, body: Body) -> Result<usize, PhysicsError> {
        if !body.position.is_valid() {
            return Err(PhysicsError::NonFiniteState {
                quantity: "body position",
            });
        }
        if !body.aabb().is_valid() {
            return Err(PhysicsError::InvalidAabb);
        }
        let index = self.bodies.len();
        self.bodies.push(body);
        Ok(index)
    }

    /// Remove a body by index and return it.
    ///
    /// The last body is swapped into the freed slot. Joints attached to the
    /// removed body are dropped; joints attached to the swapped body are
    /// re-pointed at its new index. The previous step's contact list is
    /// discarded since its indices no longer hold.
    pub fn remove_body(&mut self, index: usize) -> Result<Body, PhysicsError> {
        if index >= self.bodies.len() {
            return Err(PhysicsError::InvalidBodyIndex {
                index,
                count: self.bodies.len(),
            });
        }
        let removed = self.bodies.swap_remove(index);
        let moved = self.bodies.len();

        self.joints.retain(|joint| !joint_references(joint, index));
        if moved != index {
            for joint in &mut self.joints {
                repoint_joint(joint, moved, index);
            }
        }
        self.contacts.clear();
        Ok(removed)
    }

    /// Add a joint after validating the body indices it references.
    pub fn add_joint(&mut self, joint: Joint) -> Result<(), PhysicsError> {
        let count = self.bodies.len();
        match joint {
            Joint::ToBody { body_a, body_b, .. } => {
                for index in [body_a, body_b] {
                    if index >= count {
                        return Err(PhysicsError::InvalidBodyIndex { index, count });
                    }
                }
                if body_a == body_b {
                    return Err(PhysicsError::InvalidConfiguration {
                        reason: "joint must connect two distinct bodies",
                    });
                }
            }
            Joint::ToPoint { body, .. } => {
                if body >= count {
                    return Err(PhysicsError::InvalidBodyIndex { index: body, count });
                }
            }
        }
        self.joints.push(joint);
        Ok(())
    }

    /// Remove a joint by index, preserving the order of the rest.
    pub fn remove_joint(&mut self, index: usize) -> Result<Joint, PhysicsError> {
        if index >= self.joints.len() {
            return Err(PhysicsError::InvalidJointIndex {
                index,
                count: self.joints.len(),
            });
        }
        Ok(self.joints.remove(index))
    }

    /// Drop all bodies, joints and contacts.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.joints.clear();
        self.contacts.clear();
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.counters.begin_step();
        self.contacts.clear();

        self.broad_phase();
        self.semi_implicit(dt);

        // Correct positional errors left by the discrete collisions
        let Self {
            contacts,
            bodies,
            counters,
            ..
        } = self;
        for contact in contacts.iter() {
            if contact.penetration > PENETRATION_ALLOWANCE {
                counters.corrections_applied += 1;
            }
            contact.penetration_resolution(bodies);
        }
    }

    /// O(n²) sweep over unordered body pairs, building arbiters for every
    /// pair that survives the cheap rejects, the AABB test and narrow phase.
    fn broad_phase(&mut self) {
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let a = &self.bodies[i];
                let b = &self.bodies[j];

                // Static pairs can't react; particle pairs are exempt by flag
                if (a.inv_mass == 0.0 && b.inv_mass == 0.0) || (a.particle && b.particle) {
                    continue;
                }
                self.counters.pairs_tested += 1;

                if Aabb::bodies_overlap(a, b) {
                    self.counters.broad_phase_hits += 1;
                    let mut arbiter = Arbiter::new(i, j, &self.bodies);
                    arbiter.narrow_phase(&self.bodies);
                    if arbiter.contact_count > 0 {
                        self.counters.contacts_found += 1;
                        self.contacts.push(arbiter);
                    }
                }
            }
        }
    }

    /// Semi-implicit Euler: integrate velocities from forces, solve the
    /// constraints, then integrate positions from the corrected velocities.
    fn semi_implicit(&mut self, dt: f64) {
        self.apply_forces(dt);
        self.solve_constraints();

        for body in &mut self.bodies {
            if body.inv_mass == 0.0 {
                continue;
            }
            body.position += body.velocity * dt;
            body.set_orientation(body.orientation() + dt * body.angular_velocity);

            body.force = Vec2::ZERO;
            body.torque = 0.0;
        }
    }

    /// Apply quadratic drag, gravity and the accumulated force/torque to
    /// every dynamic body's velocity.
    fn apply_forces(&mut self, dt: f64) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            if body.inv_mass == 0.0 {
                continue;
            }

            let speed = body.velocity.length();
            let drag_magnitude = speed * speed * body.linear_damping;
            let drag = body.velocity.normalized() * -drag_magnitude;
            body.apply_force_to_centre(drag);

            if body.affected_by_gravity {
                body.velocity += gravity * dt;
            }

            body.velocity += body.force * body.inv_mass * dt;
            body.angular_velocity += dt * body.inv_inertia * body.torque;
        }
    }

    /// Joint tension once, then the Gauss-Seidel contact sweeps.
    ///
    /// Joints sit outside the iteration loop: their impulses are already
    /// sized for a whole step, and repeating them would multiply the spring
    /// forces by the iteration count.
    fn solve_constraints(&mut self) {
        let Self {
            joints,
            bodies,
            contacts,
            counters,
            config,
            ..
        } = self;

        for joint in joints.iter() {
            joint.apply_tension(bodies);
        }

        for _ in 0..config.solver_iterations {
            for contact in contacts.iter() {
                contact.solve(bodies);
                counters.solver_applications += 1;
            }
        }
    }
}

/// Whether a joint references the body at `index`.
fn joint_references(joint: &Joint, index: usize) -> bool {
    match *joint {
        Joint::ToBody { body_a, body_b, .. } => body_a == index || body_b == index,
        Joint::ToPoint { body, .. } => body == index,
    }
}

/// Rewrite references to `from` with `to` after a swap-remove.
fn repoint_joint(joint: &mut Joint, from: usize, to: usize) {
    match joint {
        Joint::ToBody { body_a, body_b, .. } => {
            if *body_a == from {
                *body_a = to;
            }
            if *body_b == from {
                *body_b = to;
            }
        }
        Joint::ToPoint { body, .. } => {
            if *body == from {
                *body = to;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
