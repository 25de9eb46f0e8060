//! Explosion Impulse Generators
//!
//! Three blast models layered on the core's public body surface:
//!
//! - [`ProximityExplosion`]: every body within a radius takes a centre
//!   impulse falling off with 1/distance
//! - [`RaycastExplosion`]: a 360° ray fan; bodies are hit where a ray lands,
//!   picking up spin from off-centre impacts
//! - [`ParticleExplosion`]: spawns a ring of tiny particle bodies and hurls
//!   them outward
//!
//! None of these touch solver internals; they only read positions and apply
//! impulses between steps.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::math::{Mat2, Vec2};
use crate::raycast::{RayInformation, RayScatter};
use crate::shape::Shape;
use crate::world::World;

// ============================================================================
// ProximityExplosion
// ============================================================================

/// Blast affecting every body within a fixed radius of the epicentre.
#[derive(Clone, Debug)]
pub struct ProximityExplosion {
    epicentre: Vec2,
    proximity: f64,
    bodies_affected: Vec<usize>,
}

impl ProximityExplosion {
    /// Create an explosion with the given reach.
    #[must_use]
    pub fn new(epicentre: Vec2, proximity: f64) -> Self {
        Self {
            epicentre,
            proximity,
            bodies_affected: Vec::new(),
        }
    }

    /// Move the epicentre.
    #[inline]
    pub fn set_epicentre(&mut self, epicentre: Vec2) {
        self.epicentre = epicentre;
    }

    /// Current epicentre.
    #[inline]
    #[must_use]
    pub fn epicentre(&self) -> Vec2 {
        self.epicentre
    }

    /// Indices of the bodies inside the radius at the last update.
    #[inline]
    #[must_use]
    pub fn bodies_affected(&self) -> &[usize] {
        &self.bodies_affected
    }

    /// Re-evaluate which bodies fall inside the blast radius.
    pub fn update(&mut self, bodies: &[Body]) {
        self.bodies_affected.clear();
        for (index, body) in bodies.iter().enumerate() {
            let blast_dist = body.position - self.epicentre;
            if blast_dist.length() <= self.proximity {
                self.bodies_affected.push(index);
            }
        }
    }

    /// Apply a centre-of-mass impulse to every affected body, scaled by
    /// `blast_power / distance`.
    pub fn apply_blast_impulse(&self, bodies: &mut [Body], blast_power: f64) {
        for &index in &self.bodies_affected {
            let body = &mut bodies[index];
            let blast_dir = body.position - self.epicentre;
            let distance = blast_dir.length();
            // A body exactly on the epicentre has no direction to push
            if distance == 0.0 {
                continue;
            }

            let inv_distance = 1.0 / distance;
            let impulse_magnitude = blast_power * inv_distance;
            body.apply_linear_impulse_to_centre(blast_dir.normalized() * impulse_magnitude);
        }
    }
}

// ============================================================================
// RaycastExplosion
// ============================================================================

/// Blast delivered along a scatter of rays: only bodies with line of sight
/// to the epicentre are hit, at the exact ray impact point.
#[derive(Clone, Debug)]
pub struct RaycastExplosion {
    ray_scatter: RayScatter,
    rays_in_contact: Vec<RayInformation>,
}

impl RaycastExplosion {
    /// Create the scatter, cast the rays and evaluate them immediately.
    #[must_use]
    pub fn new(epicentre: Vec2, no_of_rays: usize, distance: f64, bodies: &[Body]) -> Self {
        let mut ray_scatter = RayScatter::new(epicentre, no_of_rays);
        ray_scatter.cast_rays(distance);
        let mut explosion = Self {
            ray_scatter,
            rays_in_contact: Vec::new(),
        };
        explosion.update(bodies);
        explosion
    }

    /// Move the epicentre, carrying the rays along.
    #[inline]
    pub fn set_epicentre(&mut self, epicentre: Vec2) {
        self.ray_scatter.set_epicentre(epicentre);
    }

    /// Intersections found at the last update.
    #[inline]
    #[must_use]
    pub fn rays_in_contact(&self) -> &[RayInformation] {
        &self.rays_in_contact
    }

    /// Re-project the scatter and collect the ray hits.
    pub fn update(&mut self, bodies: &[Body]) {
        self.rays_in_contact.clear();
        self.ray_scatter.update_rays(bodies);
        for ray in self.ray_scatter.rays() {
            if let Some(info) = ray.information() {
                self.rays_in_contact.push(*info);
            }
        }
    }

    /// Apply an impulse at every ray impact point, scaled by
    /// `blast_power / distance`. Off-centre hits impart spin.
    pub fn apply_blast_impulse(&self, bodies: &mut [Body], blast_power: f64) {
        for info in &self.rays_in_contact {
            let blast_dir = info.coordinate - self.ray_scatter.epicentre();
            let distance = blast_dir.length();
            if distance == 0.0 {
                continue;
            }

            let impulse = blast_dir.normalized() * (blast_power / distance);
            let body = &mut bodies[info.body];
            body.apply_linear_impulse(impulse, info.coordinate - body.position);
        }
    }
}

// ============================================================================
// ParticleExplosion
// ============================================================================

/// Blast realized as a ring of small particle bodies flung outward.
#[derive(Clone, Debug)]
pub struct ParticleExplosion {
    epicentre: Vec2,
    no_of_particles: usize,
    particles: Vec<usize>,
}

impl ParticleExplosion {
    /// Create an explosion that will spawn `no_of_particles` particles.
    #[must_use]
    pub fn new(epicentre: Vec2, no_of_particles: usize) -> Self {
        Self {
            epicentre,
            no_of_particles,
            particles: Vec::new(),
        }
    }

    /// Indices of the spawned particle bodies.
    #[inline]
    #[must_use]
    pub fn particles(&self) -> &[usize] {
        &self.particles
    }

    /// Spawn the particles in a ring of `radius` around the epicentre.
    ///
    /// Particles are perfectly elastic, frictionless, damping-free circles
    /// flagged `particle` so they ignore each other, and exempt from gravity.
    pub fn create_particles(
        &mut self,
        size: f64,
        density: f64,
        radius: f64,
        world: &mut World,
    ) -> Result<(), PhysicsError> {
        let separation_angle = core::f64::consts::TAU / self.no_of_particles as f64;
        let rotate = Mat2::from_angle(separation_angle);
        let mut distance_from_centre = Vec2::new(0.0, radius);

        self.particles.clear();
        for _ in 0..self.no_of_particles {
            let placement = self.epicentre + distance_from_centre;
            let mut body = Body::new(Shape::circle(size), placement);
            body.set_density(density);
            body.restitution = 1.0;
            body.static_friction = 0.0;
            body.dynamic_friction = 0.0;
            body.affected_by_gravity = false;
            body.linear_damping = 0.0;
            body.particle = true;

            self.particles.push(world.add_body(body)?);
            distance_from_centre = rotate.mul(distance_from_centre);
        }
        Ok(())
    }

    /// Hurl every particle radially outward, velocity proportional to its
    /// offset from the epicentre.
    pub fn apply_blast_impulse(&self, bodies: &mut [Body], blast_power: f64) {
        for &index in &self.particles {
            let body = &mut bodies[index];
            let line = body.position - self.epicentre;
            body.velocity = line * blast_power;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
