//! Narrow-Phase Detection and Contact Solving
//!
//! An [`Arbiter`] is the per-pair collision record: it detects contact
//! between two bodies (circle–circle, circle–polygon, polygon–polygon via the
//! Separating Axis Theorem with reference-face clipping) and then resolves the
//! resulting manifold with sequential impulses and Coulomb friction.
//!
//! Arbiters are ephemeral: the world rebuilds them from scratch every step,
//! so no impulse state is carried between steps (no warm-starting).
//!
//! All detection failures are silent — a separating axis or an under-clipped
//! face produces a zero contact count, never an error.

use crate::body::{pair_mut, Body};
use crate::math::Vec2;
use crate::shape::Shape;

/// Overlap below this depth is tolerated without positional correction, which
/// keeps resting contacts from jittering.
pub const PENETRATION_ALLOWANCE: f64 = 0.01;

/// Fraction of the excess penetration removed by one correction pass.
pub const PENETRATION_CORRECTION: f64 = 0.5;

/// Relative weight favouring body A's SAT axis when the two candidate axes
/// are nearly equal. Hysteresis against face-selection flicker.
pub const BIAS_RELATIVE: f64 = 0.95;

/// Absolute counterpart of [`BIAS_RELATIVE`].
pub const BIAS_ABSOLUTE: f64 = 0.01;

/// Clipped contact points further than this above the reference face plane
/// are discarded.
pub const EPSILON: f64 = 1e-12;

/// Contact manifold and solver state for one colliding body pair.
///
/// Holds indices into the world's body list, the combined friction pair
/// (arithmetic mean), up to two world-space contact points collapsed into
/// one, the contact normal (pointing from body A toward body B), the
/// penetration depth, and the lesser restitution of the pair.
#[derive(Clone, Debug)]
pub struct Arbiter {
    /// Index of the first body.
    pub body_a: usize,
    /// Index of the second body.
    pub body_b: usize,
    /// Combined static friction (mean of the pair).
    pub static_friction: f64,
    /// Combined dynamic friction (mean of the pair).
    pub dynamic_friction: f64,
    /// World-space contact points.
    pub contacts: [Vec2; 2],
    /// Contact normal, from body A toward body B.
    pub contact_normal: Vec2,
    /// Number of active contact points (0 = no collision).
    pub contact_count: usize,
    /// Restitution used for this pair (minimum of the two bodies).
    pub restitution: f64,
    /// Penetration depth along the contact normal.
    pub penetration: f64,
}

impl Arbiter {
    /// Create an empty arbiter for a body pair, combining their friction
    /// coefficients. Run [`Arbiter::narrow_phase`] to fill the manifold.
    #[must_use]
    pub fn new(body_a: usize, body_b: usize, bodies: &[Body]) -> Self {
        let a = &bodies[body_a];
        let b = &bodies[body_b];
        Self {
            body_a,
            body_b,
            static_friction: (a.static_friction + b.static_friction) / 2.0,
            dynamic_friction: (a.dynamic_friction + b.dynamic_friction) / 2.0,
            contacts: [Vec2::ZERO; 2],
            contact_normal: Vec2::ZERO,
            contact_count: 0,
            restitution: 0.0,
            penetration: 0.0,
        }
    }

    /// Run narrow-phase detection for the pair, dispatching on the two shape
    /// tags and filling the contact manifold on intersection.
    pub fn narrow_phase(&mut self, bodies: &[Body]) {
        let a = &bodies[self.body_a];
        let b = &bodies[self.body_b];
        self.restitution = a.restitution.min(b.restitution);

        match (&a.shape, &b.shape) {
            (Shape::Circle { .. }, Shape::Circle { .. }) => self.circle_vs_circle(a, b),
            (Shape::Circle { .. }, Shape::Polygon { .. }) => self.circle_vs_polygon(a, b),
            (Shape::Polygon { .. }, Shape::Circle { .. }) => {
                // Symmetric case: detect with roles swapped, then flip the
                // normal back to the A→B convention.
                self.circle_vs_polygon(b, a);
                if self.contact_count > 0 {
                    self.contact_normal = -self.contact_normal;
                }
            }
            (Shape::Polygon { .. }, Shape::Polygon { .. }) => self.polygon_vs_polygon(a, b),
        }
    }

    // ------------------------------------------------------------------
    // Circle vs circle
    // ------------------------------------------------------------------

    fn circle_vs_circle(&mut self, a: &Body, b: &Body) {
        let (Shape::Circle { radius: radius_a }, Shape::Circle { radius: radius_b }) =
            (&a.shape, &b.shape)
        else {
            return;
        };

        let normal = b.position - a.position;
        let distance = normal.length();
        let radius = radius_a + radius_b;

        if distance >= radius {
            self.contact_count = 0;
            return;
        }

        self.contact_count = 1;

        if distance == 0.0 {
            // Concentric circles have no meaningful direction; push up.
            self.penetration = radius;
            self.contact_normal = Vec2::UNIT_Y;
            self.contacts[0] = a.position;
        } else {
            self.penetration = radius - distance;
            self.contact_normal = normal.normalized();
            self.contacts[0] = self.contact_normal * *radius_a + a.position;
        }
    }

    // ------------------------------------------------------------------
    // Circle vs polygon
    // ------------------------------------------------------------------

    /// `circle` must carry the circle shape and `poly` the polygon. On
    /// success the stored normal points from the circle toward the polygon.
    fn circle_vs_polygon(&mut self, circle: &Body, poly: &Body) {
        let (Shape::Circle { radius }, Shape::Polygon { vertices, normals }) =
            (&circle.shape, &poly.shape)
        else {
            return;
        };

        // Rotating by the polygon's inverse orientation reduces the problem
        // to a circle against an axis-aligned polygon in its own frame.
        let dist_of_bodies = circle.position - poly.position;
        let poly_to_circle = poly.orient().transpose().mul(dist_of_bodies);

        // SAT over the polygon faces, tracking the face of deepest approach.
        let mut penetration = -f64::MAX;
        let mut face_index = 0;
        for i in 0..vertices.len() {
            let v = poly_to_circle - vertices[i];
            let distance = normals[i].dot(v);

            if distance > *radius {
                return;
            }
            if distance > penetration {
                face_index = i;
                penetration = distance;
            }
        }

        let vertex1 = vertices[face_index];
        let vertex2 = vertices[(face_index + 1) % vertices.len()];

        // Voronoi region classification against the face's end vertices.
        let v1_to_v2 = vertex2 - vertex1;
        let circle_to_v1 = poly_to_circle - vertex1;
        let first_corner = circle_to_v1.dot(v1_to_v2);

        if first_corner <= 0.0 {
            // Vertex 1 region
            let dist = poly_to_circle.distance(vertex1);
            if dist >= *radius {
                return;
            }
            self.penetration = *radius - dist;
            self.contact_count = 1;
            self.contact_normal = poly.orient().mul((vertex1 - poly_to_circle).normalized());
            self.contacts[0] = poly.orient().mul(vertex1) + poly.position;
            return;
        }

        let v2_to_v1 = vertex1 - vertex2;
        let circle_to_v2 = poly_to_circle - vertex2;
        let second_corner = circle_to_v2.dot(v2_to_v1);

        if second_corner < 0.0 {
            // Vertex 2 region
            let dist = poly_to_circle.distance(vertex2);
            if dist >= *radius {
                return;
            }
            self.penetration = *radius - dist;
            self.contact_count = 1;
            self.contact_normal = poly.orient().mul((vertex2 - poly_to_circle).normalized());
            self.contacts[0] = poly.orient().mul(vertex2) + poly.position;
        } else {
            // Face region
            let dist_from_edge = (poly_to_circle - vertex1).dot(normals[face_index]);
            if dist_from_edge >= *radius {
                return;
            }
            self.penetration = *radius - dist_from_edge;
            self.contact_count = 1;
            // Face normal points polygon→circle; the manifold convention
            // wants circle→polygon.
            self.contact_normal = -poly.orient().mul(normals[face_index]);
            self.contacts[0] = circle.position + self.contact_normal * *radius;
        }
    }

    // ------------------------------------------------------------------
    // Polygon vs polygon (SAT + reference face clipping)
    // ------------------------------------------------------------------

    fn polygon_vs_polygon(&mut self, a: &Body, b: &Body) {
        let (a_penetration, a_face) = find_axis_of_min_penetration(a, b);
        if a_penetration >= 0.0 {
            return;
        }
        let (b_penetration, b_face) = find_axis_of_min_penetration(b, a);
        if b_penetration >= 0.0 {
            return;
        }

        let (reference_body, incident_body, reference_face, flip) =
            if selection_bias(a_penetration, b_penetration) {
                (a, b, a_face, false)
            } else {
                (b, a, b_face, true)
            };

        let (ref_vertices, ref_normals) = polygon_parts(reference_body);
        let (inc_vertices, inc_normals) = polygon_parts(incident_body);

        // Reference face normal in the incident polygon's object space.
        let reference_normal = incident_body
            .orient()
            .transpose()
            .mul(reference_body.orient().mul(ref_normals[reference_face]));

        // The incident face is the one most anti-parallel to the reference
        // normal (minimum dot product).
        let mut incident_index = 0;
        let mut min_dot = f64::MAX;
        for (i, normal) in inc_normals.iter().enumerate() {
            let dot = reference_normal.dot(*normal);
            if dot < min_dot {
                min_dot = dot;
                incident_index = i;
            }
        }

        let mut incident_face = [
            incident_body.world_point(inc_vertices[incident_index]),
            incident_body.world_point(inc_vertices[(incident_index + 1) % inc_vertices.len()]),
        ];

        let v1 = reference_body.world_point(ref_vertices[reference_face]);
        let v2 =
            reference_body.world_point(ref_vertices[(reference_face + 1) % ref_vertices.len()]);

        let ref_tangent = (v2 - v1).normalized();
        let neg_side = -ref_tangent.dot(v1);
        let pos_side = ref_tangent.dot(v2);

        // Clip the incident face against the two side planes of the
        // reference face; losing a point means the faces miss each other.
        if clip(-ref_tangent, neg_side, &mut incident_face) < 2 {
            return;
        }
        if clip(ref_tangent, pos_side, &mut incident_face) < 2 {
            return;
        }

        let ref_face_normal = -ref_tangent.normal();

        // Keep only points at or below the reference face plane.
        let mut kept = [Vec2::ZERO; 2];
        let mut total_penetration = 0.0;
        let mut contacts_found = 0;
        for point in &incident_face {
            let separation = ref_face_normal.dot(*point) - ref_face_normal.dot(v1);
            if separation <= EPSILON {
                kept[contacts_found] = *point;
                total_penetration += -separation;
                contacts_found += 1;
            }
        }

        let contact_point = match contacts_found {
            0 => return,
            1 => {
                self.penetration = total_penetration;
                kept[0]
            }
            _ => {
                self.penetration = total_penetration / 2.0;
                (kept[0] + kept[1]) * 0.5
            }
        };

        self.contact_count = 1;
        self.contacts[0] = contact_point;
        self.contact_normal = if flip { -ref_face_normal } else { ref_face_normal };
    }

    // ------------------------------------------------------------------
    // Impulse solver
    // ------------------------------------------------------------------

    /// One Gauss-Seidel visit: resolve the normal velocity constraint with
    /// restitution, then apply a friction impulse clamped to the Coulomb
    /// cone. Separating contacts are skipped so resolved pairs do not stick.
    pub fn solve(&self, bodies: &mut [Body]) {
        let (a, b) = pair_mut(bodies, self.body_a, self.body_b);

        let contact_a = self.contacts[0] - a.position;
        let contact_b = self.contacts[0] - b.position;

        let mut relative_vel = b.velocity + contact_b.cross_scalar(b.angular_velocity)
            - a.velocity
            - contact_a.cross_scalar(a.angular_velocity);

        // Negative = converging along the normal. Diverging pairs already
        // got resolved this sweep; acting again would glue them together.
        let contact_vel = relative_vel.dot(self.contact_normal);
        if contact_vel >= 0.0 {
            return;
        }

        let acn = contact_a.cross(self.contact_normal);
        let bcn = contact_b.cross(self.contact_normal);
        let inverse_mass_sum =
            a.inv_mass + b.inv_mass + acn * acn * a.inv_inertia + bcn * bcn * b.inv_inertia;

        let j = -(self.restitution + 1.0) * contact_vel / inverse_mass_sum;

        let impulse = self.contact_normal * j;
        b.apply_linear_impulse(impulse, contact_b);
        a.apply_linear_impulse(-impulse, contact_a);

        // Friction works on the post-impulse velocities.
        relative_vel = b.velocity + contact_b.cross_scalar(b.angular_velocity)
            - a.velocity
            - contact_a.cross_scalar(a.angular_velocity);

        let tangent =
            (relative_vel - self.contact_normal * relative_vel.dot(self.contact_normal)).normalized();

        let jt = -relative_vel.dot(tangent) / inverse_mass_sum;

        // Coulomb cone: hold with static friction while the demanded impulse
        // is small, otherwise slide at the dynamic coefficient.
        let tangent_impulse = if jt.abs() < j * self.static_friction {
            tangent * jt
        } else {
            -tangent * j * self.dynamic_friction
        };

        b.apply_linear_impulse(tangent_impulse, contact_b);
        a.apply_linear_impulse(-tangent_impulse, contact_a);
    }

    // ------------------------------------------------------------------
    // Positional correction
    // ------------------------------------------------------------------

    /// Push the bodies apart along the contact normal to remove the overlap
    /// the discrete integration left behind. Overlap within
    /// [`PENETRATION_ALLOWANCE`] is tolerated. A direct positional nudge,
    /// not a velocity change.
    pub fn penetration_resolution(&self, bodies: &mut [Body]) {
        let penetration_excess = self.penetration - PENETRATION_ALLOWANCE;
        if penetration_excess <= 0.0 {
            return;
        }

        let (a, b) = pair_mut(bodies, self.body_a, self.body_b);
        let total_mass = a.mass + b.mass;
        if total_mass == 0.0 {
            return;
        }
        let correction = penetration_excess * PENETRATION_CORRECTION / total_mass;
        a.position += -self.contact_normal * (a.mass * correction);
        b.position += self.contact_normal * (b.mass * correction);
    }
}

/// Biased comparison of the two SAT penetrations: prefer axis `a` unless `b`
/// beats it by more than floating-point noise. Keeps the reference face
/// stable across frames when the two axes are nearly equal.
fn selection_bias(a: f64, b: f64) -> bool {
    a >= b * BIAS_RELATIVE + a * BIAS_ABSOLUTE
}

/// Vertices and normals of a body's polygon shape. Only called on bodies the
/// dispatcher already matched as polygons.
fn polygon_parts(body: &Body) -> (&[Vec2], &[Vec2]) {
    match &body.shape {
        Shape::Polygon { vertices, normals } => (vertices, normals),
        Shape::Circle { .. } => (&[], &[]),
    }
}

/// Find A's face axis of minimum penetration into B.
///
/// For every face normal of A (expressed in B's object space), project B's
/// vertices to find the deepest point, then measure its distance to A's face
/// plane. The largest such distance over all faces is the least-negative
/// separation: ≥ 0 means a separating axis exists.
fn find_axis_of_min_penetration(a: &Body, b: &Body) -> (f64, usize) {
    let (a_vertices, a_normals) = polygon_parts(a);
    let (b_vertices, _) = polygon_parts(b);

    let mut distance = -f64::MAX;
    let mut best_index = 0;

    for i in 0..a_vertices.len() {
        // A's face normal rotated into B's object space, where B's vertices
        // are axis-aligned.
        let world_normal = a.orient().mul(a_normals[i]);
        let object_normal = b.orient().transpose().mul(world_normal);

        // B's support point in the direction opposite the face normal.
        let mut best_projection = f64::MAX;
        let mut best_vertex = b_vertices[0];
        for vertex in b_vertices {
            let projection = vertex.dot(object_normal);
            if projection < best_projection {
                best_vertex = *vertex;
                best_projection = projection;
            }
        }

        // A's face vertex carried into B's object space.
        let distance_of_ba = a.position - b.position;
        let face_vertex = b
            .orient()
            .transpose()
            .mul(a.orient().mul(a_vertices[i]) + distance_of_ba);

        let d = object_normal.dot(best_vertex - face_vertex);
        if d > distance {
            distance = d;
            best_index = i;
        }
    }

    (distance, best_index)
}

/// Clip a two-point face against the half-plane `tangent · x ≤ offset`.
///
/// Points on the kept side pass through; when the segment straddles the
/// plane the intersection point is inserted. Returns how many points
/// survived (0–2); fewer than 2 means the face missed the clip region.
fn clip(plane_tangent: Vec2, offset: f64, face: &mut [Vec2; 2]) -> usize {
    let mut num = 0;
    let mut out = [face[0], face[1]];

    let dist0 = plane_tangent.dot(face[0]) - offset;
    let dist1 = plane_tangent.dot(face[1]) - offset;

    if dist0 <= 0.0 {
        out[num] = face[0];
        num += 1;
    }
    if dist1 <= 0.0 {
        out[num] = face[1];
        num += 1;
    }

    if dist0 * dist1 < 0.0 {
        let interp = dist0 / (dist0 - dist1);
        out[num] = (face[1] - face[0]) * interp + face[0];
        num += 1;
    }

    face[0] = out[0];
    face[1] = out[1];

    num
}

// ============================================================================
// Tests
// ============================================================================
