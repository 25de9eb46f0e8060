//! Collision Shapes
//!
//! [`Shape`] is a tagged variant over the two supported geometries:
//!
//! - **Circle**: one scalar radius
//! - **Polygon**: convex, counter-clockwise vertex ring with one outward unit
//!   normal per edge
//!
//! Shapes are defined in body-local space. Polygon vertices are always stored
//! relative to the polygon's own centroid: mass computation recentres them
//! after integrating area, so centroid ≡ local origin from then on.
//!
//! Arbitrary point clouds are accepted through [`Shape::polygon`], which wraps
//! them in a convex hull (gift wrapping) before use.

use crate::aabb::Aabb;
use crate::error::PhysicsError;
use crate::math::{Mat2, Vec2};

/// Mass and rotational inertia produced by [`Shape::compute_mass`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MassData {
    /// Total mass (density × area)
    pub mass: f64,
    /// Polar moment of inertia about the body origin
    pub inertia: f64,
}

/// Collision shape in body-local space.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Circle defined by its radius.
    Circle {
        /// Radius of the circle.
        radius: f64,
    },
    /// Convex polygon in counter-clockwise winding order.
    Polygon {
        /// Vertices relative to the centroid, CCW.
        vertices: Vec<Vec2>,
        /// Outward-facing unit normal for the edge starting at each vertex.
        normals: Vec<Vec2>,
    },
}

impl Shape {
    /// Create a circle shape.
    #[inline]
    #[must_use]
    pub const fn circle(radius: f64) -> Self {
        Self::Circle { radius }
    }

    /// Create a convex polygon from an arbitrary point set.
    ///
    /// A convex hull is generated around the supplied points; the hull must
    /// span at least a triangle.
    pub fn polygon(points: &[Vec2]) -> Result<Self, PhysicsError> {
        let vertices = generate_hull(points);
        if vertices.len() < 3 {
            return Err(PhysicsError::DegeneratePolygon {
                hull_vertices: vertices.len(),
            });
        }
        let normals = face_normals(&vertices);
        Ok(Self::Polygon { vertices, normals })
    }

    /// Create a rectangle from half-extents, centred on the origin.
    #[must_use]
    pub fn rectangle(half_width: f64, half_height: f64) -> Self {
        let vertices = vec![
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ];
        let normals = vec![
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        Self::Polygon { vertices, normals }
    }

    /// Create a regular polygon with `sides` faces whose vertices sit
    /// `radius` away from the centre.
    #[must_use]
    pub fn regular_polygon(radius: f64, sides: usize) -> Self {
        let vertices: Vec<Vec2> = (0..sides)
            .map(|i| {
                let angle = 2.0 * core::f64::consts::PI / sides as f64 * (i as f64 + 0.75);
                Vec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        let normals = face_normals(&vertices);
        Self::Polygon { vertices, normals }
    }

    /// Compute mass and inertia for the given density, recentring polygon
    /// vertices on their area centroid as a side effect.
    ///
    /// Circle: `m = π·r²·ρ`, `I = m·r²` (the inertia the engine has always
    /// used; see DESIGN.md for the solid-disc discrepancy).
    ///
    /// Polygon: shoelace integration of area, centroid and second moment,
    /// followed by the recentring that establishes the centroid-origin
    /// invariant.
    pub fn compute_mass(&mut self, density: f64) -> MassData {
        match self {
            Self::Circle { radius } => {
                let mass = core::f64::consts::PI * *radius * *radius * density;
                MassData {
                    mass,
                    inertia: mass * *radius * *radius,
                }
            }
            Self::Polygon { vertices, .. } => {
                let mut centroid = Vec2::ZERO;
                let mut area = 0.0;
                let mut inertia = 0.0;
                let k = 1.0 / 3.0;

                for i in 0..vertices.len() {
                    let point1 = vertices[i];
                    let point2 = vertices[(i + 1) % vertices.len()];
                    let parallelogram_area = point1.cross(point2);
                    let triangle_area = 0.5 * parallelogram_area;
                    area += triangle_area;

                    let weight = triangle_area * k;
                    centroid += point1 * weight;
                    centroid += point2 * weight;

                    let intx2 = point1.x * point1.x + point2.x * point1.x + point2.x * point2.x;
                    let inty2 = point1.y * point1.y + point2.y * point1.y + point2.y * point2.y;
                    inertia += (0.25 * k * parallelogram_area) * (intx2 + inty2);
                }
                centroid = centroid * (1.0 / area);

                // Establishes the centroid-origin invariant. Normals are
                // translation-invariant and stay as they are.
                for vertex in vertices.iter_mut() {
                    *vertex -= centroid;
                }

                MassData {
                    mass: density * area,
                    inertia: inertia * density,
                }
            }
        }
    }

    /// Body-local AABB for the current orientation.
    ///
    /// The circle ignores the rotation; the polygon takes the bounds of its
    /// rotated vertices.
    #[must_use]
    pub fn compute_local_aabb(&self, orient: &Mat2) -> Aabb {
        match self {
            Self::Circle { radius } => {
                Aabb::new(Vec2::new(-radius, -radius), Vec2::new(*radius, *radius))
            }
            Self::Polygon { vertices, .. } => {
                let first = orient.mul(vertices[0]);
                let mut min_x = first.x;
                let mut max_x = first.x;
                let mut min_y = first.y;
                let mut max_y = first.y;

                for vertex in vertices.iter().skip(1) {
                    let point = orient.mul(*vertex);
                    if point.x < min_x {
                        min_x = point.x;
                    } else if point.x > max_x {
                        max_x = point.x;
                    }
                    if point.y < min_y {
                        min_y = point.y;
                    } else if point.y > max_y {
                        max_y = point.y;
                    }
                }
                Aabb::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
            }
        }
    }
}

/// Outward unit normal for each CCW edge: `-perp(v[i+1] - v[i])`, normalized.
fn face_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    (0..vertices.len())
        .map(|i| {
            let next = vertices[(i + 1) % vertices.len()];
            -(next - vertices[i]).normal().normalized()
        })
        .collect()
}

/// Gift-wrap a convex hull around `points`, starting from the leftmost point
/// and walking counter-clockwise.
fn generate_hull(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut first_point_index = 0;
    let mut min_x = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        if p.x < min_x {
            first_point_index = i;
            min_x = p.x;
        }
    }

    let mut hull = Vec::new();
    let mut point = first_point_index;
    let mut first = true;
    while point != first_point_index || first {
        first = false;
        hull.push(points[point]);
        let mut current_eval = (point + 1) % n;
        for i in 0..n {
            if side_of_line(points[point], points[i], points[current_eval]) == -1 {
                current_eval = i;
            }
        }
        point = current_eval;
        // A repeated input point can stall the wrap; bail once every input
        // has been visited.
        if hull.len() > n {
            break;
        }
    }
    hull
}

/// Which side of the directed line `p1 → p2` the point lies on:
/// positive = right, negative = left, 0 = collinear.
fn side_of_line(p1: Vec2, p2: Vec2, point: Vec2) -> i32 {
    let val = (p2.y - p1.y) * (point.x - p2.x) - (p2.x - p1.x) * (point.y - p2.y);
    if val > 0.0 {
        1
    } else if val == 0.0 {
        0
    } else {
        -1
    }
}

// ============================================================================
// Tests
// ============================================================================
