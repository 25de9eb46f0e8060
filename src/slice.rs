//! Polygon Slicing
//!
//! A [`Slice`] is a directed cut line projected through the world. Updating
//! the projection collects entry/exit intersections per body; executing the
//! slice splits each crossed polygon into two bodies along the cut, rebuilt
//! at their own centroids. Static bodies produce static halves. Circles
//! cannot be split and are removed when crossed.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::math::Vec2;
use crate::raycast::RayInformation;
use crate::shape::Shape;
use crate::world::World;

/// A straight cut through the world.
#[derive(Clone, Debug)]
pub struct Slice {
    start_point: Vec2,
    direction: Vec2,
    distance: f64,
    intersections: Vec<RayInformation>,
}

impl Slice {
    /// Create a slice; the direction is normalized on entry.
    #[must_use]
    pub fn new(start_point: Vec2, direction: Vec2, distance: f64) -> Self {
        Self {
            start_point,
            direction: direction.normalized(),
            distance,
            intersections: Vec::new(),
        }
    }

    /// Aim the slice at a world-space point: the cut runs from the start
    /// point to `target`.
    pub fn set_direction(&mut self, target: Vec2) {
        let direction = target - self.start_point;
        self.distance = direction.length();
        self.direction = direction.normalized();
    }

    /// Intersections found by the last [`Slice::update_projection`], in
    /// body order with entry/exit pairs adjacent.
    #[inline]
    #[must_use]
    pub fn intersections(&self) -> &[RayInformation] {
        &self.intersections
    }

    /// Collect the cut line's intersections with every body. Bodies crossed
    /// an odd number of times (the cut ends inside them) are dropped from
    /// the list — only full crossings can be sliced.
    pub fn update_projection(&mut self, bodies: &[Body]) {
        self.intersections.clear();
        let end_point = self.direction * self.distance;

        for (index, body) in bodies.iter().enumerate() {
            let mut hits_on_body = 0usize;
            match &body.shape {
                Shape::Polygon { vertices, .. } => {
                    for i in 0..vertices.len() {
                        let edge_start = body.world_point(vertices[i]);
                        let edge_end = body.world_point(vertices[(i + 1) % vertices.len()]);
                        let edge = edge_end - edge_start;

                        let denominator = edge.x * end_point.y - edge.y * end_point.x;
                        if denominator == 0.0 {
                            continue;
                        }

                        let t2 = (end_point.x * (edge_start.y - self.start_point.y)
                            + end_point.y * (self.start_point.x - edge_start.x))
                            / denominator;
                        let point = edge_start + edge * t2;
                        let t1 = (point - self.start_point).dot(self.direction) / self.distance;

                        if t1 > 0.0
                            && (0.0..=1.0).contains(&t2)
                            && (point - self.start_point).length() < self.distance
                        {
                            self.intersections.push(RayInformation {
                                body: index,
                                coordinate: point,
                                edge_index: Some(i),
                            });
                            hits_on_body += 1;
                        }
                    }
                }
                Shape::Circle { radius } => {
                    let dif_in_centers = self.start_point - body.position;
                    let a = end_point.dot(end_point);
                    let b = 2.0 * dif_in_centers.dot(end_point);
                    let c = dif_in_centers.dot(dif_in_centers) - radius * radius;

                    let discriminant = b * b - 4.0 * a * c;
                    if discriminant > 0.0 {
                        let root = discriminant.sqrt();
                        for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
                            if (0.0..=1.0).contains(&t) {
                                self.intersections.push(RayInformation {
                                    body: index,
                                    coordinate: self.start_point + end_point * t,
                                    edge_index: None,
                                });
                                hits_on_body += 1;
                            }
                        }
                    }
                }
            }
            // The cut must pass clean through: a dangling entry point
            // cannot split anything.
            if hits_on_body % 2 == 1 {
                self.intersections.pop();
            }
        }
    }

    /// Execute the slice: split every fully crossed polygon into two bodies
    /// and remove the originals (and any crossed circles) from the world.
    pub fn slice_bodies(&mut self, world: &mut World) -> Result<(), PhysicsError> {
        struct SliceOp {
            body: usize,
            is_static: bool,
            halves: Option<(Vec<Vec2>, Vec<Vec2>)>,
        }

        let mut ops: Vec<SliceOp> = Vec::new();

        let mut i = 0;
        while i + 1 < self.intersections.len() {
            let entry = self.intersections[i];
            let exit = self.intersections[i + 1];
            i += 2;

            if entry.body != exit.body {
                continue;
            }
            let body = &world.bodies()[entry.body];
            let is_static = body.mass == 0.0;

            let halves = match (&body.shape, entry.edge_index, exit.edge_index) {
                (Shape::Polygon { vertices, .. }, Some(first_edge), Some(second_edge)) => {
                    let n = vertices.len();

                    // First half: the vertex run outside the cut, stitched
                    // with both intersection points.
                    let mut ring1 =
                        Vec::with_capacity(first_edge + 2 + n - second_edge);
                    for x in 0..=first_edge {
                        ring1.push(body.world_point(vertices[x]));
                    }
                    ring1.push(entry.coordinate);
                    ring1.push(exit.coordinate);
                    for x in (second_edge + 1)..n {
                        ring1.push(body.world_point(vertices[x]));
                    }

                    // Second half: the vertex run between the two cut edges.
                    let mut ring2 = Vec::with_capacity(second_edge - first_edge + 2);
                    ring2.push(entry.coordinate);
                    for x in (first_edge + 1)..=second_edge {
                        ring2.push(body.world_point(vertices[x]));
                    }
                    ring2.push(exit.coordinate);

                    Some((ring1, ring2))
                }
                _ => None,
            };

            ops.push(SliceOp {
                body: entry.body,
                is_static,
                halves,
            });
        }

        // Highest index first: swap-removal never disturbs a pending lower
        // index that way.
        ops.sort_by(|lhs, rhs| rhs.body.cmp(&lhs.body));

        for op in ops {
            if let Some((ring1, ring2)) = op.halves {
                // Build both halves before mutating anything; a grazing cut
                // can collapse a ring below a triangle, which voids the op.
                let (Ok(shape1), Ok(shape2)) =
                    (Shape::polygon(&ring1), Shape::polygon(&ring2))
                else {
                    continue;
                };

                for (shape, ring) in [(shape1, ring1), (shape2, ring2)] {
                    let centre = find_poly_centre(&ring);
                    let mut half = Body::new(shape, centre);
                    if op.is_static {
                        half.set_density(0.0);
                    }
                    world.add_body(half)?;
                }
            }
            world.remove_body(op.body)?;
        }
        Ok(())
    }
}

/// Area centroid of a closed vertex ring (shoelace formula).
fn find_poly_centre(vertices: &[Vec2]) -> Vec2 {
    let mut accumulated_area = 0.0;
    let mut centre_x = 0.0;
    let mut centre_y = 0.0;

    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let temp = vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
        accumulated_area += temp;
        centre_x += (vertices[i].x + vertices[j].x) * temp;
        centre_y += (vertices[i].y + vertices[j].y) * temp;
        j = i;
    }

    if accumulated_area == 0.0 {
        return Vec2::ZERO;
    }

    accumulated_area *= 3.0;
    Vec2::new(centre_x / accumulated_area, centre_y / accumulated_area)
}

// ============================================================================
// Tests
// ============================================================================
