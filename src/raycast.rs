//! Ray Casting
//!
//! Rays project against the world's body list and report the closest
//! intersection. Built on top of the core's public body/shape surface; the
//! solver never depends on anything here.
//!
//! - [`Ray`]: single ray, closest-hit query
//! - [`RayScatter`]: N rays fanned 360° around an epicentre
//! - [`ShadowCasting`]: vertex-targeted ray fans for line-of-sight polygons

use crate::body::Body;
use crate::math::{Mat2, Vec2};
use crate::shape::Shape;

// ============================================================================
// RayInformation
// ============================================================================

/// Data about a ray-body intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayInformation {
    /// Index of the intersected body.
    pub body: usize,
    /// World-space intersection point.
    pub coordinate: Vec2,
    /// Index of the polygon edge that was hit (`None` for circles).
    pub edge_index: Option<usize>,
}

// ============================================================================
// Ray
// ============================================================================

/// A ray with an origin, unit direction and maximum projection distance.
#[derive(Clone, Debug)]
pub struct Ray {
    start_point: Vec2,
    direction: Vec2,
    distance: f64,
    information: Option<RayInformation>,
}

impl Ray {
    /// Create a ray; the direction is normalized on entry.
    #[must_use]
    pub fn new(start_point: Vec2, direction: Vec2, distance: f64) -> Self {
        Self {
            start_point,
            direction: direction.normalized(),
            distance,
            information: None,
        }
    }

    /// Create a ray from an angle in radians.
    #[must_use]
    pub fn from_angle(start_point: Vec2, direction: f64, distance: f64) -> Self {
        Self::new(start_point, Vec2::from_angle(direction), distance)
    }

    /// Move the ray origin.
    #[inline]
    pub fn set_start_point(&mut self, start_point: Vec2) {
        self.start_point = start_point;
    }

    /// Ray origin.
    #[inline]
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.start_point
    }

    /// Unit direction.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Maximum projection distance.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Closest intersection found by the last [`Ray::update_projection`].
    #[inline]
    #[must_use]
    pub fn information(&self) -> Option<&RayInformation> {
        self.information.as_ref()
    }

    /// Project the ray against every body and record the closest hit, if any.
    pub fn update_projection(&mut self, bodies: &[Body]) {
        self.information = None;
        let end_point = self.direction * self.distance;

        let mut min_t1 = f64::INFINITY;
        let mut closest: Option<RayInformation> = None;

        for (index, body) in bodies.iter().enumerate() {
            match &body.shape {
                Shape::Polygon { vertices, .. } => {
                    for i in 0..vertices.len() {
                        let edge_start = body.world_point(vertices[i]);
                        let edge_end = body.world_point(vertices[(i + 1) % vertices.len()]);
                        let edge = edge_end - edge_start;

                        // Parallel ray and edge have a zero determinant
                        let denominator = edge.x * end_point.y - edge.y * end_point.x;
                        if denominator == 0.0 {
                            continue;
                        }

                        let t2 = (end_point.x * (edge_start.y - self.start_point.y)
                            + end_point.y * (self.start_point.x - edge_start.x))
                            / denominator;
                        let point = edge_start + edge * t2;
                        let t1 = (point - self.start_point).dot(self.direction) / self.distance;

                        if t1 > 0.0 && (0.0..=1.0).contains(&t2) {
                            let dist = (point - self.start_point).length();
                            if t1 < min_t1 && dist < self.distance {
                                min_t1 = t1;
                                closest = Some(RayInformation {
                                    body: index,
                                    coordinate: point,
                                    edge_index: Some(i),
                                });
                            }
                        }
                    }
                }
                Shape::Circle { radius } => {
                    let dif_in_centers = self.start_point - body.position;

                    let a = end_point.dot(end_point);
                    let b = 2.0 * dif_in_centers.dot(end_point);
                    let c = dif_in_centers.dot(dif_in_centers) - radius * radius;

                    let discriminant = b * b - 4.0 * a * c;
                    if discriminant >= 0.0 {
                        let root = discriminant.sqrt();
                        let t1 = (-b - root) / (2.0 * a);
                        if (0.0..=1.0).contains(&t1) && t1 < min_t1 {
                            min_t1 = t1;
                            closest = Some(RayInformation {
                                body: index,
                                coordinate: self.start_point + end_point * t1,
                                edge_index: None,
                            });
                        }
                    }
                }
            }
        }
        self.information = closest;
    }
}

// ============================================================================
// RayScatter
// ============================================================================

/// A fan of equally spaced rays cast 360° around an epicentre.
#[derive(Clone, Debug)]
pub struct RayScatter {
    epicentre: Vec2,
    no_of_rays: usize,
    rays: Vec<Ray>,
}

impl RayScatter {
    /// Create a scatter with no rays cast yet.
    #[must_use]
    pub fn new(epicentre: Vec2, no_of_rays: usize) -> Self {
        Self {
            epicentre,
            no_of_rays,
            rays: Vec::new(),
        }
    }

    /// The rays, empty before [`RayScatter::cast_rays`].
    #[inline]
    #[must_use]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Epicentre of the scatter.
    #[inline]
    #[must_use]
    pub fn epicentre(&self) -> Vec2 {
        self.epicentre
    }

    /// Move the epicentre, carrying all cast rays along.
    pub fn set_epicentre(&mut self, epicentre: Vec2) {
        self.epicentre = epicentre;
        for ray in &mut self.rays {
            ray.set_start_point(epicentre);
        }
    }

    /// Cast the rays with equal angular spacing.
    pub fn cast_rays(&mut self, distance: f64) {
        let angle = core::f64::consts::TAU / self.no_of_rays as f64;
        let rotate = Mat2::from_angle(angle);
        let mut direction = Vec2::new(1.0, 1.0);
        self.rays = (0..self.no_of_rays)
            .map(|_| {
                let ray = Ray::new(self.epicentre, direction, distance);
                direction = rotate.mul(direction);
                ray
            })
            .collect();
    }

    /// Re-project every ray against the bodies.
    pub fn update_rays(&mut self, bodies: &[Body]) {
        for ray in &mut self.rays {
            ray.update_projection(bodies);
        }
    }
}

// ============================================================================
// ShadowCasting
// ============================================================================

/// A ray paired with its polar angle, for angular sorting of shadow fans.
#[derive(Clone, Debug)]
pub struct RayAngleInformation {
    /// The projected ray.
    pub ray: Ray,
    /// Polar angle of the ray direction.
    pub angle: f64,
}

/// Builds the ray fan for line-of-sight/shadow polygons around a point.
///
/// For every polygon vertex a triple of rays is cast (the exact direction and
/// ±1 mrad around it, so rays slip past the silhouette edge); circles get
/// their two tangent directions. Results are sorted by angle, ready to be
/// stitched into a light polygon. An origin inside any body clears the fan.
#[derive(Clone, Debug)]
pub struct ShadowCasting {
    start_point: Vec2,
    distance: f64,
    ray_data: Vec<RayAngleInformation>,
}

impl ShadowCasting {
    /// Create a shadow caster projecting up to `distance` from a point.
    #[must_use]
    pub fn new(start_point: Vec2, distance: f64) -> Self {
        Self {
            start_point,
            distance,
            ray_data: Vec::new(),
        }
    }

    /// Move the projection origin.
    #[inline]
    pub fn set_start_point(&mut self, start_point: Vec2) {
        self.start_point = start_point;
    }

    /// The sorted ray fan from the last update.
    #[inline]
    #[must_use]
    pub fn ray_data(&self) -> &[RayAngleInformation] {
        &self.ray_data
    }

    /// Number of rays in the fan.
    #[inline]
    #[must_use]
    pub fn no_of_rays(&self) -> usize {
        self.ray_data.len()
    }

    /// Rebuild and sort the whole fan against the bodies.
    pub fn update_projections(&mut self, bodies: &[Body]) {
        self.ray_data.clear();
        for body in bodies {
            if body.contains_point(self.start_point) {
                self.ray_data.clear();
                break;
            }
            match &body.shape {
                Shape::Polygon { vertices, .. } => {
                    for vertex in vertices {
                        let direction = body.world_point(*vertex) - self.start_point;
                        self.project_rays(direction, bodies);
                    }
                }
                Shape::Circle { radius } => {
                    let d = body.position - self.start_point;
                    let angle = (radius / d.length()).asin();
                    // The two tangent directions bracket the silhouette
                    let u = Mat2::from_angle(angle);
                    self.project_rays(u.mul(d.normalized()), bodies);
                    let u2 = Mat2::from_angle(-angle);
                    self.project_rays(u2.mul(d.normalized()), bodies);
                }
            }
        }
        self.ray_data
            .sort_by(|lhs, rhs| rhs.angle.total_cmp(&lhs.angle));
    }

    /// Cast the ±1 mrad triple around `direction`.
    fn project_rays(&mut self, direction: Vec2, bodies: &[Body]) {
        let m = Mat2::from_angle(0.001);
        let mut direction = m.transpose().mul(direction);
        for _ in 0..3 {
            let mut ray = Ray::new(self.start_point, direction, self.distance);
            ray.update_projection(bodies);
            self.ray_data.push(RayAngleInformation {
                ray,
                angle: direction.y.atan2(direction.x),
            });
            direction = m.mul(direction);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle_at(x: f64, y: f64, radius: f64) -> Body {
        Body::new(Shape::circle(radius), Vec2::new(x, y))
    }

    fn box_at(x: f64, y: f64, half_w: f64, half_h: f64) -> Body {
        Body::new(Shape::rectangle(half_w, half_h), Vec2::new(x, y))
    }

    // ---- single ray ----

    #[test]
    fn test_ray_hits_circle_front_surface() {
        let bodies = vec![circle_at(10.0, 0.0, 2.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 100.0);
        ray.update_projection(&bodies);
        let info = ray.information().expect("ray must hit the circle");
        assert_eq!(info.body, 0);
        assert_relative_eq!(info.coordinate.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(info.coordinate.y, 0.0, epsilon = 1e-9);
        assert_eq!(info.edge_index, None);
    }

    #[test]
    fn test_ray_hits_polygon_edge() {
        let bodies = vec![box_at(10.0, 0.0, 2.0, 2.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 100.0);
        ray.update_projection(&bodies);
        let info = ray.information().expect("ray must hit the box");
        assert_relative_eq!(info.coordinate.x, 8.0, epsilon = 1e-9);
        assert!(info.edge_index.is_some());
    }

    #[test]
    fn test_ray_picks_closest_body() {
        let bodies = vec![circle_at(20.0, 0.0, 2.0), circle_at(10.0, 0.0, 2.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 100.0);
        ray.update_projection(&bodies);
        assert_eq!(ray.information().unwrap().body, 1);
    }

    #[test]
    fn test_ray_misses_behind_and_out_of_range() {
        let bodies = vec![circle_at(-10.0, 0.0, 2.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 100.0);
        ray.update_projection(&bodies);
        assert!(ray.information().is_none());

        let far = vec![circle_at(50.0, 0.0, 2.0)];
        let mut short_ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 10.0);
        short_ray.update_projection(&far);
        assert!(short_ray.information().is_none());
    }

    #[test]
    fn test_vertical_ray_hits_box() {
        let bodies = vec![box_at(0.0, 10.0, 3.0, 1.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_Y, 100.0);
        ray.update_projection(&bodies);
        let info = ray.information().expect("vertical ray must hit");
        assert_relative_eq!(info.coordinate.y, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ray_projection_clears_stale_hit() {
        let bodies = vec![circle_at(10.0, 0.0, 2.0)];
        let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 100.0);
        ray.update_projection(&bodies);
        assert!(ray.information().is_some());
        ray.update_projection(&[]);
        assert!(ray.information().is_none());
    }

    // ---- scatter ----

    #[test]
    fn test_scatter_casts_requested_ray_count() {
        let mut scatter = RayScatter::new(Vec2::ZERO, 16);
        scatter.cast_rays(50.0);
        assert_eq!(scatter.rays().len(), 16);
        for ray in scatter.rays() {
            assert_relative_eq!(ray.direction().length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_scatter_set_epicentre_moves_rays() {
        let mut scatter = RayScatter::new(Vec2::ZERO, 4);
        scatter.cast_rays(50.0);
        scatter.set_epicentre(Vec2::new(5.0, 5.0));
        for ray in scatter.rays() {
            assert_eq!(ray.start_point(), Vec2::new(5.0, 5.0));
        }
    }

    #[test]
    fn test_scatter_surrounded_hits_all_around() {
        let bodies = vec![
            circle_at(20.0, 20.0, 5.0),
            circle_at(-20.0, 20.0, 5.0),
            circle_at(-20.0, -20.0, 5.0),
            circle_at(20.0, -20.0, 5.0),
        ];
        let mut scatter = RayScatter::new(Vec2::ZERO, 64);
        scatter.cast_rays(100.0);
        scatter.update_rays(&bodies);
        let hits = scatter
            .rays()
            .iter()
            .filter(|ray| ray.information().is_some())
            .count();
        assert!(hits > 0, "some of the 64 rays must hit the four circles");
    }

    // ---- shadow casting ----

    #[test]
    fn test_shadow_fan_for_single_box() {
        let bodies = vec![box_at(10.0, 0.0, 2.0, 2.0)];
        let mut shadows = ShadowCasting::new(Vec2::ZERO, 100.0);
        shadows.update_projections(&bodies);
        // Three rays per polygon vertex
        assert_eq!(shadows.no_of_rays(), 12);
        // Sorted by descending angle
        for pair in shadows.ray_data().windows(2) {
            assert!(pair[0].angle >= pair[1].angle);
        }
    }

    #[test]
    fn test_shadow_fan_cleared_when_origin_inside_body() {
        let bodies = vec![box_at(0.0, 0.0, 5.0, 5.0)];
        let mut shadows = ShadowCasting::new(Vec2::ZERO, 100.0);
        shadows.update_projections(&bodies);
        assert_eq!(shadows.no_of_rays(), 0);
    }

    #[test]
    fn test_shadow_circle_gets_two_tangent_triples() {
        let bodies = vec![circle_at(10.0, 0.0, 2.0)];
        let mut shadows = ShadowCasting::new(Vec2::ZERO, 100.0);
        shadows.update_projections(&bodies);
        assert_eq!(shadows.no_of_rays(), 6);
    }
}
