//! Debug Visualization
//!
//! Backend-agnostic wireframe extraction for the world's state. Implement
//! [`DebugRenderer`] for a graphics backend and call [`debug_draw_world`]
//! each frame; the engine emits plain line and point primitives and never
//! touches a windowing or drawing API itself.

use crate::body::Body;
use crate::math::Vec2;
use crate::shape::Shape;
use crate::world::World;

/// Line segments used to approximate a circle outline.
const CIRCLE_SEGMENTS: usize = 16;

/// Half-length of the contact tangent/normal indicator lines.
const CONTACT_LINE_SCALE: f64 = 0.5;

/// A debug line segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    /// Start point
    pub start: Vec2,
    /// End point
    pub end: Vec2,
}

/// A debug point in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugPoint {
    /// Position
    pub position: Vec2,
}

/// What to extract in [`debug_draw_world`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugDrawFlags {
    /// Draw shape outlines
    pub draw_shapes: bool,
    /// Draw body AABBs (world space)
    pub draw_aabbs: bool,
    /// Draw contact points with tangent/normal indicators
    pub draw_contacts: bool,
    /// Draw joint connections
    pub draw_joints: bool,
    /// Draw body centres of mass
    pub draw_centres: bool,
}

impl Default for DebugDrawFlags {
    fn default() -> Self {
        Self {
            draw_shapes: true,
            draw_aabbs: false,
            draw_contacts: false,
            draw_joints: true,
            draw_centres: false,
        }
    }
}

/// Sink for extracted debug geometry.
pub trait DebugRenderer {
    /// Receive one line segment.
    fn line(&mut self, line: DebugLine);
    /// Receive one point.
    fn point(&mut self, point: DebugPoint);
}

/// Extract the selected debug geometry for the whole world.
pub fn debug_draw_world(world: &World, renderer: &mut dyn DebugRenderer, flags: DebugDrawFlags) {
    if flags.draw_shapes {
        for body in world.bodies() {
            draw_shape(body, renderer);
        }
    }

    if flags.draw_aabbs {
        for body in world.bodies() {
            let aabb = body.world_aabb();
            let corners = [
                aabb.min,
                Vec2::new(aabb.max.x, aabb.min.y),
                aabb.max,
                Vec2::new(aabb.min.x, aabb.max.y),
            ];
            draw_loop(&corners, renderer);
        }
    }

    if flags.draw_centres {
        for body in world.bodies() {
            renderer.point(DebugPoint {
                position: body.position,
            });
        }
    }

    if flags.draw_contacts {
        for contact in world.contacts() {
            let point = contact.contacts[0];
            renderer.point(DebugPoint { position: point });

            // Tangent and normal indicator lines through the contact point
            let tangent = contact.contact_normal.normal() * CONTACT_LINE_SCALE;
            renderer.line(DebugLine {
                start: point + tangent,
                end: point - tangent,
            });
            let normal = contact.contact_normal * CONTACT_LINE_SCALE;
            renderer.line(DebugLine {
                start: point + normal,
                end: point - normal,
            });
        }
    }

    if flags.draw_joints {
        for joint in world.joints() {
            match *joint {
                crate::joint::Joint::ToBody {
                    body_a,
                    body_b,
                    offset_a,
                    offset_b,
                    ..
                } => {
                    renderer.line(DebugLine {
                        start: world.bodies()[body_a].world_point(offset_a),
                        end: world.bodies()[body_b].world_point(offset_b),
                    });
                }
                crate::joint::Joint::ToPoint {
                    body,
                    point,
                    offset,
                    ..
                } => {
                    renderer.line(DebugLine {
                        start: world.bodies()[body].world_point(offset),
                        end: point,
                    });
                }
            }
        }
    }
}

/// Emit a body's shape outline.
fn draw_shape(body: &Body, renderer: &mut dyn DebugRenderer) {
    match &body.shape {
        Shape::Circle { radius } => {
            let step = core::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
            let mut previous = body.position + Vec2::new(*radius, 0.0);
            for i in 1..=CIRCLE_SEGMENTS {
                let angle = step * i as f64;
                let next = body.position + Vec2::from_angle(angle) * *radius;
                renderer.line(DebugLine {
                    start: previous,
                    end: next,
                });
                previous = next;
            }
        }
        Shape::Polygon { vertices, .. } => {
            let world: Vec<Vec2> = vertices.iter().map(|v| body.world_point(*v)).collect();
            draw_loop(&world, renderer);
        }
    }
}

/// Emit a closed polyline through the given points.
fn draw_loop(points: &[Vec2], renderer: &mut dyn DebugRenderer) {
    for i in 0..points.len() {
        renderer.line(DebugLine {
            start: points[i],
            end: points[(i + 1) % points.len()],
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
