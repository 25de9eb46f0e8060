//! Integration tests for rigid2d
//!
//! These tests verify end-to-end behaviour of the engine using only the
//! public API re-exported from the crate root: whole simulation steps, not
//! individual solver internals.

use approx::assert_relative_eq;
use rigid2d::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

/// Run a world for `steps` frames with the given `dt`.
fn run_world(world: &mut World, steps: usize, dt: f64) {
    for _ in 0..steps {
        world.step(dt);
    }
}

/// A world with downward gravity and a wide static floor whose top surface
/// sits at y = 0.
fn world_with_floor() -> World {
    let mut world = World::new(Vec2::new(0.0, -10.0));
    let floor = world
        .add_body(Body::new(Shape::rectangle(50.0, 1.0), Vec2::new(0.0, -1.0)))
        .unwrap();
    world.bodies_mut()[floor].set_density(0.0);
    world
}

// ============================================================================
// Test 1 — Determinism
// ============================================================================

/// Two identical simulations must produce bit-identical results: the step
/// pipeline is strictly sequential with no hidden state.
#[test]
fn test_same_scene_same_result() {
    fn simulate() -> (Vec2, f64) {
        let mut world = world_with_floor();
        let ball = world
            .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.3, 8.0)))
            .unwrap();
        world
            .add_body(Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(-0.5, 4.0)))
            .unwrap();
        run_world(&mut world, 180, 1.0 / 60.0);
        let body = &world.bodies()[ball];
        (body.position, body.orientation())
    }

    let (pos1, angle1) = simulate();
    let (pos2, angle2) = simulate();
    assert_eq!(pos1, pos2);
    assert_eq!(angle1, angle2);
}

// ============================================================================
// Test 2 — Free fall and floor contact
// ============================================================================

/// A ball dropped on the floor must end up resting on it, not inside or
/// below it.
#[test]
fn test_ball_comes_to_rest_on_floor() {
    let mut world = world_with_floor();
    let ball = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 10.0)))
        .unwrap();
    world.bodies_mut()[ball].restitution = 0.0;
    run_world(&mut world, 600, 1.0 / 60.0);

    let body = &world.bodies()[ball];
    // Resting height is the radius above the surface, within the
    // penetration allowance the engine deliberately tolerates.
    assert_relative_eq!(body.position.y, 1.0, epsilon = 0.05);
    assert!(body.velocity.length() < 0.1, "ball should be at rest");
}

/// A perfectly inelastic ball must not bounce back above its contact height.
#[test]
fn test_inelastic_ball_does_not_bounce() {
    let mut world = world_with_floor();
    let ball = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 5.0)))
        .unwrap();
    world.bodies_mut()[ball].restitution = 0.0;

    let mut max_height_after_contact: f64 = 0.0;
    let mut touched = false;
    for _ in 0..600 {
        world.step(1.0 / 60.0);
        let y = world.bodies()[ball].position.y;
        if !world.contacts().is_empty() {
            touched = true;
        }
        if touched {
            max_height_after_contact = max_height_after_contact.max(y);
        }
    }
    assert!(touched, "ball must reach the floor");
    assert!(
        max_height_after_contact < 1.2,
        "inelastic ball rebounded to {max_height_after_contact}"
    );
}

/// An elastic ball must bounce back to a substantial fraction of its drop
/// height.
#[test]
fn test_elastic_ball_bounces() {
    let mut world = world_with_floor();
    let ball = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 6.0)))
        .unwrap();
    world.bodies_mut()[ball].restitution = 1.0;

    let mut touched = false;
    let mut max_height_after_contact: f64 = 0.0;
    for _ in 0..600 {
        world.step(1.0 / 60.0);
        if !world.contacts().is_empty() {
            touched = true;
        }
        if touched {
            max_height_after_contact =
                max_height_after_contact.max(world.bodies()[ball].position.y);
        }
    }
    assert!(touched);
    assert!(
        max_height_after_contact > 4.0,
        "elastic ball only reached {max_height_after_contact}"
    );
}

// ============================================================================
// Test 3 — Stacking
// ============================================================================

/// Two stacked boxes must settle without sinking into each other or the
/// floor.
#[test]
fn test_small_stack_settles() {
    let mut world = world_with_floor();
    let lower = world
        .add_body(Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(0.0, 1.05)))
        .unwrap();
    let upper = world
        .add_body(Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(0.0, 3.2)))
        .unwrap();
    for index in [lower, upper] {
        world.bodies_mut()[index].restitution = 0.0;
    }
    run_world(&mut world, 600, 1.0 / 60.0);

    let lower_y = world.bodies()[lower].position.y;
    let upper_y = world.bodies()[upper].position.y;
    // Lower box on the floor, upper box on the lower one
    assert_relative_eq!(lower_y, 1.0, epsilon = 0.1);
    assert_relative_eq!(upper_y, 3.0, epsilon = 0.2);
    assert!(upper_y - lower_y > 1.8, "boxes interpenetrated");
}

// ============================================================================
// Test 4 — Friction
// ============================================================================

/// A box sliding along the floor must lose speed to friction; a frictionless
/// box must keep almost all of it.
#[test]
fn test_friction_slows_sliding_box() {
    let dt = 1.0 / 60.0;

    let slide = |static_friction: f64, dynamic_friction: f64| -> f64 {
        let mut world = world_with_floor();
        // The arbiter averages the pair's coefficients, so the floor gets
        // the same values as the box.
        world.bodies_mut()[0].static_friction = static_friction;
        world.bodies_mut()[0].dynamic_friction = dynamic_friction;
        let index = world
            .add_body(Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(-20.0, 1.0)))
            .unwrap();
        let body = &mut world.bodies_mut()[index];
        body.velocity = Vec2::new(8.0, 0.0);
        body.restitution = 0.0;
        body.static_friction = static_friction;
        body.dynamic_friction = dynamic_friction;
        run_world(&mut world, 120, dt);
        world.bodies()[index].velocity.x
    };

    let with_friction = slide(0.5, 0.3);
    let frictionless = slide(0.0, 0.0);
    assert!(
        with_friction < frictionless - 1.0,
        "friction {with_friction} vs frictionless {frictionless}"
    );
    assert!(frictionless > 7.0);
}

// ============================================================================
// Test 5 — Joints
// ============================================================================

/// A body hanging from a stiff point joint must stay near the rest length
/// below the anchor instead of falling away.
#[test]
fn test_point_joint_holds_hanging_body() {
    let mut world = World::new(Vec2::new(0.0, -10.0));
    let bob = world
        .add_body(Body::new(Shape::circle(0.5), Vec2::new(0.0, -5.0)))
        .unwrap();
    world
        .add_joint(Joint::ToPoint {
            body: bob,
            point: Vec2::ZERO,
            offset: Vec2::ZERO,
            natural_length: 5.0,
            spring_constant: 2.0,
            damping_constant: 0.2,
            can_go_slack: false,
        })
        .unwrap();
    run_world(&mut world, 900, 1.0 / 60.0);

    let distance = world.bodies()[bob].position.length();
    assert!(
        (4.0..=7.0).contains(&distance),
        "bob drifted to distance {distance}"
    );
}

/// A slack rope applies nothing while the bodies are closer than its rest
/// length.
#[test]
fn test_slack_rope_is_inert_until_taut() {
    let mut world = World::new(Vec2::ZERO);
    let a = world
        .add_body(Body::new(Shape::circle(0.5), Vec2::new(0.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(Body::new(Shape::circle(0.5), Vec2::new(3.0, 0.0)))
        .unwrap();
    world
        .add_joint(Joint::ToBody {
            body_a: a,
            body_b: b,
            offset_a: Vec2::ZERO,
            offset_b: Vec2::ZERO,
            natural_length: 10.0,
            spring_constant: 50.0,
            damping_constant: 0.0,
            can_go_slack: true,
        })
        .unwrap();
    run_world(&mut world, 60, 1.0 / 60.0);
    assert!(world.bodies()[a].velocity.is_zero());
    assert!(world.bodies()[b].velocity.is_zero());
}

// ============================================================================
// Test 6 — Zero-dt stepping
// ============================================================================

/// Stepping with dt = 0 must leave state unchanged up to one solver pass's
/// worth of numerically negligible correction, even with live contacts.
#[test]
fn test_zero_dt_is_idempotent_with_contacts() {
    let mut world = world_with_floor();
    let ball = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 5.0)))
        .unwrap();
    world.bodies_mut()[ball].restitution = 0.0;
    // Settle onto the floor first so a contact exists
    run_world(&mut world, 300, 1.0 / 60.0);

    let position = world.bodies()[ball].position;
    let velocity = world.bodies()[ball].velocity;
    run_world(&mut world, 10, 0.0);

    assert_relative_eq!(world.bodies()[ball].position.x, position.x, epsilon = 1e-9);
    assert_relative_eq!(world.bodies()[ball].position.y, position.y, epsilon = 1e-6);
    assert_relative_eq!(world.bodies()[ball].velocity.x, velocity.x, epsilon = 1e-6);
    assert_relative_eq!(world.bodies()[ball].velocity.y, velocity.y, epsilon = 1e-6);
}

// ============================================================================
// Test 7 — Mixed shapes
// ============================================================================

/// Circles and polygons interact in the same world: a ball dropped on a
/// static block comes to rest on its top face.
#[test]
fn test_ball_settles_on_static_block() {
    let mut world = world_with_floor();
    let block = world
        .add_body(Body::new(Shape::rectangle(2.0, 2.0), Vec2::new(0.0, 2.0)))
        .unwrap();
    world.bodies_mut()[block].set_density(0.0);
    let ball = world
        .add_body(Body::new(Shape::circle(0.5), Vec2::new(1.2, 10.0)))
        .unwrap();
    world.bodies_mut()[ball].restitution = 0.1;
    run_world(&mut world, 900, 1.0 / 60.0);

    let body = &world.bodies()[ball];
    // Block top is at y = 4; the ball rests one radius above it
    assert_relative_eq!(body.position.y, 4.5, epsilon = 0.1);
    assert_relative_eq!(body.position.x, 1.2, epsilon = 0.1);
}

// ============================================================================
// Test 8 — Query surface
// ============================================================================

/// The world-space AABB and point-containment surface consumed by outside
/// query features.
#[test]
fn test_world_aabb_and_containment_queries() {
    let mut world = World::new(Vec2::ZERO);
    let index = world
        .add_body(Body::new(Shape::rectangle(2.0, 1.0), Vec2::new(10.0, 5.0)))
        .unwrap();

    let aabb = world.bodies()[index].world_aabb();
    assert!(aabb.is_valid());
    assert!(aabb.contains_point(Vec2::new(10.0, 5.0)));
    assert!(!aabb.contains_point(Vec2::new(13.0, 5.0)));

    assert!(world.bodies()[index].contains_point(Vec2::new(11.0, 5.5)));
    assert!(!world.bodies()[index].contains_point(Vec2::new(11.0, 6.5)));
}

// ============================================================================
// Test 9 — Dynamic body management
// ============================================================================

/// Removing a body mid-simulation keeps the remaining scene consistent.
#[test]
fn test_remove_body_mid_simulation() {
    let mut world = world_with_floor();
    let doomed = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 5.0)))
        .unwrap();
    let survivor = world
        .add_body(Body::new(Shape::circle(1.0), Vec2::new(5.0, 5.0)))
        .unwrap();
    run_world(&mut world, 30, 1.0 / 60.0);

    world.remove_body(doomed).unwrap();
    // The survivor was swapped into the freed slot
    let survivor = if survivor == world.bodies().len() {
        doomed
    } else {
        survivor
    };
    run_world(&mut world, 300, 1.0 / 60.0);

    let body = &world.bodies()[survivor];
    assert_relative_eq!(body.position.x, 5.0, epsilon = 0.1);
    assert_relative_eq!(body.position.y, 1.0, epsilon = 0.1);
}
