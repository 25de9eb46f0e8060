#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rigid2d::prelude::*;

#[derive(Debug, Arbitrary)]
struct CollisionInput {
    /// Two bodies' positions (close together to force collision)
    x1: i8,
    y1: i8,
    x2: i8,
    y2: i8,
    /// Orientations in centiradians
    angle1: i8,
    angle2: i8,
    /// Shape selectors
    circle1: bool,
    circle2: bool,
    /// Steps to run
    steps: u8,
}

// Fuzz collision detection by placing bodies close together, including the
// fully overlapping and concentric cases. Must never panic.
fuzz_target!(|input: CollisionInput| {
    let mut world = World::new(Vec2::new(0.0, -10.0));

    let shape = |circle: bool| {
        if circle {
            Shape::circle(1.0)
        } else {
            Shape::rectangle(1.0, 1.0)
        }
    };

    let a = world
        .add_body(Body::new(
            shape(input.circle1),
            Vec2::new(f64::from(input.x1), f64::from(input.y1)),
        ))
        .expect("finite body");
    let b = world
        .add_body(Body::new(
            shape(input.circle2),
            Vec2::new(f64::from(input.x2), f64::from(input.y2)),
        ))
        .expect("finite body");

    world.bodies_mut()[a].set_orientation(f64::from(input.angle1) / 100.0);
    world.bodies_mut()[b].set_orientation(f64::from(input.angle2) / 100.0);

    let dt = 1.0 / 60.0;
    for _ in 0..(input.steps as usize).min(30) {
        world.step(dt);
    }

    for body in world.bodies() {
        assert!(body.position.is_valid());
    }
});
