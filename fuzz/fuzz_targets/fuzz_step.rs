#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rigid2d::prelude::*;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Number of bodies to add (capped)
    body_count: u8,
    /// Position components (i16 to keep values reasonable)
    positions: Vec<(i16, i16)>,
    /// Shape selector and size per body
    shapes: Vec<(bool, u8)>,
    /// Density numerators (0 makes the body static)
    densities: Vec<u8>,
    /// Number of simulation steps (capped)
    step_count: u8,
}

// Fuzz the world: add random bodies and step. Must never panic regardless
// of input, and must never produce non-finite positions from finite input.
fuzz_target!(|input: FuzzInput| {
    let mut world = World::new(Vec2::new(0.0, -10.0));

    let body_count = (input.body_count as usize).min(12);
    let dt = 1.0 / 60.0;

    for i in 0..body_count {
        let (x, y) = input.positions.get(i).copied().unwrap_or((0, 0));
        let (is_circle, size) = input.shapes.get(i).copied().unwrap_or((true, 10));
        let size = f64::from(size.max(1)) / 10.0;

        let shape = if is_circle {
            Shape::circle(size)
        } else {
            Shape::rectangle(size, size)
        };
        let mut body = Body::new(shape, Vec2::new(f64::from(x), f64::from(y)));
        let density = input.densities.get(i).copied().unwrap_or(10);
        body.set_density(f64::from(density));

        world.add_body(body).expect("finite bodies must be accepted");
    }

    let steps = (input.step_count as usize).min(30);
    for _ in 0..steps {
        world.step(dt);
    }

    for body in world.bodies() {
        assert!(
            body.position.is_valid(),
            "finite input produced a non-finite position"
        );
    }
});
