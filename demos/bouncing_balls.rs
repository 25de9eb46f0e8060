//! Bouncing balls demo: drops a row of balls with rising restitution onto a
//! floor and prints their heights for a few seconds of simulated time.
//!
//! Run with: `cargo run --example bouncing_balls`

use rigid2d::prelude::*;

fn main() -> Result<(), PhysicsError> {
    let mut world = World::new(Vec2::new(0.0, -9.81));

    let floor = world.add_body(Body::new(
        Shape::rectangle(50.0, 1.0),
        Vec2::new(0.0, -1.0),
    ))?;
    world.bodies_mut()[floor].set_density(0.0);

    let mut balls = Vec::new();
    for i in 0..5 {
        let index = world.add_body(Body::new(
            Shape::circle(0.5),
            Vec2::new(i as f64 * 2.0 - 4.0, 8.0),
        ))?;
        world.bodies_mut()[index].restitution = 0.2 * i as f64;
        balls.push(index);
    }

    let dt = world.config().preferred_dt();
    for frame in 0..300 {
        world.step(dt);
        if frame % 30 == 0 {
            let heights: Vec<String> = balls
                .iter()
                .map(|&index| format!("{:6.2}", world.bodies()[index].position.y))
                .collect();
            println!(
                "t={:5.2}s  heights: {}  contacts: {}",
                frame as f64 * dt,
                heights.join(" "),
                world.contacts().len()
            );
        }
    }

    Ok(())
}
