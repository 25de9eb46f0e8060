//! Stacked boxes demo: builds a small tower, lets it settle, then blasts it
//! with a proximity explosion.
//!
//! Run with: `cargo run --example stacked_boxes`

use rigid2d::explosion::ProximityExplosion;
use rigid2d::prelude::*;

fn main() -> Result<(), PhysicsError> {
    let mut world = World::new(Vec2::new(0.0, -9.81));

    let floor = world.add_body(Body::new(
        Shape::rectangle(50.0, 1.0),
        Vec2::new(0.0, -1.0),
    ))?;
    world.bodies_mut()[floor].set_density(0.0);

    let mut tower = Vec::new();
    for i in 0..6 {
        let index = world.add_body(Body::new(
            Shape::rectangle(1.0, 1.0),
            Vec2::new(0.0, 1.05 + 2.1 * i as f64),
        ))?;
        world.bodies_mut()[index].restitution = 0.0;
        tower.push(index);
    }

    let dt = world.config().preferred_dt();
    for _ in 0..240 {
        world.step(dt);
    }
    println!("settled tower:");
    for &index in &tower {
        let body = &world.bodies()[index];
        println!("  box {index}: y = {:6.2}", body.position.y);
    }

    // Blast the base of the tower
    let mut explosion = ProximityExplosion::new(Vec2::new(3.0, 1.0), 8.0);
    explosion.update(world.bodies());
    explosion.apply_blast_impulse(world.bodies_mut(), 40.0);

    for _ in 0..240 {
        world.step(dt);
    }
    println!("after the blast:");
    for &index in &tower {
        let body = &world.bodies()[index];
        println!(
            "  box {index}: x = {:6.2}, y = {:6.2}",
            body.position.x, body.position.y
        );
    }

    Ok(())
}
