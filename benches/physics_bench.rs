//! Benchmarks for rigid2d
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rigid2d::prelude::*;

// ============================================================================
// Scene builders
// ============================================================================

fn world_with_floor() -> World {
    let mut world = World::new(Vec2::new(0.0, -10.0));
    let floor = world
        .add_body(Body::new(Shape::rectangle(100.0, 1.0), Vec2::new(0.0, -1.0)))
        .expect("floor is valid");
    world.bodies_mut()[floor].set_density(0.0);
    world
}

fn falling_circles(count: usize) -> World {
    let mut world = world_with_floor();
    for i in 0..count {
        let x = (i as f64) * 2.5 - count as f64;
        world
            .add_body(Body::new(Shape::circle(1.0), Vec2::new(x, 20.0)))
            .expect("circle is valid");
    }
    world
}

fn box_stack(height: usize) -> World {
    let mut world = world_with_floor();
    for i in 0..height {
        let mut body = Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(0.0, 1.1 + 2.2 * i as f64));
        body.restitution = 0.0;
        world.add_body(body).expect("box is valid");
    }
    world
}

// ============================================================================
// Step benchmarks
// ============================================================================

fn bench_physics_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_step");

    group.bench_function("single_body_60_steps", |b| {
        b.iter(|| {
            let mut world = world_with_floor();
            world
                .add_body(Body::new(Shape::circle(1.0), Vec2::new(0.0, 100.0)))
                .expect("circle is valid");
            let dt = 1.0 / 60.0;
            for _ in 0..60 {
                world.step(black_box(dt));
            }
            world.bodies()[1].position
        });
    });

    group.bench_function("twenty_circles_60_steps", |b| {
        b.iter(|| {
            let mut world = falling_circles(20);
            let dt = 1.0 / 60.0;
            for _ in 0..60 {
                world.step(black_box(dt));
            }
            world.bodies()[1].position
        });
    });

    group.bench_function("ten_box_stack_60_steps", |b| {
        b.iter(|| {
            let mut world = box_stack(10);
            let dt = 1.0 / 60.0;
            for _ in 0..60 {
                world.step(black_box(dt));
            }
            world.bodies()[1].position
        });
    });

    group.finish();
}

// ============================================================================
// Narrow-phase benchmarks
// ============================================================================

fn bench_narrow_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrow_phase");

    group.bench_function("polygon_sat_pair", |b| {
        let bodies = vec![
            Body::new(Shape::regular_polygon(2.0, 8), Vec2::new(0.0, 0.0)),
            Body::new(Shape::regular_polygon(2.0, 8), Vec2::new(3.0, 0.5)),
        ];
        b.iter(|| {
            let mut arbiter = Arbiter::new(0, 1, black_box(&bodies));
            arbiter.narrow_phase(&bodies);
            arbiter.contact_count
        });
    });

    group.bench_function("circle_polygon_pair", |b| {
        let bodies = vec![
            Body::new(Shape::circle(1.0), Vec2::new(0.0, 2.5)),
            Body::new(Shape::rectangle(4.0, 2.0), Vec2::new(0.0, 0.0)),
        ];
        b.iter(|| {
            let mut arbiter = Arbiter::new(0, 1, black_box(&bodies));
            arbiter.narrow_phase(&bodies);
            arbiter.contact_count
        });
    });

    group.finish();
}

// ============================================================================
// Ray benchmarks
// ============================================================================

fn bench_raycast(c: &mut Criterion) {
    use rigid2d::raycast::Ray;

    let mut group = c.benchmark_group("raycast");

    group.bench_function("ray_vs_50_bodies", |b| {
        let bodies: Vec<Body> = (0..50)
            .map(|i| {
                let x = 5.0 + i as f64 * 3.0;
                if i % 2 == 0 {
                    Body::new(Shape::circle(1.0), Vec2::new(x, 0.0))
                } else {
                    Body::new(Shape::rectangle(1.0, 1.0), Vec2::new(x, 0.0))
                }
            })
            .collect();
        b.iter(|| {
            let mut ray = Ray::new(Vec2::ZERO, Vec2::UNIT_X, 1000.0);
            ray.update_projection(black_box(&bodies));
            ray.information().map(|info| info.body)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_physics_step, bench_narrow_phase, bench_raycast);
criterion_main!(benches);
