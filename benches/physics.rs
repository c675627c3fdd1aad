//! Benchmarks for impulse engine stepping.

use criterion::{criterion_group, criterion_main, Criterion};
use impulse::*;

fn bench_click_spring(c: &mut Criterion) {
    c.bench_function("click_spring_1000_steps", |b| {
        b.iter(|| {
            let mut engine = PhysicsEngine::new();
            let particle = engine.add_body(Body::at_rest(Vector::zero(), 1.0).unwrap());
            let spring = Spring::critically_damped(Anchor::Point(Vector::zero()), 100.0).unwrap();
            engine.attach_new(spring, particle).unwrap();
            engine.apply_force(particle, Vector::new(0.0, 0.0, -0.5)).unwrap();
            for _ in 0..1000 {
                engine.step(16.0).unwrap();
            }
            engine.position(particle).unwrap()
        });
    });
}

fn bench_spring_chain(c: &mut Criterion) {
    c.bench_function("spring_chain_50_bodies_60_steps", |b| {
        b.iter(|| {
            let config = EngineConfig::new()
                .with_sub_steps(4)
                .with_gravity(Vector::new(0.0, -9.81, 0.0));
            let mut engine = PhysicsEngine::with_config(config);
            let mut previous = None;
            for i in 0..50 {
                let body = engine
                    .add_body(Body::at_rest(Vector::new(i as f64 * 0.2, 0.0, 0.0), 1.0).unwrap());
                let anchor = match previous {
                    Some(handle) => Anchor::Body(handle),
                    None => Anchor::Point(Vector::zero()),
                };
                let spring = Spring::critically_damped(anchor, 0.1)
                    .unwrap()
                    .with_rest_length(0.2)
                    .unwrap();
                engine.attach_new(spring, body).unwrap();
                previous = Some(body);
            }
            for _ in 0..60 {
                engine.step(1.0 / 60.0).unwrap();
            }
            engine.bodies().map(|(_, body)| body.position()).last()
        });
    });
}

criterion_group!(benches, bench_click_spring, bench_spring_chain);
criterion_main!(benches);
