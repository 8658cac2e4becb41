use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use beamline::prelude::*;

fn seeded_ring(macro_count: usize) -> Accelerator {
    let speed = 0.01 * SPEED_OF_LIGHT;
    let field = PROTON_MASS * speed / ELEMENTARY_CHARGE;
    let corners = [
        R3::new(0.0, 1.0, 0.0),
        R3::new(1.0, 0.0, 0.0),
        R3::new(0.0, -1.0, 0.0),
        R3::new(-1.0, 0.0, 0.0),
    ];
    let mut ring = Accelerator::new();
    for i in 0..4 {
        ring.append(
            Element::dipole(corners[i], corners[(i + 1) % 4], 0.1, 1.0, field)
                .expect("valid dipole"),
        )
        .expect("matching corners");
    }
    ring.close_ring().expect("closed ring");

    let model = Particle::new(
        R3::zeros(),
        R3::new(speed, 0.0, 0.0),
        PROTON_MASS,
        ELEMENTARY_CHARGE,
        1.0e-3,
        Rgb::WHITE,
    )
    .expect("positive mass");
    let beam = Beam::new(model, macro_count, 1.0).expect("positive weight");
    beam.activate(&mut ring).expect("ring seeding");
    ring.evolve(1.0e-10); // drain the pending list
    ring
}

fn bench_evolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve");
    for macro_count in [64_usize, 512, 4_096] {
        group.bench_function(BenchmarkId::new("ring_tick", macro_count), |b| {
            b.iter_batched(
                || seeded_ring(macro_count),
                |mut ring| {
                    for _ in 0..100 {
                        ring.evolve(1.0e-10);
                    }
                    ring
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evolve);
criterion_main!(benches);
