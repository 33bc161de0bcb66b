use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use orrery_simulation::{KeplerSolver, OrbitRegistry};

fn bench_kepler_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("kepler_solver");
    let solver = KeplerSolver::default();

    for e in [0.0167, 0.2056, 0.6, 0.95] {
        group.bench_function(format!("e={e}"), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..64 {
                    let m = i as f64 * 0.0981;
                    acc += solver.solve(black_box(m), black_box(e)).eccentric_anomaly;
                }
                acc
            });
        });
    }

    group.finish();
}

fn bench_registry_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("orbit_registry");

    let Ok(mut registry) = OrbitRegistry::solar_system() else {
        return;
    };
    // Warmup
    registry.step();

    group.throughput(Throughput::Elements(registry.poses().count() as u64));
    group.bench_function("solar_system_step", |b| {
        b.iter(|| registry.step());
    });

    group.finish();
}

criterion_group!(benches, bench_kepler_solver, bench_registry_step);
criterion_main!(benches);
