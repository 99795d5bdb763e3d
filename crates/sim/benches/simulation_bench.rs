use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pedisim_sim::simulation::{Environment, SimulationBuilder};

fn bench_simulation_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_init");

    for k in [200usize, 2_000] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_with_input(BenchmarkId::new("founders", k), &k, |b, &k| {
            b.iter(|| {
                black_box(
                    SimulationBuilder::new()
                        .years(black_box(1), black_box(10))
                        .carrying_capacity(black_box(k))
                        .seed(1)
                        .build()
                        .unwrap(),
                );
            })
        });
    }

    group.finish();
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for k in [200usize, 2_000] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_with_input(BenchmarkId::new("equilibrium_year", k), &k, |b, &k| {
            b.iter_batched(
                || {
                    // Warm up past the founder year so every stage has work
                    let mut sim = SimulationBuilder::new()
                        .years(1, 30)
                        .carrying_capacity(k)
                        .seed(7)
                        .build()
                        .unwrap();
                    sim.run_for(20).unwrap();
                    sim
                },
                |mut sim| {
                    sim.step().unwrap();
                    black_box(sim)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_simulation_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_run");
    let years = 40i64;
    group.sample_size(20);

    group.bench_with_input(BenchmarkId::new("step_change", years), &years, |b, &years| {
        b.iter_batched(
            || {
                SimulationBuilder::new()
                    .years(1, years)
                    .environment(Environment::step_change(1..=years, years / 2 + 1, 0.0, 1.5))
                    .seed(3)
                    .build()
                    .unwrap()
            },
            |mut sim| {
                sim.run().unwrap();
                black_box(sim)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_simulation_init,
    bench_simulation_step,
    bench_simulation_run
);
criterion_main!(benches);
