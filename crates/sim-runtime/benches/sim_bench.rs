use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_run(c: &mut Criterion) {
    let params = sim_core::Parameters {
        time_steps: 1_000,
        ..sim_core::Parameters::default()
    };
    c.bench_function("run 1000 periods", |b| {
        b.iter(|| {
            let _ = black_box(sim_runtime::run(params.clone()));
        })
    });
}

fn bench_step(c: &mut Criterion) {
    let params = sim_core::Parameters::default();
    let state = params.initial_state();
    c.bench_function("single step", |b| {
        b.iter(|| black_box(sim_runtime::step(1, &params, &state, None)))
    });
}

criterion_group!(benches, bench_run, bench_step);
criterion_main!(benches);
