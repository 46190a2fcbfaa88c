use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prs_sweep::{SweepPlan, SweepStrategy};

fn bench_points(c: &mut Criterion) {
    let strategy = SweepStrategy::default();
    c.bench_function("adaptive_points_500m", |b| {
        b.iter(|| strategy.points(black_box(500_000_000)).count())
    });

    let fine = SweepStrategy::Adaptive {
        step0: Some(1),
        coarsen_after: 4,
        factor: 2,
        limit_percent: 100,
    };
    c.bench_function("adaptive_points_fine_steps", |b| {
        b.iter(|| fine.points(black_box(u64::MAX / 2)).count())
    });

    let plan = SweepPlan::default();
    c.bench_function("plan_total_launches", |b| b.iter(|| plan.total_launches()));
}

criterion_group!(benches, bench_points);
criterion_main!(benches);
