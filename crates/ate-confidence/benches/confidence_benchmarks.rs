use ate_confidence::{hypergeometric_interval, tau_twosided_ci, Tail};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Observed tables `(n11, n10, n01, n00)` of increasing size
const SCENARIOS: [(i64, i64, i64, i64); 3] = [(1, 1, 2, 0), (1, 1, 1, 13), (2, 6, 8, 0)];

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("ExactInversion");
    group.sample_size(20);

    for (n11, n10, n01, n00) in SCENARIOS {
        let total = n11 + n10 + n01 + n00;
        group.bench_with_input(
            BenchmarkId::new("subjects", total),
            &(n11, n10, n01, n00),
            |b, &(n11, n10, n01, n00)| {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                b.iter(|| {
                    tau_twosided_ci(
                        black_box(n11),
                        black_box(n10),
                        black_box(n01),
                        black_box(n00),
                        0.05,
                        true,
                        100_000,
                        1_000,
                        &mut rng,
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("MonteCarloInversion");
    group.sample_size(10);

    for reps in [100u64, 1_000] {
        group.bench_with_input(BenchmarkId::new("reps", reps), &reps, |b, &reps| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| tau_twosided_ci(1, 1, 1, 13, 0.05, false, 100_000, black_box(reps), &mut rng))
        });
    }

    group.finish();
}

fn bench_hypergeometric(c: &mut Criterion) {
    let mut group = c.benchmark_group("HypergeometricInterval");

    for population in [100u64, 1_000, 10_000] {
        let sample = population / 10;
        group.bench_with_input(
            BenchmarkId::new("population", population),
            &(sample, population),
            |b, &(sample, population)| {
                b.iter(|| {
                    hypergeometric_interval(
                        black_box(sample / 4),
                        sample,
                        population,
                        0.95,
                        Tail::TwoSided,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_exact, bench_monte_carlo, bench_hypergeometric);
criterion_main!(benches);
