//! Criterion benchmarks for u-evosearch engines.
//!
//! Uses the bundled problems (OneMax, random TSP) to measure engine
//! overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use u_evosearch::evo::{EaConfig, GeneticAlgorithm, NegativeCostFitness, Selection};
use u_evosearch::operators::bits::UniformCrossover;
use u_evosearch::problems::{NearestNeighborHeuristic, OneMax, TspMatrix};
use u_evosearch::ss::{AcceptanceBandSampling, ValueBiasedStochasticSampling};

fn bench_ga_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_onemax");
    group.sample_size(10);

    for (bits, pop, gen) in [(64usize, 50usize, 50usize), (256, 100, 30), (1024, 100, 20)] {
        group.bench_with_input(
            BenchmarkId::new(format!("b{}_p{}_g{}", bits, pop, gen), bits),
            &(bits, pop, gen),
            |b, &(bits, pop, gen)| {
                b.iter(|| {
                    let config = EaConfig::default()
                        .with_population_size(pop)
                        .with_elite_count(1)
                        .with_seed(42);
                    let mut ga = GeneticAlgorithm::new(
                        config,
                        bits,
                        1.0 / bits as f64,
                        NegativeCostFitness::new(OneMax),
                        Selection::Tournament(3),
                        UniformCrossover::default(),
                    )
                    .unwrap();
                    black_box(ga.run(black_box(gen)))
                })
            },
        );
    }
    group.finish();
}

fn bench_vbss_tsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("vbss_tsp");
    group.sample_size(10);

    for &n in &[20, 50, 100] {
        let tsp = Arc::new(TspMatrix::random(n, 1000, true, false, 42).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(n), &tsp, |b, tsp| {
            b.iter(|| {
                let heuristic = NearestNeighborHeuristic::new(Arc::clone(tsp));
                let mut vbss = ValueBiasedStochasticSampling::new(heuristic).with_seed(42);
                black_box(vbss.optimize_samples(black_box(10)))
            })
        });
    }
    group.finish();
}

fn bench_acceptance_band_tsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("acceptance_band_tsp");
    group.sample_size(10);

    for &n in &[20, 50, 100] {
        let tsp = Arc::new(TspMatrix::random(n, 1000, true, false, 42).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(n), &tsp, |b, tsp| {
            b.iter(|| {
                let heuristic = NearestNeighborHeuristic::new(Arc::clone(tsp));
                let mut band = AcceptanceBandSampling::new(heuristic).with_seed(42);
                black_box(band.optimize_samples(black_box(10)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ga_onemax, bench_vbss_tsp, bench_acceptance_band_tsp);
criterion_main!(benches);
