//! Benchmarks for RAP model assembly and evaluation
//!
//! Run with: cargo bench -p rapq-rap

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rapq_rap::{RapProblem, encode};

fn problem(types: usize, n_max: u32) -> RapProblem {
    let costs = (0..types).map(|k| 1.0 + k as f64).collect();
    let reliabilities = (0..types).map(|k| 0.5 + 0.4 * (k as f64 / types as f64)).collect();
    RapProblem::new(costs, reliabilities, 0, n_max, 10.0 * types as f64)
}

/// Benchmark binary encoding
fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    for types in &[2, 10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("encode", types), types, |b, &n| {
            b.iter(|| encode(black_box(255), black_box(n)));
        });
    }

    group.finish();
}

/// Benchmark full model assembly
fn bench_build_cqm(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_cqm");

    for types in &[2, 10, 100, 1000] {
        let p = problem(*types, 100);
        group.bench_with_input(BenchmarkId::new("types", types), &p, |b, p| {
            b.iter(|| black_box(p).build_cqm().unwrap());
        });
    }

    group.finish();
}

/// Benchmark energy and feasibility of one sample
fn bench_evaluate(c: &mut Criterion) {
    let p = problem(100, 100);
    let cqm = p.build_cqm().unwrap();
    let counts: Vec<u32> = (0..100).map(|k| k % 3).collect();
    let sample = p.encoding().sample_for(&counts);

    c.bench_function("energy_100_types", |b| {
        b.iter(|| cqm.energy(black_box(&sample)).unwrap());
    });
    c.bench_function("is_feasible_100_types", |b| {
        b.iter(|| cqm.is_feasible(black_box(&sample)).unwrap());
    });
}

criterion_group!(benches, bench_encoding, bench_build_cqm, bench_evaluate);
criterion_main!(benches);
