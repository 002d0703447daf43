//! Criterion benches for segment tree build and range-aggregate throughput.
//!
//! Input vectors are deterministic across runs (LCG-based) so results are
//! comparable over time. Throughput is reported in elements.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slidewin_core::{SegmentTree, Sum};

/// Deterministic "random" `f64` vector of length `n`, seeded by `seed`.
fn det_vec(n: usize, seed: u64) -> Vec<f64> {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;

    let mut a = seed;
    (0..n)
        .map(|_| {
            a = a.wrapping_mul(A).wrapping_add(C);
            (a >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_tree_build");

    for &k in &[10usize, 16usize, 20usize] {
        let n = 1usize << k;
        group.throughput(Throughput::Elements(n as u64));
        let xs = det_vec(n, 2024);

        group.bench_function(BenchmarkId::new("build", format!("2^{k}")), |b| {
            b.iter(|| {
                let tree = SegmentTree::<Sum>::build(black_box(&xs), false);
                black_box(tree.aggregate_finalized(0, tree.len()));
            });
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_tree_aggregate");

    for &k in &[10usize, 16usize, 20usize] {
        let n = 1usize << k;
        let xs = det_vec(n, 2024);
        let tree = SegmentTree::<Sum>::build(&xs, false);
        group.throughput(Throughput::Elements(1));

        group.bench_function(BenchmarkId::new("random_window", format!("2^{k}")), |b| {
            b.iter(|| {
                black_box(tree.aggregate_finalized(black_box(n / 4), black_box(3 * n / 4)));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_aggregate);
criterion_main!(benches);
