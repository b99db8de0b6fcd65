//! Benchmarks for filter design and per-sample throughput
//!
//! Run with: cargo bench -p iir-design --bench filter_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iir_design::prelude::*;

fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("design");

    for order in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("butterworth_lowpass", order),
            &order,
            |b, &order| {
                let mut designer = Butterworth::new();
                b.iter(|| designer.low_pass(black_box(order), 48000.0, 1000.0).unwrap());
            },
        );
        group.bench_with_input(
            BenchmarkId::new("chebyshev1_lowpass", order),
            &order,
            |b, &order| {
                let mut designer = ChebyshevI::new();
                b.iter(|| {
                    designer
                        .low_pass(black_box(order), 48000.0, 1000.0, 0.5)
                        .unwrap()
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("elliptic_lowpass", order),
            &order,
            |b, &order| {
                b.iter(|| {
                    // fresh designer so the prototype cache never hits
                    let mut designer = Elliptic::new();
                    designer
                        .low_pass(black_box(order), 48000.0, 1000.0, 0.5, 1.0)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_samples");

    let block: Vec<f64> = (0..4096).map(|i| (i as f64 * 0.013).sin()).collect();
    group.throughput(Throughput::Elements(block.len() as u64));

    for topology in [Topology::DirectFormI, Topology::DirectFormII] {
        group.bench_with_input(
            BenchmarkId::new("butterworth_order8", format!("{topology:?}")),
            &topology,
            |b, &topology| {
                let mut filter = Butterworth::new()
                    .low_pass_with_topology(8, 48000.0, 1000.0, topology)
                    .unwrap();
                b.iter(|| {
                    let mut acc = 0.0;
                    for &x in &block {
                        acc += filter.filter(black_box(x));
                    }
                    acc
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_design, bench_filtering);
criterion_main!(benches);
