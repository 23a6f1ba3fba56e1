//! Benchmark: fill throughput for scalar and gridded histograms.
//!
//! Run: `cargo bench -p hg-hist --bench fill_benchmark`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hg_hist::{BinEdges, FillConfig, Histogram};
use ndarray::{ArrayD, IxDyn};
use std::hint::black_box;

fn make_samples(cells: usize, per_cell: usize) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(&[cells, per_cell]), |ix| {
        ((ix[0] * 7919 + ix[1] * 104_729) % 10_000) as f32 * 1e-3 - 1.0
    })
}

fn bench_fill_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_cells");
    let edges = BinEdges::uniform(0.0, 8.0, 256).unwrap();

    for cells in [1usize, 64, 1024] {
        let samples = make_samples(cells, 1000);
        for (label, config) in
            [("sequential", FillConfig::sequential()), ("parallel", FillConfig::default())]
        {
            group.bench_with_input(BenchmarkId::new(label, cells), &cells, |b, &cells| {
                let mut h = Histogram::new(edges.clone(), &[cells]).with_fill_config(config);
                b.iter(|| {
                    h.fill(black_box(samples.view())).unwrap();
                });
            });
        }
    }
    group.finish();
}

fn bench_bin_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_lookup");
    for n_bins in [8usize, 512, 65_536] {
        let edges = BinEdges::uniform(0.0, 1.0, n_bins).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n_bins), &edges, |b, edges| {
            b.iter(|| {
                let mut acc = 0usize;
                for i in 0..1000 {
                    if let hg_hist::Placement::Bin(k) = edges.place(black_box(i as f32 * 1e-3)) {
                        acc += k;
                    }
                }
                acc
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill_cells, bench_bin_lookup);
criterion_main!(benches);
