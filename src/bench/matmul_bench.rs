//! Criterion benchmarks: serial kernel vs. the threaded engine at several
//! worker counts, plus the strided reference for scale.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use matmul_sync::kernels::transposed_dot::multiply_serial;
use matmul_sync::matrix::layout::prepare;
use matmul_sync::matrix::naive_ijk::multiply_naive;
use matmul_sync::threaded::multiplier::SyncMultiplier;
use std::hint::black_box;

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    group.sample_size(10);

    for size in [128usize, 256, 512] {
        let mut ops = prepare(size);

        group.bench_with_input(BenchmarkId::new("naive_ijk", size), &size, |bench, _| {
            bench.iter(|| black_box(multiply_naive(&ops.a, &ops.b).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("transposed_serial", size), &size, |bench, _| {
            bench.iter(|| multiply_serial(&ops.a, &ops.b_t, black_box(&mut ops.c)))
        });

        for threads in [1usize, 2, 4, 8] {
            let engine = SyncMultiplier::for_dim(size, threads).unwrap();
            let id = BenchmarkId::new(format!("sync_{}t", threads), size);
            group.bench_with_input(id, &size, |bench, _| {
                bench.iter(|| {
                    engine
                        .run(&ops.a, &ops.b_t, black_box(&mut ops.c))
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
