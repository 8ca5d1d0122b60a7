use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rusty_data_profiler::profile::{ProfileOptions, Profiler};
use rusty_data_profiler::types::{ArrayView, FeatureDescriptor};

fn generated(rows: usize, cols: usize) -> Vec<f64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..rows * cols)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            if i % 1009 == 0 {
                f64::NAN
            } else {
                (state % 1_000_000) as f64 / 1_000.0
            }
        })
        .collect()
}

fn bench_profile(c: &mut Criterion) {
    let cols = 16;
    let names: Vec<String> = (0..cols).map(|i| format!("f{i}")).collect();
    let descriptors = FeatureDescriptor::numeric(&names);
    let profiler = Profiler::new(ProfileOptions::default()).expect("profiler");

    let mut group = c.benchmark_group("profile");
    for rows in [1_000usize, 50_000] {
        let data = generated(rows, cols);
        group.throughput(Throughput::Elements((rows * cols) as u64));

        let row_major = ArrayView::row_major(&data, rows, cols).expect("view");
        group.bench_with_input(BenchmarkId::new("row_major", rows), &row_major, |b, view| {
            b.iter(|| profiler.profile(black_box(view), &descriptors, Some(20)).expect("profile"))
        });

        let column_major = ArrayView::column_major(&data, rows, cols).expect("view");
        group.bench_with_input(BenchmarkId::new("column_major", rows), &column_major, |b, view| {
            b.iter(|| profiler.profile(black_box(view), &descriptors, Some(20)).expect("profile"))
        });

        group.bench_with_input(BenchmarkId::new("statistics_only", rows), &row_major, |b, view| {
            b.iter(|| profiler.compute_statistics(black_box(view), &descriptors).expect("stats"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_profile);
criterion_main!(benches);
