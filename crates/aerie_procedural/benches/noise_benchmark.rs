//! Benchmark for noise and octave synthesis performance.
//!
//! TARGET: one 121x121 height grid (12 octaves) well under 10ms
//!
//! Run with: cargo bench --package aerie_procedural --bench noise_benchmark

use aerie_procedural::{synthesize, GradientNoise, NoiseConfig, NoiseField, WorldSeed};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = GradientNoise::new();

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_million_samples(c: &mut Criterion) {
    let noise = GradientNoise::new();

    let mut group = c.benchmark_group("million_samples");
    group.throughput(Throughput::Elements(1_000_000));
    group.sample_size(10);

    group.bench_function("1M_noise_samples", |b| {
        b.iter(|| {
            for i in 0..1_000_000 {
                let x = f64::from(i % 1000) * 0.1;
                let y = f64::from(i / 1000) * 0.1;
                black_box(noise.sample(x, y));
            }
        });
    });

    group.finish();
}

fn benchmark_height_grid(c: &mut Criterion) {
    let noise = GradientNoise::new();
    let config = NoiseConfig::default();

    let mut group = c.benchmark_group("height_grid");
    group.throughput(Throughput::Elements(121 * 121));

    group.bench_function("121x121_12_octaves", |b| {
        let mut world_x = 0.0f64;
        b.iter(|| {
            world_x += 120.0;
            black_box(synthesize(
                &noise,
                121,
                black_box(world_x),
                0.0,
                WorldSeed::new(42.0),
                &config,
            ))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_million_samples,
    benchmark_height_grid,
);
criterion_main!(benches);
