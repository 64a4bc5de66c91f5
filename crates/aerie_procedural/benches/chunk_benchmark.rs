//! Benchmark for chunk generation performance.
//!
//! TARGET: one default 121x121 chunk, both meshes, in under 20ms
//!
//! Run with: cargo bench --package aerie_procedural --bench chunk_benchmark

use aerie_procedural::{
    filter_islands, mesh_height_grid, prune_low_triangles, ChunkCoord, ChunkGenerator,
    HeightGrid, TerrainConfig, WorldSeed,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_single_chunk(c: &mut Criterion) {
    let Ok(gen) = ChunkGenerator::new(WorldSeed::new(42.0), TerrainConfig::default()) else {
        return;
    };

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate(ChunkCoord::new(coord, coord / 2)))
        });
    });
}

fn benchmark_chunk_grid(c: &mut Criterion) {
    let config = TerrainConfig::default().with_chunk_size(33);
    let Ok(gen) = ChunkGenerator::new(WorldSeed::new(42.0), config) else {
        return;
    };

    let mut group = c.benchmark_group("chunk_grid");
    group.sample_size(10);

    // 8x8 chunks of 33 samples
    group.throughput(Throughput::Elements(8 * 8));
    group.bench_function("8x8_chunks_33", |b| {
        b.iter(|| {
            for y in 0..8 {
                for x in 0..8 {
                    black_box(gen.generate(ChunkCoord::new(x, y)));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_island_filter(c: &mut Criterion) {
    // Checkerboard-ish bumps give many small components.
    let grid = HeightGrid::from_fn(121, |x, y| if (x / 3 + y / 3) % 2 == 0 { 1.0 } else { 0.0 });
    let Ok(mesh) = mesh_height_grid(&grid, 1) else {
        return;
    };
    let pruned = prune_low_triangles(&mesh, 0.4);

    c.bench_function("island_filter_fragmented_121", |b| {
        b.iter(|| black_box(filter_islands(black_box(&pruned.mesh), 32)));
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_chunk_grid,
    benchmark_island_filter,
);
criterion_main!(benches);
