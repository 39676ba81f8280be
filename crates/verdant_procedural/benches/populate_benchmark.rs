//! Benchmark for chunk population.
//!
//! TARGET: 32x32 chunks of shrubs in under 50ms
//!
//! Run with: cargo bench --package verdant_procedural --bench populate_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use verdant_procedural::{shrub_populator, ChunkCoord, ShrubType, VariableAmount, VoxelWorld, WorldSeed};

fn benchmark_single_chunk(c: &mut Criterion) {
    let seed = WorldSeed::new(42);
    let shrubs = shrub_populator();
    let mut world = VoxelWorld::flat(2, 64);

    c.bench_function("single_chunk_population", |b| {
        let chunk = ChunkCoord::new(0, 0);
        b.iter(|| {
            shrubs.populate(&mut world, chunk, &mut seed.chunk_rng(chunk));
            black_box(&world);
        });
    });
}

fn benchmark_chunk_grid(c: &mut Criterion) {
    let seed = WorldSeed::new(42);
    let mut shrubs = shrub_populator();
    shrubs
        .table_mut()
        .add(ShrubType::Fern, 0.5)
        .expect("static weight is valid");
    shrubs.set_count(VariableAmount::range(128, 384));
    let mut world = VoxelWorld::flat(17, 64);

    let mut group = c.benchmark_group("population_grid");
    group.throughput(Throughput::Elements(32 * 32));
    group.sample_size(10);

    group.bench_function("32x32_chunks", |b| {
        b.iter(|| {
            for z in -16..16 {
                for x in -16..16 {
                    let chunk = ChunkCoord::new(x, z);
                    shrubs.populate(&mut world, chunk, &mut seed.chunk_rng(chunk));
                }
            }
            black_box(&world);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_chunk, benchmark_chunk_grid);
criterion_main!(benches);
