//! # Pool Allocator Benchmark
//!
//! Compares pooled slot allocation against one `Box` per object, and
//! measures the release/reuse cycle that should never touch the heap.
//!
//! Run with: `cargo bench --package poolchain`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use poolchain::PoolAllocator;

/// Payload roughly the size of a particle.
#[derive(Clone, Copy, Default)]
struct Particle {
    position: [f32; 3],
    velocity: [f32; 3],
    life: f32,
}

/// Benchmark: fill a pool from empty, including growth.
fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");

    for count in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("pool", count), &count, |b, &count| {
            b.iter(|| {
                let mut pool: PoolAllocator<Particle> = PoolAllocator::with_capacity(1024);
                for _ in 0..count {
                    black_box(pool.allocate());
                }
                pool.capacity()
            });
        });

        group.bench_with_input(BenchmarkId::new("box", count), &count, |b, &count| {
            b.iter(|| {
                let boxes: Vec<Box<Particle>> =
                    (0..count).map(|_| Box::new(Particle::default())).collect();
                black_box(boxes.len())
            });
        });
    }

    group.finish();
}

/// Benchmark: release and refill a warmed-up pool. No block allocations.
fn bench_release_cycle(c: &mut Criterion) {
    let count = 100_000;
    let mut pool: PoolAllocator<Particle> = PoolAllocator::with_capacity(1024);
    for _ in 0..count {
        pool.allocate();
    }

    c.bench_function("release_refill_100k", |b| {
        b.iter(|| {
            pool.release();
            for _ in 0..count {
                if let Some(handle) = pool.allocate() {
                    if let Some(p) = pool.get_mut(handle) {
                        p.life = 1.0;
                        p.velocity[1] = -9.81;
                        black_box(p.position);
                    }
                }
            }
        });
    });
}

criterion_group!(benches, bench_allocate, bench_release_cycle);
criterion_main!(benches);
