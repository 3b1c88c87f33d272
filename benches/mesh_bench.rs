#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use relief::mesh::{plane, HeightParams, Heightmap, Mesh};

fn plane_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plane_subdivision");
    for div in [10_u32, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(div), &div, |b, &div| {
            b.iter(|| {
                black_box(
                    plane::plane(
                        Vec3::new(-1.0, -1.0, 0.0),
                        Vec3::new(1.0, -1.0, 0.0),
                        Vec3::new(1.0, 1.0, 0.0),
                        Vec3::new(-1.0, 1.0, 0.0),
                        black_box(div),
                    )
                    .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn strip_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("heightmap_strips");
    for side in [128_u32, 512, 1024] {
        #[allow(clippy::cast_possible_truncation)]
        let heightmap =
            Heightmap::from_fn(side, side, |i, j| ((i * 7 + j * 3) % 256) as u8)
                .unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(side),
            &heightmap,
            |b, heightmap| {
                b.iter(|| {
                    black_box(
                        Mesh::heightmap_strips(heightmap, HeightParams::default())
                            .unwrap(),
                    )
                });
            },
        );
    }
    group.finish();
}

fn patch_benchmark(c: &mut Criterion) {
    c.bench_function("patch_grid_64", |b| {
        b.iter(|| black_box(Mesh::patch_grid(2048.0, 2048.0, black_box(64)).unwrap()));
    });
}

criterion_group!(benches, plane_benchmark, strip_benchmark, patch_benchmark);
criterion_main!(benches);
