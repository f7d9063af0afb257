//! Benchmarks for cotangent smoothing.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cotsmooth::mesh::{RingTable, VertexId};
use cotsmooth::prelude::*;
use nalgebra::Point3;

/// Wavy grid so every interior vertex has a nonzero Laplacian.
fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            let z = 0.1 * ((i as f64) * 0.7).sin() * ((j as f64) * 1.3).cos();
            vertices.push(Point3::new(i as f64, j as f64, z));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_smooth_modes(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let snapshot = PositionSnapshot::from_mesh(&mesh);

    let mut group = c.benchmark_group("smooth_grid_100x100_x10");
    for mode in [SmoothMode::Laplace, SmoothMode::Taubin] {
        for parallel in [true, false] {
            let options = SmoothOptions::default()
                .with_mode(mode)
                .with_iterations(10)
                .with_parallel(parallel);
            let label = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(format!("{:?}", mode), label), &options, |b, options| {
                b.iter(|| smooth(&mesh, &snapshot, options).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_ring_table(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("ring_table_from_mesh", |b| {
        b.iter(|| RingTable::from_neighborhood(&mesh));
    });

    let table = RingTable::from_neighborhood(&mesh);
    let positions = mesh.positions();
    let slots: Vec<Option<Point3<f64>>> = positions.iter().copied().map(Some).collect();

    c.bench_function("laplacian_all_vertices", |b| {
        b.iter(|| {
            (0..table.len())
                .filter_map(|i| {
                    let v = VertexId::new(i);
                    cotsmooth::algo::smooth::laplacian(table.ring(v), &slots, &positions[i])
                })
                .count()
        });
    });
}

criterion_group!(benches, bench_smooth_modes, bench_ring_table);
criterion_main!(benches);
