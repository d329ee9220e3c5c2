//! Benchmarks comparing the decimation methods on a curved grid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use facecrate_core::{IndexedMesh, OperationControl, Point3f};
use facecrate_simplification::{DecimationMethod, Decimator, EdgeDecimator};

fn generate_grid_mesh(size: usize) -> IndexedMesh {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(
                x as f32,
                y as f32,
                (fx.sin() * fy.sin()) * 2.0,
            ));
        }
    }
    let mut faces = Vec::with_capacity((size - 1) * (size - 1) * 2);
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push([tl, bl, tr]);
            faces.push([tr, bl, br]);
        }
    }
    IndexedMesh::from_vertices_and_faces(vertices, faces)
}

fn bench_decimation(c: &mut Criterion) {
    let sizes = [10, 20, 40];
    let fractions = [0.3, 0.5, 0.7];
    let methods = [
        DecimationMethod::QuadricEdgeCollapse,
        DecimationMethod::VertexClustering { cell_size: None },
        DecimationMethod::Random { seed: 1 },
    ];

    let decimator = Decimator::default();
    let mut group = c.benchmark_group("decimation");

    for &size in &sizes {
        let mesh = generate_grid_mesh(size);
        let face_count = mesh.face_count();

        for &fraction in &fractions {
            for method in methods {
                group.bench_with_input(
                    BenchmarkId::new(
                        method.name(),
                        format!("{}f_r{}", face_count, (fraction * 100.0) as u32),
                    ),
                    &(&mesh, fraction),
                    |b, &(mesh, fraction)| {
                        b.iter(|| {
                            let result = decimator
                                .decimate(black_box(mesh), fraction, method, &OperationControl::new())
                                .unwrap();
                            black_box(result);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

fn bench_single_edge(c: &mut Criterion) {
    let mesh = generate_grid_mesh(40);
    let decimator = EdgeDecimator::new();
    let (v1, v2) = (mesh.faces[0][0], mesh.faces[0][1]);

    c.bench_function("collapse_edge_3042f", |b| {
        b.iter(|| {
            let result = decimator.collapse_edge(black_box(&mesh), v1, v2).unwrap();
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_decimation, bench_single_edge);
criterion_main!(benches);
