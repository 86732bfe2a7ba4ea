//! Benchmark: geometry kernel scaling
//!
//! Tests how the main operations scale with input size:
//! 1. Convex hull construction (points on and inside a sphere)
//! 2. Surface scene construction (BVH over triangles)
//! 3. Closest-point queries, BVH against exhaustive scan
//!
//! Run with:
//!   cargo bench -p math-geometric-tools --bench geometry_scaling
//!
//! For thread scaling of the batched operations:
//!   RAYON_NUM_THREADS=1 cargo bench -p math-geometric-tools --bench geometry_scaling
//!   RAYON_NUM_THREADS=4 cargo bench -p math-geometric-tools --bench geometry_scaling

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use math_geometric_tools::{
    build_scene, compute_convex_hull, project_to_surface, testdata,
    triangle_mesh_by_convex_hull_of_inner_sphere,
};
use std::time::Duration;

/// Benchmark Quickhull on sphere point sets
fn bench_convex_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_hull");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    for &n in &[180, 840, 5100, 20000] {
        group.throughput(Throughput::Elements(n as u64));

        let fibonacci = testdata::fibonacci_sphere_points(n, 1.0);
        group.bench_with_input(BenchmarkId::new("fibonacci", n), &fibonacci, |b, points| {
            b.iter(|| black_box(compute_convex_hull(points).unwrap()));
        });

        // Most points end up strictly inside
        let shell = testdata::random_sphere_points(n, 1.0, 42);
        group.bench_with_input(BenchmarkId::new("random_shell", n), &shell, |b, points| {
            b.iter(|| black_box(compute_convex_hull(points).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the inner-sphere pipeline on cylinder vertices
fn bench_inner_sphere_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner_sphere_pipeline");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    for &resolution in &[20, 60, 120] {
        let points = testdata::cylinder_mesh(1.0, 2.0, resolution, resolution / 5)
            .vertices()
            .to_vec();
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("cylinder", resolution),
            &points,
            |b, points| {
                b.iter(|| black_box(triangle_mesh_by_convex_hull_of_inner_sphere(points).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark BVH construction
fn bench_scene_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_build");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    for &resolution in &[10, 30, 100] {
        let mesh = testdata::uv_sphere_mesh(1.0, resolution);
        group.throughput(Throughput::Elements(mesh.num_triangles() as u64));

        group.bench_with_input(BenchmarkId::new("uv_sphere", resolution), &mesh, |b, mesh| {
            b.iter(|| black_box(build_scene(mesh).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark closest-point queries: BVH against linear scan
fn bench_closest_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_point");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let queries = testdata::random_sphere_points(1000, 0.5, 7);

    for &resolution in &[10, 30, 100] {
        let mesh = testdata::uv_sphere_mesh(1.0, resolution);
        let scene = build_scene(&mesh).unwrap();
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("bvh", mesh.num_triangles()),
            &queries,
            |b, queries| {
                b.iter(|| black_box(project_to_surface(&scene, queries).unwrap()));
            },
        );

        // Linear scan is O(T) per query; keep it to the smaller meshes
        if resolution <= 30 {
            group.bench_with_input(
                BenchmarkId::new("exhaustive", mesh.num_triangles()),
                &queries,
                |b, queries| {
                    b.iter(|| {
                        let closest: Vec<_> = queries
                            .iter()
                            .map(|q| scene.closest_point_exhaustive(q).unwrap())
                            .collect();
                        black_box(closest)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_convex_hull,
    bench_inner_sphere_pipeline,
    bench_scene_build,
    bench_closest_point
);
criterion_main!(benches);
