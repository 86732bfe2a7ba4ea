//! Sample geometry for tests and benchmarks
//!
//! Point clouds on spheres and polyhedra, plus closed triangle meshes
//! (cylinder, UV sphere) laid out the way common mesh toolkits generate them.

use crate::types::{Point3, SphericalCoord, Triangle, TriangleMesh};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Random points near a sphere, reproducible from `seed`
///
/// Directions are uniform on the sphere; each radius varies by ±10%.
pub fn random_sphere_points(n: usize, radius: f64, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|_| {
            let phi = rng.random::<f64>() * 2.0 * PI;
            let theta = (rng.random::<f64>() * 2.0 - 1.0).acos();
            let r = radius * (0.9 + 0.2 * rng.random::<f64>()); // Add some radius variation
            SphericalCoord::new(r, theta, phi).to_cartesian()
        })
        .collect()
}

/// Generate uniformly distributed points on a sphere using Fibonacci lattice
pub fn fibonacci_sphere_points(n: usize, radius: f64) -> Vec<Point3> {
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;

    (0..n)
        .map(|i| {
            let phi = 2.0 * PI * (i as f64) / golden_ratio;
            let theta = ((2 * i + 1) as f64 / n as f64 - 1.0).acos();
            SphericalCoord::new(radius, theta, phi).to_cartesian()
        })
        .collect()
}

/// Generate a cube's vertices
pub fn cube_vertices(size: f64) -> Vec<Point3> {
    let s = size / 2.0;
    vec![
        Point3::new(-s, -s, -s),
        Point3::new(s, -s, -s),
        Point3::new(s, s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
        Point3::new(s, -s, s),
        Point3::new(s, s, s),
        Point3::new(-s, s, s),
    ]
}

/// Cube corners followed by `n_interior` random points strictly inside
pub fn cube_with_interior_points(size: f64, n_interior: usize, seed: u64) -> Vec<Point3> {
    let mut vertices = cube_vertices(size);
    let mut rng = StdRng::seed_from_u64(seed);
    let s = 0.99 * size / 2.0;

    vertices.extend((0..n_interior).map(|_| {
        Point3::new(
            rng.random_range(-s..s),
            rng.random_range(-s..s),
            rng.random_range(-s..s),
        )
    }));

    vertices
}

/// Generate a simple tetrahedron
pub fn tetrahedron_vertices() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, (3.0_f64).sqrt() / 2.0, 0.0),
        Point3::new(0.5, (3.0_f64).sqrt() / 6.0, (2.0 / 3.0_f64).sqrt()),
    ]
}

/// Generate vertices for an icosahedron
pub fn icosahedron_vertices() -> Vec<Point3> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0; // Golden ratio

    vec![
        Point3::new(-1.0, phi, 0.0),
        Point3::new(1.0, phi, 0.0),
        Point3::new(-1.0, -phi, 0.0),
        Point3::new(1.0, -phi, 0.0),
        Point3::new(0.0, -1.0, phi),
        Point3::new(0.0, 1.0, phi),
        Point3::new(0.0, -1.0, -phi),
        Point3::new(0.0, 1.0, -phi),
        Point3::new(phi, 0.0, -1.0),
        Point3::new(phi, 0.0, 1.0),
        Point3::new(-phi, 0.0, -1.0),
        Point3::new(-phi, 0.0, 1.0),
    ]
}

/// Regular octahedron with vertices at ±1 on each axis
pub fn octahedron_vertices() -> Vec<Point3> {
    vec![
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ]
}

/// Two triangles covering the unit square in the z = 0 plane
///
/// Vertices `(0,0,0) (1,0,0) (1,1,0) (0,1,0)`, triangles `[0,1,2]` and `[0,2,3]`.
pub fn unit_square_mesh() -> TriangleMesh {
    TriangleMesh::new_unchecked(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
    )
}

/// Closed cylinder around the z axis, centered at the origin
///
/// Vertex 0 is the top cap center and vertex 1 the bottom one, followed by
/// `split + 1` rings of `resolution` vertices from top to bottom. Triangles
/// are oriented outward.
pub fn cylinder_mesh(radius: f64, height: f64, resolution: usize, split: usize) -> TriangleMesh {
    let resolution = resolution.max(3);
    let split = split.max(1);
    let half = height / 2.0;

    let mut vertices = Vec::with_capacity(2 + (split + 1) * resolution);
    vertices.push(Point3::new(0.0, 0.0, half));
    vertices.push(Point3::new(0.0, 0.0, -half));
    for i in 0..=split {
        let z = half - height * i as f64 / split as f64;
        for j in 0..resolution {
            let (sin, cos) = (2.0 * PI * j as f64 / resolution as f64).sin_cos();
            vertices.push(Point3::new(radius * cos, radius * sin, z));
        }
    }

    let ring = |i: usize, j: usize| 2 + i * resolution + j % resolution;
    let mut triangles = Vec::with_capacity(2 * resolution * (split + 1));

    for j in 0..resolution {
        triangles.push(Triangle::new(0, ring(0, j), ring(0, j + 1)));
    }
    for i in 0..split {
        push_band(&mut triangles, resolution, |j| ring(i, j), |j| ring(i + 1, j));
    }
    for j in 0..resolution {
        triangles.push(Triangle::new(1, ring(split, j + 1), ring(split, j)));
    }

    TriangleMesh::new_unchecked(vertices, triangles)
}

/// UV sphere centered at the origin
///
/// Vertex 0 is the north pole and vertex 1 the south pole, followed by
/// `resolution - 1` latitude rings of `2 * resolution` vertices from north to
/// south. Triangles are oriented outward.
pub fn uv_sphere_mesh(radius: f64, resolution: usize) -> TriangleMesh {
    let resolution = resolution.max(2);
    let per_ring = 2 * resolution;

    let mut vertices = Vec::with_capacity(2 + (resolution - 1) * per_ring);
    vertices.push(Point3::new(0.0, 0.0, radius));
    vertices.push(Point3::new(0.0, 0.0, -radius));
    for i in 1..resolution {
        let theta = PI * i as f64 / resolution as f64;
        for j in 0..per_ring {
            let phi = 2.0 * PI * j as f64 / per_ring as f64;
            vertices.push(SphericalCoord::new(radius, theta, phi).to_cartesian());
        }
    }

    let ring = |i: usize, j: usize| 2 + (i - 1) * per_ring + j % per_ring;
    let last = resolution - 1;
    let mut triangles = Vec::with_capacity(2 * per_ring * last);

    for j in 0..per_ring {
        triangles.push(Triangle::new(0, ring(1, j), ring(1, j + 1)));
    }
    for i in 1..last {
        push_band(&mut triangles, per_ring, |j| ring(i, j), |j| ring(i + 1, j));
    }
    for j in 0..per_ring {
        triangles.push(Triangle::new(1, ring(last, j + 1), ring(last, j)));
    }

    TriangleMesh::new_unchecked(vertices, triangles)
}

/// Two outward triangles per quad between an upper and a lower ring
fn push_band(
    triangles: &mut Vec<Triangle>,
    count: usize,
    upper: impl Fn(usize) -> usize,
    lower: impl Fn(usize) -> usize,
) {
    for j in 0..count {
        triangles.push(Triangle::new(upper(j), lower(j), lower(j + 1)));
        triangles.push(Triangle::new(upper(j), lower(j + 1), upper(j + 1)));
    }
}
