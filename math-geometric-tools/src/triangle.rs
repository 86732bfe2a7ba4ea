//! Per-triangle normals, barycenters and barycentric interpolation
//!
//! The single-triangle functions take corner positions directly. The
//! `compute_*` / `interp_*` functions apply them to every triangle of a mesh
//! in parallel and return one value per triangle, in triangle order.

use crate::parallel::parallel_map_indexed;
use crate::types::{ClosestPoint, Point3, TriangleMesh};
use crate::{EPSILON, GeometryError, Result};

/// Weights of the triangle barycenter
const BARYCENTER_WEIGHTS: [f64; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

/// Normal of the triangle `(v0, v1, v2)`: `(v1 - v0) × (v2 - v0)`
///
/// With `normalize` the result has unit length and zero-area triangles fail
/// with [`GeometryError::DegenerateGeometry`]. Without it the magnitude is
/// twice the triangle area.
pub fn normal(v0: &Point3, v1: &Point3, v2: &Point3, normalize: bool) -> Result<Point3> {
    let e0 = v1.sub(v0);
    let e1 = v2.sub(v0);
    let n = e0.cross(&e1);
    if !normalize {
        return Ok(n);
    }

    // Relative to the edge lengths so the test does not depend on units
    let n2 = n.magnitude_squared();
    if n2 <= EPSILON * e0.magnitude_squared() * e1.magnitude_squared() {
        return Err(GeometryError::DegenerateGeometry(format!(
            "triangle {v0} {v1} {v2} has zero area, normal is undefined"
        )));
    }

    Ok(n.scale(1.0 / n2.sqrt()))
}

/// Arithmetic mean of the three corners
pub fn barycenter(v0: &Point3, v1: &Point3, v2: &Point3) -> Point3 {
    v0.add(v1).add(v2).scale(1.0 / 3.0)
}

/// Barycentric weights `[w0, w1, w2]` of `point` with respect to the triangle
///
/// `point` is projected orthogonally onto the triangle's plane first, so the
/// weights always sum to one. Points outside the triangle get negative
/// weights.
pub fn barycentric_weights(
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    point: &Point3,
) -> Result<[f64; 3]> {
    let e0 = v1.sub(v0);
    let e1 = v2.sub(v0);
    let ep = point.sub(v0);

    let d00 = e0.dot(&e0);
    let d01 = e0.dot(&e1);
    let d11 = e1.dot(&e1);
    let d20 = ep.dot(&e0);
    let d21 = ep.dot(&e1);

    // Gram determinant = |e0 × e1|²
    let denom = d00 * d11 - d01 * d01;
    if d00 * d11 == 0.0 || denom <= EPSILON * d00 * d11 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "triangle {v0} {v1} {v2} has zero area, barycentric weights are undefined"
        )));
    }

    let w1 = (d11 * d20 - d01 * d21) / denom;
    let w2 = (d00 * d21 - d01 * d20) / denom;
    Ok([1.0 - w1 - w2, w1, w2])
}

/// Evaluate the linear field with corner values `(val0, val1, val2)` at `point`
#[allow(clippy::too_many_arguments)]
pub fn barycentric_interp(
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    val0: f64,
    val1: f64,
    val2: f64,
    point: &Point3,
) -> Result<f64> {
    let weights = barycentric_weights(v0, v1, v2, point)?;
    Ok(weighted_sum(weights, [val0, val1, val2]))
}

#[inline]
fn weighted_sum(weights: [f64; 3], values: [f64; 3]) -> f64 {
    weights[0] * values[0] + weights[1] * values[1] + weights[2] * values[2]
}

/// Normal of every triangle of `mesh`
///
/// Fails as a whole if `normalize` is set and any triangle has zero area.
pub fn compute_triangle_normals(mesh: &TriangleMesh, normalize: bool) -> Result<Vec<Point3>> {
    parallel_map_indexed(mesh.num_triangles(), |t| {
        let [v0, v1, v2] = mesh.triangle_points(t);
        normal(&v0, &v1, &v2, normalize)
    })
    .into_iter()
    .collect()
}

/// Barycenter of every triangle of `mesh`
pub fn compute_triangle_barycenters(mesh: &TriangleMesh) -> Vec<Point3> {
    parallel_map_indexed(mesh.num_triangles(), |t| {
        let [v0, v1, v2] = mesh.triangle_points(t);
        barycenter(&v0, &v1, &v2)
    })
}

fn check_vertex_values(mesh: &TriangleMesh, values: &[f64]) -> Result<()> {
    if values.len() != mesh.num_vertices() {
        return Err(GeometryError::InvalidInput(format!(
            "expected one value per vertex ({}), got {}",
            mesh.num_vertices(),
            values.len()
        )));
    }
    Ok(())
}

fn corner_values(mesh: &TriangleMesh, values: &[f64], t: usize) -> [f64; 3] {
    let tri = &mesh.triangles()[t];
    [values[tri.v0], values[tri.v1], values[tri.v2]]
}

/// Per-vertex field sampled at each triangle barycenter
pub fn interp_vertices_values_to_triangles(
    mesh: &TriangleMesh,
    values: &[f64],
) -> Result<Vec<f64>> {
    check_vertex_values(mesh, values)?;

    Ok(parallel_map_indexed(mesh.num_triangles(), |t| {
        weighted_sum(BARYCENTER_WEIGHTS, corner_values(mesh, values, t))
    }))
}

/// Per-vertex field sampled at one caller-given point per triangle
///
/// `points[t]` is projected onto the plane of triangle `t`.
pub fn interp_vertices_values_at(
    mesh: &TriangleMesh,
    values: &[f64],
    points: &[Point3],
) -> Result<Vec<f64>> {
    check_vertex_values(mesh, values)?;
    if points.len() != mesh.num_triangles() {
        return Err(GeometryError::InvalidInput(format!(
            "expected one point per triangle ({}), got {}",
            mesh.num_triangles(),
            points.len()
        )));
    }

    parallel_map_indexed(mesh.num_triangles(), |t| {
        let [v0, v1, v2] = mesh.triangle_points(t);
        let weights = barycentric_weights(&v0, &v1, &v2, &points[t])?;
        Ok(weighted_sum(weights, corner_values(mesh, values, t)))
    })
    .into_iter()
    .collect()
}

/// Per-vertex field sampled at surface points returned by a scene query
pub fn interp_vertices_values_at_closest(
    mesh: &TriangleMesh,
    values: &[f64],
    closest: &[ClosestPoint],
) -> Result<Vec<f64>> {
    check_vertex_values(mesh, values)?;
    if let Some(c) = closest.iter().find(|c| c.triangle >= mesh.num_triangles()) {
        return Err(GeometryError::InvalidInput(format!(
            "closest point refers to triangle {} of a mesh with {} triangles",
            c.triangle,
            mesh.num_triangles()
        )));
    }

    Ok(closest
        .iter()
        .map(|c| weighted_sum(c.barycentric, corner_values(mesh, values, c.triangle)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn unit_triangle() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_normal() {
        let [a, b, c] = unit_triangle();
        assert_eq!(normal(&a, &b, &c, true).unwrap(), Point3::new(0.0, 0.0, 1.0));

        let scaled = normal(&a, &b.scale(2.0), &c.scale(2.0), false).unwrap();
        assert_relative_eq!(scaled.z, 4.0);
    }

    #[test]
    fn test_normal_micro_triangle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1e-6, 0.0, 0.0);
        let c = Point3::new(0.0, 1e-6, 0.0);

        let n = normal(&a, &b, &c, true).unwrap();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-12);

        // Same shape far from the origin
        let offset = Point3::new(1e3, -2e3, 5e2);
        let n = normal(&a.add(&offset), &b.add(&offset), &c.add(&offset), true).unwrap();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_degenerate() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(2.0, 2.0, 2.0);

        assert!(matches!(
            normal(&a, &b, &c, true),
            Err(GeometryError::DegenerateGeometry(_))
        ));
        // Unnormalized normals of degenerate triangles are just zero
        assert_eq!(normal(&a, &b, &c, false).unwrap(), Point3::origin());

        // Repeated corner and a tiny but collinear triangle
        assert!(normal(&a, &a, &c, true).is_err());
        let tiny = Point3::new(1e-9, 1e-9, 1e-9);
        assert!(normal(&a, &tiny, &tiny.scale(2.0), true).is_err());
    }

    #[test]
    fn test_barycenter() {
        let [a, b, c] = unit_triangle();
        let g = barycenter(&a, &b, &c);
        assert_relative_eq!(g.x, 1.0 / 3.0);
        assert_relative_eq!(g.y, 1.0 / 3.0);
    }

    #[test]
    fn test_barycentric_weights_at_corners_and_inside() {
        let [a, b, c] = unit_triangle();

        let w = barycentric_weights(&a, &b, &c, &b).unwrap();
        assert_abs_diff_eq!(w[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-12);

        // Off-plane point is projected onto the plane first
        let w = barycentric_weights(&a, &b, &c, &Point3::new(0.25, 0.5, 3.0)).unwrap();
        assert_abs_diff_eq!(w[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(w[1], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(w[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_barycentric_interp_linear_field() {
        // f(x, y) = 1 + 2x + 3y is reproduced exactly by linear interpolation
        let [a, b, c] = unit_triangle();
        let f = |p: &Point3| 1.0 + 2.0 * p.x + 3.0 * p.y;
        let p = Point3::new(0.2, 0.3, 0.0);

        let value = barycentric_interp(&a, &b, &c, f(&a), f(&b), f(&c), &p).unwrap();
        assert_relative_eq!(value, f(&p), epsilon = 1e-12);

        let g = barycenter(&a, &b, &c);
        let at_centroid = barycentric_interp(&a, &b, &c, 3.0, 6.0, 9.0, &g).unwrap();
        assert_relative_eq!(at_centroid, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh_normals_point_outward_on_sphere() {
        let mesh = testdata::uv_sphere_mesh(1.0, 10);
        let normals = compute_triangle_normals(&mesh, true).unwrap();
        let centers = compute_triangle_barycenters(&mesh);

        assert_eq!(normals.len(), mesh.num_triangles());
        for (n, c) in normals.iter().zip(&centers) {
            assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-9);
            assert!(n.dot(c) > 0.0);
        }
    }

    #[test]
    fn test_mesh_normals_degenerate_fails_atomically() {
        let mesh = TriangleMesh::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [2.0, 0.0, 0.0]],
            &[[0, 1, 2], [0, 1, 3]],
        )
        .unwrap();

        assert!(compute_triangle_normals(&mesh, true).is_err());
        assert_eq!(compute_triangle_normals(&mesh, false).unwrap().len(), 2);
    }

    #[test]
    fn test_interp_to_triangles() {
        let mesh = testdata::unit_square_mesh();
        let values = [0.0, 3.0, 6.0, 3.0];

        let per_triangle = interp_vertices_values_to_triangles(&mesh, &values).unwrap();
        assert_eq!(per_triangle.len(), 2);
        assert_relative_eq!(per_triangle[0], 3.0);
        assert_relative_eq!(per_triangle[1], 3.0);

        assert!(interp_vertices_values_to_triangles(&mesh, &values[..3]).is_err());
    }

    #[test]
    fn test_interp_at_points() {
        let mesh = testdata::unit_square_mesh();
        let values: Vec<f64> = mesh.vertices().iter().map(|p| p.x + 10.0 * p.y).collect();
        let points = [Point3::new(0.9, 0.1, 0.0), Point3::new(0.1, 0.8, 0.0)];

        let sampled = interp_vertices_values_at(&mesh, &values, &points).unwrap();
        assert_relative_eq!(sampled[0], 1.9, epsilon = 1e-12);
        assert_relative_eq!(sampled[1], 8.1, epsilon = 1e-12);

        assert!(interp_vertices_values_at(&mesh, &values, &points[..1]).is_err());
    }

    #[test]
    fn test_interp_at_closest_rejects_foreign_triangles() {
        let mesh = testdata::unit_square_mesh();
        let values = [0.0; 4];
        let stray = ClosestPoint {
            point: Point3::origin(),
            triangle: 7,
            distance_squared: 0.0,
            barycentric: BARYCENTER_WEIGHTS,
        };
        assert!(interp_vertices_values_at_closest(&mesh, &values, &[stray]).is_err());
    }
}
