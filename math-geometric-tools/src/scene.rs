//! Nearest-point queries against a triangle mesh
//!
//! A [`SurfaceScene`] owns a copy of the target mesh and a BVH over its
//! triangles. Each query returns the exact closest surface point over all
//! triangles together with the owning triangle and its barycentric weights.
//!
//! Construction is O(T log T) and a query is O(log T) expected. The BVH
//! traversal order is fixed, so equidistant triangles always resolve to the
//! same one.

use crate::bvh::{Aabb, Bvh};
use crate::config::GeometryConfig;
use crate::parallel::{parallel_map, parallel_map_indexed};
use crate::triangle::barycenter;
use crate::types::{ClosestPoint, Point3, TriangleMesh};
use crate::{GeometryError, Result};

/// Target mesh preprocessed for repeated closest-point queries
#[derive(Debug, Clone)]
pub struct SurfaceScene {
    mesh: TriangleMesh,
    bvh: Bvh,
}

impl SurfaceScene {
    /// Build a scene with default configuration
    pub fn new(mesh: &TriangleMesh) -> Result<Self> {
        Self::with_config(mesh, &GeometryConfig::default())
    }

    /// Build a scene using `config.bvh_leaf_size` triangles per leaf
    pub fn with_config(mesh: &TriangleMesh, config: &GeometryConfig) -> Result<Self> {
        config.validate()?;

        if let Some(v) = mesh.vertices().iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::InvalidInput(format!(
                "mesh vertex {v} has non-finite coordinates"
            )));
        }

        let bounds = parallel_map_indexed(mesh.num_triangles(), |t| {
            let [a, b, c] = mesh.triangle_points(t);
            Aabb::from_triangle(&a, &b, &c)
        });
        let centroids = parallel_map_indexed(mesh.num_triangles(), |t| {
            let [a, b, c] = mesh.triangle_points(t);
            barycenter(&a, &b, &c)
        });

        let bvh = Bvh::build(&bounds, &centroids, config.bvh_leaf_size);

        log::debug!(
            "Built surface scene: {} vertices, {} triangles, {} BVH nodes",
            mesh.num_vertices(),
            mesh.num_triangles(),
            bvh.num_nodes()
        );

        Ok(Self {
            mesh: mesh.clone(),
            bvh,
        })
    }

    /// The target mesh
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Number of triangles in the target mesh
    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }

    /// Bounding box of all triangles, `None` for an empty scene
    pub fn bounds(&self) -> Option<Aabb> {
        self.bvh.bounds()
    }

    /// Closest surface point to `query`
    pub fn closest_point(&self, query: &Point3) -> Result<ClosestPoint> {
        self.check_query(query)?;

        self.bvh
            .nearest(query, |t| self.triangle_candidate(query, t))
            .map(|(triangle, distance_squared, (point, barycentric))| ClosestPoint {
                point,
                triangle,
                distance_squared,
                barycentric,
            })
            .ok_or_else(|| {
                GeometryError::InvalidInput(format!("no closest point found for {query}"))
            })
    }

    /// Closest surface point to `query` by scanning every triangle
    ///
    /// O(T) per query; [`closest_point`](Self::closest_point) gives the same
    /// distance and is far cheaper on large meshes.
    pub fn closest_point_exhaustive(&self, query: &Point3) -> Result<ClosestPoint> {
        self.check_query(query)?;

        let mut best: Option<ClosestPoint> = None;
        for t in 0..self.num_triangles() {
            let (distance_squared, (point, barycentric)) = self.triangle_candidate(query, t);
            if best.is_none_or(|b| distance_squared < b.distance_squared) {
                best = Some(ClosestPoint {
                    point,
                    triangle: t,
                    distance_squared,
                    barycentric,
                });
            }
        }

        best.ok_or_else(|| {
            GeometryError::InvalidInput(format!("no closest point found for {query}"))
        })
    }

    /// Closest surface point for every query, in input order
    pub fn query_closest(&self, points: &[Point3]) -> Result<Vec<ClosestPoint>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        self.check_not_empty()?;

        parallel_map(points, |p| self.closest_point(p))
            .into_iter()
            .collect()
    }

    /// Closest surface position for every query, in input order
    pub fn project(&self, points: &[Point3]) -> Result<Vec<Point3>> {
        Ok(self
            .query_closest(points)?
            .into_iter()
            .map(|c| c.point)
            .collect())
    }

    fn triangle_candidate(&self, query: &Point3, t: usize) -> (f64, (Point3, [f64; 3])) {
        let [a, b, c] = self.mesh.triangle_points(t);
        let (point, barycentric) = closest_point_on_triangle(query, &a, &b, &c);
        (query.distance_squared(&point), (point, barycentric))
    }

    fn check_not_empty(&self) -> Result<()> {
        if self.mesh.triangles().is_empty() {
            return Err(GeometryError::InvalidInput(
                "surface scene has no triangles".to_string(),
            ));
        }
        Ok(())
    }

    fn check_query(&self, query: &Point3) -> Result<()> {
        self.check_not_empty()?;
        if !query.is_finite() {
            return Err(GeometryError::InvalidInput(format!(
                "query point {query} has non-finite coordinates"
            )));
        }
        Ok(())
    }
}

/// Preprocess `mesh` for nearest-point queries
pub fn build_scene(mesh: &TriangleMesh) -> Result<SurfaceScene> {
    SurfaceScene::new(mesh)
}

/// Preprocess `mesh` for nearest-point queries with explicit configuration
pub fn build_scene_with_config(
    mesh: &TriangleMesh,
    config: &GeometryConfig,
) -> Result<SurfaceScene> {
    SurfaceScene::with_config(mesh, config)
}

/// Closest surface point for every query point, in input order
pub fn query_closest(scene: &SurfaceScene, points: &[Point3]) -> Result<Vec<ClosestPoint>> {
    scene.query_closest(points)
}

/// Project every point onto the nearest point of the scene surface
pub fn project_to_surface(scene: &SurfaceScene, points: &[Point3]) -> Result<Vec<Point3>> {
    scene.project(points)
}

/// Closest point on triangle `(a, b, c)` to `p`, with its barycentric weights
///
/// Classifies `p` against the Voronoi regions of the vertices, edges and
/// face of the triangle. Zero-area triangles are handled as their three
/// edge segments.
fn closest_point_on_triangle(
    p: &Point3,
    a: &Point3,
    b: &Point3,
    c: &Point3,
) -> (Point3, [f64; 3]) {
    let ab = b.sub(a);
    let ac = c.sub(a);

    let area2 = ab.cross(&ac).magnitude_squared();
    if area2 <= f64::EPSILON * ab.magnitude_squared() * ac.magnitude_squared() {
        return closest_point_on_degenerate_triangle(p, a, b, c);
    }

    let ap = p.sub(a);
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (*a, [1.0, 0.0, 0.0]);
    }

    let bp = p.sub(b);
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (*b, [0.0, 1.0, 0.0]);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a.add(&ab.scale(v)), [1.0 - v, v, 0.0]);
    }

    let cp = p.sub(c);
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (*c, [0.0, 0.0, 1.0]);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a.add(&ac.scale(w)), [1.0 - w, 0.0, w]);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b.add(&c.sub(b).scale(w)), [0.0, 1.0 - w, w]);
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a.add(&ab.scale(v)).add(&ac.scale(w)), [1.0 - v - w, v, w])
}

fn closest_point_on_degenerate_triangle(
    p: &Point3,
    a: &Point3,
    b: &Point3,
    c: &Point3,
) -> (Point3, [f64; 3]) {
    let (q_ab, t_ab) = closest_point_on_segment(p, a, b);
    let (q_ac, t_ac) = closest_point_on_segment(p, a, c);
    let (q_bc, t_bc) = closest_point_on_segment(p, b, c);

    let candidates = [
        (q_ab, [1.0 - t_ab, t_ab, 0.0]),
        (q_ac, [1.0 - t_ac, 0.0, t_ac]),
        (q_bc, [0.0, 1.0 - t_bc, t_bc]),
    ];

    let mut best = candidates[0];
    let mut best_d2 = p.distance_squared(&best.0);
    for candidate in &candidates[1..] {
        let d2 = p.distance_squared(&candidate.0);
        if d2 < best_d2 {
            best_d2 = d2;
            best = *candidate;
        }
    }
    best
}

/// Closest point on segment `[a, b]` and its parameter `t` along `a → b`
fn closest_point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> (Point3, f64) {
    let ab = b.sub(a);
    let len2 = ab.magnitude_squared();
    if len2 == 0.0 {
        return (*a, 0.0);
    }
    let t = (p.sub(a).dot(&ab) / len2).clamp(0.0, 1.0);
    (a.add(&ab.scale(t)), t)
}
