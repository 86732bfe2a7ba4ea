//! Quickhull algorithm implementation for 3D convex hulls
//!
//! Based on:
//! - Barber, C.B., Dobkin, D.P., and Huhdanpaa, H.T., "The Quickhull algorithm
//!   for convex hulls," ACM Trans. on Mathematical Software, 22(4):469-483, 1996.
//!
//! Points within the (input-scaled) tolerance of a hull face are treated as
//! inside, so coplanar points that are not needed for convexity never become
//! hull vertices. The result maps every hull vertex back to its input index.
//!
//! Performance notes:
//! - Parallel point assignment and visibility checks for large inputs
//! - Generation-free face deletion (faces are flagged, then compacted)
//! - Pre-allocated scratch buffers reused across iterations
//! - Furthest outside point cached per face

use crate::config::GeometryConfig;
use crate::geometry::{compute_relative_epsilon, deduplicate_vertices, find_extreme_points};
use crate::parallel::{parallel_filter_map_indexed, parallel_map};
use crate::types::{HullResult, Point3, Triangle, TriangleMesh};
use crate::{GeometryError, Result};
use std::collections::HashMap;

/// Rebuild passes allowed for dropping vertices that lie inside flat facets
const MAX_CLEANUP_PASSES: usize = 3;

/// Internal representation of a face during hull construction
#[derive(Debug, Clone)]
struct HullFace {
    vertices: [usize; 3],
    normal: Point3,
    d: f64, // Plane constant: normal.dot(v0), for faster distance computation
    outside_points: Vec<usize>,
    furthest_point: Option<usize>,
    furthest_distance: f64,
    deleted: bool,
}

impl HullFace {
    fn new(v0: usize, v1: usize, v2: usize, points: &[Point3]) -> Self {
        let p0 = &points[v0];
        let cross = points[v1].sub(p0).cross(&points[v2].sub(p0));

        // Sliver faces still need a usable direction; only an exactly zero cross product has none
        let mag = cross.magnitude();
        let normal = if mag > 0.0 {
            cross.scale(1.0 / mag)
        } else {
            cross
        };

        Self {
            vertices: [v0, v1, v2],
            normal,
            d: normal.dot(p0),
            outside_points: Vec::new(),
            furthest_point: None,
            furthest_distance: 0.0,
            deleted: false,
        }
    }

    /// Fast signed distance from point to plane (positive = outside)
    #[inline]
    fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(point) - self.d
    }

    #[inline]
    fn is_visible_from(&self, point: &Point3, epsilon: f64) -> bool {
        self.signed_distance(point) > epsilon
    }

    fn assign_point(&mut self, point_idx: usize, distance: f64) {
        self.outside_points.push(point_idx);
        if distance > self.furthest_distance {
            self.furthest_point = Some(point_idx);
            self.furthest_distance = distance;
        }
    }

    /// Drop a point from the outside set and refresh the furthest-point cache
    fn remove_point(&mut self, point_idx: usize, points: &[Point3]) {
        self.outside_points.retain(|&p| p != point_idx);
        self.furthest_point = None;
        self.furthest_distance = 0.0;

        for &idx in &self.outside_points {
            let distance = self.signed_distance(&points[idx]);
            if distance > self.furthest_distance {
                self.furthest_point = Some(idx);
                self.furthest_distance = distance;
            }
        }
    }

    fn flip(&mut self) {
        self.vertices.swap(1, 2);
        self.normal = self.normal.scale(-1.0);
        self.d = -self.d;
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Edge representation for horizon computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    /// Orientation-independent key for counting shared edges
    #[inline]
    fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }

    /// Create with explicit orientation (don't normalize)
    #[inline]
    fn oriented(v0: usize, v1: usize) -> Self {
        Self { v0, v1 }
    }
}

/// Scratch buffers to avoid allocations in hot loop
struct ScratchBuffers {
    visible_face_indices: Vec<usize>,
    orphaned_points: Vec<usize>,
    new_faces: Vec<HullFace>,
    edge_count: HashMap<Edge, u32>,
    horizon_edges: Vec<Edge>,
}

impl ScratchBuffers {
    fn new() -> Self {
        Self {
            visible_face_indices: Vec::with_capacity(64),
            orphaned_points: Vec::with_capacity(256),
            new_faces: Vec::with_capacity(64),
            edge_count: HashMap::with_capacity(128),
            horizon_edges: Vec::with_capacity(64),
        }
    }

    fn clear(&mut self) {
        self.visible_face_indices.clear();
        self.orphaned_points.clear();
        self.new_faces.clear();
        self.edge_count.clear();
        self.horizon_edges.clear();
    }
}

/// Build the convex hull of `points` with default tolerances
///
/// See [`compute_convex_hull_with_config`].
pub fn compute_convex_hull(points: &[Point3]) -> Result<HullResult> {
    compute_convex_hull_with_config(points, &GeometryConfig::default())
}

/// Build the convex hull of `points` using the Quickhull algorithm
///
/// The returned mesh is closed with outward-oriented triangles. Hull vertices
/// are listed in ascending input order and `indices[k]` is the input index of
/// hull vertex `k`; among duplicate input points the first one is used.
///
/// # Errors
/// - [`GeometryError::InvalidInput`] for an empty or non-finite point set
/// - [`GeometryError::DegenerateGeometry`] when fewer than four distinct,
///   non-coplanar points exist
/// - [`GeometryError::MaxIterationsExceeded`] if the iteration cap is hit
pub fn compute_convex_hull_with_config(
    points: &[Point3],
    config: &GeometryConfig,
) -> Result<HullResult> {
    config.validate()?;

    if points.is_empty() {
        return Err(GeometryError::InvalidInput(
            "convex hull of an empty point set".to_string(),
        ));
    }
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(GeometryError::InvalidInput(format!(
            "non-finite point {p} in hull input"
        )));
    }

    // Scale-aware epsilon for this input
    let relative_eps = compute_relative_epsilon(points, config.epsilon);

    let (mut hull_points, mut origin) = deduplicate_vertices(points, relative_eps);

    if hull_points.len() < 4 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "{} distinct points, a 3D hull needs at least 4",
            hull_points.len()
        )));
    }

    log::debug!(
        "Quickhull: {} input points, {} distinct, tolerance {:e}",
        points.len(),
        hull_points.len(),
        relative_eps
    );

    let hull_faces = quickhull_faces(&hull_points, relative_eps, config)?;
    let (hull_faces, remaining) = remove_flat_vertices(
        hull_faces,
        &mut hull_points,
        &mut origin,
        relative_eps,
        config,
        MAX_CLEANUP_PASSES,
    )?;
    if remaining > 0 {
        log::warn!(
            "{} flat hull vertices remain after {} cleanup passes",
            remaining,
            MAX_CLEANUP_PASSES
        );
    }

    let hull = assemble_hull(&hull_faces, &hull_points, &origin)?;

    log::debug!(
        "Quickhull finished: {} vertices, {} faces",
        hull.mesh.num_vertices(),
        hull.mesh.num_triangles()
    );

    Ok(hull)
}

/// Rebuild from the strictly extreme vertices until no flat vertex is left
///
/// Runs at most `max_passes` rebuilds and returns the final faces with the
/// number of flat vertices still on them.
fn remove_flat_vertices(
    mut hull_faces: Vec<HullFace>,
    hull_points: &mut Vec<Point3>,
    origin: &mut Vec<usize>,
    relative_eps: f64,
    config: &GeometryConfig,
    max_passes: usize,
) -> Result<(Vec<HullFace>, usize)> {
    for _ in 0..max_passes {
        let redundant = redundant_vertices(&hull_faces, hull_points, relative_eps);
        if redundant.is_empty() {
            return Ok((hull_faces, 0));
        }

        let mut keep = vec![false; hull_points.len()];
        for face in &hull_faces {
            for &v in &face.vertices {
                keep[v] = true;
            }
        }
        for &v in &redundant {
            keep[v] = false;
        }

        log::debug!(
            "Removing {} hull vertices lying inside flat facets or edges",
            redundant.len()
        );

        let (kept_points, kept_origin): (Vec<Point3>, Vec<usize>) = hull_points
            .iter()
            .zip(origin.iter())
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|((p, o), _)| (*p, *o))
            .unzip();
        *hull_points = kept_points;
        *origin = kept_origin;

        hull_faces = quickhull_faces(hull_points, relative_eps, config)?;
    }

    let remaining = redundant_vertices(&hull_faces, hull_points, relative_eps).len();
    Ok((hull_faces, remaining))
}

/// Run Quickhull on distinct points and return the surviving faces
fn quickhull_faces(
    unique_points: &[Point3],
    relative_eps: f64,
    config: &GeometryConfig,
) -> Result<Vec<HullFace>> {
    let initial_simplex = find_initial_simplex(unique_points, relative_eps)?;

    // The simplex centroid is strictly inside every later hull
    let interior = initial_simplex
        .iter()
        .fold(Point3::origin(), |acc, &i| acc.add(&unique_points[i]))
        .scale(0.25);

    let mut hull_faces = create_initial_hull(&initial_simplex, unique_points, &interior);

    let unprocessed_points: Vec<usize> = (0..unique_points.len())
        .filter(|i| !initial_simplex.contains(i))
        .collect();

    if unprocessed_points.len() >= config.parallel_threshold {
        assign_points_parallel(&mut hull_faces, unique_points, &unprocessed_points, relative_eps);
    } else {
        assign_points_sequential(&mut hull_faces, unique_points, &unprocessed_points, relative_eps);
    }

    let mut scratch = ScratchBuffers::new();

    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > config.max_hull_iterations {
            log::error!(
                "Max iterations exceeded after {} iterations with {} faces",
                iterations - 1,
                hull_faces.iter().filter(|f| !f.deleted).count()
            );
            return Err(GeometryError::MaxIterationsExceeded);
        }

        // Adaptive compaction: trigger when deleted face ratio exceeds threshold
        let deleted_count = hull_faces.iter().filter(|f| f.deleted).count();
        if deleted_count * 10 > hull_faces.len() * 3 {
            compact_faces(&mut hull_faces);

            log::trace!(
                "Iteration {}: {} faces, {} outside points remaining",
                iterations,
                hull_faces.len(),
                hull_faces
                    .iter()
                    .map(|f| f.outside_points.len())
                    .sum::<usize>()
            );
        }

        // Find face with furthest outside point
        let Some((face_idx, point_idx)) = find_face_with_furthest_point(&hull_faces) else {
            break; // No more outside points
        };

        let point = unique_points[point_idx];

        scratch.clear();

        if hull_faces.len() >= config.parallel_threshold {
            scratch
                .visible_face_indices
                .extend(parallel_filter_map_indexed(&hull_faces, |i, face| {
                    (!face.deleted && face.is_visible_from(&point, relative_eps)).then_some(i)
                }));
        } else {
            for (i, face) in hull_faces.iter().enumerate() {
                if !face.deleted && face.is_visible_from(&point, relative_eps) {
                    scratch.visible_face_indices.push(i);
                }
            }
        }

        if scratch.visible_face_indices.is_empty() {
            // Only reachable through rounding; forget the point and move on
            hull_faces[face_idx].remove_point(point_idx, unique_points);
            continue;
        }

        find_horizon(
            &hull_faces,
            &scratch.visible_face_indices,
            &mut scratch.edge_count,
            &mut scratch.horizon_edges,
        );

        // Collect orphaned points from visible faces
        for &visible_idx in &scratch.visible_face_indices {
            scratch
                .orphaned_points
                .extend(hull_faces[visible_idx].outside_points.iter().copied());
        }
        scratch.orphaned_points.retain(|&p| p != point_idx);

        for &visible_idx in &scratch.visible_face_indices {
            let face = &mut hull_faces[visible_idx];
            face.deleted = true;
            face.outside_points.clear();
        }

        // Create new faces from horizon edges to the new point
        for edge in &scratch.horizon_edges {
            let mut face = HullFace::new(edge.v0, edge.v1, point_idx, unique_points);

            // Normal must point away from the interior
            let to_interior = interior.sub(&unique_points[face.vertices[0]]);
            if face.normal.dot(&to_interior) > 0.0 {
                face.flip();
            }
            scratch.new_faces.push(face);
        }

        // Reassign orphaned points to new faces first, then existing faces
        for &orphan_idx in &scratch.orphaned_points {
            let orphan = &unique_points[orphan_idx];

            let target = scratch
                .new_faces
                .iter_mut()
                .chain(hull_faces.iter_mut().filter(|f| !f.deleted))
                .find(|face| face.is_visible_from(orphan, relative_eps));

            if let Some(face) = target {
                let distance = face.signed_distance(orphan);
                face.assign_point(orphan_idx, distance);
            }
        }

        hull_faces.append(&mut scratch.new_faces);
    }

    compact_faces(&mut hull_faces);

    log::trace!(
        "Quickhull pass: {} points, {} iterations, {} faces",
        unique_points.len(),
        iterations,
        hull_faces.len()
    );

    Ok(hull_faces)
}

/// First visible face for one point, with its distance
fn first_visible_face(
    hull_faces: &[HullFace],
    point: &Point3,
    epsilon: f64,
) -> Option<(usize, f64)> {
    hull_faces.iter().enumerate().find_map(|(face_idx, face)| {
        let distance = face.signed_distance(point);
        (distance > epsilon).then_some((face_idx, distance))
    })
}

/// Assign points to faces, searching visibility in parallel
fn assign_points_parallel(
    hull_faces: &mut [HullFace],
    points: &[Point3],
    unprocessed: &[usize],
    epsilon: f64,
) {
    let faces: &[HullFace] = hull_faces;
    let assignments: Vec<Option<(usize, f64)>> = parallel_map(unprocessed, |&point_idx| {
        first_visible_face(faces, &points[point_idx], epsilon)
    });

    // Sequential: actually assign points (to maintain deterministic order)
    for (&point_idx, assignment) in unprocessed.iter().zip(assignments) {
        if let Some((face_idx, distance)) = assignment {
            hull_faces[face_idx].assign_point(point_idx, distance);
        }
    }
}

/// Assign points to faces sequentially
fn assign_points_sequential(
    hull_faces: &mut [HullFace],
    points: &[Point3],
    unprocessed: &[usize],
    epsilon: f64,
) {
    for &point_idx in unprocessed {
        if let Some((face_idx, distance)) =
            first_visible_face(hull_faces, &points[point_idx], epsilon)
        {
            hull_faces[face_idx].assign_point(point_idx, distance);
        }
    }
}

/// Find the initial simplex (tetrahedron) to start the algorithm
fn find_initial_simplex(points: &[Point3], epsilon: f64) -> Result<[usize; 4]> {
    let extremes = find_extreme_points(points);

    // Find the pair with maximum distance
    let mut max_distance = 0.0;
    let mut v0 = 0;
    let mut v1 = 0;

    for i in 0..6 {
        for j in (i + 1)..6 {
            let dist = points[extremes[i]].distance(&points[extremes[j]]);
            if dist > max_distance {
                max_distance = dist;
                v0 = extremes[i];
                v1 = extremes[j];
            }
        }
    }

    if max_distance < epsilon {
        return Err(GeometryError::DegenerateGeometry(
            "all points coincide".to_string(),
        ));
    }

    // Find the point furthest from the line v0-v1
    let line_dir = points[v1].sub(&points[v0]).scale(1.0 / max_distance);

    let mut max_distance = 0.0;
    let mut v2 = 0;

    for (i, point) in points.iter().enumerate() {
        if i == v0 || i == v1 {
            continue;
        }

        let to_point = point.sub(&points[v0]);
        let rejection = to_point.sub(&line_dir.scale(to_point.dot(&line_dir)));
        let dist = rejection.magnitude();

        if dist > max_distance {
            max_distance = dist;
            v2 = i;
        }
    }

    if max_distance < epsilon {
        return Err(GeometryError::DegenerateGeometry(
            "all points are collinear".to_string(),
        ));
    }

    // Find the point furthest from the plane formed by v0, v1, v2
    let cross = points[v1].sub(&points[v0]).cross(&points[v2].sub(&points[v0]));
    let cross_mag = cross.magnitude();
    if cross_mag == 0.0 {
        return Err(GeometryError::DegenerateGeometry(
            "all points are collinear".to_string(),
        ));
    }
    let normal = cross.scale(1.0 / cross_mag);

    let mut max_distance = 0.0;
    let mut v3 = 0;

    for (i, point) in points.iter().enumerate() {
        if i == v0 || i == v1 || i == v2 {
            continue;
        }

        let dist = normal.dot(&point.sub(&points[v0])).abs();
        if dist > max_distance {
            max_distance = dist;
            v3 = i;
        }
    }

    if max_distance < epsilon {
        return Err(GeometryError::DegenerateGeometry(
            "all points are coplanar".to_string(),
        ));
    }

    Ok([v0, v1, v2, v3])
}

/// Create the initial hull from the simplex
fn create_initial_hull(simplex: &[usize; 4], points: &[Point3], interior: &Point3) -> Vec<HullFace> {
    let [v0, v1, v2, v3] = *simplex;

    let mut faces = vec![
        HullFace::new(v0, v1, v2, points),
        HullFace::new(v0, v2, v3, points),
        HullFace::new(v0, v3, v1, points),
        HullFace::new(v1, v3, v2, points),
    ];

    for face in &mut faces {
        // If normal points inward, flip the face
        if face.normal.dot(&interior.sub(&points[face.vertices[0]])) > 0.0 {
            face.flip();
        }
    }

    faces
}

/// Find the face with the furthest outside point
fn find_face_with_furthest_point(hull_faces: &[HullFace]) -> Option<(usize, usize)> {
    let mut max_distance = 0.0;
    let mut result = None;

    for (face_idx, face) in hull_faces.iter().enumerate() {
        if face.deleted {
            continue;
        }

        if let Some(point_idx) = face.furthest_point
            && face.furthest_distance > max_distance
        {
            max_distance = face.furthest_distance;
            result = Some((face_idx, point_idx));
        }
    }

    result
}

/// Collect the boundary edges of the visible region, oriented as in their visible face
///
/// Edges are emitted in visible-face order so the resulting triangulation is
/// reproducible.
fn find_horizon(
    hull_faces: &[HullFace],
    visible_faces: &[usize],
    edge_count: &mut HashMap<Edge, u32>,
    horizon: &mut Vec<Edge>,
) {
    edge_count.clear();
    horizon.clear();

    for &face_idx in visible_faces {
        for (v0, v1) in hull_faces[face_idx].edges() {
            *edge_count.entry(Edge::new(v0, v1)).or_insert(0) += 1;
        }
    }

    // Edges shared by two visible faces are interior to the visible region
    for &face_idx in visible_faces {
        for (v0, v1) in hull_faces[face_idx].edges() {
            if edge_count.get(&Edge::new(v0, v1)) == Some(&1) {
                horizon.push(Edge::oriented(v0, v1));
            }
        }
    }
}

/// Hull vertices whose incident faces span at most two planes
///
/// Such a vertex sits inside a flat facet (one plane) or in the middle of an
/// edge (two planes) and is not needed for convexity. Corners of the hull
/// always touch three or more planes.
fn redundant_vertices(hull_faces: &[HullFace], points: &[Point3], epsilon: f64) -> Vec<usize> {
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for (face_idx, face) in hull_faces.iter().enumerate() {
        for &v in &face.vertices {
            incident[v].push(face_idx);
        }
    }

    let on_plane = |plane: &HullFace, face: &HullFace| {
        face.vertices
            .iter()
            .all(|&v| plane.signed_distance(&points[v]).abs() <= epsilon)
    };

    incident
        .iter()
        .enumerate()
        .filter(|(_, faces)| !faces.is_empty())
        .filter_map(|(v, faces)| {
            let mut planes: Vec<&HullFace> = Vec::with_capacity(3);
            for &face_idx in faces {
                let face = &hull_faces[face_idx];
                if !planes.iter().any(|plane| on_plane(*plane, face)) {
                    planes.push(face);
                    if planes.len() > 2 {
                        return None;
                    }
                }
            }
            Some(v)
        })
        .collect()
}

/// Remove deleted faces from the vector
fn compact_faces(hull_faces: &mut Vec<HullFace>) {
    hull_faces.retain(|f| !f.deleted);
}

/// Renumber the surviving faces onto a compact vertex list with input indices
fn assemble_hull(
    hull_faces: &[HullFace],
    unique_points: &[Point3],
    origin: &[usize],
) -> Result<HullResult> {
    let mut used: Vec<usize> = hull_faces.iter().flat_map(|f| f.vertices).collect();
    used.sort_unstable();
    used.dedup();

    let mut remap = vec![usize::MAX; unique_points.len()];
    for (k, &u) in used.iter().enumerate() {
        remap[u] = k;
    }

    let vertices = used.iter().map(|&u| unique_points[u]).collect();
    let indices = used.iter().map(|&u| origin[u]).collect();
    let triangles = hull_faces
        .iter()
        .map(|f| Triangle::new(remap[f.vertices[0]], remap[f.vertices[1]], remap[f.vertices[2]]))
        .collect();

    Ok(HullResult {
        mesh: TriangleMesh::new(vertices, triangles)?,
        indices,
    })
}
