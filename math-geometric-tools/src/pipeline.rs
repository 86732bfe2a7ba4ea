//! Convex hull surface of a point cloud built through its inscribed sphere
//!
//! The points are snapped radially onto a sphere inside the cloud and the
//! hull is built on the snapped positions. Every input point then lies on the
//! hull, so the resulting triangulation connects all directions seen from the
//! center, even for non-convex clouds. The index map of the returned
//! [`HullResult`] refers to the input points, so callers can rebuild the
//! surface on the original coordinates with
//! [`HullResult::with_original_vertices`].

use crate::config::GeometryConfig;
use crate::quickhull::compute_convex_hull_with_config;
use crate::sphere::{compute_inner_sphere, project_to_sphere};
use crate::types::{HullResult, Point3};
use crate::{GeometryError, Result};

/// Triangulate `points` through the convex hull of their inner-sphere projection
pub fn triangle_mesh_by_convex_hull_of_inner_sphere(points: &[Point3]) -> Result<HullResult> {
    triangle_mesh_by_convex_hull_of_inner_sphere_with_config(points, &GeometryConfig::default())
}

/// Triangulate `points` through the convex hull of their inner-sphere projection
///
/// The projection radius is `config.inner_sphere_scale` times the inscribed
/// radius.
///
/// # Errors
/// - [`GeometryError::InvalidInput`] for an empty point set or invalid config
/// - [`GeometryError::DegenerateGeometry`] when a point coincides with the
///   centroid (zero inscribed radius) or the projected points have no 3D hull
pub fn triangle_mesh_by_convex_hull_of_inner_sphere_with_config(
    points: &[Point3],
    config: &GeometryConfig,
) -> Result<HullResult> {
    config.validate()?;

    let sphere = compute_inner_sphere(points)?;
    if sphere.radius <= 0.0 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "a point coincides with the centroid {}",
            sphere.center
        )));
    }

    let radius = sphere.radius * config.inner_sphere_scale;
    let on_sphere = project_to_sphere(points, sphere.center, radius)?;

    log::debug!(
        "Projected {} points onto sphere of radius {:.6} around {}",
        points.len(),
        radius,
        sphere.center
    );

    compute_convex_hull_with_config(&on_sphere, config)
}
