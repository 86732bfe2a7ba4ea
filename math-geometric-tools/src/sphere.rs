//! Inscribed sphere fitting and radial projection onto spheres

use crate::geometry::{centroid, compute_relative_epsilon};
use crate::parallel::parallel_map;
use crate::types::{Point3, Sphere};
use crate::{EPSILON, GeometryError, Result};

/// Largest sphere centered at the centroid that contains no input point in its interior
///
/// The center is the arithmetic mean of `points`; the radius is the distance
/// from it to the nearest input point. All points coinciding gives radius 0.
pub fn compute_inner_sphere(points: &[Point3]) -> Result<Sphere> {
    let center = centroid(points)?;

    let nearest = points
        .iter()
        .map(|p| p.distance(&center))
        .fold(f64::INFINITY, f64::min);

    // Rounding in the centroid leaves coincident points a hair away from it
    let radius = if nearest <= compute_relative_epsilon(points, EPSILON) {
        0.0
    } else {
        nearest
    };

    log::debug!(
        "Inner sphere of {} points: center {}, radius {:.6}",
        points.len(),
        center,
        radius
    );

    Sphere::new(center, radius)
}

/// Project every point radially onto the sphere `(center, radius)`
///
/// Each output point is `center + radius * normalize(p - center)`, in input
/// order. Fails with [`GeometryError::DegenerateGeometry`] if any point
/// coincides with `center`.
pub fn project_to_sphere(points: &[Point3], center: Point3, radius: f64) -> Result<Vec<Point3>> {
    let sphere = Sphere::new(center, radius)?;

    parallel_map(points, |p| sphere.project(p))
        .into_iter()
        .collect()
}

impl Sphere {
    /// Radial projection of a single point onto this sphere
    pub fn project(&self, point: &Point3) -> Result<Point3> {
        let offset = point.sub(&self.center);
        let length = offset.magnitude();

        // Coincident relative to the magnitude of the two positions
        if length <= EPSILON * point.magnitude().max(self.center.magnitude()) {
            return Err(GeometryError::DegenerateGeometry(format!(
                "point {point} coincides with the projection center"
            )));
        }

        Ok(self.center.add(&offset.scale(self.radius / length)))
    }
}
