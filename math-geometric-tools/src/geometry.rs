//! Geometric utility functions

use crate::types::Point3;
use crate::{GeometryError, Result};
use std::collections::HashMap;

/// Arithmetic mean of a non-empty point set
pub fn centroid(points: &[Point3]) -> Result<Point3> {
    if points.is_empty() {
        return Err(GeometryError::InvalidInput(
            "centroid of an empty point set".to_string(),
        ));
    }

    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Point3::new(0.0, 0.0, 0.0), |acc, p| acc.add(p));
    Ok(sum.scale(1.0 / n))
}

/// Axis-aligned bounds `(min, max)` of a non-empty point set
pub fn bounding_box(points: &[Point3]) -> Result<(Point3, Point3)> {
    let first = points.first().ok_or_else(|| {
        GeometryError::InvalidInput("bounding box of an empty point set".to_string())
    })?;

    Ok(points
        .iter()
        .skip(1)
        .fold((*first, *first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

/// Find the extreme points (min/max in each dimension)
pub fn find_extreme_points(points: &[Point3]) -> [usize; 6] {
    let mut extremes = [0usize; 6];

    for (i, p) in points.iter().enumerate() {
        for axis in 0..3 {
            if p.axis(axis) < points[extremes[2 * axis]].axis(axis) {
                extremes[2 * axis] = i;
            }
            if p.axis(axis) > points[extremes[2 * axis + 1]].axis(axis) {
                extremes[2 * axis + 1] = i;
            }
        }
    }

    extremes
}

/// Scale a base tolerance by the magnitude of the input coordinates
///
/// Keeps visibility and duplicate tests meaningful for both millimetre and
/// kilometre scale inputs.
pub fn compute_relative_epsilon(points: &[Point3], base_epsilon: f64) -> f64 {
    let max_coord = points
        .iter()
        .flat_map(|p| [p.x.abs(), p.y.abs(), p.z.abs()])
        .fold(0.0_f64, f64::max);

    base_epsilon * max_coord.max(1.0)
}

/// Collapse points closer than `epsilon` to each other
///
/// Returns the unique points together with the input index each one came
/// from (always the first occurrence).
pub fn deduplicate_vertices(points: &[Point3], epsilon: f64) -> (Vec<Point3>, Vec<usize>) {
    let cell_size = epsilon.max(f64::MIN_POSITIVE);
    let cell_of = |p: &Point3| -> [i64; 3] {
        [
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        ]
    };

    let mut grid: HashMap<[i64; 3], Vec<usize>> = HashMap::with_capacity(points.len());
    let mut unique: Vec<Point3> = Vec::with_capacity(points.len());
    let mut origin = Vec::with_capacity(points.len());
    let eps2 = epsilon * epsilon;

    for (i, p) in points.iter().enumerate() {
        let [cx, cy, cz] = cell_of(p);

        let mut duplicate = false;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = grid.get(&[cx + dx, cy + dy, cz + dz])
                        && bucket
                            .iter()
                            .any(|&u| unique[u].distance_squared(p) <= eps2)
                    {
                        duplicate = true;
                        break 'search;
                    }
                }
            }
        }

        if !duplicate {
            grid.entry([cx, cy, cz]).or_default().push(unique.len());
            unique.push(*p);
            origin.push(i);
        }
    }

    if unique.len() < points.len() {
        log::warn!(
            "Collapsed {} duplicate points (tolerance {:e})",
            points.len() - unique.len(),
            epsilon
        );
    }

    (unique, origin)
}
