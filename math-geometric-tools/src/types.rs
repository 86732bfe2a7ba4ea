//! Core data types for point clouds and triangle meshes

use crate::{EPSILON, GeometryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 3D point or vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub fn origin() -> Self {
        Self::default()
    }

    /// Create a point from an `[x, y, z]` array
    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Coordinates as an `[x, y, z]` array
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Coordinate along `axis` (0 = x, 1 = y, anything else = z)
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Subtract another point
    pub fn sub(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Add another point
    pub fn add(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Scale by a scalar
    pub fn scale(&self, s: f64) -> Point3 {
        Point3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Component-wise minimum
    pub fn min(&self, other: &Point3) -> Point3 {
        Point3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(&self, other: &Point3) -> Point3 {
        Point3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Squared magnitude
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Compute the magnitude/length
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit length, or `None` when the length is below [`EPSILON`]
    pub fn try_normalize(&self) -> Option<Point3> {
        let mag = self.magnitude();
        if mag > EPSILON {
            Some(self.scale(1.0 / mag))
        } else {
            None
        }
    }

    /// Normalize to unit length
    ///
    /// Fails with [`GeometryError::DegenerateGeometry`] for (near) zero-length vectors.
    pub fn normalize(&self) -> Result<Point3> {
        self.try_normalize().ok_or_else(|| {
            GeometryError::DegenerateGeometry(format!("cannot normalize zero-length vector {self}"))
        })
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point3) -> f64 {
        self.sub(other).magnitude()
    }

    /// Squared distance to another point
    pub fn distance_squared(&self, other: &Point3) -> f64 {
        self.sub(other).magnitude_squared()
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

/// A triangle defined by 3 vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Triangle {
    /// Create a new triangle from three vertex indices
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }

    /// Get vertex indices as an array
    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Check if this triangle contains a vertex index
    pub fn contains(&self, v: usize) -> bool {
        self.v0 == v || self.v1 == v || self.v2 == v
    }
}

impl From<[usize; 3]> for Triangle {
    fn from(a: [usize; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// A triangle surface: vertices plus triangles indexing into them
///
/// Indices are validated on construction. A mesh without triangles is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    vertices: Vec<Point3>,
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create a mesh, checking every triangle index against the vertex count
    pub fn new(vertices: Vec<Point3>, triangles: Vec<Triangle>) -> Result<Self> {
        let n = vertices.len();
        if let Some((t, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.indices().iter().any(|&i| i >= n))
        {
            return Err(GeometryError::InvalidInput(format!(
                "triangle {t} {:?} references a vertex outside 0..{n}",
                tri.indices()
            )));
        }
        Ok(Self { vertices, triangles })
    }

    /// Create a mesh whose indices are valid by construction
    pub(crate) fn new_unchecked(vertices: Vec<Point3>, triangles: Vec<Triangle>) -> Self {
        debug_assert!(
            triangles
                .iter()
                .all(|t| t.indices().iter().all(|&i| i < vertices.len()))
        );
        Self { vertices, triangles }
    }

    /// Create a mesh from raw coordinate and index arrays
    pub fn from_arrays(vertices: &[[f64; 3]], triangles: &[[usize; 3]]) -> Result<Self> {
        Self::new(
            vertices.iter().copied().map(Point3::from).collect(),
            triangles.iter().copied().map(Triangle::from).collect(),
        )
    }

    /// Get the vertices
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Get the triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the number of vertices
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of triangle `t`
    ///
    /// Panics if `t` is out of range.
    pub fn triangle_points(&self, t: usize) -> [Point3; 3] {
        let tri = &self.triangles[t];
        [
            self.vertices[tri.v0],
            self.vertices[tri.v1],
            self.vertices[tri.v2],
        ]
    }

    /// Compute the enclosed volume (meaningful for closed, consistently oriented meshes)
    pub fn volume(&self) -> f64 {
        let mut volume = 0.0;

        for t in 0..self.triangles.len() {
            let [v0, v1, v2] = self.triangle_points(t);

            // Volume of tetrahedron formed by origin and triangle
            volume += v0.dot(&v1.cross(&v2)) / 6.0;
        }

        volume.abs()
    }

    /// Compute the surface area
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;

        for t in 0..self.triangles.len() {
            let [v0, v1, v2] = self.triangle_points(t);
            area += v1.sub(&v0).cross(&v2.sub(&v0)).magnitude() / 2.0;
        }

        area
    }
}

/// A sphere given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3,
    /// Non-negative; zero denotes a point-sphere
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere, rejecting negative or non-finite radii
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeometryError::InvalidInput(format!(
                "sphere radius must be finite and non-negative, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    /// True when `point` lies inside or on the sphere, within `tolerance`
    pub fn contains(&self, point: &Point3, tolerance: f64) -> bool {
        point.distance(&self.center) <= self.radius + tolerance
    }
}

/// A convex hull surface and the input points its vertices came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullResult {
    /// Hull surface; triangles are oriented with outward normals
    pub mesh: TriangleMesh,
    /// `indices[k]` is the input index of hull vertex `k`
    pub indices: Vec<usize>,
}

impl HullResult {
    /// Rebuild the hull surface on another coordinate set indexed like the input
    ///
    /// The hull is usually built on projected points; this swaps in the
    /// original positions while keeping the hull connectivity.
    pub fn with_original_vertices(&self, original: &[Point3]) -> Result<TriangleMesh> {
        let vertices = self
            .indices
            .iter()
            .map(|&i| {
                original.get(i).copied().ok_or_else(|| {
                    GeometryError::InvalidInput(format!(
                        "hull index {i} is outside the {} original points",
                        original.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        TriangleMesh::new(vertices, self.mesh.triangles().to_vec())
    }
}

/// Spherical coordinates: radial distance, polar angle from +z, azimuth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalCoord {
    /// ρ, distance from the origin
    pub rho: f64,
    /// θ, polar angle from the +z axis in [0, π]
    pub theta: f64,
    /// φ, azimuth from +x towards +y in (-π, π]
    pub phi: f64,
}

/// Closest point on a surface for one query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPoint {
    /// Closest position on the surface
    pub point: Point3,
    /// Index of the triangle owning `point`
    pub triangle: usize,
    /// Squared distance from the query to `point`
    pub distance_squared: f64,
    /// Barycentric weights of `point` with respect to the owning triangle
    pub barycentric: [f64; 3],
}

impl ClosestPoint {
    /// Distance from the query to `point`
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}
