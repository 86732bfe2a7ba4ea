//! Computational geometry for point clouds and triangulated surfaces in 3D
//!
//! This library fits inscribed spheres to point clouds, projects points
//! radially onto spheres, builds convex hull surfaces with the Quickhull
//! algorithm, and projects points onto arbitrary triangle meshes through a
//! bounding-volume hierarchy. It also provides per-triangle attributes
//! (normals, barycenters, barycentric interpolation) and Cartesian/spherical
//! coordinate conversions.
//!
//! # Example
//! ```
//! use math_geometric_tools::{
//!     Point3, build_scene, compute_inner_sphere, project_to_sphere, project_to_surface,
//!     testdata,
//! };
//!
//! let cylinder = testdata::cylinder_mesh(1.0, 2.0, 20, 4);
//! let scene = build_scene(&cylinder).unwrap();
//!
//! let sphere = compute_inner_sphere(cylinder.vertices()).unwrap();
//! let on_sphere = project_to_sphere(cylinder.vertices(), sphere.center, sphere.radius / 2.0).unwrap();
//! let on_surface: Vec<Point3> = project_to_surface(&scene, &on_sphere).unwrap();
//! assert_eq!(on_surface.len(), cylinder.num_vertices());
//! ```
//!
//! # Hull Example
//! ```
//! use math_geometric_tools::{Point3, compute_convex_hull};
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.1, 0.1, 0.1),
//! ];
//!
//! let hull = compute_convex_hull(&points).unwrap();
//! assert_eq!(hull.mesh.num_triangles(), 4);
//! assert_eq!(hull.indices, vec![0, 1, 2, 3]);
//! ```

mod bvh;
mod config;
mod coords;
mod geometry;
mod parallel;
mod pipeline;
mod quickhull;
mod scene;
mod sphere;
mod triangle;
mod types;

// Make testdata publicly available for tests and benches
pub mod testdata;

pub use bvh::Aabb;
pub use config::GeometryConfig;
pub use coords::{cartesian_to_spherical, spherical_to_cartesian};
pub use geometry::{bounding_box, centroid};
pub use parallel::is_parallel_available;
pub use pipeline::{
    triangle_mesh_by_convex_hull_of_inner_sphere,
    triangle_mesh_by_convex_hull_of_inner_sphere_with_config,
};
pub use quickhull::{compute_convex_hull, compute_convex_hull_with_config};
pub use scene::{
    SurfaceScene, build_scene, build_scene_with_config, project_to_surface, query_closest,
};
pub use sphere::{compute_inner_sphere, project_to_sphere};
pub use triangle::{
    barycenter, barycentric_interp, barycentric_weights, compute_triangle_barycenters,
    compute_triangle_normals, interp_vertices_values_at, interp_vertices_values_at_closest,
    interp_vertices_values_to_triangles, normal,
};
pub use types::{ClosestPoint, HullResult, Point3, Sphere, SphericalCoord, Triangle, TriangleMesh};

/// Error types for geometric operations
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Maximum iterations exceeded")]
    MaxIterationsExceeded,

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Numerical tolerance for floating-point comparisons
/// Used throughout the library for:
/// - Zero-length vector detection before normalization
/// - Zero-area triangle detection
/// - Default base tolerance of [`GeometryConfig`]
pub(crate) const EPSILON: f64 = 1e-10;

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
