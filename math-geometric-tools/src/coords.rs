//! Cartesian ↔ spherical coordinate conversion
//!
//! Convention: ρ = ‖p‖, θ = arccos(z/ρ) is the polar angle from +z and
//! φ = atan2(y, x) is the azimuth. For ρ = 0 the angles are undefined and
//! θ comes out as NaN; callers must guard zero-length inputs.

use crate::parallel::parallel_map;
use crate::types::{Point3, SphericalCoord};

impl SphericalCoord {
    /// Create spherical coordinates
    pub fn new(rho: f64, theta: f64, phi: f64) -> Self {
        Self { rho, theta, phi }
    }

    /// Convert a Cartesian point
    pub fn from_cartesian(p: &Point3) -> Self {
        let rho = p.magnitude();
        // Clamp keeps rounding (|z| slightly above ρ) from producing NaN; 0/0 stays NaN
        let theta = (p.z / rho).clamp(-1.0, 1.0).acos();
        let phi = p.y.atan2(p.x);
        Self { rho, theta, phi }
    }

    /// Convert back to Cartesian coordinates
    pub fn to_cartesian(&self) -> Point3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Point3::new(
            self.rho * sin_theta * cos_phi,
            self.rho * sin_theta * sin_phi,
            self.rho * cos_theta,
        )
    }
}

/// Convert every point to spherical coordinates, in input order
pub fn cartesian_to_spherical(points: &[Point3]) -> Vec<SphericalCoord> {
    parallel_map(points, SphericalCoord::from_cartesian)
}

/// Convert spherical coordinates back to Cartesian points, in input order
pub fn spherical_to_cartesian(coords: &[SphericalCoord]) -> Vec<Point3> {
    parallel_map(coords, SphericalCoord::to_cartesian)
}
