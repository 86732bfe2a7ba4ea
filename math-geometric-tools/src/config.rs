//! Tolerances and tuning parameters

use crate::{EPSILON, GeometryError, Result};
use serde::{Deserialize, Serialize};

/// Tunable parameters shared by the hull, scene and pipeline operations
///
/// Every field falls back to its default when missing from JSON input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Base tolerance, scaled by input magnitude for hull visibility and deduplication
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Iteration cap for hull construction
    #[serde(default = "default_max_hull_iterations")]
    pub max_hull_iterations: usize,
    /// Maximum number of triangles stored in a BVH leaf
    #[serde(default = "default_bvh_leaf_size")]
    pub bvh_leaf_size: usize,
    /// Below this many points, hull point assignment stays sequential
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Fraction of the inscribed radius used when projecting onto the inner sphere
    #[serde(default = "default_inner_sphere_scale")]
    pub inner_sphere_scale: f64,
}

fn default_epsilon() -> f64 {
    EPSILON
}

fn default_max_hull_iterations() -> usize {
    100_000
}

fn default_bvh_leaf_size() -> usize {
    4
}

fn default_parallel_threshold() -> usize {
    100
}

fn default_inner_sphere_scale() -> f64 {
    0.5
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            max_hull_iterations: default_max_hull_iterations(),
            bvh_leaf_size: default_bvh_leaf_size(),
            parallel_threshold: default_parallel_threshold(),
            inner_sphere_scale: default_inner_sphere_scale(),
        }
    }
}

impl GeometryConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(GeometryError::InvalidInput(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if self.max_hull_iterations == 0 {
            return Err(GeometryError::InvalidInput(
                "max_hull_iterations must be at least 1".to_string(),
            ));
        }
        if self.bvh_leaf_size == 0 {
            return Err(GeometryError::InvalidInput(
                "bvh_leaf_size must be at least 1".to_string(),
            ));
        }
        if !(self.inner_sphere_scale > 0.0 && self.inner_sphere_scale <= 1.0) {
            return Err(GeometryError::InvalidInput(format!(
                "inner_sphere_scale must lie in (0, 1], got {}",
                self.inner_sphere_scale
            )));
        }
        Ok(())
    }
}
