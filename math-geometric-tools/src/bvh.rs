//! Bounding-volume hierarchy over triangles
//!
//! A binary tree of axis-aligned boxes built by median splits along the
//! longest axis of the triangle centroids. Construction is O(T log T);
//! nearest queries descend the closer child first and prune every box that is
//! further away than the best candidate found so far, so they return the
//! exact global minimum.

use crate::types::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner coordinates
    pub min: Point3,
    /// Maximum corner coordinates
    pub max: Point3,
}

impl Aabb {
    /// Create a new bounding box
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (invalid) bounding box
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Bounding box of a triangle
    pub fn from_triangle(a: &Point3, b: &Point3, c: &Point3) -> Self {
        Self::new(a.min(b).min(c), a.max(b).max(c))
    }

    /// Expand the bounding box to include a point
    pub fn expand(&mut self, point: &Point3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(&other.min), self.max.max(&other.max))
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Point3 {
        self.min.add(&self.max).scale(0.5)
    }

    /// Get the half-size (extent) of the bounding box
    pub fn half_size(&self) -> Point3 {
        self.max.sub(&self.min).scale(0.5)
    }

    /// Axis (0 = x, 1 = y, 2 = z) along which the box is longest
    pub fn longest_axis(&self) -> usize {
        let size = self.max.sub(&self.min);
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Check if a point is inside the bounding box
    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|i| point.axis(i) >= self.min.axis(i) && point.axis(i) <= self.max.axis(i))
    }

    /// Squared distance from a point to the box (zero inside)
    pub fn distance_squared(&self, point: &Point3) -> f64 {
        (0..3)
            .map(|i| {
                let p = point.axis(i);
                let d = (self.min.axis(i) - p).max(p - self.max.axis(i)).max(0.0);
                d * d
            })
            .sum()
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    /// Range `start..start + count` of `Bvh::order`
    Leaf { start: usize, count: usize },
    Interior { left: usize, right: usize },
}

#[derive(Debug, Clone)]
struct BvhNode {
    bounds: Aabb,
    kind: NodeKind,
}

/// Triangle BVH; node 0 is the root
#[derive(Debug, Clone, Default)]
pub(crate) struct Bvh {
    nodes: Vec<BvhNode>,
    /// Triangle indices, grouped so every leaf owns a contiguous range
    order: Vec<usize>,
}

impl Bvh {
    /// Build from per-triangle bounds and centroids
    pub(crate) fn build(bounds: &[Aabb], centroids: &[Point3], max_leaf_size: usize) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * bounds.len() / max_leaf_size.max(1) + 1),
            order: (0..bounds.len()).collect(),
        };

        if !bounds.is_empty() {
            bvh.build_node(bounds, centroids, 0, bounds.len(), max_leaf_size.max(1));
        }

        bvh
    }

    fn build_node(
        &mut self,
        bounds: &[Aabb],
        centroids: &[Point3],
        start: usize,
        end: usize,
        max_leaf_size: usize,
    ) -> usize {
        let node_bounds = self.order[start..end]
            .iter()
            .fold(Aabb::empty(), |acc, &t| acc.union(&bounds[t]));

        let node_idx = self.nodes.len();
        let count = end - start;

        if count <= max_leaf_size {
            self.nodes.push(BvhNode {
                bounds: node_bounds,
                kind: NodeKind::Leaf { start, count },
            });
            return node_idx;
        }

        let mut centroid_bounds = Aabb::empty();
        for &t in &self.order[start..end] {
            centroid_bounds.expand(&centroids[t]);
        }
        let axis = centroid_bounds.longest_axis();

        // Median split keeps the tree balanced even when centroids coincide
        let half = count / 2;
        self.order[start..end].select_nth_unstable_by(half, |&a, &b| {
            centroids[a].axis(axis).total_cmp(&centroids[b].axis(axis))
        });

        // Children are filled in once both subtrees exist
        self.nodes.push(BvhNode {
            bounds: node_bounds,
            kind: NodeKind::Leaf { start, count },
        });
        let left = self.build_node(bounds, centroids, start, start + half, max_leaf_size);
        let right = self.build_node(bounds, centroids, start + half, end, max_leaf_size);
        self.nodes[node_idx].kind = NodeKind::Interior { left, right };

        node_idx
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| n.bounds)
    }

    /// Exact nearest triangle to `query`
    ///
    /// `eval(t)` returns the squared distance from `query` to triangle `t`
    /// plus any payload to keep for the winner. Ties keep the triangle found
    /// first in the fixed traversal order.
    pub(crate) fn nearest<T, F>(&self, query: &Point3, eval: F) -> Option<(usize, f64, T)>
    where
        F: Fn(usize) -> (f64, T),
    {
        let mut best: Option<(usize, f64, T)> = None;
        let mut best_d2 = f64::INFINITY;

        if self.nodes.is_empty() {
            return None;
        }

        let mut stack = Vec::with_capacity(64);
        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if node.bounds.distance_squared(query) > best_d2 {
                continue;
            }

            match node.kind {
                NodeKind::Leaf { start, count } => {
                    for &t in &self.order[start..start + count] {
                        let (d2, payload) = eval(t);
                        if d2 < best_d2 {
                            best_d2 = d2;
                            best = Some((t, d2, payload));
                        }
                    }
                }
                NodeKind::Interior { left, right } => {
                    let dl = self.nodes[left].bounds.distance_squared(query);
                    let dr = self.nodes[right].bounds.distance_squared(query);

                    // Push the farther child first so the nearer one is visited next
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        best
    }
}
