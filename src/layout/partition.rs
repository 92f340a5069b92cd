//! Radial partition (sunburst) layout.
//!
//! Assigns each node an angular span `[x, x + dx]` and a band `[y, y + dy]`
//! in the radius-squared domain.
//!
//! # Algorithm
//!
//! 1. **Bottom-up weights:** leaves take the weight function's value,
//!    internal nodes the sum over their children.
//! 2. **Top-down spans:** the root owns the full circle; each node splits its
//!    span among its children in input order, proportional to weight.
//! 3. **Bands:** `[0, R²]` is divided evenly across `max_depth` rings. Working
//!    in radius-squared gives every ring the same area, so outer rings are
//!    not visually compressed. The root's band is empty.

use serde::Serialize;
use std::f64::consts::TAU;

use crate::tree::{NodeId, TreeModel, TreeNode, WeightMode};

/// Layout coordinates of one node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ArcCoords {
    /// Start angle in radians, clockwise from 12 o'clock.
    pub x: f64,
    /// Angular span in radians.
    pub dx: f64,
    /// Inner edge in the radius-squared domain.
    pub y: f64,
    /// Band width in the radius-squared domain.
    pub dy: f64,
}

impl ArcCoords {
    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.x + self.dx
    }

    #[inline]
    pub fn mid_angle(&self) -> f64 {
        self.x + self.dx / 2.0
    }
}

/// Configuration for the partition layout.
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Angular extent given to the root (default: 2π).
    pub angular_extent: f64,
    /// Outer radius of the chart in pixels.
    pub radius: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            angular_extent: TAU,
            radius: 300.0,
        }
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone)]
pub struct PartitionResult {
    /// Coordinates per node, indexed by `NodeId`.
    pub coords: Vec<ArcCoords>,
    /// Accumulated weight per node, indexed by `NodeId`.
    pub weights: Vec<f64>,
    /// Width of one ring in the radius-squared domain.
    pub band: f64,
}

impl PartitionResult {
    #[inline]
    pub fn get(&self, id: NodeId) -> ArcCoords {
        self.coords[id.idx()]
    }
}

/// The partition layout engine.
pub struct PartitionLayout {
    config: PartitionConfig,
}

impl PartitionLayout {
    /// Create a partition layout with the given configuration.
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Full circle of the given outer radius.
    pub fn with_radius(radius: f64) -> Self {
        Self::new(PartitionConfig {
            radius,
            ..PartitionConfig::default()
        })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Lay out the tree using one of the built-in weight modes.
    pub fn compute(&self, tree: &TreeModel, mode: WeightMode) -> PartitionResult {
        self.compute_with(tree, |node| mode.leaf_weight(node))
    }

    /// Lay out the tree using an arbitrary leaf weight function.
    ///
    /// Negative or NaN weights are treated as zero. A zero-weight subtree
    /// receives a zero span.
    pub fn compute_with<F>(&self, tree: &TreeModel, leaf_weight: F) -> PartitionResult
    where
        F: Fn(&TreeNode) -> f64,
    {
        let n = tree.len();
        let mut weights = vec![0.0_f64; n];
        let mut coords = vec![ArcCoords::default(); n];

        // Bottom-up: pre-order reversed visits children before parents.
        for &id in tree.preorder().iter().rev() {
            let children = tree.children(id);
            weights[id.idx()] = if children.is_empty() {
                tree.node(id).map(&leaf_weight).unwrap_or(0.0).max(0.0)
            } else {
                children.iter().map(|c| weights[c.idx()]).sum()
            };
        }

        let max_depth = tree.max_depth();
        let band = if max_depth == 0 {
            0.0
        } else {
            self.config.radius * self.config.radius / max_depth as f64
        };

        let root = tree.root();
        coords[root.idx()] = ArcCoords {
            x: 0.0,
            dx: self.config.angular_extent,
            y: 0.0,
            dy: 0.0,
        };

        // Top-down: a parent is always positioned before its children.
        for &id in tree.preorder() {
            let children = tree.children(id);
            if children.is_empty() {
                continue;
            }
            let parent = coords[id.idx()];
            let weight = weights[id.idx()];
            let scale = if weight > 0.0 { parent.dx / weight } else { 0.0 };

            let mut cursor = parent.x;
            let last = children.len() - 1;
            for (i, &child) in children.iter().enumerate() {
                let depth = tree.depth(child);
                // Close the final span on the parent's end so siblings sum exactly.
                let span = if i == last && scale > 0.0 {
                    (parent.end_angle() - cursor).max(0.0)
                } else {
                    weights[child.idx()] * scale
                };
                coords[child.idx()] = ArcCoords {
                    x: cursor,
                    dx: span,
                    y: (depth - 1) as f64 * band,
                    dy: band,
                };
                cursor += span;
            }
        }

        tracing::debug!(nodes = n, max_depth, band, "partition layout computed");

        PartitionResult {
            coords,
            weights,
            band,
        }
    }
}

impl Default for PartitionLayout {
    fn default() -> Self {
        Self::new(PartitionConfig::default())
    }
}
