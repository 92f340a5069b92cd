//! R-tree based hit testing for rendered arcs, using the rstar crate.
//!
//! Arcs are indexed in polar space: each sector is an axis-aligned box
//! `[start_angle, end_angle] × [inner_radius, outer_radius]`. A pointer
//! position is converted to (angle, radius) and looked up in O(log n).

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject};

use crate::geometry::{ArcShape, cartesian_to_polar};
use crate::tree::NodeId;

/// A sector in the spatial index with its node ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcEntry {
    /// The node identifier.
    pub id: NodeId,
    /// The indexed shape.
    pub shape: ArcShape,
}

impl ArcEntry {
    /// Create a new ArcEntry.
    pub fn new(id: NodeId, shape: ArcShape) -> Self {
        Self { id, shape }
    }
}

impl RTreeObject for ArcEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.shape.start_angle, self.shape.inner_radius],
            [self.shape.end_angle, self.shape.outer_radius],
        )
    }
}

impl PointDistance for ArcEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope().distance_2(point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.shape.contains(point[0], point[1])
    }
}

/// Spatial index over the arcs currently on screen.
pub struct ArcIndex {
    tree: RTree<ArcEntry>,
}

impl ArcIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Rebuild the index from (id, shape) pairs.
    ///
    /// Zero-span arcs cannot be hit and are skipped.
    pub fn rebuild<I>(&mut self, arcs: I)
    where
        I: IntoIterator<Item = (NodeId, ArcShape)>,
    {
        let entries: Vec<_> = arcs
            .into_iter()
            .filter(|(_, shape)| shape.span() > 0.0 && shape.outer_radius > shape.inner_radius)
            .map(|(id, shape)| ArcEntry::new(id, shape))
            .collect();

        self.tree = RTree::bulk_load(entries);
    }

    /// Find the arc under a screen point relative to the chart center.
    ///
    /// Points on a shared edge resolve to the lowest id for determinism.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let (angle, radius) = cartesian_to_polar(x, y);
        self.tree
            .locate_all_at_point(&[angle, radius])
            .map(|entry| entry.id)
            .min()
    }

    /// Get the number of arcs in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for ArcIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quadrants() -> ArcIndex {
        let mut index = ArcIndex::new();
        index.rebuild([
            (NodeId(1), ArcShape::new(0.0, FRAC_PI_2, 0.0, 10.0)),
            (NodeId(2), ArcShape::new(FRAC_PI_2, PI, 0.0, 10.0)),
            (NodeId(3), ArcShape::new(0.0, PI, 10.0, 20.0)),
        ]);
        index
    }

    #[test]
    fn test_node_at() {
        let index = quadrants();
        assert_eq!(index.len(), 3);

        // Upper right quadrant, inner ring.
        assert_eq!(index.node_at(3.0, -3.0), Some(NodeId(1)));
        // Lower right quadrant, inner ring.
        assert_eq!(index.node_at(3.0, 3.0), Some(NodeId(2)));
        // Right side, outer ring.
        assert_eq!(index.node_at(15.0, 0.5), Some(NodeId(3)));
    }

    #[test]
    fn test_node_at_misses() {
        let index = quadrants();
        // Left half is empty.
        assert_eq!(index.node_at(-5.0, 0.0), None);
        // Beyond the outer ring.
        assert_eq!(index.node_at(25.0, 0.0), None);
    }

    #[test]
    fn test_zero_span_arcs_skipped() {
        let mut index = ArcIndex::new();
        index.rebuild([
            (NodeId(1), ArcShape::new(1.0, 1.0, 0.0, 10.0)),
            (NodeId(2), ArcShape::new(0.0, 1.0, 5.0, 5.0)),
        ]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_previous_arcs() {
        let mut index = quadrants();
        index.rebuild([(NodeId(7), ArcShape::new(PI, 1.5 * PI, 0.0, 10.0))]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.node_at(3.0, -3.0), None);
        assert_eq!(index.node_at(-3.0, 3.0), Some(NodeId(7)));
    }
}
