//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree over the chart's arcs so pointer
//! positions can be mapped to the node beneath them.

mod rtree;

pub use rtree::ArcIndex;
