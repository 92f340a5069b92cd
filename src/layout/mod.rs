//! Layout algorithms for the sunburst.
//!
//! This module computes target arc coordinates for every node. The chart
//! session animates rendered arcs toward these targets whenever they change.

pub mod partition;

pub use partition::{ArcCoords, PartitionConfig, PartitionLayout, PartitionResult};
