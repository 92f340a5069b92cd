//! File tree data structures.
//!
//! The hierarchy is built once from host input and never changes shape.
//! Per-node attributes that do change (coordinates, colors, selection flags)
//! live in parallel vectors indexed by `NodeId`, owned by the chart session.

mod model;
mod node;

pub use model::{NodeView, TreeInput, TreeModel, TreeNode, WeightMode};
pub use node::{NodeId, NodeState};
