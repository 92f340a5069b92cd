//! Title/subtitle text shown in the middle of the chart.

use serde::Serialize;

use super::Selection;
use crate::tree::{NodeId, TreeModel};

/// Title used whenever a search does not resolve to exactly one node.
pub const MULTIPLE_FOUND: &str = "Multiple found";

/// What the center caption should show. Byte counts are raw; the host
/// formats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub title: String,
    pub bytes: u64,
    /// Whether `bytes` is an aggregate over several nodes.
    pub total: bool,
}

impl Caption {
    /// A single node's name and size.
    pub fn for_node(tree: &TreeModel, id: NodeId) -> Self {
        Self {
            title: tree.name(id).to_string(),
            bytes: tree.size(id),
            total: false,
        }
    }

    /// Caption for a search result. Zero matches read as an empty total.
    pub fn for_selection(tree: &TreeModel, selection: &Selection) -> Self {
        match selection.found.as_slice() {
            [single] => Self::for_node(tree, *single),
            found => Self {
                title: MULTIPLE_FOUND.to_string(),
                bytes: found.iter().map(|&id| tree.size(id)).sum(),
                total: true,
            },
        }
    }
}
