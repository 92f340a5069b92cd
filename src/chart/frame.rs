//! Per-frame output handed to the host page.

use serde::Serialize;

use crate::tree::NodeId;

/// Attribute changes for one node. Absent fields did not change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    pub id: NodeId,
    /// SVG path data. Never set for hidden nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Group rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Whether the host should not display the node at all.
    pub hidden: bool,
}

/// One-shot notifications raised during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChartEvent {
    /// Both the arc growth and the rotation of the intro have finished.
    IntroSettled,
}

/// Everything that changed since the previous tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub updates: Vec<NodeUpdate>,
    pub events: Vec<ChartEvent>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.events.is_empty()
    }
}
