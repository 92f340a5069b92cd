//! The chart session: one tree, its rendered state and its choreography.

mod engine;
mod frame;

pub use engine::SunburstChart;
pub use frame::{ChartEvent, Frame, NodeUpdate};
