//! Transition and tween engine.
//!
//! - `ease`: timing curves
//! - `tween`: pure interpolation of visual states and delay strategies
//! - `timeline`: per-node, per-attribute scheduling with batch joins

pub mod ease;
pub mod timeline;
pub mod tween;

pub use ease::{Ease, Easing};
pub use timeline::{AttrValue, AttributeStore, BatchId, Channel, Timeline, Transition};
pub use tween::{
    CascadeDelay, RippleDelay, StaggerContext, StaggerDelay, SweepDelay, hover_shape,
    lerp, lerp_shape,
};
