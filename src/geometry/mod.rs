//! 2D circular arc geometry.

mod arc;

pub use arc::{ArcShape, arc_path, cartesian_to_polar, polar_to_cartesian};
