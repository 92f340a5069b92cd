//! Pure interpolation between visual states, and per-node delay strategies.
//!
//! Every tween here is a function of `(start, end, progress)` with the
//! progress already passed through an ease. Delay strategies decide when
//! each node's tween begins, which is what produces the cascading reveal.

use crate::geometry::ArcShape;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Componentwise interpolation of two arc shapes.
///
/// Also the entry tween: the timeline drives it from the captured thin ring
/// (or the last rendered shape) to `ArcShape::from_coords` of the layout.
pub fn lerp_shape(from: &ArcShape, to: &ArcShape, t: f64) -> ArcShape {
    ArcShape {
        start_angle: lerp(from.start_angle, to.start_angle, t),
        end_angle: lerp(from.end_angle, to.end_angle, t),
        inner_radius: lerp(from.inner_radius, to.inner_radius, t),
        outer_radius: lerp(from.outer_radius, to.outer_radius, t),
    }
}

/// Scale a shape's angular span by `scale`, anchored at its midpoint.
pub fn hover_shape(shape: &ArcShape, scale: f64) -> ArcShape {
    let mid = shape.mid_angle();
    let half = shape.span() * scale / 2.0;
    ArcShape {
        start_angle: mid - half,
        end_angle: mid + half,
        ..*shape
    }
}

/// Everything a delay strategy may look at for one node.
#[derive(Debug, Clone, Copy)]
pub struct StaggerContext {
    /// Start angle of the node's layout arc.
    pub x: f64,
    /// Position of the node in traversal order.
    pub index: usize,
    pub depth: u32,
    pub max_depth: u32,
}

impl StaggerContext {
    /// Depth as a fraction of the deepest ring, 0 for single-level trees.
    #[inline]
    pub fn depth_fraction(&self) -> f64 {
        if self.max_depth == 0 {
            0.0
        } else {
            self.depth as f64 / self.max_depth as f64
        }
    }
}

/// Interchangeable delay formula.
pub trait StaggerDelay {
    fn delay_ms(&self, ctx: &StaggerContext) -> f64;
}

/// Entry choreography: sweep around the circle, stagger neighbours by index
/// modulo a small constant, and hold outer rings back behind inner ones.
#[derive(Debug, Clone, Copy)]
pub struct CascadeDelay {
    pub per_radian: f64,
    pub index_step: f64,
    pub index_modulo: usize,
    pub depth_span: f64,
    pub offset: f64,
}

impl StaggerDelay for CascadeDelay {
    fn delay_ms(&self, ctx: &StaggerContext) -> f64 {
        let slot = ctx.index % self.index_modulo.max(1);
        ctx.x * self.per_radian
            + slot as f64 * self.index_step
            + ctx.depth_fraction() * self.depth_span
            + self.offset
    }
}

/// Hover choreography: each ring starts a fixed step after the one inside it.
#[derive(Debug, Clone, Copy)]
pub struct RippleDelay {
    /// Delay of the deepest ring relative to the first.
    pub span: f64,
}

impl StaggerDelay for RippleDelay {
    fn delay_ms(&self, ctx: &StaggerContext) -> f64 {
        if ctx.max_depth == 0 {
            return 0.0;
        }
        ctx.depth.saturating_sub(1) as f64 * self.span / ctx.max_depth as f64
    }
}

/// Color choreography: sweep around the circle, outer rings slightly later.
#[derive(Debug, Clone, Copy)]
pub struct SweepDelay {
    pub per_radian: f64,
    pub depth_span: f64,
}

impl StaggerDelay for SweepDelay {
    fn delay_ms(&self, ctx: &StaggerContext) -> f64 {
        ctx.x * self.per_radian + ctx.depth_fraction() * self.depth_span
    }
}
