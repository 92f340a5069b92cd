//! Annular sector shapes and their SVG path encoding.
//!
//! Angles are radians measured clockwise from 12 o'clock, matching the
//! partition layout. Screen coordinates are `(r·sin a, −r·cos a)` with the
//! y axis pointing down, so the chart's center is the origin.

use serde::Serialize;
use std::f64::consts::{PI, TAU};
use std::fmt::Write;

use crate::layout::ArcCoords;

/// Spans at least this close to a full turn are drawn as complete rings.
const FULL_TURN: f64 = TAU - 1e-6;

/// A ring segment in polar screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcShape {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcShape {
    pub fn new(start_angle: f64, end_angle: f64, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            inner_radius,
            outer_radius,
        }
    }

    /// The fully expanded arc for a layout node.
    ///
    /// `y` lives in the radius-squared domain, so the screen radii are square
    /// roots. This inverts the equal-area banding of the layout.
    pub fn from_coords(coords: &ArcCoords) -> Self {
        Self {
            start_angle: coords.x,
            end_angle: coords.x + coords.dx,
            inner_radius: coords.y.max(0.0).sqrt(),
            outer_radius: (coords.y + coords.dy).max(0.0).sqrt(),
        }
    }

    /// The entry shape: same angles, collapsed into a thin ring near the center.
    pub fn initial(coords: &ArcCoords, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            start_angle: coords.x,
            end_angle: coords.x + coords.dx,
            inner_radius,
            outer_radius,
        }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    #[inline]
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Whether a polar point falls inside the sector. Angles must already be
    /// normalized into the same turn as the shape.
    pub fn contains(&self, angle: f64, radius: f64) -> bool {
        let (lo, hi) = ordered(self.start_angle, self.end_angle);
        let (r0, r1) = ordered(self.inner_radius, self.outer_radius);
        angle >= lo && angle <= hi && radius >= r0 && radius <= r1
    }

    /// SVG path data for this shape.
    pub fn to_path(&self) -> String {
        arc_path(self)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Screen position of a polar point.
#[inline]
pub fn polar_to_cartesian(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Polar position of a screen point, angle normalized into `[0, 2π)`.
#[inline]
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    let angle = x.atan2(-y).rem_euclid(TAU);
    (angle, x.hypot(y))
}

/// Encode an annular sector as a closed SVG path.
///
/// The outer boundary runs clockwise from start to end, a radial edge drops
/// to the inner boundary, which runs back counter-clockwise, and the path is
/// closed along the second radial edge. Negative radii clamp to zero. A zero
/// inner radius produces a wedge meeting at the center; a full turn produces
/// two complete circles with an even-odd hole.
pub fn arc_path(shape: &ArcShape) -> String {
    let mut r0 = shape.inner_radius.max(0.0);
    let mut r1 = shape.outer_radius.max(0.0);
    if r1 < r0 {
        std::mem::swap(&mut r0, &mut r1);
    }
    let span = (shape.end_angle - shape.start_angle).abs();
    let clockwise = shape.end_angle >= shape.start_angle;
    let sweep_out = u8::from(clockwise);
    let sweep_in = 1 - sweep_out;

    let mut d = String::with_capacity(96);

    if span >= FULL_TURN {
        push_circle(&mut d, r1, sweep_out);
        if r0 > 0.0 {
            push_circle(&mut d, r0, sweep_in);
        }
        d.push('Z');
        return d;
    }

    let large = u8::from(span >= PI);
    let (x0, y0) = polar_to_cartesian(shape.start_angle, r1);
    let (x1, y1) = polar_to_cartesian(shape.end_angle, r1);

    let _ = write!(
        d,
        "M{},{}A{},{} 0 {},{} {},{}",
        num(x0),
        num(y0),
        num(r1),
        num(r1),
        large,
        sweep_out,
        num(x1),
        num(y1)
    );

    if r0 > 0.0 {
        let (x2, y2) = polar_to_cartesian(shape.end_angle, r0);
        let (x3, y3) = polar_to_cartesian(shape.start_angle, r0);
        let _ = write!(
            d,
            "L{},{}A{},{} 0 {},{} {},{}Z",
            num(x2),
            num(y2),
            num(r0),
            num(r0),
            large,
            sweep_in,
            num(x3),
            num(y3)
        );
    } else {
        d.push_str("L0,0Z");
    }
    d
}

/// Two half-circle arcs starting and ending at 12 o'clock.
fn push_circle(d: &mut String, r: f64, sweep: u8) {
    let r = num(r);
    let _ = write!(
        d,
        "M0,{neg}A{r},{r} 0 1,{sweep} 0,{r}A{r},{r} 0 1,{sweep} 0,{neg}",
        neg = num(-r),
    );
}

/// Round to three decimals for compact paths; never print `-0`.
fn num(v: f64) -> f64 {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
