//! Easing curves.
//!
//! An ease maps elapsed-time fraction to progress fraction. All curves are
//! clamped: `t ≤ 0` gives 0 and `t ≥ 1` gives 1, so a transition always
//! lands exactly on its target.

use std::f64::consts::TAU;

/// Interchangeable timing strategy.
pub trait Easing {
    fn ease(&self, t: f64) -> f64;
}

/// Built-in easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ease {
    Linear,
    /// Symmetric cubic; the standard non-overshooting curve.
    #[default]
    CubicInOut,
    /// Decaying sine that overshoots and springs back.
    Elastic { amplitude: f64, period: f64 },
    /// Overshoots past the target once, then settles.
    BackOut { overshoot: f64 },
    /// Bounces against the target like a dropped ball.
    Bounce,
}

impl Easing for Ease {
    fn ease(&self, t: f64) -> f64 {
        if t <= 0.0 || t.is_nan() {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                if t <= 0.5 {
                    let u = 2.0 * t;
                    u * u * u / 2.0
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * u / 2.0
                }
            }
            Ease::Elastic { amplitude, period } => elastic(t, amplitude, period),
            Ease::BackOut { overshoot } => {
                let u = 1.0 - t;
                1.0 - u * u * ((overshoot + 1.0) * u - overshoot)
            }
            Ease::Bounce => bounce(t),
        }
    }
}

fn elastic(t: f64, amplitude: f64, period: f64) -> f64 {
    let period = if period > 0.0 { period } else { 0.45 };
    let (amplitude, shift) = if amplitude >= 1.0 {
        (amplitude, period / TAU * (1.0 / amplitude).asin())
    } else {
        (1.0, period / 4.0)
    };
    1.0 + amplitude * 2f64.powf(-10.0 * t) * ((t - shift) * TAU / period).sin()
}

fn bounce(t: f64) -> f64 {
    const K: f64 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        K * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        K * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        K * t * t + 0.984375
    }
}
