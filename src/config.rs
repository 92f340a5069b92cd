//! Chart configuration.
//!
//! Every timing and geometry constant of the choreography lives here so the
//! host can tune it. Field names are camelCase on the JavaScript side and
//! any omitted field keeps its default.

use serde::Deserialize;

use crate::error::SunburstError;
use crate::tree::WeightMode;

/// Configuration for a sunburst chart session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SunburstConfig {
    // ===== Geometry =====
    /// Outer radius of the chart in pixels.
    pub radius: f64,
    /// Rotation of every arc group before the intro, in degrees.
    pub intro_rotation: f64,
    /// Inner radius of the ring arcs start from.
    pub intro_inner_radius: f64,
    /// Outer radius of the ring arcs start from.
    pub intro_outer_radius: f64,
    /// Weight mode used for the first layout.
    pub initial_mode: WeightMode,
    /// Fill used when no palette color is available.
    pub fallback_color: String,

    // ===== Durations (ms) =====
    pub entry_duration: f64,
    pub rotation_duration: f64,
    /// Extra delay of the rotation relative to the arc growth.
    pub rotation_offset: f64,
    pub fill_duration: f64,
    pub search_duration: f64,
    pub mode_duration: f64,
    pub hover_duration: f64,

    // ===== Stagger =====
    pub stagger_per_radian: f64,
    pub stagger_index_step: f64,
    pub stagger_index_modulo: usize,
    pub stagger_depth_span: f64,
    /// Delay of the deepest ring behind the first when hovering.
    pub hover_ripple_span: f64,
    pub fill_per_radian: f64,
    pub fill_depth_span: f64,

    // ===== Visual parameters =====
    /// Opacity of nodes a search did not match.
    pub dim_opacity: f64,
    /// Angular growth factor of a hovered subtree.
    pub hover_scale: f64,
    pub elastic_amplitude: f64,
    pub elastic_period: f64,
    pub highlight_overshoot: f64,
    pub unhighlight_overshoot: f64,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            radius: 300.0,
            intro_rotation: 120.0,
            intro_inner_radius: 10.0,
            intro_outer_radius: 12.0,
            initial_mode: WeightMode::Size,
            fallback_color: "#cccccc".to_string(),

            entry_duration: 1000.0,
            rotation_duration: 3250.0,
            rotation_offset: 250.0,
            fill_duration: 600.0,
            search_duration: 200.0,
            mode_duration: 1500.0,
            hover_duration: 500.0,

            stagger_per_radian: 100.0,
            stagger_index_step: 250.0,
            stagger_index_modulo: 4,
            stagger_depth_span: 1500.0,
            hover_ripple_span: 300.0,
            fill_per_radian: 100.0,
            fill_depth_span: 500.0,

            dim_opacity: 0.2,
            hover_scale: 1.1,
            elastic_amplitude: 2.0,
            elastic_period: 1.0,
            highlight_overshoot: 10.0,
            unhighlight_overshoot: 4.0,
        }
    }
}

impl SunburstConfig {
    /// Defaults with the radius fitted to a viewport, leaving room below the
    /// chart for the caption and controls.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        Self {
            radius: width.min((height - 100.0).max(100.0)) * 0.45,
            ..Self::default()
        }
    }

    /// Reject values the choreography cannot work with.
    pub fn validate(&self) -> Result<(), SunburstError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SunburstError::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.intro_inner_radius < 0.0 || self.intro_outer_radius < self.intro_inner_radius {
            return Err(SunburstError::InvalidConfig(format!(
                "intro ring {}..{} is not a valid band",
                self.intro_inner_radius, self.intro_outer_radius
            )));
        }

        let durations = [
            ("entryDuration", self.entry_duration),
            ("rotationDuration", self.rotation_duration),
            ("rotationOffset", self.rotation_offset),
            ("fillDuration", self.fill_duration),
            ("searchDuration", self.search_duration),
            ("modeDuration", self.mode_duration),
            ("hoverDuration", self.hover_duration),
            ("hoverRippleSpan", self.hover_ripple_span),
        ];
        if let Some((name, value)) = durations
            .iter()
            .find(|(_, v)| !(v.is_finite() && *v >= 0.0))
        {
            return Err(SunburstError::InvalidConfig(format!(
                "{name} must be a non-negative number of milliseconds, got {value}"
            )));
        }

        if !(0.0..=1.0).contains(&self.dim_opacity) {
            return Err(SunburstError::InvalidConfig(format!(
                "dimOpacity must be within 0..1, got {}",
                self.dim_opacity
            )));
        }
        if !(self.hover_scale.is_finite() && self.hover_scale > 0.0) {
            return Err(SunburstError::InvalidConfig(format!(
                "hoverScale must be positive, got {}",
                self.hover_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SunburstConfig::default().validate().is_ok());
    }

    #[test]
    fn test_for_viewport() {
        let config = SunburstConfig::for_viewport(800.0, 600.0);
        assert!((config.radius - 225.0).abs() < 1e-9);

        // Short viewports never shrink the chart below the floor.
        let config = SunburstConfig::for_viewport(800.0, 120.0);
        assert!((config.radius - 45.0).abs() < 1e-9);

        let config = SunburstConfig::for_viewport(300.0, 2000.0);
        assert!((config.radius - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = SunburstConfig {
            radius: 0.0,
            ..SunburstConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SunburstError::InvalidConfig(_))
        ));

        let config = SunburstConfig {
            fill_duration: -1.0,
            ..SunburstConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("fillDuration"), "{err}");

        let config = SunburstConfig {
            dim_opacity: 1.5,
            ..SunburstConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SunburstConfig {
            intro_inner_radius: 20.0,
            intro_outer_radius: 5.0,
            ..SunburstConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
