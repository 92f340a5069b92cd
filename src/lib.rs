//! Sunburst - WASM Module
//!
//! This module provides the layout, geometry and animation engine behind an
//! interactive sunburst view of a file-size tree. It is compiled to
//! WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen; the
//! host page owns the SVG and applies the attribute updates returned by
//! every `tick`.
//!
//! # Architecture
//!
//! - `tree`: immutable file hierarchy stored in petgraph's StableGraph
//! - `layout`: radial partition layout with equal-area rings
//! - `geometry`: annular sectors and their SVG path encoding
//! - `animation`: easing, tweens, stagger delays and the transition timeline
//! - `search`: regex search overlay and center caption
//! - `theme`: palette resolution and color arithmetic
//! - `spatial`: R-tree hit testing over rendered arcs
//! - `chart`: the session object tying everything together

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod chart;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod search;
pub mod spatial;
pub mod theme;
pub mod tree;

use chart::SunburstChart;
use config::SunburstConfig;
use error::SunburstError;
use theme::Palette;
use tree::{NodeId, TreeInput, TreeModel, WeightMode};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Main entry point for the sunburst engine.
///
/// This struct wraps the internal SunburstChart and provides the public API
/// exposed to JavaScript. Every method that starts an animation takes the
/// current `requestAnimationFrame` timestamp.
#[wasm_bindgen]
pub struct SunburstWasm {
    chart: SunburstChart,
}

#[wasm_bindgen]
impl SunburstWasm {
    /// Create a chart from a `{name, size, children?}` tree.
    ///
    /// `config` may be `undefined` or `null` for the defaults, or a partial
    /// object whose fields override them.
    #[wasm_bindgen(constructor)]
    pub fn new(tree: JsValue, config: JsValue) -> Result<SunburstWasm, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SunburstConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| SunburstError::InvalidConfig(e.to_string()))?
        };
        Self::build(tree, config)
    }

    /// Create a chart with default settings and a radius fitted to the
    /// given viewport.
    #[wasm_bindgen(js_name = forViewport)]
    pub fn for_viewport(tree: JsValue, width: f64, height: f64) -> Result<SunburstWasm, JsValue> {
        Self::build(tree, SunburstConfig::for_viewport(width, height))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of nodes, root included. Ids run from 0 to `nodeCount() - 1`.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.chart.tree().len() as u32
    }

    /// Name of a node.
    #[wasm_bindgen(js_name = nodeName)]
    pub fn node_name(&self, id: u32) -> Option<String> {
        let id = NodeId(id);
        self.chart
            .tree()
            .contains(id)
            .then(|| self.chart.tree().name(id).to_string())
    }

    /// Full attributes of every node for the first paint.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.chart.scene())?)
    }

    /// Current center caption `{title, bytes, total}`.
    pub fn caption(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.chart.caption())?)
    }

    /// Whether the intro has fully played.
    #[wasm_bindgen(js_name = introSettled)]
    pub fn intro_settled(&self) -> bool {
        self.chart.intro_settled()
    }

    /// Whether another `tick` would change anything.
    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.chart.is_animating()
    }

    /// Layout coordinates as `[x0, dx0, y0, dy0, x1, ...]`.
    #[wasm_bindgen(js_name = getLayoutBuffer)]
    pub fn get_layout_buffer(&self) -> Float64Array {
        Float64Array::from(&self.chart.layout_buffer()[..])
    }

    /// Node under a point relative to the chart center, if any.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f64, y: f64) -> Option<u32> {
        self.chart.node_at(x, y).map(NodeId::raw)
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Schedule the intro animation.
    pub fn start(&mut self, now_ms: f64) {
        self.chart.start(now_ms);
    }

    /// Advance to `nowMs` and return `{updates, events}`.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let frame = self.chart.tick(now_ms);
        Ok(serde_wasm_bindgen::to_value(&frame)?)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Switch between `"size"` and `"count"` weighting.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str, update: bool, now_ms: f64) -> Result<(), JsValue> {
        let mode: WeightMode = mode.parse()?;
        self.chart.set_mode(mode, update, now_ms);
        Ok(())
    }

    /// Hover a node. Returns the caption to show.
    pub fn highlight(&mut self, id: u32, now_ms: f64) -> Result<JsValue, JsValue> {
        let caption = self.chart.highlight(NodeId(id), now_ms)?;
        Ok(serde_wasm_bindgen::to_value(&caption)?)
    }

    /// End a hover. Returns the caption to show.
    pub fn unhighlight(&mut self, id: u32, now_ms: f64) -> Result<JsValue, JsValue> {
        let caption = self.chart.unhighlight(NodeId(id), now_ms)?;
        Ok(serde_wasm_bindgen::to_value(&caption)?)
    }

    /// Apply a search query. Returns the caption to show.
    pub fn search(&mut self, text: &str, now_ms: f64) -> Result<JsValue, JsValue> {
        let caption = self.chart.search(text, now_ms);
        Ok(serde_wasm_bindgen::to_value(&caption)?)
    }

    /// Apply a `{main, specials, modifier?, shade?}` color scheme.
    #[wasm_bindgen(js_name = useScheme)]
    pub fn use_scheme(&mut self, palette: JsValue, now_ms: f64) -> Result<(), JsValue> {
        let palette: Palette = serde_wasm_bindgen::from_value(palette)
            .map_err(|e| SunburstError::InvalidPalette(e.to_string()))?;
        self.chart.use_scheme(&palette, now_ms);
        Ok(())
    }
}

impl SunburstWasm {
    fn build(tree: JsValue, config: SunburstConfig) -> Result<SunburstWasm, JsValue> {
        let input: TreeInput = serde_wasm_bindgen::from_value(tree)
            .map_err(|e| SunburstError::InvalidTree(e.to_string()))?;
        let chart = SunburstChart::new(TreeModel::from_input(&input), config)?;
        Ok(Self { chart })
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chart::ChartEvent;
    use geometry::{ArcShape, polar_to_cartesian};
    use std::collections::BTreeMap;

    const EPS: f64 = 1e-9;

    /// root
    /// ├── src
    /// │   ├── app.js      400
    /// │   ├── util.js     100
    /// │   └── lib
    /// │       └── parse.js 200
    /// ├── docs
    /// │   └── guide.md     50
    /// └── README.md       250
    fn project() -> TreeModel {
        TreeModel::from_input(&TreeInput::dir(
            "root",
            vec![
                TreeInput::dir(
                    "src",
                    vec![
                        TreeInput::leaf("app.js", 400),
                        TreeInput::leaf("util.js", 100),
                        TreeInput::dir("lib", vec![TreeInput::leaf("parse.js", 200)]),
                    ],
                ),
                TreeInput::dir("docs", vec![TreeInput::leaf("guide.md", 50)]),
                TreeInput::leaf("README.md", 250),
            ],
        ))
    }

    fn chart() -> SunburstChart {
        SunburstChart::new(project(), SunburstConfig::default()).unwrap()
    }

    /// Tick at 60 fps from `from` through `to`, collecting events.
    fn run(chart: &mut SunburstChart, from: f64, to: f64) -> Vec<ChartEvent> {
        let mut events = Vec::new();
        let mut now = from;
        while now < to {
            events.extend(chart.tick(now).events);
            now += 16.0;
        }
        events.extend(chart.tick(to).events);
        events
    }

    fn layout_shape(chart: &SunburstChart, id: u32) -> ArcShape {
        ArcShape::from_coords(&chart.coords()[id as usize])
    }

    fn visible(chart: &SunburstChart) -> impl Iterator<Item = NodeId> + '_ {
        chart.tree().preorder()[1..].iter().copied()
    }

    #[test]
    fn test_intro_lands_on_layout() {
        let mut chart = chart();
        chart.start(0.0);
        let events = run(&mut chart, 0.0, 8000.0);
        assert_eq!(events, vec![ChartEvent::IntroSettled]);
        assert!(chart.intro_settled());
        assert!(!chart.is_animating());

        for id in visible(&chart) {
            assert_eq!(chart.shape(id), Some(layout_shape(&chart, id.raw())));
            assert_eq!(chart.rotation(id), Some(0.0));
        }
    }

    #[test]
    fn test_intro_waits_for_rotation() {
        let mut chart = chart();
        chart.start(0.0);

        // Growth is done well before the outer rings stop rotating.
        assert!(run(&mut chart, 0.0, 4000.0).is_empty());
        for id in visible(&chart) {
            assert_eq!(chart.shape(id), Some(layout_shape(&chart, id.raw())));
        }
        assert!(!chart.intro_settled());
        assert!(visible(&chart).any(|id| chart.rotation(id) != Some(0.0)));

        let mut now = 4000.0;
        loop {
            now += 16.0;
            let frame = chart.tick(now);
            if !frame.events.is_empty() {
                assert_eq!(frame.events, vec![ChartEvent::IntroSettled]);
                break;
            }
            assert!(now < 8000.0, "intro never settled");
        }
        assert!(visible(&chart).all(|id| chart.rotation(id) == Some(0.0)));
        assert!(run(&mut chart, now, now + 1000.0).is_empty());
    }

    #[test]
    fn test_root_is_hidden() {
        let mut chart = chart();
        chart.start(0.0);
        let frame = chart.tick(5000.0);
        assert!(
            frame
                .updates
                .iter()
                .filter(|u| u.id == NodeId(0))
                .all(|u| u.hidden && u.path.is_none())
        );
        assert!(frame.updates.iter().any(|u| u.path.is_some()));
    }

    #[test]
    fn test_mode_round_trip() {
        let mut chart = chart();
        chart.start(0.0);
        run(&mut chart, 0.0, 8000.0);
        let size_coords = chart.coords().to_vec();

        chart.set_mode(WeightMode::Count, true, 8000.0);
        assert_eq!(chart.mode(), WeightMode::Count);

        // Mid-transition the arcs sit between the two layouts.
        run(&mut chart, 8000.0, 8750.0);
        let readme = chart.shape(NodeId(8)).unwrap();
        let size_span = size_coords[8].dx;
        let count_span = chart.coords()[8].dx;
        assert!((size_span - 0.25 * std::f64::consts::TAU).abs() < EPS);
        assert!((count_span - 0.2 * std::f64::consts::TAU).abs() < EPS);
        assert!(readme.span() < size_span && readme.span() > count_span);

        run(&mut chart, 8750.0, 10_000.0);
        for id in visible(&chart) {
            assert_eq!(chart.shape(id), Some(layout_shape(&chart, id.raw())));
        }

        chart.set_mode(WeightMode::Size, true, 10_000.0);
        run(&mut chart, 10_000.0, 12_000.0);
        assert_eq!(chart.coords(), &size_coords[..]);
        for id in visible(&chart) {
            assert_eq!(
                chart.shape(id),
                Some(ArcShape::from_coords(&size_coords[id.idx()]))
            );
        }
    }

    #[test]
    fn test_mode_switch_shrinks_zero_weight_to_nothing() {
        let tree = TreeModel::from_input(&TreeInput::dir(
            "root",
            vec![TreeInput::leaf("a", 10), TreeInput::leaf("empty", 0)],
        ));
        let config = SunburstConfig {
            initial_mode: WeightMode::Count,
            ..SunburstConfig::default()
        };
        let mut chart = SunburstChart::new(tree, config).unwrap();
        chart.start(0.0);
        assert_eq!(run(&mut chart, 0.0, 8000.0), vec![ChartEvent::IntroSettled]);

        let empty = NodeId(2);
        let count_span = chart.shape(empty).unwrap().span();
        assert!((count_span - std::f64::consts::PI).abs() < EPS);

        chart.set_mode(WeightMode::Size, true, 8000.0);
        run(&mut chart, 8000.0, 8750.0);
        let mid = chart.shape(empty).unwrap().span();
        assert!(mid > 0.0 && mid < count_span);

        run(&mut chart, 8750.0, 10_000.0);
        assert_eq!(chart.coords()[2].dx, 0.0);
        let shape = chart.shape(empty).unwrap();
        assert_eq!(shape.span(), 0.0);
        assert_eq!(shape, layout_shape(&chart, 2));
    }

    #[test]
    fn test_hover_ripples_outward() {
        let mut chart = chart();
        chart.start(0.0);
        run(&mut chart, 0.0, 8000.0);

        let caption = chart.highlight(NodeId(1), 8000.0).unwrap();
        assert_eq!(caption.title, "src");
        assert_eq!(caption.bytes, 700);
        assert!(!caption.total);

        // Depth 1 starts at once, depth 2 after 100 ms, depth 3 after 200 ms.
        let frame = chart.tick(8050.0);
        let changed: Vec<_> = frame
            .updates
            .iter()
            .filter(|u| u.path.is_some())
            .map(|u| u.id)
            .collect();
        assert_eq!(changed, vec![NodeId(1)]);

        run(&mut chart, 8050.0, 9000.0);
        for id in chart.tree().subtree(NodeId(1)).to_vec() {
            let base = layout_shape(&chart, id.raw());
            let shape = chart.shape(id).unwrap();
            assert!((shape.span() - base.span() * 1.1).abs() < EPS);
            assert!((shape.mid_angle() - base.mid_angle()).abs() < EPS);
            assert!(chart.state(id).unwrap().is_highlighted());
        }
        // Outside the subtree nothing moved.
        assert_eq!(chart.shape(NodeId(6)), Some(layout_shape(&chart, 6)));

        let caption = chart.unhighlight(NodeId(1), 9000.0).unwrap();
        assert_eq!(caption.title, "root");
        assert_eq!(caption.bytes, 1000);
        run(&mut chart, 9000.0, 10_000.0);
        for id in chart.tree().subtree(NodeId(1)).to_vec() {
            let base = layout_shape(&chart, id.raw());
            let shape = chart.shape(id).unwrap();
            assert!((shape.start_angle - base.start_angle).abs() < EPS);
            assert!((shape.end_angle - base.end_angle).abs() < EPS);
            assert!(!chart.state(id).unwrap().is_highlighted());
        }
    }

    #[test]
    fn test_hover_during_intro_still_settles() {
        let mut chart = chart();
        chart.start(0.0);
        run(&mut chart, 0.0, 500.0);
        chart.highlight(NodeId(1), 500.0).unwrap();
        chart.unhighlight(NodeId(1), 700.0).unwrap();
        let events = run(&mut chart, 700.0, 8000.0);
        assert_eq!(events, vec![ChartEvent::IntroSettled]);
    }

    #[test]
    fn test_search_dims_and_captions() {
        let mut chart = chart();

        let caption = chart.search("app.js", 0.0);
        assert_eq!(chart.selection().found, vec![NodeId(2)]);
        assert_eq!(caption.title, "app.js");
        assert_eq!(caption.bytes, 400);

        run(&mut chart, 0.0, 250.0);
        assert_eq!(chart.opacity(NodeId(2)), Some(1.0));
        assert_eq!(chart.opacity(NodeId(1)), Some(0.2));
        assert_eq!(chart.opacity(NodeId(8)), Some(0.2));

        let caption = chart.search("\\.js$", 250.0);
        assert_eq!(caption.title, "Multiple found");
        assert_eq!(caption.bytes, 700);
        assert!(caption.total);
        assert_eq!(chart.caption(), &caption);

        let caption = chart.search("", 300.0);
        assert_eq!(caption.title, "root");
        assert_eq!(caption.bytes, 1000);
        run(&mut chart, 300.0, 600.0);
        for id in visible(&chart) {
            assert_eq!(chart.opacity(id), Some(1.0));
            assert!(chart.state(id).unwrap().is_enabled());
        }
    }

    #[test]
    fn test_invalid_search_dims_everything() {
        let mut chart = chart();
        let caption = chart.search("[unclosed", 0.0);
        assert!(chart.selection().is_empty());
        assert_eq!(caption.bytes, 0);
        run(&mut chart, 0.0, 250.0);
        assert!(visible(&chart).all(|id| chart.opacity(id) == Some(0.2)));
    }

    #[test]
    fn test_scheme_fades_to_resolved_colors() {
        let mut chart = chart();
        let palette = Palette {
            main: vec!["#1f77b4".into(), "#ff7f0e".into(), "#D62728".into()],
            specials: BTreeMap::from([("docs".to_string(), "#d62728".to_string())]),
            ..Palette::default()
        };
        chart.use_scheme(&palette, 0.0);

        // Fills only change as the sweep reaches each arc.
        assert_eq!(chart.fill(NodeId(1)), Some("#cccccc"));
        run(&mut chart, 0.0, 2000.0);

        assert_eq!(chart.fill(NodeId(6)), Some("#d62728"));
        assert_eq!(chart.fill(NodeId(7)), Some("#d62728"));
        assert_eq!(chart.fill(NodeId(1)), Some("#1f77b4"));
        assert_eq!(chart.fill(NodeId(2)), Some("#1f77b4"));
        assert_eq!(chart.fill(NodeId(5)), chart.color(NodeId(4)));
        // A top-level file takes the root's color. src and README.md hold
        // slots 0 and 1, docs is special, so the root wraps to slot 0.
        assert_eq!(chart.fill(NodeId(8)), Some("#1f77b4"));
        assert_eq!(chart.fill(NodeId(4)), Some("#ff7f0e"));
        assert_eq!(chart.fill(NodeId(8)), chart.color(NodeId(0)));
        for id in visible(&chart) {
            assert_eq!(chart.fill(id), chart.color(id));
        }
    }

    #[test]
    fn test_hit_testing() {
        let chart = chart();
        for id in visible(&chart) {
            let shape = layout_shape(&chart, id.raw());
            let (x, y) = polar_to_cartesian(
                shape.mid_angle(),
                (shape.inner_radius + shape.outer_radius) / 2.0,
            );
            assert_eq!(chart.node_at(x, y), Some(id), "{}", chart.tree().name(id));
        }

        // The center belongs to the first ring, the root is never hit.
        assert_ne!(chart.node_at(0.0, 0.0), Some(NodeId(0)));
        assert!(chart.node_at(0.0, 0.0).is_some());
        assert_eq!(chart.node_at(0.0, -400.0), None);
        assert_eq!(chart.node_at(250.0, 250.0), None);
    }

    #[test]
    fn test_viewport_config() {
        let config = SunburstConfig::for_viewport(1000.0, 700.0);
        let chart = SunburstChart::new(project(), config).unwrap();
        let outer = chart
            .coords()
            .iter()
            .map(|c| (c.y + c.dy).sqrt())
            .fold(0.0, f64::max);
        assert!((outer - 270.0).abs() < EPS);
    }
}
