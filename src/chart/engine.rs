//! SunburstChart - the session object behind one rendered chart.
//!
//! The chart owns the immutable tree and keeps every piece of mutable
//! per-node state in parallel vectors indexed by `NodeId`:
//! - layout coordinates for the current weight mode
//! - the rendered shape, rotation, opacity and fill
//! - search/highlight flags and the cached palette colors
//!
//! Interactions only schedule transitions. `tick` advances the timeline,
//! which writes interpolated values back into the render state, and
//! reports the attributes that changed.

use crate::animation::{
    AttrValue, AttributeStore, BatchId, CascadeDelay, Channel, Ease, RippleDelay, StaggerContext,
    StaggerDelay, SweepDelay, Timeline, Transition, hover_shape,
};
use crate::config::SunburstConfig;
use crate::error::SunburstError;
use crate::geometry::ArcShape;
use crate::layout::{ArcCoords, PartitionLayout};
use crate::search::{self, Caption, Query, Selection};
use crate::spatial::ArcIndex;
use crate::theme::{Palette, Theme};
use crate::tree::{NodeId, NodeState, TreeModel, WeightMode};

use super::frame::{ChartEvent, Frame, NodeUpdate};

const DIRTY_PATH: u8 = 0b0001;
const DIRTY_ROTATION: u8 = 0b0010;
const DIRTY_OPACITY: u8 = 0b0100;
const DIRTY_FILL: u8 = 0b1000;
const DIRTY_ALL: u8 = DIRTY_PATH | DIRTY_ROTATION | DIRTY_OPACITY | DIRTY_FILL;

/// Rendered attribute values (SoA layout) plus change tracking.
struct RenderState {
    shapes: Vec<ArcShape>,
    /// Group rotation in degrees.
    rotations: Vec<f64>,
    opacity: Vec<f64>,
    fills: Vec<String>,
    /// Channels written since the last frame, one bitmask per node.
    dirty: Vec<u8>,
}

impl AttributeStore for RenderState {
    fn read(&self, node: NodeId, channel: Channel) -> AttrValue {
        let i = node.idx();
        match channel {
            Channel::Path => AttrValue::Shape(self.shapes[i]),
            Channel::Rotation => AttrValue::Scalar(self.rotations[i]),
            Channel::Opacity => AttrValue::Scalar(self.opacity[i]),
            Channel::Fill => AttrValue::Color(self.fills[i].clone()),
        }
    }

    fn write(&mut self, node: NodeId, channel: Channel, value: AttrValue) {
        let i = node.idx();
        match (channel, value) {
            (Channel::Path, AttrValue::Shape(shape)) => {
                self.shapes[i] = shape;
                self.dirty[i] |= DIRTY_PATH;
            }
            (Channel::Rotation, AttrValue::Scalar(degrees)) => {
                self.rotations[i] = degrees;
                self.dirty[i] |= DIRTY_ROTATION;
            }
            (Channel::Opacity, AttrValue::Scalar(opacity)) => {
                self.opacity[i] = opacity;
                self.dirty[i] |= DIRTY_OPACITY;
            }
            (Channel::Fill, AttrValue::Color(color)) => {
                self.fills[i] = color;
                self.dirty[i] |= DIRTY_FILL;
            }
            (channel, value) => {
                tracing::warn!(%node, ?channel, ?value, "mismatched attribute value ignored");
            }
        }
    }
}

/// Progress of the intro choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intro {
    NotStarted,
    /// Batches still outstanding; `None` once that half has settled.
    Running {
        growth: Option<BatchId>,
        rotation: Option<BatchId>,
    },
    Settled,
}

/// An interactive sunburst over one file tree.
pub struct SunburstChart {
    config: SunburstConfig,
    tree: TreeModel,
    layout: PartitionLayout,
    mode: WeightMode,

    /// Layout coordinates for `mode`, indexed by `NodeId`.
    coords: Vec<ArcCoords>,

    /// What the host is currently showing.
    render: RenderState,

    /// Search, highlight and visibility flags.
    states: Vec<NodeState>,

    /// Resolved palette color per node.
    colors: Vec<String>,

    timeline: Timeline,

    /// Hit testing over the fully expanded layout arcs.
    index: ArcIndex,

    selection: Selection,
    caption: Caption,
    intro: Intro,
}

impl SunburstChart {
    /// Lay out `tree` and prepare the pre-intro state: every arc collapsed
    /// into the thin center ring, rotated by `intro_rotation`, painted with
    /// the fallback color. The root is hidden for the chart's lifetime.
    pub fn new(tree: TreeModel, config: SunburstConfig) -> Result<Self, SunburstError> {
        config.validate()?;

        let layout = PartitionLayout::with_radius(config.radius);
        let mode = config.initial_mode;
        let coords = layout.compute(&tree, mode).coords;
        let n = tree.len();

        let colors = Theme::from_palette(&Palette::default(), &tree, &config.fallback_color)
            .paint(&tree);
        let mut states = vec![NodeState::default(); n];
        states[tree.root().idx()].set_hidden(true);

        let render = RenderState {
            shapes: coords
                .iter()
                .map(|c| ArcShape::initial(c, config.intro_inner_radius, config.intro_outer_radius))
                .collect(),
            rotations: vec![config.intro_rotation; n],
            opacity: vec![1.0; n],
            fills: colors.clone(),
            dirty: vec![0; n],
        };

        let caption = Caption::for_node(&tree, tree.root());

        let mut chart = Self {
            config,
            tree,
            layout,
            mode,
            coords,
            render,
            states,
            colors,
            timeline: Timeline::new(),
            index: ArcIndex::new(),
            selection: Selection::default(),
            caption,
            intro: Intro::NotStarted,
        };
        chart.rebuild_index();

        tracing::info!(
            nodes = n,
            max_depth = chart.tree.max_depth(),
            mode = mode.as_str(),
            radius = chart.config.radius,
            "sunburst chart created"
        );
        Ok(chart)
    }

    // =========================================================================
    // Choreography
    // =========================================================================

    /// Schedule the intro: arcs grow out of the center ring with an elastic
    /// ease while their groups rotate back to 0°. Both halves are staggered
    /// around the circle and outward by depth. `IntroSettled` is reported
    /// once every arc has finished both.
    pub fn start(&mut self, now_ms: f64) {
        if self.intro != Intro::NotStarted {
            tracing::warn!("intro already started");
            return;
        }

        let growth = self.timeline.begin_batch();
        let rotation = self.timeline.begin_batch();
        let cascade = CascadeDelay {
            per_radian: self.config.stagger_per_radian,
            index_step: self.config.stagger_index_step,
            index_modulo: self.config.stagger_index_modulo,
            depth_span: self.config.stagger_depth_span,
            offset: 0.0,
        };
        let elastic = Ease::Elastic {
            amplitude: self.config.elastic_amplitude,
            period: self.config.elastic_period,
        };

        for &id in self.tree.preorder() {
            if self.states[id.idx()].is_hidden() {
                continue;
            }
            let delay = cascade.delay_ms(&self.stagger(id));
            let target = ArcShape::from_coords(&self.coords[id.idx()]);

            self.timeline.schedule(
                now_ms,
                Transition::new(id, Channel::Path, AttrValue::Shape(target))
                    .delay(delay)
                    .duration(self.config.entry_duration)
                    .ease(elastic)
                    .batch(growth),
            );
            self.timeline.schedule(
                now_ms,
                Transition::new(id, Channel::Rotation, AttrValue::Scalar(0.0))
                    .delay(delay + self.config.rotation_offset)
                    .duration(self.config.rotation_duration)
                    .ease(Ease::CubicInOut)
                    .batch(rotation),
            );
        }

        self.intro = Intro::Running {
            growth: Some(growth),
            rotation: Some(rotation),
        };
        tracing::debug!(?growth, ?rotation, "intro scheduled");
    }

    /// Switch the weight mode and re-run the layout.
    ///
    /// With `update == false` before the intro has started, the new layout
    /// simply replaces the old one and the intro grows into it. Otherwise
    /// every arc tweens from wherever it is drawn now to its new shape;
    /// zero-weight subtrees shrink to a zero span.
    pub fn set_mode(&mut self, mode: WeightMode, update: bool, now_ms: f64) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.coords = self.layout.compute(&self.tree, mode).coords;
        self.rebuild_index();
        tracing::info!(mode = mode.as_str(), update, "weight mode changed");

        if !update && self.intro == Intro::NotStarted {
            for &id in self.tree.preorder() {
                let ring = ArcShape::initial(
                    &self.coords[id.idx()],
                    self.config.intro_inner_radius,
                    self.config.intro_outer_radius,
                );
                self.render.write(id, Channel::Path, AttrValue::Shape(ring));
            }
            return;
        }

        for &id in self.tree.preorder() {
            if self.states[id.idx()].is_hidden() {
                continue;
            }
            let target = ArcShape::from_coords(&self.coords[id.idx()]);
            self.timeline.schedule(
                now_ms,
                Transition::new(id, Channel::Path, AttrValue::Shape(target))
                    .duration(self.config.mode_duration)
                    .ease(Ease::CubicInOut),
            );
        }
    }

    /// Pop a node and its whole subtree outward, ring by ring. Returns the
    /// caption for the hovered node.
    pub fn highlight(&mut self, id: NodeId, now_ms: f64) -> Result<Caption, SunburstError> {
        self.hover(id, true, now_ms)?;
        self.caption = Caption::for_node(&self.tree, id);
        Ok(self.caption.clone())
    }

    /// Reverse `highlight` and restore the root caption.
    pub fn unhighlight(&mut self, id: NodeId, now_ms: f64) -> Result<Caption, SunburstError> {
        self.hover(id, false, now_ms)?;
        self.caption = Caption::for_node(&self.tree, self.tree.root());
        Ok(self.caption.clone())
    }

    fn hover(&mut self, id: NodeId, on: bool, now_ms: f64) -> Result<(), SunburstError> {
        if !self.tree.contains(id) {
            return Err(SunburstError::UnknownNode(id));
        }

        let (scale, overshoot) = if on {
            (self.config.hover_scale, self.config.highlight_overshoot)
        } else {
            (1.0, self.config.unhighlight_overshoot)
        };
        let ripple = RippleDelay {
            span: self.config.hover_ripple_span,
        };
        let ease = Ease::BackOut { overshoot };
        let duration = self.config.hover_duration;

        for &node in self.tree.subtree(id) {
            let i = node.idx();
            self.states[i].set_highlighted(on);
            if self.states[i].is_hidden() {
                continue;
            }
            let delay = ripple.delay_ms(&self.stagger(node));
            let target = hover_shape(&ArcShape::from_coords(&self.coords[i]), scale);

            self.timeline.schedule(
                now_ms,
                Transition::new(node, Channel::Path, AttrValue::Shape(target))
                    .delay(delay)
                    .duration(duration)
                    .ease(ease),
            );
            // Interrupts a running scheme fade so the hovered arcs land on
            // their final color.
            self.timeline.schedule(
                now_ms,
                Transition::new(node, Channel::Fill, AttrValue::Color(self.colors[i].clone()))
                    .delay(delay)
                    .duration(duration)
                    .ease(ease),
            );
        }
        Ok(())
    }

    /// Dim every node whose name does not match `text`. An empty query
    /// restores full opacity everywhere and the root caption.
    pub fn search(&mut self, text: &str, now_ms: f64) -> Caption {
        let query = Query::parse(text);
        self.selection = search::select(&self.tree, &query, &mut self.states);
        self.caption = if query.is_all() {
            Caption::for_node(&self.tree, self.tree.root())
        } else {
            Caption::for_selection(&self.tree, &self.selection)
        };

        for &id in self.tree.preorder() {
            let state = self.states[id.idx()];
            if state.is_hidden() {
                continue;
            }
            let opacity = if state.is_enabled() {
                1.0
            } else {
                self.config.dim_opacity
            };
            self.timeline.schedule(
                now_ms,
                Transition::new(id, Channel::Opacity, AttrValue::Scalar(opacity))
                    .duration(self.config.search_duration),
            );
        }

        tracing::debug!(query = text, found = self.selection.len(), "search applied");
        self.caption.clone()
    }

    /// Resolve `palette` against the tree and fade every arc to its color.
    pub fn use_scheme(&mut self, palette: &Palette, now_ms: f64) {
        let theme = Theme::from_palette(palette, &self.tree, &self.config.fallback_color);
        self.use_theme(theme, now_ms);
    }

    /// Like `use_scheme`, for a theme with a custom modifier.
    pub fn use_theme(&mut self, mut theme: Theme, now_ms: f64) {
        self.colors = theme.paint(&self.tree);
        let sweep = SweepDelay {
            per_radian: self.config.fill_per_radian,
            depth_span: self.config.fill_depth_span,
        };

        for &id in self.tree.preorder() {
            if self.states[id.idx()].is_hidden() {
                continue;
            }
            let delay = sweep.delay_ms(&self.stagger(id));
            self.timeline.schedule(
                now_ms,
                Transition::new(id, Channel::Fill, AttrValue::Color(self.colors[id.idx()].clone()))
                    .delay(delay)
                    .duration(self.config.fill_duration)
                    .ease(Ease::Bounce),
            );
        }
        tracing::info!(pool = theme.scale().pool().len(), "color scheme applied");
    }

    fn stagger(&self, id: NodeId) -> StaggerContext {
        StaggerContext {
            x: self.coords[id.idx()].x,
            index: id.idx(),
            depth: self.tree.depth(id),
            max_depth: self.tree.max_depth(),
        }
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Advance every transition to `now_ms` and collect what changed.
    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let settled = self.timeline.tick(now_ms, &mut self.render);

        let mut frame = Frame::default();
        if self.join_intro(&settled) {
            frame.events.push(ChartEvent::IntroSettled);
        }

        for i in 0..self.render.dirty.len() {
            let bits = self.render.dirty[i];
            if bits != 0 {
                frame.updates.push(self.node_update(NodeId(i as u32), bits));
            }
        }
        self.render.dirty.fill(0);
        frame
    }

    fn join_intro(&mut self, settled: &[BatchId]) -> bool {
        let Intro::Running { growth, rotation } = &mut self.intro else {
            return false;
        };
        for &batch in settled {
            if *growth == Some(batch) {
                *growth = None;
            }
            if *rotation == Some(batch) {
                *rotation = None;
            }
        }
        if growth.is_some() || rotation.is_some() {
            return false;
        }
        self.intro = Intro::Settled;
        tracing::info!("intro settled");
        true
    }

    /// Full current attributes of every node, for the host's first paint.
    pub fn scene(&self) -> Vec<NodeUpdate> {
        self.tree
            .preorder()
            .iter()
            .map(|&id| self.node_update(id, DIRTY_ALL))
            .collect()
    }

    fn node_update(&self, id: NodeId, bits: u8) -> NodeUpdate {
        let i = id.idx();
        let hidden = self.states[i].is_hidden();
        NodeUpdate {
            id,
            path: (bits & DIRTY_PATH != 0 && !hidden).then(|| self.render.shapes[i].to_path()),
            rotation: (bits & DIRTY_ROTATION != 0).then(|| self.render.rotations[i]),
            opacity: (bits & DIRTY_OPACITY != 0).then(|| self.render.opacity[i]),
            fill: (bits & DIRTY_FILL != 0).then(|| self.render.fills[i].clone()),
            hidden,
        }
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// The node under a point relative to the chart center.
    ///
    /// Arcs are tested at their resting layout shape, without hover growth
    /// or intro rotation.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.index.node_at(x, y)
    }

    fn rebuild_index(&mut self) {
        let states = &self.states;
        let coords = &self.coords;
        self.index.rebuild(
            self.tree
                .preorder()
                .iter()
                .filter(|id| !states[id.idx()].is_hidden())
                .map(|&id| (id, ArcShape::from_coords(&coords[id.idx()]))),
        );
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn config(&self) -> &SunburstConfig {
        &self.config
    }

    pub fn mode(&self) -> WeightMode {
        self.mode
    }

    /// Layout coordinates for the current mode.
    pub fn coords(&self) -> &[ArcCoords] {
        &self.coords
    }

    /// Layout as a flat `[x, dx, y, dy, ...]` buffer in node order.
    pub fn layout_buffer(&self) -> Vec<f64> {
        self.coords
            .iter()
            .flat_map(|c| [c.x, c.dx, c.y, c.dy])
            .collect()
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn intro_settled(&self) -> bool {
        self.intro == Intro::Settled
    }

    /// Whether any transition is running or waiting on its delay.
    pub fn is_animating(&self) -> bool {
        !self.timeline.is_idle()
    }

    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id.idx()).copied()
    }

    /// The shape currently drawn for a node.
    pub fn shape(&self, id: NodeId) -> Option<ArcShape> {
        self.render.shapes.get(id.idx()).copied()
    }

    pub fn rotation(&self, id: NodeId) -> Option<f64> {
        self.render.rotations.get(id.idx()).copied()
    }

    pub fn opacity(&self, id: NodeId) -> Option<f64> {
        self.render.opacity.get(id.idx()).copied()
    }

    /// The fill currently drawn for a node.
    pub fn fill(&self, id: NodeId) -> Option<&str> {
        self.render.fills.get(id.idx()).map(String::as_str)
    }

    /// The palette color a node settles on.
    pub fn color(&self, id: NodeId) -> Option<&str> {
        self.colors.get(id.idx()).map(String::as_str)
    }
}
