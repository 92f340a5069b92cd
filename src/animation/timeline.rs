//! Transition scheduling with last-writer-wins semantics and batch joins.
//!
//! Every node has one animation slot per visual attribute ("channel"). A slot
//! holds at most one running and one pending transition:
//!
//! - Scheduling a new transition replaces whatever is pending in that slot.
//! - When the pending transition's delay elapses it interrupts the running
//!   one and captures the attribute's current value as its start state.
//!
//! Transitions can be grouped into batches. A batch settles once every
//! transition scheduled into it has finished or been superseded, which lets
//! callers join on "all of these are done" without shared counters.

use std::collections::BTreeMap;

use super::ease::{Ease, Easing};
use super::tween::{lerp, lerp_shape};
use crate::geometry::ArcShape;
use crate::theme::Rgb;
use crate::tree::NodeId;

/// An animatable visual attribute of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// The arc's path geometry.
    Path,
    /// Rotation of the arc's group, in degrees.
    Rotation,
    Opacity,
    Fill,
}

/// A value carried by a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Shape(ArcShape),
    Scalar(f64),
    Color(String),
}

impl AttrValue {
    /// Interpolate toward `to`. Mismatched kinds and unparseable colors snap
    /// to the target.
    pub fn interpolate(&self, to: &AttrValue, t: f64) -> AttrValue {
        match (self, to) {
            (AttrValue::Shape(a), AttrValue::Shape(b)) => AttrValue::Shape(lerp_shape(a, b, t)),
            (AttrValue::Scalar(a), AttrValue::Scalar(b)) => AttrValue::Scalar(lerp(*a, *b, t)),
            (AttrValue::Color(a), AttrValue::Color(b)) => match (Rgb::parse(a), Rgb::parse(b)) {
                (Some(a), Some(b)) => AttrValue::Color(a.lerp(b, t).to_hex()),
                _ => to.clone(),
            },
            _ => to.clone(),
        }
    }
}

/// Where the timeline reads start states from and writes frames to.
pub trait AttributeStore {
    fn read(&self, node: NodeId, channel: Channel) -> AttrValue;
    fn write(&mut self, node: NodeId, channel: Channel, value: AttrValue);
}

/// Handle for a group of transitions joined on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u32);

/// One requested attribute change.
#[derive(Debug, Clone)]
pub struct Transition {
    pub node: NodeId,
    pub channel: Channel,
    pub target: AttrValue,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
    pub batch: Option<BatchId>,
}

impl Transition {
    /// A 250 ms cubic-in-out transition starting immediately.
    pub fn new(node: NodeId, channel: Channel, target: AttrValue) -> Self {
        Self {
            node,
            channel,
            target,
            delay_ms: 0.0,
            duration_ms: 250.0,
            ease: Ease::default(),
            batch: None,
        }
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn batch(mut self, batch: BatchId) -> Self {
        self.batch = Some(batch);
        self
    }
}

#[derive(Debug)]
struct Pending {
    start_ms: f64,
    transition: Transition,
}

#[derive(Debug)]
struct Running {
    start_ms: f64,
    from: AttrValue,
    transition: Transition,
}

impl Running {
    fn progress(&self, now_ms: f64) -> f64 {
        if self.transition.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.transition.duration_ms).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
struct Slot {
    running: Option<Running>,
    pending: Option<Pending>,
}

/// The transition scheduler.
#[derive(Debug, Default)]
pub struct Timeline {
    slots: BTreeMap<(NodeId, Channel), Slot>,
    /// Outstanding transition count per open batch.
    batches: BTreeMap<BatchId, u32>,
    next_batch: u32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new batch. It settles on the first tick at which none of its
    /// transitions are outstanding, so an empty batch settles immediately.
    pub fn begin_batch(&mut self) -> BatchId {
        let id = BatchId(self.next_batch);
        self.next_batch += 1;
        self.batches.insert(id, 0);
        id
    }

    /// Schedule a transition relative to `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, transition: Transition) {
        if let Some(count) = transition.batch.and_then(|b| self.batches.get_mut(&b)) {
            *count += 1;
        }

        let key = (transition.node, transition.channel);
        let pending = Pending {
            start_ms: now_ms + transition.delay_ms,
            transition,
        };
        let replaced = self.slots.entry(key).or_default().pending.replace(pending);
        if let Some(old) = replaced {
            self.settle(old.transition.batch);
        }
    }

    /// Advance every slot to `now_ms`, writing current values into `store`.
    ///
    /// Returns the batches that settled during this tick, in creation order.
    pub fn tick<S: AttributeStore>(&mut self, now_ms: f64, store: &mut S) -> Vec<BatchId> {
        let mut finished: Vec<Option<BatchId>> = Vec::new();

        for (&(node, channel), slot) in self.slots.iter_mut() {
            if let Some(next) = slot.pending.take_if(|p| now_ms >= p.start_ms) {
                if let Some(interrupted) = slot.running.take() {
                    finished.push(interrupted.transition.batch);
                }
                slot.running = Some(Running {
                    start_ms: next.start_ms,
                    from: store.read(node, channel),
                    transition: next.transition,
                });
            }

            let Some(run) = slot.running.as_ref() else {
                continue;
            };
            let progress = run.progress(now_ms);
            if progress >= 1.0 {
                store.write(node, channel, run.transition.target.clone());
                finished.push(run.transition.batch);
                slot.running = None;
            } else {
                let eased = run.transition.ease.ease(progress);
                store.write(node, channel, run.from.interpolate(&run.transition.target, eased));
            }
        }

        self.slots
            .retain(|_, slot| slot.running.is_some() || slot.pending.is_some());
        for batch in finished {
            self.settle(batch);
        }

        let settled: Vec<BatchId> = self
            .batches
            .iter()
            .filter(|&(_, &outstanding)| outstanding == 0)
            .map(|(&id, _)| id)
            .collect();
        for id in &settled {
            self.batches.remove(id);
        }
        settled
    }

    fn settle(&mut self, batch: Option<BatchId>) {
        if let Some(count) = batch.and_then(|b| self.batches.get_mut(&b)) {
            *count = count.saturating_sub(1);
        }
    }

    /// Whether a transition is running or pending for this slot.
    pub fn is_animating(&self, node: NodeId, channel: Channel) -> bool {
        self.slots.contains_key(&(node, channel))
    }

    /// Whether nothing is running or pending anywhere.
    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }

    /// Outstanding transitions of an open batch, `None` once settled.
    pub fn outstanding(&self, batch: BatchId) -> Option<u32> {
        self.batches.get(&batch).copied()
    }
}
