//! Palette resolution: category ordinal colors, special-name overrides and
//! per-node modifiers.
//!
//! # Resolution
//!
//! 1. Colors claimed by a special-name override are removed from the pool.
//! 2. Top-level category names without a special override are bound to pool
//!    colors in the order the tree lists them, cycling when the pool runs out. Any other key is bound
//!    the first time it is looked up, which happens in pre-order, so the
//!    mapping is the same on every run.
//! 3. A node's key is its own name if it is a directory and its parent's
//!    name if it is a file, so files share their directory's color.
//! 4. A special-name override beats the ordinal color unconditionally.
//! 5. The scheme's modifier gets the last word.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::color::Rgb;
use crate::tree::{NodeId, NodeView, TreeModel};

/// A color scheme as supplied by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// General pool, in ordinal assignment order.
    pub main: Vec<String>,
    /// Fixed colors for particular names.
    pub specials: BTreeMap<String, String>,
    /// Built-in modifier applied after resolution.
    pub modifier: ModifierKind,
    /// Strength of the depth shading modifier.
    pub shade: Option<f64>,
}

/// Built-in modifiers a host can select by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierKind {
    #[default]
    None,
    DepthShade,
}

/// Final per-node color transformation.
pub trait ColorModifier {
    fn modify(&self, node: NodeView<'_>, resolved: &str, root: NodeView<'_>) -> String;
}

/// Leaves resolved colors untouched.
pub struct Identity;

impl ColorModifier for Identity {
    fn modify(&self, _node: NodeView<'_>, resolved: &str, _root: NodeView<'_>) -> String {
        resolved.to_string()
    }
}

/// Darkens outer rings, proportionally to how deep they sit below the root.
pub struct DepthShade {
    pub strength: f64,
}

impl ColorModifier for DepthShade {
    fn modify(&self, node: NodeView<'_>, resolved: &str, root: NodeView<'_>) -> String {
        let span = root.tree().max_depth().saturating_sub(root.depth());
        let Some(color) = Rgb::parse(resolved) else {
            return resolved.to_string();
        };
        if span == 0 {
            return resolved.to_string();
        }
        let fraction = node.depth().saturating_sub(root.depth()) as f64 / span as f64;
        color.darker(fraction * self.strength).to_hex()
    }
}

/// Ordinal name → color mapping over the unclaimed pool.
pub struct ColorScale {
    pool: Vec<String>,
    specials: HashMap<String, String>,
    domain: HashMap<String, usize>,
    fallback: String,
}

impl ColorScale {
    /// Build the scale, binding `categories` in the given order. Names with a
    /// special override never take an ordinal slot.
    pub fn new(palette: &Palette, categories: &[&str], fallback: impl Into<String>) -> Self {
        let claimed: HashSet<String> = palette
            .specials
            .values()
            .map(|c| c.to_lowercase())
            .collect();
        let pool: Vec<String> = palette
            .main
            .iter()
            .filter(|c| !claimed.contains(&c.to_lowercase()))
            .cloned()
            .collect();

        if pool.is_empty() && !palette.main.is_empty() {
            tracing::warn!("every palette color is claimed by a special name; using fallback");
        }

        let mut scale = Self {
            pool,
            specials: palette
                .specials
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            domain: HashMap::new(),
            fallback: fallback.into(),
        };
        for name in categories {
            if !scale.specials.contains_key(*name) {
                scale.ordinal(name);
            }
        }
        scale
    }

    /// Colors left for ordinal assignment.
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    fn ordinal(&mut self, key: &str) -> String {
        if self.pool.is_empty() {
            return self.fallback.clone();
        }
        let next = self.domain.len();
        let slot = *self.domain.entry(key.to_string()).or_insert(next);
        self.pool[slot % self.pool.len()].clone()
    }

    /// Color for a key: a special override if one exists, else its ordinal color.
    pub fn resolve(&mut self, key: &str) -> String {
        if let Some(color) = self.specials.get(key) {
            return color.clone();
        }
        self.ordinal(key)
    }
}

/// The name whose color a node takes: its own for directories, its
/// parent's for files.
pub fn color_key(tree: &TreeModel, id: NodeId) -> &str {
    if tree.is_leaf(id) {
        if let Some(parent) = tree.parent(id) {
            return tree.name(parent);
        }
    }
    tree.name(id)
}

/// A resolved scheme: scale plus modifier.
pub struct Theme {
    scale: ColorScale,
    modifier: Box<dyn ColorModifier>,
}

impl Theme {
    pub fn new(scale: ColorScale, modifier: Box<dyn ColorModifier>) -> Self {
        Self { scale, modifier }
    }

    /// Resolve a host palette against a tree's top-level categories.
    pub fn from_palette(palette: &Palette, tree: &TreeModel, fallback: &str) -> Self {
        let scale = ColorScale::new(palette, &tree.first_level_names(), fallback);
        let modifier: Box<dyn ColorModifier> = match palette.modifier {
            ModifierKind::None => Box::new(Identity),
            ModifierKind::DepthShade => Box::new(DepthShade {
                strength: palette.shade.unwrap_or(1.0),
            }),
        };
        Self::new(scale, modifier)
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Final color of one node.
    pub fn color_for(&mut self, tree: &TreeModel, id: NodeId) -> String {
        let resolved = self.scale.resolve(color_key(tree, id));
        self.modifier
            .modify(tree.view(id), &resolved, tree.view(tree.root()))
    }

    /// Colors for every node, indexed by `NodeId`, resolved in pre-order.
    pub fn paint(&mut self, tree: &TreeModel) -> Vec<String> {
        tree.preorder()
            .iter()
            .map(|&id| self.color_for(tree, id))
            .collect()
    }
}
