//! TreeModel - the immutable file-size hierarchy.
//!
//! The hierarchy is stored in petgraph's StableGraph with parent→child edges.
//! Nodes are inserted in pre-order, so a node's graph index, its `NodeId`
//! and its position in the traversal order all coincide. Derived
//! relationships (ordered children, parent, subtree extent) are cached
//! once at construction because the structure never changes afterwards.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};
use serde::Deserialize;
use std::str::FromStr;

use super::node::NodeId;
use crate::error::SunburstError;

/// The hierarchy as supplied by the host page: `{name, size, children?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeInput {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub children: Option<Vec<TreeInput>>,
}

impl TreeInput {
    /// A file entry.
    pub fn leaf(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            children: None,
        }
    }

    /// A directory entry. Its size is derived from the children.
    pub fn dir(name: impl Into<String>, children: Vec<TreeInput>) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            size,
            children: Some(children),
        }
    }
}

/// Structural data for one file or directory.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// File or directory name.
    pub name: String,
    /// Byte count. For directories, the sum over all descendants.
    pub size: u64,
    /// Distance from the root.
    pub depth: u32,
    /// Position among the parent's children, in input order.
    pub sibling_index: u32,
}

/// How node weights are derived for angular proportioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// Leaves weigh their byte count.
    #[default]
    Size,
    /// Every leaf weighs 1.
    Count,
}

impl WeightMode {
    /// Weight of a leaf node. Internal weights are always the sum of their
    /// children and never come from here.
    #[inline]
    pub fn leaf_weight(self, node: &TreeNode) -> f64 {
        match self {
            WeightMode::Size => node.size as f64,
            WeightMode::Count => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightMode::Size => "size",
            WeightMode::Count => "count",
        }
    }
}

impl FromStr for WeightMode {
    type Err = SunburstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "size" => Ok(WeightMode::Size),
            "count" => Ok(WeightMode::Count),
            other => Err(SunburstError::UnknownMode(other.to_string())),
        }
    }
}

/// Borrowed view of a single node, handed to pluggable strategies.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a TreeModel,
    id: NodeId,
}

impl<'a> NodeView<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        self.tree.name(self.id)
    }

    pub fn size(&self) -> u64 {
        self.tree.size(self.id)
    }

    pub fn depth(&self) -> u32 {
        self.tree.depth(self.id)
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.is_leaf(self.id)
    }

    pub fn parent(&self) -> Option<NodeView<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.view(id))
    }

    pub fn tree(&self) -> &'a TreeModel {
        self.tree
    }
}

/// The file tree.
pub struct TreeModel {
    /// Node arena; edges point from parent to child.
    graph: StableGraph<TreeNode, (), Directed>,

    /// Children of each node in input order.
    children: Vec<Vec<NodeId>>,

    /// Parent of each node (non-owning back reference).
    parents: Vec<Option<NodeId>>,

    /// Number of nodes in each node's subtree, itself included.
    subtree_len: Vec<u32>,

    /// Pre-order traversal (identical to id order).
    order: Vec<NodeId>,

    /// Deepest depth observed.
    max_depth: u32,
}

impl TreeModel {
    /// Build the model from host input.
    ///
    /// Directory sizes are recomputed bottom-up from their leaves so that
    /// `size(dir) == Σ size(children)` holds regardless of the input.
    pub fn from_input(input: &TreeInput) -> Self {
        let mut model = Self {
            graph: StableGraph::new(),
            children: Vec::new(),
            parents: Vec::new(),
            subtree_len: Vec::new(),
            order: Vec::new(),
            max_depth: 0,
        };

        model.insert(input, None, 0, 0);
        model.derive_relations();
        model.accumulate_sizes();

        tracing::debug!(
            nodes = model.len(),
            max_depth = model.max_depth,
            "built tree model"
        );
        model
    }

    fn insert(
        &mut self,
        input: &TreeInput,
        parent: Option<NodeIndex>,
        depth: u32,
        sibling_index: u32,
    ) -> NodeIndex {
        let index = self.graph.add_node(TreeNode {
            name: input.name.clone(),
            size: input.size,
            depth,
            sibling_index,
        });
        if let Some(parent) = parent {
            self.graph.add_edge(parent, index, ());
        }
        self.max_depth = self.max_depth.max(depth);

        if let Some(children) = &input.children {
            for (i, child) in children.iter().enumerate() {
                self.insert(child, Some(index), depth + 1, i as u32);
            }
        }
        index
    }

    fn derive_relations(&mut self) {
        let n = self.graph.node_count();
        self.order = (0..n as u32).map(NodeId).collect();
        self.parents = Vec::with_capacity(n);
        self.children = Vec::with_capacity(n);

        for i in 0..n {
            let index = NodeIndex::new(i);
            let parent = self
                .graph
                .neighbors_directed(index, Direction::Incoming)
                .next()
                .map(|p| NodeId(p.index() as u32));
            self.parents.push(parent);

            // petgraph yields neighbors newest-first; restore input order.
            let mut kids: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(index, Direction::Outgoing)
                .collect();
            kids.sort_by_key(|&k| self.graph[k].sibling_index);
            self.children
                .push(kids.into_iter().map(|k| NodeId(k.index() as u32)).collect());
        }

        self.subtree_len = vec![1; n];
        for i in (0..n).rev() {
            if let Some(parent) = self.parents[i] {
                self.subtree_len[parent.idx()] += self.subtree_len[i];
            }
        }
    }

    fn accumulate_sizes(&mut self) {
        for i in (0..self.order.len()).rev() {
            if self.children[i].is_empty() {
                continue;
            }
            let total: u64 = self.children[i]
                .iter()
                .map(|c| self.graph[NodeIndex::new(c.idx())].size)
                .sum();
            let node = &mut self.graph[NodeIndex::new(i)];
            if node.size != total {
                tracing::debug!(name = %node.name, given = node.size, total, "directory size replaced by sum of children");
                node.size = total;
            }
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// A tree always has its root; kept for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` refers to a node of this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.order.len()
    }

    /// Structural data of a node.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.graph.node_weight(NodeIndex::new(id.idx()))
    }

    /// Borrowed view of a node for strategy callbacks.
    pub fn view(&self, id: NodeId) -> NodeView<'_> {
        NodeView { tree: self, id }
    }

    /// Pre-order traversal: parent before children, siblings in input order.
    #[inline]
    pub fn preorder(&self) -> &[NodeId] {
        &self.order
    }

    /// The node and all of its descendants, in pre-order.
    pub fn subtree(&self, id: NodeId) -> &[NodeId] {
        let start = id.idx();
        &self.order[start..start + self.subtree_len[start] as usize]
    }

    /// Children in input order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.idx()]
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.idx()]
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children[id.idx()].is_empty()
    }

    #[inline]
    pub fn depth(&self, id: NodeId) -> u32 {
        self.graph[NodeIndex::new(id.idx())].depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn name(&self, id: NodeId) -> &str {
        &self.graph[NodeIndex::new(id.idx())].name
    }

    #[inline]
    pub fn size(&self, id: NodeId) -> u64 {
        self.graph[NodeIndex::new(id.idx())].size
    }

    /// Names of the root's children in input order - the top-level categories.
    pub fn first_level_names(&self) -> Vec<&str> {
        self.children(self.root())
            .iter()
            .map(|&c| self.name(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeModel {
        TreeModel::from_input(&TreeInput::dir(
            "root",
            vec![
                TreeInput::dir(
                    "src",
                    vec![TreeInput::leaf("app.js", 40), TreeInput::leaf("util.js", 10)],
                ),
                TreeInput::leaf("README.md", 5),
                TreeInput::dir("docs", vec![TreeInput::leaf("guide.md", 7)]),
            ],
        ))
    }

    #[test]
    fn test_preorder_parent_before_children() {
        let tree = sample();
        let names: Vec<_> = tree.preorder().iter().map(|&id| tree.name(id)).collect();
        assert_eq!(
            names,
            ["root", "src", "app.js", "util.js", "README.md", "docs", "guide.md"]
        );
        for &id in tree.preorder() {
            if let Some(parent) = tree.parent(id) {
                assert!(parent < id);
            }
        }
    }

    #[test]
    fn test_children_keep_input_order() {
        let tree = sample();
        let kids: Vec<_> = tree
            .children(tree.root())
            .iter()
            .map(|&id| tree.name(id))
            .collect();
        assert_eq!(kids, ["src", "README.md", "docs"]);
        assert_eq!(tree.first_level_names(), ["src", "README.md", "docs"]);
    }

    #[test]
    fn test_depths_and_max_depth() {
        let tree = sample();
        assert_eq!(tree.depth(tree.root()), 0);
        assert_eq!(tree.depth(NodeId(1)), 1);
        assert_eq!(tree.depth(NodeId(2)), 2);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_subtree_is_contiguous() {
        let tree = sample();
        assert_eq!(tree.subtree(NodeId(1)), &[NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(tree.subtree(NodeId(4)), &[NodeId(4)]);
        assert_eq!(tree.subtree(tree.root()).len(), tree.len());
    }

    #[test]
    fn test_directory_sizes_sum_children() {
        let mut input = TreeInput::dir(
            "root",
            vec![TreeInput::leaf("a", 10), TreeInput::leaf("b", 20)],
        );
        // A stale directory size from the host is corrected.
        input.size = 999;
        let tree = TreeModel::from_input(&input);
        assert_eq!(tree.size(tree.root()), 30);

        let tree = sample();
        assert_eq!(tree.size(NodeId(1)), 50);
        assert_eq!(tree.size(tree.root()), 62);
    }

    #[test]
    fn test_empty_children_is_leaf() {
        let input = TreeInput {
            name: "root".into(),
            size: 3,
            children: Some(Vec::new()),
        };
        let tree = TreeModel::from_input(&input);
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.size(tree.root()), 3);
        assert_eq!(tree.max_depth(), 0);
    }

    #[test]
    fn test_weight_mode_parse() {
        assert_eq!("size".parse::<WeightMode>().ok(), Some(WeightMode::Size));
        assert_eq!("count".parse::<WeightMode>().ok(), Some(WeightMode::Count));
        assert!("bytes".parse::<WeightMode>().is_err());
    }

    #[test]
    fn test_node_view() {
        let tree = sample();
        let view = tree.view(NodeId(2));
        assert_eq!(view.name(), "app.js");
        assert_eq!(view.size(), 40);
        assert!(view.is_leaf());
        assert_eq!(view.parent().map(|p| p.name()), Some("src"));
    }
}
