//! Search overlay: marks nodes whose names match a query.
//!
//! Matching never changes layout. It only flips each node's `enabled` flag,
//! which the chart turns into an opacity transition.

mod caption;

pub use caption::{Caption, MULTIPLE_FOUND};

use regex::{Regex, RegexBuilder};

use crate::tree::{NodeId, NodeState, TreeModel};

/// A parsed search query.
#[derive(Debug, Clone)]
pub enum Query {
    /// Empty input: everything matches.
    All,
    /// Case-insensitive pattern over node names.
    Pattern(Regex),
    /// The input did not compile; nothing matches.
    Invalid,
}

impl Query {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Query::All;
        }
        match RegexBuilder::new(text).case_insensitive(true).build() {
            Ok(re) => Query::Pattern(re),
            Err(err) => {
                tracing::debug!(query = text, %err, "search pattern rejected");
                Query::Invalid
            }
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Query::All)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Query::All => true,
            Query::Pattern(re) => re.is_match(name),
            Query::Invalid => false,
        }
    }
}

/// Result of one search pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Matching nodes in pre-order.
    pub found: Vec<NodeId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

/// Set `enabled` on every node (internal nodes included) and collect matches.
///
/// `states` is indexed by `NodeId` and must cover the whole tree.
pub fn select(tree: &TreeModel, query: &Query, states: &mut [NodeState]) -> Selection {
    let mut found = Vec::new();
    for &id in tree.preorder() {
        let hit = query.matches(tree.name(id));
        states[id.idx()].set_enabled(hit);
        if hit {
            found.push(id);
        }
    }
    Selection { found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeInput;

    fn project() -> TreeModel {
        TreeModel::from_input(&TreeInput::dir(
            "root",
            vec![
                TreeInput::dir(
                    "src",
                    vec![TreeInput::leaf("app.js", 40), TreeInput::leaf("util.js", 10)],
                ),
                TreeInput::dir("test", vec![TreeInput::leaf("App.test.js", 6)]),
                TreeInput::leaf("README.md", 5),
            ],
        ))
    }

    fn run(tree: &TreeModel, text: &str) -> (Selection, Vec<NodeState>) {
        let mut states = vec![NodeState::default(); tree.len()];
        let selection = select(tree, &Query::parse(text), &mut states);
        (selection, states)
    }

    #[test]
    fn test_empty_query_enables_everything() {
        let tree = project();
        let mut states = vec![NodeState::default(); tree.len()];
        select(&tree, &Query::parse("zzz"), &mut states);
        assert!(states.iter().all(|s| !s.is_enabled()));

        let selection = select(&tree, &Query::parse("   "), &mut states);
        assert!(states.iter().all(|s| s.is_enabled()));
        assert_eq!(selection.len(), tree.len());
    }

    #[test]
    fn test_single_match_caption() {
        let tree = project();
        let (selection, states) = run(&tree, "^app\\.js$");
        assert_eq!(selection.found, vec![NodeId(2)]);
        assert!(states[2].is_enabled());
        assert!(!states[1].is_enabled());

        let caption = Caption::for_selection(&tree, &selection);
        assert_eq!(caption.title, "app.js");
        assert_eq!(caption.bytes, 40);
        assert!(!caption.total);
    }

    #[test]
    fn test_multiple_matches_sum_sizes() {
        let tree = project();
        let (selection, _) = run(&tree, "app|util");
        assert_eq!(selection.found, vec![NodeId(2), NodeId(3), NodeId(5)]);

        let caption = Caption::for_selection(&tree, &selection);
        assert_eq!(caption.title, MULTIPLE_FOUND);
        assert_eq!(caption.bytes, 56);
        assert!(caption.total);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let tree = project();
        let (selection, _) = run(&tree, "readme");
        assert_eq!(selection.found, vec![NodeId(6)]);
    }

    #[test]
    fn test_internal_nodes_match_too() {
        let tree = project();
        let (selection, states) = run(&tree, "^src$");
        assert_eq!(selection.found, vec![NodeId(1)]);
        assert!(!states[2].is_enabled());
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        let tree = project();
        let (selection, states) = run(&tree, "app(");
        assert!(selection.is_empty());
        assert!(states.iter().all(|s| !s.is_enabled()));

        let caption = Caption::for_selection(&tree, &selection);
        assert_eq!(caption.title, MULTIPLE_FOUND);
        assert_eq!(caption.bytes, 0);
    }
}
