//! Node identifiers and per-node interaction flags.
//!
//! Every entry in the file tree gets:
//! - A stable identifier (its pre-order position, valid for the tree's lifetime)
//! - Interaction state (selection, highlight, hidden) kept outside the structure

use std::fmt;

use serde::Serialize;

/// Stable node identifier.
///
/// Ids are assigned in pre-order while the tree is built, so `NodeId(0)` is
/// always the root and a node's subtree occupies a contiguous id range.
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into per-node attribute vectors.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Printed as `#<pre-order position>` in logs and error messages.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node state flags packed into a single byte.
///
/// The default state is enabled, not highlighted, visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const DISABLED: u8 = 0b0000_0001;
    const HIDDEN: u8 = 0b0000_0010;
    const HIGHLIGHTED: u8 = 0b0000_0100;

    /// Create a new default node state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node matches the current search.
    #[inline]
    pub fn is_enabled(self) -> bool {
        self.flags & Self::DISABLED == 0
    }

    /// Set whether the node matches the current search.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.flags &= !Self::DISABLED;
        } else {
            self.flags |= Self::DISABLED;
        }
    }

    /// Check if the node is never drawn.
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    /// Set the hidden state.
    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden {
            self.flags |= Self::HIDDEN;
        } else {
            self.flags &= !Self::HIDDEN;
        }
    }

    /// Check if the node is part of a hovered subtree.
    #[inline]
    pub fn is_highlighted(self) -> bool {
        self.flags & Self::HIGHLIGHTED != 0
    }

    /// Set the highlighted state.
    #[inline]
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if highlighted {
            self.flags |= Self::HIGHLIGHTED;
        } else {
            self.flags &= !Self::HIGHLIGHTED;
        }
    }
}
