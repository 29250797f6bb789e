//! Per-node collapse/expand state.
//!
//! Toggling moves a node's whole child list between the visible and hidden
//! sides of its partition. State is per node: re-expanding a parent leaves
//! every descendant exactly as it was.

use crate::error::TreeError;
use crate::hierarchy::{Children, Hierarchy, NodeId};
use serde::{Deserialize, Serialize};

/// Observable state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandState {
    /// No children; toggling has no effect.
    Leaf,
    /// Children are visible.
    Expanded,
    /// Children are hidden.
    Collapsed,
}

impl Children {
    fn state(&self) -> ExpandState {
        match self {
            Self::Leaf => ExpandState::Leaf,
            Self::Expanded(_) => ExpandState::Expanded,
            Self::Collapsed(_) => ExpandState::Collapsed,
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Leaf => Self::Leaf,
            Self::Expanded(c) => Self::Collapsed(c),
            Self::Collapsed(c) => Self::Expanded(c),
        }
    }

    fn collapsed(self) -> Self {
        match self {
            Self::Expanded(c) | Self::Collapsed(c) => Self::Collapsed(c),
            Self::Leaf => Self::Leaf,
        }
    }

    fn expanded(self) -> Self {
        match self {
            Self::Expanded(c) | Self::Collapsed(c) => Self::Expanded(c),
            Self::Leaf => Self::Leaf,
        }
    }
}

impl Hierarchy {
    /// Current state of a node.
    #[must_use]
    pub fn state(&self, id: NodeId) -> ExpandState {
        self.node(id).children.state()
    }

    /// True if the node has hidden children.
    #[must_use]
    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.state(id) == ExpandState::Collapsed
    }

    /// Flip a node between expanded and collapsed. Leaves are unaffected.
    ///
    /// Returns the node's new state.
    pub fn toggle(&mut self, id: NodeId) -> ExpandState {
        self.replace_children(id, Children::flipped)
    }

    /// [`Hierarchy::toggle`] addressed by record id.
    pub fn toggle_id(&mut self, id: &str) -> Result<ExpandState, TreeError> {
        let node = self.resolve(id)?;
        let state = self.toggle(node);
        tracing::debug!(id, ?state, "toggled node");
        Ok(state)
    }

    /// Collapse `id` and every node beneath it that has children.
    pub fn collapse_all(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.replace_children(current, Children::collapsed);
            stack.extend_from_slice(self.node(current).all_children());
        }
    }

    /// The initial view after a load: the root open, everything below closed.
    pub fn collapse_below_root(&mut self) {
        let root = self.root();
        self.replace_children(root, Children::expanded);
        for child in self.node(root).all_children().to_vec() {
            self.collapse_all(child);
        }
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        for id in self.all_descendants() {
            self.replace_children(id, Children::expanded);
        }
    }

    fn replace_children(&mut self, id: NodeId, f: fn(Children) -> Children) -> ExpandState {
        let node = self.node_mut(id);
        let children = std::mem::replace(&mut node.children, Children::Leaf);
        node.children = f(children);
        node.children.state()
    }
}
