//! Single-rooted resource tree built from flat records.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Ids are assigned in input
//! order and never change for the life of a loaded dataset, so layouts and
//! sinks can key on them across toggles.

use crate::error::{LoadError, TreeError};
use crate::record::ResourceRecord;
use std::collections::{HashMap, VecDeque};

/// Default `BASE` in `weight = BASE - depth²`.
pub const DEFAULT_WEIGHT_BASE: f64 = 2000.0;

/// Floor applied when `BASE - depth²` would not be positive.
pub const MIN_WEIGHT: f64 = 1.0;

/// Index of a node in its [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index (equals the record's position in the input).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The child partition of a node.
///
/// A node's children are either all visible or all hidden; the tagged union
/// makes a mixed state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Children {
    Leaf,
    Expanded(Vec<NodeId>),
    Collapsed(Vec<NodeId>),
}

/// One resource in the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    record: ResourceRecord,
    parent: Option<NodeId>,
    depth: usize,
    weight: Option<f64>,
    pub(crate) children: Children,
}

impl TreeNode {
    /// The record's id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The owned record.
    #[must_use]
    pub fn record(&self) -> &ResourceRecord {
        &self.record
    }

    /// Label shown next to the node.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.record.display_name
    }

    /// Icon asset path.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.record.icon
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Synthetic weight for space-filling layouts, if derived.
    #[must_use]
    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Children currently eligible for layout.
    #[must_use]
    pub fn visible_children(&self) -> &[NodeId] {
        match &self.children {
            Children::Expanded(c) => c,
            Children::Leaf | Children::Collapsed(_) => &[],
        }
    }

    /// Children hidden by a collapse.
    #[must_use]
    pub fn hidden_children(&self) -> &[NodeId] {
        match &self.children {
            Children::Collapsed(c) => c,
            Children::Leaf | Children::Expanded(_) => &[],
        }
    }

    /// Every child regardless of collapse state, in input order.
    #[must_use]
    pub fn all_children(&self) -> &[NodeId] {
        match &self.children {
            Children::Expanded(c) | Children::Collapsed(c) => c,
            Children::Leaf => &[],
        }
    }

    /// True if the node has at least one child.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !matches!(self.children, Children::Leaf)
    }
}

/// Builds a [`Hierarchy`] from records.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder {
    weight_base: Option<f64>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self {
            weight_base: Some(DEFAULT_WEIGHT_BASE),
        }
    }
}

impl HierarchyBuilder {
    /// Builder deriving weights with [`DEFAULT_WEIGHT_BASE`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive weights as `base - depth²`.
    #[must_use]
    pub const fn weight_base(mut self, base: f64) -> Self {
        self.weight_base = Some(base);
        self
    }

    /// Skip weight derivation; weight-based layouts will reject the tree
    /// until weights are supplied with [`Hierarchy::set_weight`] or
    /// [`Hierarchy::reweigh`].
    #[must_use]
    pub const fn without_weights(mut self) -> Self {
        self.weight_base = None;
        self
    }

    /// Stratify records into a tree. All children start expanded.
    pub fn build(self, records: Vec<ResourceRecord>) -> Result<Hierarchy, LoadError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), NodeId(i)).is_some() {
                return Err(LoadError::DuplicateId(record.id.clone()));
            }
        }

        let roots: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_root())
            .map(|(i, _)| i)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(LoadError::NoRoot),
            [only] => *only,
            many => {
                return Err(LoadError::MultipleRoots(
                    many.iter().map(|&i| records[i].id.clone()).collect(),
                ))
            }
        };

        let mut parents = vec![None; records.len()];
        let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); records.len()];
        for (i, record) in records.iter().enumerate() {
            if i == root {
                continue;
            }
            let parent = index
                .get(&record.parent_id)
                .copied()
                .ok_or_else(|| LoadError::OrphanRecord {
                    id: record.id.clone(),
                    parent_id: record.parent_id.clone(),
                })?;
            parents[i] = Some(parent);
            children[parent.0].push(NodeId(i));
        }

        // Breadth-first from the root; anything not reached hangs off a cycle.
        let mut depths = vec![None; records.len()];
        depths[root] = Some(0usize);
        let mut queue = VecDeque::from([root]);
        while let Some(i) = queue.pop_front() {
            let depth = depths[i].unwrap_or(0);
            for child in &children[i] {
                depths[child.0] = Some(depth + 1);
                queue.push_back(child.0);
            }
        }
        if let Some(i) = depths.iter().position(Option::is_none) {
            return Err(LoadError::Cycle(records[i].id.clone()));
        }

        let nodes = records
            .into_iter()
            .zip(parents)
            .zip(depths)
            .zip(children)
            .map(|(((record, parent), depth), kids)| TreeNode {
                record,
                parent,
                depth: depth.unwrap_or(0),
                weight: None,
                children: if kids.is_empty() {
                    Children::Leaf
                } else {
                    Children::Expanded(kids)
                },
            })
            .collect();

        let mut tree = Hierarchy {
            nodes,
            root: NodeId(root),
            index,
        };
        if let Some(base) = self.weight_base {
            tree.reweigh(base);
        }
        tracing::debug!(nodes = tree.len(), height = tree.max_depth(), "built hierarchy");
        Ok(tree)
    }
}

/// Weight for a node at `depth`: `base - depth²`, floored at [`MIN_WEIGHT`].
#[must_use]
pub fn depth_weight(base: f64, depth: usize) -> f64 {
    let d = depth as f64;
    (base - d * d).max(MIN_WEIGHT)
}

/// An in-memory resource tree.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    root: NodeId,
    index: HashMap<String, NodeId>,
}

impl Hierarchy {
    /// Build with default settings.
    pub fn from_records(records: Vec<ResourceRecord>) -> Result<Self, LoadError> {
        HierarchyBuilder::new().build(records)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node's id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Node by arena id.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different hierarchy and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Look up a node by record id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Look up a node by record id, failing on unknown ids.
    pub fn resolve(&self, id: &str) -> Result<NodeId, TreeError> {
        self.get(id)
            .ok_or_else(|| TreeError::UnknownNode(id.to_string()))
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Iterate all nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Records in input order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.nodes.iter().map(|n| &n.record)
    }

    /// Visible nodes in pre-order, starting at the root.
    #[must_use]
    pub fn descendants(&self) -> Vec<NodeId> {
        self.walk(self.root, TreeNode::visible_children)
    }

    /// Visible nodes below and including `from`, in pre-order.
    #[must_use]
    pub fn descendants_of(&self, from: NodeId) -> Vec<NodeId> {
        self.walk(from, TreeNode::visible_children)
    }

    /// All nodes in pre-order, ignoring collapse state.
    #[must_use]
    pub fn all_descendants(&self) -> Vec<NodeId> {
        self.walk(self.root, TreeNode::all_children)
    }

    fn walk(&self, from: NodeId, children: fn(&TreeNode) -> &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(children(self.node(id)).iter().rev());
        }
        out
    }

    /// Visible parent/child pairs in pre-order of the child.
    #[must_use]
    pub fn links(&self) -> Vec<(NodeId, NodeId)> {
        self.descendants()
            .into_iter()
            .filter_map(|id| self.parent(id).map(|p| (p, id)))
            .collect()
    }

    /// Every parent/child pair, ignoring collapse state.
    #[must_use]
    pub fn all_links(&self) -> Vec<(NodeId, NodeId)> {
        self.all_descendants()
            .into_iter()
            .filter_map(|id| self.parent(id).map(|p| (p, id)))
            .collect()
    }

    /// Longest visible downward path from `id` (0 for a visible leaf).
    #[must_use]
    pub fn height(&self, id: NodeId) -> usize {
        let base = self.node(id).depth;
        self.descendants_of(id)
            .into_iter()
            .map(|d| self.node(d).depth - base)
            .max()
            .unwrap_or(0)
    }

    /// Deepest depth in the tree, ignoring collapse state.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Path from `id` up to the root, starting with `id`.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Slash-separated display path from the root, e.g. `Acme/Prod/web`.
    #[must_use]
    pub fn display_path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .map(|a| self.node(a).display_name())
            .collect();
        names.reverse();
        names.join("/")
    }

    /// The root's child on the path to `id`, or `None` for the root itself.
    #[must_use]
    pub fn branch_of(&self, id: NodeId) -> Option<NodeId> {
        let path = self.ancestors(id);
        (path.len() >= 2).then(|| path[path.len() - 2])
    }

    /// Re-derive every weight as `base - depth²`.
    ///
    /// Depths that would drive the weight to zero or below are floored at
    /// [`MIN_WEIGHT`], keeping weights strictly positive and non-increasing.
    pub fn reweigh(&mut self, base: f64) {
        let mut clamped = 0usize;
        for node in &mut self.nodes {
            let d = node.depth as f64;
            if base - d * d < MIN_WEIGHT {
                clamped += 1;
                if clamped == 1 {
                    tracing::warn!(
                        id = %node.record.id,
                        depth = node.depth,
                        base,
                        "weight base too small for tree depth; flooring weight"
                    );
                }
            }
            node.weight = Some(depth_weight(base, node.depth));
        }
        if clamped > 1 {
            tracing::warn!(nodes = clamped, "weights floored at minimum");
        }
    }

    /// Override one node's weight. `None` removes it.
    pub fn set_weight(&mut self, id: NodeId, weight: Option<f64>) {
        self.node_mut(id).weight = weight;
    }
}
