//! Flat, index-addressed copy of the tree that a layout walks.
//!
//! Nodes are stored in pre-order, so index 0 is the root and every parent
//! precedes its children. Walking the indices in reverse visits children
//! before parents.

use crate::error::LayoutError;
use crate::geometry::NodeLabel;
use canopy_core::{Hierarchy, NodeId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(crate) struct SnapNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) depth: usize,
    /// Own weight plus the values of all children. Zero when unweighted.
    pub(crate) value: f64,
    /// Longest downward path to a leaf.
    pub(crate) height: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub(crate) nodes: Vec<SnapNode>,
}

impl Snapshot {
    /// Visible nodes only; no weights required.
    pub(crate) fn visible(tree: &Hierarchy) -> Self {
        Self::collect(tree, tree.descendants(), |tree, id| {
            tree.node(id).visible_children()
        })
    }

    /// Visible nodes with accumulated values.
    ///
    /// Fails on the first node (in pre-order) without a usable weight.
    pub(crate) fn weighted(tree: &Hierarchy) -> Result<Self, LayoutError> {
        let mut snap = Self::visible(tree);
        let mut weights = Vec::with_capacity(snap.nodes.len());
        for node in &snap.nodes {
            let record = tree.node(node.id);
            let weight = record.weight().ok_or_else(|| LayoutError::MissingWeight {
                id: record.id().to_string(),
            })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(LayoutError::InvalidWeight {
                    id: record.id().to_string(),
                    weight,
                });
            }
            weights.push(weight);
        }
        for i in (0..snap.nodes.len()).rev() {
            let sum: f64 = snap.nodes[i]
                .children
                .iter()
                .map(|&c| snap.nodes[c].value)
                .sum();
            snap.nodes[i].value = weights[i] + sum;
        }
        Ok(snap)
    }

    fn collect<'t>(
        tree: &'t Hierarchy,
        order: Vec<NodeId>,
        children_of: impl Fn(&'t Hierarchy, NodeId) -> &'t [NodeId],
    ) -> Self {
        let index: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut nodes: Vec<SnapNode> = order
            .iter()
            .map(|&id| SnapNode {
                id,
                parent: None,
                children: children_of(tree, id)
                    .iter()
                    .filter_map(|c| index.get(c).copied())
                    .collect(),
                depth: tree.node(id).depth(),
                value: 0.0,
                height: 0,
            })
            .collect();
        for i in 0..nodes.len() {
            for c in nodes[i].children.clone() {
                nodes[c].parent = Some(i);
            }
        }
        for i in (0..nodes.len()).rev() {
            nodes[i].height = nodes[i]
                .children
                .iter()
                .map(|&c| nodes[c].height + 1)
                .max()
                .unwrap_or(0);
        }
        Self { nodes }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Order every child list by descending value. Ties keep input order.
    pub(crate) fn sort_by_value(&mut self) {
        let values: Vec<f64> = self.nodes.iter().map(|n| n.value).collect();
        for node in &mut self.nodes {
            node.children
                .sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        }
    }

    /// Children before parents, siblings left to right.
    pub(crate) fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![0];
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend_from_slice(&self.nodes[i].children);
        }
        order.reverse();
        order
    }

    /// Index of the root's child on the path to `i`.
    pub(crate) fn branch(&self, mut i: usize) -> Option<usize> {
        while let Some(parent) = self.nodes[i].parent {
            if parent == 0 {
                return Some(i);
            }
            i = parent;
        }
        None
    }

    pub(crate) fn label(&self, tree: &Hierarchy, i: usize) -> NodeLabel {
        NodeLabel::of(tree, self.nodes[i].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::parse_row;

    fn tree() -> Hierarchy {
        let rows = [
            ["1", "organization", "", "", "", "Acme", ""],
            ["2", "folder", "", "", "1", "Prod", ""],
            ["3", "project", "", "", "2", "web", ""],
            ["4", "project", "", "", "1", "ops", ""],
        ];
        Hierarchy::from_records(rows.iter().map(|r| parse_row(r).unwrap()).collect()).unwrap()
    }

    #[test]
    fn test_weighted_values_accumulate() {
        let snap = Snapshot::weighted(&tree()).unwrap();
        // weights: 2000, 1999, 1996, 1999
        assert!((snap.nodes[0].value - 7994.0).abs() < 1e-9);
        assert!((snap.nodes[1].value - 3995.0).abs() < 1e-9);
        assert_eq!(snap.nodes[0].height, 2);
        assert_eq!(snap.nodes[2].parent, Some(1));
    }

    #[test]
    fn test_visible_skips_hidden() {
        let mut t = tree();
        let folder = t.get("2").unwrap();
        t.toggle(folder);
        let snap = Snapshot::visible(&t);
        assert_eq!(snap.len(), 3);
        assert!(snap.nodes[1].children.is_empty());
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_missing_weight_is_fatal() {
        let mut t = tree();
        let project = t.get("3").unwrap();
        t.set_weight(project, None);
        assert_eq!(
            Snapshot::weighted(&t).unwrap_err(),
            LayoutError::MissingWeight { id: "3".into() }
        );
    }

    #[test]
    fn test_post_order_and_branch() {
        let snap = Snapshot::visible(&tree());
        assert_eq!(snap.post_order(), vec![2, 1, 3, 0]);
        assert_eq!(snap.branch(2), Some(1));
        assert_eq!(snap.branch(0), None);
    }

    #[test]
    fn test_sort_by_value_is_stable() {
        let mut snap = Snapshot::weighted(&tree()).unwrap();
        snap.sort_by_value();
        assert_eq!(snap.nodes[0].children, vec![1, 3]);
    }
}
