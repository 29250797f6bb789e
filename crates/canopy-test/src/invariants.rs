//! Structural assertions for built trees.

use canopy_core::{Hierarchy, NodeId};
use std::collections::HashSet;

/// Record ids of a node's visible children, in order.
pub fn child_ids(tree: &Hierarchy, id: NodeId) -> Vec<String> {
    tree.node(id)
        .visible_children()
        .iter()
        .map(|&c| tree.node(c).id().to_string())
        .collect()
}

/// Panic unless `tree` satisfies every structural invariant:
/// - exactly one root, with an empty parent reference and depth 0
/// - each node's children point back at it and sit one level deeper
/// - visible and hidden children never both populated
/// - every node reachable from the root exactly once
pub fn assert_tree_invariants(tree: &Hierarchy) {
    let root = tree.root();
    assert!(tree.parent(root).is_none(), "root has a parent");
    assert_eq!(tree.node(root).depth(), 0, "root depth");
    assert!(tree.node(root).record().parent_id.is_empty(), "root parent id");

    let roots = tree.iter().filter(|(_, n)| n.parent().is_none()).count();
    assert_eq!(roots, 1, "exactly one root");

    for (id, node) in tree.iter() {
        assert!(
            node.visible_children().is_empty() || node.hidden_children().is_empty(),
            "node {} has both visible and hidden children",
            node.id()
        );
        for &child in node.all_children() {
            assert_eq!(tree.parent(child), Some(id), "child {} parent", tree.node(child).id());
            assert_eq!(tree.node(child).depth(), node.depth() + 1, "child depth");
            assert_eq!(tree.node(child).record().parent_id, node.id(), "parent id");
        }
        assert_eq!(
            tree.ancestors(id).len(),
            node.depth() + 1,
            "parent chain length of {}",
            node.id()
        );
    }

    let all = tree.all_descendants();
    let unique: HashSet<NodeId> = all.iter().copied().collect();
    assert_eq!(all.len(), tree.len(), "every node reachable");
    assert_eq!(unique.len(), tree.len(), "no node reached twice");
}
