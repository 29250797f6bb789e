//! Proptest strategies for inventories.

use crate::fixture::InventoryBuilder;
use canopy_core::{Hierarchy, ResourceRecord};
use proptest::prelude::*;
use proptest::sample::Index;

const TYPES: [&str; 6] = ["folder", "project", "bucket", "disk", "instance", "appengine_app"];

/// Valid record sets of 1 to `max_nodes` records.
///
/// Record `i` (for `i > 0`) picks its parent among records `0..i`, so the
/// result is always a single-rooted tree in input order.
pub fn arb_records(max_nodes: usize) -> impl Strategy<Value = Vec<ResourceRecord>> {
    (1..=max_nodes.max(1))
        .prop_flat_map(|n| prop::collection::vec((any::<Index>(), any::<Index>()), n - 1))
        .prop_map(|picks| {
            let mut builder = InventoryBuilder::new().org("n0", "root");
            for (i, (parent, ty)) in picks.iter().enumerate() {
                let id = i + 1;
                let parent = parent.index(id);
                builder = builder.row(
                    &format!("n{id}"),
                    *ty.get(&TYPES),
                    &format!("n{parent}"),
                    &format!("node {id}"),
                );
            }
            builder.records()
        })
}

/// Fully expanded trees of 1 to `max_nodes` nodes.
pub fn arb_hierarchy(max_nodes: usize) -> impl Strategy<Value = Hierarchy> {
    arb_records(max_nodes)
        .prop_map(|records| Hierarchy::from_records(records).expect("generated records are valid"))
}
