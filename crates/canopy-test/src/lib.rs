#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::manual_assert)]
//! Test support for Canopy crates.
//!
//! - [`fixture`]: sample inventories and a fluent [`InventoryBuilder`]
//! - [`strategy`]: proptest strategies producing valid record sets
//! - [`invariants`]: structural assertions every built tree must satisfy

pub mod fixture;
pub mod invariants;
pub mod strategy;

pub use fixture::{acme_inventory, acme_records, chain, InventoryBuilder, ACME_CSV};
pub use invariants::{assert_tree_invariants, child_ids};
pub use strategy::{arb_hierarchy, arb_records};
