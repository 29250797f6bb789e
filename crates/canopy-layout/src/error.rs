//! Layout errors.
//!
//! A failed layout aborts only that render attempt; the tree is never
//! touched by an adapter.

use thiserror::Error;

/// Errors raised when selecting or running a layout adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The layout identifier is not one of the known adapters.
    #[error("unknown layout: {0}")]
    UnknownLayout(String),

    /// A weight-based adapter found a node with no weight.
    #[error("node {id} has no weight; space-filling layouts require one")]
    MissingWeight {
        /// Offending node id.
        id: String,
    },

    /// A node's weight is negative or not finite.
    #[error("node {id} has invalid weight {weight}")]
    InvalidWeight {
        /// Offending node id.
        id: String,
        /// The rejected weight.
        weight: f64,
    },

    /// The canvas has no drawable area.
    #[error("canvas must have positive width and height")]
    EmptyCanvas,

    /// A node id referenced by an interaction does not exist.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}
