#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
//! Core types for Canopy.
//!
//! This crate turns a header-less inventory export into a single-rooted
//! resource tree and owns the tree's collapse/expand state:
//! - Records and parsing: [`ResourceRecord`], [`RowParser`], [`IconTable`]
//! - CSV in and out: [`read_records`], [`write_records`], [`RecordFilter`]
//! - The tree: [`Hierarchy`], [`HierarchyBuilder`], [`TreeNode`]
//! - Interaction: [`Hierarchy::toggle`], [`Hierarchy::collapse_all`]
//! - Drawing primitives shared with layouts: [`Point`], [`Rect`], [`Circle`], [`Color`], [`Easing`]
//!
//! # Example
//!
//! ```
//! use canopy_core::{read_str, Hierarchy, RowParser};
//!
//! let csv = "1,organization,,o1,,AcmeCo,\n2,project,,p1,1,,Proj2\n";
//! let records = read_str(csv, &RowParser::new()).unwrap();
//! let mut tree = Hierarchy::from_records(records).unwrap();
//!
//! let root = tree.root();
//! tree.collapse_all(root);
//! assert_eq!(tree.descendants().len(), 1);
//! tree.toggle(root);
//! assert_eq!(tree.descendants().len(), 2);
//! ```

mod collapse;
mod color;
mod easing;
mod error;
mod geometry;
mod hierarchy;
mod inventory;
mod record;

pub use collapse::ExpandState;
pub use color::{Color, OrdinalScale, SequentialScale};
pub use easing::{lerp, Easing};
pub use error::{LoadError, TreeError};
pub use geometry::{Circle, Point, Rect, Size};
pub use hierarchy::{
    depth_weight, Hierarchy, HierarchyBuilder, NodeId, TreeNode, DEFAULT_WEIGHT_BASE, MIN_WEIGHT,
};
pub use inventory::{read_path, read_records, read_str, to_csv_string, write_records, RecordFilter};
pub use record::{parse_row, IconTable, ResourceKind, ResourceRecord, RowParser, ORGANIZATION, ROW_FIELDS};
