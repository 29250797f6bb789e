#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Layout adapters for Canopy.
//!
//! Every adapter consumes a [`canopy_core::Hierarchy`] snapshot and produces
//! serializable [`Geometry`]. Adapters are pure: they never touch the tree's
//! collapse state and can be re-run after any toggle.
//!
//! | id | adapter | draws |
//! |----|---------|-------|
//! | `collapsible-tree` | [`TreeLayout`] | visible nodes |
//! | `force-graph` | [`ForceLayout`] | every node |
//! | `sunburst` | [`SunburstLayout`] | visible nodes, weighted |
//! | `circle-pack` | [`PackLayout`] | visible nodes, weighted |
//! | `circle-pack-colored` | [`PackLayout`] | visible nodes, weighted |
//! | `treemap` | [`TreemapLayout`] | visible nodes, weighted |
//!
//! # Example
//!
//! ```
//! use canopy_core::{read_str, Hierarchy, RowParser};
//! use canopy_layout::{layout_by_id, Geometry, LayoutSettings};
//!
//! let csv = "1,organization,,o1,,AcmeCo,\n2,project,,p1,1,,Proj2\n";
//! let tree = Hierarchy::from_records(read_str(csv, &RowParser::new()).unwrap()).unwrap();
//!
//! let geometry = layout_by_id("treemap", &tree, &LayoutSettings::default()).unwrap();
//! assert!(matches!(geometry, Geometry::Treemap(_)));
//! assert!(layout_by_id("pie", &tree, &LayoutSettings::default()).is_err());
//! ```

mod adapter;
mod error;
mod force;
mod geometry;
mod kind;
mod pack;
mod random;
mod settings;
mod snapshot;
mod sunburst;
mod tree;
mod treemap;

pub use adapter::{adapter_for, layout_by_id, LayoutAdapter};
pub use error::LayoutError;
pub use force::{ForceLayout, Simulation};
pub use geometry::{
    Arc, ArcExtent, ForceGeometry, ForceLink, ForceNode, Geometry, LinkPath, NodeLabel,
    PackCircle, PackGeometry, SunburstGeometry, TreeGeometry, TreeLink, TreeNodeGeometry,
    TreemapCell, TreemapGeometry,
};
pub use kind::LayoutKind;
pub use pack::PackLayout;
pub use settings::{
    ColorScheme, ForceSettings, LayoutSettings, PackSettings, SunburstSettings, TreeSettings,
    TreemapSettings, DEFAULT_CANVAS,
};
pub use sunburst::{SunburstLayout, SunburstTransition};
pub use tree::{TreeLayout, TreeTransition};
pub use treemap::{TreemapLayout, PHI};
