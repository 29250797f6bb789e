//! Canopy: cloud-inventory hierarchy viewer.
//!
//! Loads a header-less inventory export into a single-rooted tree, keeps
//! per-node collapse state, and lays the tree out as a collapsible tree,
//! force graph, sunburst, circle pack or treemap.
//!
//! The building blocks live in their own crates and are re-exported here:
//! [`canopy_core`] at the root, plus [`layout`] and [`config`]. This crate
//! adds the [`Viewer`] session and the [`RenderSink`] boundary.
//!
//! # Example
//!
//! ```
//! use canopy::{RecordingSink, Viewer};
//!
//! let mut viewer = Viewer::new(RecordingSink::new());
//! viewer.load_str("1,organization,,o1,,AcmeCo,\n2,project,,p1,1,,Proj2\n").unwrap();
//! viewer.select("treemap").unwrap();
//! viewer.toggle("1").unwrap();
//!
//! assert_eq!(viewer.sink().frames().len(), 3);
//! assert!(viewer.select("pie").is_err());
//! assert_eq!(viewer.sink().diagnostics().len(), 1);
//! ```

mod error;
mod sink;
mod viewer;

pub use canopy_config as config;
pub use canopy_core::*;
pub use canopy_layout as layout;

pub use canopy_config::ViewerConfig;
pub use canopy_layout::{Geometry, LayoutError, LayoutKind, LayoutSettings};
pub use error::ViewerError;
pub use sink::{Diagnostic, Frame, LogSink, RecordingSink, RenderSink, Stage};
pub use viewer::Viewer;
