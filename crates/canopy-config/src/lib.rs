//! Viewer configuration for Canopy.
//!
//! A [`ViewerConfig`] is read from YAML or TOML and turned into the settings
//! the other crates take: [`ViewerConfig::layout_settings`],
//! [`ViewerConfig::row_parser`], [`ViewerConfig::hierarchy_builder`] and
//! [`ViewerConfig::record_filter`].
//!
//! # Example
//!
//! ```
//! use canopy_config::ViewerConfig;
//!
//! let config = ViewerConfig::from_yaml("canvas:\n  width: 1200\n  height: 900\n").unwrap();
//! let settings = config.layout_settings();
//! assert!((settings.canvas.width - 1005.0).abs() < 1e-9);
//! ```

mod config;
mod error;

pub use config::{CanvasConfig, FilterConfig, IconConfig, Margin, ViewerConfig, WeightConfig};
pub use error::ConfigError;
