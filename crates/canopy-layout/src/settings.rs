//! Tunables for every layout adapter.
//!
//! Defaults reproduce the original viewer page. The structs deserialize with
//! `#[serde(default)]` so a config file only names what it changes.

use canopy_core::{Easing, Size};
use serde::{Deserialize, Serialize};

/// Drawable area after margins: 2500 x 2540 minus 45 + 150 and 40 + 30.
pub const DEFAULT_CANVAS: Size = Size {
    width: 2305.0,
    height: 2470.0,
};

/// Settings shared by all adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    /// Drawable area in pixels.
    pub canvas: Size,
    /// Collapsible tree.
    pub tree: TreeSettings,
    /// Force graph.
    pub force: ForceSettings,
    /// Sunburst.
    pub sunburst: SunburstSettings,
    /// Circle pack (both variants).
    pub pack: PackSettings,
    /// Treemap.
    pub treemap: TreemapSettings,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS,
            tree: TreeSettings::default(),
            force: ForceSettings::default(),
            sunburst: SunburstSettings::default(),
            pack: PackSettings::default(),
            treemap: TreemapSettings::default(),
        }
    }
}

impl LayoutSettings {
    /// Settings with a different canvas.
    #[must_use]
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = Size::new(width, height);
        self
    }
}

/// Collapsible tree settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSettings {
    /// Pixels between depth levels.
    pub depth_spacing: f64,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            depth_spacing: 180.0,
        }
    }
}

/// Force simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceSettings {
    /// Many-body strength; negative repels.
    pub charge: f64,
    /// Rest length of links.
    pub link_distance: f64,
    /// Link spring strength.
    pub link_strength: f64,
    /// Strength of the x and y centering forces.
    pub center_strength: f64,
    /// Simulation stops once alpha drops below this.
    pub alpha_min: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    /// Alpha target while a node is dragged.
    pub drag_alpha_target: f64,
    /// Hard cap for [`crate::Simulation::run_to_settle`].
    pub max_ticks: usize,
}

impl Default for ForceSettings {
    fn default() -> Self {
        Self {
            charge: -50.0,
            link_distance: 0.0,
            link_strength: 1.0,
            center_strength: 0.1,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            max_ticks: 10_000,
        }
    }
}

/// Sunburst settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunburstSettings {
    /// Rings shown outside the center disc.
    pub visible_rings: usize,
    /// Zoom transition curve.
    pub easing: Easing,
}

impl Default for SunburstSettings {
    fn default() -> Self {
        Self {
            visible_rings: 2,
            easing: Easing::CubicInOut,
        }
    }
}

/// Color scale for the colored circle pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Magma-like ramp keyed by node height.
    #[default]
    Sequential,
    /// Categorical palette keyed by top-level branch.
    Ordinal,
}

/// Circle pack settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackSettings {
    /// Gap between sibling circles and their parent, in pixels.
    pub padding: f64,
    /// Scale for the colored variant.
    pub scheme: ColorScheme,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            padding: 3.0,
            scheme: ColorScheme::Sequential,
        }
    }
}

/// Treemap settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreemapSettings {
    /// Gap between siblings.
    pub padding_inner: f64,
    /// Gap between a parent's edge and its children.
    pub padding_outer: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_viewer_page() {
        let s = LayoutSettings::default();
        assert_eq!(s.canvas, Size::new(2305.0, 2470.0));
        assert!((s.tree.depth_spacing - 180.0).abs() < f64::EPSILON);
        assert!((s.force.charge + 50.0).abs() < f64::EPSILON);
        assert_eq!(s.sunburst.visible_rings, 2);
        assert_eq!(s.sunburst.easing, Easing::CubicInOut);
        assert!((s.pack.padding - 3.0).abs() < f64::EPSILON);
        assert_eq!(s.pack.scheme, ColorScheme::Sequential);
        assert!(s.treemap.padding_inner.abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s: LayoutSettings =
            serde_json::from_str(r#"{"pack": {"scheme": "ordinal"}}"#).unwrap();
        assert_eq!(s.pack.scheme, ColorScheme::Ordinal);
        assert!((s.pack.padding - 3.0).abs() < f64::EPSILON);
        assert_eq!(s.canvas, DEFAULT_CANVAS);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let r: Result<LayoutSettings, _> = serde_json::from_str(r#"{"tree": {"spacing": 3}}"#);
        assert!(r.is_err());
    }
}
