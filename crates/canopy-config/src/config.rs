//! Viewer configuration schema.

use crate::error::ConfigError;
use canopy_core::{HierarchyBuilder, IconTable, RecordFilter, RowParser, Size, DEFAULT_WEIGHT_BASE};
use canopy_layout::{
    ForceSettings, LayoutSettings, PackSettings, SunburstSettings, TreeSettings, TreemapSettings,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level viewer configuration.
///
/// Every section is optional; a missing key keeps the default of the
/// original viewer page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Page size and margins
    pub canvas: CanvasConfig,
    /// Collapsible tree
    pub tree: TreeSettings,
    /// Synthetic node weight
    pub weight: WeightConfig,
    /// Circle pack
    pub pack: PackSettings,
    /// Treemap
    pub treemap: TreemapSettings,
    /// Sunburst
    pub sunburst: SunburstSettings,
    /// Force graph
    pub force: ForceSettings,
    /// Icon table
    pub icons: IconConfig,
    /// Optional record filter for exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
}

/// Page size and margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
    /// Space reserved around the drawing
    pub margin: Margin,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 2500.0,
            height: 2540.0,
            margin: Margin::default(),
        }
    }
}

impl CanvasConfig {
    /// Drawable area after margins.
    #[must_use]
    pub fn inner(&self) -> Size {
        Size::new(
            self.width - self.margin.left - self.margin.right,
            self.height - self.margin.top - self.margin.bottom,
        )
    }
}

/// Margins around the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margin {
    /// Top
    pub top: f64,
    /// Right
    pub right: f64,
    /// Bottom
    pub bottom: f64,
    /// Left
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 45.0,
            bottom: 30.0,
            left: 150.0,
        }
    }
}

/// Synthetic weight settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightConfig {
    /// Weight of the root; each node gets `base - depth²`.
    pub base: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_WEIGHT_BASE,
        }
    }
}

/// Icon table overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    /// Prefix for every icon path
    pub base_url: String,
    /// Icon for unrecognized resource types
    pub fallback: String,
    /// Extra or replacement icons keyed by resource type
    pub overrides: BTreeMap<String, String>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_url: "icons/".to_string(),
            fallback: "extras/generic_gcp.png".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Allowed categories and types for filtered exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Allowed categories
    pub categories: Vec<String>,
    /// Allowed resource types
    pub types: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let filter = RecordFilter::default();
        Self {
            categories: filter.categories.into_iter().collect(),
            types: filter.types.into_iter().collect(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let text = match ext.as_str() {
            "yaml" | "yml" | "toml" => std::fs::read_to_string(path)?,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let config = if ext == "toml" {
            Self::from_toml(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        tracing::debug!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        let m = &self.canvas.margin;
        for (field, value) in [
            ("canvas.margin.top", m.top),
            ("canvas.margin.right", m.right),
            ("canvas.margin.bottom", m.bottom),
            ("canvas.margin.left", m.left),
        ] {
            non_negative(field, value)?;
        }
        let inner = self.canvas.inner();
        if inner.width <= 0.0 || inner.height <= 0.0 {
            return Err(ConfigError::invalid(
                "canvas.margin",
                format!(
                    "margins leave no drawable area ({} x {})",
                    inner.width, inner.height
                ),
            ));
        }
        positive("weight.base", self.weight.base)?;
        positive("tree.depth_spacing", self.tree.depth_spacing)?;
        non_negative("pack.padding", self.pack.padding)?;
        non_negative("treemap.padding_inner", self.treemap.padding_inner)?;
        non_negative("treemap.padding_outer", self.treemap.padding_outer)?;
        if self.sunburst.visible_rings == 0 {
            return Err(ConfigError::invalid(
                "sunburst.visible_rings",
                "must be at least 1",
            ));
        }
        self.validate_force()?;
        if let Some(filter) = &self.filter {
            if filter.categories.is_empty() {
                return Err(ConfigError::invalid("filter.categories", "must not be empty"));
            }
            if filter.types.is_empty() {
                return Err(ConfigError::invalid("filter.types", "must not be empty"));
            }
        }
        Ok(())
    }

    fn validate_force(&self) -> Result<(), ConfigError> {
        let f = &self.force;
        for (field, value) in [
            ("force.charge", f.charge),
            ("force.link_distance", f.link_distance),
            ("force.link_strength", f.link_strength),
            ("force.center_strength", f.center_strength),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be a finite number"));
            }
        }
        if !(f.alpha_min > 0.0 && f.alpha_min < 1.0) {
            return Err(ConfigError::invalid("force.alpha_min", "must lie in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&f.velocity_decay) {
            return Err(ConfigError::invalid(
                "force.velocity_decay",
                "must lie in [0, 1]",
            ));
        }
        if f.max_ticks == 0 {
            return Err(ConfigError::invalid("force.max_ticks", "must be at least 1"));
        }
        Ok(())
    }

    /// Layout settings for the drawable area.
    #[must_use]
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            canvas: self.canvas.inner(),
            tree: self.tree,
            force: self.force,
            sunburst: self.sunburst,
            pack: self.pack,
            treemap: self.treemap,
        }
    }

    /// Icon table with the configured prefix, fallback and overrides.
    #[must_use]
    pub fn icon_table(&self) -> IconTable {
        self.icons.overrides.iter().fold(
            IconTable::new()
                .with_base_url(&self.icons.base_url)
                .with_fallback(&self.icons.fallback),
            |table, (kind, file)| table.with_icon(kind, file),
        )
    }

    /// Row parser resolving icons through [`Self::icon_table`].
    #[must_use]
    pub fn row_parser(&self) -> RowParser {
        RowParser::with_icons(self.icon_table())
    }

    /// Hierarchy builder using the configured weight base.
    #[must_use]
    pub fn hierarchy_builder(&self) -> HierarchyBuilder {
        HierarchyBuilder::new().weight_base(self.weight.base)
    }

    /// The export filter, if one is configured.
    #[must_use]
    pub fn record_filter(&self) -> Option<RecordFilter> {
        self.filter.as_ref().map(|f| RecordFilter {
            categories: f.categories.iter().cloned().collect(),
            types: f.types.iter().cloned().collect(),
        })
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be positive, got {value}"),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ))
    }
}
