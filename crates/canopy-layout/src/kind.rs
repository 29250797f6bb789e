//! Layout identifiers.

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six layouts a viewer can select.
///
/// The string form is the stable identifier an external selection control
/// uses; it round-trips through [`FromStr`] and [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Layered tidy tree with animated collapse.
    CollapsibleTree,
    /// Force-directed node-link diagram over the full tree.
    ForceGraph,
    /// Zoomable radial partition.
    Sunburst,
    /// Nested circle packing.
    CirclePack,
    /// Circle packing with a color scale.
    CirclePackColored,
    /// Squarified treemap.
    Treemap,
}

impl LayoutKind {
    /// Every layout, in menu order.
    pub const ALL: [Self; 6] = [
        Self::CollapsibleTree,
        Self::ForceGraph,
        Self::Sunburst,
        Self::CirclePack,
        Self::CirclePackColored,
        Self::Treemap,
    ];

    /// Stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollapsibleTree => "collapsible-tree",
            Self::ForceGraph => "force-graph",
            Self::Sunburst => "sunburst",
            Self::CirclePack => "circle-pack",
            Self::CirclePackColored => "circle-pack-colored",
            Self::Treemap => "treemap",
        }
    }

    /// True for the space-filling layouts that size nodes by weight.
    #[must_use]
    pub const fn needs_weight(self) -> bool {
        matches!(
            self,
            Self::Sunburst | Self::CirclePack | Self::CirclePackColored | Self::Treemap
        )
    }

    /// True if the layout draws hidden subtrees too.
    #[must_use]
    pub const fn ignores_collapse(self) -> bool {
        matches!(self, Self::ForceGraph)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LayoutError::UnknownLayout(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for kind in LayoutKind::ALL {
            assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_unknown_identifier_fails_loudly() {
        assert_eq!(
            "pie-chart".parse::<LayoutKind>(),
            Err(LayoutError::UnknownLayout("pie-chart".into()))
        );
        assert!("".parse::<LayoutKind>().is_err());
        assert!("Treemap".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_weight_requirements() {
        assert!(!LayoutKind::CollapsibleTree.needs_weight());
        assert!(!LayoutKind::ForceGraph.needs_weight());
        assert!(LayoutKind::Treemap.needs_weight());
        assert!(LayoutKind::CirclePackColored.needs_weight());
        assert!(LayoutKind::ForceGraph.ignores_collapse());
    }

    #[test]
    fn test_serde_uses_identifiers() {
        let json = serde_json::to_string(&LayoutKind::CirclePackColored).unwrap();
        assert_eq!(json, "\"circle-pack-colored\"");
    }
}
