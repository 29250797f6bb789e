//! The layout capability and its registry.

use crate::error::LayoutError;
use crate::force::ForceLayout;
use crate::geometry::Geometry;
use crate::kind::LayoutKind;
use crate::pack::PackLayout;
use crate::settings::LayoutSettings;
use crate::sunburst::SunburstLayout;
use crate::tree::TreeLayout;
use crate::treemap::TreemapLayout;
use canopy_core::Hierarchy;

/// Turns a tree snapshot into positioned geometry.
///
/// Implementations are pure: they read the tree, keep no state between
/// calls, and may be re-invoked after any toggle.
pub trait LayoutAdapter: Send + Sync {
    /// Which layout this is.
    fn kind(&self) -> LayoutKind;

    /// Compute geometry for the current tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree or settings cannot be laid out.
    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError>;
}

/// Build the adapter for `kind`.
#[must_use]
pub fn adapter_for(kind: LayoutKind, settings: &LayoutSettings) -> Box<dyn LayoutAdapter> {
    match kind {
        LayoutKind::CollapsibleTree => Box::new(TreeLayout::new(settings.canvas, settings.tree)),
        LayoutKind::ForceGraph => Box::new(ForceLayout::new(settings.force)),
        LayoutKind::Sunburst => {
            Box::new(SunburstLayout::new(settings.canvas, settings.sunburst))
        }
        LayoutKind::CirclePack => Box::new(PackLayout::plain(settings.canvas, settings.pack)),
        LayoutKind::CirclePackColored => {
            Box::new(PackLayout::colored(settings.canvas, settings.pack))
        }
        LayoutKind::Treemap => Box::new(TreemapLayout::new(settings.canvas, settings.treemap)),
    }
}

/// Parse `id` and run the matching adapter.
///
/// # Errors
///
/// Returns [`LayoutError::UnknownLayout`] for an unrecognized id, or the
/// adapter's own error.
pub fn layout_by_id(
    id: &str,
    tree: &Hierarchy,
    settings: &LayoutSettings,
) -> Result<Geometry, LayoutError> {
    let kind: LayoutKind = id.parse()?;
    let geometry = adapter_for(kind, settings).layout(tree)?;
    tracing::debug!(layout = %kind, nodes = geometry.node_count(), "layout computed");
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::parse_row;

    fn tree() -> Hierarchy {
        let rows = [
            ["1", "organization", "", "", "", "Acme", ""],
            ["2", "project", "", "", "1", "web", ""],
            ["3", "bucket", "", "", "2", "logs", ""],
        ];
        Hierarchy::from_records(rows.iter().map(|r| parse_row(r).unwrap()).collect()).unwrap()
    }

    #[test]
    fn test_every_kind_has_an_adapter() {
        let settings = LayoutSettings::default().with_canvas(400.0, 300.0);
        let t = tree();
        for kind in LayoutKind::ALL {
            let adapter = adapter_for(kind, &settings);
            assert_eq!(adapter.kind(), kind);
            let geometry = adapter.layout(&t).unwrap();
            assert_eq!(geometry.family(), kind);
            assert_eq!(geometry.node_count(), 3);
        }
    }

    #[test]
    fn test_layout_by_unknown_id() {
        let err = layout_by_id("bar-chart", &tree(), &LayoutSettings::default()).unwrap_err();
        assert_eq!(err, LayoutError::UnknownLayout("bar-chart".into()));
    }

    #[test]
    fn test_adapters_leave_tree_untouched() {
        let mut t = tree();
        t.collapse_below_root();
        let before = t.descendants();
        let _ = layout_by_id("treemap", &t, &LayoutSettings::default()).unwrap();
        let _ = layout_by_id("force-graph", &t, &LayoutSettings::default()).unwrap();
        assert_eq!(t.descendants(), before);
    }
}
