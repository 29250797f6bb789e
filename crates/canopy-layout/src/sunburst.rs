//! Zoomable sunburst.
//!
//! A radial partition: each ring is one depth level and a node's angular
//! extent is its share of the parent's value. Zooming rescales every arc so
//! the focused subtree fills the full circle, and only the innermost
//! `visible_rings` rings outside the center disc are drawn.

use crate::adapter::LayoutAdapter;
use crate::error::LayoutError;
use crate::geometry::{Arc, ArcExtent, Geometry, SunburstGeometry};
use crate::kind::LayoutKind;
use crate::settings::SunburstSettings;
use crate::snapshot::Snapshot;
use canopy_core::{Color, Easing, Hierarchy, OrdinalScale, Point, Size};
use std::f64::consts::TAU;

/// Minimum angle-by-ring area for a label to fit.
const LABEL_AREA: f64 = 0.03;

/// Sunburst adapter.
#[derive(Debug, Clone, Copy)]
pub struct SunburstLayout {
    canvas: Size,
    settings: SunburstSettings,
}

impl SunburstLayout {
    /// Sunburst centered in `canvas`.
    #[must_use]
    pub const fn new(canvas: Size, settings: SunburstSettings) -> Self {
        Self { canvas, settings }
    }

    /// Unzoomed geometry focused on the root.
    ///
    /// # Errors
    ///
    /// Fails on an empty canvas or a node without a usable weight.
    pub fn compute(&self, tree: &Hierarchy) -> Result<SunburstGeometry, LayoutError> {
        if !self.canvas.is_drawable() {
            return Err(LayoutError::EmptyCanvas);
        }
        let mut snap = Snapshot::weighted(tree)?;
        snap.sort_by_value();
        let extents = partition(&snap);

        let visible_rings = self.settings.visible_rings.max(1);
        let ring_width = self.canvas.min_side() / 2.0 / (visible_rings as f64 + 1.0);

        let mut palette = OrdinalScale::category10();
        let arcs = snap
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let fill = snap
                    .branch(i)
                    .map_or(Color::NEUTRAL, |b| palette.color(tree.node(snap.nodes[b].id).id()));
                let mut arc = Arc {
                    label: snap.label(tree, i),
                    parent: node
                        .parent
                        .map(|p| tree.node(snap.nodes[p].id).id().to_string())
                        .unwrap_or_default(),
                    value: node.value,
                    base: extents[i],
                    current: extents[i],
                    start_angle: 0.0,
                    end_angle: 0.0,
                    inner_radius: 0.0,
                    outer_radius: 0.0,
                    visible: false,
                    opacity: 0.0,
                    label_visible: false,
                    fill: fill.to_hex(),
                };
                dress(&mut arc, ring_width, visible_rings);
                arc
            })
            .collect();

        Ok(SunburstGeometry {
            arcs,
            focus: tree.node(tree.root()).id().to_string(),
            ring_width,
            visible_rings,
            center: Point::new(self.canvas.width / 2.0, self.canvas.height / 2.0),
        })
    }

    /// Animate from `current` to a view where `focus` fills the circle.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if `focus` is not drawn.
    pub fn zoom(
        &self,
        current: &SunburstGeometry,
        focus: &str,
    ) -> Result<SunburstTransition, LayoutError> {
        let p = current
            .arc(focus)
            .ok_or_else(|| LayoutError::UnknownNode(focus.to_string()))?;
        let (px0, span, depth) = (p.base.x0, p.base.x1 - p.base.x0, p.label.depth as f64);
        let rescale = |x: f64| {
            if span > 0.0 {
                ((x - px0) / span).clamp(0.0, 1.0) * TAU
            } else {
                0.0
            }
        };
        let targets = current
            .arcs
            .iter()
            .map(|a| ArcExtent {
                x0: rescale(a.base.x0),
                x1: rescale(a.base.x1),
                y0: (a.base.y0 - depth).max(0.0),
                y1: (a.base.y1 - depth).max(0.0),
            })
            .collect();
        tracing::debug!(focus, "sunburst zoom");
        Ok(SunburstTransition {
            from: current.clone(),
            targets,
            focus: focus.to_string(),
            easing: self.settings.easing,
        })
    }

    /// Zoom out one level: to the focus's parent, or stay at the root.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if the current focus is not drawn.
    pub fn zoom_out(&self, current: &SunburstGeometry) -> Result<SunburstTransition, LayoutError> {
        let focus = current
            .arc(&current.focus)
            .ok_or_else(|| LayoutError::UnknownNode(current.focus.clone()))?;
        let target = if focus.parent.is_empty() {
            focus.label.id.clone()
        } else {
            focus.parent.clone()
        };
        self.zoom(current, &target)
    }
}

impl LayoutAdapter for SunburstLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Sunburst
    }

    fn layout(&self, tree: &Hierarchy) -> Result<Geometry, LayoutError> {
        self.compute(tree).map(Geometry::Sunburst)
    }
}

/// Partition over `[0, 2π] x [0, height + 1]`: one ring per depth.
fn partition(snap: &Snapshot) -> Vec<ArcExtent> {
    let mut extents = vec![
        ArcExtent {
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
        };
        snap.len()
    ];
    extents[0] = ArcExtent {
        x0: 0.0,
        x1: TAU,
        y0: 0.0,
        y1: 1.0,
    };
    for (i, node) in snap.nodes.iter().enumerate() {
        if node.children.is_empty() {
            continue;
        }
        let parent = extents[i];
        let k = if node.value > 0.0 {
            (parent.x1 - parent.x0) / node.value
        } else {
            0.0
        };
        let mut x = parent.x0;
        let depth = (node.depth + 1) as f64;
        for &c in &node.children {
            let x1 = x + snap.nodes[c].value * k;
            extents[c] = ArcExtent {
                x0: x,
                x1,
                y0: depth,
                y1: depth + 1.0,
            };
            x = x1;
        }
    }
    extents
}

/// Derive drawing fields from `arc.current`.
fn dress(arc: &mut Arc, ring_width: f64, visible_rings: usize) {
    let e = arc.current;
    let outer_ring = visible_rings as f64 + 1.0;
    arc.start_angle = e.x0;
    arc.end_angle = e.x1;
    arc.inner_radius = e.y0 * ring_width;
    arc.outer_radius = (e.y0 * ring_width).max(e.y1 * ring_width - 1.0);
    arc.visible = e.y0 >= 1.0 && e.y1 <= outer_ring && e.x1 > e.x0;
    arc.opacity = if arc.visible { 1.0 } else { 0.0 };
    arc.label_visible = arc.visible && (e.y1 - e.y0) * (e.x1 - e.x0) > LABEL_AREA;
}

/// An in-flight zoom between two sunburst views.
#[derive(Debug, Clone)]
pub struct SunburstTransition {
    from: SunburstGeometry,
    targets: Vec<ArcExtent>,
    focus: String,
    easing: Easing,
}

impl SunburstTransition {
    /// The view at progress `t` in `[0, 1]`, eased.
    #[must_use]
    pub fn at(&self, t: f64) -> SunburstGeometry {
        let eased = self.easing.apply(t.clamp(0.0, 1.0));
        let mut frame = self.from.clone();
        for (arc, target) in frame.arcs.iter_mut().zip(&self.targets) {
            arc.current = arc.current.lerp(target, eased);
            dress(arc, frame.ring_width, frame.visible_rings);
        }
        if t >= 1.0 {
            frame.focus.clone_from(&self.focus);
        }
        frame
    }

    /// The settled view after the zoom.
    #[must_use]
    pub fn finish(&self) -> SunburstGeometry {
        self.at(1.0)
    }

    /// Node being zoomed to.
    #[must_use]
    pub fn focus(&self) -> &str {
        &self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::parse_row;

    fn tree() -> Hierarchy {
        let rows = [
            ["1", "organization", "", "", "", "Acme", ""],
            ["2", "folder", "", "", "1", "Prod", ""],
            ["3", "project", "", "", "2", "web", ""],
            ["4", "project", "", "", "1", "ops", ""],
            ["5", "bucket", "", "", "3", "logs", ""],
        ];
        Hierarchy::from_records(rows.iter().map(|r| parse_row(r).unwrap()).collect()).unwrap()
    }

    fn layout() -> SunburstLayout {
        SunburstLayout::new(Size::new(600.0, 600.0), SunburstSettings::default())
    }

    #[test]
    fn test_root_fills_center() {
        let g = layout().compute(&tree()).unwrap();
        let root = g.arc("1").unwrap();
        assert!((root.base.x1 - TAU).abs() < 1e-12);
        assert!(!root.visible);
        assert!((g.ring_width - 100.0).abs() < 1e-12);
        assert_eq!(g.focus, "1");
    }

    #[test]
    fn test_angles_proportional_to_value() {
        let g = layout().compute(&tree()).unwrap();
        let root = g.arc("1").unwrap();
        for id in ["2", "4"] {
            let a = g.arc(id).unwrap();
            let share = (a.base.x1 - a.base.x0) / TAU;
            assert!((share - a.value / root.value).abs() < 1e-12);
            assert!((a.base.y0 - 1.0).abs() < 1e-12);
        }
        // the parent's own weight leaves a gap after its children
        let last = g.arc("4").unwrap();
        assert!(last.base.x1 < TAU);
    }

    #[test]
    fn test_rings_beyond_visible_band_hidden() {
        let g = layout().compute(&tree()).unwrap();
        assert!(g.arc("2").unwrap().visible);
        assert!(g.arc("3").unwrap().visible);
        let deep = g.arc("5").unwrap();
        assert!(!deep.visible);
        assert!(deep.opacity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_fills_circle_with_focus() {
        let l = layout();
        let g = l.compute(&tree()).unwrap();
        let zoomed = l.zoom(&g, "2").unwrap().finish();
        let focus = zoomed.arc("2").unwrap();
        assert!(focus.current.x0.abs() < 1e-12);
        assert!((focus.current.x1 - TAU).abs() < 1e-12);
        assert!(focus.current.y0.abs() < 1e-12);
        assert!(zoomed.arc("5").unwrap().visible);
        let outside = zoomed.arc("4").unwrap();
        assert!(!outside.visible);
        assert_eq!(zoomed.focus, "2");
    }

    #[test]
    fn test_zoom_interpolates() {
        let l = layout();
        let g = l.compute(&tree()).unwrap();
        let transition = l.zoom(&g, "2").unwrap();
        let start = transition.at(0.0);
        assert_eq!(start.arcs, g.arcs);
        let mid = transition.at(0.5);
        let a = mid.arc("2").unwrap();
        let end = transition.finish();
        let before = g.arc("2").unwrap().current.x1;
        let after = end.arc("2").unwrap().current.x1;
        assert!(a.current.x1 > before.min(after) - 1e-12);
        assert!(a.current.x1 < before.max(after) + 1e-12);
        assert!((a.current.x1 - (before + after) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_back_to_root_restores() {
        let l = layout();
        let g = l.compute(&tree()).unwrap();
        let zoomed = l.zoom(&g, "3").unwrap().finish();
        let restored = l.zoom(&zoomed, "1").unwrap().finish();
        for (a, b) in restored.arcs.iter().zip(&g.arcs) {
            assert!((a.current.x0 - b.current.x0).abs() < 1e-9);
            assert!((a.current.y1 - b.current.y1).abs() < 1e-9);
            assert_eq!(a.visible, b.visible);
        }
    }

    #[test]
    fn test_zoom_out_walks_up() {
        let l = layout();
        let g = l.compute(&tree()).unwrap();
        let zoomed = l.zoom(&g, "3").unwrap().finish();
        assert_eq!(l.zoom_out(&zoomed).unwrap().focus(), "2");
        assert_eq!(l.zoom_out(&g).unwrap().focus(), "1");
    }

    #[test]
    fn test_zoom_unknown_focus() {
        let l = layout();
        let g = l.compute(&tree()).unwrap();
        assert_eq!(
            l.zoom(&g, "99").unwrap_err(),
            LayoutError::UnknownNode("99".into())
        );
    }

    #[test]
    fn test_branch_colors() {
        let g = layout().compute(&tree()).unwrap();
        assert_eq!(g.arc("3").unwrap().fill, g.arc("2").unwrap().fill);
        assert_ne!(g.arc("4").unwrap().fill, g.arc("2").unwrap().fill);
        assert_eq!(g.arc("1").unwrap().fill, Color::NEUTRAL.to_hex());
    }
}
