//! Viewer session: one loaded tree, one selected layout, one sink.
//!
//! Failures never leave the sink half-drawn. A failed load keeps the
//! previous tree, a failed layout keeps the previous frame, and both are
//! reported to the sink as a [`Diagnostic`].

use crate::error::ViewerError;
use crate::sink::{Diagnostic, Frame, RenderSink};
use canopy_config::ViewerConfig;
use canopy_core::{read_path, read_str, ExpandState, Hierarchy, LoadError, ResourceRecord};
use canopy_layout::{
    adapter_for, Geometry, LayoutKind, LayoutSettings, SunburstLayout, SunburstTransition,
};
use std::path::Path;

/// Interactive session state.
#[derive(Debug)]
pub struct Viewer<S> {
    config: ViewerConfig,
    settings: LayoutSettings,
    tree: Option<Hierarchy>,
    kind: LayoutKind,
    last_frame: Option<Frame>,
    sink: S,
}

impl<S: RenderSink> Viewer<S> {
    /// Viewer with the default configuration, starting on the collapsible tree.
    pub fn new(sink: S) -> Self {
        Self::with_config(ViewerConfig::default(), sink)
    }

    /// Viewer with an explicit configuration.
    pub fn with_config(config: ViewerConfig, sink: S) -> Self {
        let settings = config.layout_settings();
        Self {
            config,
            settings,
            tree: None,
            kind: LayoutKind::CollapsibleTree,
            last_frame: None,
            sink,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Settings handed to every adapter.
    #[must_use]
    pub const fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// The loaded tree, if any.
    #[must_use]
    pub const fn tree(&self) -> Option<&Hierarchy> {
        self.tree.as_ref()
    }

    /// The selected layout.
    #[must_use]
    pub const fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// The frame currently on screen.
    #[must_use]
    pub const fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// The sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the viewer, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Load an inventory from CSV text.
    ///
    /// On failure the previous tree and frame stay in place.
    pub fn load_str(&mut self, csv: &str) -> Result<(), ViewerError> {
        let built = read_str(csv, &self.config.row_parser()).and_then(|r| self.build(r));
        self.install(built)
    }

    /// Load an inventory from a CSV file.
    pub fn load_path(&mut self, path: &Path) -> Result<(), ViewerError> {
        let built = read_path(path, &self.config.row_parser()).and_then(|r| self.build(r));
        self.install(built)
    }

    /// Load already-parsed records.
    pub fn load_records(&mut self, records: Vec<ResourceRecord>) -> Result<(), ViewerError> {
        let built = self.build(records);
        self.install(built)
    }

    /// Install a tree built elsewhere.
    pub fn load_tree(&mut self, tree: Hierarchy) -> Result<(), ViewerError> {
        self.install(Ok(tree))
    }

    fn build(&self, records: Vec<ResourceRecord>) -> Result<Hierarchy, LoadError> {
        self.config.hierarchy_builder().build(records)
    }

    /// Replace the tree and draw its initial view. A render failure after a
    /// successful load is reported but keeps the new tree.
    fn install(&mut self, built: Result<Hierarchy, LoadError>) -> Result<(), ViewerError> {
        let mut tree = match built {
            Ok(tree) => tree,
            Err(e) => return Err(self.fail(e.into())),
        };
        tree.collapse_below_root();
        tracing::info!(nodes = tree.len(), "inventory loaded");
        self.tree = Some(tree);
        self.draw(None)
    }

    /// Switch to the layout named `id` and draw it.
    ///
    /// An unknown id or a failing adapter keeps the previous layout and frame.
    pub fn select(&mut self, id: &str) -> Result<&Frame, ViewerError> {
        let kind = match id.parse::<LayoutKind>() {
            Ok(kind) => kind,
            Err(e) => return Err(self.fail(e.into())),
        };
        let previous = std::mem::replace(&mut self.kind, kind);
        if let Err(e) = self.draw(None) {
            self.kind = previous;
            return Err(e);
        }
        self.current()
    }

    /// Redraw the selected layout from the current tree.
    pub fn render(&mut self) -> Result<&Frame, ViewerError> {
        self.draw(None)?;
        self.current()
    }

    /// Toggle a node and redraw, animating from that node.
    ///
    /// The toggle sticks even if the redraw fails; the old frame then stays.
    pub fn toggle(&mut self, id: &str) -> Result<ExpandState, ViewerError> {
        let toggled = match self.tree.as_mut() {
            Some(tree) => tree.toggle_id(id).map_err(ViewerError::from),
            None => Err(ViewerError::NoData),
        };
        let state = match toggled {
            Ok(state) => state,
            Err(e) => return Err(self.fail(e)),
        };
        if self.draw(Some(id.to_string())).is_err() {
            tracing::debug!(id, "keeping previous frame after toggle");
        }
        Ok(state)
    }

    /// Expand every node and redraw.
    pub fn expand_all(&mut self) -> Result<&Frame, ViewerError> {
        match self.tree.as_mut() {
            Some(tree) => tree.expand_all(),
            None => return Err(self.fail(ViewerError::NoData)),
        }
        self.render()
    }

    /// Collapse the subtree under `id` and redraw.
    pub fn collapse_all(&mut self, id: &str) -> Result<&Frame, ViewerError> {
        let resolved = match self.tree.as_mut() {
            Some(tree) => tree
                .resolve(id)
                .map(|node| tree.collapse_all(node))
                .map_err(ViewerError::from),
            None => Err(ViewerError::NoData),
        };
        if let Err(e) = resolved {
            return Err(self.fail(e));
        }
        self.draw(Some(id.to_string()))?;
        self.current()
    }

    /// Zoom the sunburst on screen to `id`.
    ///
    /// Returns the transition so the caller can animate it; the sink receives
    /// the end state.
    pub fn zoom(&mut self, id: &str) -> Result<SunburstTransition, ViewerError> {
        self.zoom_to(Some(id))
    }

    /// Zoom the sunburst on screen out by one ring.
    pub fn zoom_out(&mut self) -> Result<SunburstTransition, ViewerError> {
        self.zoom_to(None)
    }

    fn zoom_to(&mut self, focus: Option<&str>) -> Result<SunburstTransition, ViewerError> {
        let computed = match &self.last_frame {
            Some(Frame {
                geometry: Geometry::Sunburst(current),
                ..
            }) => {
                let layout = SunburstLayout::new(self.settings.canvas, self.settings.sunburst);
                match focus {
                    Some(id) => layout.zoom(current, id),
                    None => layout.zoom_out(current),
                }
                .map_err(ViewerError::from)
            }
            Some(frame) => Err(ViewerError::ZoomUnavailable(frame.kind)),
            None => Err(ViewerError::NoData),
        };
        let transition = match computed {
            Ok(transition) => transition,
            Err(e) => return Err(self.fail(e)),
        };
        let frame = Frame {
            kind: LayoutKind::Sunburst,
            geometry: Geometry::Sunburst(transition.finish()),
            origin: Some(transition.focus().to_string()),
        };
        self.sink.present(&frame);
        self.last_frame = Some(frame);
        Ok(transition)
    }

    fn draw(&mut self, origin: Option<String>) -> Result<(), ViewerError> {
        let computed = match &self.tree {
            Some(tree) => adapter_for(self.kind, &self.settings)
                .layout(tree)
                .map_err(ViewerError::from),
            None => Err(ViewerError::NoData),
        };
        match computed {
            Ok(geometry) => {
                let frame = Frame {
                    kind: self.kind,
                    geometry,
                    origin,
                };
                self.sink.present(&frame);
                self.last_frame = Some(frame);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn current(&self) -> Result<&Frame, ViewerError> {
        self.last_frame.as_ref().ok_or(ViewerError::NoData)
    }

    fn fail(&mut self, err: ViewerError) -> ViewerError {
        let diagnostic = Diagnostic::new(err.stage(), err.to_string());
        tracing::warn!(stage = diagnostic.stage.as_str(), error = %err, "viewer error");
        self.sink.report(&diagnostic);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, Stage};
    use canopy_core::HierarchyBuilder;
    use canopy_test::{acme_records, ACME_CSV};

    fn loaded() -> Viewer<RecordingSink> {
        let mut viewer = Viewer::new(RecordingSink::new());
        viewer.load_str(ACME_CSV).unwrap();
        viewer
    }

    #[test]
    fn test_load_draws_initial_view() {
        let viewer = loaded();
        let frame = viewer.last_frame().unwrap();
        assert_eq!(frame.kind, LayoutKind::CollapsibleTree);
        assert_eq!(frame.geometry.ids(), vec!["1", "2", "3", "12"]);
        assert_eq!(viewer.sink().frames().len(), 1);
        assert!(viewer.sink().diagnostics().is_empty());
    }

    #[test]
    fn test_sink_can_be_drained_and_recovered() {
        let mut viewer = loaded();
        let drained = viewer.sink_mut().take_frames();
        assert_eq!(drained.len(), 1);
        assert!(viewer.sink().frames().is_empty());
        assert!(viewer.last_frame().is_some());

        viewer.toggle("2").unwrap();
        let sink = viewer.into_sink();
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(sink.current().unwrap().origin.as_deref(), Some("2"));
    }

    #[test]
    fn test_failed_load_keeps_previous_tree() {
        let mut viewer = loaded();
        let err = viewer.load_str("1,organization,,o1,,A,\n2,project,,p,9,,B\n").unwrap_err();
        assert!(matches!(err, ViewerError::Load(LoadError::OrphanRecord { .. })));
        assert_eq!(viewer.tree().unwrap().len(), 12);
        assert_eq!(viewer.sink().frames().len(), 1);
        assert_eq!(viewer.sink().diagnostics()[0].stage, Stage::Load);
    }

    #[test]
    fn test_unknown_layout_keeps_frame() {
        let mut viewer = loaded();
        let before = viewer.last_frame().cloned();
        let err = viewer.select("pie-chart").unwrap_err();
        assert!(matches!(err, ViewerError::Layout(_)));
        assert_eq!(viewer.last_frame().cloned(), before);
        assert_eq!(viewer.kind(), LayoutKind::CollapsibleTree);
        assert_eq!(viewer.sink().diagnostics()[0].message, "unknown layout: pie-chart");
    }

    #[test]
    fn test_missing_weight_keeps_previous_layout() {
        let mut viewer = Viewer::new(RecordingSink::new());
        let tree = HierarchyBuilder::new().without_weights().build(acme_records()).unwrap();
        viewer.load_tree(tree).unwrap();

        assert!(viewer.select("treemap").is_err());
        assert_eq!(viewer.kind(), LayoutKind::CollapsibleTree);
        assert_eq!(viewer.last_frame().unwrap().kind, LayoutKind::CollapsibleTree);
        assert!(viewer.select("force-graph").is_ok());
    }

    #[test]
    fn test_toggle_redraws_with_origin() {
        let mut viewer = loaded();
        assert_eq!(viewer.toggle("3").unwrap(), ExpandState::Expanded);
        let frame = viewer.last_frame().unwrap();
        assert_eq!(frame.origin.as_deref(), Some("3"));
        assert_eq!(frame.geometry.node_count(), 5);

        assert!(viewer.toggle("404").is_err());
        assert_eq!(viewer.sink().diagnostics()[0].stage, Stage::Interaction);
        assert_eq!(viewer.last_frame().unwrap().geometry.node_count(), 5);
    }

    #[test]
    fn test_nothing_loaded() {
        let mut viewer = Viewer::new(RecordingSink::new());
        assert!(matches!(viewer.render(), Err(ViewerError::NoData)));
        assert!(matches!(viewer.toggle("1"), Err(ViewerError::NoData)));
        assert_eq!(viewer.sink().diagnostics().len(), 2);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let mut viewer = loaded();
        assert_eq!(viewer.expand_all().unwrap().geometry.node_count(), 12);
        assert_eq!(viewer.collapse_all("2").unwrap().geometry.node_count(), 6);
        assert!(viewer.collapse_all("nope").is_err());
    }

    #[test]
    fn test_zoom_requires_sunburst() {
        let mut viewer = loaded();
        assert!(matches!(
            viewer.zoom("2"),
            Err(ViewerError::ZoomUnavailable(LayoutKind::CollapsibleTree))
        ));

        viewer.expand_all().unwrap();
        viewer.select("sunburst").unwrap();
        let transition = viewer.zoom("2").unwrap();
        assert_eq!(transition.focus(), "2");
        assert_eq!(viewer.last_frame().unwrap().origin.as_deref(), Some("2"));

        viewer.zoom_out().unwrap();
        let Geometry::Sunburst(g) = &viewer.last_frame().unwrap().geometry else {
            panic!("expected sunburst");
        };
        assert_eq!(g.focus, "1");
    }
}
