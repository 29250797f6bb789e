//! One-shot layout computation shared by `canopy layout` and `/layout/<id>`.

use canopy::{Frame, Hierarchy, LogSink, Viewer, ViewerConfig, ViewerError};

/// Which layout to draw and which clicks to replay first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LayoutRequest {
    pub(crate) kind: String,
    pub(crate) toggles: Vec<String>,
    pub(crate) expand_all: bool,
}

impl LayoutRequest {
    pub(crate) fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            toggles: Vec::new(),
            expand_all: false,
        }
    }

    /// Read `toggle=<id>` (repeatable) and `expand=all` from a query string.
    /// Unknown parameters are ignored.
    pub(crate) fn with_query(mut self, query: &str) -> Self {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("toggle", id)) if !id.is_empty() => self.toggles.push(id.to_string()),
                Some(("expand", "all")) => self.expand_all = true,
                _ => {}
            }
        }
        self
    }

    /// Start from the initial view, replay the request, and return the last
    /// frame.
    pub(crate) fn render(&self, config: &ViewerConfig, tree: Hierarchy) -> Result<Frame, ViewerError> {
        let mut viewer = Viewer::with_config(config.clone(), LogSink);
        viewer.load_tree(tree)?;
        if self.expand_all {
            viewer.expand_all()?;
        }
        for id in &self.toggles {
            viewer.toggle(id)?;
        }
        Ok(viewer.select(&self.kind)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy::{LayoutError, LayoutKind};
    use canopy_test::acme_inventory;

    #[test]
    fn test_query_parsing() {
        let req = LayoutRequest::new("sunburst").with_query("toggle=2&expand=all&toggle=&x=1&toggle=5");
        assert_eq!(req.toggles, vec!["2", "5"]);
        assert!(req.expand_all);
        assert_eq!(LayoutRequest::new("treemap").with_query(""), LayoutRequest::new("treemap"));
    }

    #[test]
    fn test_render_initial_view() {
        let frame = LayoutRequest::new("circle-pack")
            .render(&ViewerConfig::default(), acme_inventory())
            .unwrap();
        assert_eq!(frame.kind, LayoutKind::CirclePack);
        assert_eq!(frame.geometry.node_count(), 4);
    }

    #[test]
    fn test_render_replays_toggles_after_expand() {
        let frame = LayoutRequest::new("collapsible-tree")
            .with_query("expand=all&toggle=2")
            .render(&ViewerConfig::default(), acme_inventory())
            .unwrap();
        assert_eq!(frame.geometry.node_count(), 6);
    }

    #[test]
    fn test_render_errors() {
        let err = LayoutRequest::new("pie")
            .render(&ViewerConfig::default(), acme_inventory())
            .unwrap_err();
        assert!(matches!(err, ViewerError::Layout(LayoutError::UnknownLayout(_))));

        let err = LayoutRequest::new("treemap")
            .with_query("toggle=99")
            .render(&ViewerConfig::default(), acme_inventory())
            .unwrap_err();
        assert!(matches!(err, ViewerError::Tree(_)));
    }
}
