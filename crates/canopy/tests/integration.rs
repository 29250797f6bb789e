//! End-to-end tests through the facade.

use canopy::{
    layout::TreeGeometry, ExpandState, Geometry, Hierarchy, LayoutKind, RecordingSink, Stage,
    Viewer, ViewerConfig, ViewerError,
};
use canopy_test::{assert_tree_invariants, ACME_CSV};
use proptest::prelude::*;

fn all_child_ids(tree: &Hierarchy) -> Vec<Vec<String>> {
    tree.iter()
        .map(|(_, node)| {
            node.all_children()
                .iter()
                .map(|&c| tree.node(c).id().to_string())
                .collect()
        })
        .collect()
}

const TWO_ROWS: &str = "1,organization,,o1,,AcmeCo,\n2,project,,p1,1,,Proj2\n";

fn tree_geometry(viewer: &Viewer<RecordingSink>) -> &TreeGeometry {
    match &viewer.last_frame().unwrap().geometry {
        Geometry::Tree(g) => g,
        other => panic!("expected tree geometry, got {:?}", other.family()),
    }
}

#[test]
fn test_two_row_example() {
    let mut viewer = Viewer::new(RecordingSink::new());
    viewer.load_str(TWO_ROWS).unwrap();
    let tree = viewer.tree().unwrap();
    let root = tree.node(tree.root());
    assert_eq!(root.id(), "1");
    assert_eq!(root.display_name(), "AcmeCo");
    let child = tree.node(tree.get("2").unwrap());
    assert_eq!(child.display_name(), "Proj2");
    assert_eq!(tree.parent(tree.get("2").unwrap()), Some(tree.root()));

    assert_eq!(viewer.toggle("1").unwrap(), ExpandState::Collapsed);
    assert_eq!(tree_geometry(&viewer).nodes.len(), 1);
    assert_eq!(viewer.toggle("1").unwrap(), ExpandState::Expanded);
    assert_eq!(tree_geometry(&viewer).nodes.len(), 2);
}

#[test]
fn test_every_layout_through_viewer() {
    let mut viewer = Viewer::new(RecordingSink::new());
    viewer.load_str(ACME_CSV).unwrap();
    for kind in LayoutKind::ALL {
        let frame = viewer.select(kind.as_str()).unwrap();
        assert_eq!(frame.kind, kind);
    }
    assert_eq!(viewer.sink().frames().len(), 1 + LayoutKind::ALL.len());
    assert!(viewer.sink().diagnostics().is_empty());
}

#[test]
fn test_reload_replaces_tree_and_resets_view() {
    let mut viewer = Viewer::new(RecordingSink::new());
    viewer.load_str(ACME_CSV).unwrap();
    viewer.expand_all().unwrap();
    viewer.load_str(TWO_ROWS).unwrap();
    assert_eq!(viewer.tree().unwrap().len(), 2);
    assert_eq!(viewer.last_frame().unwrap().geometry.node_count(), 2);
}

#[test]
fn test_broken_inventory_reports_load_diagnostic() {
    let mut viewer = Viewer::new(RecordingSink::new());
    let err = viewer
        .load_str("1,organization,,o1,,A,\n2,project,,p2\n")
        .unwrap_err();
    assert!(matches!(err, ViewerError::Load(_)));
    assert!(viewer.tree().is_none());
    assert!(viewer.last_frame().is_none());
    let diagnostic = &viewer.sink().diagnostics()[0];
    assert_eq!(diagnostic.stage, Stage::Load);
    assert_eq!(diagnostic.message, "malformed row 2: expected 7 fields, found 4");
}

#[test]
fn test_config_shapes_the_canvas() {
    let config = ViewerConfig::from_yaml(
        "canvas:\n  width: 800\n  height: 600\n  margin: {top: 0, right: 0, bottom: 0, left: 0}\n",
    )
    .unwrap();
    let mut viewer = Viewer::with_config(config, RecordingSink::new());
    viewer.load_str(ACME_CSV).unwrap();
    let frame = viewer.select("treemap").unwrap();
    let Geometry::Treemap(g) = &frame.geometry else {
        panic!("expected treemap");
    };
    assert!((g.size.width - 800.0).abs() < 1e-9);
    assert!((g.size.height - 600.0).abs() < 1e-9);
}

#[test]
fn test_frames_serialize_for_the_browser() {
    let mut viewer = Viewer::new(RecordingSink::new());
    viewer.load_str(ACME_CSV).unwrap();
    viewer.toggle("2").unwrap();
    let json = serde_json::to_value(viewer.last_frame().unwrap()).unwrap();
    assert_eq!(json["kind"], "collapsible-tree");
    assert_eq!(json["origin"], "2");
    assert_eq!(json["geometry"]["layout"], "tree");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_clicks_never_corrupt_the_view(
        clicks in prop::collection::vec((0usize..14, 0usize..6), 1..30),
    ) {
        let mut viewer = Viewer::new(RecordingSink::new());
        viewer.load_str(ACME_CSV).unwrap();
        let original = all_child_ids(viewer.tree().unwrap());

        for (node, layout) in clicks {
            // Ids 13 and 14 do not exist and must be rejected without effect.
            let id = (node + 1).to_string();
            let before = viewer.last_frame().cloned();
            let result = viewer.toggle(&id);
            if node >= 12 {
                prop_assert!(result.is_err());
                prop_assert_eq!(viewer.last_frame().cloned(), before);
            }
            viewer.select(LayoutKind::ALL[layout].as_str()).unwrap();
        }

        let tree = viewer.tree().unwrap();
        assert_tree_invariants(tree);
        prop_assert_eq!(original, all_child_ids(tree));
        prop_assert!(viewer.last_frame().is_some());
    }
}
