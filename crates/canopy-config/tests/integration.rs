//! Integration tests for canopy-config.

use canopy_config::{ConfigError, ViewerConfig};
use canopy_core::{read_str, Size};
use canopy_layout::{layout_by_id, Geometry};
use canopy_test::{assert_tree_invariants, ACME_CSV};
use proptest::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_yaml_and_toml_fixtures_agree() {
    let yaml = ViewerConfig::load(&fixture("viewer.yaml")).unwrap();
    let toml = ViewerConfig::load(&fixture("viewer.toml")).unwrap();
    assert_eq!(yaml, toml);
    assert_eq!(yaml.layout_settings().canvas, Size::new(1300.0, 860.0));
    assert_eq!(yaml.sunburst.visible_rings, 3);
}

#[test]
fn test_config_drives_load_and_layout() {
    let config = ViewerConfig::load(&fixture("viewer.yaml")).unwrap();
    let records = read_str(ACME_CSV, &config.row_parser()).unwrap();
    let mut tree = config.hierarchy_builder().build(records).unwrap();
    assert_tree_invariants(&tree);

    let root = tree.node(tree.root());
    assert_eq!(root.weight(), Some(900.0));
    assert_eq!(root.icon(), "/icons/cloud_logo.png");
    let bastion = tree.get("12").unwrap();
    assert_eq!(tree.node(bastion).icon(), "/icons/compute/compute_engine.png");

    tree.collapse_below_root();
    let geometry = layout_by_id("treemap", &tree, &config.layout_settings()).unwrap();
    let Geometry::Treemap(treemap) = geometry else {
        panic!("expected treemap geometry");
    };
    let root_cell = treemap.cell("1").unwrap();
    assert!((root_cell.rect.width - 1300.0).abs() < 1e-9);
    assert!((root_cell.rect.height - 860.0).abs() < 1e-9);
}

#[test]
fn test_config_filter_for_export() {
    let config = ViewerConfig::load(&fixture("viewer.yaml")).unwrap();
    let records = read_str(ACME_CSV, &config.row_parser()).unwrap();
    let kept = config.record_filter().unwrap().apply(records);
    let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "12"]);
}

#[test]
fn test_invalid_file_reports_field() {
    let err = ViewerConfig::from_yaml("treemap:\n  padding_inner: -1\n").unwrap_err();
    match err {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, "treemap.padding_inner"),
        other => panic!("unexpected error: {other}"),
    }
}

proptest! {
    #[test]
    fn prop_valid_canvas_gives_positive_drawable_area(
        width in 200.0f64..5000.0,
        height in 200.0f64..5000.0,
    ) {
        let yaml = format!("canvas:\n  width: {width}\n  height: {height}\n");
        let config = ViewerConfig::from_yaml(&yaml).unwrap();
        let inner = config.layout_settings().canvas;
        prop_assert!(inner.width > 0.0 && inner.height > 0.0);
        prop_assert!((inner.width - (width - 195.0)).abs() < 1e-6);
    }

    #[test]
    fn prop_non_positive_weight_base_rejected(base in -1.0e6f64..=0.0) {
        let yaml = format!("weight:\n  base: {base}\n");
        let rejected = matches!(
            ViewerConfig::from_yaml(&yaml),
            Err(ConfigError::InvalidValue { .. })
        );
        prop_assert!(rejected);
    }
}
