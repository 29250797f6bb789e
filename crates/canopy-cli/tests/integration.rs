//! Runs the `canopy` binary against fixture inventories.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn canopy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_canopy"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run canopy")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_check_prints_summary() {
    let csv = fixture("acme.csv");
    let output = canopy(&["check", csv.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Nodes: 12"));
    assert!(text.contains("Root: 1 (AcmeCo)"));
    assert!(text.contains("Height: 3"));
    assert!(text.contains("folder: 2"));
}

#[test]
fn test_check_rejects_orphan() {
    let csv = fixture("orphan.csv");
    let output = canopy(&["check", csv.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = String::from_utf8(output.stderr).unwrap();
    assert!(err.contains("orphan record 3: parent 99 does not exist"));
}

#[test]
fn test_layout_emits_json() {
    let csv = fixture("acme.csv");
    let output = canopy(&[
        "layout",
        csv.to_str().unwrap(),
        "--kind",
        "sunburst",
        "--toggle",
        "2",
    ]);
    assert!(output.status.success());
    let frame: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(frame["kind"], "sunburst");
    assert_eq!(frame["geometry"]["layout"], "sunburst");
    // Root, both folders, the bastion, and the two projects under folder 2.
    assert_eq!(frame["geometry"]["arcs"].as_array().unwrap().len(), 6);
}

#[test]
fn test_layout_unknown_kind_fails() {
    let csv = fixture("acme.csv");
    let output = canopy(&["layout", csv.to_str().unwrap(), "--kind", "pie"]);
    assert!(!output.status.success());
    let err = String::from_utf8(output.stderr).unwrap();
    assert!(err.contains("unknown layout: pie"));
}

#[test]
fn test_export_normalizes_names() {
    let csv = fixture("acme.csv");
    let output = canopy(&["export", csv.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0], "1,organization,resource,organizations/1,,AcmeCo,");
    assert_eq!(lines[3], "4,project,resource,projects/web-prod,2,web-prod,");
}

#[test]
fn test_export_applies_configured_filter() {
    let csv = fixture("acme.csv");
    let config = fixture("filter.yaml");
    let output = canopy(&[
        "export",
        csv.to_str().unwrap(),
        "--filter",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let ids: Vec<String> = stdout(&output)
        .lines()
        .map(|l| l.split(',').next().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
}
