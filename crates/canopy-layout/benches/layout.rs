//! Benchmarks for the layout adapters.

use canopy_core::Hierarchy;
use canopy_layout::{adapter_for, LayoutKind, LayoutSettings};
use canopy_test::InventoryBuilder;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// An organization with `folders` folders of `projects` projects, each
/// holding three services.
fn inventory(folders: usize, projects: usize) -> Hierarchy {
    let mut builder = InventoryBuilder::new().org("org", "Acme");
    for f in 0..folders {
        let folder = format!("f{f}");
        builder = builder.folder(&folder, "org", &folder);
        for p in 0..projects {
            let project = format!("{folder}-p{p}");
            builder = builder.project(&project, &folder, &project);
            for (s, kind) in ["bucket", "disk", "instance"].iter().enumerate() {
                let id = format!("{project}-s{s}");
                builder = builder.row(&id, kind, &project, &id);
            }
        }
    }
    builder.hierarchy()
}

fn bench_space_filling(c: &mut Criterion) {
    let settings = LayoutSettings::default();
    let mut group = c.benchmark_group("space_filling");
    for (folders, projects) in [(4, 5), (10, 20)] {
        let tree = inventory(folders, projects);
        for kind in [
            LayoutKind::CollapsibleTree,
            LayoutKind::Sunburst,
            LayoutKind::CirclePack,
            LayoutKind::Treemap,
        ] {
            let adapter = adapter_for(kind, &settings);
            group.bench_with_input(BenchmarkId::new(kind.as_str(), tree.len()), &tree, |b, t| {
                b.iter(|| adapter.layout(black_box(t)));
            });
        }
    }
    group.finish();
}

fn bench_force_graph(c: &mut Criterion) {
    let settings = LayoutSettings::default();
    let tree = inventory(3, 4);
    let adapter = adapter_for(LayoutKind::ForceGraph, &settings);
    c.bench_function("force_graph_settle_52_nodes", |b| {
        b.iter(|| adapter.layout(black_box(&tree)));
    });
}

fn bench_toggle_relayout(c: &mut Criterion) {
    let settings = LayoutSettings::default();
    let mut tree = inventory(10, 20);
    tree.collapse_below_root();
    let folder = tree.get("f3").expect("folder exists");
    let adapter = adapter_for(LayoutKind::CollapsibleTree, &settings);
    c.bench_function("toggle_and_relayout", |b| {
        b.iter(|| {
            tree.toggle(folder);
            adapter.layout(black_box(&tree))
        });
    });
}

criterion_group!(
    benches,
    bench_space_filling,
    bench_force_graph,
    bench_toggle_relayout
);
criterion_main!(benches);
