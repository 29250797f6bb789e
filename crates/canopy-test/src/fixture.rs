//! Fixture inventories.
//!
//! ```
//! use canopy_test::InventoryBuilder;
//!
//! let tree = InventoryBuilder::new()
//!     .org("1", "Acme")
//!     .project("2", "1", "web")
//!     .hierarchy();
//! assert_eq!(tree.len(), 2);
//! ```

use canopy_core::{read_str, Hierarchy, ResourceRecord, RowParser};

/// A three-level organization with folders, projects and services.
pub const ACME_CSV: &str = "\
1,organization,resource,organizations/1,,AcmeCo,
2,folder,resource,folders/20,1,Production,
3,folder,resource,folders/30,1,Staging,
4,project,resource,projects/web-prod,2,,web-prod
5,project,resource,projects/data-prod,2,,data-prod
6,project,resource,projects/web-stg,3,,web-stg
7,bucket,resource,buckets/web-assets,4,,web-assets
8,kubernetes_cluster,resource,clusters/web,4,,web-gke
9,cloudsqlinstance,resource,sql/orders,5,,orders-db
10,disk,resource,disks/orders-0,5,,orders-disk-0
11,appengine_app,resource,apps/stg,6,,stg-app
12,instance,resource,instances/bastion,1,,bastion
";

/// Records of [`ACME_CSV`].
pub fn acme_records() -> Vec<ResourceRecord> {
    read_str(ACME_CSV, &RowParser::new()).expect("fixture CSV parses")
}

/// [`ACME_CSV`] built into a fully expanded tree.
pub fn acme_inventory() -> Hierarchy {
    Hierarchy::from_records(acme_records()).expect("fixture builds")
}

/// A straight line of `len` nodes: an organization followed by nested folders.
pub fn chain(len: usize) -> Vec<ResourceRecord> {
    let mut builder = InventoryBuilder::new().org("0", "root");
    for i in 1..len {
        builder = builder.folder(&i.to_string(), &(i - 1).to_string(), &format!("level-{i}"));
    }
    builder.records()
}

/// Fluent builder for small inventories.
#[derive(Debug, Clone, Default)]
pub struct InventoryBuilder {
    rows: Vec<[String; 7]>,
}

impl InventoryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary row.
    pub fn row(mut self, id: &str, resource_type: &str, parent: &str, name: &str) -> Self {
        self.rows.push([
            id.to_string(),
            resource_type.to_string(),
            "resource".to_string(),
            format!("{resource_type}/{id}"),
            parent.to_string(),
            name.to_string(),
            String::new(),
        ]);
        self
    }

    /// Add the organization root.
    pub fn org(self, id: &str, name: &str) -> Self {
        self.row(id, "organization", "", name)
    }

    /// Add a folder.
    pub fn folder(self, id: &str, parent: &str, name: &str) -> Self {
        self.row(id, "folder", parent, name)
    }

    /// Add a project.
    pub fn project(self, id: &str, parent: &str, name: &str) -> Self {
        self.row(id, "project", parent, name)
    }

    /// Parse the rows.
    pub fn records(&self) -> Vec<ResourceRecord> {
        let parser = RowParser::new();
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| parser.parse(i + 1, row).expect("builder rows have 7 fields"))
            .collect()
    }

    /// Build the tree, panicking on invalid structure.
    pub fn hierarchy(&self) -> Hierarchy {
        Hierarchy::from_records(self.records()).expect("builder inventory is valid")
    }
}
