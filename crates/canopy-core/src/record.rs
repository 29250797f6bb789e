//! Inventory records and the fixed-column row parser.
//!
//! The export has no header row, so column order is the contract:
//!
//! | index | field |
//! |-------|-------|
//! | 0 | id |
//! | 1 | resource type |
//! | 2 | category |
//! | 3 | external resource id |
//! | 4 | parent id |
//! | 5 | display name |
//! | 6 | fallback name |

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of positional fields in an inventory row.
pub const ROW_FIELDS: usize = 7;

/// Resource type that is always forced to be the root.
pub const ORGANIZATION: &str = "organization";

/// One parsed inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Unique id within the dataset.
    pub id: String,
    /// Resource type tag (`organization`, `project`, ...).
    pub resource_type: String,
    /// Free-form category; not used in layout.
    pub category: String,
    /// Opaque external identifier.
    pub resource_id: String,
    /// Id of the parent record; empty for the root.
    pub parent_id: String,
    /// First non-empty of the two name columns.
    pub display_name: String,
    /// Icon asset path resolved from the resource type.
    pub icon: String,
}

impl ResourceRecord {
    /// True when this record has no parent reference.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }

    /// The known kind of this record.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from_type(&self.resource_type)
    }
}

/// The fixed resource vocabulary. Anything else is [`ResourceKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Organization,
    Folder,
    Project,
    Bucket,
    Disk,
    KubernetesCluster,
    CloudSqlInstance,
    AppEngineApp,
    Generic,
}

impl ResourceKind {
    /// Every recognized kind, in vocabulary order.
    pub const KNOWN: [Self; 8] = [
        Self::Organization,
        Self::Folder,
        Self::Project,
        Self::Bucket,
        Self::Disk,
        Self::KubernetesCluster,
        Self::CloudSqlInstance,
        Self::AppEngineApp,
    ];

    /// Classify a resource type string. Total: unknown strings are generic.
    #[must_use]
    pub fn from_type(resource_type: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == resource_type)
            .unwrap_or(Self::Generic)
    }

    /// The resource type string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => ORGANIZATION,
            Self::Folder => "folder",
            Self::Project => "project",
            Self::Bucket => "bucket",
            Self::Disk => "disk",
            Self::KubernetesCluster => "kubernetes_cluster",
            Self::CloudSqlInstance => "cloudsqlinstance",
            Self::AppEngineApp => "appengine_app",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup table from resource type to icon asset path.
///
/// Resolution is total: unknown types get the fallback icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTable {
    base_url: String,
    fallback: String,
    icons: HashMap<String, String>,
}

impl Default for IconTable {
    fn default() -> Self {
        let icons = [
            (ResourceKind::Organization, "cloud_logo.png"),
            (ResourceKind::Folder, "folder_logo.png"),
            (ResourceKind::Project, "project_logo.png"),
            (ResourceKind::AppEngineApp, "compute/app_engine.png"),
            (ResourceKind::KubernetesCluster, "compute/container_engine.png"),
            (
                ResourceKind::CloudSqlInstance,
                "storage___databases/cloud_sql.png",
            ),
            (ResourceKind::Bucket, "storage___databases/cloud_storage.png"),
            (ResourceKind::Disk, "storage___databases/persistent_disk.png"),
        ]
        .into_iter()
        .map(|(kind, file)| (kind.as_str().to_string(), file.to_string()))
        .collect();

        Self {
            base_url: "icons/".to_string(),
            fallback: "extras/generic_gcp.png".to_string(),
            icons,
        }
    }
}

impl IconTable {
    /// Create the default table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the URL prefix prepended to every icon file.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the fallback icon file.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Add or replace the icon for one resource type.
    #[must_use]
    pub fn with_icon(mut self, resource_type: impl Into<String>, file: impl Into<String>) -> Self {
        self.icons.insert(resource_type.into(), file.into());
        self
    }

    /// Resolve the icon path for a resource type.
    #[must_use]
    pub fn resolve(&self, resource_type: &str) -> String {
        let file = self
            .icons
            .get(resource_type)
            .unwrap_or(&self.fallback);
        format!("{}{}", self.base_url, file)
    }

    /// The full fallback icon path.
    #[must_use]
    pub fn fallback(&self) -> String {
        format!("{}{}", self.base_url, self.fallback)
    }
}

/// Converts positional rows into [`ResourceRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct RowParser {
    icons: IconTable,
}

impl RowParser {
    /// Parser with the default icon table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with a custom icon table.
    #[must_use]
    pub fn with_icons(icons: IconTable) -> Self {
        Self { icons }
    }

    /// The icon table in use.
    #[must_use]
    pub fn icons(&self) -> &IconTable {
        &self.icons
    }

    /// Parse one row. `row` is the 1-based row number used in diagnostics.
    ///
    /// Fields beyond the seventh are ignored.
    pub fn parse<S: AsRef<str>>(&self, row: usize, fields: &[S]) -> Result<ResourceRecord, LoadError> {
        if fields.len() < ROW_FIELDS {
            return Err(LoadError::MalformedRow {
                row,
                fields: fields.len(),
            });
        }
        let field = |i: usize| fields[i].as_ref();

        let resource_type = field(1);
        let parent_id = if resource_type == ORGANIZATION {
            ""
        } else {
            field(4)
        };
        let display_name = if field(5).is_empty() {
            field(6)
        } else {
            field(5)
        };

        Ok(ResourceRecord {
            id: field(0).to_string(),
            resource_type: resource_type.to_string(),
            category: field(2).to_string(),
            resource_id: field(3).to_string(),
            parent_id: parent_id.to_string(),
            display_name: display_name.to_string(),
            icon: self.icons.resolve(resource_type),
        })
    }
}

/// Parse one row with the default icon table.
pub fn parse_row<S: AsRef<str>>(fields: &[S]) -> Result<ResourceRecord, LoadError> {
    RowParser::new().parse(1, fields)
}
