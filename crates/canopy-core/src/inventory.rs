//! Reading and writing header-less inventory CSV.
//!
//! Tokenization is delegated to the `csv` crate; this module only maps
//! records to and from the seven positional columns.

use crate::error::LoadError;
use crate::record::{ResourceRecord, RowParser};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;

/// Parse every row of an inventory export.
///
/// The reader is flexible about row length so that short rows reach the
/// row parser and fail with [`LoadError::MalformedRow`] rather than a
/// generic CSV error.
pub fn read_records<R: Read>(reader: R, parser: &RowParser) -> Result<Vec<ResourceRecord>, LoadError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv.records().enumerate() {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        records.push(parser.parse(index + 1, &fields)?);
    }
    tracing::debug!(rows = records.len(), "parsed inventory rows");
    Ok(records)
}

/// Parse an inventory held in memory.
pub fn read_str(text: &str, parser: &RowParser) -> Result<Vec<ResourceRecord>, LoadError> {
    read_records(text.as_bytes(), parser)
}

/// Parse an inventory file.
pub fn read_path(path: &Path, parser: &RowParser) -> Result<Vec<ResourceRecord>, LoadError> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file), parser)
}

/// Write records back in the seven-column export order.
///
/// The display name goes to column 5 and column 6 is left empty, so reading
/// the output back yields the same display names.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), LoadError>
where
    W: Write,
    I: IntoIterator<Item = &'a ResourceRecord>,
{
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    for record in records {
        csv.write_record([
            record.id.as_str(),
            record.resource_type.as_str(),
            record.category.as_str(),
            record.resource_id.as_str(),
            record.parent_id.as_str(),
            record.display_name.as_str(),
            "",
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Render records to an in-memory CSV string.
pub fn to_csv_string<'a, I>(records: I) -> Result<String, LoadError>
where
    I: IntoIterator<Item = &'a ResourceRecord>,
{
    let mut out = Vec::new();
    write_records(&mut out, records)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Keeps rows whose category and type are in the allowed sets.
///
/// Mirrors the selection the inventory export applies: only `resource`
/// rows of the tracked types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Allowed categories.
    pub categories: BTreeSet<String>,
    /// Allowed resource types.
    pub types: BTreeSet<String>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        let types = [
            "organization",
            "project",
            "folder",
            "appengine_app",
            "kubernetes_cluster",
            "cloudsqlinstance",
            "instance",
            "instance_group",
            "instancetemplate",
            "disk",
            "bucket",
        ];
        Self {
            categories: BTreeSet::from(["resource".to_string()]),
            types: types.into_iter().map(String::from).collect(),
        }
    }
}

impl RecordFilter {
    /// True when the record passes the filter.
    #[must_use]
    pub fn accepts(&self, record: &ResourceRecord) -> bool {
        self.categories.contains(&record.category) && self.types.contains(&record.resource_type)
    }

    /// Drop rejected records, preserving order.
    #[must_use]
    pub fn apply(&self, records: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
        let before = records.len();
        let kept: Vec<_> = records.into_iter().filter(|r| self.accepts(r)).collect();
        if kept.len() != before {
            tracing::info!(dropped = before - kept.len(), kept = kept.len(), "filtered inventory");
        }
        kept
    }
}
