//! Error types for loading inventories and addressing tree nodes.

use thiserror::Error;

/// Errors that abort an inventory load. No partial tree is ever produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// CSV tokenization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the input failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row had fewer than the required seven fields.
    #[error("malformed row {row}: expected 7 fields, found {fields}")]
    MalformedRow {
        /// 1-based row number.
        row: usize,
        /// Number of fields present.
        fields: usize,
    },

    /// Two records share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// More than one record has an empty parent.
    #[error("multiple roots: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    /// No record has an empty parent.
    #[error("no root record (every row names a parent)")]
    NoRoot,

    /// A record names a parent that does not exist.
    #[error("orphan record {id}: parent {parent_id} does not exist")]
    OrphanRecord {
        /// The record whose parent is missing.
        id: String,
        /// The unresolved parent reference.
        parent_id: String,
    },

    /// A record's parent chain never reaches the root.
    #[error("record {0} is part of a parent cycle")]
    Cycle(String),
}

/// Errors from addressing nodes of a built tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No node carries this id.
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::MalformedRow { row: 3, fields: 5 };
        assert_eq!(err.to_string(), "malformed row 3: expected 7 fields, found 5");

        let err = LoadError::MultipleRoots(vec!["1".into(), "9".into()]);
        assert_eq!(err.to_string(), "multiple roots: 1, 9");

        let err = LoadError::OrphanRecord {
            id: "4".into(),
            parent_id: "77".into(),
        };
        assert_eq!(err.to_string(), "orphan record 4: parent 77 does not exist");
    }

    #[test]
    fn test_load_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LoadError = io_err.into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_tree_error_display() {
        assert_eq!(
            TreeError::UnknownNode("x".into()).to_string(),
            "unknown node: x"
        );
    }
}
