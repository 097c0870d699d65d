//! Table engine error definitions

use crate::infrastructure::stream_name::StreamNameError;
use crate::storage::StorageError;
use thiserror::Error;

/// Table engine error types
///
/// Every operation of the cache, the schema resolver, the row codec and
/// table views reports one of these.
#[derive(Debug, Error)]
pub enum TableError {
    /// The container failed for a reason other than a missing stream
    #[error("Storage error on table {table}: {source}")]
    Storage {
        table: String,
        #[source]
        source: StorageError,
    },
    /// No column describes this table, so it does not exist
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),
    /// Stored data contradicts the schema
    #[error("Corrupt data in table {table}: {reason}")]
    CorruptData { table: String, reason: String },
    /// Out-of-range index or an operation invalid in the current state
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Reserved operation
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    /// The view is already open
    #[error("View already open: {0}")]
    AlreadyOpen(String),
    /// Table name cannot be encoded as a stream name
    #[error(transparent)]
    StreamName(#[from] StreamNameError),
}

impl TableError {
    pub(crate) fn corrupt(table: &str, reason: impl Into<String>) -> Self {
        TableError::CorruptData {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(table: &str, source: StorageError) -> Self {
        TableError::Storage {
            table: table.to_string(),
            source,
        }
    }
}

/// Result type for table engine operations
pub type TableResult<T> = Result<T, TableError>;
