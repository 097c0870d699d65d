//! Cached table buffer

use crate::error::{TableError, TableResult};
use std::fmt;

/// A table loaded from its stream
///
/// Stores the raw column-major buffer of a table:
/// - name: Table name the stream was encoded from
/// - raw: Stream contents, `None` when the stream does not exist
///
/// A missing stream is not an error: it loads as an empty table with no
/// rows. The buffer is never mutated once loaded, so every holder of the
/// shared instance sees the same bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name
    name: String,
    /// Raw stream contents, interpreted as little-endian 16-bit words
    raw: Option<Box<[u8]>>,
}

impl Table {
    /// Create a table from loaded stream contents
    pub fn new(name: impl Into<String>, raw: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            raw: Some(raw.into_boxed_slice()),
        }
    }

    /// Create the empty table standing in for a missing stream
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: None,
        }
    }

    /// Get table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw buffer, empty when the stream was missing
    pub fn raw(&self) -> &[u8] {
        self.raw.as_deref().unwrap_or(&[])
    }

    /// Byte length of the raw buffer
    pub fn size(&self) -> usize {
        self.raw().len()
    }

    /// Whether the table was loaded from an existing stream
    pub fn has_stream(&self) -> bool {
        self.raw.is_some()
    }

    /// Little-endian 16-bit word starting at `byte_pos`
    pub fn word_at(&self, byte_pos: usize) -> Option<u16> {
        let raw = self.raw();
        let end = byte_pos.checked_add(2)?;
        raw.get(byte_pos..end).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    /// Number of rows for the given row size
    ///
    /// Fails with `CorruptData` when the buffer is not a whole number of
    /// rows; a partial row is never truncated away.
    pub fn row_count(&self, row_size: usize) -> TableResult<usize> {
        if row_size == 0 {
            return Err(TableError::InvalidParameter(format!(
                "row size of table {} is zero",
                self.name
            )));
        }

        let size = self.size();
        if size % row_size != 0 {
            tracing::error!(
                table = %self.name,
                size,
                row_size,
                "table size is not a multiple of the row size"
            );
            return Err(TableError::corrupt(
                &self.name,
                format!("size {} is not a multiple of row size {}", size, row_size),
            ));
        }

        Ok(size / row_size)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("size", &self.size())
            .field("has_stream", &self.has_stream())
            .finish()
    }
}
