//! Column descriptors and row layout

use crate::error::{TableError, TableResult};
use crate::types::ColumnType;

/// Column metadata structure
///
/// Represents one column of one table with:
/// - table_name: Owning table
/// - ordinal: Position in the table schema (1-based)
/// - name: Column name
/// - column_type: Type bitfield
/// - offset: Byte offset of the column within a row, set by [`layout_columns`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    table_name: String,
    ordinal: u32,
    name: String,
    column_type: ColumnType,
    offset: usize,
}

impl ColumnInfo {
    /// Create a new column with offset 0
    ///
    /// # Arguments
    /// * `table_name` - Owning table
    /// * `ordinal` - 1-based position in the table schema
    /// * `name` - Column name
    /// * `column_type` - Type bitfield
    pub fn new(
        table_name: impl Into<String>,
        ordinal: u32,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            ordinal,
            name: name.into(),
            column_type,
            offset: 0,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Get column ordinal (1-based position in table)
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Byte offset of this column within a row
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes one cell of this column occupies
    ///
    /// Fails with `CorruptData` for an integer width outside 1..=4.
    pub fn bytes_per_column(&self) -> TableResult<usize> {
        self.column_type.bytes_per_column().ok_or_else(|| {
            tracing::error!(
                table = %self.table_name,
                ordinal = self.ordinal,
                bits = self.column_type.bits(),
                "invalid declared column width"
            );
            TableError::corrupt(
                &self.table_name,
                format!(
                    "column {} ({}) has invalid type {:#06x}",
                    self.ordinal,
                    self.name,
                    self.column_type.bits()
                ),
            )
        })
    }
}

/// Check ordinals and assign row offsets, returning the row size.
///
/// Columns must be in ordinal order starting at 1 with no gaps;
/// `offset[0] == 0` and each further offset is the previous offset plus
/// the previous column's width.
pub fn layout_columns(table: &str, columns: &mut [ColumnInfo]) -> TableResult<usize> {
    let mut offset = 0;

    for (idx, column) in columns.iter_mut().enumerate() {
        let expected = idx as u32 + 1;
        if column.ordinal != expected {
            tracing::error!(
                table,
                expected,
                found = column.ordinal,
                "column ordinals out of order"
            );
            return Err(TableError::corrupt(
                table,
                format!(
                    "column ordinal {} found where {} was expected",
                    column.ordinal, expected
                ),
            ));
        }

        column.offset = offset;
        offset += column.bytes_per_column()?;
    }

    Ok(offset)
}
