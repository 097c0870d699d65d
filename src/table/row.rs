//! Column-major row codec
//!
//! A table buffer is not an array of row structs. Each column owns a
//! contiguous run of `row_count` cells starting at byte
//! `column.offset * row_count`, so the buffer is an array of per-column
//! arrays. This module is the only place that turns a (row, column) pair
//! into a buffer position.

use crate::error::{TableError, TableResult};
use crate::table::{ColumnInfo, Table};

/// Bias applied to stored 2-byte integers
pub const INT16_BIAS: u16 = 0x8000;

/// Bias applied to stored 4-byte integers
pub const INT32_BIAS: u32 = 0x8000_0000;

/// Decode a stored 2-byte integer cell
pub fn decode_int16(cell: u32) -> i16 {
    ((cell as u16) ^ INT16_BIAS) as i16
}

/// Encode a 2-byte integer for storage
pub fn encode_int16(value: i16) -> u32 {
    ((value as u16) ^ INT16_BIAS) as u32
}

/// Decode a stored 4-byte integer cell
pub fn decode_int32(cell: u32) -> i32 {
    (cell ^ INT32_BIAS) as i32
}

/// Encode a 4-byte integer for storage
pub fn encode_int32(value: i32) -> u32 {
    (value as u32) ^ INT32_BIAS
}

/// Decode one (row, column) cell as an unsigned integer.
///
/// `ordinal` is 1-based. 2-byte columns yield the word at
/// `offset * row_count + row * 2`; 4-byte columns combine the low and
/// high words at `offset * row_count + row * 4`. String columns go
/// through the same paths and return a string pool id. Any other width
/// fails with `CorruptData`; [`TableView::execute`](crate::table::TableView::execute)
/// rejects such a schema before any cell is read.
pub fn fetch_cell(
    table: &Table,
    columns: &[ColumnInfo],
    row_size: usize,
    row: usize,
    ordinal: u32,
) -> TableResult<u32> {
    let row_count = table.row_count(row_size)?;
    if row >= row_count {
        return Err(TableError::InvalidParameter(format!(
            "row {} out of range for table {} with {} rows",
            row,
            table.name(),
            row_count
        )));
    }

    let column = column_at(table.name(), columns, ordinal)?;
    let base = column.offset() * row_count;

    match column.bytes_per_column()? {
        2 => read_word(table, column, base + row * 2).map(u32::from),
        4 => {
            let pos = base + row * 4;
            let low = read_word(table, column, pos)? as u32;
            let high = read_word(table, column, pos + 2)? as u32;
            Ok(low + (high << 16))
        }
        width => {
            tracing::error!(
                table = table.name(),
                ordinal,
                width,
                "unsupported column width"
            );
            Err(TableError::corrupt(
                table.name(),
                format!(
                    "column {} ({}) has unsupported width {}",
                    ordinal,
                    column.name(),
                    width
                ),
            ))
        }
    }
}

/// Column for a 1-based ordinal
pub fn column_at<'a>(table: &str, columns: &'a [ColumnInfo], ordinal: u32) -> TableResult<&'a ColumnInfo> {
    if ordinal == 0 || ordinal as usize > columns.len() {
        return Err(TableError::InvalidParameter(format!(
            "column {} out of range for table {} with {} columns",
            ordinal,
            table,
            columns.len()
        )));
    }
    Ok(&columns[ordinal as usize - 1])
}

fn read_word(table: &Table, column: &ColumnInfo, pos: usize) -> TableResult<u16> {
    table.word_at(pos).ok_or_else(|| {
        TableError::corrupt(
            table.name(),
            format!(
                "cell of column {} at byte {} is past the end of a {} byte buffer",
                column.ordinal(),
                pos,
                table.size()
            ),
        )
    })
}

/// Packs rows into the column-major layout
///
/// Used to produce table streams; cells are written little-endian at
/// their column's width.
///
/// # Example
/// ```
/// use msitable::table::row::ColumnMajorBuilder;
///
/// let mut builder = ColumnMajorBuilder::new(vec![2, 4]).unwrap();
/// builder.push_row(&[1, 0x10000]).unwrap();
/// builder.push_row(&[2, 0x20000]).unwrap();
///
/// assert_eq!(builder.build(), vec![1, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnMajorBuilder {
    widths: Vec<usize>,
    rows: Vec<Vec<u32>>,
}

impl ColumnMajorBuilder {
    /// Create a builder for columns of the given byte widths (1..=4)
    pub fn new(widths: Vec<usize>) -> TableResult<Self> {
        if let Some(bad) = widths.iter().find(|w| !(1..=4).contains(*w)) {
            return Err(TableError::InvalidParameter(format!(
                "column width {} not in 1..=4",
                bad
            )));
        }
        Ok(Self {
            widths,
            rows: Vec::new(),
        })
    }

    /// Create a builder matching a resolved column list
    pub fn for_columns(columns: &[ColumnInfo]) -> TableResult<Self> {
        let widths = columns
            .iter()
            .map(|c| c.bytes_per_column())
            .collect::<TableResult<Vec<_>>>()?;
        Self::new(widths)
    }

    /// Append one row of cells, one per column
    pub fn push_row(&mut self, cells: &[u32]) -> TableResult<&mut Self> {
        if cells.len() != self.widths.len() {
            return Err(TableError::InvalidParameter(format!(
                "row has {} cells, expected {}",
                cells.len(),
                self.widths.len()
            )));
        }

        for (idx, (cell, width)) in cells.iter().zip(&self.widths).enumerate() {
            if *width < 4 && *cell >> (width * 8) != 0 {
                return Err(TableError::InvalidParameter(format!(
                    "value {:#x} does not fit column {} of width {}",
                    cell,
                    idx + 1,
                    width
                )));
            }
        }

        self.rows.push(cells.to_vec());
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of all column widths
    pub fn row_size(&self) -> usize {
        self.widths.iter().sum()
    }

    /// Serialize all rows column by column
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.row_size() * self.rows.len());
        for (col, width) in self.widths.iter().enumerate() {
            for row in &self.rows {
                out.extend_from_slice(&row[col].to_le_bytes()[..*width]);
            }
        }
        out
    }
}
