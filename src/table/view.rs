//! Table view operator
//!
//! The surface a query layer composes against: create a view over one
//! table, execute it to pin the table's buffer, read dimensions, column
//! metadata and cells, then close it to drop the pin.

use crate::catalog::TableSchema;
use crate::database::Database;
use crate::error::{TableError, TableResult};
use crate::table::row;
use crate::table::{ColumnInfo, Table};
use crate::types::{ColumnType, NULL_STRING_ID};
use std::sync::Arc;

/// View state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No table reference held
    Closed,
    /// Holding a reference into the table cache
    Open,
}

/// Row and column counts of an open view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

/// Cursor over one cached table and its resolved columns
///
/// The view borrows the table from the database's cache; it never owns
/// it. Dropping an open view closes it.
pub struct TableView<'db> {
    db: &'db Database,
    schema: Arc<TableSchema>,
    table: Option<Arc<Table>>,
}

impl<'db> TableView<'db> {
    /// Resolve a table's columns without touching the table cache
    ///
    /// A table with no columns cannot exist, so a name that resolves to
    /// none fails with `InvalidParameter`.
    pub fn create(db: &'db Database, table_name: &str) -> TableResult<Self> {
        let schema = match db.resolve_columns(table_name) {
            Ok(schema) => schema,
            Err(TableError::SchemaNotFound(name)) => {
                return Err(TableError::InvalidParameter(format!(
                    "table {} has no columns",
                    name
                )));
            }
            Err(err) => return Err(err),
        };

        if schema.column_count() == 0 {
            return Err(TableError::InvalidParameter(format!(
                "table {} has no columns",
                table_name
            )));
        }

        Ok(Self {
            db,
            schema,
            table: None,
        })
    }

    /// Create a view and execute it
    pub fn open(db: &'db Database, table_name: &str) -> TableResult<Self> {
        let mut view = Self::create(db, table_name)?;
        view.execute()?;
        Ok(view)
    }

    /// Acquire the table from the cache and move to `Open`
    ///
    /// Fails with `AlreadyOpen` on an open view. A column stored in
    /// neither 2 nor 4 bytes, or a buffer that is not a whole number of
    /// rows, fails with `CorruptData` and leaves the view closed.
    pub fn execute(&mut self) -> TableResult<()> {
        if self.table.is_some() {
            return Err(TableError::AlreadyOpen(self.schema.table_name().to_string()));
        }

        self.check_cell_widths()?;

        let cache = self.db.cache();
        let table = cache.get_table(self.schema.table_name())?;

        if let Err(err) = table.row_count(self.schema.row_size()) {
            // the corrupt-data error is what the caller needs to see
            let _ = cache.release_table(&table);
            return Err(err);
        }

        tracing::debug!(
            table = self.schema.table_name(),
            size = table.size(),
            row_size = self.schema.row_size(),
            "view opened"
        );
        self.table = Some(table);
        Ok(())
    }

    pub fn state(&self) -> ViewState {
        if self.table.is_some() {
            ViewState::Open
        } else {
            ViewState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.table.is_some()
    }

    pub fn table_name(&self) -> &str {
        self.schema.table_name()
    }

    /// Resolved schema, shared with the database's schema memo
    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    /// Sum of all column widths
    pub fn row_size(&self) -> usize {
        self.schema.row_size()
    }

    /// Column count, available in either state
    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    /// Row count of the pinned table
    pub fn row_count(&self) -> TableResult<usize> {
        self.open_table()?.row_count(self.schema.row_size())
    }

    /// Row and column counts; rows need an open view
    pub fn dimensions(&self) -> TableResult<Dimensions> {
        Ok(Dimensions {
            rows: self.row_count()?,
            columns: self.column_count(),
        })
    }

    /// Name and type of a column by 1-based ordinal
    pub fn column_info(&self, ordinal: u32) -> TableResult<(&str, ColumnType)> {
        let column = self.column(ordinal)?;
        Ok((column.name(), column.column_type()))
    }

    /// Full descriptor of a column by 1-based ordinal
    pub fn column(&self, ordinal: u32) -> TableResult<&ColumnInfo> {
        row::column_at(self.schema.table_name(), self.schema.columns(), ordinal)
    }

    /// Ordinal of a column by name
    pub fn find_column(&self, name: &str) -> Option<u32> {
        self.schema.find_column(name)
    }

    /// Decode one cell as an unsigned integer
    pub fn fetch_cell(&self, row: usize, ordinal: u32) -> TableResult<u32> {
        let table = self.open_table()?;
        row::fetch_cell(
            table,
            self.schema.columns(),
            self.schema.row_size(),
            row,
            ordinal,
        )
    }

    /// Decode a string cell through the string pool
    ///
    /// Returns `None` for the null string id.
    pub fn fetch_string(&self, row: usize, ordinal: u32) -> TableResult<Option<String>> {
        let column = self.column(ordinal)?;
        if !column.column_type().is_string() {
            return Err(TableError::InvalidParameter(format!(
                "column {} ({}) of table {} is not a string column",
                ordinal,
                column.name(),
                self.table_name()
            )));
        }

        let id = self.fetch_cell(row, ordinal)?;
        if id == NULL_STRING_ID {
            return Ok(None);
        }

        self.db.strings().resolve(id).map(Some).ok_or_else(|| {
            TableError::corrupt(
                self.table_name(),
                format!("row {} column {} holds unknown string id {}", row, ordinal, id),
            )
        })
    }

    /// Decode every cell of a row
    pub fn fetch_row(&self, row: usize) -> TableResult<Vec<u32>> {
        (1..=self.column_count() as u32)
            .map(|ordinal| self.fetch_cell(row, ordinal))
            .collect()
    }

    /// Reserved for row mutation, which this engine does not support
    pub fn modify(&mut self, _row: usize, _values: &[u32]) -> TableResult<()> {
        Err(TableError::NotImplemented("modify"))
    }

    /// Release the table reference and move to `Closed`
    ///
    /// Closing a closed view does nothing.
    pub fn close(&mut self) -> TableResult<()> {
        match self.table.take() {
            Some(table) => {
                tracing::debug!(table = table.name(), "view closed");
                self.db.cache().release_table(&table)
            }
            None => Ok(()),
        }
    }

    /// Close the view and drop its resolved columns
    pub fn delete(mut self) -> TableResult<()> {
        self.close()
    }

    /// Only 2- and 4-byte cells are decodable
    fn check_cell_widths(&self) -> TableResult<()> {
        for column in self.schema.columns() {
            let width = column.bytes_per_column()?;
            if width != 2 && width != 4 {
                tracing::error!(
                    table = self.table_name(),
                    ordinal = column.ordinal(),
                    width,
                    "unsupported column width"
                );
                return Err(TableError::corrupt(
                    self.table_name(),
                    format!(
                        "column {} ({}) has unsupported width {}",
                        column.ordinal(),
                        column.name(),
                        width
                    ),
                ));
            }
        }
        Ok(())
    }

    fn open_table(&self) -> TableResult<&Table> {
        self.table.as_deref().ok_or_else(|| {
            TableError::InvalidParameter(format!(
                "view on table {} is not open",
                self.schema.table_name()
            ))
        })
    }
}

impl Drop for TableView<'_> {
    fn drop(&mut self) {
        // release failures are already logged by the cache
        let _ = self.close();
    }
}
