// Shared fixtures for unit tests

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::infrastructure::stream_name::encode_name;
use crate::storage::MemStorage;
use crate::string_pool::{MemStringPool, StringPool};
use crate::table::row::{ColumnMajorBuilder, encode_int16};
use crate::types::{COLUMNS_TABLE, ColumnType, TABLES_TABLE};
use std::sync::Arc;

/// In-memory container with a `_Tables`/`_Columns` catalog built row by row
pub(crate) struct Fixture {
    pub storage: Arc<MemStorage>,
    pub strings: Arc<MemStringPool>,
    columns_rows: Vec<[u32; 4]>,
    tables_rows: Vec<u32>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MemStorage::new()),
            strings: Arc::new(MemStringPool::new()),
            columns_rows: Vec::new(),
            tables_rows: Vec::new(),
        }
    }

    /// Declare a table with columns numbered 1..=n
    pub fn define_table(&mut self, name: &str, columns: &[(&str, ColumnType)]) -> &mut Self {
        let numbered: Vec<(i16, &str, ColumnType)> = columns
            .iter()
            .enumerate()
            .map(|(i, (col, t))| (i as i16 + 1, *col, *t))
            .collect();
        self.define_raw(name, &numbered)
    }

    /// Declare columns with explicit column numbers, in the given order
    pub fn define_raw(&mut self, name: &str, columns: &[(i16, &str, ColumnType)]) -> &mut Self {
        let table_id = self.strings.intern(name);
        self.tables_rows.push(table_id);
        for (number, col, column_type) in columns {
            self.columns_rows.push([
                table_id,
                encode_int16(*number),
                self.strings.intern(col),
                encode_int16(column_type.bits() as u16 as i16),
            ]);
        }
        self
    }

    /// Write the `_Tables` and `_Columns` streams
    pub fn write_catalog(&self) -> &Self {
        let mut columns = ColumnMajorBuilder::new(vec![2, 2, 2, 2]).unwrap();
        for row in &self.columns_rows {
            columns.push_row(row).unwrap();
        }
        self.put(COLUMNS_TABLE, columns.build());

        let mut tables = ColumnMajorBuilder::new(vec![2]).unwrap();
        for id in &self.tables_rows {
            tables.push_row(&[*id]).unwrap();
        }
        self.put(TABLES_TABLE, tables.build());
        self
    }

    /// Write a table stream from rows of cells
    pub fn put_rows(&self, name: &str, widths: Vec<usize>, rows: &[Vec<u32>]) {
        let mut builder = ColumnMajorBuilder::new(widths).unwrap();
        for row in rows {
            builder.push_row(row).unwrap();
        }
        self.put(name, builder.build());
    }

    /// Write a raw table stream
    pub fn put(&self, name: &str, data: Vec<u8>) {
        self.storage.put_stream(encode_name(true, name).unwrap(), data);
    }

    pub fn database(&self) -> Database {
        self.database_with(DatabaseConfig::default())
    }

    pub fn database_with(&self, config: DatabaseConfig) -> Database {
        Database::with_storage(self.storage.clone(), self.strings.clone(), config)
    }
}
