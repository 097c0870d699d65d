//! Column schema resolution
//!
//! Table layouts come from two tiers: a fixed set of bootstrap schemas,
//! and rows of the `_Columns` table for everything else. Resolved schemas
//! are memoized per table name.

use crate::error::{TableError, TableResult};
use crate::string_pool::StringPool;
use crate::table::column::layout_columns;
use crate::table::row::{decode_int16, fetch_cell};
use crate::table::{ColumnInfo, Table, TableCache};
use crate::types::{COLUMNS_TABLE, ColumnType};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub mod builtin;

use builtin::{
    COLUMNS_NAME_ORDINAL, COLUMNS_NUMBER_ORDINAL, COLUMNS_TABLE_ORDINAL, COLUMNS_TYPE_ORDINAL,
};

/// Where a schema came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    /// Fixed bootstrap layout
    BuiltIn,
    /// Read from `_Columns` rows
    SelfDescribed,
}

/// Resolved layout of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table_name: String,
    source: SchemaSource,
    columns: Vec<ColumnInfo>,
    row_size: usize,
}

impl TableSchema {
    /// Build a schema from columns in ordinal order, assigning offsets
    pub fn new(
        table_name: impl Into<String>,
        source: SchemaSource,
        mut columns: Vec<ColumnInfo>,
    ) -> TableResult<Self> {
        let table_name = table_name.into();
        let row_size = layout_columns(&table_name, &mut columns)?;
        Ok(Self {
            table_name,
            source,
            columns,
            row_size,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn source(&self) -> SchemaSource {
        self.source
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sum of all column widths
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Column by 1-based ordinal
    pub fn column(&self, ordinal: u32) -> Option<&ColumnInfo> {
        ordinal
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx as usize))
    }

    /// Ordinal of a column by name
    pub fn find_column(&self, name: &str) -> Option<u32> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.ordinal())
    }
}

/// Fixed schema of a bootstrap table, if `table_name` is one
pub fn builtin_schema(table_name: &str) -> Option<TableSchema> {
    let columns: Vec<ColumnInfo> = builtin::builtin_columns(table_name)
        .into_iter()
        .map(|(ordinal, name, column_type)| ColumnInfo::new(table_name, ordinal, name, column_type))
        .collect();

    if columns.is_empty() {
        return None;
    }

    // the fixed table is ordinal-ordered, layout cannot fail
    TableSchema::new(table_name, SchemaSource::BuiltIn, columns).ok()
}

/// Resolve the ordered columns of a table without memoization
///
/// Bootstrap tables never reach the `_Columns` scan, so resolving
/// `_Columns` does not recurse into itself.
pub fn resolve_columns(
    table_name: &str,
    cache: &TableCache,
    strings: &dyn StringPool,
) -> TableResult<TableSchema> {
    if let Some(schema) = builtin_schema(table_name) {
        tracing::debug!(table = table_name, "using built-in schema");
        return Ok(schema);
    }

    let columns = scan_columns_table(table_name, cache, strings)?;
    TableSchema::new(table_name, SchemaSource::SelfDescribed, columns)
}

/// Collect the `_Columns` rows describing `table_name`
fn scan_columns_table(
    table_name: &str,
    cache: &TableCache,
    strings: &dyn StringPool,
) -> TableResult<Vec<ColumnInfo>> {
    let table_id = strings
        .lookup(table_name)
        .ok_or_else(|| TableError::SchemaNotFound(table_name.to_string()))?;

    let meta = builtin_schema(COLUMNS_TABLE)
        .ok_or_else(|| TableError::SchemaNotFound(COLUMNS_TABLE.to_string()))?;

    let columns = cache.with_table(COLUMNS_TABLE, |table| {
        collect_table_columns(table, &meta, table_name, table_id, strings)
    })?;

    if columns.is_empty() {
        return Err(TableError::SchemaNotFound(table_name.to_string()));
    }

    tracing::debug!(
        table = table_name,
        columns = columns.len(),
        "resolved schema from {}",
        COLUMNS_TABLE
    );
    Ok(columns)
}

fn collect_table_columns(
    columns_table: &Table,
    meta: &TableSchema,
    table_name: &str,
    table_id: u32,
    strings: &dyn StringPool,
) -> TableResult<Vec<ColumnInfo>> {
    let cell = |row, ordinal| fetch_cell(columns_table, meta.columns(), meta.row_size(), row, ordinal);
    let row_count = columns_table.row_count(meta.row_size())?;

    let mut columns: Vec<ColumnInfo> = Vec::new();
    for row in 0..row_count {
        if cell(row, COLUMNS_TABLE_ORDINAL)? != table_id {
            continue;
        }

        let ordinal = i32::from(decode_int16(cell(row, COLUMNS_NUMBER_ORDINAL)?));
        let expected = columns.len() as i32 + 1;
        if ordinal != expected {
            tracing::error!(
                table = table_name,
                row,
                expected,
                found = ordinal,
                "column ordinals in {} out of order",
                COLUMNS_TABLE
            );
            return Err(TableError::corrupt(
                table_name,
                format!(
                    "{} row {} has column number {} where {} was expected",
                    COLUMNS_TABLE, row, ordinal, expected
                ),
            ));
        }

        let name_id = cell(row, COLUMNS_NAME_ORDINAL)?;
        let name = strings.resolve(name_id).ok_or_else(|| {
            TableError::corrupt(
                table_name,
                format!("column {} name id {} is not in the string pool", ordinal, name_id),
            )
        })?;

        let type_bits = decode_int16(cell(row, COLUMNS_TYPE_ORDINAL)?) as u16 as u32;
        let column_type = ColumnType::from_bits(type_bits);

        tracing::trace!(
            table = table_name,
            ordinal,
            column = %name,
            column_type = %column_type,
            "discovered column"
        );
        columns.push(ColumnInfo::new(table_name, ordinal as u32, name, column_type));
    }

    Ok(columns)
}

/// Memo of resolved schemas keyed by table name
///
/// The lock only guards the memo map; resolution itself runs unlocked, so
/// a resolution that reads `_Columns` never waits on itself.
pub struct SchemaCatalog {
    enabled: bool,
    entries: Mutex<HashMap<String, Arc<TableSchema>>>,
}

impl SchemaCatalog {
    /// Create a catalog; with `enabled == false` nothing is memoized
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a table's schema, memoizing the result
    pub fn resolve(
        &self,
        table_name: &str,
        cache: &TableCache,
        strings: &dyn StringPool,
    ) -> TableResult<Arc<TableSchema>> {
        if let Some(schema) = self.entries.lock().get(table_name) {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(resolve_columns(table_name, cache, strings)?);

        if self.enabled {
            let mut entries = self.entries.lock();
            let schema = entries.entry(table_name.to_string()).or_insert(schema);
            return Ok(Arc::clone(schema));
        }

        Ok(schema)
    }

    /// Forget a memoized schema, returning whether one was held
    pub fn invalidate(&self, table_name: &str) -> bool {
        self.entries.lock().remove(table_name).is_some()
    }

    /// Forget every memoized schema
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of memoized schemas
    pub fn cached_count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new(true)
    }
}
