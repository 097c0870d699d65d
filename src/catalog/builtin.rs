//! Fixed schemas of the bootstrap tables
//!
//! `_Columns` describes every other table, including `_Tables`, so the
//! layouts of these two cannot come from `_Columns` itself.

use crate::types::{COLUMNS_TABLE, ColumnType, TABLES_TABLE};

/// (table, ordinal, column, type) of every bootstrap column
const BUILTIN_COLUMNS: &[(&str, u32, &str, ColumnType)] = &[
    (COLUMNS_TABLE, 1, "Table", ColumnType::string(64)),
    (COLUMNS_TABLE, 2, "Number", ColumnType::integer(2)),
    (COLUMNS_TABLE, 3, "Name", ColumnType::string(64)),
    (COLUMNS_TABLE, 4, "Type", ColumnType::integer(2)),
    (TABLES_TABLE, 1, "Name", ColumnType::string(64)),
];

/// Ordinal of the owning-table cell in `_Columns`
pub const COLUMNS_TABLE_ORDINAL: u32 = 1;
/// Ordinal of the column-number cell in `_Columns`
pub const COLUMNS_NUMBER_ORDINAL: u32 = 2;
/// Ordinal of the column-name cell in `_Columns`
pub const COLUMNS_NAME_ORDINAL: u32 = 3;
/// Ordinal of the type cell in `_Columns`
pub const COLUMNS_TYPE_ORDINAL: u32 = 4;

/// Check if a table has a fixed schema
pub fn is_builtin(table: &str) -> bool {
    BUILTIN_COLUMNS.iter().any(|(t, ..)| *t == table)
}

/// Fixed (ordinal, name, type) columns of a bootstrap table, in ordinal order
pub fn builtin_columns(table: &str) -> Vec<(u32, &'static str, ColumnType)> {
    BUILTIN_COLUMNS
        .iter()
        .filter(|(t, ..)| *t == table)
        .map(|(_, ordinal, name, column_type)| (*ordinal, *name, *column_type))
        .collect()
}

/// Names of all bootstrap tables
pub fn builtin_tables() -> [&'static str; 2] {
    [TABLES_TABLE, COLUMNS_TABLE]
}
