//! Global type definitions
//!
//! Stores constants and type aliases shared by the table engine

use std::fmt;

/// String pool identifier stored inline in string-typed columns
pub type StringId = u32;

/// The null string id; never handed out by a pool
pub const NULL_STRING_ID: StringId = 0;

/// Maximum stream name length in UTF-16 code units, terminator included
pub const MAX_STREAM_NAME: usize = 31;

/// Name of the bootstrap table listing every table
pub const TABLES_TABLE: &str = "_Tables";

/// Name of the bootstrap table describing every column
pub const COLUMNS_TABLE: &str = "_Columns";

/// Column is a valid, declared column
pub const TYPE_VALID: u32 = 0x0100;

/// Column stores a string pool id instead of an integer
pub const TYPE_STRING: u32 = 0x0800;

/// Column accepts the null value
pub const TYPE_NULLABLE: u32 = 0x1000;

/// Column is part of the primary key
pub const TYPE_KEY: u32 = 0x2000;

/// Mask of the declared width (or maximum string length) bits
pub const TYPE_WIDTH_MASK: u32 = 0x00ff;

/// Stored width of a string pool reference in bytes
pub const STRING_REF_WIDTH: usize = 2;

/// Column type bitfield as persisted in the `_Columns` table
///
/// The low byte carries the declared byte width for integer columns
/// (1..=4) or the maximum length for string columns. The remaining
/// bits are flags, see the `TYPE_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnType(u32);

impl ColumnType {
    /// Wrap a raw type bitfield
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Valid integer column of the given byte width
    pub const fn integer(width: u32) -> Self {
        Self(TYPE_VALID | (width & TYPE_WIDTH_MASK))
    }

    /// Valid string column with the given maximum length
    pub const fn string(max_len: u32) -> Self {
        Self(TYPE_VALID | TYPE_STRING | (max_len & TYPE_WIDTH_MASK))
    }

    /// Return the same type with the nullable flag set
    pub const fn nullable(self) -> Self {
        Self(self.0 | TYPE_NULLABLE)
    }

    /// Return the same type with the key flag set
    pub const fn key(self) -> Self {
        Self(self.0 | TYPE_KEY)
    }

    /// Raw bitfield
    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_string(&self) -> bool {
        self.0 & TYPE_STRING != 0
    }

    pub fn is_valid(&self) -> bool {
        self.0 & TYPE_VALID != 0
    }

    pub fn is_nullable(&self) -> bool {
        self.0 & TYPE_NULLABLE != 0
    }

    pub fn is_key(&self) -> bool {
        self.0 & TYPE_KEY != 0
    }

    /// Declared width bits (string max length for string columns)
    pub fn declared_width(&self) -> u32 {
        self.0 & TYPE_WIDTH_MASK
    }

    /// Number of bytes one cell of this column occupies in a row.
    ///
    /// Returns `None` for an integer column whose declared width is not
    /// in 1..=4; callers report that as corrupt schema data.
    pub fn bytes_per_column(&self) -> Option<usize> {
        if self.is_string() {
            return Some(STRING_REF_WIDTH);
        }
        match self.declared_width() {
            width @ 1..=4 => Some(width as usize),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_string() {
            write!(f, "STRING({})", self.declared_width())?;
        } else {
            write!(f, "INT{}", self.declared_width() * 8)?;
        }
        if self.is_key() {
            write!(f, " KEY")?;
        }
        if self.is_nullable() {
            write!(f, " NULL")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod column_type_tests {
    use super::*;

    #[test]
    fn test_column_type_sizes() {
        assert_eq!(ColumnType::integer(1).bytes_per_column(), Some(1));
        assert_eq!(ColumnType::integer(2).bytes_per_column(), Some(2));
        assert_eq!(ColumnType::integer(4).bytes_per_column(), Some(4));
        assert_eq!(ColumnType::string(64).bytes_per_column(), Some(2));
        assert_eq!(ColumnType::string(255).bytes_per_column(), Some(2));
    }

    #[test]
    fn test_column_type_invalid_width() {
        assert_eq!(ColumnType::integer(0).bytes_per_column(), None);
        assert_eq!(ColumnType::integer(5).bytes_per_column(), None);
        assert_eq!(ColumnType::from_bits(TYPE_VALID | 8).bytes_per_column(), None);
    }

    #[test]
    fn test_column_type_flags() {
        let t = ColumnType::string(64).nullable().key();
        assert!(t.is_string());
        assert!(t.is_valid());
        assert!(t.is_nullable());
        assert!(t.is_key());
        assert_eq!(t.declared_width(), 64);

        let t = ColumnType::integer(2);
        assert!(!t.is_string());
        assert!(!t.is_nullable());
        assert_eq!(t.bits(), 0x0102);
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::integer(2).to_string(), "INT16");
        assert_eq!(ColumnType::integer(4).to_string(), "INT32");
        assert_eq!(ColumnType::string(72).to_string(), "STRING(72)");
        assert_eq!(ColumnType::string(0).key().to_string(), "STRING(0) KEY");
        assert_eq!(ColumnType::integer(2).nullable().to_string(), "INT16 NULL");
    }
}
