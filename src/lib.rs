//! Msitable table storage and row-access engine
//!
//! Tables of an installer database live as column-major blobs in the
//! streams of a structured-storage container. This crate loads those
//! blobs through a reference-counted cache, resolves table layouts from
//! built-in and self-describing schemas, and exposes rows through table
//! views.

// Global type definitions
pub mod types;

// Import various modules
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod infrastructure;
pub mod storage;
pub mod string_pool;
pub mod table;

// Re-export the session context and view for easier access
pub use database::Database;
pub use table::{TableView, ViewState};

// Re-export error items for easier access
pub use error::{TableError, TableResult};
pub use storage::{StorageContainer, StorageError};

#[cfg(test)]
mod test_support;
