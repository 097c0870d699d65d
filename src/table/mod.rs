//! Table module for cached table buffers and row access
//!
//! This module implements table access with the following features:
//! - Reference-counted cache of loaded table streams
//! - Column descriptors with cumulative row offsets
//! - Column-major cell decoding
//! - Table views, the operator surface for query execution

pub mod cache;
pub mod column;
pub mod row;
pub mod table;
pub mod view;

pub use cache::TableCache;
pub use column::ColumnInfo;
pub use table::Table;
pub use view::{Dimensions, TableView, ViewState};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
