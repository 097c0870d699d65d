//! Storage container module
//!
//! This module provides the interface the table engine uses to reach the
//! structured-storage container (open a named stream, stat it, read it),
//! with a host-directory implementation that wraps libc system calls and
//! an in-memory implementation.

// Re-export error types and result type
pub mod error;
pub use error::{StorageError, StorageResult};

// Re-export interface traits
pub mod interface;
pub use interface::{StorageContainer, StreamHandle};

// Re-export container implementations
pub mod dir_storage;
pub use dir_storage::{DirStorage, DirStreamHandle};

pub mod mem_storage;
pub use mem_storage::{MemStorage, MemStreamHandle};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
