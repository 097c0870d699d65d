//! In-memory storage container

use crate::infrastructure::stream_name::StreamName;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::interface::{StorageContainer, StreamHandle};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Handle over a snapshot of one in-memory stream
pub struct MemStreamHandle {
    name: String,
    data: Arc<[u8]>,
    pos: usize,
}

impl StreamHandle for MemStreamHandle {
    fn stat(&self) -> StorageResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn read(&mut self, len: usize) -> StorageResult<Vec<u8>> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(StorageError::ShortRead {
                stream: self.name.clone(),
                expected: len,
                actual: available,
            });
        }

        let out = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(out)
    }
}

/// Storage container keeping every stream in memory
///
/// Counts `open_stream` calls so callers can observe how often the
/// container is actually hit.
#[derive(Default)]
pub struct MemStorage {
    streams: RwLock<HashMap<StreamName, Arc<[u8]>>>,
    opens: AtomicUsize,
}

impl MemStorage {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a stream with the given contents
    pub fn put_stream(&self, name: StreamName, data: Vec<u8>) {
        self.streams.write().insert(name, Arc::from(data));
    }

    /// Delete a stream, returning whether it existed
    pub fn remove_stream(&self, name: &StreamName) -> bool {
        self.streams.write().remove(name).is_some()
    }

    /// Number of streams held
    pub fn len(&self) -> usize {
        self.streams.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.read().is_empty()
    }

    /// Number of successful and failed `open_stream` calls so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }
}

impl StorageContainer for MemStorage {
    fn open_stream(&self, name: &StreamName) -> StorageResult<Box<dyn StreamHandle>> {
        self.opens.fetch_add(1, Ordering::Relaxed);

        let data = self
            .streams
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        Ok(Box::new(MemStreamHandle {
            name: name.to_string(),
            data,
            pos: 0,
        }))
    }
}
