//! Storage container interface definitions

use crate::infrastructure::stream_name::StreamName;
use crate::storage::error::{StorageError, StorageResult};

/// Handle to one open stream of a container
pub trait StreamHandle: Send {
    /// Length of the stream in bytes
    fn stat(&self) -> StorageResult<u64>;

    /// Read `len` bytes from the current position
    ///
    /// Fails with `ShortRead` if the stream ends first.
    fn read(&mut self, len: usize) -> StorageResult<Vec<u8>>;
}

/// Structured-storage container: a flat directory of named byte streams
///
/// Stream names are always produced by
/// [`encode_name`](crate::infrastructure::stream_name::encode_name);
/// implementations never need to parse foreign names.
pub trait StorageContainer: Send + Sync {
    /// Open an existing stream for reading
    ///
    /// # Returns
    /// * `Ok(Box<dyn StreamHandle>)` if the stream exists
    /// * `Err(StorageError::NotFound)` if it does not
    /// * any other `Err` for a real failure
    fn open_stream(&self, name: &StreamName) -> StorageResult<Box<dyn StreamHandle>>;

    /// Open a stream and read it fully into memory
    fn read_stream(&self, name: &StreamName) -> StorageResult<Vec<u8>> {
        let mut handle = self.open_stream(name)?;
        let len = handle.stat()?;
        let len = usize::try_from(len)
            .map_err(|_| StorageError::InvalidArgument(format!("stream {} too large: {} bytes", name, len)))?;
        handle.read(len)
    }
}
