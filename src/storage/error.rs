//! Storage container error definitions

use std::io;
use thiserror::Error;

/// Storage container error types
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stream does not exist in the container
    #[error("Stream not found: {0}")]
    NotFound(String),
    /// Permission denied error
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    /// System call error with error code
    #[error("System error (errno {0}): {1}")]
    SystemError(i32, String),
    /// Stream ended before the requested length was read
    #[error("Short read on {stream}: expected {expected} bytes, got {actual}")]
    ShortRead {
        stream: String,
        expected: usize,
        actual: usize,
    },
}

impl StorageError {
    /// Whether the error means the stream is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<std::ffi::NulError> for StorageError {
    fn from(err: std::ffi::NulError) -> Self {
        StorageError::InvalidArgument(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotFound("Property".to_string());
        assert_eq!(err.to_string(), "Stream not found: Property");

        let err = StorageError::SystemError(5, "pread failed".to_string());
        assert_eq!(err.to_string(), "System error (errno 5): pread failed");
    }

    #[test]
    fn test_storage_error_not_found() {
        assert!(StorageError::NotFound("x".to_string()).is_not_found());
        assert!(!StorageError::PermissionDenied("x".to_string()).is_not_found());
    }

    #[test]
    fn test_storage_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk gone");
        let err: StorageError = io_err.into();
        assert!(matches!(err, StorageError::IoError(_)));
    }
}
