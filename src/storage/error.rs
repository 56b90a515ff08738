//! Durable storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the key-value storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing file exists but does not hold a key-value document
    #[error("Corrupt storage file {path:?}: {reason}")]
    Corruption { path: PathBuf, reason: String },

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Lock("poisoned".to_string());
        assert_eq!(err.to_string(), "Lock error: poisoned");

        let err = StorageError::Corruption {
            path: PathBuf::from("/tmp/store.json"),
            reason: "expected object".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt storage file \"/tmp/store.json\": expected object"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
