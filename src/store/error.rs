//! Store error types

use crate::api::ApiError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by store actions
#[derive(Error, Debug)]
pub enum StoreError {
    /// Remote call failed; the API error is passed through unchanged
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Payload could not be turned into a JSON body
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// Durable storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// The underlying API error, if this failure came from the network
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            StoreError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Payload(err.to_string())
    }
}

/// Result type for store actions
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_transparent() {
        let err: StoreError = ApiError::Status {
            status: 403,
            message: "forbidden".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error 403: forbidden");
        assert_eq!(err.as_api().and_then(ApiError::status), Some(403));
    }

    #[test]
    fn test_payload_error() {
        let err = StoreError::Payload("key must be a string".to_string());
        assert!(err.as_api().is_none());
        assert_eq!(err.to_string(), "Invalid payload: key must be a string");
    }
}
