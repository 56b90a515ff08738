//! API Error Types
//!
//! Transport failures and non-success responses share one error type;
//! callers that re-raise a failure get it verbatim.

use thiserror::Error;

/// Errors that can occur when talking to the platform API
#[derive(Error, Debug)]
pub enum ApiError {
    /// API host could not be reached
    #[error("API unavailable")]
    Unavailable,

    /// Request did not complete within the client timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a reqwest failure the way the rest of the client reports it
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    /// HTTP status code, when the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses, i.e. the held token was rejected
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: boom");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        let err = ApiError::Status {
            status: 401,
            message: String::new(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(ApiError::Timeout.status(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
