//! Client error types

use shared::ErrorCategory;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (token cache, exported files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map a non-success status and its body onto an error variant
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            400 => ClientError::Validation(message),
            _ => ClientError::Status { status, message },
        }
    }

    /// Backend rejections, 400 included, are network failures to the operator
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::NotFound(_) => ErrorCategory::NotFound,
            _ => ErrorCategory::Network,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Error body shapes the backend uses: `{"error": ...}` or `{"message": ...}`
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_error_field() {
        let err = ClientError::from_status(401, r#"{"error": "Invalid credentials"}"#);
        match err {
            ClientError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_plain_body() {
        let err = ClientError::from_status(503, "upstream down\n");
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(
            ClientError::from_status(404, "").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ClientError::from_status(400, "").category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ClientError::from_status(500, "").category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ClientError::InvalidResponse("x".into()).category(),
            ErrorCategory::Network
        );
    }
}
