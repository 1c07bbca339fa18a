//! API Response types
//!
//! Only the catalog endpoint wraps its payload; every other endpoint
//! returns the bare body. The envelope looks like:
//! ```json
//! {
//!     "status": true,
//!     "data": [ ... ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Success envelope used by `GET admin/games`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `false` means the backend could not serve the request
    pub status: bool,
    /// Response data (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
        }
    }

    /// Create a failed envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap the payload, describing why it is unusable otherwise
    pub fn into_data(self) -> Result<T, String> {
        if !self.status {
            return Err(self
                .message
                .unwrap_or_else(|| "backend reported status=false".to_string()));
        }
        self.data
            .ok_or_else(|| "envelope has status=true but no data".to_string())
    }
}

/// Bare `{ "message": ... }` body returned by auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
